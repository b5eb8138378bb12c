//! Stateless request builder and response parser for board operations.
//!
//! # Design
//! `BoardClient` holds only a `RequestBuilder` (host, scheme, credentials)
//! and carries no mutable state between calls. Each operation is split into
//! a `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming the matching `HttpResponse`; whoever sits in between performs
//! the round trip. `BoardService` is the usual such caller.

use log::{debug, error};

use crate::category::BoardCategory;
use crate::config::ClientConfig;
use crate::credentials::CredentialContext;
use crate::error::ApiError;
use crate::extract;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::{FormField, RequestBuilder};
use crate::types::{board_path, BoardFull, BoardLike, BoardRef, NewBoard, Pin};

const CREATE_BOARD_PATH: &str = "board/create/";
const SETTINGS_SUFFIX: &str = "settings/";
const ERROR_BODY_LIMIT: usize = 256;

/// Stateless request builder and response parser for board operations.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller executes the round trip between
/// `build_*` and `parse_*`, usually through `BoardService`.
#[derive(Debug, Clone)]
pub struct BoardClient {
    requests: RequestBuilder,
}

impl BoardClient {
    pub fn new(config: ClientConfig, credentials: CredentialContext) -> Self {
        Self {
            requests: RequestBuilder::new(config, credentials),
        }
    }

    pub fn credentials(&self) -> &CredentialContext {
        self.requests.credentials()
    }

    fn get(&self, relative_path: &str) -> Result<HttpRequest, ApiError> {
        let protocol = self.requests.config().protocol;
        self.requests
            .build_request(HttpMethod::Get, protocol, relative_path, true)
    }

    fn post_form(&self, relative_path: &str, fields: &[FormField]) -> Result<HttpRequest, ApiError> {
        let protocol = self.requests.config().protocol;
        self.requests.build_form(protocol, relative_path, fields)
    }

    // --- listing ---

    pub fn build_list_boards(&self, username: &str) -> Result<HttpRequest, ApiError> {
        self.get(&format!("{username}/"))
    }

    pub fn parse_list_boards(&self, response: HttpResponse) -> Result<Vec<BoardRef>, ApiError> {
        check_status(&response, "board listing")?;
        let doc = extract::parse_document(&response.body);
        extract::extract_board_listing(&doc)
    }

    // --- materialization ---

    pub fn build_board_detail(&self, board: &impl BoardLike) -> Result<HttpRequest, ApiError> {
        self.get(board.path())
    }

    /// Builds a full snapshot of `board` from its detail page.
    ///
    /// The page's `og:title` names the entry in the board list that holds the
    /// authoritative id; the handle's own title is used when the page omits it.
    pub fn parse_board_detail(
        &self,
        board: &impl BoardLike,
        response: HttpResponse,
    ) -> Result<BoardFull, ApiError> {
        check_status(&response, "board detail")?;
        let doc = extract::parse_document(&response.body);

        let meta = extract::extract_board_meta(&doc)?;
        let title = meta.title.unwrap_or_else(|| board.title().to_string());
        let id = extract::extract_board_id(&doc, &title)?;
        let page_count = extract::extract_page_count(&doc)?;

        Ok(BoardFull {
            id,
            path: board.path().to_string(),
            title,
            description: meta.description,
            category: meta.category,
            pin_count: meta.pin_count,
            follower_count: meta.follower_count,
            page_count,
        })
    }

    // --- pins ---

    /// Request for page `page` (1-based) of the board's pin grid.
    pub fn build_board_pins(&self, board: &impl BoardLike, page: u32) -> Result<HttpRequest, ApiError> {
        if page == 0 {
            return Err(ApiError::config("pin pages are numbered from 1"));
        }
        self.get(&format!("{}?page={page}", board.path()))
    }

    pub fn parse_board_pins(&self, board: &impl BoardLike, response: HttpResponse) -> Result<Vec<Pin>, ApiError> {
        check_status(&response, "pin grid")?;
        let doc = extract::parse_document(&response.body);
        extract::extract_pins(&doc, &board.to_ref())
    }

    // --- create ---

    pub fn build_create_board(&self, new_board: &NewBoard) -> Result<HttpRequest, ApiError> {
        self.credentials().require_login("board creation")?;
        self.post_form(
            CREATE_BOARD_PATH,
            &[
                ("name", Some(new_board.title.clone())),
                ("category", Some(new_board.category.id().to_string())),
                ("collaborator", Some("me".to_string())),
            ],
        )
    }

    pub fn parse_create_board(&self, new_board: &NewBoard, response: HttpResponse) -> Result<BoardRef, ApiError> {
        check_status(&response, "board creation")?;
        extract::parse_create_board_response(&response.body, new_board)
    }

    // --- delete ---

    pub fn build_delete_board(&self, board: &impl BoardLike) -> Result<HttpRequest, ApiError> {
        self.credentials().require_login("board deletion")?;
        let protocol = self.requests.config().protocol;
        self.requests.build_request(
            HttpMethod::Delete,
            protocol,
            &format!("{}{SETTINGS_SUFFIX}", board.path()),
            true,
        )
    }

    pub fn parse_delete_board(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, "board deletion")
    }

    // --- update ---

    pub fn build_update_board(
        &self,
        board: &impl BoardLike,
        title: &str,
        description: &str,
        category: BoardCategory,
    ) -> Result<HttpRequest, ApiError> {
        self.credentials().require_login("board update")?;
        let csrf = self.credentials().csrf_token().map(str::to_string);
        self.post_form(
            &format!("{}{SETTINGS_SUFFIX}", board.path()),
            &[
                ("name", Some(title.to_string())),
                ("description", Some(description.to_string())),
                ("change_BoardCollaborators", Some("me".to_string())),
                ("csrfmiddlewaretoken", csrf),
                ("collaborator_name", Some("Enter a name".to_string())),
                ("collaborator_username", None),
                ("category", Some(category.id().to_string())),
            ],
        )
    }

    /// A fresh handle reflecting the update.
    ///
    /// The response is not scraped: the new path is derived from the new
    /// title, so it changes whenever the title does.
    pub fn parse_update_board(
        &self,
        board: &impl BoardLike,
        title: &str,
        description: &str,
        category: BoardCategory,
        response: HttpResponse,
    ) -> Result<BoardRef, ApiError> {
        let login = self.credentials().require_login("board update")?;
        check_status(&response, "board update")?;
        if let Some(message) = extract::json_failure(&response.body) {
            error!("Board update refused: {message}");
            return Err(ApiError::RemoteOperation { status: response.status, message });
        }
        debug!("Board {} updated", board.id());
        Ok(BoardRef {
            id: board.id(),
            path: board_path(login, title),
            title: title.to_string(),
            category: Some(category),
            description: Some(description.to_string()),
        })
    }
}

/// Anything but 200 is a remote failure carrying (the start of) the body.
fn check_status(response: &HttpResponse, operation: &str) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    error!("{operation} failed with status {}", response.status);
    error!("{operation} response body: {}", response.body);
    Err(ApiError::RemoteOperation {
        status: response.status,
        message: response.body.chars().take(ERROR_BODY_LIMIT).collect(),
    })
}

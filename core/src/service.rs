//! Board operations as single blocking calls.
//!
//! # Design
//! `BoardService` pairs a `BoardClient` with a `Transport` and runs each
//! build/execute/parse cycle exactly once. Nothing is cached and nothing is
//! retried: every call re-reads the network and surfaces the first failure.
//! Listing and materialization stay separate calls so the cost of the second
//! round trip is always visible to the caller.

use log::debug;

use crate::category::BoardCategory;
use crate::client::BoardClient;
use crate::config::ClientConfig;
use crate::credentials::CredentialContext;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{BoardFull, BoardLike, BoardRef, NewBoard, Pin};

/// Blocking board operations over a pluggable `Transport`.
#[derive(Debug, Clone)]
pub struct BoardService<T> {
    client: BoardClient,
    transport: T,
}

impl<T: Transport> BoardService<T> {
    pub fn new(config: ClientConfig, credentials: CredentialContext, transport: T) -> Self {
        Self {
            client: BoardClient::new(config, credentials),
            transport,
        }
    }

    pub fn client(&self) -> &BoardClient {
        &self.client
    }

    fn send(&self, request: Result<HttpRequest, ApiError>) -> Result<HttpResponse, ApiError> {
        self.transport.execute(&request?)
    }

    /// Boards on `username`'s profile page, as lazy references.
    pub fn list_boards(&self, username: &str) -> Result<Vec<BoardRef>, ApiError> {
        debug!("Collecting board list for user = {username}");
        let response = self.send(self.client.build_list_boards(username))?;
        let boards = self.client.parse_list_boards(response)?;
        debug!("Board count = {}", boards.len());
        Ok(boards)
    }

    /// Fetches the board's page and returns a full snapshot.
    ///
    /// `board` is only read, so a failure leaves the caller's handle exactly
    /// as it was and the call can be retried.
    pub fn materialize(&self, board: &impl BoardLike) -> Result<BoardFull, ApiError> {
        debug!("Getting all info for board {}", board.path());
        let response = self.send(self.client.build_board_detail(board))?;
        self.client.parse_board_detail(board, response)
    }

    /// Pins on page `page` (1-based) of the board's grid.
    pub fn list_pins(&self, board: &impl BoardLike, page: u32) -> Result<Vec<Pin>, ApiError> {
        debug!("Collecting pins of {} page {page}", board.path());
        let response = self.send(self.client.build_board_pins(board, page))?;
        self.client.parse_board_pins(board, response)
    }

    pub fn create_board(&self, new_board: &NewBoard) -> Result<BoardRef, ApiError> {
        debug!(
            "Creating board {:?} ({}) for user = {:?}",
            new_board.title,
            new_board.category,
            self.client.credentials().login()
        );
        let response = self.send(self.client.build_create_board(new_board))?;
        let board = self.client.parse_create_board(new_board, response)?;
        debug!("Board created: {} at {}", board.id, board.path);
        Ok(board)
    }

    pub fn delete_board(&self, board: &impl BoardLike) -> Result<(), ApiError> {
        debug!("Deleting board {}", board.path());
        let response = self.send(self.client.build_delete_board(board))?;
        self.client.parse_delete_board(response)?;
        debug!("Board deleted");
        Ok(())
    }

    /// Renames/re-describes/re-files a board and returns a handle to it.
    ///
    /// The returned path is derived from `title`, not read back from the site,
    /// so fields the site changes on its own are not reflected until the next
    /// materialization.
    pub fn update_board_info(
        &self,
        board: &impl BoardLike,
        title: &str,
        description: &str,
        category: BoardCategory,
    ) -> Result<BoardRef, ApiError> {
        debug!(
            "Updating board {} with title={title:?}, desc={description:?}, cat={category}",
            board.path()
        );
        let response = self.send(self.client.build_update_board(board, title, description, category))?;
        self.client
            .parse_update_board(board, title, description, category, response)
    }
}

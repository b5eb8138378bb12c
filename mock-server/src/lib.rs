//! In-memory imitation of the board pages and form endpoints.
//!
//! Serves profile pages, board pages (meta properties, board list, pin grid,
//! "more" link) and the create/settings endpoints with the same markup and
//! JSON conventions the real site uses. One user owns every board; state
//! changes require that user's cookie and CSRF token.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const PINS_PER_PAGE: usize = 25;
pub const DUPLICATE_BOARD_MESSAGE: &str = "You already have a board with that name.";
pub const EMPTY_NAME_MESSAGE: &str = "Board names can't be empty.";

/// The one signed-in user.
#[derive(Clone, Debug)]
pub struct Session {
    pub login: String,
    pub cookie: String,
    pub csrf_token: String,
}

#[derive(Clone, Debug)]
pub struct MockPin {
    pub id: i64,
    pub description: String,
    pub price: Option<String>,
    pub link: String,
    pub image_url: String,
}

#[derive(Clone, Debug)]
pub struct MockBoard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub followers: u32,
    pub pins: Vec<MockPin>,
}

#[derive(Debug)]
pub struct Store {
    session: Session,
    boards: BTreeMap<i64, MockBoard>,
    next_id: i64,
}

impl Store {
    pub fn new(login: &str) -> Self {
        Self {
            session: Session {
                login: login.to_string(),
                cookie: format!("_pinterest_sess={}", Uuid::new_v4().simple()),
                csrf_token: Uuid::new_v4().simple().to_string(),
            },
            boards: BTreeMap::new(),
            next_id: 1000,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Adds a board holding `pin_count` generated pins; every third pin
    /// shows a price.
    pub fn with_board(mut self, title: &str, category: &str, description: &str, pin_count: usize) -> Self {
        let id = self.insert(title, category, description);
        if let Some(board) = self.boards.get_mut(&id) {
            board.followers = 7;
            board.pins = (0..pin_count)
                .map(|n| MockPin {
                    id: id * 1000 + n as i64,
                    description: format!("Pin {n} on {title}"),
                    price: (n % 3 == 0).then(|| format!("${}.99", n + 1)),
                    link: format!("/pin/{}/", id * 1000 + n as i64),
                    image_url: format!("http://media.example/{id}/{n}.jpg"),
                })
                .collect();
        }
        self
    }

    fn insert(&mut self, title: &str, category: &str, description: &str) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.boards.insert(
            id,
            MockBoard {
                id,
                title: title.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                followers: 0,
                pins: Vec::new(),
            },
        );
        id
    }

    fn find_by_slug(&self, slug: &str) -> Option<&MockBoard> {
        self.boards.values().find(|b| slugify(&b.title) == slug)
    }

    fn path_of(&self, board: &MockBoard) -> String {
        format!("/{}/{}/", self.session.login, slugify(&board.title))
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        header("cookie") == Some(self.session.cookie.as_str())
            && header("x-csrftoken") == Some(self.session.csrf_token.as_str())
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Board slug the site derives from a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for ch in title.to_lowercase().replace('_', " ").chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn app(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/board/create/", post(create_board))
        .route("/{login}/", get(profile))
        .route("/{login}/{slug}/", get(board_page))
        .route("/{login}/{slug}/settings/", post(update_board).delete(delete_board))
        .with_state(db)
}

pub async fn run(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

async fn profile(State(db): State<Db>, Path(login): Path<String>) -> Result<Html<String>, StatusCode> {
    let store = db.read().await;
    if login != store.session.login {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut html = String::from("<html><body><div class=\"boards\">\n");
    html.push_str("<div class=\"pinBoard createBoard\"><h3 class=\"serif\"><a href=\"/board/create/\">Create a board</a></h3></div>\n");
    for board in store.boards.values() {
        let path = store.path_of(board);
        html.push_str(&format!(
            "<div class=\"pinBoard\" id=\"board{id}\">\
             <h3 class=\"serif\"><a href=\"{path}\">{title}</a></h3>\
             <a class=\"link\" href=\"{path}\">{count} pins</a></div>\n",
            id = board.id,
            title = escape(&board.title),
            count = board.pins.len(),
        ));
    }
    html.push_str("</div></body></html>");
    Ok(Html(html))
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

async fn board_page(
    State(db): State<Db>,
    Path((login, slug)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, StatusCode> {
    let store = db.read().await;
    if login != store.session.login {
        return Err(StatusCode::NOT_FOUND);
    }
    let board = store.find_by_slug(&slug).ok_or(StatusCode::NOT_FOUND)?;
    let pages = board.pins.len().div_ceil(PINS_PER_PAGE).max(1);
    let page = query.page.unwrap_or(1).max(1);

    let mut html = String::from("<html><head>\n");
    for (property, content) in [
        ("og:title", board.title.clone()),
        ("og:description", board.description.clone()),
        ("pinterestapp:category", board.category.clone()),
        ("pinterestapp:pins", board.pins.len().to_string()),
        ("pinterestapp:followers", board.followers.to_string()),
    ] {
        html.push_str(&format!(
            "<meta property=\"{property}\" content=\"{}\">\n",
            escape(&content)
        ));
    }
    html.push_str("</head><body>\n<div class=\"BoardList\"><ul>\n");
    for other in store.boards.values() {
        html.push_str(&format!(
            "<li data=\"{}\"><span>{}</span></li>\n",
            other.id,
            escape(&other.title)
        ));
    }
    html.push_str("</ul></div>\n<div class=\"grid\">\n");
    for pin in board.pins.iter().skip((page - 1) * PINS_PER_PAGE).take(PINS_PER_PAGE) {
        let price = pin
            .price
            .as_deref()
            .map(|p| format!("<strong class=\"price\">{}</strong>", escape(p)))
            .unwrap_or_default();
        html.push_str(&format!(
            "<div class=\"pin\" data-id=\"{id}\">\
             <a class=\"PinImage\" href=\"{link}\"><img class=\"PinImageImg\" src=\"{src}\"></a>\
             <p class=\"description\">{desc}</p>{price}</div>\n",
            id = pin.id,
            link = escape(&pin.link),
            src = escape(&pin.image_url),
            desc = escape(&pin.description),
        ));
    }
    html.push_str(&format!(
        "</div>\n<a class=\"MoreGrid\" href=\"?page={}\">More pins</a>\n</body></html>",
        pages + 1
    ));
    Ok(Html(html))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct StatusBody {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StatusBody {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            id: None,
            url: None,
            name: None,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            status: "failure".to_string(),
            message: Some(message.to_string()),
            ..Self::success()
        }
    }
}

#[derive(Deserialize)]
pub struct CreateBoardForm {
    pub name: String,
    pub category: String,
    pub collaborator: Option<String>,
}

async fn create_board(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<CreateBoardForm>,
) -> Result<Json<StatusBody>, StatusCode> {
    let mut store = db.write().await;
    if !store.authorized(&headers) {
        return Err(StatusCode::FORBIDDEN);
    }
    let slug = slugify(&form.name);
    if slug.is_empty() {
        return Ok(Json(StatusBody::failure(EMPTY_NAME_MESSAGE)));
    }
    if store.find_by_slug(&slug).is_some() {
        return Ok(Json(StatusBody::failure(DUPLICATE_BOARD_MESSAGE)));
    }
    let id = store.insert(&form.name, &form.category, "");
    info!("created board {id} {:?}", form.name);
    Ok(Json(StatusBody {
        id: Some(id),
        url: Some(format!("/{}/{slug}/", store.session.login)),
        name: Some(form.name),
        ..StatusBody::success()
    }))
}

#[derive(Deserialize)]
pub struct UpdateBoardForm {
    pub name: String,
    pub description: String,
    #[serde(rename = "change_BoardCollaborators")]
    pub change_board_collaborators: Option<String>,
    pub csrfmiddlewaretoken: String,
    pub collaborator_name: Option<String>,
    pub collaborator_username: Option<String>,
    pub category: String,
}

async fn update_board(
    State(db): State<Db>,
    Path((login, slug)): Path<(String, String)>,
    headers: HeaderMap,
    Form(form): Form<UpdateBoardForm>,
) -> Result<Json<StatusBody>, StatusCode> {
    let mut store = db.write().await;
    if !store.authorized(&headers) || form.csrfmiddlewaretoken != store.session.csrf_token {
        return Err(StatusCode::FORBIDDEN);
    }
    if login != store.session.login {
        return Err(StatusCode::NOT_FOUND);
    }
    let id = store.find_by_slug(&slug).map(|b| b.id).ok_or(StatusCode::NOT_FOUND)?;
    let new_slug = slugify(&form.name);
    if new_slug.is_empty() {
        return Ok(Json(StatusBody::failure(EMPTY_NAME_MESSAGE)));
    }
    if store.find_by_slug(&new_slug).is_some_and(|b| b.id != id) {
        return Ok(Json(StatusBody::failure(DUPLICATE_BOARD_MESSAGE)));
    }
    let board = store.boards.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    board.title = form.name;
    board.description = form.description;
    board.category = form.category;
    info!("updated board {id}");
    Ok(Json(StatusBody::success()))
}

async fn delete_board(
    State(db): State<Db>,
    Path((login, slug)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<StatusBody>, StatusCode> {
    let mut store = db.write().await;
    if !store.authorized(&headers) {
        return Err(StatusCode::FORBIDDEN);
    }
    if login != store.session.login {
        return Err(StatusCode::NOT_FOUND);
    }
    let id = store.find_by_slug(&slug).map(|b| b.id).ok_or(StatusCode::NOT_FOUND)?;
    store.boards.remove(&id);
    info!("deleted board {id}");
    Ok(Json(StatusBody::success()))
}

//! Domain model: lazy and fully materialized boards, pins, and creation input.
//!
//! # Design
//! A board reached through a listing or a create/update call only carries
//! what that response exposed (`BoardRef`). Everything else needs a second
//! round trip to the board's own page, which yields a `BoardFull`. `Board`
//! is the tagged union of the two states; materialization is always an
//! explicit `BoardService::materialize` call, never a side effect of reading
//! a field. Every fetch returns a fresh value; nothing here is shared.

use serde::{Deserialize, Serialize};

use crate::category::BoardCategory;

/// Read access shared by every board-like value.
pub trait BoardLike {
    fn id(&self) -> i64;
    fn path(&self) -> &str;
    fn title(&self) -> &str;
    fn category(&self) -> Option<BoardCategory>;
    fn description(&self) -> Option<&str>;

    /// Value copy of the identifying fields.
    fn to_ref(&self) -> BoardRef {
        BoardRef {
            id: self.id(),
            path: self.path().to_string(),
            title: self.title().to_string(),
            category: self.category(),
            description: self.description().map(str::to_string),
        }
    }
}

/// Enough to address and display a board, not enough to render its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: i64,
    pub path: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<BoardCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BoardRef {
    pub fn new(id: i64, path: &str, title: &str) -> Self {
        Self {
            id,
            path: path.to_string(),
            title: title.to_string(),
            category: None,
            description: None,
        }
    }
}

/// Every field the board's detail page exposes.
///
/// Meta properties the page omits stay `None`. `page_count` is the number of
/// pin-grid pages, derived from the "more" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFull {
    pub id: i64,
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<BoardCategory>,
    pub pin_count: Option<u32>,
    pub follower_count: Option<u32>,
    pub page_count: u32,
}

/// A board handle in either state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Board {
    Referenced(BoardRef),
    Full(BoardFull),
}

impl Board {
    pub fn is_full(&self) -> bool {
        matches!(self, Board::Full(_))
    }

    pub fn as_full(&self) -> Option<&BoardFull> {
        match self {
            Board::Full(full) => Some(full),
            Board::Referenced(_) => None,
        }
    }
}

impl From<BoardRef> for Board {
    fn from(board: BoardRef) -> Self {
        Board::Referenced(board)
    }
}

impl From<BoardFull> for Board {
    fn from(board: BoardFull) -> Self {
        Board::Full(board)
    }
}

impl BoardLike for BoardRef {
    fn id(&self) -> i64 {
        self.id
    }
    fn path(&self) -> &str {
        &self.path
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn category(&self) -> Option<BoardCategory> {
        self.category
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl BoardLike for BoardFull {
    fn id(&self) -> i64 {
        self.id
    }
    fn path(&self) -> &str {
        &self.path
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn category(&self) -> Option<BoardCategory> {
        self.category
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl BoardLike for Board {
    fn id(&self) -> i64 {
        match self {
            Board::Referenced(b) => b.id(),
            Board::Full(b) => b.id(),
        }
    }
    fn path(&self) -> &str {
        match self {
            Board::Referenced(b) => b.path(),
            Board::Full(b) => b.path(),
        }
    }
    fn title(&self) -> &str {
        match self {
            Board::Referenced(b) => b.title(),
            Board::Full(b) => b.title(),
        }
    }
    fn category(&self) -> Option<BoardCategory> {
        match self {
            Board::Referenced(b) => b.category(),
            Board::Full(b) => b.category(),
        }
    }
    fn description(&self) -> Option<&str> {
        match self {
            Board::Referenced(b) => b.description(),
            Board::Full(b) => b.description(),
        }
    }
}

/// A single pin scraped from a board's pin grid.
///
/// `price` is `None` both when the pin shows no price and when the price
/// text could not be read as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: i64,
    pub description: String,
    pub price: Option<f64>,
    pub link: String,
    pub image_url: String,
    pub board: BoardRef,
}

/// Input for creating a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
    pub category: BoardCategory,
}

impl NewBoard {
    pub fn new(title: &str, category: BoardCategory) -> Self {
        Self {
            title: title.to_string(),
            category,
        }
    }
}

/// Path segment the site derives from a board title.
///
/// Lowercases, turns underscores into spaces, then replaces every run of
/// characters outside `[a-z0-9]` with one hyphen. Hyphens left at either end
/// are dropped.
pub fn encode_title(title: &str) -> String {
    let lowered = title.to_lowercase().replace('_', " ");
    let mut out = String::with_capacity(lowered.len());
    let mut in_run = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// `/{login}/{encoded-title}/`
pub fn board_path(login: &str, title: &str) -> String {
    format!("/{login}/{}/", encode_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_title_collapses_non_alphanumeric_runs() {
        assert_eq!(encode_title("My_Board!!"), "my-board");
        assert_eq!(encode_title("a_b"), "a-b");
        assert_eq!(encode_title("Food & Drink -- 2012"), "food-drink-2012");
    }

    #[test]
    fn encode_title_is_total() {
        assert_eq!(encode_title(""), "");
        assert_eq!(encode_title("!!!"), "");
        assert_eq!(encode_title("Crème brûlée"), "cr-me-br-l-e");
    }

    #[test]
    fn encode_title_is_deterministic() {
        let title = "Weekend Projects_2";
        assert_eq!(encode_title(title), encode_title(title));
        assert_eq!(encode_title(title), "weekend-projects-2");
    }

    #[test]
    fn board_path_follows_login_title_convention() {
        assert_eq!(board_path("alice", "Road Trips"), "/alice/road-trips/");
    }

    #[test]
    fn board_like_is_uniform_across_states() {
        let reference = BoardRef {
            id: 7,
            path: "/alice/road-trips/".to_string(),
            title: "Road Trips".to_string(),
            category: Some(BoardCategory::TravelPlaces),
            description: None,
        };
        let board: Board = reference.clone().into();
        assert!(!board.is_full());
        assert_eq!(board.id(), 7);
        assert_eq!(board.to_ref(), reference);

        let full = BoardFull {
            id: 7,
            path: reference.path.clone(),
            title: reference.title.clone(),
            description: Some("Places".to_string()),
            category: Some(BoardCategory::TravelPlaces),
            pin_count: Some(3),
            follower_count: Some(1),
            page_count: 1,
        };
        let board: Board = full.clone().into();
        assert!(board.is_full());
        assert_eq!(board.as_full(), Some(&full));
        assert_eq!(board.description(), Some("Places"));
    }
}

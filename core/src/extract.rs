//! Extraction of domain values from scraped pages and form-post JSON.
//!
//! # Design
//! The markup is not a contract, so every extractor separates two cases:
//! a field a page variant may simply not show (left as `None` or skipped) and
//! a structure the parser depends on (a missing one is `ApiError::DataShape`).
//! Listings degrade per card; a board's id list and pagination link are
//! load-bearing and fail the whole extraction.

use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use url::form_urlencoded;

use crate::category::BoardCategory;
use crate::error::ApiError;
use crate::types::{BoardRef, NewBoard, Pin};

pub const DESCRIPTION_PROPERTY: &str = "og:description";
pub const TITLE_PROPERTY: &str = "og:title";
pub const CATEGORY_PROPERTY: &str = "pinterestapp:category";
pub const PINS_PROPERTY: &str = "pinterestapp:pins";
pub const FOLLOWERS_PROPERTY: &str = "pinterestapp:followers";

/// Message the create endpoint answers with for a duplicate board name.
pub const DUPLICATE_BOARD_MESSAGE: &str = "You already have a board with that name.";

const FAILURE_STATUS: &str = "failure";

fn selector(css: &str) -> Result<Selector, ApiError> {
    Selector::parse(css).map_err(|e| ApiError::config(format!("invalid selector {css:?}: {e:?}")))
}

/// Text content with whitespace runs collapsed.
fn text_of(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unsigned run of ASCII digits as an id; signs and blanks are rejected.
fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn first<'a>(element: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    element.select(sel).next()
}

pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Board cards on a user's profile page.
///
/// Cards without an `id` attribute are decorative and skipped silently; cards
/// whose id, link or title cannot be read are logged and skipped.
pub fn extract_board_listing(doc: &Html) -> Result<Vec<BoardRef>, ApiError> {
    let card_sel = selector(".pinBoard")?;
    let link_sel = selector("a.link")?;
    let title_sel = selector("h3.serif a")?;

    let mut boards = Vec::new();
    for card in doc.select(&card_sel) {
        let Some(raw_id) = card.value().attr("id") else {
            debug!("Skipping board card without id attribute");
            continue;
        };
        let id = match raw_id.strip_prefix("board").and_then(parse_id) {
            Some(id) => id,
            None => {
                warn!("Skipping board card with malformed id {raw_id:?}");
                continue;
            }
        };
        let Some(path) = first(card, &link_sel).and_then(|a| a.value().attr("href")) else {
            warn!("Skipping board card {id}: no link");
            continue;
        };
        let Some(title) = first(card, &title_sel).map(text_of) else {
            warn!("Skipping board card {id}: no title");
            continue;
        };
        boards.push(BoardRef::new(id, path, &title));
    }
    Ok(boards)
}

/// Board fields published as `<meta property=... content=...>` elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<BoardCategory>,
    pub pin_count: Option<u32>,
    pub follower_count: Option<u32>,
}

pub fn extract_board_meta(doc: &Html) -> Result<BoardMeta, ApiError> {
    let meta_sel = selector("meta[property]")?;
    let mut meta = BoardMeta::default();

    for element in doc.select(&meta_sel) {
        let (Some(property), Some(content)) = (element.value().attr("property"), element.value().attr("content"))
        else {
            continue;
        };
        match property {
            DESCRIPTION_PROPERTY => meta.description = Some(content.to_string()),
            TITLE_PROPERTY => meta.title = Some(content.to_string()),
            CATEGORY_PROPERTY => {
                let category = BoardCategory::from_id(content)
                    .ok_or_else(|| ApiError::shape(format!("unknown board category {content:?}")))?;
                meta.category = Some(category);
            }
            PINS_PROPERTY => meta.pin_count = Some(parse_count(property, content)?),
            FOLLOWERS_PROPERTY => meta.follower_count = Some(parse_count(property, content)?),
            _ => {}
        }
    }
    Ok(meta)
}

fn parse_count(property: &str, content: &str) -> Result<u32, ApiError> {
    content
        .trim()
        .parse()
        .map_err(|_| ApiError::shape(format!("{property} is not a count: {content:?}")))
}

/// Authoritative board id from the page's board list, matched by exact title.
pub fn extract_board_id(doc: &Html, title: &str) -> Result<i64, ApiError> {
    let list_sel = selector("div.BoardList")?;
    let item_sel = selector("li")?;

    let title = normalize_ws(title);
    let list = doc
        .select(&list_sel)
        .next()
        .ok_or_else(|| ApiError::shape("board page has no board list"))?;

    for item in list.select(&item_sel) {
        let Some(label) = item.children().find_map(ElementRef::wrap) else {
            continue;
        };
        if text_of(label) != title {
            continue;
        }
        let raw = item
            .value()
            .attr("data")
            .ok_or_else(|| ApiError::shape(format!("board list entry {title:?} has no id")))?;
        return parse_id(raw)
            .ok_or_else(|| ApiError::shape(format!("board list id {raw:?} is not a digit run")));
    }
    Err(ApiError::shape(format!("board list has no entry titled {title:?}")))
}

/// Number of pin-grid pages: the "more" link's `page` parameter minus one.
pub fn extract_page_count(doc: &Html) -> Result<u32, ApiError> {
    let more_sel = selector("a.MoreGrid")?;
    let href = doc
        .select(&more_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| ApiError::shape("board page has no pagination link"))?;

    let query = href.split_once('?').map_or("", |(_, q)| q);
    let page = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ApiError::shape(format!("pagination link {href:?} has no page parameter")))?;

    page.parse::<u32>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| ApiError::shape(format!("pagination page {page:?} is not a positive number")))
}

/// Pins on one page of a board's pin grid.
pub fn extract_pins(doc: &Html, board: &BoardRef) -> Result<Vec<Pin>, ApiError> {
    let pin_sel = selector("div.pin")?;
    let description_sel = selector("p.description")?;
    let link_sel = selector("a.PinImage")?;
    let image_sel = selector("img.PinImageImg")?;
    let price_sel = selector(".price")?;

    let mut pins = Vec::new();
    for card in doc.select(&pin_sel) {
        let Some(raw_id) = card.value().attr("data-id") else {
            continue;
        };
        let Some(id) = parse_id(raw_id) else {
            warn!("Skipping pin with malformed id {raw_id:?}");
            continue;
        };
        let attr = |sel: &Selector, name: &str| {
            first(card, sel)
                .and_then(|el| el.value().attr(name))
                .unwrap_or_default()
                .to_string()
        };
        pins.push(Pin {
            id,
            description: first(card, &description_sel).map(text_of).unwrap_or_default(),
            price: first(card, &price_sel).and_then(|el| parse_price(&text_of(el))),
            link: attr(&link_sel, "href"),
            image_url: attr(&image_sel, "src"),
            board: board.clone(),
        });
    }
    Ok(pins)
}

/// Reads a price like `$1,299.00`; `None` if nothing numeric remains.
pub fn parse_price(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Interprets the JSON body of a 200 response from the create endpoint.
pub fn parse_create_board_response(body: &str, new_board: &NewBoard) -> Result<BoardRef, ApiError> {
    let parsed: StatusBody = serde_json::from_str(body)
        .map_err(|e| ApiError::shape(format!("create response is not the expected JSON: {e}")))?;

    if parsed.status == FAILURE_STATUS {
        let message = parsed.message.unwrap_or_default();
        if message == DUPLICATE_BOARD_MESSAGE {
            return Err(ApiError::BoardExists {
                title: new_board.title.clone(),
            });
        }
        return Err(ApiError::RemoteOperation { status: 200, message });
    }

    let (Some(id), Some(url), Some(name)) = (parsed.id, parsed.url, parsed.name) else {
        return Err(ApiError::shape("create response lacks id, url or name"));
    };
    Ok(BoardRef {
        id,
        path: url,
        title: name,
        category: Some(new_board.category),
        description: None,
    })
}

/// Message of a JSON `"failure"` body, if the body is one.
pub fn json_failure(body: &str) -> Option<String> {
    let parsed: StatusBody = serde_json::from_str(body).ok()?;
    (parsed.status == FAILURE_STATUS).then(|| parsed.message.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
        <html><body>
          <div class="pinBoard" id="board101">
            <h3 class="serif"><a href="/alice/road-trips/">Road Trips</a></h3>
            <a class="link" href="/alice/road-trips/">view</a>
          </div>
          <div class="pinBoard promo">
            <h3 class="serif"><a href="/create/">Create a board</a></h3>
          </div>
          <div class="pinBoard" id="boardXYZ">
            <h3 class="serif"><a href="/alice/broken/">Broken</a></h3>
            <a class="link" href="/alice/broken/">view</a>
          </div>
          <div class="pinBoard" id="board202">
            <h3 class="serif"><a href="/alice/recipes/">  Recipes
              to   try </a></h3>
            <a class="link" href="/alice/recipes/">view</a>
          </div>
        </body></html>"#;

    const DETAIL: &str = r#"
        <html><head>
          <meta property="og:title" content="Road Trips">
          <meta property="og:description" content="Places to drive to">
          <meta property="pinterestapp:category" content="travel_places">
          <meta property="pinterestapp:pins" content="57">
          <meta property="pinterestapp:followers" content="12">
          <meta name="viewport" content="width=device-width">
        </head><body>
          <div class="BoardList"><ul>
            <li data="202"><span>Recipes</span></li>
            <li data="101"><span>Road Trips</span></li>
          </ul></div>
          <a class="MoreGrid" href="?page=5">More</a>
        </body></html>"#;

    #[test]
    fn listing_skips_decorative_and_malformed_cards() {
        let boards = extract_board_listing(&parse_document(PROFILE)).unwrap();
        assert_eq!(
            boards,
            vec![
                BoardRef::new(101, "/alice/road-trips/", "Road Trips"),
                BoardRef::new(202, "/alice/recipes/", "Recipes to try"),
            ]
        );
    }

    #[test]
    fn listing_skips_signed_card_ids() {
        let doc = parse_document(
            r#"<div class="pinBoard" id="board-5">
                 <h3 class="serif"><a href="/alice/minus/">Minus</a></h3>
                 <a class="link" href="/alice/minus/">view</a>
               </div>
               <div class="pinBoard" id="board+5">
                 <h3 class="serif"><a href="/alice/plus/">Plus</a></h3>
                 <a class="link" href="/alice/plus/">view</a>
               </div>
               <div class="pinBoard" id="board5">
                 <h3 class="serif"><a href="/alice/five/">Five</a></h3>
                 <a class="link" href="/alice/five/">view</a>
               </div>"#,
        );
        let boards = extract_board_listing(&doc).unwrap();
        assert_eq!(boards, vec![BoardRef::new(5, "/alice/five/", "Five")]);
    }

    #[test]
    fn listing_without_cards_is_empty() {
        let doc = parse_document("<html><body><p>No boards yet</p></body></html>");
        assert!(extract_board_listing(&doc).unwrap().is_empty());
    }

    #[test]
    fn meta_reads_every_known_property() {
        let meta = extract_board_meta(&parse_document(DETAIL)).unwrap();
        assert_eq!(
            meta,
            BoardMeta {
                title: Some("Road Trips".to_string()),
                description: Some("Places to drive to".to_string()),
                category: Some(BoardCategory::TravelPlaces),
                pin_count: Some(57),
                follower_count: Some(12),
            }
        );
    }

    #[test]
    fn missing_meta_properties_stay_unset() {
        let doc = parse_document(r#"<head><meta property="og:title" content="Only title"></head>"#);
        let meta = extract_board_meta(&doc).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Only title"));
        assert!(meta.description.is_none());
        assert!(meta.category.is_none());
        assert!(meta.pin_count.is_none());
        assert!(meta.follower_count.is_none());
    }

    #[test]
    fn unknown_category_is_a_shape_error() {
        let doc = parse_document(r#"<head><meta property="pinterestapp:category" content="quilting"></head>"#);
        assert!(matches!(extract_board_meta(&doc), Err(ApiError::DataShape(_))));
    }

    #[test]
    fn non_numeric_count_is_a_shape_error() {
        let doc = parse_document(r#"<head><meta property="pinterestapp:pins" content="lots"></head>"#);
        assert!(matches!(extract_board_meta(&doc), Err(ApiError::DataShape(_))));
    }

    #[test]
    fn board_id_is_matched_by_exact_title() {
        let doc = parse_document(DETAIL);
        assert_eq!(extract_board_id(&doc, "Road Trips").unwrap(), 101);
        assert_eq!(extract_board_id(&doc, "Recipes").unwrap(), 202);
        assert!(matches!(extract_board_id(&doc, "road trips"), Err(ApiError::DataShape(_))));
    }

    #[test]
    fn board_id_lookup_collapses_title_whitespace() {
        let doc = parse_document(
            r#"<div class="BoardList"><ul>
                 <li data="101"><span>Road  Trips</span></li>
               </ul></div>"#,
        );
        assert_eq!(extract_board_id(&doc, "Road  Trips").unwrap(), 101);
        assert_eq!(extract_board_id(&doc, " Road Trips ").unwrap(), 101);
    }

    #[test]
    fn signed_board_list_id_is_a_shape_error() {
        let doc = parse_document(r#"<div class="BoardList"><ul><li data="-101"><span>Road Trips</span></li></ul></div>"#);
        assert!(matches!(extract_board_id(&doc, "Road Trips"), Err(ApiError::DataShape(_))));
    }

    #[test]
    fn board_id_without_list_is_a_shape_error() {
        let doc = parse_document("<body><a class=\"MoreGrid\" href=\"?page=2\">More</a></body>");
        assert!(matches!(extract_board_id(&doc, "Road Trips"), Err(ApiError::DataShape(_))));
    }

    #[test]
    fn page_count_is_more_link_page_minus_one() {
        assert_eq!(extract_page_count(&parse_document(DETAIL)).unwrap(), 4);
        let doc = parse_document(r#"<a class="MoreGrid" href="/alice/road-trips/?page=2&amp;x=1">More</a>"#);
        assert_eq!(extract_page_count(&doc).unwrap(), 1);
        let doc = parse_document(r#"<a class="MoreGrid" href="?page=1">More</a>"#);
        assert_eq!(extract_page_count(&doc).unwrap(), 0);
    }

    #[test]
    fn page_count_failures_are_shape_errors() {
        for html in [
            "<body></body>",
            r#"<a class="MoreGrid">More</a>"#,
            r#"<a class="MoreGrid" href="?sort=new">More</a>"#,
            r#"<a class="MoreGrid" href="?page=five">More</a>"#,
            r#"<a class="MoreGrid" href="?page=0">More</a>"#,
        ] {
            let result = extract_page_count(&parse_document(html));
            assert!(matches!(result, Err(ApiError::DataShape(_))), "{html}");
        }
    }

    #[test]
    fn pins_read_optional_fields_softly() {
        let board = BoardRef::new(101, "/alice/road-trips/", "Road Trips");
        let doc = parse_document(
            r#"<div class="pin" data-id="9001">
                 <a class="PinImage" href="/pin/9001/"><img class="PinImageImg" src="http://img/1.jpg"></a>
                 <p class="description">Route 66</p>
                 <strong class="price">$1,299.50</strong>
               </div>
               <div class="pin" data-id="9002"><p class="description">Free map</p><span class="price">free</span></div>
               <div class="pin" data-id="n/a"></div>
               <div class="pin" data-id="-3"></div>
               <div class="pin" data-id="+4"></div>
               <div class="pin"></div>"#,
        );
        let pins = extract_pins(&doc, &board).unwrap();
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].id, 9001);
        assert_eq!(pins[0].price, Some(1299.5));
        assert_eq!(pins[0].link, "/pin/9001/");
        assert_eq!(pins[0].image_url, "http://img/1.jpg");
        assert_eq!(pins[0].board, board);
        assert_eq!(pins[1].description, "Free map");
        assert_eq!(pins[1].price, None);
        assert_eq!(pins[1].link, "");
    }

    #[test]
    fn price_parsing() {
        assert_eq!(parse_price("$12.50"), Some(12.5));
        assert_eq!(parse_price("€ 3"), Some(3.0));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn create_response_success_builds_reference() {
        let new_board = NewBoard::new("Road Trips", BoardCategory::TravelPlaces);
        let board = parse_create_board_response(
            r#"{"status":"success","id":101,"url":"/alice/road-trips/","name":"Road Trips"}"#,
            &new_board,
        )
        .unwrap();
        assert_eq!(board.id, 101);
        assert_eq!(board.path, "/alice/road-trips/");
        assert_eq!(board.category, Some(BoardCategory::TravelPlaces));
    }

    #[test]
    fn create_response_duplicate_name_is_board_exists() {
        let new_board = NewBoard::new("Road Trips", BoardCategory::TravelPlaces);
        let err = parse_create_board_response(
            r#"{"status":"failure","message":"You already have a board with that name."}"#,
            &new_board,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::BoardExists {
                title: "Road Trips".to_string()
            }
        );
    }

    #[test]
    fn create_response_other_failure_is_remote_error() {
        let new_board = NewBoard::new("Road Trips", BoardCategory::TravelPlaces);
        let err = parse_create_board_response(r#"{"status":"failure","message":"Slow down."}"#, &new_board)
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::RemoteOperation {
                status: 200,
                message: "Slow down.".to_string()
            }
        );
    }

    #[test]
    fn create_response_bad_shapes() {
        let new_board = NewBoard::new("x", BoardCategory::Other);
        for body in ["<html>", r#"{"id":1}"#, r#"{"status":"success","id":1}"#] {
            assert!(
                matches!(parse_create_board_response(body, &new_board), Err(ApiError::DataShape(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn json_failure_only_matches_failure_bodies() {
        assert_eq!(
            json_failure(r#"{"status":"failure","message":"nope"}"#),
            Some("nope".to_string())
        );
        assert_eq!(json_failure(r#"{"status":"success"}"#), None);
        assert_eq!(json_failure("<html>saved</html>"), None);
    }
}

//! Client-side access layer for Pinterest boards and pins.
//!
//! # Overview
//! There is no API contract to code against: boards and pins are scraped from
//! server-rendered HTML, and board changes go through form posts that answer
//! with ad-hoc JSON. This crate builds authenticated requests, parses what
//! comes back into validated domain values, and reports every way that can
//! go wrong as a typed `ApiError`.
//!
//! # Design
//! - `BoardClient` is sans-IO: `build_*` produces an `HttpRequest`, `parse_*`
//!   consumes an `HttpResponse`.
//! - `BoardService` runs those halves through a `Transport`
//!   (`UreqTransport` by default) so each operation is one call.
//! - Boards start as lazy `BoardRef`s and become `BoardFull` only through an
//!   explicit `BoardService::materialize`.
//! - `CredentialContext` is immutable and shared read-only by every request.

pub mod category;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod http;
pub mod request;
pub mod service;
pub mod transport;
pub mod types;

pub use category::BoardCategory;
pub use client::BoardClient;
pub use config::ClientConfig;
pub use credentials::CredentialContext;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Protocol};
pub use request::RequestBuilder;
pub use service::BoardService;
pub use transport::Transport;
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{board_path, encode_title, Board, BoardFull, BoardLike, BoardRef, NewBoard, Pin};

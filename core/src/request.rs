//! Authenticated request construction.
//!
//! # Design
//! `RequestBuilder` closes over an immutable `ClientConfig` and
//! `CredentialContext` and is otherwise stateless. It composes
//! `{scheme}://{host}/{path}`, validates the result as a URL, and injects the
//! session cookie, the CSRF header and (optionally) the XHR marker some
//! endpoints branch on. Anonymous contexts get no auth headers at all.

use url::form_urlencoded;
use url::Url;

use crate::config::ClientConfig;
use crate::credentials::CredentialContext;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Protocol};

pub const COOKIE_HEADER: &str = "Cookie";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const AJAX_HEADER: &str = "X-Requested-With";
pub const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One form field; `None` values are left out of the encoded body.
pub type FormField = (&'static str, Option<String>);

/// Turns site-relative paths and form fields into `HttpRequest` values.
///
/// Session headers are attached only when the credentials are authenticated.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: ClientConfig,
    credentials: CredentialContext,
}

impl RequestBuilder {
    pub fn new(config: ClientConfig, credentials: CredentialContext) -> Self {
        Self { config, credentials }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialContext {
        &self.credentials
    }

    /// Absolute URL for a server-relative path.
    pub fn url(&self, protocol: Protocol, relative_path: &str) -> Result<String, ApiError> {
        let raw = format!(
            "{}://{}/{}",
            protocol.scheme(),
            self.config.host,
            relative_path.trim_start_matches('/')
        );
        let url = Url::parse(&raw).map_err(|e| ApiError::config(format!("invalid URL {raw:?}: {e}")))?;
        Ok(url.to_string())
    }

    /// Bodiless request carrying whatever auth headers the context allows.
    pub fn build_request(
        &self,
        method: HttpMethod,
        protocol: Protocol,
        relative_path: &str,
        use_ajax: bool,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method,
            url: self.url(protocol, relative_path)?,
            headers: self.auth_headers(use_ajax),
            body: None,
        })
    }

    /// Urlencoded POST of `fields`, in order.
    pub fn build_form(
        &self,
        protocol: Protocol,
        relative_path: &str,
        fields: &[FormField],
    ) -> Result<HttpRequest, ApiError> {
        let mut request = self.build_request(HttpMethod::Post, protocol, relative_path, true)?;
        request
            .headers
            .push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
        request.body = Some(encode_form(fields));
        Ok(request)
    }

    fn auth_headers(&self, use_ajax: bool) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let (Some(cookie), Some(csrf)) = (self.credentials.cookie(), self.credentials.csrf_token()) {
            headers.push((COOKIE_HEADER.to_string(), cookie.to_string()));
            headers.push((CSRF_HEADER.to_string(), csrf.to_string()));
            if use_ajax {
                headers.push((AJAX_HEADER.to_string(), AJAX_HEADER_VALUE.to_string()));
            }
        }
        headers
    }
}

pub fn encode_form(fields: &[FormField]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

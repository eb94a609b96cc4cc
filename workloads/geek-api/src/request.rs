//! Transport-independent request.

use std::collections::HashMap;

use http::Method;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    /// Header names are stored lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Build a request from a method and a path with optional query string.
    pub fn new(method: Method, path_and_query: &str) -> Self {
        let (path, query) = path_and_query
            .split_once('?')
            .unwrap_or((path_and_query, ""));
        Self {
            method,
            path: path.to_string(),
            query: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn get(path_and_query: &str) -> Self {
        Self::new(Method::GET, path_and_query)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_json<T: Serialize>(self, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.with_header("content-type", "application/json")
            .with_body(body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The body as JSON. Empty and malformed bodies are both rejected.
    pub fn json(&self) -> Result<Value, ApiError> {
        serde_json::from_slice(&self.body).map_err(|_| ApiError::InvalidJson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parsing() {
        let request = ApiRequest::get("/api/products/search?q=caneca%20mario&x=1");
        assert_eq!(request.path, "/api/products/search");
        assert_eq!(request.query_param("q"), Some("caneca mario"));
        assert_eq!(request.query_param("missing"), None);
    }

    #[test]
    fn test_headers_case_insensitive() {
        let request = ApiRequest::get("/").with_header("X-Request-Id", "abc");
        assert_eq!(request.header("x-request-id"), Some("abc"));
        assert_eq!(request.header("X-REQUEST-ID"), Some("abc"));
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::new(Method::POST, "/api/category")
            .with_json(&serde_json::json!({"name": "Consoles"}));
        assert_eq!(request.json().unwrap()["name"], "Consoles");

        let broken = ApiRequest::new(Method::POST, "/api/category").with_body("{name:");
        assert!(matches!(broken.json(), Err(ApiError::InvalidJson)));
        let empty = ApiRequest::new(Method::POST, "/api/category");
        assert!(matches!(empty.json(), Err(ApiError::InvalidJson)));
    }
}

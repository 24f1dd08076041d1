/*
 * request.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Corriere, an HTTP client core driving an external transport.
 *
 * Corriere is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Corriere is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Corriere.  If not, see <http://www.gnu.org/licenses/>.
 */

//! HTTP request: method, headers, optional body; and the descriptor of what was actually sent.
//!
//! Built via RequestConfig; sending is done by the transport (see `transport::execute`).

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;

use super::form::Form;
use super::headers::HeaderMap;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body. A `Form` containing any file field is streamed as multipart/form-data;
/// every other body is sent buffered.
#[derive(Debug)]
pub enum Body {
    Text(String),
    Bytes(Bytes),
    Json(Value),
    Form(Form),
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Bytes(b)
    }
}

impl From<Value> for Body {
    fn from(v: Value) -> Self {
        Body::Json(v)
    }
}

impl From<Form> for Body {
    fn from(f: Form) -> Self {
        Body::Form(f)
    }
}

/// Per-request options: `{ headers?, data? }` plus an optional deadline.
#[derive(Debug, Default)]
pub struct RequestConfig {
    pub headers: HeaderMap,
    pub data: Option<Body>,
    /// Overrides the transport's default timeout for this request.
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header. Name is stored as given; comparison is case-insensitive per HTTP.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn data(mut self, body: impl Into<Body>) -> Self {
        self.data = Some(body.into());
        self
    }

    pub fn json(self, value: Value) -> Self {
        self.data(Body::Json(value))
    }

    pub fn form(self, form: Form) -> Self {
        self.data(Body::Form(form))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Summary of the body that went to the transport. Byte-sources are consumed by sending,
/// so multipart bodies are described by boundary and field names only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentBody {
    None,
    /// Text passed on the command line.
    Buffered(String),
    /// Raw bytes written to the transport's input (length).
    Bytes(usize),
    Multipart { boundary: String, fields: Vec<String> },
}

/// The request as issued: encoded URL, final headers, body summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: SentBody,
}

/// Serialize a non-file body to the text passed on the command line. Strings are sent as-is,
/// structured values as JSON. Returns None for bodies that must go through the input channel.
pub(crate) fn buffered_text(body: &Body) -> Option<String> {
    match body {
        Body::Text(s) => Some(s.clone()),
        Body::Json(v) => Some(v.to_string()),
        Body::Form(form) => form.to_json().map(|v| v.to_string()),
        Body::Bytes(_) => None,
    }
}

/// True when the body should advertise `application/json` by default.
pub(crate) fn is_json(body: &Body) -> bool {
    match body {
        Body::Json(_) => true,
        Body::Form(form) => !form.has_files(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_names() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn config_builder_replaces_headers_case_insensitively() {
        let c = RequestConfig::new()
            .header("Content-Type", "text/plain")
            .header("content-type", "application/json")
            .json(json!({"x": 1}));
        assert_eq!(c.headers.len(), 1);
        assert_eq!(c.headers.get("Content-Type"), Some("application/json"));
        assert!(matches!(c.data, Some(Body::Json(_))));
    }

    #[test]
    fn buffered_text_stringifies_structured_values() {
        assert_eq!(buffered_text(&Body::Json(json!({"x": 1}))).as_deref(), Some(r#"{"x":1}"#));
        assert_eq!(buffered_text(&Body::from("raw")).as_deref(), Some("raw"));
        assert!(buffered_text(&Body::from(vec![0u8, 1, 2])).is_none());
    }

    #[test]
    fn plain_form_is_sent_as_json_object() {
        let form = Form::new().text("name", "ada").json("tags", json!(["a", "b"]));
        assert!(!form.has_files());
        let body = Body::Form(form);
        assert!(is_json(&body));
        assert_eq!(
            buffered_text(&body).as_deref(),
            Some(r#"{"name":"ada","tags":["a","b"]}"#)
        );
    }
}

/*
 * response.rs
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

//! Response assembly from the transport's output: head/body split at the first blank line,
//! provisional (1xx) responses unwrapped, body classified as JSON or raw, non-2xx turned into
//! `HttpError::Status`.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::headers::{parse_header_lines, parse_headers, HeaderMap};
use super::request::RequestDescriptor;
use super::status::parse_status_line;
use crate::error::{Result, StatusError};

const HEAD_END: &[u8] = b"\r\n\r\n";

/// Content types whose bodies are decoded as JSON.
const JSON_TYPES: &[&str] = &["application/json", "application/hal+json"];

/// Classified response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    /// Body that is not JSON (or failed to parse as JSON) and is valid UTF-8.
    Text(String),
    Binary(Bytes),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Final response of an exchange.
#[derive(Debug, Clone)]
pub struct Response {
    pub data: ResponseData,
    /// 0 when the transport output had no recognisable status line.
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    /// Raw body bytes as received.
    pub body: Bytes,
    pub request: RequestDescriptor,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Body as text (lossy for non-UTF-8 bodies).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match &self.data {
            ResponseData::Json(v) => serde_json::from_value(v.clone()),
            _ => serde_json::from_slice(&self.body),
        }
    }
}

/// True when a Content-Type value names a JSON media type (case-insensitive).
pub fn is_json_content_type(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    JSON_TYPES.iter().any(|t| value.contains(t))
}

/// Parse `body` as JSON; on failure fall back to the raw body. The flag tells which happened.
pub fn parse_json_or_fallback(body: &Bytes) -> (ResponseData, bool) {
    match serde_json::from_slice::<Value>(body) {
        Ok(v) => (ResponseData::Json(v), true),
        Err(e) => {
            log::debug!("response body is not valid JSON ({}), keeping raw body", e);
            (raw_data(body), false)
        }
    }
}

fn raw_data(body: &Bytes) -> ResponseData {
    match std::str::from_utf8(body) {
        Ok(s) => ResponseData::Text(s.to_string()),
        Err(_) => ResponseData::Binary(body.clone()),
    }
}

/// Split at the first CRLFCRLF. Without a blank line the whole input is the head.
fn split_head(raw: &Bytes) -> (Bytes, Bytes) {
    match raw.windows(HEAD_END.len()).position(|w| w == HEAD_END) {
        Some(i) => (raw.slice(..i), raw.slice(i + HEAD_END.len()..)),
        None => (raw.clone(), Bytes::new()),
    }
}

struct Head {
    status: u16,
    reason: String,
    headers: HeaderMap,
}

/// Status line plus headers. A missing or malformed status line yields status 0 and the
/// first line is read as an ordinary header line.
fn parse_head(block: &[u8]) -> Head {
    let text = String::from_utf8_lossy(block);
    let mut lines = text.split("\r\n");
    let first = lines.next().unwrap_or("");
    match parse_status_line(first) {
        Some(status) => Head {
            status: status.code,
            reason: status.reason,
            headers: parse_header_lines(lines),
        },
        None => Head {
            status: 0,
            reason: String::new(),
            headers: parse_headers(&text),
        },
    }
}

/// Informational responses that precede the final one. 101 ends the exchange and is final.
fn is_provisional(status: u16) -> bool {
    (100..200).contains(&status) && status != 101
}

/// Assemble the final response from raw transport output.
///
/// Fails with `HttpError::Status` (carrying the assembled response) when the final status is
/// outside 200..300, including status 0 for unrecognisable output.
pub fn assemble(raw: Bytes, request: RequestDescriptor) -> Result<Response> {
    let mut rest = raw;
    let (head, body) = loop {
        let (block, body) = split_head(&rest);
        let head = parse_head(&block);
        if is_provisional(head.status) && !body.is_empty() {
            log::trace!("skipping provisional response {} {}", head.status, head.reason);
            rest = body;
            continue;
        }
        break (head, body);
    };

    let is_json = head
        .headers
        .get("Content-Type")
        .map_or(false, is_json_content_type);
    let data = if is_json && !body.is_empty() {
        parse_json_or_fallback(&body).0
    } else {
        raw_data(&body)
    };

    let response = Response {
        data,
        status: head.status,
        status_text: head.reason,
        headers: head.headers,
        body,
        request,
    };
    if response.is_success() {
        Ok(response)
    } else {
        Err(StatusError::new(response).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::protocol::http::request::{Method, SentBody};
    use serde_json::json;

    fn request() -> RequestDescriptor {
        RequestDescriptor {
            method: Method::Get,
            url: "https://example.test/ok".to_string(),
            headers: HeaderMap::new(),
            body: SentBody::None,
        }
    }

    fn ok(raw: &str) -> Response {
        assemble(Bytes::copy_from_slice(raw.as_bytes()), request()).unwrap()
    }

    fn failed(raw: &[u8]) -> Response {
        match assemble(Bytes::copy_from_slice(raw), request()) {
            Err(HttpError::Status(e)) => e.response,
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn json_body_is_parsed() {
        let r = ok("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"a\":1}");
        assert_eq!(r.status, 200);
        assert_eq!(r.status_text, "OK");
        assert_eq!(r.data, ResponseData::Json(json!({"a": 1})));
        assert_eq!(r.request.url, "https://example.test/ok");
    }

    #[test]
    fn empty_body_is_empty_text() {
        let r = ok("HTTP/1.1 201 Created\r\n\r\n");
        assert_eq!(r.status, 201);
        assert_eq!(r.data, ResponseData::Text(String::new()));
        let r = ok("HTTP/1.1 204 No Content\r\nContent-Type: application/json\r\n\r\n");
        assert_eq!(r.data, ResponseData::Text(String::new()));
    }

    #[test]
    fn not_found_fails_with_parsed_body() {
        let r = failed(b"HTTP/1.1 404 Not Found\r\n\r\nnot found");
        assert_eq!(r.status, 404);
        assert_eq!(r.status_text, "Not Found");
        assert_eq!(r.data.as_text(), Some("not found"));
    }

    #[test]
    fn status_error_message() {
        let err = assemble(
            Bytes::from_static(b"HTTP/1.1 503 Service Unavailable\r\n\r\n"),
            request(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status code 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn success_range_edges() {
        assert_eq!(ok("HTTP/1.1 200 OK\r\n\r\n").status, 200);
        assert_eq!(ok("HTTP/1.1 299 Custom\r\n\r\n").status, 299);
        assert_eq!(failed(b"HTTP/1.1 300 Multiple Choices\r\n\r\n").status, 300);
        assert_eq!(failed(b"HTTP/1.1 199 Custom\r\n\r\n").status, 199);
        assert_eq!(failed(b"HTTP/1.1 101 Switching Protocols\r\n\r\n").status, 101);
    }

    #[test]
    fn error_body_keeps_json_classification() {
        let r = failed(b"HTTP/1.1 422 Unprocessable Entity\r\nContent-Type: application/json\r\n\r\n{\"error\":\"bad\"}");
        assert_eq!(r.data, ResponseData::Json(json!({"error": "bad"})));
    }

    #[test]
    fn continue_chain_is_unwrapped() {
        let r = ok(concat!(
            "HTTP/1.1 100 Continue\r\n\r\n",
            "HTTP/1.1 100 Continue\r\n\r\n",
            "HTTP/1.1 200 OK\r\nX-Final: yes\r\n\r\ndone"
        ));
        assert_eq!(r.status, 200);
        assert_eq!(r.header("x-final"), Some("yes"));
        assert_eq!(r.data.as_text(), Some("done"));
    }

    #[test]
    fn early_hints_are_unwrapped() {
        let r = ok(concat!(
            "HTTP/1.1 103 Early Hints\r\nLink: </style.css>; rel=preload\r\n\r\n",
            "HTTP/1.1 200 OK\r\n\r\nbody"
        ));
        assert_eq!(r.status, 200);
        assert!(r.header("Link").is_none());
    }

    #[test]
    fn trailing_continue_without_body_is_final() {
        let r = failed(b"HTTP/1.1 100 Continue\r\n\r\n");
        assert_eq!(r.status, 100);
    }

    #[test]
    fn continue_followed_by_head_without_blank_line() {
        let r = ok("HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 200 OK\r\nX-A: 1");
        assert_eq!(r.status, 200);
        assert_eq!(r.header("X-A"), Some("1"));
        assert!(r.body.is_empty());
    }

    #[test]
    fn blank_lines_inside_body_are_kept() {
        let r = ok("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\npart one\r\n\r\npart two");
        assert_eq!(r.data.as_text(), Some("part one\r\n\r\npart two"));
    }

    #[test]
    fn invalid_json_falls_back_to_text() {
        let r = ok("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{not json");
        assert_eq!(r.data, ResponseData::Text("{not json".to_string()));
    }

    #[test]
    fn content_type_matching_is_case_insensitive() {
        let r = ok("HTTP/1.1 200 OK\r\ncontent-TYPE: Application/JSON; charset=utf-8\r\n\r\n[1,2]");
        assert_eq!(r.data, ResponseData::Json(json!([1, 2])));
        let r = ok("HTTP/1.1 200 OK\r\nContent-Type: application/hal+json\r\n\r\n{\"_links\":{}}");
        assert!(r.data.as_json().is_some());
        let r = ok("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n{\"a\":1}");
        assert_eq!(r.data.as_text(), Some("{\"a\":1}"));
    }

    #[test]
    fn non_utf8_body_is_binary() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\r\n\x89PNG\xff\x00";
        let r = assemble(Bytes::copy_from_slice(raw), request()).unwrap();
        assert_eq!(r.data, ResponseData::Binary(Bytes::from_static(b"\x89PNG\xff\x00")));
        assert_eq!(r.bytes().as_ref(), b"\x89PNG\xff\x00");
    }

    #[test]
    fn missing_status_line_degrades_to_zero() {
        let r = failed(b"Content-Type: text/plain\r\nX-A: 1\r\n\r\nhello");
        assert_eq!(r.status, 0);
        assert_eq!(r.status_text, "");
        assert_eq!(r.header("x-a"), Some("1"));
        assert_eq!(r.data.as_text(), Some("hello"));
    }

    #[test]
    fn repeated_headers_are_merged() {
        let r = ok("HTTP/1.1 200 OK\r\nVia: a\r\nVia: b\r\n\r\n");
        assert_eq!(r.header("via"), Some("a, b"));
    }

    #[test]
    fn fallback_reports_whether_json_was_parsed() {
        let (d, was_json) = parse_json_or_fallback(&Bytes::from_static(b"{\"k\":true}"));
        assert!(was_json);
        assert_eq!(d, ResponseData::Json(json!({"k": true})));
        let (d, was_json) = parse_json_or_fallback(&Bytes::from_static(b"<html>"));
        assert!(!was_json);
        assert_eq!(d, ResponseData::Text("<html>".to_string()));
    }

    #[test]
    fn typed_json_access() {
        #[derive(serde::Deserialize)]
        struct Item {
            id: u32,
            name: String,
        }
        let r = ok("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"id\":7,\"name\":\"x\"}");
        let item: Item = r.json().unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.name, "x");
        let r = ok("HTTP/1.1 200 OK\r\n\r\n{\"id\":8,\"name\":\"y\"}");
        assert_eq!(r.json::<Item>().unwrap().id, 8);
    }
}

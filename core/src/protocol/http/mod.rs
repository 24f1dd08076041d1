/*
 * mod.rs
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

//! HTTP client over an external transport process (curl by default).
//!
//! Design:
//! - The transport performs the network exchange; this layer builds its command line and reads
//!   its output (`-i`: status line, headers, blank line, body).
//! - Responses: head/body split at the first blank line, 1xx responses unwrapped, body classified
//!   as JSON or raw by Content-Type, non-2xx surfaced as `HttpError::Status` with the response.
//! - Requests: text and JSON bodies go on the command line; byte bodies and forms with files are
//!   written to the transport's input, multipart bodies encoded on the fly.
//! - Buffers: `bytes` crate (Bytes for raw output and body slices).

mod form;
mod headers;
mod multipart;
mod request;
mod response;
mod status;

pub mod client;
pub mod transport;

pub use client::HttpClient;
pub use form::{mime_from_extension, ByteSource, FieldValue, FilePart, Form};
pub use headers::{parse_headers, HeaderMap};
pub use multipart::{generate_boundary, is_valid_boundary, MultipartEncoder};
pub use request::{Body, Method, RequestConfig, RequestDescriptor, SentBody};
pub use response::{assemble, is_json_content_type, parse_json_or_fallback, Response, ResponseData};
pub use status::{parse_status_line, StatusLine};
pub use transport::{execute, Invocation};

/*
 * multipart.rs
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

//! Streaming multipart/form-data encoder (RFC 7578 / RFC 2046 part framing).
//!
//! Parts are written strictly one after another in form order. Text and JSON parts are written
//! directly; file parts drain their byte-source into the sink in fixed-size chunks, so a file is
//! never held in memory. Framing per part:
//!
//! ```text
//! --<boundary>CRLF
//! Content-Disposition: form-data; name="<name>"[; filename="<file>"]CRLF
//! [Content-Type: <type>CRLF]
//! CRLF
//! <value or file bytes>CRLF
//! ```
//!
//! followed by `--<boundary>--CRLF`.

use std::io;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::form::{ByteSource, FieldValue, Form};
use crate::error::{HttpError, Result};

const BOUNDARY_PREFIX: &str = "----CorriereFormBoundary";
const BOUNDARY_RANDOM_LEN: usize = 24;
const CHUNK_SIZE: usize = 8 * 1024;

/// Fixed prefix plus random alphanumerics; collision with body content is improbable, not excluded.
pub fn generate_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", BOUNDARY_PREFIX, suffix)
}

/// Checks if a character is valid in a MIME boundary (RFC 2046).
#[inline]
pub fn is_boundary_char(c: u8) -> bool {
    matches!(c,
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' |
        b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' |
        b'/' | b':' | b'=' | b'?'
    )
}

/// Validates MIME boundary: 1-70 chars from boundary set (RFC 2046).
pub fn is_valid_boundary(boundary: &str) -> bool {
    let b = boundary.as_bytes();
    (1..=70).contains(&b.len()) && b.iter().copied().all(is_boundary_char)
}

/// One-shot encoder for a form. Owns the boundary and the field order for a single request.
#[derive(Debug)]
pub struct MultipartEncoder {
    boundary: String,
    fields: Vec<(String, FieldValue)>,
}

impl MultipartEncoder {
    /// Encoder with a freshly generated boundary.
    pub fn new(form: Form) -> Self {
        Self {
            boundary: generate_boundary(),
            fields: form.into_fields(),
        }
    }

    /// Encoder with a caller-chosen boundary (reproducible output).
    pub fn with_boundary(form: Form, boundary: impl Into<String>) -> Result<Self> {
        let boundary = boundary.into();
        if !is_valid_boundary(&boundary) {
            return Err(HttpError::InvalidBoundary(boundary));
        }
        Ok(Self {
            boundary,
            fields: form.into_fields(),
        })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's Content-Type header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Write the whole body into `sink` and flush it. Returns the number of bytes written.
    ///
    /// A byte-source read failure aborts with `HttpError::Source`; bytes already written stay written.
    pub async fn encode<W>(self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let MultipartEncoder { boundary, fields } = self;
        let mut written = 0u64;
        for (name, value) in fields {
            let head = part_head(&boundary, &name, &value);
            written += put(sink, head.as_bytes()).await?;
            match value {
                FieldValue::Text(s) => {
                    log::trace!("multipart: text field {:?} ({} bytes)", name, s.len());
                    written += put(sink, s.as_bytes()).await?;
                }
                FieldValue::Json(v) => {
                    let s = match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    log::trace!("multipart: json field {:?} ({} bytes)", name, s.len());
                    written += put(sink, s.as_bytes()).await?;
                }
                FieldValue::File(mut part) => {
                    let n = drain(&name, part.source_mut(), sink).await?;
                    log::trace!("multipart: file field {:?} {:?} ({} bytes)", name, part.filename(), n);
                    written += n;
                }
            }
            written += put(sink, b"\r\n").await?;
        }
        written += put(sink, format!("--{}--\r\n", boundary).as_bytes()).await?;
        sink.flush().await?;
        Ok(written)
    }
}

fn part_head(boundary: &str, name: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::File(part) => format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            boundary,
            quote(name),
            quote(part.filename()),
            part.mime_type()
        ),
        _ => format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
            boundary,
            quote(name)
        ),
    }
}

/// Escape for a quoted-string parameter value.
fn quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

async fn put<W>(sink: &mut W, data: &[u8]) -> Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    sink.write_all(data).await?;
    Ok(data.len() as u64)
}

/// Copy a byte-source to the sink, keeping read and write failures apart.
async fn drain<W>(field: &str, source: &mut ByteSource, sink: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf).await {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(HttpError::Source {
                    field: field.to_string(),
                    source: e,
                })
            }
        };
        sink.write_all(&buf[..n]).await?;
        total += n as u64;
    }
}

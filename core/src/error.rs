/*
 * error.rs
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

//! Request errors: process failures, byte-source failures and HTTP status failures.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::protocol::http::Response;

/// Errors from a request issued through the transport process.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The transport process could not be started (missing binary, permissions).
    #[error("failed to start transport {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transport process ran but exited unsuccessfully. `code` is None when killed by a signal.
    #[error("transport exited with {}: {stderr}", exit_label(.code))]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// Reading the byte-source of a multipart file field failed.
    #[error("failed to read multipart field \"{field}\": {source}")]
    Source {
        field: String,
        #[source]
        source: io::Error,
    },

    /// Pipe I/O with the transport process failed.
    #[error("transport i/o error: {0}")]
    Io(#[from] io::Error),

    /// The exchange completed but the final status is outside 2xx.
    #[error(transparent)]
    Status(Box<StatusError>),

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A header name or value contains a line break and cannot be passed to the transport.
    #[error("invalid header {0:?}: contains CR or LF")]
    InvalidHeader(String),

    /// A caller-supplied multipart boundary is not valid per RFC 2046.
    #[error("invalid multipart boundary: {0:?}")]
    InvalidBoundary(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

impl HttpError {
    /// The parsed response of an HTTP status failure.
    pub fn response(&self) -> Option<&Response> {
        match self {
            HttpError::Status(e) => Some(&e.response),
            _ => None,
        }
    }

    /// Status code of an HTTP status failure.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

impl From<StatusError> for HttpError {
    fn from(e: StatusError) -> Self {
        HttpError::Status(Box::new(e))
    }
}

/// Non-2xx outcome. Carries the fully assembled response so the body and headers stay inspectable.
#[derive(Debug)]
pub struct StatusError {
    pub message: String,
    pub response: Response,
}

impl StatusError {
    pub fn new(response: Response) -> Self {
        Self {
            message: format!("Request failed with status code {}", response.status),
            response,
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StatusError {}

pub type Result<T> = std::result::Result<T, HttpError>;

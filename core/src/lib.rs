/*
 * lib.rs
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

//! Corriere core: HTTP requests issued through an external transport process.
//!
//! The transport (curl by default) performs the network exchange. This crate builds its
//! command line, streams request bodies into it, and assembles a typed response from its output.
//!
//! ```no_run
//! use corriere_core::{get, RequestConfig};
//!
//! # async fn demo() -> corriere_core::Result<()> {
//! let response = get("https://example.test/items", RequestConfig::new()).await?;
//! println!("{} {:?}", response.status, response.data);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod uri;

pub use config::TransportConfig;
pub use error::{HttpError, Result, StatusError};
pub use protocol::http::client::{get, post, put};
pub use protocol::http::{
    Body, FieldValue, FilePart, Form, HeaderMap, HttpClient, Method, RequestConfig,
    RequestDescriptor, Response, ResponseData, SentBody,
};

/*
 * client.rs
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

//! HTTP client: issue requests through the transport process. Each call spawns its own
//! process; nothing is shared between calls, so requests may run concurrently.

use super::request::{Method, RequestConfig};
use super::response::Response;
use super::transport::{execute, Invocation};
use crate::config::TransportConfig;
use crate::error::Result;

/// HTTP client. Holds only the transport configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: TransportConfig,
}

impl HttpClient {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Client configured from `CORRIERE_TRANSPORT` / `CORRIERE_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::new(TransportConfig::from_env())
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Issue a request. Resolves to the final response for 2xx statuses; fails with
    /// `HttpError::Status` (response attached) otherwise, or with a process/transport error.
    pub async fn request(&self, method: Method, url: &str, config: RequestConfig) -> Result<Response> {
        execute(Invocation::prepare(&self.config, method, url, config)?).await
    }

    pub async fn get(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::Get, url, config).await
    }

    pub async fn post(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::Post, url, config).await
    }

    pub async fn put(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::Put, url, config).await
    }

    pub async fn delete(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::Delete, url, config).await
    }

    pub async fn patch(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::Patch, url, config).await
    }

    pub async fn options(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::Options, url, config).await
    }
}

/// GET with the environment-configured transport.
pub async fn get(url: &str, config: RequestConfig) -> Result<Response> {
    HttpClient::from_env().get(url, config).await
}

/// POST with the environment-configured transport.
pub async fn post(url: &str, config: RequestConfig) -> Result<Response> {
    HttpClient::from_env().post(url, config).await
}

/// PUT with the environment-configured transport.
pub async fn put(url: &str, config: RequestConfig) -> Result<Response> {
    HttpClient::from_env().put(url, config).await
}

/*
 * config.rs
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

//! Transport configuration: which program performs the exchange, the flags that always precede
//! the request arguments, and an optional deadline. Environment overrides are read on demand;
//! nothing here is global or mutable once a request starts.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the transport program (default `curl`).
pub const ENV_TRANSPORT: &str = "CORRIERE_TRANSPORT";
/// Environment variable with a request deadline in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "CORRIERE_TIMEOUT_MS";

const DEFAULT_PROGRAM: &str = "curl";

/// Silent, but still report errors on stderr; include the response head in the output.
const DEFAULT_FLAGS: &[&str] = &["-s", "-S", "-i"];

/// How to invoke the transport process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Program to execute (looked up on PATH when not absolute).
    pub program: PathBuf,
    /// Arguments placed before the method selector.
    pub flags: Vec<String>,
    /// Deadline for a whole request (spawn to exit). None waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            flags: DEFAULT_FLAGS.iter().map(|s| s.to_string()).collect(),
            timeout: None,
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `CORRIERE_TRANSPORT` and `CORRIERE_TIMEOUT_MS` applied when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(program) = lookup(ENV_TRANSPORT).filter(|s| !s.trim().is_empty()) {
            config.program = PathBuf::from(program.trim());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => {}
                Ok(ms) => config.timeout = Some(Duration::from_millis(ms)),
                Err(_) => log::warn!("ignoring {}={:?}: not a number of milliseconds", ENV_TIMEOUT_MS, raw),
            }
        }
        config
    }

    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Replace the leading flags.
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Append one leading flag.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_curl_with_head_in_output() {
        let c = TransportConfig::default();
        assert_eq!(c.program, PathBuf::from("curl"));
        assert_eq!(c.flags, vec!["-s", "-S", "-i"]);
        assert!(c.timeout.is_none());
    }

    #[test]
    fn lookup_overrides_program_and_timeout() {
        let c = TransportConfig::from_lookup(|k| match k {
            ENV_TRANSPORT => Some("/opt/curl/bin/curl".to_string()),
            ENV_TIMEOUT_MS => Some("2500".to_string()),
            _ => None,
        });
        assert_eq!(c.program, PathBuf::from("/opt/curl/bin/curl"));
        assert_eq!(c.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn bad_timeout_is_ignored() {
        let c = TransportConfig::from_lookup(|k| (k == ENV_TIMEOUT_MS).then(|| "soon".to_string()));
        assert!(c.timeout.is_none());
        let c = TransportConfig::from_lookup(|k| (k == ENV_TIMEOUT_MS).then(|| "0".to_string()));
        assert!(c.timeout.is_none());
    }

    #[test]
    fn builder_setters() {
        let c = TransportConfig::new()
            .program("sh")
            .flags(["-c", "exit 0"])
            .flag("fake")
            .timeout(Duration::from_secs(1));
        assert_eq!(c.program, PathBuf::from("sh"));
        assert_eq!(c.flags, vec!["-c", "exit 0", "fake"]);
        assert_eq!(c.timeout, Some(Duration::from_secs(1)));
    }
}

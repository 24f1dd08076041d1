/*
 * status.rs
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

//! Status line: `HTTP/1.1 200 OK`. Transports print `HTTP/2 200` for h2, so the minor version is optional.

/// Parsed status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Protocol version as printed, e.g. "1.1" or "2".
    pub version: String,
    pub code: u16,
    /// Reason phrase; empty when absent.
    pub reason: String,
}

/// Parse `HTTP/<d>[.<d>] <3 digits>[ <reason>]`. Returns None for anything else.
pub fn parse_status_line(line: &str) -> Option<StatusLine> {
    let rest = line.strip_prefix("HTTP/")?;
    let (version, rest) = rest.split_once(' ')?;
    if !is_version(version) {
        return None;
    }
    let (code, reason) = match rest.split_once(' ') {
        Some((c, r)) => (c, r),
        None => (rest, ""),
    };
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code = code.parse::<u16>().ok()?;
    Some(StatusLine {
        version: version.to_string(),
        code,
        reason: reason.trim().to_string(),
    })
}

fn is_version(v: &str) -> bool {
    let b = v.as_bytes();
    match b.len() {
        1 => b[0].is_ascii_digit(),
        3 => b[0].is_ascii_digit() && b[1] == b'.' && b[2].is_ascii_digit(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_status_line() {
        let s = parse_status_line("HTTP/1.1 404 Not Found").unwrap();
        assert_eq!(s.version, "1.1");
        assert_eq!(s.code, 404);
        assert_eq!(s.reason, "Not Found");
    }

    #[test]
    fn missing_reason_is_empty() {
        let s = parse_status_line("HTTP/1.0 204").unwrap();
        assert_eq!(s.code, 204);
        assert_eq!(s.reason, "");
    }

    #[test]
    fn h2_style_version() {
        let s = parse_status_line("HTTP/2 200 ").unwrap();
        assert_eq!(s.version, "2");
        assert_eq!(s.code, 200);
        assert_eq!(s.reason, "");
    }

    #[test]
    fn malformed_lines_do_not_match() {
        for line in [
            "",
            "200 OK",
            "HTTP/1.1",
            "HTTP/1.1 20 OK",
            "HTTP/1.1 2000 OK",
            "HTTP/11 200 OK",
            "HTTP/x.y 200 OK",
            "http/1.1 200 OK",
            "Content-Type: text/plain",
        ] {
            assert!(parse_status_line(line).is_none(), "{:?}", line);
        }
    }
}

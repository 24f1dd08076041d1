/*
 * uri.rs
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

//! Request URL encoding before the URL is handed to the transport. Whole-URL encoding: URI
//! delimiters (: / ? # [ ] @ and sub-delims) survive, everything unsafe or non-ASCII is escaped.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in a full URL. Brackets are escaped too, so IPv6 literals must already be encoded.
const URL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a URL for the transport command line. `%` itself is escaped, so callers pass
/// URLs in decoded form.
pub fn encode_url(url: &str) -> String {
    utf8_percent_encode(url, URL).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_delimiters() {
        let u = "https://user@example.test:8443/a/b?x=1&y=2;z=3#frag";
        assert_eq!(encode_url(u), u);
    }

    #[test]
    fn escapes_space_and_non_ascii() {
        assert_eq!(
            encode_url("https://example.test/caffè latte"),
            "https://example.test/caff%C3%A8%20latte"
        );
    }

    #[test]
    fn escapes_percent_and_braces() {
        assert_eq!(encode_url("http://h/{id}?q=100%"), "http://h/%7Bid%7D?q=100%25");
    }
}

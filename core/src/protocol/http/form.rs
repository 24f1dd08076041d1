/*
 * form.rs
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

//! Form field mapping: ordered name → value, where a value is text, a JSON value, or a file.

use std::fmt;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use tokio::io::AsyncRead;

/// Sequentially readable content of a file field.
pub type ByteSource = Box<dyn AsyncRead + Send + Unpin>;

/// A file field: basename, optional explicit content type, and the byte-source to drain.
pub struct FilePart {
    filename: String,
    content_type: Option<String>,
    source: ByteSource,
}

impl FilePart {
    /// Wrap any async reader. Only the basename of `filename` is sent.
    pub fn new<R>(filename: impl AsRef<str>, source: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            filename: basename(filename.as_ref()),
            content_type: None,
            source: Box::new(source),
        }
    }

    /// Open a file for streaming. The file is read lazily while the request body is sent.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");
        Ok(Self::new(name, file))
    }

    /// Override the content type sniffed from the filename.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or_else(|| mime_from_extension(&self.filename))
    }

    pub(crate) fn source_mut(&mut self) -> &mut ByteSource {
        &mut self.source
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("filename", &self.filename)
            .field("content_type", &self.mime_type())
            .finish_non_exhaustive()
    }
}

fn basename(name: &str) -> String {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("file")
        .to_string()
}

/// Value of one form field.
#[derive(Debug)]
pub enum FieldValue {
    Text(String),
    /// Structured value; sent as its JSON text.
    Json(Value),
    File(FilePart),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Json(other),
        }
    }
}

impl From<FilePart> for FieldValue {
    fn from(p: FilePart) -> Self {
        FieldValue::File(p)
    }
}

/// Ordered field mapping. Setting an existing name replaces its value in place.
#[derive(Debug, Default)]
pub struct Form {
    fields: Vec<(String, FieldValue)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, FieldValue::Text(value.into()))
    }

    /// Structured field; a JSON string is stored as text.
    pub fn json(self, name: impl Into<String>, value: Value) -> Self {
        self.field(name, FieldValue::from(value))
    }

    pub fn file(self, name: impl Into<String>, part: FilePart) -> Self {
        self.field(name, FieldValue::File(part))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|slot| slot.0 == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|slot| slot.0 == name).map(|slot| &slot.1)
    }

    pub fn has_files(&self) -> bool {
        self.fields.iter().any(|(_, v)| matches!(v, FieldValue::File(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object of the fields, or None when a file field is present.
    pub fn to_json(&self) -> Option<Value> {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            let v = match value {
                FieldValue::Text(s) => Value::String(s.clone()),
                FieldValue::Json(v) => v.clone(),
                FieldValue::File(_) => return None,
            };
            map.insert(name.clone(), v);
        }
        Some(Value::Object(map))
    }

    pub(crate) fn into_fields(self) -> Vec<(String, FieldValue)> {
        self.fields
    }
}

/// Content type for a filename, by extension (case-insensitive). Unknown → application/octet-stream.
pub fn mime_from_extension(filename: &str) -> &'static str {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return "application/octet-stream",
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

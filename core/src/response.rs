use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use crate::config::ConfigProvider;
use crate::errors::UNEXPECTED_HTTP_ERROR;
use crate::telemetry::Diagnostics;

pub const STATUS_OK: u16 = 200;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

pub const CORS_ALLOWED_HEADERS: &str = "Content-Type";
pub const CORS_ALLOWED_METHODS: &str = "OPTIONS,GET,POST,PUT,DELETE";

/// API Gateway proxy response. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Always a valid JSON document.
    pub body: String,
}

impl ApiResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// Serializes bodies and attaches the fixed header set.
#[derive(Clone)]
pub struct ResponseBuilder {
    config: Arc<dyn ConfigProvider>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ResponseBuilder {
    pub fn new(config: Arc<dyn ConfigProvider>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    pub fn ok<T: Serialize + ?Sized>(&self, body: &T) -> ApiResponse {
        self.build(body, STATUS_OK)
    }

    /// Never fails: a body that cannot be serialized becomes a 500 with a
    /// fixed error payload.
    pub fn build<T: Serialize + ?Sized>(&self, body: &T, status_code: u16) -> ApiResponse {
        let (body, status_code) = match to_json(body) {
            Ok(body) => (body, status_code),
            Err(e) => {
                self.diagnostics.serialization_failed(&e.to_string());
                (
                    format!(r#"{{"error": "{}"}}"#, UNEXPECTED_HTTP_ERROR),
                    STATUS_INTERNAL_SERVER_ERROR,
                )
            }
        };

        ApiResponse {
            status_code,
            headers: self.headers(),
            body,
        }
    }

    fn headers(&self) -> BTreeMap<String, String> {
        let domain = self.config.docs_domain().unwrap_or_else(|| {
            self.diagnostics.domain_missing();
            String::new()
        });

        BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Access-Control-Allow-Headers".to_string(),
                CORS_ALLOWED_HEADERS.to_string(),
            ),
            (
                "Access-Control-Allow-Origin".to_string(),
                format!("https://{}", domain),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                CORS_ALLOWED_METHODS.to_string(),
            ),
        ])
    }
}

/// Spaced separators and `\uXXXX` escapes for non-ASCII text, so bodies read
/// `{"message": "Hello, John!"}` like the rest of the API's documents.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serializes `body` with [`SpacedFormatter`].
pub fn to_json<T: Serialize + ?Sized>(body: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    body.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}

//! sing-box rule-set source documents.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::{Error, Result};

/// A single headless rule matching one IP or CIDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpCidrRule {
    pub ip_cidr: String,
}

/// Rule-set source document, as read by `sing-box rule-set compile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub rules: Vec<IpCidrRule>,
}

impl SourceDocument {
    /// Wrap each address in an `ip_cidr` rule, preserving order.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: addresses
                .into_iter()
                .map(|ip_cidr| IpCidrRule {
                    ip_cidr: ip_cidr.into(),
                })
                .collect(),
        }
    }

    /// Number of rules in the document.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the document holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serialize as a single-line JSON string.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Serialize as UTF-8 JSON into a writer.
    ///
    /// Non-ASCII text is written as-is, not `\u` escaped.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut ser = serde_json::Serializer::with_formatter(writer, SpacedFormatter);
        self.serialize(&mut ser)?;
        Ok(())
    }
}

/// Single-line formatter with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

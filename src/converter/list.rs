//! Plaintext CIDR list parser.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::{Error, Result};

/// Ordered address entries read from one list file.
pub type AddressList = Vec<String>;

/// Plaintext list parser.
///
/// One address per line. Blank lines and lines starting with `#` or `//`
/// (after trimming) are skipped; everything else is kept trimmed, in order.
///
/// # Examples
/// ```
/// use srs_build::converter::ListReader;
///
/// let text = "# lan\n10.0.0.0/8\n\n// v6\nfc00::/7\n";
/// let list = ListReader::parse(text.as_bytes()).unwrap();
/// assert_eq!(list, vec!["10.0.0.0/8", "fc00::/7"]);
/// ```
pub struct ListReader;

impl ListReader {
    /// Parse addresses from a reader.
    pub fn parse<R: Read>(reader: R) -> Result<AddressList> {
        let mut addresses = AddressList::new();
        let buf_reader = BufReader::new(reader);

        for line in buf_reader.lines() {
            let line = line?;

            // A lone CR also ends a line
            for part in line.split('\r') {
                if let Some(entry) = address_entry(part) {
                    addresses.push(entry.to_string());
                }
            }
        }

        Ok(addresses)
    }

    /// Read and parse a list file.
    pub fn read_file(path: impl AsRef<Path>) -> Result<AddressList> {
        let path = path.as_ref();
        let read_err = |source| Error::ReadList {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(read_err)?;
        let addresses = Self::parse(file).map_err(|e| match e {
            Error::Io(source) => read_err(source),
            other => other,
        })?;

        log::debug!("Read {} entries from {:?}", addresses.len(), path);
        Ok(addresses)
    }
}

/// Return the trimmed entry for a line, or `None` for blanks and comments.
fn address_entry(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || is_comment(line) {
        return None;
    }
    Some(line)
}

/// Comment detection is prefix-only.
fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

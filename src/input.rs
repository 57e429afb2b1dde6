//! Reading the eight raw values.
//!
//! Two encodings are understood:
//!
//! - **Digits** (default): a text file where each ASCII digit is one value
//!   `0..=9`. Whitespace (such as a trailing newline) is ignored; any other
//!   character is rejected. Multi-digit numbers are not supported: `12` is
//!   the two values `1` and `2`.
//! - **Bytes**: each raw byte is one value `0..=255`, the format produced by
//!   `dd if=/dev/urandom bs=1 count=8 of=numbers`.
//!
//! Either way the source must yield exactly [`RAW_INPUTS`] values.

use crate::error::{OemsError, Result, ResultExt};
use crate::network::{Value, RAW_INPUTS};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// How the input file encodes values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Digits,
    Bytes,
}

/// Decode raw input bytes into exactly [`RAW_INPUTS`] values.
pub fn parse_values(bytes: &[u8], format: InputFormat) -> Result<Vec<Value>> {
    let values: Vec<Value> = match format {
        InputFormat::Digits => bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_ascii_whitespace())
            .map(|(offset, &b)| {
                if b.is_ascii_digit() {
                    Ok(Value::from(b - b'0'))
                } else {
                    Err(OemsError::InputSource(format!(
                        "byte {:#04x} at offset {} is not a digit",
                        b, offset
                    )))
                }
            })
            .collect::<Result<_>>()?,
        InputFormat::Bytes => bytes.iter().map(|&b| Value::from(b)).collect(),
    };

    if values.len() != RAW_INPUTS {
        return Err(OemsError::InputSource(format!(
            "expected {} values, found {}",
            RAW_INPUTS,
            values.len()
        )));
    }
    Ok(values)
}

/// Read and decode all of `reader`.
pub fn read_values<R: Read>(mut reader: R, format: InputFormat) -> Result<Vec<Value>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| OemsError::InputSource(format!("failed to read input: {}", e)))?;
    parse_values(&bytes, format)
}

/// Read and decode the file at `path`.
pub fn read_values_from_path(path: impl AsRef<Path>, format: InputFormat) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        OemsError::InputSource(format!("failed to read input file {:?}: {}", path, e))
    })?;
    let values =
        parse_values(&bytes, format).with_context(|| format!("input file {:?}", path))?;
    tracing::debug!("Read {} values from {:?}", values.len(), path);
    Ok(values)
}

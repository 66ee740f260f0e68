//! Front-matter splitting and metadata parsing

use serde_yaml::Value;
use thiserror::Error;

use super::item::Metadata;

/// Ways a metadata block can fail to parse
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front-matter fence `---` is never closed")]
    UnterminatedFence,
    #[error("metadata is not a key-value mapping (found {found})")]
    NotAMapping { found: &'static str },
    #[error("metadata is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a file into its metadata block and body.
///
/// Two layouts are recognized, decided by the first non-blank line:
/// a `---` fence opens a block that runs to the next `---` line,
/// with the body after it; otherwise the metadata block is every
/// line up to the first blank line, with the body after that. A
/// file with no blank line at all is one big body block with no
/// metadata.
pub fn split(text: &str) -> Result<(&str, &str), FrontMatterError> {
    // Leading blank lines do not hide a fence
    let mut fence_start = 0;
    let mut first_line = "";
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            fence_start += line.len();
            continue;
        }
        first_line = line;
        break;
    }

    if first_line.trim_end() == "---" {
        let rest = &text[fence_start + first_line.len()..];
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                return Ok((&rest[..offset], &rest[offset + line.len()..]));
            }
            offset += line.len();
        }
        return Err(FrontMatterError::UnterminatedFence);
    }

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            return Ok((&text[..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    Ok(("", text))
}

/// Parses a raw metadata block into a [`Metadata`] mapping
pub trait MetaParse: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Metadata, FrontMatterError>;
}

/// YAML metadata blocks, the stock format
pub struct YamlMeta;

impl MetaParse for YamlMeta {
    fn parse(&self, raw: &str) -> Result<Metadata, FrontMatterError> {
        if raw.trim().is_empty() {
            return Ok(Metadata::new());
        }
        match serde_yaml::from_str::<Value>(raw)? {
            Value::Mapping(mapping) => Ok(Metadata::from(mapping)),
            // A block of only comments parses to null
            Value::Null => Ok(Metadata::new()),
            other => Err(FrontMatterError::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

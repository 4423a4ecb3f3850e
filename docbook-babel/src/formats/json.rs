//! JSON dump of a converted document
//!
//! The [`Document`] serialized with `serde_json`: node kinds are tagged with a
//! `type` field, empty `ids`, `classes` and `children` are left out.

use crate::error::ConvertError;
use crate::format::Format;
use crate::ir::nodes::Document;

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Output tree as pretty-printed JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn serialize(&self, doc: &Document) -> Result<String, ConvertError> {
        serde_json::to_string_pretty(doc).map_err(|e| ConvertError::Serialization(e.to_string()))
    }
}

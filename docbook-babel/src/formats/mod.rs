//! Built-in inspection formats

pub mod json;
pub mod pseudoxml;

//! Single-document conversion

mod bridge;
mod documents;
mod passthrough;

//! Output tree produced by the conversion.
//!
//! This module defines the renderer agnostic representation handed over to
//! rendering backends: a tree of [`nodes::OutputNode`] rooted in a
//! [`nodes::Document`].

pub mod nodes;

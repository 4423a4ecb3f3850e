//! Per-conversion context
//!
//! State splits in three lifetimes:
//!
//! - scoped state lives in a [`Frame`]. A handler that changes it pushes a new
//!   frame for the duration of its subtree (see `Converter::with_frame`); the
//!   frame is popped when the subtree returns, errors included, so siblings
//!   never observe it;
//! - one-shot state (pending anchors, the next-text transform) is taken by the
//!   first consumer and is gone afterwards;
//! - the deferred buffer holds footnote bodies of the block being converted.
//!   Every block opens its own buffer scope and flushes it after itself.

use crate::ir::nodes::OutputNode;

/// How a `title` child is rendered in the current scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleHandler {
    /// Title of the enclosing section; only the first title is used.
    Section,
    /// Free-standing heading (sidebars, formal paragraphs, equations).
    Rubric,
}

/// A text rewrite applied to exactly one text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    /// Remove a bullet glyph baked into the text, plus the spaces after it.
    StripBullet(char),
    /// Collapse runs of whitespace into a single space.
    CollapseWhitespace,
}

impl TextTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::StripBullet(bullet) => {
                match text.trim_start().strip_prefix(bullet) {
                    Some(rest) => rest.trim_start().to_string(),
                    None => text.to_string(),
                }
            }
            TextTransform::CollapseWhitespace => {
                let mut out = String::with_capacity(text.len());
                let mut in_space = false;
                for c in text.chars() {
                    if c.is_whitespace() {
                        if !in_space {
                            out.push(' ');
                        }
                        in_space = true;
                    } else {
                        out.push(c);
                        in_space = false;
                    }
                }
                out
            }
        }
    }
}

/// Scoped conversion state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Section nesting level seen by the children.
    pub level: usize,
    pub title: Option<TitleHandler>,
    /// Transform each list item applies to its first text.
    pub item_transform: Option<TextTransform>,
    /// Number of enclosing ordered lists.
    pub ordered_depth: usize,
}

/// Deferred nodes saved by [`ConversionContext::begin_block`].
#[must_use = "a deferred scope has to be closed with end_block"]
#[derive(Debug)]
pub struct DeferredScope(Vec<OutputNode>);

#[derive(Debug)]
pub struct ConversionContext {
    tags: Vec<String>,
    frame: Frame,
    saved_frames: Vec<Frame>,
    anchors: Vec<String>,
    text_transform: Option<TextTransform>,
    deferred: Vec<OutputNode>,
}

impl ConversionContext {
    pub fn new() -> Self {
        ConversionContext {
            tags: Vec::new(),
            frame: Frame::default(),
            saved_frames: Vec::new(),
            anchors: Vec::new(),
            text_transform: None,
            deferred: Vec::new(),
        }
    }

    pub fn push_tag(&mut self, tag: &str) {
        self.tags.push(tag.to_string());
    }

    pub fn pop_tag(&mut self) {
        self.tags.pop();
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// Local name of the parent of the element being converted.
    pub fn parent_tag(&self) -> Option<&str> {
        let len = self.tags.len();
        if len < 2 {
            return None;
        }
        Some(self.tags[len - 2].as_str())
    }

    /// `/`-joined path of open elements, for diagnostics.
    pub fn path(&self) -> String {
        self.tags.join("/")
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn push_frame(&mut self, frame: Frame) {
        let outer = std::mem::replace(&mut self.frame, frame);
        self.saved_frames.push(outer);
    }

    /// Restore the enclosing frame. The base frame is never popped.
    pub fn pop_frame(&mut self) {
        if let Some(outer) = self.saved_frames.pop() {
            self.frame = outer;
        }
    }

    pub fn frame_depth(&self) -> usize {
        self.saved_frames.len() + 1
    }

    pub fn queue_anchor(&mut self, id: String) {
        self.anchors.push(id);
    }

    pub fn take_anchors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.anchors)
    }

    pub fn set_text_transform(&mut self, transform: Option<TextTransform>) {
        self.text_transform = transform;
    }

    pub fn take_text_transform(&mut self) -> Option<TextTransform> {
        self.text_transform.take()
    }

    pub fn defer(&mut self, node: OutputNode) {
        self.deferred.push(node);
    }

    /// Open a buffer scope for a block; nodes deferred until the matching
    /// [`end_block`](Self::end_block) belong to that block.
    pub fn begin_block(&mut self) -> DeferredScope {
        DeferredScope(std::mem::take(&mut self.deferred))
    }

    /// Close a block's buffer scope and return the nodes it deferred.
    pub fn end_block(&mut self, scope: DeferredScope) -> Vec<OutputNode> {
        std::mem::replace(&mut self.deferred, scope.0)
    }

    /// Drain whatever is still deferred (footnotes outside any block).
    pub fn take_deferred(&mut self) -> Vec<OutputNode> {
        std::mem::take(&mut self.deferred)
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new()
    }
}

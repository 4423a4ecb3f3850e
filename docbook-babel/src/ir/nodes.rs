//! Core data structures of the output tree.
//!
//! The output tree is renderer agnostic: it fixes the node vocabulary and the
//! structure, nothing about presentation. Nodes own their children; the only
//! way the same content appears twice is an explicit deep copy (see the
//! assembly resolver).

use serde::Serialize;
use std::fmt;

/// Identifier of a document inside a build: its path relative to the project
/// root, `/`-separated, without extension (`guide/intro`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part of the id (`guide` for `guide/intro`, empty at top level).
    pub fn parent_dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId(id.to_string())
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

/// A converted document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    /// Plain text of the first title in the tree, possibly inherited from the
    /// top resource of an assembly.
    pub title: Option<String>,
    pub long_title: Option<String>,
    pub root: OutputNode,
}

impl Document {
    pub fn new(id: DocId) -> Self {
        Document {
            id,
            title: None,
            long_title: None,
            root: OutputNode::new(NodeKind::Root),
        }
    }

    /// Fill `title`/`long_title` from the first title node of the tree.
    pub fn note_title(&mut self) {
        let title = self
            .root
            .find(&|node| node.kind == NodeKind::Title)
            .map(|node| node.astext());
        self.long_title = title.clone();
        self.title = title;
    }
}

/// Admonition flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Admonition {
    Note,
    Caution,
    Important,
    Tip,
    Warning,
}

impl Admonition {
    pub fn as_str(self) -> &'static str {
        match self {
            Admonition::Note => "note",
            Admonition::Caution => "caution",
            Admonition::Important => "important",
            Admonition::Tip => "tip",
            Admonition::Warning => "warning",
        }
    }
}

/// Numbering style of an enumerated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumType {
    Arabic,
    LowerAlpha,
}

impl EnumType {
    pub fn as_str(self) -> &'static str {
        match self {
            EnumType::Arabic => "arabic",
            EnumType::LowerAlpha => "loweralpha",
        }
    }
}

/// What an API description documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiObjType {
    Function,
    Type,
}

impl ApiObjType {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiObjType::Function => "function",
            ApiObjType::Type => "type",
        }
    }
}

/// One line of a navigation node: the entry title and the document it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub title: String,
    pub document: DocId,
}

/// The node vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Section { level: usize },
    Title,
    Rubric,
    Paragraph,
    Compound,
    BlockQuote,
    Epigraph,
    Sidebar,
    Admonition { admonition: Admonition },
    LiteralBlock,
    MathBlock,
    BulletList { bullet: String },
    EnumeratedList {
        enumtype: EnumType,
        prefix: String,
        suffix: String,
    },
    ListItem,
    DefinitionList,
    DefinitionListItem,
    Term,
    Definition,
    Inline,
    Emphasis,
    Strong,
    Literal,
    Subscript,
    Superscript,
    Abbreviation,
    Reference {
        refid: Option<String>,
        refuri: Option<String>,
    },
    Footnote,
    FootnoteReference { refid: String },
    Comment { text: String },
    Text { text: String },
    /// Stand-in for the content of another document, replaced in phase 2.
    Placeholder { target: DocId, resource: String },
    Navigation { entries: Vec<NavEntry>, hidden: bool },
    /// Reference entry of one API object: a signature and its content.
    ApiDescription {
        domain: String,
        objtype: Option<ApiObjType>,
    },
    Signature,
    SignatureType,
    SignatureName,
    ParameterList,
    Parameter,
    ApiContent,
}

impl NodeKind {
    /// Structural nodes whose direct children are other blocks; text between
    /// those children is layout, not content.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Root
                | NodeKind::Section { .. }
                | NodeKind::Compound
                | NodeKind::BlockQuote
                | NodeKind::Epigraph
                | NodeKind::Sidebar
                | NodeKind::Admonition { .. }
                | NodeKind::BulletList { .. }
                | NodeKind::EnumeratedList { .. }
                | NodeKind::ListItem
                | NodeKind::DefinitionList
                | NodeKind::DefinitionListItem
                | NodeKind::Definition
                | NodeKind::Footnote
                | NodeKind::ApiDescription { .. }
                | NodeKind::Signature
                | NodeKind::ParameterList
        )
    }

    /// Name used by the inspection formats.
    pub fn tag_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "document",
            NodeKind::Section { .. } => "section",
            NodeKind::Title => "title",
            NodeKind::Rubric => "rubric",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Compound => "compound",
            NodeKind::BlockQuote => "block_quote",
            NodeKind::Epigraph => "epigraph",
            NodeKind::Sidebar => "sidebar",
            NodeKind::Admonition { admonition } => admonition.as_str(),
            NodeKind::LiteralBlock => "literal_block",
            NodeKind::MathBlock => "math_block",
            NodeKind::BulletList { .. } => "bullet_list",
            NodeKind::EnumeratedList { .. } => "enumerated_list",
            NodeKind::ListItem => "list_item",
            NodeKind::DefinitionList => "definition_list",
            NodeKind::DefinitionListItem => "definition_list_item",
            NodeKind::Term => "term",
            NodeKind::Definition => "definition",
            NodeKind::Inline => "inline",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Literal => "literal",
            NodeKind::Subscript => "subscript",
            NodeKind::Superscript => "superscript",
            NodeKind::Abbreviation => "abbreviation",
            NodeKind::Reference { .. } => "reference",
            NodeKind::Footnote => "footnote",
            NodeKind::FootnoteReference { .. } => "footnote_reference",
            NodeKind::Comment { .. } => "comment",
            NodeKind::Text { .. } => "#text",
            NodeKind::Placeholder { .. } => "placeholder",
            NodeKind::Navigation { .. } => "navigation",
            NodeKind::ApiDescription { .. } => "desc",
            NodeKind::Signature => "desc_signature",
            NodeKind::SignatureType => "desc_type",
            NodeKind::SignatureName => "desc_name",
            NodeKind::ParameterList => "desc_parameterlist",
            NodeKind::Parameter => "desc_parameter",
            NodeKind::ApiContent => "desc_content",
        }
    }
}

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputNode {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutputNode>,
}

impl OutputNode {
    pub fn new(kind: NodeKind) -> Self {
        OutputNode {
            kind,
            ids: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text { text: text.into() })
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment { text: text.into() })
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_child(mut self, child: OutputNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: OutputNode) {
        self.children.push(child);
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Concatenated text of all text leaves below this node.
    pub fn astext(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeKind::Text { text } = &self.kind {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// First node (pre-order, self included) matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&OutputNode) -> bool) -> Option<&OutputNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// All nodes (pre-order, self included) matching `pred`.
    pub fn find_all<'n>(&'n self, pred: &dyn Fn(&OutputNode) -> bool) -> Vec<&'n OutputNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if pred(node) {
                found.push(node);
            }
        });
        found
    }

    /// Pre-order traversal.
    pub fn walk<'n>(&'n self, visit: &mut dyn FnMut(&'n OutputNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

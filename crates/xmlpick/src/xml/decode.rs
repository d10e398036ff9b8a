//! XML text to tree decoding

use tracing::instrument;

use crate::error::Result;
use crate::tree::{Mapping, Node, Sequence, TEXT_KEY};
use crate::xml::model::{Document, Element};
use crate::xml::parser::Parser;

/// Decoding limits and text handling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum element nesting depth, self-closing elements included
    /// (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
    /// Trim surrounding whitespace from character data
    pub trim_text: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
            trim_text: false,
        }
    }
}

impl DecodeOptions {
    /// Options with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            trim_text: false,
        }
    }

    /// Options with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
            trim_text: false,
        }
    }

    pub const fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }
}

/// Decode XML text with default options
pub fn decode(text: &str) -> Result<Node> {
    decode_with_options(text, &DecodeOptions::default())
}

/// Decode XML text into a mapping holding the root element under its name
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn decode_with_options(text: &str, options: &DecodeOptions) -> Result<Node> {
    let document = Parser::with_options(text.as_bytes(), options).parse()?;
    Ok(document_to_node(&document, options))
}

/// Convert a parsed document into a tree
pub fn document_to_node(document: &Document, options: &DecodeOptions) -> Node {
    let mut root = Mapping::with_capacity(1);
    root.insert(
        document.root.name.as_str(),
        element_to_node(&document.root, options),
    );
    Node::Mapping(root)
}

fn element_to_node(element: &Element, options: &DecodeOptions) -> Node {
    let text = element.text();
    let text = if options.trim_text {
        text.trim().to_string()
    } else {
        text
    };

    if element.attributes.is_empty() && element.elements().next().is_none() {
        return Node::Scalar(text);
    }

    let mut mapping = Mapping::new();
    for (name, value) in &element.attributes {
        append(&mut mapping, name, Node::Scalar(value.clone()));
    }
    for child in element.elements() {
        append(&mut mapping, &child.name, element_to_node(child, options));
    }
    // text beside attributes or children loses its surrounding layout
    let text = text.trim();
    if !text.is_empty() {
        append(&mut mapping, TEXT_KEY, Node::Scalar(text.to_string()));
    }

    Node::Mapping(mapping)
}

/// Insert a child, folding repeated names into one sequence kept at the
/// position of the first occurrence
fn append(mapping: &mut Mapping, name: &str, node: Node) {
    match mapping.get_mut(name) {
        Some(Node::Sequence(items)) => items.push(node),
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = Node::Sequence(Sequence::new(vec![first, node]));
        }
        None => {
            mapping.insert(name, node);
        }
    }
}

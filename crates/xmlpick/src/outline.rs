//! Headless tree view
//!
//! Walks a tree in pre-order and yields one row per node with the path that
//! addresses it. Sequence items are titled with [`label`].
//!
//! A name containing `.`, `[` or `]` has no path form. Its row, and the rows
//! below it, carry no path instead of one that would name another node.

use crate::label::label;
use crate::path::Path;
use crate::tree::Node;

/// Walk limits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Number of levels to list (0 means unlimited)
    pub max_depth: usize,
}

impl OutlineOptions {
    pub const fn unlimited() -> Self {
        Self { max_depth: 0 }
    }

    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// What a row shows about its node
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum EntryKind {
    Mapping { len: usize },
    Sequence { len: usize },
    Scalar { value: String },
}

/// One row of the outline
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OutlineEntry {
    /// None when the node cannot be addressed by a path
    pub path: Option<Path>,
    pub depth: usize,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: EntryKind,
}

/// List the nodes of `tree` reachable within the depth limit
pub fn outline(tree: &Node, options: &OutlineOptions) -> Vec<OutlineEntry> {
    let mut walker = Walker {
        options,
        entries: Vec::new(),
    };
    if let Node::Mapping(mapping) = tree {
        for (name, node) in mapping {
            let path = addressable(name).then(|| Path::root(name.as_str()));
            walker.walk(path, name.clone(), node, 0, false);
        }
    }
    walker.entries
}

struct Walker<'o> {
    options: &'o OutlineOptions,
    entries: Vec<OutlineEntry>,
}

impl Walker<'_> {
    fn walk(&mut self, path: Option<Path>, title: String, node: &Node, depth: usize, item: bool) {
        let kind = match node {
            Node::Scalar(value) => EntryKind::Scalar {
                value: value.clone(),
            },
            Node::Mapping(mapping) => EntryKind::Mapping { len: mapping.len() },
            Node::Sequence(items) => EntryKind::Sequence {
                len: items.present_len(),
            },
        };
        self.entries.push(OutlineEntry {
            path: path.clone(),
            depth,
            title,
            kind,
        });

        if !self.descends(depth) {
            return;
        }

        match node {
            Node::Mapping(mapping) => {
                for (name, child) in mapping {
                    let child_path = path
                        .as_ref()
                        .filter(|_| addressable(name))
                        .map(|p| p.child(name.as_str()));
                    self.walk(child_path, name.clone(), child, depth + 1, false);
                }
            }
            // an item of an item has no path syntax
            Node::Sequence(items) if !item => {
                for (index, entry) in items.iter() {
                    let item_path = path.as_ref().map(|p| p.at(index));
                    self.walk(item_path, label(entry, index), entry, depth + 1, true);
                }
            }
            Node::Sequence(_) | Node::Scalar(_) => {}
        }
    }

    fn descends(&self, depth: usize) -> bool {
        self.options.max_depth == 0 || depth + 1 < self.options.max_depth
    }
}

/// True if `name` can appear as a path segment
fn addressable(name: &str) -> bool {
    !name.contains(['.', '[', ']'])
}

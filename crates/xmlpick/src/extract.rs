//! Minimal sub-tree extraction
//!
//! Selected paths are folded into a prefix trie which is then projected over
//! the source tree. Every projection step builds fresh nodes, so overlapping
//! paths never alias a shared accumulator. A path that does not resolve is
//! dropped without affecting the others.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::path::Path;
use crate::selection::SelectionSet;
use crate::tree::{Mapping, Node, Sequence};

/// Outcome of an extraction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted tree; always a mapping at the root
    pub tree: Node,
    /// Selected paths that resolved against the source
    pub resolved: Vec<Path>,
    /// Selected paths that did not resolve and contributed nothing
    pub skipped: Vec<Path>,
}

/// Build the minimal tree holding every selected node and its ancestors
pub fn extract(tree: &Node, selection: &SelectionSet) -> Node {
    extract_with_report(tree, selection).tree
}

/// Like [`extract`], also reporting which paths resolved
#[instrument(level = "debug", skip_all, fields(paths = selection.len()))]
pub fn extract_with_report(tree: &Node, selection: &SelectionSet) -> Extraction {
    let trie = Trie::build(selection);
    let mut report = Report::default();

    let root = match tree {
        Node::Mapping(mapping) => project_mapping(mapping, &trie, &mut report),
        other => {
            debug!(kind = other.kind_name(), "source root is not a mapping");
            trie.skip_children(&mut report);
            None
        }
    };

    debug!(
        resolved = report.resolved.len(),
        skipped = report.skipped.len(),
        "extraction finished"
    );

    Extraction {
        tree: Node::Mapping(root.unwrap_or_default()),
        resolved: report.resolved,
        skipped: report.skipped,
    }
}

#[derive(Default)]
struct Report {
    resolved: Vec<Path>,
    skipped: Vec<Path>,
}

/// Prefix trie of the selected paths
#[derive(Default)]
struct Trie<'p> {
    selected: Option<&'p Path>,
    fields: IndexMap<&'p str, Branch<'p>>,
}

/// Continuations below one child name: the bare name and its indexed items
#[derive(Default)]
struct Branch<'p> {
    plain: Option<Trie<'p>>,
    items: BTreeMap<usize, Trie<'p>>,
}

impl<'p> Trie<'p> {
    fn build(selection: &'p SelectionSet) -> Self {
        let mut root = Self::default();
        for path in selection {
            let mut node = &mut root;
            for segment in path.segments() {
                let branch = node.fields.entry(segment.name()).or_default();
                node = match segment.index() {
                    None => branch.plain.get_or_insert_with(Self::default),
                    Some(index) => branch.items.entry(index).or_default(),
                };
            }
            node.selected = Some(path);
        }
        root
    }

    fn skip(&self, report: &mut Report) {
        if let Some(path) = self.selected {
            debug!(%path, "selected path does not resolve, skipping");
            report.skipped.push(path.clone());
        }
        self.skip_children(report);
    }

    fn skip_children(&self, report: &mut Report) {
        for branch in self.fields.values() {
            branch.skip(report);
        }
    }
}

impl Branch<'_> {
    fn skip(&self, report: &mut Report) {
        if let Some(plain) = &self.plain {
            plain.skip(report);
        }
        for trie in self.items.values() {
            trie.skip(report);
        }
    }
}

fn project(node: &Node, trie: &Trie<'_>, report: &mut Report) -> Option<Node> {
    match trie.selected {
        Some(path) => {
            report.resolved.push(path.clone());
            // descendants are already inside the verbatim copy
            classify_children(node, trie, report);
            Some(node.clone())
        }
        None => project_children(node, trie, report),
    }
}

/// Sort the paths below `node` into resolved and skipped without building
/// anything. Mirrors the resolution rules of the projection
fn classify_children(node: &Node, trie: &Trie<'_>, report: &mut Report) {
    let Node::Mapping(mapping) = node else {
        trie.skip_children(report);
        return;
    };

    for (name, branch) in &trie.fields {
        let Some(child) = mapping.get(name) else {
            branch.skip(report);
            continue;
        };
        if let Some(plain) = &branch.plain {
            classify(child, plain, report);
        }
        for (&index, item_trie) in &branch.items {
            match child.as_sequence().and_then(|sequence| sequence.get(index)) {
                Some(item) => classify(item, item_trie, report),
                None => item_trie.skip(report),
            }
        }
    }
}

fn classify(node: &Node, trie: &Trie<'_>, report: &mut Report) {
    if let Some(path) = trie.selected {
        report.resolved.push(path.clone());
    }
    classify_children(node, trie, report);
}

fn project_children(node: &Node, trie: &Trie<'_>, report: &mut Report) -> Option<Node> {
    match node {
        Node::Mapping(mapping) => project_mapping(mapping, trie, report).map(Node::Mapping),
        Node::Scalar(_) | Node::Sequence(_) => {
            trie.skip_children(report);
            None
        }
    }
}

fn project_mapping(mapping: &Mapping, trie: &Trie<'_>, report: &mut Report) -> Option<Mapping> {
    let mut entries = Vec::with_capacity(trie.fields.len());

    for (name, branch) in &trie.fields {
        match mapping.get_full(name) {
            Some((position, key, child)) => {
                if let Some(node) = project_branch(child, branch, report) {
                    entries.push((position, key, node));
                }
            }
            None => branch.skip(report),
        }
    }

    if entries.is_empty() {
        return None;
    }

    // source order, independent of selection order
    entries.sort_by_key(|(position, _, _)| *position);
    Some(entries.into_iter().map(|(_, key, node)| (key, node)).collect())
}

fn project_branch(child: &Node, branch: &Branch<'_>, report: &mut Report) -> Option<Node> {
    let whole = branch
        .plain
        .as_ref()
        .and_then(|trie| project(child, trie, report));
    let items = if branch.items.is_empty() {
        None
    } else {
        project_items(child, &branch.items, report)
    };

    // a bare name only resolves into a sequence when the sequence itself is
    // selected, and then it already holds every item
    whole.or(items)
}

fn project_items(
    child: &Node,
    items: &BTreeMap<usize, Trie<'_>>,
    report: &mut Report,
) -> Option<Node> {
    let Node::Sequence(sequence) = child else {
        for trie in items.values() {
            trie.skip(report);
        }
        return None;
    };

    let mut slots: Vec<Option<Node>> = Vec::new();
    for (&index, trie) in items {
        let Some(item) = sequence.get(index) else {
            trie.skip(report);
            continue;
        };
        if let Some(node) = project(item, trie, report) {
            if slots.len() <= index {
                slots.resize(index + 1, None);
            }
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(node);
            }
        }
    }

    if slots.is_empty() {
        None
    } else {
        Some(Node::Sequence(Sequence::from_slots(slots)))
    }
}

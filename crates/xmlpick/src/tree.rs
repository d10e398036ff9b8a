//! Generic tree representation of a parsed XML document

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;

/// Key under which an element's character data is stored when the element
/// also carries attributes or child elements
pub const TEXT_KEY: &str = "#text";

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Node {
    /// Leaf text value, never type-coerced
    Scalar(String),
    /// Named children in document order
    Mapping(Mapping),
    /// Repeated siblings sharing one name, addressed by index
    Sequence(Sequence),
}

impl Node {
    /// Returns true if this node is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns true if this node is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Returns true if this node is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns the text if this is a scalar, None otherwise
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping if this is a mapping, None otherwise
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the sequence if this is a sequence, None otherwise
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of the node: the scalar itself, or the `#text` entry of a
    /// mapping that carries one
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Mapping(m) => m.get(TEXT_KEY).and_then(Self::as_scalar),
            Self::Sequence(_) => None,
        }
    }

    /// Short name of the variant, used in logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::Mapping(Mapping::new())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl From<Sequence> for Node {
    fn from(value: Sequence) -> Self {
        Self::Sequence(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Self::Sequence(Sequence::new(items))
    }
}

/// Order-preserving map of child names to nodes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Mapping(IndexMap<String, Node>);

impl Mapping {
    /// Creates a new empty mapping
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new mapping with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the child stored under `name`
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.0.get(name)
    }

    /// Returns the position, stored name and child for `name`
    pub fn get_full(&self, name: &str) -> Option<(usize, &str, &Node)> {
        self.0
            .get_full(name)
            .map(|(index, key, node)| (index, key.as_str(), node))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.0.get_mut(name)
    }

    /// Inserts a child, keeping the position of an existing entry.
    /// Returns the previous child if the name already existed
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.0.insert(name.into(), node.into())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns an iterator over the child names
    pub fn keys(&self) -> Keys<'_, String, Node> {
        self.0.keys()
    }

    /// Returns an iterator over the children
    pub fn values(&self) -> Values<'_, String, Node> {
        self.0.values()
    }

    /// Returns an iterator over name-child pairs in stored order
    pub fn iter(&self) -> Iter<'_, String, Node> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Node);
    type IntoIter = Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Ordered slots of same-named siblings.
///
/// Decoded sequences are dense. Sequences built by extraction may be sparse:
/// unselected positions are holes, so selected items keep their original index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Sequence(Vec<Option<Node>>);

impl Sequence {
    /// Creates a dense sequence
    pub fn new(items: Vec<Node>) -> Self {
        Self(items.into_iter().map(Some).collect())
    }

    /// Creates a sequence that may contain holes
    pub fn from_slots(slots: Vec<Option<Node>>) -> Self {
        Self(slots)
    }

    /// Number of slots, holes included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of slots holding an item
    pub fn present_len(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_sparse(&self) -> bool {
        self.0.iter().any(Option::is_none)
    }

    /// Returns the item at `index`; None when out of bounds or a hole
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index).and_then(Option::as_ref)
    }

    /// Appends an item
    pub fn push(&mut self, node: impl Into<Node>) {
        self.0.push(Some(node.into()));
    }

    /// All slots, holes included
    pub fn slots(&self) -> &[Option<Node>] {
        &self.0
    }

    /// Iterates present items together with their index
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Node)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (index, node)))
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().map(Some).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_is_methods() {
        assert!(Node::from("x").is_scalar());
        assert!(Node::from(Mapping::new()).is_mapping());
        assert!(Node::from(vec![Node::from("a")]).is_sequence());
        assert_eq!(Node::from("x").kind_name(), "scalar");
    }

    #[test]
    fn test_node_text() {
        assert_eq!(Node::from("hello").text(), Some("hello"));

        let mut mapping = Mapping::new();
        mapping.insert("id", "7");
        mapping.insert(TEXT_KEY, "body");
        assert_eq!(Node::from(mapping).text(), Some("body"));

        assert_eq!(Node::from(vec![Node::from("a")]).text(), None);
        assert_eq!(Node::default().text(), None);
    }

    #[test]
    fn test_mapping_order_preservation() {
        let mut mapping = Mapping::new();
        mapping.insert("first", "1");
        mapping.insert("second", "2");
        mapping.insert("third", "3");
        mapping.insert("first", "one");

        let keys: Vec<_> = mapping.keys().collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
        assert_eq!(mapping.get("first"), Some(&Node::from("one")));
        assert_eq!(mapping.get_full("third").map(|(i, _, _)| i), Some(2));
    }

    #[test]
    fn test_mapping_from_iter() {
        let mapping: Mapping = [("a", Node::from("1")), ("b", Node::from("2"))]
            .into_iter()
            .collect();
        assert_eq!(mapping.len(), 2);
        assert!(mapping.contains_key("b"));
    }

    #[test]
    fn test_sequence_holes() {
        let seq = Sequence::from_slots(vec![None, Some(Node::from("b")), None]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.present_len(), 1);
        assert!(seq.is_sparse());
        assert_eq!(seq.get(0), None);
        assert_eq!(seq.get(1), Some(&Node::from("b")));
        assert_eq!(seq.get(9), None);

        let present: Vec<_> = seq.iter().map(|(i, _)| i).collect();
        assert_eq!(present, vec![1]);
    }

    #[test]
    fn test_sequence_dense() {
        let mut seq: Sequence = vec![Node::from("a")].into_iter().collect();
        seq.push("b");
        assert_eq!(seq.len(), 2);
        assert!(!seq.is_sparse());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_shape() -> Result<(), serde_json::Error> {
        let mut book = Mapping::new();
        book.insert("title", "B");
        let seq = Sequence::from_slots(vec![None, Some(Node::from(book))]);
        let mut root = Mapping::new();
        root.insert("book", seq);

        let json = serde_json::to_string(&Node::from(root))?;
        assert_eq!(json, r#"{"book":[null,{"title":"B"}]}"#);
        Ok(())
    }
}

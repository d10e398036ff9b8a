//! Tree to XML text encoding
//!
//! Output is indented, uses `\n` line breaks, carries no XML declaration and
//! has no trailing newline.

use tracing::instrument;

use crate::tree::{Mapping, Node, TEXT_KEY};

/// Layout of encoded output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Name of the synthetic element wrapping the tree
    pub root_name: String,
    /// Spaces per nesting level
    pub indent: usize,
    /// Drop the synthetic root when the tree has a single top-level entry
    /// that is not a sequence
    pub unwrap_single_root: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            indent: 2,
            unwrap_single_root: false,
        }
    }
}

impl EncodeOptions {
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    pub const fn with_unwrap_single_root(mut self, unwrap: bool) -> Self {
        self.unwrap_single_root = unwrap;
        self
    }
}

/// Encode with default options
pub fn encode(node: &Node) -> String {
    encode_with_options(node, &EncodeOptions::default())
}

#[instrument(level = "debug", skip_all)]
pub fn encode_with_options(node: &Node, options: &EncodeOptions) -> String {
    let mut writer = Writer::new(options.indent);

    match single_entry(node) {
        Some((name, value)) if options.unwrap_single_root => writer.write_named(name, value, 0),
        _ => writer.write_named(&options.root_name, node, 0),
    }

    writer.finish()
}

fn single_entry(node: &Node) -> Option<(&str, &Node)> {
    let mapping = node.as_mapping()?;
    if mapping.len() != 1 {
        return None;
    }
    mapping
        .iter()
        .next()
        .filter(|(_, value)| !value.is_sequence())
        .map(|(name, value)| (name.as_str(), value))
}

struct Writer {
    lines: Vec<String>,
    indent: usize,
}

impl Writer {
    fn new(indent: usize) -> Self {
        Self {
            lines: Vec::new(),
            indent,
        }
    }

    fn write_named(&mut self, name: &str, node: &Node, depth: usize) {
        match node {
            Node::Scalar(text) => self.write_leaf(name, text, depth),
            Node::Mapping(mapping) => self.write_mapping(name, mapping, depth),
            // one element per present item; holes leave no trace
            Node::Sequence(items) => {
                for (_, item) in items.iter() {
                    self.write_named(name, item, depth);
                }
            }
        }
    }

    fn write_mapping(&mut self, name: &str, mapping: &Mapping, depth: usize) {
        if mapping.is_empty() {
            self.push(depth, format!("<{name}/>"));
            return;
        }

        if mapping.len() == 1 {
            if let Some(text) = mapping.get(TEXT_KEY).and_then(Node::as_scalar) {
                self.write_leaf(name, text, depth);
                return;
            }
        }

        self.push(depth, format!("<{name}>"));
        for (key, value) in mapping {
            match value {
                Node::Scalar(text) if key == TEXT_KEY => {
                    if !text.is_empty() {
                        self.push(depth + 1, escape_text(text));
                    }
                }
                _ => self.write_named(key, value, depth + 1),
            }
        }
        self.push(depth, format!("</{name}>"));
    }

    fn write_leaf(&mut self, name: &str, text: &str, depth: usize) {
        if text.is_empty() {
            self.push(depth, format!("<{name}/>"));
        } else {
            self.push(depth, format!("<{name}>{}</{name}>", escape_text(text)));
        }
    }

    fn push(&mut self, depth: usize, line: String) {
        let pad = " ".repeat(depth.saturating_mul(self.indent));
        self.lines.push(format!("{pad}{line}"));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Sequence;

    fn mapping<const N: usize>(entries: [(&str, Node); N]) -> Node {
        Node::Mapping(entries.into_iter().collect())
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(encode(&Node::default()), "<root/>");
    }

    #[test]
    fn test_nested_layout() {
        let tree = mapping([(
            "catalog",
            mapping([
                ("name", Node::from("Books")),
                ("empty", Node::from("")),
                (
                    "book",
                    Node::from(vec![
                        mapping([("title", Node::from("A"))]),
                        mapping([("title", Node::from("B"))]),
                    ]),
                ),
            ]),
        )]);
        let expected = "\
<root>
  <catalog>
    <name>Books</name>
    <empty/>
    <book>
      <title>A</title>
    </book>
    <book>
      <title>B</title>
    </book>
  </catalog>
</root>";
        assert_eq!(encode(&tree), expected);
    }

    #[test]
    fn test_holes_are_skipped() {
        let tree = mapping([(
            "book",
            Node::Sequence(Sequence::from_slots(vec![None, Some(Node::from("B"))])),
        )]);
        assert_eq!(encode(&tree), "<root>\n  <book>B</book>\n</root>");
    }

    #[test]
    fn test_text_key_and_escaping() {
        let tree = mapping([
            ("price", mapping([("currency", Node::from("TRY")), (TEXT_KEY, Node::from("1 < 2 & 3"))])),
            ("note", mapping([(TEXT_KEY, Node::from("only text"))])),
        ]);
        let expected = "\
<root>
  <price>
    <currency>TRY</currency>
    1 &lt; 2 &amp; 3
  </price>
  <note>only text</note>
</root>";
        assert_eq!(encode(&tree), expected);
    }

    #[test]
    fn test_unwrap_single_root() {
        let tree = mapping([("catalog", mapping([("name", Node::from("x"))]))]);
        let options = EncodeOptions::default().with_unwrap_single_root(true);
        assert_eq!(
            encode_with_options(&tree, &options),
            "<catalog>\n  <name>x</name>\n</catalog>"
        );

        let two = mapping([("a", Node::from("1")), ("b", Node::from("2"))]);
        assert!(encode_with_options(&two, &options).starts_with("<root>"));
    }

    #[test]
    fn test_custom_root_name() {
        let options = EncodeOptions::default().with_root_name("export");
        assert_eq!(encode_with_options(&Node::default(), &options), "<export/>");
    }
}

//! Export file produced from a selection

use tracing::info;

use crate::extract::extract;
use crate::selection::SelectionSet;
use crate::tree::Node;
use crate::xml::encode::{encode_with_options, EncodeOptions};

/// Filename used when none is given
pub const DEFAULT_FILENAME: &str = "export.xml";

/// MIME type of exported documents
pub const MIME_TYPE: &str = "text/xml";

/// UTF-8 XML text ready to be saved or downloaded
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Export {
    filename: String,
    content: String,
}

impl Export {
    /// Wrap encoded content under the default filename
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            content: content.into(),
        }
    }

    /// Replace the filename; blank names keep the default
    pub fn with_filename(mut self, filename: &str) -> Self {
        let filename = filename.trim();
        if !filename.is_empty() {
            self.filename = filename.to_string();
        }
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// Extract `selection` from `tree` and encode the result
pub fn export(tree: &Node, selection: &SelectionSet, options: &EncodeOptions) -> Export {
    let extracted = extract(tree, selection);
    let export = Export::new(encode_with_options(&extracted, options));
    info!(paths = selection.len(), bytes = export.content.len(), "export ready");
    export
}

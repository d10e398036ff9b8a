//! Loaded document together with the user's selection

use tracing::{info, warn};

use crate::error::Result;
use crate::export::{export, Export};
use crate::extract::{extract_with_report, Extraction};
use crate::outline::{outline, OutlineEntry, OutlineOptions};
use crate::path::Path;
use crate::selection::SelectionSet;
use crate::tree::Node;
use crate::xml::{decode_with_options, DecodeOptions, EncodeOptions};

/// One document being browsed and the paths selected in it.
///
/// The selection belongs to the loaded document: loading another document or
/// clearing the session drops it.
#[derive(Clone, Debug, Default)]
pub struct Session {
    options: DecodeOptions,
    document: Option<Node>,
    selection: SelectionSet,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Decode `text` and make it the current document. On failure the
    /// previous document and selection are left as they were
    pub fn load(&mut self, text: &str) -> Result<()> {
        let tree = decode_with_options(text, &self.options).inspect_err(|err| {
            warn!(%err, "failed to load document");
        })?;
        self.document = Some(tree);
        self.selection.clear();
        info!(bytes = text.len(), "document loaded");
        Ok(())
    }

    /// Drop the document and its selection
    pub fn clear(&mut self) {
        self.document = None;
        self.selection.clear();
    }

    pub fn document(&self) -> Option<&Node> {
        self.document.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Select a path. Returns false if it was already selected
    pub fn select(&mut self, path: &str) -> Result<bool> {
        Ok(self.selection.insert(Path::parse(path)?))
    }

    /// Deselect a path. Returns false if it was not selected
    pub fn deselect(&mut self, path: &str) -> Result<bool> {
        Ok(self.selection.remove(&Path::parse(path)?))
    }

    /// Flip the selection state of a path, returning the new state
    pub fn toggle(&mut self, path: &str) -> Result<bool> {
        Ok(self.selection.toggle(Path::parse(path)?))
    }

    pub fn outline(&self, options: &OutlineOptions) -> Vec<OutlineEntry> {
        self.document
            .as_ref()
            .map(|tree| outline(tree, options))
            .unwrap_or_default()
    }

    pub fn extract(&self) -> Option<Extraction> {
        self.document
            .as_ref()
            .map(|tree| extract_with_report(tree, &self.selection))
    }

    /// Export the selection. None when no document is loaded or nothing is
    /// selected
    pub fn export(&self, filename: Option<&str>, options: &EncodeOptions) -> Option<Export> {
        let tree = self.document.as_ref()?;
        if self.selection.is_empty() {
            return None;
        }
        let export = export(tree, &self.selection, options);
        Some(match filename {
            Some(name) => export.with_filename(name),
            None => export,
        })
    }
}

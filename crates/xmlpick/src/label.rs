//! Display labels for sequence elements
//!
//! Labels are presentation only. They never take part in path identity.

use crate::tree::{Mapping, Node};

/// Maximum number of characters of a value shown in a label
pub const MAX_VALUE_CHARS: usize = 30;

/// Appended to a value cut at [`MAX_VALUE_CHARS`]
pub const ELLIPSIS: &str = "...";

/// Field names tried in order, already folded. Name-like fields first, then
/// description, type, identifier, and finally date/price/quantity/status.
#[rustfmt::skip]
pub const PRIORITY_FIELDS: [&str; 26] = [
    "ad", "adi", "isim", "name", "baslik", "title",
    "aciklama", "description", "ozet", "summary",
    "tur", "tip", "type", "kategori", "category",
    "id", "kod", "code",
    "tarih", "date", "fiyat", "price", "miktar", "quantity", "durum", "status",
];

/// Label for the `index`-th element of a sequence
pub fn label(item: &Node, index: usize) -> String {
    let found = match item {
        Node::Mapping(mapping) => priority_field(mapping).or_else(|| first_scalar(mapping)),
        Node::Scalar(text) => Some(truncate(text)),
        Node::Sequence(_) => None,
    };
    found.unwrap_or_else(|| format!("Item {}", index.saturating_add(1)))
}

fn priority_field(mapping: &Mapping) -> Option<String> {
    let folded: Vec<(String, &String, &Node)> = mapping
        .iter()
        .map(|(key, value)| (fold_key(key), key, value))
        .collect();

    PRIORITY_FIELDS.iter().find_map(|field| {
        folded.iter().find_map(|(normalized, key, value)| {
            if normalized.as_str() != *field {
                return None;
            }
            value
                .text()
                .filter(|text| !text.is_empty())
                .map(|text| format!("{key}: {}", truncate(text)))
        })
    })
}

fn first_scalar(mapping: &Mapping) -> Option<String> {
    mapping
        .iter()
        .find_map(|(key, value)| value.as_scalar().map(|text| format!("{key}: {}", truncate(text))))
}

/// Fold Turkish letters to their closest ASCII letter, then lowercase
pub fn fold_key(key: &str) -> String {
    key.chars()
        .map(|ch| match ch {
            'İ' | 'I' | 'ı' => 'i',
            'Ğ' | 'ğ' => 'g',
            'Ş' | 'ş' => 's',
            'Ç' | 'ç' => 'c',
            'Ü' | 'ü' => 'u',
            'Ö' | 'ö' => 'o',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Cut `text` to [`MAX_VALUE_CHARS`] characters, marking the cut
pub fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_VALUE_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", text.get(..cut).unwrap_or(text)),
        None => text.to_string(),
    }
}

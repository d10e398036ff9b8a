//! xmlpick - Path-addressable XML tree selection and extraction
//!
//! # Quick Start
//!
//! ```
//! use xmlpick::{decode, encode, extract, SelectionSet};
//! # fn main() -> Result<(), xmlpick::Error> {
//! let tree = decode("<catalog><book><title>A</title></book><book><title>B</title></book></catalog>")?;
//! let selection = SelectionSet::parse_all(["catalog.book[1].title"])?;
//! let picked = extract(&tree, &selection);
//! assert_eq!(
//!     encode(&picked),
//!     "<root>\n  <catalog>\n    <book>\n      <title>B</title>\n    </book>\n  </catalog>\n</root>"
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Category, Error, ErrorKind, Pos, Result, Span};

pub mod cursor;

pub mod tree;
pub use tree::{Mapping, Node, Sequence, TEXT_KEY};

pub mod path;
pub use path::{Path, Segment};

pub mod selection;
pub use selection::SelectionSet;

pub mod extract;
pub use extract::{extract, extract_with_report, Extraction};

pub mod label;
pub use label::label;

pub mod outline;
pub use outline::{outline, EntryKind, OutlineEntry, OutlineOptions};

pub mod xml;
pub use xml::{decode, decode_with_options, encode, encode_with_options, DecodeOptions, EncodeOptions};

pub mod export;
pub use export::{export, Export};

pub mod session;
pub use session::Session;

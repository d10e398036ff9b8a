//! XML codec: text to [`Node`](crate::Node) and back
//!
//! Decoding follows the implicit-array convention: a child name that occurs
//! once becomes a bare child, a name that repeats becomes one sequence.
//! Attributes are ordinary scalar children.

pub mod decode;
pub mod encode;
pub mod model;
pub mod parser;

pub use decode::{decode, decode_with_options, document_to_node, DecodeOptions};
pub use encode::{encode, encode_with_options, EncodeOptions};
pub use model::{Content, Document, Element};
pub use parser::Parser;

//! Schema model
//!
//! - [`Schema`]: the recursive description supplied by the caller, built in
//!   code or loaded from an Avro `.avsc` document
//! - [`SchemaTree`]: the same structure with stable node ids, built once per
//!   analyzer initialization

mod avro;
mod error;
mod tree;
mod types;

pub use error::SchemaError;
pub use tree::{Field, NodeId, NodeKind, SchemaNode, SchemaTree};
pub use types::{FieldDef, PrimitiveKind, Schema, full_name};

//! Value module - In-memory representation of YAML documents.
//!
//! Mappings keep their key order so output follows the source, while
//! equality stays order-independent.

mod node;
mod ordered_map;

pub use node::*;
pub use ordered_map::*;

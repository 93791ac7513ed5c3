//! Document module - Parsed YAML documents and where they came from.

mod loader;
mod parser;

pub use loader::*;
pub use parser::*;

use crate::value::Node;
use serde::Serialize;
use std::fmt;

/// Provenance records where a document was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Provenance {
    /// Source path or URL.
    pub location: String,
    /// Position of the document within its multi-document stream.
    pub index: usize,
}

impl Provenance {
    pub fn new(location: impl Into<String>, index: usize) -> Self {
        Provenance {
            location: location.into(),
            index,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.location, self.index)
    }
}

/// Document is one parsed YAML document. It is read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
    provenance: Provenance,
}

impl Document {
    pub fn new(root: Node, provenance: Provenance) -> Self {
        Document { root, provenance }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn location(&self) -> &str {
        &self.provenance.location
    }
}

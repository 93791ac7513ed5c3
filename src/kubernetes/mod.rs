//! Kubernetes module - Resource identity and matching across inputs.
//!
//! Documents that carry `apiVersion` and `kind` are paired by identity
//! rather than by position, and unmatched resources may be recognised as
//! renames of one another.

mod matcher;
mod resource_key;


pub use matcher::*;
pub use resource_key::*;

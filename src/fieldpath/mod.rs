//! Field path module - Addresses locations inside document trees.
//!
//! [`Path`] is what the diff engine produces while it descends; [`PathSpec`]
//! is a path string supplied by a user (chroot, filters) parsed for lookup.

mod path;
mod selector;

pub use path::*;
pub use selector::*;

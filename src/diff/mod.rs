//! Diff module - Semantic comparison of YAML documents.
//!
//! [`compare`] is the entry point: it applies chroots, picks positional or
//! Kubernetes-aware document pairing, walks the trees with a [`Differ`] and
//! filters the resulting [`ChangeEntry`] list into a [`Report`].

mod change;
mod chroot;
mod directory;
mod engine;
mod options;
mod report;
mod sequence;
mod similarity;


#[cfg(test)]
mod sequence_test;

pub use change::*;
pub use chroot::*;
pub use directory::*;
pub use engine::*;
pub use options::*;
pub use report::*;
pub use sequence::PAIRING_THRESHOLD;
pub use similarity::*;

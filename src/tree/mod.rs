//! Cable tree construction.
//!
//! Each battery starts with one stub path for its own cell and one per
//! assigned house. [`TreeBuilder`] repeatedly joins the two closest stubs
//! until a single path, the battery's tree, is left.

mod builder;
mod stubs;

pub use builder::{dedup_path, Tree, TreeBuilder};
pub use stubs::{StubKey, StubSet};

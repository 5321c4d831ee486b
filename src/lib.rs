//! # Leapfrog - a circular skip list keyed by floating point numbers
//! Elements are ordered by a key they derive themselves. Keys closer together than a configured
//! tolerance count as equal, and walking off either end of the bottom level wraps around to the
//! other end.
//!
//! Features:
//!
//! `tracing` - Emits structured logs for construction, insertion and deletion

mod arena;
#[doc(inline)]
pub use crate::arena::NodeId;

mod element;
#[doc(inline)]
pub use crate::element::ListElement;

mod error;
#[doc(inline)]
pub use crate::error::Error;

mod level;

pub mod options;
#[doc(inline)]
pub use crate::options::SkipListOptions;

pub mod skiplist;
// Re-export the SkipList struct and show at the top level of docs
#[doc(inline)]
pub use crate::skiplist::SkipList;

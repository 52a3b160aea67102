//! In-memory page document model.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! stable [`NodeId`] handles. Every write goes through the document so it
//! can be recorded in the mutation journal.

pub mod document;
pub mod element;
pub mod html;
pub mod mutation;
pub mod selector;

pub use document::{Document, NodeId};
pub use element::{Content, Element};
pub use mutation::{MutationKind, MutationRecord};
pub use selector::Selector;

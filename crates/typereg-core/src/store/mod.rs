//! Enum type definition store.
//!
//! [`EnumTypeStore`] implements create, read, update, delete and search for
//! enum definitions on top of any [`TypeVertexStore`](crate::graph::TypeVertexStore).

mod batch;
mod enum_store;
mod mapping;

pub use batch::BatchOutcome;
pub use enum_store::EnumTypeStore;

//! Type vertex storage.
//!
//! Type definitions live on vertices of a property graph. The
//! [`TypeVertexStore`] trait is the contract the enum store consumes;
//! [`SledTypeVertexStore`] implements it on top of sled.

mod property;
mod sled_store;
mod vertex;

pub use property::{PropertyKey, PropertyType, PropertyValue};
pub use sled_store::SledTypeVertexStore;
pub use vertex::{
    current_timestamp, TypeVertexStore, Vertex, VertexId, VertexIter, DESCRIPTION_SUFFIX,
    TYPE_KEY_PREFIX,
};

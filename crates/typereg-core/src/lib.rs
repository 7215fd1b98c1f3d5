//! typereg Core - Enum type definition store over a property graph.
//!
//! This crate maps enum type definitions onto type vertices and their
//! properties, and provides the sled-backed vertex store they live in.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod config;
pub mod error;
pub mod graph;
pub mod notification;
pub mod search;
pub mod store;
pub mod typedef;

pub use config::StoreConfig;
pub use error::Error;
pub use graph::{
    PropertyKey, PropertyValue, SledTypeVertexStore, TypeVertexStore, Vertex, VertexId,
};
pub use search::SearchFilter;
pub use store::{BatchOutcome, EnumTypeStore};
pub use typedef::{EnumDef, EnumDefs, EnumElementDef, TypeCategory, TypeDef, TypeDefHeader};

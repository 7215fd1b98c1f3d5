//! Vertex handles and the type vertex store contract.

use std::fmt;

use super::PropertyValue;
use crate::error::Error;
use crate::typedef::{TypeCategory, TypeDefHeader};

/// Prefix shared by every derived type property key.
pub const TYPE_KEY_PREFIX: &str = "__type.";

/// Qualifier appended to an element key to address its description.
pub const DESCRIPTION_SUFFIX: &str = "description";

/// Size of a vertex identifier in bytes.
pub const VERTEX_ID_SIZE: usize = 16;

/// Opaque vertex identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub [u8; VERTEX_ID_SIZE]);

impl VertexId {
    /// Decode an identifier from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let id: [u8; VERTEX_ID_SIZE] = bytes.try_into().ok()?;
        Some(Self(id))
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; VERTEX_ID_SIZE] {
        &self.0
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", hex::encode(self.0))
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Handle to a type vertex. Carries no properties itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertex {
    id: VertexId,
}

impl Vertex {
    /// Wrap an identifier.
    pub fn new(id: VertexId) -> Self {
        Self { id }
    }

    /// The vertex identifier.
    pub fn id(&self) -> VertexId {
        self.id
    }
}

/// Lazy, single-pass sequence of vertices.
pub type VertexIter<'a> = Box<dyn Iterator<Item = Result<Vertex, Error>> + 'a>;

/// Storage contract for type vertices.
///
/// Implementations own the name, guid and category indexes, persist the
/// generic header fields and expose a string-keyed property bag per vertex.
/// Name uniqueness across all categories must be enforced atomically by
/// [`create_type_vertex`](TypeVertexStore::create_type_vertex).
pub trait TypeVertexStore: Send + Sync {
    /// Find a vertex by type name, regardless of category.
    fn find_type_vertex_by_name(&self, name: &str) -> Result<Option<Vertex>, Error>;

    /// Find a vertex by type name within one category.
    fn find_type_vertex_by_name_and_category(
        &self,
        name: &str,
        category: TypeCategory,
    ) -> Result<Option<Vertex>, Error>;

    /// Find a vertex by guid within one category.
    fn find_type_vertex_by_guid_and_category(
        &self,
        guid: &str,
        category: TypeCategory,
    ) -> Result<Option<Vertex>, Error>;

    /// Iterate over every vertex of a category.
    fn find_type_vertices_by_category(
        &self,
        category: TypeCategory,
    ) -> Result<VertexIter<'_>, Error>;

    /// Allocate a vertex and persist the header fields.
    ///
    /// Assigns the guid, sets the storage version to 1 and stamps the
    /// creation and update times. Fails with [`Error::AlreadyExists`] if the
    /// name is taken.
    fn create_type_vertex(
        &self,
        header: &TypeDefHeader,
        category: TypeCategory,
    ) -> Result<Vertex, Error>;

    /// Remove a vertex together with all its properties and index entries.
    fn delete_type_vertex(&self, vertex: Vertex) -> Result<(), Error>;

    /// Check whether a vertex is a live type vertex of the given category.
    fn is_type_vertex(&self, vertex: Vertex, category: TypeCategory) -> Result<bool, Error>;

    /// Read the header fields stored on a vertex.
    fn vertex_to_header(&self, vertex: Vertex) -> Result<TypeDefHeader, Error>;

    /// Read a raw property.
    fn get_property(&self, vertex: Vertex, key: &str) -> Result<Option<PropertyValue>, Error>;

    /// Write a raw property, replacing any previous value.
    fn set_property(&self, vertex: Vertex, key: &str, value: PropertyValue) -> Result<(), Error>;

    /// Derive the property key for a type, or for one of its members.
    fn property_key(&self, type_name: &str, member: Option<&str>) -> String {
        match member {
            Some(member) => format!("{}{}.{}", TYPE_KEY_PREFIX, type_name, member),
            None => format!("{}{}", TYPE_KEY_PREFIX, type_name),
        }
    }

    /// Qualify an already derived key.
    fn suffixed_key(&self, key: &str, suffix: &str) -> String {
        format!("{}.{}", key, suffix)
    }
}

/// Get current timestamp in microseconds since Unix epoch.
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

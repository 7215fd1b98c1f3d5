//! Generic type definition header.

use serde::{Deserialize, Serialize};

/// Type version assigned when a definition does not carry one.
pub const DEFAULT_TYPE_VERSION: &str = "1.0";

/// Header fields shared by every type definition, persisted by the vertex
/// store independently of the category-specific properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeDefHeader {
    /// System-assigned unique identifier.
    pub guid: String,
    /// Type name, unique across all categories.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller-facing type version.
    pub type_version: String,
    /// Storage version, starts at 1 when the vertex is created.
    pub version: u64,
    /// Creator of the definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last modifier of the definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Creation timestamp (microseconds since Unix epoch).
    pub create_time: u64,
    /// Last update timestamp (microseconds since Unix epoch).
    pub update_time: u64,
}

impl Default for TypeDefHeader {
    fn default() -> Self {
        Self {
            guid: String::new(),
            name: String::new(),
            description: None,
            type_version: DEFAULT_TYPE_VERSION.to_string(),
            version: 0,
            created_by: None,
            updated_by: None,
            create_time: 0,
            update_time: 0,
        }
    }
}

impl TypeDefHeader {
    /// Create a header for a new, not yet persisted definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

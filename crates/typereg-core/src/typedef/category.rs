//! Type category tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Discriminant distinguishing the kinds of type definitions that share
/// vertex storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeCategory {
    /// Built-in primitive type.
    Primitive,
    /// Object identifier type.
    ObjectIdType,
    /// Enumeration.
    Enum,
    /// Struct.
    Struct,
    /// Classification (tag) type.
    Classification,
    /// Entity type.
    Entity,
    /// Array type.
    Array,
    /// Map type.
    Map,
    /// Relationship type.
    Relationship,
}

impl TypeCategory {
    /// All categories, in declaration order.
    pub const ALL: [TypeCategory; 9] = [
        TypeCategory::Primitive,
        TypeCategory::ObjectIdType,
        TypeCategory::Enum,
        TypeCategory::Struct,
        TypeCategory::Classification,
        TypeCategory::Entity,
        TypeCategory::Array,
        TypeCategory::Map,
        TypeCategory::Relationship,
    ];

    /// Stored tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Primitive => "PRIMITIVE",
            TypeCategory::ObjectIdType => "OBJECT_ID_TYPE",
            TypeCategory::Enum => "ENUM",
            TypeCategory::Struct => "STRUCT",
            TypeCategory::Classification => "CLASSIFICATION",
            TypeCategory::Entity => "ENTITY",
            TypeCategory::Array => "ARRAY",
            TypeCategory::Map => "MAP",
            TypeCategory::Relationship => "RELATIONSHIP",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidData(format!("unknown type category: {}", s)))
    }
}

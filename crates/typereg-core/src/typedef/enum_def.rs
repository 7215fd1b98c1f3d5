//! Enum type definitions.

use serde::{Deserialize, Serialize};

use super::{TypeCategory, TypeDef, TypeDefHeader};

/// An enumeration type definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    /// Generic header fields.
    #[serde(flatten)]
    pub header: TypeDefHeader,
    /// Elements in storage/display order. Not necessarily sorted by ordinal.
    #[serde(default)]
    pub element_defs: Vec<EnumElementDef>,
}

/// One member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumElementDef {
    /// Element value, expected to be unique within its enum.
    pub value: String,
    /// Caller-assigned rank, stored verbatim.
    pub ordinal: i32,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A list of enum definitions returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumDefs {
    /// Matching definitions.
    pub list: Vec<EnumDef>,
}

impl EnumDef {
    /// Create an empty enum definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: TypeDefHeader::new(name),
            element_defs: Vec::new(),
        }
    }

    /// Add an element.
    pub fn with_element(mut self, element: EnumElementDef) -> Self {
        self.element_defs.push(element);
        self
    }

    /// Add multiple elements.
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = EnumElementDef>) -> Self {
        self.element_defs.extend(elements);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.header.description = Some(description.into());
        self
    }

    /// Set the type version.
    pub fn with_type_version(mut self, type_version: impl Into<String>) -> Self {
        self.header.type_version = type_version.into();
        self
    }

    /// Get the first element with the given value.
    pub fn element(&self, value: &str) -> Option<&EnumElementDef> {
        self.element_defs.iter().find(|e| e.value == value)
    }

    /// Check whether an element with the given value exists.
    pub fn has_element(&self, value: &str) -> bool {
        self.element(value).is_some()
    }

    /// Element values in storage order.
    pub fn element_values(&self) -> Vec<&str> {
        self.element_defs.iter().map(|e| e.value.as_str()).collect()
    }
}

impl TypeDef for EnumDef {
    const CATEGORY: TypeCategory = TypeCategory::Enum;

    fn header(&self) -> &TypeDefHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TypeDefHeader {
        &mut self.header
    }
}

impl EnumElementDef {
    /// Create an element without a description.
    pub fn new(value: impl Into<String>, ordinal: i32) -> Self {
        Self {
            value: value.into(),
            ordinal,
            description: None,
        }
    }

    /// Create an element with a description.
    pub fn described(value: impl Into<String>, ordinal: i32, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ordinal,
            description: Some(description.into()),
        }
    }

    /// The description if it contains anything besides whitespace.
    pub fn non_blank_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

impl EnumDefs {
    /// Wrap a list of definitions.
    pub fn new(list: Vec<EnumDef>) -> Self {
        Self { list }
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate over the definitions.
    pub fn iter(&self) -> std::slice::Iter<'_, EnumDef> {
        self.list.iter()
    }

    /// Unwrap into the inner list.
    pub fn into_inner(self) -> Vec<EnumDef> {
        self.list
    }
}

impl IntoIterator for EnumDefs {
    type Item = EnumDef;
    type IntoIter = std::vec::IntoIter<EnumDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

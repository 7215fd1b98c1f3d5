//! Search filters for type definitions.
//!
//! A [`SearchFilter`] is a generic, string-parameterised description of
//! which definitions a caller wants. It is turned into an in-memory
//! predicate; stores apply that predicate after a full category scan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::typedef::TypeDef;

/// Parameter matching any of the given type names.
pub const PARAM_NAME: &str = "name";

/// Parameter matching any of the given guids.
pub const PARAM_GUID: &str = "guid";

/// Parameter matching the type category (case-insensitive).
pub const PARAM_TYPE: &str = "type";

/// Parameter excluding the given type names.
pub const PARAM_NOT_NAME: &str = "notname";

/// Multi-valued filter parameters. All parameters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    params: BTreeMap<String, Vec<String>>,
}

impl SearchFilter {
    /// Create an empty filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to a parameter.
    pub fn with_param(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .entry(param.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Match definitions with the given name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_param(PARAM_NAME, name)
    }

    /// Match definitions with the given guid.
    pub fn with_guid(self, guid: impl Into<String>) -> Self {
        self.with_param(PARAM_GUID, guid)
    }

    /// Match definitions of the given category.
    pub fn with_category(self, category: impl Into<String>) -> Self {
        self.with_param(PARAM_TYPE, category)
    }

    /// Exclude definitions with the given name.
    pub fn without_name(self, name: impl Into<String>) -> Self {
        self.with_param(PARAM_NOT_NAME, name)
    }

    /// Values of a parameter.
    pub fn param(&self, param: &str) -> &[String] {
        self.params.get(param).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if the filter has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.values().all(Vec::is_empty)
    }

    /// Evaluate the filter against one definition.
    pub fn matches<T: TypeDef>(&self, def: &T) -> bool {
        let names = self.param(PARAM_NAME);
        if !names.is_empty() && !names.iter().any(|n| n == def.name()) {
            return false;
        }

        let guids = self.param(PARAM_GUID);
        if !guids.is_empty() && !guids.iter().any(|g| g == def.guid()) {
            return false;
        }

        let categories = self.param(PARAM_TYPE);
        if !categories.is_empty()
            && !categories
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(def.category().as_str()))
        {
            return false;
        }

        !self.param(PARAM_NOT_NAME).iter().any(|n| n == def.name())
    }

    /// Build a predicate closure from the filter.
    pub fn predicate<T: TypeDef>(&self) -> impl Fn(&T) -> bool + '_ {
        move |def| self.matches(def)
    }
}

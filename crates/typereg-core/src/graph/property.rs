//! Vertex property values and typed keys.

use std::marker::PhantomData;

use rkyv::{Archive, Deserialize, Serialize};

use super::{TypeVertexStore, Vertex};
use crate::error::Error;

/// A value stored under a vertex property key.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum PropertyValue {
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of strings.
    StringList(Vec<String>),
}

impl PropertyValue {
    /// Name of the stored variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "int",
            PropertyValue::Long(_) => "long",
            PropertyValue::String(_) => "string",
            PropertyValue::StringList(_) => "string list",
        }
    }

    /// Serialize the value to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a value from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        // sled values carry no alignment guarantee
        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

/// Rust types that can be stored as a [`PropertyValue`].
pub trait PropertyType: Sized {
    /// Variant name expected when reading.
    const TYPE_NAME: &'static str;

    /// Wrap into a property value.
    fn into_property(self) -> PropertyValue;

    /// Unwrap from a property value, `None` on variant mismatch.
    fn from_property(value: PropertyValue) -> Option<Self>;
}

impl PropertyType for i32 {
    const TYPE_NAME: &'static str = "int";

    fn into_property(self) -> PropertyValue {
        PropertyValue::Int(self)
    }

    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for i64 {
    const TYPE_NAME: &'static str = "long";

    fn into_property(self) -> PropertyValue {
        PropertyValue::Long(self)
    }

    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Long(v) => Some(v),
            PropertyValue::Int(v) => Some(i64::from(v)),
            _ => None,
        }
    }
}

impl PropertyType for String {
    const TYPE_NAME: &'static str = "string";

    fn into_property(self) -> PropertyValue {
        PropertyValue::String(self)
    }

    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Vec<String> {
    const TYPE_NAME: &'static str = "string list";

    fn into_property(self) -> PropertyValue {
        PropertyValue::StringList(self)
    }

    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::StringList(v) => Some(v),
            _ => None,
        }
    }
}

/// A property key bound to the Rust type stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyKey<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PropertyType> PropertyKey<T> {
    /// Bind a derived key name to a value type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// The raw key name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the property, failing if it holds a different type.
    pub fn read<S>(&self, store: &S, vertex: Vertex) -> Result<Option<T>, Error>
    where
        S: TypeVertexStore + ?Sized,
    {
        match store.get_property(vertex, &self.name)? {
            Some(value) => {
                let found = value.type_name();
                T::from_property(value).map(Some).ok_or_else(|| {
                    Error::InvalidData(format!(
                        "property {} holds a {} value, expected {}",
                        self.name,
                        found,
                        T::TYPE_NAME
                    ))
                })
            }
            None => Ok(None),
        }
    }

    /// Write the property, replacing any previous value.
    pub fn write<S>(&self, store: &S, vertex: Vertex, value: T) -> Result<(), Error>
    where
        S: TypeVertexStore + ?Sized,
    {
        store.set_property(vertex, &self.name, value.into_property())
    }
}

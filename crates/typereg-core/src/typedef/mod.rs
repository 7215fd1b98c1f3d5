//! Type definition model.
//!
//! Every type definition carries a generic [`TypeDefHeader`] and belongs to
//! exactly one [`TypeCategory`]. Enum definitions add an ordered list of
//! elements on top of the header.

mod category;
mod enum_def;
mod header;

pub use category::TypeCategory;
pub use enum_def::{EnumDef, EnumDefs, EnumElementDef};
pub use header::{TypeDefHeader, DEFAULT_TYPE_VERSION};

/// Common view over all type definitions.
pub trait TypeDef {
    /// The category every definition of this kind belongs to.
    const CATEGORY: TypeCategory;

    /// Generic header fields.
    fn header(&self) -> &TypeDefHeader;

    /// Mutable access to the header fields.
    fn header_mut(&mut self) -> &mut TypeDefHeader;

    /// Type name.
    fn name(&self) -> &str {
        &self.header().name
    }

    /// System-assigned guid, empty until persisted.
    fn guid(&self) -> &str {
        &self.header().guid
    }

    /// Category of this definition.
    fn category(&self) -> TypeCategory {
        Self::CATEGORY
    }
}

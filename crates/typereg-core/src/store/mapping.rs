//! Mapping between enum definitions and vertex properties.
//!
//! Property layout for an enum named `E`:
//!
//! - `derive(E)`: ordered list of element values. Sole source of which
//!   elements exist and in which order.
//! - `derive(E, value)`: element ordinal.
//! - `derive(E, value).description`: element description, only written when
//!   non-blank.

use crate::error::Error;
use crate::graph::{PropertyKey, TypeVertexStore, Vertex, DESCRIPTION_SUFFIX};
use crate::typedef::{EnumDef, EnumElementDef, TypeCategory};

/// Typed keys for one enum's properties.
struct EnumKeys<'a, S: ?Sized> {
    store: &'a S,
    type_name: &'a str,
}

impl<'a, S: TypeVertexStore + ?Sized> EnumKeys<'a, S> {
    fn new(store: &'a S, type_name: &'a str) -> Self {
        Self { store, type_name }
    }

    fn values(&self) -> PropertyKey<Vec<String>> {
        PropertyKey::new(self.store.property_key(self.type_name, None))
    }

    fn element_key(&self, value: &str) -> String {
        self.store.property_key(self.type_name, Some(value))
    }

    fn ordinal(&self, value: &str) -> PropertyKey<i32> {
        PropertyKey::new(self.element_key(value))
    }

    fn description(&self, value: &str) -> PropertyKey<String> {
        PropertyKey::new(
            self.store
                .suffixed_key(&self.element_key(value), DESCRIPTION_SUFFIX),
        )
    }
}

/// Write the element properties of `enum_def` onto `vertex`.
///
/// Keys are derived from `type_name`, the name the vertex is registered
/// under. Blank descriptions are skipped, so a description written earlier
/// for the same element stays in place.
pub(crate) fn to_vertex<S>(
    store: &S,
    type_name: &str,
    enum_def: &EnumDef,
    vertex: Vertex,
) -> Result<(), Error>
where
    S: TypeVertexStore + ?Sized,
{
    let keys = EnumKeys::new(store, type_name);
    let mut values = Vec::with_capacity(enum_def.element_defs.len());

    for element in &enum_def.element_defs {
        keys.ordinal(&element.value)
            .write(store, vertex, element.ordinal)?;

        if let Some(description) = element.non_blank_description() {
            keys.description(&element.value)
                .write(store, vertex, description.to_string())?;
        }

        values.push(element.value.clone());
    }

    keys.values().write(store, vertex, values)
}

/// Rebuild an enum definition from a vertex.
///
/// Returns `None` when the vertex is not an enum type vertex.
pub(crate) fn to_enum_def<S>(store: &S, vertex: Vertex) -> Result<Option<EnumDef>, Error>
where
    S: TypeVertexStore + ?Sized,
{
    if !store.is_type_vertex(vertex, TypeCategory::Enum)? {
        return Ok(None);
    }

    let header = store.vertex_to_header(vertex)?;
    let keys = EnumKeys::new(store, &header.name);

    let values = keys.values().read(store, vertex)?.unwrap_or_default();
    let mut elements = Vec::with_capacity(values.len());

    for value in values {
        let ordinal = keys.ordinal(&value).read(store, vertex)?.ok_or_else(|| {
            Error::InvalidData(format!(
                "enum {} element {} has no ordinal",
                header.name, value
            ))
        })?;
        let description = keys.description(&value).read(store, vertex)?;

        elements.push(EnumElementDef {
            value,
            ordinal,
            description,
        });
    }

    Ok(Some(EnumDef {
        header,
        element_defs: elements,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::graph::{PropertyValue, SledTypeVertexStore};
    use crate::typedef::TypeDefHeader;

    fn test_store() -> SledTypeVertexStore {
        SledTypeVertexStore::open(&StoreConfig::temporary()).unwrap()
    }

    fn order_status() -> EnumDef {
        EnumDef::new("OrderStatus").with_elements([
            EnumElementDef::described("NEW", 0, "just placed"),
            EnumElementDef::described("SHIPPED", 1, ""),
            EnumElementDef::described("DELIVERED", 2, "final"),
        ])
    }

    fn enum_vertex(store: &SledTypeVertexStore, name: &str) -> Vertex {
        store
            .create_type_vertex(&TypeDefHeader::new(name), TypeCategory::Enum)
            .unwrap()
    }

    #[test]
    fn test_write_layout() {
        let store = test_store();
        let vertex = enum_vertex(&store, "OrderStatus");

        to_vertex(&store, "OrderStatus", &order_status(), vertex).unwrap();

        assert_eq!(
            store.get_property(vertex, "__type.OrderStatus").unwrap(),
            Some(PropertyValue::StringList(vec![
                "NEW".to_string(),
                "SHIPPED".to_string(),
                "DELIVERED".to_string()
            ]))
        );
        assert_eq!(
            store.get_property(vertex, "__type.OrderStatus.DELIVERED").unwrap(),
            Some(PropertyValue::Int(2))
        );
        assert_eq!(
            store
                .get_property(vertex, "__type.OrderStatus.NEW.description")
                .unwrap(),
            Some(PropertyValue::String("just placed".to_string()))
        );
        assert!(store
            .get_property(vertex, "__type.OrderStatus.SHIPPED.description")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_roundtrip_preserves_order_not_ordinals() {
        let store = test_store();
        let vertex = enum_vertex(&store, "Priority");
        let def = EnumDef::new("Priority").with_elements([
            EnumElementDef::described("HIGH", 9, "urgent"),
            EnumElementDef::described("LOW", 1, "whenever"),
            EnumElementDef::described("MEDIUM", 5, "soon"),
        ]);

        to_vertex(&store, "Priority", &def, vertex).unwrap();
        let read = to_enum_def(&store, vertex).unwrap().unwrap();

        assert_eq!(read.element_defs, def.element_defs);
        assert_eq!(read.header.name, "Priority");
    }

    #[test]
    fn test_shrinking_rewrite() {
        let store = test_store();
        let vertex = enum_vertex(&store, "OrderStatus");
        to_vertex(&store, "OrderStatus", &order_status(), vertex).unwrap();

        let smaller = EnumDef::new("OrderStatus")
            .with_element(EnumElementDef::described("DELIVERED", 0, "final"));
        to_vertex(&store, "OrderStatus", &smaller, vertex).unwrap();

        let read = to_enum_def(&store, vertex).unwrap().unwrap();
        assert_eq!(read.element_values(), vec!["DELIVERED"]);
        assert_eq!(read.element_defs[0].ordinal, 0);
    }

    #[test]
    fn test_blank_description_leaves_residue() {
        let store = test_store();
        let vertex = enum_vertex(&store, "OrderStatus");
        to_vertex(&store, "OrderStatus", &order_status(), vertex).unwrap();

        let blanked = EnumDef::new("OrderStatus")
            .with_element(EnumElementDef::described("NEW", 0, "   "));
        to_vertex(&store, "OrderStatus", &blanked, vertex).unwrap();

        let read = to_enum_def(&store, vertex).unwrap().unwrap();
        assert_eq!(
            read.element_defs[0].description.as_deref(),
            Some("just placed")
        );
    }

    #[test]
    fn test_duplicate_values_overwrite() {
        let store = test_store();
        let vertex = enum_vertex(&store, "Dup");
        let def = EnumDef::new("Dup").with_elements([
            EnumElementDef::new("A", 1),
            EnumElementDef::new("A", 2),
        ]);

        to_vertex(&store, "Dup", &def, vertex).unwrap();
        let read = to_enum_def(&store, vertex).unwrap().unwrap();

        // Both list entries resolve to the last written ordinal
        assert_eq!(read.element_values(), vec!["A", "A"]);
        assert!(read.element_defs.iter().all(|e| e.ordinal == 2));
    }

    #[test]
    fn test_non_enum_vertex_is_skipped() {
        let store = test_store();
        let vertex = store
            .create_type_vertex(&TypeDefHeader::new("Point"), TypeCategory::Struct)
            .unwrap();

        assert!(to_enum_def(&store, vertex).unwrap().is_none());
    }

    #[test]
    fn test_missing_value_list_reads_empty() {
        let store = test_store();
        let vertex = enum_vertex(&store, "Bare");

        let read = to_enum_def(&store, vertex).unwrap().unwrap();
        assert!(read.element_defs.is_empty());
    }

    #[test]
    fn test_missing_ordinal_is_invalid() {
        let store = test_store();
        let vertex = enum_vertex(&store, "Broken");
        store
            .set_property(
                vertex,
                "__type.Broken",
                PropertyValue::StringList(vec!["GHOST".to_string()]),
            )
            .unwrap();

        let err = to_enum_def(&store, vertex).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}

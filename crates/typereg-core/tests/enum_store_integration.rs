//! Integration tests for the enum type store.

use typereg_core::graph::{PropertyValue, SledTypeVertexStore, TypeVertexStore};
use typereg_core::{
    EnumDef, EnumElementDef, EnumTypeStore, Error, SearchFilter, StoreConfig, TypeCategory,
    TypeDefHeader,
};

struct TestContext {
    vertices: SledTypeVertexStore,
    _dir: tempfile::TempDir,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let vertices = SledTypeVertexStore::open(&StoreConfig::new(dir.path())).unwrap();
        Self {
            vertices,
            _dir: dir,
        }
    }

    fn store(&self) -> EnumTypeStore<'_, SledTypeVertexStore> {
        EnumTypeStore::new(&self.vertices)
    }
}

fn order_status() -> EnumDef {
    EnumDef::new("OrderStatus").with_elements([
        EnumElementDef::described("NEW", 0, "just placed"),
        EnumElementDef::described("SHIPPED", 1, ""),
        EnumElementDef::described("DELIVERED", 2, "final"),
    ])
}

fn simple(name: &str, values: &[&str]) -> EnumDef {
    EnumDef::new(name).with_elements(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| EnumElementDef::described(*v, i as i32, format!("{} value", v))),
    )
}

#[test]
fn test_order_status_example() {
    let ctx = TestContext::new();
    let store = ctx.store();

    let created = store.create(&order_status()).unwrap();
    let vertex = ctx
        .vertices
        .find_type_vertex_by_name("OrderStatus")
        .unwrap()
        .unwrap();

    assert_eq!(
        ctx.vertices.get_property(vertex, "__type.OrderStatus").unwrap(),
        Some(PropertyValue::StringList(vec![
            "NEW".to_string(),
            "SHIPPED".to_string(),
            "DELIVERED".to_string()
        ]))
    );
    assert!(ctx
        .vertices
        .get_property(vertex, "__type.OrderStatus.SHIPPED.description")
        .unwrap()
        .is_none());

    let fetched = store.get_by_name("OrderStatus").unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.element_values(), vec!["NEW", "SHIPPED", "DELIVERED"]);
    let ordinals: Vec<i32> = fetched.element_defs.iter().map(|e| e.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
    assert_eq!(
        fetched.element("NEW").unwrap().description.as_deref(),
        Some("just placed")
    );
    assert_eq!(fetched.element("SHIPPED").unwrap().description, None);
}

#[test]
fn test_roundtrip_by_name_and_guid() {
    let ctx = TestContext::new();
    let store = ctx.store();
    let input = EnumDef::new("Weekday").with_elements([
        EnumElementDef::described("WED", 3, "midweek"),
        EnumElementDef::described("MON", 1, "start"),
        EnumElementDef::described("FRI", 5, "end"),
    ]);

    let created = store.create(&input).unwrap();

    let by_name = store.get_by_name("Weekday").unwrap();
    let by_guid = store.get_by_guid(&created.header.guid).unwrap();
    assert_eq!(by_name.element_defs, input.element_defs);
    assert_eq!(by_guid, by_name);
}

#[test]
fn test_duplicate_create_fails() {
    let ctx = TestContext::new();
    let store = ctx.store();

    store.create(&order_status()).unwrap();
    let err = store.create(&order_status()).unwrap_err();

    assert!(matches!(err, Error::AlreadyExists(ref name) if name == "OrderStatus"));
    assert_eq!(store.get_all().unwrap().len(), 1);
}

#[test]
fn test_missing_identifiers_not_found() {
    let ctx = TestContext::new();
    let store = ctx.store();
    let def = order_status();

    assert!(store.get_by_name("Nope").unwrap_err().is_not_found());
    assert!(store.get_by_guid("nope").unwrap_err().is_not_found());
    assert!(store.update_by_name("Nope", &def).unwrap_err().is_not_found());
    assert!(store.update_by_guid("nope", &def).unwrap_err().is_not_found());
    assert!(store.delete_by_name("Nope").unwrap_err().is_not_found());
    assert!(store.delete_by_guid("nope").unwrap_err().is_not_found());
}

#[test]
fn test_lookups_ignore_other_categories() {
    let ctx = TestContext::new();
    let vertex = ctx
        .vertices
        .create_type_vertex(&TypeDefHeader::new("Address"), TypeCategory::Struct)
        .unwrap();
    let guid = ctx.vertices.vertex_to_header(vertex).unwrap().guid;
    let store = ctx.store();

    assert!(store.get_by_name("Address").unwrap_err().is_not_found());
    assert!(store.get_by_guid(&guid).unwrap_err().is_not_found());
    assert!(store.delete_by_name("Address").unwrap_err().is_not_found());
    assert!(ctx.vertices.find_type_vertex_by_name("Address").unwrap().is_some());
}

#[test]
fn test_update_shrinks_and_reorders() {
    let ctx = TestContext::new();
    let store = ctx.store();
    let created = store.create(&order_status()).unwrap();

    let update = EnumDef::new("OrderStatus").with_elements([
        EnumElementDef::described("DELIVERED", 7, "done"),
        EnumElementDef::new("NEW", 0),
    ]);
    let updated = store.update_by_name("OrderStatus", &update).unwrap();

    assert_eq!(updated.header.guid, created.header.guid);
    assert_eq!(updated.header.version, created.header.version);
    assert_eq!(updated.element_values(), vec!["DELIVERED", "NEW"]);
    assert_eq!(updated.element("DELIVERED").unwrap().ordinal, 7);
    assert_eq!(
        updated.element("DELIVERED").unwrap().description.as_deref(),
        Some("done")
    );
    // No description supplied for NEW: the previous one survives
    assert_eq!(
        updated.element("NEW").unwrap().description.as_deref(),
        Some("just placed")
    );
    assert!(!updated.has_element("SHIPPED"));
    assert_eq!(store.get_by_guid(&created.header.guid).unwrap(), updated);
}

#[test]
fn test_delete_by_name_and_guid() {
    let ctx = TestContext::new();
    let store = ctx.store();
    store.create(&simple("A", &["X"])).unwrap();
    let b = store.create(&simple("B", &["Y"])).unwrap();

    store.delete_by_name("A").unwrap();
    store.delete_by_guid(&b.header.guid).unwrap();

    assert!(store.get_all().unwrap().is_empty());
    assert_eq!(ctx.vertices.vertex_count(), 0);
    assert!(store.get_by_name("A").unwrap_err().is_not_found());

    // Names are reusable after deletion
    store.create(&simple("A", &["Z"])).unwrap();
    assert_eq!(store.get_by_name("A").unwrap().element_values(), vec!["Z"]);
}

#[test]
fn test_batch_create_drops_failures() {
    let ctx = TestContext::new();
    let store = ctx.store();
    store.create(&simple("Existing", &["A"])).unwrap();

    let inputs = vec![
        simple("One", &["A"]),
        simple("Existing", &["B", "C"]),
        simple("Two", &["A", "B"]),
        simple("One", &["Q"]),
        EnumDef::new(""),
    ];
    let outcome = store.create_all(inputs);

    assert_eq!(outcome.success_count(), 2);
    assert_eq!(outcome.failure_count(), 3);
    let names: Vec<&str> = outcome
        .succeeded
        .iter()
        .map(|d| d.header.name.as_str())
        .collect();
    assert_eq!(names, vec!["One", "Two"]);
    assert!(outcome.failed[0].1.is_already_exists());

    // Failed entries left no trace
    assert_eq!(store.get_by_name("Existing").unwrap().element_values(), vec!["A"]);
    assert_eq!(store.get_by_name("One").unwrap().element_values(), vec!["A"]);
    assert_eq!(store.get_all().unwrap().len(), 3);
    assert_eq!(ctx.vertices.vertex_count(), 3);

    assert_eq!(outcome.into_succeeded().len(), 2);
}

#[test]
fn test_failed_create_rolls_back_vertex() {
    let ctx = TestContext::new();
    let store = ctx.store();
    store.create(&simple("Other", &["X", "Y"])).unwrap();

    // "A.description" derives the same key as the description of "A"
    let colliding = EnumDef::new("E").with_elements([
        EnumElementDef::described("A", 0, "first"),
        EnumElementDef::new("A.description", 1),
    ]);
    let err = store.create(&colliding).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));

    assert_eq!(ctx.vertices.vertex_count(), 1);
    assert!(ctx.vertices.find_type_vertex_by_name("E").unwrap().is_none());
    assert!(store.get_by_name("E").unwrap_err().is_not_found());

    let names: Vec<String> = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|d| d.header.name)
        .collect();
    assert_eq!(names, vec!["Other"]);

    let retried = store.create(&simple("E", &["A", "B"])).unwrap();
    assert_eq!(retried.element_values(), vec!["A", "B"]);
    assert_eq!(store.get_all().unwrap().len(), 2);
}

#[test]
fn test_scan_skips_unreadable_enum() {
    let ctx = TestContext::new();
    let store = ctx.store();
    store.create(&simple("Good", &["A"])).unwrap();
    store.create(&simple("Broken", &["A", "B"])).unwrap();

    let vertex = ctx.vertices.find_type_vertex_by_name("Broken").unwrap().unwrap();
    ctx.vertices
        .set_property(
            vertex,
            "__type.Broken.B",
            PropertyValue::String("not an ordinal".to_string()),
        )
        .unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].header.name, "Good");
    assert_eq!(store.search(|_| true).unwrap().len(), 1);
    assert!(matches!(
        store.get_by_name("Broken").unwrap_err(),
        Error::InvalidData(_)
    ));
}

#[test]
fn test_batch_update_uses_each_name() {
    let ctx = TestContext::new();
    let store = ctx.store();
    store.create(&simple("A", &["X"])).unwrap();
    store.create(&simple("B", &["Y"])).unwrap();

    let outcome = store.update_all(vec![
        simple("A", &["X1", "X2"]),
        simple("Missing", &["M"]),
        simple("B", &["Y1"]),
    ]);

    assert_eq!(outcome.success_count(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0.header.name, "Missing");
    assert!(outcome.failed[0].1.is_not_found());
    assert_eq!(store.get_by_name("A").unwrap().element_values(), vec!["X1", "X2"]);
    assert_eq!(store.get_by_name("B").unwrap().element_values(), vec!["Y1"]);
}

#[test]
fn test_batch_deletes_skip_failures() {
    let ctx = TestContext::new();
    let store = ctx.store();
    store.create(&simple("A", &["X"])).unwrap();
    store.create(&simple("B", &["X"])).unwrap();
    let c = store.create(&simple("C", &["X"])).unwrap();
    let d = store.create(&simple("D", &["X"])).unwrap();

    let by_name = store.delete_by_names(vec!["A".into(), "Nope".into(), "B".into()]);
    assert_eq!(by_name.success_count(), 2);
    assert_eq!(by_name.failed[0].0, "Nope");

    let by_guid = store.delete_by_guids(vec![
        c.header.guid.clone(),
        c.header.guid.clone(),
        d.header.guid.clone(),
    ]);
    assert_eq!(by_guid.success_count(), 2);
    assert_eq!(by_guid.failure_count(), 1);
    assert!(by_guid.into_result().unwrap_err().is_not_found());

    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_search() {
    let ctx = TestContext::new();
    let store = ctx.store();
    let a = store.create(&simple("A", &["X"])).unwrap();
    store.create(&simple("B", &["X", "Y"])).unwrap();
    store.create(&simple("C", &["Z"])).unwrap();

    let nothing = store.search(|_| false).unwrap();
    assert!(nothing.is_empty());

    let mut everything: Vec<String> = store
        .search(|_| true)
        .unwrap()
        .into_iter()
        .map(|d| d.header.name)
        .collect();
    everything.sort();
    let mut all: Vec<String> = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|d| d.header.name)
        .collect();
    all.sort();
    assert_eq!(everything, all);

    let with_x = store.search(|d| d.has_element("X")).unwrap();
    assert_eq!(with_x.len(), 2);

    let by_guid = store
        .search_filter(&SearchFilter::new().with_guid(a.header.guid.clone()))
        .unwrap();
    assert_eq!(by_guid.len(), 1);
    assert_eq!(by_guid.list[0].header.name, "A");

    let excluded = store
        .search_filter(
            &SearchFilter::new()
                .with_category("enum")
                .without_name("A")
                .without_name("C"),
        )
        .unwrap();
    assert_eq!(excluded.len(), 1);
    assert_eq!(excluded.list[0].header.name, "B");

    let wrong_category = store
        .search_filter(&SearchFilter::new().with_category("STRUCT"))
        .unwrap();
    assert!(wrong_category.is_empty());
}

#[test]
fn test_definitions_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    {
        let vertices = SledTypeVertexStore::open(&config).unwrap();
        EnumTypeStore::new(&vertices).create(&order_status()).unwrap();
        vertices.flush().unwrap();
    }

    let vertices = SledTypeVertexStore::open(&config).unwrap();
    let fetched = EnumTypeStore::new(&vertices)
        .get_by_name("OrderStatus")
        .unwrap();
    assert_eq!(fetched.element_values(), vec!["NEW", "SHIPPED", "DELIVERED"]);
}

#[test]
fn test_store_over_trait_object() {
    let ctx = TestContext::new();
    let vertices: &dyn TypeVertexStore = &ctx.vertices;
    let store = EnumTypeStore::new(vertices);

    store.create(&order_status()).unwrap();
    assert_eq!(store.get_all().unwrap().len(), 1);
}

//! Sled-backed type vertex store.

use std::sync::atomic::{AtomicU64, Ordering};

use sled::{Batch, Db, Tree};
use tracing::{debug, instrument};

use super::vertex::VERTEX_ID_SIZE;
use super::{current_timestamp, PropertyValue, TypeVertexStore, Vertex, VertexId, VertexIter};
use crate::config::StoreConfig;
use crate::error::Error;
use crate::typedef::{TypeCategory, TypeDefHeader};

/// Tree name for vertex properties.
const PROPERTY_TREE: &str = "vertex:properties";

/// Tree name for the type name index (name -> vertex id).
const NAME_INDEX_TREE: &str = "index:type_name";

/// Tree name for the guid index (guid -> vertex id).
const GUID_INDEX_TREE: &str = "index:type_guid";

/// Tree name for the category index (category + vertex id -> empty).
const CATEGORY_INDEX_TREE: &str = "index:type_category";

// Header property keys. The `__typedef.` prefix never collides with keys
// produced by `property_key`, which all start with `__type.`.
const NAME_KEY: &str = "__typedef.name";
const CATEGORY_KEY: &str = "__typedef.category";
const GUID_KEY: &str = "__typedef.guid";
const DESCRIPTION_KEY: &str = "__typedef.description";
const TYPE_VERSION_KEY: &str = "__typedef.typeVersion";
const VERSION_KEY: &str = "__typedef.version";
const CREATED_BY_KEY: &str = "__typedef.createdBy";
const UPDATED_BY_KEY: &str = "__typedef.updatedBy";
const CREATE_TIME_KEY: &str = "__typedef.createTime";
const UPDATE_TIME_KEY: &str = "__typedef.updateTime";

/// Type vertex store persisted in sled.
///
/// Property key format: `[vertex_id (16 bytes)][property key (utf-8)]`, so
/// all properties of one vertex share a scannable prefix.
pub struct SledTypeVertexStore {
    db: Db,
    properties: Tree,
    name_index: Tree,
    guid_index: Tree,
    category_index: Tree,
}

impl SledTypeVertexStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: &StoreConfig) -> Result<Self, Error> {
        config.validate()?;
        let db = config.to_sled_config().open()?;
        Self::from_db(&db)
    }

    /// Open the store trees inside an existing sled database.
    pub fn from_db(db: &Db) -> Result<Self, Error> {
        Ok(Self {
            db: db.clone(),
            properties: db.open_tree(PROPERTY_TREE)?,
            name_index: db.open_tree(NAME_INDEX_TREE)?,
            guid_index: db.open_tree(GUID_INDEX_TREE)?,
            category_index: db.open_tree(CATEGORY_INDEX_TREE)?,
        })
    }

    /// Get the underlying sled database.
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Number of live type vertices across all categories.
    pub fn vertex_count(&self) -> usize {
        self.name_index.len()
    }

    /// List the property keys stored on a vertex, in key order.
    pub fn property_keys(&self, vertex: Vertex) -> Result<Vec<String>, Error> {
        let mut keys = Vec::new();
        for result in self.properties.scan_prefix(vertex.id().as_bytes()).keys() {
            let key = result?;
            let name = std::str::from_utf8(&key[VERTEX_ID_SIZE..])
                .map_err(|e| Error::InvalidData(format!("property key is not utf-8: {}", e)))?;
            keys.push(name.to_string());
        }
        Ok(keys)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }

    /// Generate a new vertex ID.
    ///
    /// Layout: `[timestamp micros (8 bytes)][counter (8 bytes)]`, with the
    /// RFC 4122 variant bits in the counter's high byte.
    fn generate_id() -> VertexId {
        // Counter to ensure uniqueness even with same timestamp
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let now = current_timestamp();
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

        let mut id = [0u8; VERTEX_ID_SIZE];
        id[..8].copy_from_slice(&now.to_be_bytes());
        id[8..].copy_from_slice(&counter.to_be_bytes());
        id[8] = (id[8] & 0x3f) | 0x80;

        VertexId(id)
    }

    /// Reserve a fresh guid in the guid index.
    ///
    /// Ids whose guid is already taken are skipped, so an existing entry is
    /// never overwritten.
    fn claim_guid(&self, mut next_id: impl FnMut() -> VertexId) -> Result<(VertexId, String), Error> {
        loop {
            let id = next_id();
            let guid = Self::format_guid(&id);
            let claimed = self.guid_index.compare_and_swap(
                guid.as_bytes(),
                None::<&[u8]>,
                Some(&id.as_bytes()[..]),
            )?;
            if claimed.is_ok() {
                return Ok((id, guid));
            }
            debug!(guid = %guid, "Guid already taken, regenerating");
        }
    }

    /// Format a vertex id as a hyphenated guid.
    fn format_guid(id: &VertexId) -> String {
        let b = id.as_bytes();
        format!(
            "{}-{}-{}-{}-{}",
            hex::encode(&b[0..4]),
            hex::encode(&b[4..6]),
            hex::encode(&b[6..8]),
            hex::encode(&b[8..10]),
            hex::encode(&b[10..16])
        )
    }

    /// Build the property tree key for a vertex property.
    fn property_tree_key(id: &VertexId, key: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(VERTEX_ID_SIZE + key.len());
        buf.extend_from_slice(id.as_bytes());
        buf.extend_from_slice(key.as_bytes());
        buf
    }

    /// Prefix of all category index entries for one category.
    fn category_prefix(category: TypeCategory) -> Vec<u8> {
        let mut buf = category.as_str().as_bytes().to_vec();
        buf.push(0x00);
        buf
    }

    /// Build the category index key for a vertex.
    fn category_index_key(category: TypeCategory, id: &VertexId) -> Vec<u8> {
        let mut buf = Self::category_prefix(category);
        buf.extend_from_slice(id.as_bytes());
        buf
    }

    /// Stage a header property into a batch.
    fn stage(batch: &mut Batch, id: &VertexId, key: &str, value: PropertyValue) -> Result<(), Error> {
        batch.insert(Self::property_tree_key(id, key), value.to_bytes()?);
        Ok(())
    }

    /// Resolve an index entry to a vertex.
    fn lookup(tree: &Tree, key: &[u8]) -> Result<Option<Vertex>, Error> {
        match tree.get(key)? {
            Some(bytes) => VertexId::from_slice(&bytes)
                .map(|id| Some(Vertex::new(id)))
                .ok_or_else(|| Error::InvalidData("corrupt vertex id in index".to_string())),
            None => Ok(None),
        }
    }

    fn read_string(&self, vertex: Vertex, key: &str) -> Result<Option<String>, Error> {
        match self.get_property(vertex, key)? {
            Some(PropertyValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(Error::InvalidData(format!(
                "header property {} holds a {} value",
                key,
                other.type_name()
            ))),
            None => Ok(None),
        }
    }

    fn read_long(&self, vertex: Vertex, key: &str) -> Result<Option<u64>, Error> {
        match self.get_property(vertex, key)? {
            Some(PropertyValue::Long(v)) => Ok(Some(v as u64)),
            Some(other) => Err(Error::InvalidData(format!(
                "header property {} holds a {} value",
                key,
                other.type_name()
            ))),
            None => Ok(None),
        }
    }

    fn vertex_category(&self, vertex: Vertex) -> Result<Option<TypeCategory>, Error> {
        match self.read_string(vertex, CATEGORY_KEY)? {
            Some(tag) => Ok(Some(tag.parse()?)),
            None => Ok(None),
        }
    }

    fn filter_category(
        &self,
        vertex: Option<Vertex>,
        category: TypeCategory,
    ) -> Result<Option<Vertex>, Error> {
        match vertex {
            Some(v) if self.is_type_vertex(v, category)? => Ok(Some(v)),
            _ => Ok(None),
        }
    }
}

impl TypeVertexStore for SledTypeVertexStore {
    fn find_type_vertex_by_name(&self, name: &str) -> Result<Option<Vertex>, Error> {
        Self::lookup(&self.name_index, name.as_bytes())
    }

    fn find_type_vertex_by_name_and_category(
        &self,
        name: &str,
        category: TypeCategory,
    ) -> Result<Option<Vertex>, Error> {
        let vertex = self.find_type_vertex_by_name(name)?;
        self.filter_category(vertex, category)
    }

    fn find_type_vertex_by_guid_and_category(
        &self,
        guid: &str,
        category: TypeCategory,
    ) -> Result<Option<Vertex>, Error> {
        let vertex = Self::lookup(&self.guid_index, guid.as_bytes())?;
        self.filter_category(vertex, category)
    }

    fn find_type_vertices_by_category(
        &self,
        category: TypeCategory,
    ) -> Result<VertexIter<'_>, Error> {
        let prefix = Self::category_prefix(category);
        let offset = prefix.len();

        let iter = self
            .category_index
            .scan_prefix(prefix)
            .keys()
            .map(move |result| -> Result<Vertex, Error> {
                let key = result?;
                VertexId::from_slice(&key[offset..])
                    .map(Vertex::new)
                    .ok_or_else(|| {
                        Error::InvalidData("corrupt vertex id in category index".to_string())
                    })
            });

        Ok(Box::new(iter))
    }

    #[instrument(level = "debug", skip(self, header), fields(name = %header.name))]
    fn create_type_vertex(
        &self,
        header: &TypeDefHeader,
        category: TypeCategory,
    ) -> Result<Vertex, Error> {
        if header.name.trim().is_empty() {
            return Err(Error::InvalidData("type name must not be empty".to_string()));
        }

        let (id, guid) = self.claim_guid(Self::generate_id)?;

        // Claim the name before writing so concurrent creates cannot both succeed
        let claimed = self.name_index.compare_and_swap(
            header.name.as_bytes(),
            None::<&[u8]>,
            Some(&id.as_bytes()[..]),
        )?;
        if claimed.is_err() {
            self.guid_index.remove(guid.as_bytes())?;
            return Err(Error::AlreadyExists(header.name.clone()));
        }

        let now = current_timestamp() as i64;

        let result = (|| -> Result<(), Error> {
            let mut batch = Batch::default();
            Self::stage(&mut batch, &id, NAME_KEY, PropertyValue::String(header.name.clone()))?;
            Self::stage(
                &mut batch,
                &id,
                CATEGORY_KEY,
                PropertyValue::String(category.as_str().to_string()),
            )?;
            Self::stage(&mut batch, &id, GUID_KEY, PropertyValue::String(guid.clone()))?;
            Self::stage(
                &mut batch,
                &id,
                TYPE_VERSION_KEY,
                PropertyValue::String(header.type_version.clone()),
            )?;
            Self::stage(&mut batch, &id, VERSION_KEY, PropertyValue::Long(1))?;
            Self::stage(&mut batch, &id, CREATE_TIME_KEY, PropertyValue::Long(now))?;
            Self::stage(&mut batch, &id, UPDATE_TIME_KEY, PropertyValue::Long(now))?;
            if let Some(description) = &header.description {
                Self::stage(&mut batch, &id, DESCRIPTION_KEY, PropertyValue::String(description.clone()))?;
            }
            if let Some(created_by) = &header.created_by {
                Self::stage(&mut batch, &id, CREATED_BY_KEY, PropertyValue::String(created_by.clone()))?;
            }
            if let Some(updated_by) = &header.updated_by {
                Self::stage(&mut batch, &id, UPDATED_BY_KEY, PropertyValue::String(updated_by.clone()))?;
            }

            self.properties.apply_batch(batch)?;
            self.category_index
                .insert(Self::category_index_key(category, &id), Vec::<u8>::new())?;
            Ok(())
        })();

        if let Err(e) = result {
            // Release the name and guid so the type can be created again
            self.name_index.remove(header.name.as_bytes())?;
            self.guid_index.remove(guid.as_bytes())?;
            return Err(e);
        }

        debug!(vertex = %id, guid = %guid, category = %category, "Created type vertex");
        Ok(Vertex::new(id))
    }

    #[instrument(level = "debug", skip(self, vertex), fields(vertex = %vertex.id()))]
    fn delete_type_vertex(&self, vertex: Vertex) -> Result<(), Error> {
        let id = vertex.id();
        let name = self.read_string(vertex, NAME_KEY)?;
        let guid = self.read_string(vertex, GUID_KEY)?;
        let category = self.vertex_category(vertex)?;

        let mut batch = Batch::default();
        let mut removed = 0usize;
        for result in self.properties.scan_prefix(id.as_bytes()).keys() {
            batch.remove(result?);
            removed += 1;
        }
        self.properties.apply_batch(batch)?;

        // Only drop index entries that still point at this vertex
        if let Some(name) = name {
            let _ = self.name_index.compare_and_swap(
                name.as_bytes(),
                Some(&id.as_bytes()[..]),
                None::<&[u8]>,
            )?;
        }
        if let Some(guid) = guid {
            let _ = self.guid_index.compare_and_swap(
                guid.as_bytes(),
                Some(&id.as_bytes()[..]),
                None::<&[u8]>,
            )?;
        }
        if let Some(category) = category {
            self.category_index
                .remove(Self::category_index_key(category, &id))?;
        }

        debug!(properties = removed, "Deleted type vertex");
        Ok(())
    }

    fn is_type_vertex(&self, vertex: Vertex, category: TypeCategory) -> Result<bool, Error> {
        Ok(self.vertex_category(vertex)? == Some(category))
    }

    fn vertex_to_header(&self, vertex: Vertex) -> Result<TypeDefHeader, Error> {
        let name = self.read_string(vertex, NAME_KEY)?.ok_or_else(|| {
            Error::InvalidData(format!("vertex {} has no type name", vertex.id()))
        })?;
        let guid = self.read_string(vertex, GUID_KEY)?.ok_or_else(|| {
            Error::InvalidData(format!("vertex {} has no guid", vertex.id()))
        })?;

        Ok(TypeDefHeader {
            guid,
            name,
            description: self.read_string(vertex, DESCRIPTION_KEY)?,
            type_version: self
                .read_string(vertex, TYPE_VERSION_KEY)?
                .unwrap_or_default(),
            version: self.read_long(vertex, VERSION_KEY)?.unwrap_or(0),
            created_by: self.read_string(vertex, CREATED_BY_KEY)?,
            updated_by: self.read_string(vertex, UPDATED_BY_KEY)?,
            create_time: self.read_long(vertex, CREATE_TIME_KEY)?.unwrap_or(0),
            update_time: self.read_long(vertex, UPDATE_TIME_KEY)?.unwrap_or(0),
        })
    }

    fn get_property(&self, vertex: Vertex, key: &str) -> Result<Option<PropertyValue>, Error> {
        match self
            .properties
            .get(Self::property_tree_key(&vertex.id(), key))?
        {
            Some(bytes) => Ok(Some(PropertyValue::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set_property(&self, vertex: Vertex, key: &str, value: PropertyValue) -> Result<(), Error> {
        self.properties
            .insert(Self::property_tree_key(&vertex.id(), key), value.to_bytes()?)?;
        Ok(())
    }
}

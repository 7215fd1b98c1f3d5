//! Enum type definition store.

use tracing::{debug, error, instrument, warn};

use super::mapping::{to_enum_def, to_vertex};
use super::BatchOutcome;
use crate::error::Error;
use crate::graph::{TypeVertexStore, Vertex};
use crate::search::SearchFilter;
use crate::typedef::{EnumDef, EnumDefs, TypeCategory};

/// Create, read, update, delete and search enum type definitions.
///
/// The store keeps no state of its own. Every call resolves the backing
/// vertex through the borrowed [`TypeVertexStore`] and returns what is
/// persisted there, never the caller's input.
pub struct EnumTypeStore<'a, S: ?Sized> {
    vertices: &'a S,
}

impl<'a, S: TypeVertexStore + ?Sized> EnumTypeStore<'a, S> {
    /// Create an enum store over a vertex store.
    pub fn new(vertices: &'a S) -> Self {
        Self { vertices }
    }

    /// Persist a new enum definition.
    ///
    /// Fails with [`Error::AlreadyExists`] if any type, of any category,
    /// already uses the name.
    #[instrument(level = "debug", skip(self, enum_def), fields(name = %enum_def.header.name))]
    pub fn create(&self, enum_def: &EnumDef) -> Result<EnumDef, Error> {
        let name = &enum_def.header.name;

        if self.vertices.find_type_vertex_by_name(name)?.is_some() {
            return Err(Error::AlreadyExists(name.clone()));
        }

        let vertex = self
            .vertices
            .create_type_vertex(&enum_def.header, TypeCategory::Enum)?;

        let ret = match to_vertex(self.vertices, name, enum_def, vertex)
            .and_then(|()| self.read_back(vertex))
        {
            Ok(ret) => ret,
            Err(e) => {
                // Drop the partial vertex so the name can be claimed again
                self.vertices.delete_type_vertex(vertex)?;
                return Err(e);
            }
        };

        debug!(guid = %ret.header.guid, elements = ret.element_defs.len(), "Created enum type");
        Ok(ret)
    }

    /// Create each definition independently.
    ///
    /// Failing entries are logged and reported in the outcome; the batch
    /// itself never fails.
    #[instrument(level = "debug", skip_all, fields(count = enum_defs.len()))]
    pub fn create_all(&self, enum_defs: Vec<EnumDef>) -> BatchOutcome<EnumDef, EnumDef> {
        let mut outcome = BatchOutcome::new();

        for enum_def in enum_defs {
            match self.create(&enum_def) {
                Ok(created) => outcome.push_success(created),
                Err(e) => {
                    error!(name = %enum_def.header.name, error = %e, "Failed to create enum type");
                    outcome.push_failure(enum_def, e);
                }
            }
        }

        debug!(
            created = outcome.success_count(),
            failed = outcome.failure_count(),
            "Batch create finished"
        );
        outcome
    }

    /// Read every enum definition.
    #[instrument(level = "debug", skip(self))]
    pub fn get_all(&self) -> Result<Vec<EnumDef>, Error> {
        let enum_defs = self.scan()?;
        debug!(count = enum_defs.len(), "Loaded enum types");
        Ok(enum_defs)
    }

    /// Read an enum definition by name.
    #[instrument(level = "debug", skip(self))]
    pub fn get_by_name(&self, name: &str) -> Result<EnumDef, Error> {
        let vertex = self.vertex_by_name(name)?;
        let ret = self.read_back(vertex)?;
        debug!(elements = ret.element_defs.len(), "Loaded enum type");
        Ok(ret)
    }

    /// Read an enum definition by guid.
    #[instrument(level = "debug", skip(self))]
    pub fn get_by_guid(&self, guid: &str) -> Result<EnumDef, Error> {
        let vertex = self.vertex_by_guid(guid)?;
        let ret = self.read_back(vertex)?;
        debug!(elements = ret.element_defs.len(), "Loaded enum type");
        Ok(ret)
    }

    /// Rewrite the elements of the enum registered under `name`.
    ///
    /// Name, guid and header of the stored definition are left unchanged;
    /// only the element properties are overwritten from `enum_def`.
    #[instrument(level = "debug", skip(self, enum_def))]
    pub fn update_by_name(&self, name: &str, enum_def: &EnumDef) -> Result<EnumDef, Error> {
        let vertex = self.vertex_by_name(name)?;
        self.rewrite(vertex, enum_def)
    }

    /// Rewrite the elements of the enum with the given guid.
    #[instrument(level = "debug", skip(self, enum_def))]
    pub fn update_by_guid(&self, guid: &str, enum_def: &EnumDef) -> Result<EnumDef, Error> {
        let vertex = self.vertex_by_guid(guid)?;
        self.rewrite(vertex, enum_def)
    }

    /// Update each definition independently, keyed by its own name.
    #[instrument(level = "debug", skip_all, fields(count = enum_defs.len()))]
    pub fn update_all(&self, enum_defs: Vec<EnumDef>) -> BatchOutcome<EnumDef, EnumDef> {
        let mut outcome = BatchOutcome::new();

        for enum_def in enum_defs {
            match self.update_by_name(&enum_def.header.name, &enum_def) {
                Ok(updated) => outcome.push_success(updated),
                Err(e) => {
                    error!(name = %enum_def.header.name, error = %e, "Failed to update enum type");
                    outcome.push_failure(enum_def, e);
                }
            }
        }

        debug!(
            updated = outcome.success_count(),
            failed = outcome.failure_count(),
            "Batch update finished"
        );
        outcome
    }

    /// Delete the enum registered under `name`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_by_name(&self, name: &str) -> Result<(), Error> {
        let vertex = self.vertex_by_name(name)?;
        self.vertices.delete_type_vertex(vertex)?;
        debug!("Deleted enum type");
        Ok(())
    }

    /// Delete the enum with the given guid.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_by_guid(&self, guid: &str) -> Result<(), Error> {
        let vertex = self.vertex_by_guid(guid)?;
        self.vertices.delete_type_vertex(vertex)?;
        debug!("Deleted enum type");
        Ok(())
    }

    /// Delete each named enum independently.
    #[instrument(level = "debug", skip_all, fields(count = names.len()))]
    pub fn delete_by_names(&self, names: Vec<String>) -> BatchOutcome<String, ()> {
        self.delete_each(names, |name| self.delete_by_name(name))
    }

    /// Delete each enum guid independently.
    #[instrument(level = "debug", skip_all, fields(count = guids.len()))]
    pub fn delete_by_guids(&self, guids: Vec<String>) -> BatchOutcome<String, ()> {
        self.delete_each(guids, |guid| self.delete_by_guid(guid))
    }

    /// Return every enum definition accepted by `predicate`.
    ///
    /// Always scans the whole category; the predicate is applied in memory.
    #[instrument(level = "debug", skip_all)]
    pub fn search<P>(&self, predicate: P) -> Result<EnumDefs, Error>
    where
        P: Fn(&EnumDef) -> bool,
    {
        let mut enum_defs = self.scan()?;
        enum_defs.retain(|d| predicate(d));

        debug!(matched = enum_defs.len(), "Enum search finished");
        Ok(EnumDefs::new(enum_defs))
    }

    /// Return every enum definition matching a search filter.
    #[instrument(level = "debug", skip(self))]
    pub fn search_filter(&self, filter: &SearchFilter) -> Result<EnumDefs, Error> {
        self.search(filter.predicate::<EnumDef>())
    }

    fn vertex_by_name(&self, name: &str) -> Result<Vertex, Error> {
        self.vertices
            .find_type_vertex_by_name_and_category(name, TypeCategory::Enum)?
            .ok_or_else(|| Error::enum_not_found_by_name(name))
    }

    fn vertex_by_guid(&self, guid: &str) -> Result<Vertex, Error> {
        self.vertices
            .find_type_vertex_by_guid_and_category(guid, TypeCategory::Enum)?
            .ok_or_else(|| Error::enum_not_found_by_guid(guid))
    }

    fn rewrite(&self, vertex: Vertex, enum_def: &EnumDef) -> Result<EnumDef, Error> {
        // Keys follow the registered name, not the one on the input
        let name = self.vertices.vertex_to_header(vertex)?.name;
        to_vertex(self.vertices, &name, enum_def, vertex)?;

        let ret = self.read_back(vertex)?;
        debug!(guid = %ret.header.guid, elements = ret.element_defs.len(), "Updated enum type");
        Ok(ret)
    }

    fn read_back(&self, vertex: Vertex) -> Result<EnumDef, Error> {
        to_enum_def(self.vertices, vertex)?.ok_or_else(|| {
            Error::InvalidData(format!("vertex {} is not an enum type", vertex.id()))
        })
    }

    fn scan(&self) -> Result<Vec<EnumDef>, Error> {
        let mut enum_defs = Vec::new();

        for vertex in self
            .vertices
            .find_type_vertices_by_category(TypeCategory::Enum)?
        {
            let vertex = vertex?;
            match to_enum_def(self.vertices, vertex) {
                Ok(Some(enum_def)) => enum_defs.push(enum_def),
                Ok(None) => {}
                Err(e) => {
                    warn!(vertex = %vertex.id(), error = %e, "Skipping unreadable enum type");
                }
            }
        }

        Ok(enum_defs)
    }

    fn delete_each<F>(&self, keys: Vec<String>, delete: F) -> BatchOutcome<String, ()>
    where
        F: Fn(&str) -> Result<(), Error>,
    {
        let mut outcome = BatchOutcome::new();

        for key in keys {
            match delete(&key) {
                Ok(()) => outcome.push_success(()),
                Err(e) => {
                    error!(key = %key, error = %e, "Failed to delete enum type");
                    outcome.push_failure(key, e);
                }
            }
        }

        outcome
    }
}

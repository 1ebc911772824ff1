//! Seams to the live database.
//!
//! Reading schema state and applying DDL both happen outside this crate.
//! Operations receive a [`Catalog`] on every `validate` call and a
//! [`SchemaExecutor`] on `execute`; the in-memory implementations here back
//! dry runs and tests.
mod executor;
mod memory;

pub use executor::RecordingExecutor;
pub use memory::MemoryCatalog;

use crate::{error::CatalogError, model::table::TableModel};
use std::sync::Arc;

///
/// Catalog
///
/// Read-only view of live schema state. Results may be stale by the time a
/// validated change is executed; nothing here locks.
///

pub trait Catalog {
    /// Snapshot of a table, if it exists.
    fn table(&self, name: &str) -> Result<Option<Arc<TableModel>>, CatalogError>;

    /// Snapshots of every table.
    fn tables(&self) -> Result<Vec<Arc<TableModel>>, CatalogError>;

    /// Number of index entries (key or storing) that reference the column.
    fn count_indexed_columns(&self, column: &str, table: &str) -> Result<u64, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn table(&self, name: &str) -> Result<Option<Arc<TableModel>>, CatalogError> {
        (**self).table(name)
    }

    fn tables(&self) -> Result<Vec<Arc<TableModel>>, CatalogError> {
        (**self).tables()
    }

    fn count_indexed_columns(&self, column: &str, table: &str) -> Result<u64, CatalogError> {
        (**self).count_indexed_columns(column, table)
    }
}

///
/// SchemaExecutor
///
/// Sends one DDL statement to the database and waits for it to apply.
/// Timeouts and cancellation are the implementor's concern.
///

pub trait SchemaExecutor {
    type Error;

    fn apply_schema_change(&mut self, ddl: &str) -> Result<(), Self::Error>;
}

impl<E: SchemaExecutor + ?Sized> SchemaExecutor for &mut E {
    type Error = E::Error;

    fn apply_schema_change(&mut self, ddl: &str) -> Result<(), Self::Error> {
        (**self).apply_schema_change(ddl)
    }
}

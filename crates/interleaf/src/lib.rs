//! Schema-change validation and DDL synthesis for interleaved table schemas.
//!
//! The crate owns the typed column/index model and the closed set of
//! schema-update operations. Each operation checks itself against a live
//! [`catalog::Catalog`] and renders exactly one DDL statement; sending that
//! statement to the database is left to a [`catalog::SchemaExecutor`].

pub mod catalog;
pub mod error;
pub mod model;
pub mod types;
pub mod update;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Reserved name of the index every table carries over its primary key.
pub const PRIMARY_INDEX: &str = "PRIMARY_KEY";

/// Size keyword rendered by sized types when no bound is declared.
pub const MAX_SIZE_KEYWORD: &str = "MAX";

/// Column option enabling server-assigned commit timestamps.
pub const COMMIT_TIMESTAMP_OPTION: &str = "OPTIONS (allow_commit_timestamp=true)";

///
/// Prelude
///
/// Domain vocabulary plus the operation contract, so a migration can be
/// written against a single import.
///

pub mod prelude {
    pub use crate::{
        catalog::{Catalog, MemoryCatalog, RecordingExecutor, SchemaExecutor},
        error::{ExecuteError, ModelError, SchemaError, ValueError},
        model::{
            column::{Column, ColumnDef},
            index::{Index, IndexDef, SortOrder},
            relation::Relation,
            table::{TableBuilder, TableModel},
        },
        types::{FieldType, ResolvedType, WireType},
        update::{
            AddColumn, AddForeignKeyConstraint, AlterColumn, CreateIndex, CreateTable,
            DropColumn, DropForeignKeyConstraint, DropIndex, DropTable, NoUpdate, SchemaChange,
            SchemaUpdate, UpdateKind, model_creation_ddl,
        },
        value::Value,
    };
}

use crate::{types::FieldType, value::Value};
use std::error::Error as StdError;
use thiserror::Error as ThisError;

///
/// ModelError
///
/// Raised while building descriptors from mutually exclusive or malformed
/// inputs. The caller has to fix the declaration and build again.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("allow_commit_timestamp can not be set on a {ty} column")]
    CommitTimestampNotAllowed { ty: FieldType },

    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{table}' declares index '{index}' more than once")]
    DuplicateIndex { table: String, index: String },

    #[error("table '{table}' declares relation '{relation}' more than once")]
    DuplicateRelation { table: String, relation: String },

    #[error("an index must have at least one column")]
    EmptyIndex,

    #[error("table '{table}' has no primary key")]
    NoPrimaryKey { table: String },

    #[error("a single sort order can only be set on a single-column index, got {columns} columns")]
    OrderingShorthand { columns: usize },

    #[error("table '{table}' can not declare an index named '{index}'")]
    ReservedIndexName { table: String, index: String },
}

///
/// SchemaError
///
/// Validation failures: the catalog contradicts the intended change.
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("column '{column}' is indexed")]
    ColumnIndexed { column: String },

    #[error("column '{column}' is a primary key on '{table}'")]
    ColumnIsPrimaryKey { table: String, column: String },

    #[error("column '{column}' does not exist on '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("column '{column}' is not nullable")]
    ColumnNotNullable { column: String },

    #[error("column '{column}' is changing type")]
    ColumnTypeChange { column: String },

    #[error("column '{column}' has no changes")]
    ColumnUnchanged { column: String },

    #[error("index '{index}' already exists")]
    IndexExists { index: String },

    #[error("index '{index}' has no columns")]
    IndexNoColumns { index: String },

    #[error("index '{index}' does not exist")]
    IndexNotFound { index: String },

    #[error("table '{table}' has interleaved index '{index}'")]
    InterleavedIndexExists { table: String, index: String },

    #[error("table '{table}' has interleaved table '{child}'")]
    InterleavedTableExists { table: String, child: String },

    #[error("table '{table}' has no primary key")]
    NoPrimaryKey { table: String },

    #[error("'{parent}' is not a parent of table '{table}'")]
    NotAParent { table: String, parent: String },

    #[error("table '{table}' is not a child of parent table '{parent}'")]
    NotChildOfParent { table: String, parent: String },

    #[error("index '{index}' is the primary index")]
    PrimaryIndex { index: String },

    #[error("table '{table}' column '{column}' in primary key but not in schema")]
    PrimaryKeyNotInSchema { table: String, column: String },

    #[error("table '{table}' has a secondary index")]
    SecondaryIndexExists { table: String },

    #[error("'{column}' is part of the primary key for '{table}'")]
    StoringPrimaryKey { table: String, column: String },

    #[error("table '{table}' already exists")]
    TableExists { table: String },

    #[error("new table has no name")]
    TableNameEmpty,

    #[error("table '{table}' does not exist")]
    TableNotFound { table: String },

    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    #[error("no corresponding type for '{ddl}'")]
    UnknownType { ddl: String },
}

///
/// ValueError
///
/// A runtime value does not match the declared column type.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ValueError {
    #[error("{value} is not of type date (YYYY-[M]M-[D]D)")]
    InvalidDate { value: String },

    #[error("{value} is not of type {expected}")]
    Mismatch {
        value: String,
        expected: &'static str,
    },

    #[error("null set for non-nullable column")]
    Null,
}

impl ValueError {
    pub(crate) fn mismatch(value: &Value, expected: &'static str) -> Self {
        Self::Mismatch {
            value: value.to_string(),
            expected,
        }
    }
}

///
/// CatalogError
///
/// Failure reported by the external catalog collaborator. The source is kept
/// opaque; this crate never interprets it.
///

#[derive(Debug, ThisError)]
#[error("catalog query failed: {message}")]
pub struct CatalogError {
    message: String,

    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CatalogError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

///
/// ExecuteError
///
/// Either validation rejected the change, or the executor did. Executor
/// errors are passed through untouched.
///

#[derive(Debug, ThisError)]
pub enum ExecuteError<E> {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("schema change rejected by executor: {0}")]
    Executor(E),
}

impl<E> ExecuteError<E> {
    /// Return the executor error, if the change got that far.
    pub fn into_executor(self) -> Option<E> {
        match self {
            Self::Executor(err) => Some(err),
            Self::Schema(_) => None,
        }
    }
}

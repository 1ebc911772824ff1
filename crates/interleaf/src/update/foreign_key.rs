use crate::{
    catalog::Catalog,
    error::SchemaError,
    model::{relation::Relation, table::TableModel},
    update::{SchemaChange, UpdateKind, require_table},
};
use tracing::trace;

///
/// AddForeignKeyConstraint
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddForeignKeyConstraint {
    table: String,
    relation: Relation,
}

impl AddForeignKeyConstraint {
    pub fn new(table: impl Into<String>, relation: Relation) -> Self {
        Self {
            table: table.into(),
            relation,
        }
    }

    #[must_use]
    pub const fn relation(&self) -> &Relation {
        &self.relation
    }
}

fn require_columns<'a>(
    model: &TableModel,
    mut columns: impl Iterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    match columns.find(|column| !model.has_column(column)) {
        Some(column) => Err(SchemaError::ColumnNotFound {
            table: model.name().to_string(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

impl SchemaChange for AddForeignKeyConstraint {
    fn kind(&self) -> UpdateKind {
        UpdateKind::AddForeignKeyConstraint
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(
            kind = %self.kind(),
            table = %self.table,
            destination = %self.relation.destination(),
            "validating schema change"
        );

        let local = require_table(catalog, &self.table)?;
        let destination = require_table(catalog, self.relation.destination())?;

        require_columns(&local, self.relation.local_columns())?;
        require_columns(&destination, self.relation.destination_columns())
    }

    fn ddl(&self) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.table,
            self.relation.constraint_ddl()
        )
    }
}

///
/// DropForeignKeyConstraint
///
/// Only the table is checked; whether the constraint exists is left to the
/// database.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropForeignKeyConstraint {
    table: String,
    name: String,
}

impl DropForeignKeyConstraint {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }
}

impl SchemaChange for DropForeignKeyConstraint {
    fn kind(&self) -> UpdateKind {
        UpdateKind::DropForeignKeyConstraint
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(kind = %self.kind(), table = %self.table, "validating schema change");

        require_table(catalog, &self.table).map(|_| ())
    }

    fn ddl(&self) -> String {
        format!("ALTER TABLE {} DROP CONSTRAINT {}", self.table, self.name)
    }
}

///
/// TESTS
///

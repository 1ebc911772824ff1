use crate::{
    catalog::Catalog,
    error::SchemaError,
    model::column::{Column, ColumnDef},
    update::{SchemaChange, UpdateKind, require_table},
};
use tracing::trace;

///
/// AddColumn
///
/// Adds a nullable, non-key column to an existing table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddColumn {
    table: String,
    column: Column,
}

impl AddColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>, def: ColumnDef) -> Self {
        Self {
            table: table.into(),
            column: def.named(column),
        }
    }
}

impl SchemaChange for AddColumn {
    fn kind(&self) -> UpdateKind {
        UpdateKind::AddColumn
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(kind = %self.kind(), table = %self.table, "validating schema change");

        require_table(catalog, &self.table)?;

        if !self.column.is_nullable() {
            return Err(SchemaError::ColumnNotNullable {
                column: self.column.name().to_string(),
            });
        }
        if self.column.is_primary_key() {
            return Err(SchemaError::ColumnIsPrimaryKey {
                table: self.table.clone(),
                column: self.column.name().to_string(),
            });
        }

        Ok(())
    }

    fn ddl(&self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table,
            self.column.name(),
            self.column.ddl()
        )
    }
}

///
/// DropColumn
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropColumn {
    table: String,
    column: String,
}

impl DropColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl SchemaChange for DropColumn {
    fn kind(&self) -> UpdateKind {
        UpdateKind::DropColumn
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(kind = %self.kind(), table = %self.table, "validating schema change");

        let model = require_table(catalog, &self.table)?;

        if !model.has_column(&self.column) {
            return Err(SchemaError::ColumnNotFound {
                table: self.table.clone(),
                column: self.column.clone(),
            });
        }

        // the catalog count covers every index, primary included
        if catalog.count_indexed_columns(&self.column, &self.table)? > 0 {
            return Err(SchemaError::ColumnIndexed {
                column: self.column.clone(),
            });
        }

        Ok(())
    }

    fn ddl(&self) -> String {
        format!("ALTER TABLE {} DROP COLUMN {}", self.table, self.column)
    }
}

///
/// AlterColumn
///
/// Only nullability may change; type and key membership are fixed.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlterColumn {
    table: String,
    column: Column,
}

impl AlterColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>, def: ColumnDef) -> Self {
        Self {
            table: table.into(),
            column: def.named(column),
        }
    }
}

impl SchemaChange for AlterColumn {
    fn kind(&self) -> UpdateKind {
        UpdateKind::AlterColumn
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(kind = %self.kind(), table = %self.table, "validating schema change");

        let model = require_table(catalog, &self.table)?;
        let name = self.column.name();

        let existing = model
            .column(name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.table.clone(),
                column: name.to_string(),
            })?;

        if model.is_primary_key(name) {
            return Err(SchemaError::ColumnIsPrimaryKey {
                table: self.table.clone(),
                column: name.to_string(),
            });
        }
        if existing.ty() != self.column.ty() {
            return Err(SchemaError::ColumnTypeChange {
                column: name.to_string(),
            });
        }
        if existing.is_nullable() == self.column.is_nullable() {
            return Err(SchemaError::ColumnUnchanged {
                column: name.to_string(),
            });
        }

        Ok(())
    }

    fn ddl(&self) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            self.table,
            self.column.name(),
            self.column.ddl()
        )
    }
}

///
/// TESTS
///

//! Schema-update operations.
//!
//! Every operation checks itself against a [`Catalog`] and renders exactly
//! one DDL statement. [`SchemaUpdate`] closes the set so a migration can hold
//! a heterogeneous list of changes without trait objects.
mod column;
mod foreign_key;
mod index;
mod table;


use crate::{
    catalog::{Catalog, SchemaExecutor},
    error::{ExecuteError, SchemaError},
    model::table::TableModel,
};
use derive_more::{Display, From};
use std::{iter, sync::Arc};
use tracing::debug;

// re-exports
pub use column::{AddColumn, AlterColumn, DropColumn};
pub use foreign_key::{AddForeignKeyConstraint, DropForeignKeyConstraint};
pub use index::{CreateIndex, DropIndex};
pub use table::{CreateTable, DropTable};

///
/// UpdateKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum UpdateKind {
    AddColumn,
    AddForeignKeyConstraint,
    AlterColumn,
    CreateIndex,
    CreateTable,
    DropColumn,
    DropForeignKeyConstraint,
    DropIndex,
    DropTable,
    NoUpdate,
}

///
/// SchemaChange
///
/// Contract shared by every operation. `validate` only reads the catalog;
/// `execute` validates, then hands the rendered statement to the executor.
/// Nothing is cached, so executing twice issues the statement twice.
///

pub trait SchemaChange {
    fn kind(&self) -> UpdateKind;

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized;

    fn ddl(&self) -> String;

    fn execute<C, X>(&self, catalog: &C, executor: &mut X) -> Result<(), ExecuteError<X::Error>>
    where
        C: Catalog + ?Sized,
        X: SchemaExecutor + ?Sized,
    {
        self.validate(catalog)?;

        let ddl = self.ddl();
        debug!(kind = %self.kind(), %ddl, "applying schema change");

        executor
            .apply_schema_change(&ddl)
            .map_err(ExecuteError::Executor)
    }
}

///
/// SchemaUpdate
///

#[derive(Clone, Debug, From)]
pub enum SchemaUpdate {
    AddColumn(AddColumn),
    AddForeignKeyConstraint(AddForeignKeyConstraint),
    AlterColumn(AlterColumn),
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    DropColumn(DropColumn),
    DropForeignKeyConstraint(DropForeignKeyConstraint),
    DropIndex(DropIndex),
    DropTable(DropTable),
    NoUpdate(NoUpdate),
}

macro_rules! dispatch {
    ($self:expr, $update:ident => $body:expr) => {
        match $self {
            SchemaUpdate::AddColumn($update) => $body,
            SchemaUpdate::AddForeignKeyConstraint($update) => $body,
            SchemaUpdate::AlterColumn($update) => $body,
            SchemaUpdate::CreateIndex($update) => $body,
            SchemaUpdate::CreateTable($update) => $body,
            SchemaUpdate::DropColumn($update) => $body,
            SchemaUpdate::DropForeignKeyConstraint($update) => $body,
            SchemaUpdate::DropIndex($update) => $body,
            SchemaUpdate::DropTable($update) => $body,
            SchemaUpdate::NoUpdate($update) => $body,
        }
    };
}

impl SchemaChange for SchemaUpdate {
    fn kind(&self) -> UpdateKind {
        dispatch!(self, update => update.kind())
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        dispatch!(self, update => update.validate(catalog))
    }

    fn ddl(&self) -> String {
        dispatch!(self, update => update.ddl())
    }

    fn execute<C, X>(&self, catalog: &C, executor: &mut X) -> Result<(), ExecuteError<X::Error>>
    where
        C: Catalog + ?Sized,
        X: SchemaExecutor + ?Sized,
    {
        dispatch!(self, update => update.execute(catalog, executor))
    }
}

///
/// NoUpdate
///
/// Placeholder for migrations that change data but not schema. Never reaches
/// the executor.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoUpdate;

impl SchemaChange for NoUpdate {
    fn kind(&self) -> UpdateKind {
        UpdateKind::NoUpdate
    }

    fn validate<C>(&self, _: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        Ok(())
    }

    fn ddl(&self) -> String {
        String::new()
    }

    fn execute<C, X>(&self, _: &C, _: &mut X) -> Result<(), ExecuteError<X::Error>>
    where
        C: Catalog + ?Sized,
        X: SchemaExecutor + ?Sized,
    {
        Ok(())
    }
}

///
/// model_creation_ddl
///
/// Statements that create a table from scratch: the table itself, then one
/// `CREATE INDEX` per secondary index in declaration order. Not validated.
///

#[must_use]
pub fn model_creation_ddl(model: &TableModel) -> Vec<String> {
    iter::once(CreateTable::from_model(model).ddl())
        .chain(
            model
                .secondary_indexes()
                .map(|index| CreateIndex::from_index(model.name(), index).ddl()),
        )
        .collect()
}

// Look up a table the change operates on.
fn require_table<C>(catalog: &C, table: &str) -> Result<Arc<TableModel>, SchemaError>
where
    C: Catalog + ?Sized,
{
    catalog.table(table)?.ok_or_else(|| SchemaError::TableNotFound {
        table: table.to_string(),
    })
}

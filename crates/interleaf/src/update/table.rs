use crate::{
    catalog::Catalog,
    error::SchemaError,
    model::{column::Column, relation::Relation, table::TableModel},
    update::{SchemaChange, UpdateKind, require_table},
};
use std::sync::Arc;
use tracing::trace;

///
/// CreateTable
///
/// Creates a new table, optionally interleaved in an existing parent.
///

#[derive(Clone, Debug)]
pub struct CreateTable {
    name: String,
    primary_keys: Vec<String>,
    columns: Vec<Column>,
    relations: Vec<Relation>,
    interleaved: Option<Arc<TableModel>>,
}

impl CreateTable {
    #[must_use]
    pub fn from_model(model: &TableModel) -> Self {
        Self {
            name: model.name().to_string(),
            primary_keys: model.primary_keys().to_vec(),
            columns: model.columns().to_vec(),
            relations: model.relations().to_vec(),
            interleaved: model.interleaved().cloned(),
        }
    }

    pub fn from_fields<K, S>(
        name: impl Into<String>,
        primary_keys: K,
        columns: impl IntoIterator<Item = Column>,
        relations: impl IntoIterator<Item = Relation>,
        interleaved: Option<Arc<TableModel>>,
    ) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            primary_keys: primary_keys.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().collect(),
            relations: relations.into_iter().collect(),
            interleaved,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // A child's key must start with its parent's full key.
    fn validate_parent(&self, parent: &TableModel) -> Result<(), SchemaError> {
        if self.primary_keys.starts_with(parent.primary_keys()) {
            Ok(())
        } else {
            Err(SchemaError::NotChildOfParent {
                table: self.name.clone(),
                parent: parent.name().to_string(),
            })
        }
    }

    fn validate_primary_keys(&self) -> Result<(), SchemaError> {
        if self.primary_keys.is_empty() {
            return Err(SchemaError::NoPrimaryKey {
                table: self.name.clone(),
            });
        }

        match self
            .primary_keys
            .iter()
            .find(|key| !self.columns.iter().any(|c| c.name() == key.as_str()))
        {
            Some(key) => Err(SchemaError::PrimaryKeyNotInSchema {
                table: self.name.clone(),
                column: key.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl SchemaChange for CreateTable {
    fn kind(&self) -> UpdateKind {
        UpdateKind::CreateTable
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(kind = %self.kind(), table = %self.name, "validating schema change");

        if self.name.is_empty() {
            return Err(SchemaError::TableNameEmpty);
        }
        if catalog.table(&self.name)?.is_some() {
            return Err(SchemaError::TableExists {
                table: self.name.clone(),
            });
        }
        if let Some(parent) = &self.interleaved {
            self.validate_parent(parent)?;
        }

        self.validate_primary_keys()
    }

    fn ddl(&self) -> String {
        let parent = self.interleaved.as_deref().map(TableModel::name);

        // the interleave clause already ties a child to its parent
        let definitions: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!("{} {}", column.name(), column.ddl()))
            .chain(
                self.relations
                    .iter()
                    .filter(|relation| Some(relation.destination()) != parent)
                    .map(Relation::constraint_ddl),
            )
            .collect();

        let mut ddl = format!(
            "CREATE TABLE {} ({}) PRIMARY KEY ({})",
            self.name,
            definitions.join(", "),
            self.primary_keys.join(", "),
        );
        if let Some(parent) = parent {
            ddl.push_str(&format!(", INTERLEAVE IN PARENT {parent} ON DELETE CASCADE"));
        }

        ddl
    }
}

///
/// DropTable
///
/// Drops a table that has no secondary indexes and nothing interleaved in it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropTable {
    table: String,
}

impl DropTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }
}

impl SchemaChange for DropTable {
    fn kind(&self) -> UpdateKind {
        UpdateKind::DropTable
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(kind = %self.kind(), table = %self.table, "validating schema change");

        let model = require_table(catalog, &self.table)?;

        // the primary index is always present
        if model.indexes().len() > 1 {
            return Err(SchemaError::SecondaryIndexExists {
                table: self.table.clone(),
            });
        }

        for other in catalog.tables()? {
            if other.parent_name() == Some(self.table.as_str()) {
                return Err(SchemaError::InterleavedTableExists {
                    table: self.table.clone(),
                    child: other.name().to_string(),
                });
            }
            if let Some(index) = other
                .indexes()
                .iter()
                .find(|index| index.parent() == Some(self.table.as_str()))
            {
                return Err(SchemaError::InterleavedIndexExists {
                    table: self.table.clone(),
                    index: index.name().to_string(),
                });
            }
        }

        Ok(())
    }

    fn ddl(&self) -> String {
        format!("DROP TABLE {}", self.table)
    }
}

///
/// TESTS
///

use crate::{
    PRIMARY_INDEX,
    error::ModelError,
    model::{
        column::{Column, ColumnDef},
        index::{Index, IndexDef},
        relation::Relation,
    },
};
use serde::{Serialize, Serializer};
use std::{collections::BTreeSet, iter, ops::Not, sync::Arc};

///
/// TableModel
///
/// Snapshot of one table as the catalog sees it. Never mutated once built;
/// a changed table is a new snapshot.
///

#[derive(Clone, Debug, Serialize)]
pub struct TableModel {
    name: String,
    primary_keys: Vec<String>,
    columns: Vec<Column>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    relations: Vec<Relation>,

    /// Primary index first, then secondary indexes in declaration order.
    indexes: Vec<Index>,

    #[serde(
        serialize_with = "serialize_parent_name",
        skip_serializing_if = "Option::is_none"
    )]
    interleaved: Option<Arc<Self>>,
}

impl TableModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    #[must_use]
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.iter().any(|key| key == column)
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    #[must_use]
    pub fn column_names(&self) -> BTreeSet<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    #[must_use]
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    #[must_use]
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name() == name)
    }

    #[must_use]
    pub fn primary_index(&self) -> Option<&Index> {
        self.index(PRIMARY_INDEX)
    }

    pub fn secondary_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| !i.is_primary())
    }

    /// Direct interleave parent.
    #[must_use]
    pub const fn interleaved(&self) -> Option<&Arc<Self>> {
        self.interleaved.as_ref()
    }

    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.interleaved.as_deref().map(Self::name)
    }

    /// Interleave ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        iter::successors(self.interleaved.as_deref(), |&table| {
            table.interleaved.as_deref()
        })
    }
}

fn serialize_parent_name<S: Serializer>(
    parent: &Option<Arc<TableModel>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match parent {
        Some(parent) => serializer.serialize_some(parent.name()),
        None => serializer.serialize_none(),
    }
}

///
/// TableBuilder
///
/// Registration path for a table: binds names to declarations, derives the
/// primary key from column flags and synthesizes the primary index.
///

#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    columns: Vec<Column>,
    relations: Vec<Relation>,
    indexes: Vec<Index>,
    interleaved: Option<Arc<TableModel>>,
}

impl TableBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            relations: Vec::new(),
            indexes: Vec::new(),
            interleaved: None,
        }
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, def: ColumnDef) -> Self {
        self.columns.push(def.named(name));
        self
    }

    #[must_use]
    pub fn index(mut self, name: impl Into<String>, def: IndexDef) -> Self {
        self.indexes.push(def.named(name));
        self
    }

    #[must_use]
    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    #[must_use]
    pub fn interleave_in(mut self, parent: Arc<TableModel>) -> Self {
        self.interleaved = Some(parent);
        self
    }

    pub fn build(self) -> Result<TableModel, ModelError> {
        let name = self.name;

        if let Some(column) = first_duplicate(self.columns.iter().map(Column::name)) {
            return Err(ModelError::DuplicateColumn {
                table: name,
                column: column.to_string(),
            });
        }
        if let Some(index) = self.indexes.iter().find(|i| i.is_primary()) {
            return Err(ModelError::ReservedIndexName {
                table: name,
                index: index.name().to_string(),
            });
        }
        if let Some(index) = first_duplicate(self.indexes.iter().map(Index::name)) {
            return Err(ModelError::DuplicateIndex {
                table: name,
                index: index.to_string(),
            });
        }
        if let Some(relation) = first_duplicate(self.relations.iter().map(Relation::name)) {
            return Err(ModelError::DuplicateRelation {
                table: name,
                relation: relation.to_string(),
            });
        }

        let primary_keys: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.name().to_string())
            .collect();
        let primary = Index::primary(primary_keys.clone())
            .map_err(|_| ModelError::NoPrimaryKey { table: name.clone() })?;

        let mut indexes = Vec::with_capacity(self.indexes.len() + 1);
        indexes.push(primary);
        indexes.extend(self.indexes);

        Ok(TableModel {
            name,
            primary_keys,
            columns: self.columns,
            relations: self.relations,
            indexes,
            interleaved: self.interleaved,
        })
    }
}

fn first_duplicate<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = BTreeSet::new();

    names.find(|name| seen.insert(*name).not())
}

///
/// TESTS
///

use crate::{
    catalog::Catalog,
    error::SchemaError,
    model::{
        index::{Index, SortOrder},
        table::TableModel,
    },
    update::{SchemaChange, UpdateKind, require_table},
};
use std::collections::BTreeMap;
use tracing::trace;

///
/// CreateIndex
///
/// Adds a secondary index to an existing table. Built either from a
/// registered [`Index`] or from a name and columns plus modifiers.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateIndex {
    table: String,
    name: String,
    columns: Vec<String>,
    parent: Option<String>,
    storing: Vec<String>,
    unique: bool,
    null_filtered: bool,
    ordering: BTreeMap<String, SortOrder>,
}

impl CreateIndex {
    #[must_use]
    pub fn from_index(table: impl Into<String>, index: &Index) -> Self {
        Self {
            table: table.into(),
            name: index.name().to_string(),
            columns: index.columns().to_vec(),
            parent: index.parent().map(ToString::to_string),
            storing: index.storing_columns().to_vec(),
            unique: index.is_unique(),
            null_filtered: index.is_null_filtered(),
            ordering: index.ordering().clone(),
        }
    }

    pub fn from_fields<I, S>(table: impl Into<String>, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            parent: None,
            storing: Vec::new(),
            unique: false,
            null_filtered: false,
            ordering: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn interleave_in(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn storing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.storing = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn null_filtered(mut self) -> Self {
        self.null_filtered = true;
        self
    }

    #[must_use]
    pub fn order(mut self, column: impl Into<String>, order: impl Into<SortOrder>) -> Self {
        self.ordering.insert(column.into(), order.into());
        self
    }

    fn validate_columns(&self, model: &TableModel) -> Result<(), SchemaError> {
        let unknown = |column: &String| SchemaError::UnknownColumn {
            table: self.table.clone(),
            column: column.clone(),
        };

        if let Some(column) = self.columns.iter().find(|c| !model.has_column(c)) {
            return Err(unknown(column));
        }

        for column in &self.storing {
            if !model.has_column(column) {
                return Err(unknown(column));
            }
            if model.is_primary_key(column) {
                return Err(SchemaError::StoringPrimaryKey {
                    table: self.table.clone(),
                    column: column.clone(),
                });
            }
        }

        Ok(())
    }

    // The parent may be any interleave ancestor, not only the direct one.
    fn validate_parent(&self, model: &TableModel, parent: &str) -> Result<(), SchemaError> {
        if model.ancestors().any(|ancestor| ancestor.name() == parent) {
            Ok(())
        } else {
            Err(SchemaError::NotAParent {
                table: self.table.clone(),
                parent: parent.to_string(),
            })
        }
    }
}

impl SchemaChange for CreateIndex {
    fn kind(&self) -> UpdateKind {
        UpdateKind::CreateIndex
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(
            kind = %self.kind(),
            table = %self.table,
            index = %self.name,
            "validating schema change"
        );

        let model = require_table(catalog, &self.table)?;

        if self.columns.is_empty() {
            return Err(SchemaError::IndexNoColumns {
                index: self.name.clone(),
            });
        }
        if model.index(&self.name).is_some() {
            return Err(SchemaError::IndexExists {
                index: self.name.clone(),
            });
        }

        self.validate_columns(&model)?;

        if let Some(parent) = &self.parent {
            self.validate_parent(&model, parent)?;
        }

        Ok(())
    }

    fn ddl(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| match self.ordering.get(column) {
                Some(SortOrder::Desc) => format!("{column} DESC"),
                _ => column.clone(),
            })
            .collect();

        let mut ddl = format!(
            "CREATE {}{}INDEX {} ON {} ({})",
            if self.unique { "UNIQUE " } else { "" },
            if self.null_filtered { "NULL_FILTERED " } else { "" },
            self.name,
            self.table,
            columns.join(", "),
        );
        if !self.storing.is_empty() {
            ddl.push_str(&format!("STORING ({})", self.storing.join(", ")));
        }
        if let Some(parent) = &self.parent {
            ddl.push_str(&format!(", INTERLEAVE IN {parent}"));
        }

        ddl
    }
}

///
/// DropIndex
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropIndex {
    table: String,
    index: String,
}

impl DropIndex {
    pub fn new(table: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            index: index.into(),
        }
    }
}

impl SchemaChange for DropIndex {
    fn kind(&self) -> UpdateKind {
        UpdateKind::DropIndex
    }

    fn validate<C>(&self, catalog: &C) -> Result<(), SchemaError>
    where
        C: Catalog + ?Sized,
    {
        trace!(
            kind = %self.kind(),
            table = %self.table,
            index = %self.index,
            "validating schema change"
        );

        let model = require_table(catalog, &self.table)?;
        let index = model
            .index(&self.index)
            .ok_or_else(|| SchemaError::IndexNotFound {
                index: self.index.clone(),
            })?;

        if index.is_primary() {
            return Err(SchemaError::PrimaryIndex {
                index: self.index.clone(),
            });
        }

        Ok(())
    }

    fn ddl(&self) -> String {
        format!("DROP INDEX {}", self.index)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PRIMARY_INDEX,
        catalog::MemoryCatalog,
        model::{column::ColumnDef, index::IndexDef, table::TableBuilder},
        test_fixtures,
        types::FieldType,
    };

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new().with_table(test_fixtures::small_test_model())
    }

    fn assert_valid_ddl(update: &CreateIndex, expected: &str) {
        update.validate(&catalog()).expect("valid index");
        assert_eq!(update.ddl(), expected);
    }

    #[test]
    fn add_index() {
        assert_valid_ddl(
            &CreateIndex::from_fields("SmallTestModel", "foo", ["value_1"]),
            "CREATE INDEX foo ON SmallTestModel (value_1)",
        );
    }

    #[test]
    fn add_index_from_model_index() {
        let index = IndexDef::new(["value_1"]).expect("columns").named("foo");

        assert_valid_ddl(
            &CreateIndex::from_index("SmallTestModel", &index),
            "CREATE INDEX foo ON SmallTestModel (value_1)",
        );
    }

    #[test]
    fn add_unique_and_null_filtered_indexes() {
        let base = CreateIndex::from_fields("SmallTestModel", "foo", ["value_1"]);

        assert_valid_ddl(
            &base.clone().unique(),
            "CREATE UNIQUE INDEX foo ON SmallTestModel (value_1)",
        );
        assert_valid_ddl(
            &base.clone().null_filtered(),
            "CREATE NULL_FILTERED INDEX foo ON SmallTestModel (value_1)",
        );
        assert_valid_ddl(
            &base.null_filtered().unique(),
            "CREATE UNIQUE NULL_FILTERED INDEX foo ON SmallTestModel (value_1)",
        );
    }

    #[test]
    fn descending_columns_and_storing_clause() {
        let update = CreateIndex::from_fields("SmallTestModel", "foo", ["value_1", "value_2"])
            .order("value_2", false)
            .order("value_1", true);

        assert_valid_ddl(
            &update,
            "CREATE INDEX foo ON SmallTestModel (value_1, value_2 DESC)",
        );

        let index = IndexDef::new(["value_1"])
            .expect("columns")
            .storing(["value_2"])
            .named("foo");
        assert_valid_ddl(
            &CreateIndex::from_index("SmallTestModel", &index),
            "CREATE INDEX foo ON SmallTestModel (value_1)STORING (value_2)",
        );
    }

    #[test]
    fn rejects_missing_table_and_empty_columns() {
        let err = CreateIndex::from_fields("Missing", "foo", ["value_1"])
            .validate(&catalog())
            .expect_err("missing table");
        assert!(matches!(err, SchemaError::TableNotFound { .. }));

        let err = CreateIndex::from_fields("SmallTestModel", "foo", Vec::<String>::new())
            .validate(&catalog())
            .expect_err("no columns");
        assert_eq!(err.to_string(), "index 'foo' has no columns");
    }

    #[test]
    fn rejects_existing_index() {
        let err = CreateIndex::from_fields("SmallTestModel", "value", ["value_1"])
            .validate(&catalog())
            .expect_err("index exists");

        assert!(matches!(err, SchemaError::IndexExists { index } if index == "value"));
    }

    #[test]
    fn rejects_unknown_and_key_columns() {
        let err = CreateIndex::from_fields("SmallTestModel", "foo", ["nope"])
            .validate(&catalog())
            .expect_err("unknown column");
        assert_eq!(err.to_string(), "table 'SmallTestModel' has no column 'nope'");

        let err = CreateIndex::from_fields("SmallTestModel", "foo", ["value_1"])
            .storing(["nope"])
            .validate(&catalog())
            .expect_err("unknown storing column");
        assert!(matches!(err, SchemaError::UnknownColumn { column, .. } if column == "nope"));

        let err = CreateIndex::from_fields("SmallTestModel", "foo", ["value_1"])
            .storing(["key"])
            .validate(&catalog())
            .expect_err("storing key");
        assert_eq!(
            err.to_string(),
            "'key' is part of the primary key for 'SmallTestModel'"
        );
    }

    #[test]
    fn interleave_parent_may_be_any_ancestor() {
        let mut catalog = MemoryCatalog::new();
        let root = catalog.insert(test_fixtures::small_test_parent_model());
        let child = catalog.insert(test_fixtures::child_test_model(root));
        catalog.insert(
            TableBuilder::new("Leaf")
                .column("key", ColumnDef::new(FieldType::String).primary_key())
                .column("child_key", ColumnDef::new(FieldType::String).primary_key())
                .column("leaf_key", ColumnDef::new(FieldType::String).primary_key())
                .interleave_in(child)
                .build()
                .expect("leaf"),
        );

        for parent in ["ChildTestModel", "SmallTestParentModel"] {
            let update = CreateIndex::from_fields("Leaf", "by_key", ["key"]).interleave_in(parent);
            update.validate(&catalog).expect("ancestor");

            assert_eq!(
                update.ddl(),
                format!("CREATE INDEX by_key ON Leaf (key), INTERLEAVE IN {parent}")
            );
        }

        let err = CreateIndex::from_fields("Leaf", "by_key", ["key"])
            .interleave_in("SmallTestModel")
            .validate(&catalog)
            .expect_err("not an ancestor");
        assert_eq!(
            err.to_string(),
            "'SmallTestModel' is not a parent of table 'Leaf'"
        );
    }

    #[test]
    fn drop_index() {
        let update = DropIndex::new("SmallTestModel", "value");
        update.validate(&catalog()).expect("secondary index");

        assert_eq!(update.ddl(), "DROP INDEX value");
    }

    #[test]
    fn drop_index_rejects_unknown_and_primary() {
        let err = DropIndex::new("SmallTestModel", "nope")
            .validate(&catalog())
            .expect_err("unknown index");
        assert!(matches!(err, SchemaError::IndexNotFound { .. }));

        let err = DropIndex::new("SmallTestModel", PRIMARY_INDEX)
            .validate(&catalog())
            .expect_err("primary index");
        assert_eq!(err.to_string(), "index 'PRIMARY_KEY' is the primary index");
    }
}

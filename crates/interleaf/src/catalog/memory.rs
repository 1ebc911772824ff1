use crate::{catalog::Catalog, error::CatalogError, model::table::TableModel};
use std::{collections::BTreeMap, sync::Arc};

///
/// MemoryCatalog
///
/// Catalog held entirely in memory, keyed by table name.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    tables: BTreeMap<String, Arc<TableModel>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table, returning the shared snapshot so children can
    /// interleave in it.
    pub fn insert(&mut self, table: TableModel) -> Arc<TableModel> {
        let table = Arc::new(table);
        self.insert_shared(Arc::clone(&table));

        table
    }

    pub fn insert_shared(&mut self, table: Arc<TableModel>) {
        self.tables.insert(table.name().to_string(), table);
    }

    #[must_use]
    pub fn with_table(mut self, table: TableModel) -> Self {
        self.insert(table);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<TableModel>> {
        self.tables.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<TableModel>> {
        self.tables.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn table(&self, name: &str) -> Result<Option<Arc<TableModel>>, CatalogError> {
        Ok(self.tables.get(name).cloned())
    }

    fn tables(&self) -> Result<Vec<Arc<TableModel>>, CatalogError> {
        Ok(self.tables.values().cloned().collect())
    }

    // Counts every index entry, primary index and storing columns included.
    fn count_indexed_columns(&self, column: &str, table: &str) -> Result<u64, CatalogError> {
        let Some(model) = self.tables.get(table) else {
            return Ok(0);
        };

        let count = model
            .indexes()
            .iter()
            .flat_map(|index| index.columns().iter().chain(index.storing_columns()))
            .filter(|c| *c == column)
            .count();

        Ok(count as u64)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    #[test]
    fn counts_primary_and_secondary_entries() {
        let catalog = MemoryCatalog::new().with_table(test_fixtures::small_test_model());

        assert_eq!(catalog.count_indexed_columns("key", "SmallTestModel").ok(), Some(1));
        assert_eq!(catalog.count_indexed_columns("value_2", "SmallTestModel").ok(), Some(1));
        assert_eq!(catalog.count_indexed_columns("value_1", "SmallTestModel").ok(), Some(0));
    }

    #[test]
    fn counts_storing_columns() {
        let catalog = MemoryCatalog::new().with_table(test_fixtures::storing_test_model());

        assert_eq!(catalog.count_indexed_columns("payload", "StoringTestModel").ok(), Some(1));
    }

    #[test]
    fn unknown_table_counts_nothing() {
        let catalog = MemoryCatalog::new();

        assert_eq!(catalog.count_indexed_columns("key", "Missing").ok(), Some(0));
        assert!(catalog.is_empty());
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(test_fixtures::small_test_model());
        catalog.insert(test_fixtures::small_test_model());

        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove("SmallTestModel").is_some());
        assert!(catalog.get("SmallTestModel").is_none());
    }
}

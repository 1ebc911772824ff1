use crate::{PRIMARY_INDEX, error::ModelError};
use derive_more::{Deref, Display};
use serde::Serialize;
use std::{collections::BTreeMap, fmt, ops::Not};

///
/// SortOrder
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
pub enum SortOrder {
    #[default]
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Asc)
    }
}

/// `true` is ascending, `false` is descending.
impl From<bool> for SortOrder {
    fn from(ascending: bool) -> Self {
        if ascending { Self::Asc } else { Self::Desc }
    }
}

///
/// IndexDef
///
/// Unnamed index declaration. The column list is never empty.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IndexDef {
    columns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,

    #[serde(default, skip_serializing_if = "Not::not")]
    null_filtered: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    unique: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    storing: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    ordering: BTreeMap<String, SortOrder>,
}

impl IndexDef {
    pub fn new<I, S>(columns: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ModelError::EmptyIndex);
        }

        Ok(Self {
            columns,
            parent: None,
            null_filtered: false,
            unique: false,
            storing: Vec::new(),
            ordering: BTreeMap::new(),
        })
    }

    /// Interleave the index in an ancestor table.
    #[must_use]
    pub fn interleave_in(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub const fn null_filtered(mut self) -> Self {
        self.null_filtered = true;
        self
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
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

    /// Set the sort order of one indexed column.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, order: impl Into<SortOrder>) -> Self {
        self.ordering.insert(column.into(), order.into());
        self
    }

    /// Shorthand sort order for a single-column index, expanded into the
    /// per-column map.
    pub fn ordered(self, order: impl Into<SortOrder>) -> Result<Self, ModelError> {
        if self.columns.len() != 1 {
            return Err(ModelError::OrderingShorthand {
                columns: self.columns.len(),
            });
        }
        let column = self.columns[0].clone();

        Ok(self.order(column, order))
    }

    /// Bind the index name; the result can no longer be renamed.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Index {
        Index {
            name: name.into(),
            def: self,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[must_use]
    pub const fn is_null_filtered(&self) -> bool {
        self.null_filtered
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub fn storing_columns(&self) -> &[String] {
        &self.storing
    }

    #[must_use]
    pub const fn ordering(&self) -> &BTreeMap<String, SortOrder> {
        &self.ordering
    }

    /// Sort order of a column; ascending unless declared otherwise.
    #[must_use]
    pub fn order_of(&self, column: &str) -> SortOrder {
        self.ordering.get(column).copied().unwrap_or_default()
    }

    /// Whether the column appears as a key or storing column.
    #[must_use]
    pub fn covers(&self, column: &str) -> bool {
        self.columns.iter().chain(&self.storing).any(|c| c == column)
    }
}

///
/// Index
///
/// An index bound to its name during model registration.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq, Serialize)]
pub struct Index {
    name: String,

    #[deref]
    #[serde(flatten)]
    def: IndexDef,
}

impl Index {
    /// The implicit index over a table's primary key.
    pub(crate) fn primary<I, S>(primary_keys: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(IndexDef::new(primary_keys)?.named(PRIMARY_INDEX))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn def(&self) -> &IndexDef {
        &self.def
    }

    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.name == PRIMARY_INDEX
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.columns.join(", ");

        if self.unique {
            write!(f, "UNIQUE {}({})", self.name, columns)
        } else {
            write!(f, "{}({})", self.name, columns)
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_column_list_is_rejected() {
        assert_eq!(
            IndexDef::new(Vec::<String>::new()),
            Err(ModelError::EmptyIndex)
        );
    }

    #[test]
    fn ordering_defaults_to_ascending() {
        let def = IndexDef::new(["a", "b"]).expect("columns").order("b", false);

        assert_eq!(def.order_of("a"), SortOrder::Asc);
        assert_eq!(def.order_of("b"), SortOrder::Desc);
    }

    #[test]
    fn ordering_shorthand_expands_for_single_column() {
        let def = IndexDef::new(["a"])
            .expect("columns")
            .ordered(false)
            .expect("single column");

        assert_eq!(
            def.ordering(),
            &BTreeMap::from([("a".to_string(), SortOrder::Desc)])
        );
    }

    #[test]
    fn ordering_shorthand_is_rejected_for_multi_column() {
        let err = IndexDef::new(["a", "b"])
            .expect("columns")
            .ordered(true)
            .expect_err("two columns");

        assert_eq!(err, ModelError::OrderingShorthand { columns: 2 });
    }

    #[test]
    fn primary_is_derived_from_name() {
        let primary = Index::primary(["key"]).expect("key");
        let secondary = IndexDef::new(["value"]).expect("columns").named("by_value");

        assert!(primary.is_primary());
        assert!(!secondary.is_primary());
    }

    #[test]
    fn covers_key_and_storing_columns() {
        let def = IndexDef::new(["a"]).expect("columns").storing(["b"]);

        assert!(def.covers("a"));
        assert!(def.covers("b"));
        assert!(!def.covers("c"));
    }

    #[test]
    fn display_marks_unique_indexes() {
        let index = IndexDef::new(["a", "b"])
            .expect("columns")
            .unique()
            .named("idx");

        assert_eq!(index.to_string(), "UNIQUE idx(a, b)");
    }
}

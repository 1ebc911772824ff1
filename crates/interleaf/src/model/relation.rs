use serde::Serialize;
use std::ops::Not;

///
/// Relation
///
/// Foreign-key association from local columns to a destination table.
/// Column pairs keep their declaration order, so multi-column keys render
/// deterministically.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Relation {
    name: String,
    destination: String,
    constraints: Vec<(String, String)>,

    #[serde(default, skip_serializing_if = "Not::not")]
    single: bool,
}

impl Relation {
    pub fn new<I, L, D>(
        name: impl Into<String>,
        destination: impl Into<String>,
        constraints: I,
    ) -> Self
    where
        I: IntoIterator<Item = (L, D)>,
        L: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            destination: destination.into(),
            constraints: constraints
                .into_iter()
                .map(|(local, dest)| (local.into(), dest.into()))
                .collect(),
            single: false,
        }
    }

    /// Mark the relation as pointing at a single row.
    #[must_use]
    pub const fn single(mut self) -> Self {
        self.single = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub fn constraints(&self) -> &[(String, String)] {
        &self.constraints
    }

    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.single
    }

    pub fn local_columns(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|(local, _)| local.as_str())
    }

    pub fn destination_columns(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|(_, dest)| dest.as_str())
    }

    /// `CONSTRAINT <name> FOREIGN KEY (<locals>) REFERENCES <dest> (<dests>)`
    #[must_use]
    pub fn constraint_ddl(&self) -> String {
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.name,
            join(self.local_columns()),
            self.destination,
            join(self.destination_columns()),
        )
    }
}

fn join<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns.collect::<Vec<_>>().join(", ")
}

///
/// TESTS
///

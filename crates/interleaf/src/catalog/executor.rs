use crate::catalog::SchemaExecutor;
use std::convert::Infallible;

///
/// RecordingExecutor
///
/// Collects statements instead of applying them. Used for dry runs and for
/// rendering a migration to a script.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RecordingExecutor {
    statements: Vec<String>,
}

impl RecordingExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    #[must_use]
    pub fn into_statements(self) -> Vec<String> {
        self.statements
    }
}

impl SchemaExecutor for RecordingExecutor {
    type Error = Infallible;

    fn apply_schema_change(&mut self, ddl: &str) -> Result<(), Self::Error> {
        self.statements.push(ddl.to_string());

        Ok(())
    }
}

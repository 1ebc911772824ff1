use crate::{
    COMMIT_TIMESTAMP_OPTION,
    error::{ModelError, SchemaError, ValueError},
    types::FieldType,
    value::Value,
};
use derive_more::Deref;
use serde::Serialize;
use std::ops::Not;

///
/// ColumnDef
///
/// Unnamed column declaration: type plus modifiers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnDef {
    ty: FieldType,

    #[serde(default, skip_serializing_if = "Not::not")]
    nullable: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    primary_key: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    allow_commit_timestamp: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

impl ColumnDef {
    /// Non-nullable, non-key column of the given type.
    #[must_use]
    pub const fn new(ty: FieldType) -> Self {
        Self {
            ty,
            nullable: false,
            primary_key: false,
            allow_commit_timestamp: false,
            size: None,
        }
    }

    ///
    /// from_catalog
    ///
    /// Rebuild a declaration from introspected catalog strings, e.g.
    /// `("STRING(50)", "YES")`.
    ///
    pub fn from_catalog(spanner_type: &str, is_nullable: &str) -> Result<Self, SchemaError> {
        let resolved = FieldType::resolve(spanner_type)?;

        Ok(Self {
            size: resolved.size,
            ..Self::new(resolved.ty)
        }
        .with_nullable(is_nullable == "YES"))
    }

    #[must_use]
    pub const fn nullable(self) -> Self {
        self.with_nullable(true)
    }

    #[must_use]
    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Bound the size of a sized type. Ignored when rendering unsized types.
    #[must_use]
    pub const fn sized(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Allow server-assigned commit timestamps. Only legal on `TIMESTAMP`.
    pub fn commit_timestamp(mut self) -> Result<Self, ModelError> {
        if self.ty != FieldType::Timestamp {
            return Err(ModelError::CommitTimestampNotAllowed { ty: self.ty });
        }
        self.allow_commit_timestamp = true;

        Ok(self)
    }

    /// Bind the column name; the result can no longer be renamed.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Column {
        Column {
            name: name.into(),
            def: self,
        }
    }

    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    #[must_use]
    pub const fn allows_commit_timestamp(&self) -> bool {
        self.allow_commit_timestamp
    }

    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    /// Column clause without the name, e.g. `STRING(10) NOT NULL`.
    #[must_use]
    pub fn ddl(&self) -> String {
        let mut ddl = self.ty.ddl(self.size);

        if !self.nullable {
            ddl.push_str(" NOT NULL");
        }
        if self.allow_commit_timestamp {
            ddl.push(' ');
            ddl.push_str(COMMIT_TIMESTAMP_OPTION);
        }

        ddl
    }

    /// Check a runtime value for this column.
    pub fn validate(&self, value: &Value) -> Result<(), ValueError> {
        match value {
            Value::Null if self.nullable => Ok(()),
            Value::Null => Err(ValueError::Null),
            Value::CommitTimestamp if self.allow_commit_timestamp => Ok(()),
            other => self.ty.validate_value(other),
        }
    }
}

///
/// Column
///
/// A column bound to its name during model registration.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq, Serialize)]
pub struct Column {
    name: String,

    #[deref]
    #[serde(flatten)]
    def: ColumnDef,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn def(&self) -> &ColumnDef {
        &self.def
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn ddl_renders_size_and_not_null() {
        let def = ColumnDef::new(FieldType::String).sized(10);

        assert_eq!(def.ddl(), "STRING(10) NOT NULL");
        assert_eq!(def.nullable().ddl(), "STRING(10)");
    }

    #[test]
    fn ddl_defaults_sized_types_to_max() {
        assert_eq!(
            ColumnDef::new(FieldType::StringArray).nullable().ddl(),
            "ARRAY<STRING(MAX)>"
        );
        assert_eq!(
            ColumnDef::new(FieldType::Bytes).sized(2048).nullable().ddl(),
            "BYTES(2048)"
        );
    }

    #[test]
    fn size_is_ignored_by_unsized_types() {
        assert_eq!(ColumnDef::new(FieldType::Int64).sized(8).ddl(), "INT64 NOT NULL");
    }

    #[test]
    fn commit_timestamp_option_is_rendered() {
        let def = ColumnDef::new(FieldType::Timestamp)
            .nullable()
            .commit_timestamp()
            .expect("timestamp columns accept commit timestamps");

        assert_eq!(def.ddl(), "TIMESTAMP OPTIONS (allow_commit_timestamp=true)");
    }

    #[test]
    fn commit_timestamp_requires_timestamp_type() {
        for ty in FieldType::ALL {
            let result = ColumnDef::new(ty).commit_timestamp();
            if ty == FieldType::Timestamp {
                assert!(result.is_ok());
            } else {
                assert_eq!(result, Err(ModelError::CommitTimestampNotAllowed { ty }));
            }
        }
    }

    #[test]
    fn null_is_accepted_only_when_nullable() {
        let required = ColumnDef::new(FieldType::Int64);

        assert_eq!(required.validate(&Value::Null), Err(ValueError::Null));
        assert!(required.nullable().validate(&Value::Null).is_ok());
    }

    #[test]
    fn commit_timestamp_sentinel_needs_the_option() {
        let plain = ColumnDef::new(FieldType::Timestamp);
        let stamped = plain.commit_timestamp().expect("timestamp column");

        assert!(stamped.validate(&Value::CommitTimestamp).is_ok());
        assert!(stamped.validate(&OffsetDateTime::UNIX_EPOCH.into()).is_ok());
        assert!(plain.validate(&Value::CommitTimestamp).is_err());
    }

    #[test]
    fn validate_delegates_to_type() {
        let def = ColumnDef::new(FieldType::String);

        assert!(def.validate(&"text".into()).is_ok());
        assert_eq!(
            def.validate(&Value::Int64(3)),
            Err(ValueError::Mismatch {
                value: "3".to_string(),
                expected: "str",
            })
        );
    }

    #[test]
    fn from_catalog_recovers_size_and_nullability() {
        let def = ColumnDef::from_catalog("ARRAY<STRING(50)>", "YES").expect("known type");

        assert_eq!(def.ty(), FieldType::StringArray);
        assert_eq!(def.size(), Some(50));
        assert!(def.is_nullable());
        assert_eq!(def.ddl(), "ARRAY<STRING(50)>");

        let def = ColumnDef::from_catalog("INT64", "NO").expect("known type");
        assert_eq!(def.ddl(), "INT64 NOT NULL");
    }

    #[test]
    fn from_catalog_rejects_unknown_types() {
        let err = ColumnDef::from_catalog("NUMERIC", "NO").expect_err("unknown type");

        assert!(matches!(err, SchemaError::UnknownType { ddl } if ddl == "NUMERIC"));
    }

    #[test]
    fn named_column_derefs_to_definition() {
        let column = ColumnDef::new(FieldType::Float64).nullable().named("score");

        assert_eq!(column.name(), "score");
        assert_eq!(column.ddl(), "FLOAT64");
        assert!(column.is_nullable());
    }

    #[test]
    fn serializes_only_set_modifiers() {
        let column = ColumnDef::new(FieldType::String).sized(20).named("title");
        let json = serde_json::to_value(&column).expect("serialize column");

        assert_eq!(
            json,
            serde_json::json!({ "name": "title", "ty": "String", "size": 20 })
        );
    }
}

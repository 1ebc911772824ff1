mod wire;


use crate::{
    MAX_SIZE_KEYWORD,
    error::{SchemaError, ValueError},
    value::Value,
};
use derive_more::Display;
use serde::Serialize;
use std::sync::OnceLock;
use time::{Date, format_description::BorrowedFormatItem};

// re-exports
pub use wire::WireType;

static DATE_FORMAT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();

///
/// FieldType
///
/// Closed catalog of column types. Each type knows its DDL keyword, its
/// protocol type tag, and how to check a runtime value.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum FieldType {
    Bool,
    BoolArray,
    Bytes,
    Date,
    DateArray,
    Float64,
    Float64Array,
    Int64,
    Int64Array,
    String,
    StringArray,
    Timestamp,
}

impl FieldType {
    /// Every type, in the order exact DDL lookups are attempted.
    pub const ALL: [Self; 12] = [
        Self::Bool,
        Self::Int64,
        Self::Float64,
        Self::String,
        Self::Bytes,
        Self::Date,
        Self::Timestamp,
        Self::StringArray,
        Self::BoolArray,
        Self::Int64Array,
        Self::Float64Array,
        Self::DateArray,
    ];

    /// Render the DDL keyword. Sized types fall back to `MAX` when no size
    /// is given; every other type ignores `size`.
    #[must_use]
    pub fn ddl(self, size: Option<u64>) -> String {
        match self {
            Self::Bool => "BOOL".to_string(),
            Self::BoolArray => "ARRAY<BOOL>".to_string(),
            Self::Bytes => format!("BYTES({})", size_keyword(size)),
            Self::Date => "DATE".to_string(),
            Self::DateArray => "ARRAY<DATE>".to_string(),
            Self::Float64 => "FLOAT64".to_string(),
            Self::Float64Array => "ARRAY<FLOAT64>".to_string(),
            Self::Int64 => "INT64".to_string(),
            Self::Int64Array => "ARRAY<INT64>".to_string(),
            Self::String => format!("STRING({})", size_keyword(size)),
            Self::StringArray => format!("ARRAY<STRING({})>", size_keyword(size)),
            Self::Timestamp => "TIMESTAMP".to_string(),
        }
    }

    #[must_use]
    pub const fn wire_type(self) -> WireType {
        match self {
            Self::Bool => WireType::Bool,
            Self::Bytes => WireType::Bytes,
            Self::Date => WireType::Date,
            Self::Float64 => WireType::Float64,
            Self::Int64 => WireType::Int64,
            Self::String => WireType::String,
            Self::Timestamp => WireType::Timestamp,
            Self::BoolArray
            | Self::DateArray
            | Self::Float64Array
            | Self::Int64Array
            | Self::StringArray => WireType::Array,
        }
    }

    #[must_use]
    pub const fn is_sized(self) -> bool {
        matches!(self, Self::Bytes | Self::String | Self::StringArray)
    }

    #[must_use]
    pub const fn is_array(self) -> bool {
        self.element_type().is_some()
    }

    /// Element type of an array type.
    #[must_use]
    pub const fn element_type(self) -> Option<Self> {
        match self {
            Self::BoolArray => Some(Self::Bool),
            Self::DateArray => Some(Self::Date),
            Self::Float64Array => Some(Self::Float64),
            Self::Int64Array => Some(Self::Int64),
            Self::StringArray => Some(Self::String),
            _ => None,
        }
    }

    /// Check a runtime value against this type.
    ///
    /// Arrays must be a `Value::List` whose every element matches the
    /// element type; the first bad element rejects the whole value.
    pub fn validate_value(self, value: &Value) -> Result<(), ValueError> {
        let Some(element) = self.element_type() else {
            return self.validate_scalar(value, false);
        };

        let Value::List(items) = value else {
            return Err(ValueError::mismatch(value, "list"));
        };

        items
            .iter()
            .try_for_each(|item| element.validate_scalar(item, true))
    }

    // Scalar floats also take integers; array elements must be real floats.
    fn validate_scalar(self, value: &Value, in_array: bool) -> Result<(), ValueError> {
        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::Date, Value::Date(_))
            | (Self::Float64, Value::Float64(_))
            | (Self::Int64, Value::Int64(_))
            | (Self::String, Value::Text(_))
            | (Self::Timestamp, Value::Timestamp(_)) => Ok(()),
            (Self::Float64, Value::Int64(_)) if !in_array => Ok(()),
            (Self::Date, Value::Text(text)) => parse_date(text)
                .map(|_| ())
                .ok_or_else(|| ValueError::InvalidDate {
                    value: text.clone(),
                }),
            (Self::Date, other) => Err(ValueError::InvalidDate {
                value: other.to_string(),
            }),
            (ty, other) => Err(ValueError::mismatch(other, ty.value_label())),
        }
    }

    const fn value_label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::Float64 => "float",
            Self::Int64 => "int",
            Self::String => "str",
            Self::Timestamp => "timestamp",
            Self::BoolArray
            | Self::DateArray
            | Self::Float64Array
            | Self::Int64Array
            | Self::StringArray => "list",
        }
    }

    ///
    /// resolve
    ///
    /// Recover a type from a raw catalog type string. Exact matches against
    /// each canonical `ddl(None)` are tried first, then the sized patterns
    /// (`STRING(n)`, `ARRAY<STRING(n)>`, `BYTES(n)`) with the bound
    /// extracted.
    ///
    pub fn resolve(ddl: &str) -> Result<ResolvedType, SchemaError> {
        if let Some(ty) = Self::ALL.into_iter().find(|ty| ty.ddl(None) == ddl) {
            return Ok(ResolvedType { ty, size: None });
        }

        Self::ALL
            .into_iter()
            .find_map(|ty| {
                ty.match_sized(ddl).map(|size| ResolvedType {
                    ty,
                    size: Some(size),
                })
            })
            .ok_or_else(|| SchemaError::UnknownType {
                ddl: ddl.to_string(),
            })
    }

    fn match_sized(self, ddl: &str) -> Option<u64> {
        let (prefix, suffix) = match self {
            Self::Bytes => ("BYTES(", ")"),
            Self::String => ("STRING(", ")"),
            Self::StringArray => ("ARRAY<STRING(", ")>"),
            _ => return None,
        };

        let digits = ddl.strip_prefix(prefix)?.strip_suffix(suffix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        digits.parse().ok()
    }
}

///
/// ResolvedType
/// Result of a reverse DDL lookup: the type plus any recovered size bound.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResolvedType {
    pub ty: FieldType,
    pub size: Option<u64>,
}

fn size_keyword(size: Option<u64>) -> String {
    size.map_or_else(|| MAX_SIZE_KEYWORD.to_string(), |size| size.to_string())
}

/// Parse calendar-date text (`YYYY-[M]M-[D]D`).
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    let format = DATE_FORMAT.get_or_init(|| {
        time::format_description::parse("[year]-[month padding:none]-[day padding:none]")
            .expect("date format description is valid")
    });

    Date::parse(text, format).ok()
}

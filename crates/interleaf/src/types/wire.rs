use derive_more::Display;
use serde::Serialize;

///
/// WireType
///
/// Protocol type code sent alongside values of a column.
///
/// IMPORTANT:
/// Codes mirror the database's type enumeration and must not be renumbered.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
pub enum WireType {
    #[display("BOOL")]
    Bool = 1,
    #[display("INT64")]
    Int64 = 2,
    #[display("FLOAT64")]
    Float64 = 3,
    #[display("TIMESTAMP")]
    Timestamp = 4,
    #[display("DATE")]
    Date = 5,
    #[display("STRING")]
    String = 6,
    #[display("BYTES")]
    Bytes = 7,
    #[display("ARRAY")]
    Array = 8,
}

impl WireType {
    /// Stable wire byte for this type.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Bool),
            2 => Some(Self::Int64),
            3 => Some(Self::Float64),
            4 => Some(Self::Timestamp),
            5 => Some(Self::Date),
            6 => Some(Self::String),
            7 => Some(Self::Bytes),
            8 => Some(Self::Array),
            _ => None,
        }
    }
}

use crate::{
    model::{
        column::ColumnDef,
        index::IndexDef,
        relation::Relation,
        table::{TableBuilder, TableModel},
    },
    types::FieldType,
};
use std::sync::Arc;

///
/// Fixture tables shared by unit tests.
///

fn string() -> ColumnDef {
    ColumnDef::new(FieldType::String)
}

/// `key` primary key, `value_1` required, `value_2` nullable and indexed.
pub fn small_test_model() -> TableModel {
    TableBuilder::new("SmallTestModel")
        .column("key", string().primary_key())
        .column("value_1", string())
        .column("value_2", string().nullable())
        .index("value", IndexDef::new(["value_2"]).expect("columns"))
        .build()
        .expect("small test model")
}

pub fn small_test_parent_model() -> TableModel {
    TableBuilder::new("SmallTestParentModel")
        .column("key", string().primary_key())
        .column("value_1", string())
        .column("value_2", string().nullable())
        .build()
        .expect("small test parent model")
}

pub fn child_test_model(parent: Arc<TableModel>) -> TableModel {
    TableBuilder::new("ChildTestModel")
        .column("key", string().primary_key())
        .column("child_key", string().primary_key())
        .interleave_in(parent)
        .build()
        .expect("child test model")
}

pub fn storing_test_model() -> TableModel {
    TableBuilder::new("StoringTestModel")
        .column("key", string().primary_key())
        .column("value", string())
        .column("payload", string().nullable())
        .index(
            "value_storing",
            IndexDef::new(["value"]).expect("columns").storing(["payload"]),
        )
        .build()
        .expect("storing test model")
}

pub fn relationship_test_model() -> TableModel {
    TableBuilder::new("RelationshipTestModel")
        .column("parent_key", string().primary_key())
        .column("child_key", string().primary_key())
        .relation(Relation::new("parent", "SmallTestModel", [("parent_key", "key")]).single())
        .relation(Relation::new("parents", "SmallTestModel", [("parent_key", "key")]))
        .relation(Relation::new(
            "fk_multicolumn",
            "SmallTestModel",
            [("parent_key", "key"), ("parent_key2", "key2")],
        ))
        .build()
        .expect("relationship test model")
}

/// One column of every type, keyed on `int_`, `float_` and `string`.
pub fn unittest_model() -> TableModel {
    TableBuilder::new("table")
        .column("int_", ColumnDef::new(FieldType::Int64).primary_key())
        .column("int_2", ColumnDef::new(FieldType::Int64).nullable())
        .column("float_", ColumnDef::new(FieldType::Float64).primary_key())
        .column("float_2", ColumnDef::new(FieldType::Float64).nullable())
        .column("string", string().primary_key())
        .column("string_2", string().nullable())
        .column("string_3", string().nullable().sized(10))
        .column("timestamp", ColumnDef::new(FieldType::Timestamp))
        .column(
            "timestamp_2",
            ColumnDef::new(FieldType::Timestamp)
                .nullable()
                .commit_timestamp()
                .expect("timestamp column"),
        )
        .column("date", ColumnDef::new(FieldType::Date).nullable())
        .column("bytes_", ColumnDef::new(FieldType::Bytes).nullable())
        .column("bytes_2", ColumnDef::new(FieldType::Bytes).nullable().sized(2048))
        .column("bool_array", ColumnDef::new(FieldType::BoolArray).nullable())
        .column("int_array", ColumnDef::new(FieldType::Int64Array).nullable())
        .column("float_array", ColumnDef::new(FieldType::Float64Array).nullable())
        .column("date_array", ColumnDef::new(FieldType::DateArray).nullable())
        .column("string_array", ColumnDef::new(FieldType::StringArray).nullable())
        .column(
            "string_array_2",
            ColumnDef::new(FieldType::StringArray).nullable().sized(50),
        )
        .build()
        .expect("unittest model")
}

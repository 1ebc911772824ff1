//! Declarative table model.
//!
//! Descriptors come in two phases. The `*Def` types are what a model
//! declares; binding a name during registration turns them into the
//! immutable named forms (`Column`, `Index`) that tables and catalogs hold.
//! Nothing here touches a live database.
pub mod column;
pub mod index;
pub mod relation;
pub mod table;

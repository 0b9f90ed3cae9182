//! Table-mapping metadata for the rowmap data-access stack.
//!
//! `rowmap-core` is the foundation layer: it turns a plain Rust type plus a
//! resolved table configuration into a validated, cached
//! [`TableDescriptor`] that every later persistence operation reads instead
//! of re-deriving mapping metadata per call.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: [`Record`], [`Dialect`], and [`ConnectionSource`]
//!   are the seams between mapped types, driver crates, and connection
//!   management.
//! - **Data model**: [`Value`] and [`FieldDescriptor`] represent field
//!   values and per-attribute metadata shared across the stack.
//! - **Fail-fast registration**: table validation happens exactly once,
//!   when the descriptor is built; an invalid mapping (two id fields, a
//!   duplicated column) never reaches a query path.
//!
//! # Who Uses This Crate
//!
//! - Configuration-resolution layers produce [`TableConfig`] bundles.
//! - Data-access (DAO) layers register descriptors and construct records.
//! - Statement builders and result mappers resolve columns through
//!   [`TableDescriptor::field_by_column_name`].

pub mod config;
pub mod dao;
pub mod dialect;
pub mod error;
pub mod field;
pub mod table;
pub mod value;

pub use config::{Constructor, TableConfig};
pub use dao::{DaoHandle, Record};
pub use dialect::{ConnectionSource, Dialect};
pub use error::{
    BoxError, ColumnError, ColumnErrorKind, ConstructError, Error, ExtractError, ExtractErrorKind,
    Result, SchemaError, SchemaErrorKind,
};
pub use field::{FieldDescriptor, IdKind};
pub use table::{TableDescriptor, create_record};
pub use value::Value;

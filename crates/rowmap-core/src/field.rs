//! Field descriptors: per-attribute mapping metadata and value access.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoxError, Error, ExtractError, ExtractErrorKind, Result};
use crate::value::Value;

/// How a field participates in the table's identity, if at all.
///
/// A single field carries at most one role by construction; the per-table
/// "at most one id field" rule is enforced when the table descriptor is
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdKind {
    /// Not part of the table identity.
    #[default]
    None,
    /// Application-assigned id.
    Plain,
    /// Database-generated id.
    Generated,
    /// Id drawn from the named database sequence.
    Sequence(String),
}

type ExtractFn<T> = Box<dyn Fn(&T) -> std::result::Result<Value, BoxError> + Send + Sync>;
type AssignFn<T> = Box<dyn Fn(&mut T, Value) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Metadata and value-access capabilities for one persistent attribute of a
/// mapped type `T`.
///
/// Descriptors are assembled by a configuration-resolution layer and handed
/// to [`TableDescriptor`](crate::table::TableDescriptor) as an ordered set;
/// this layer never discovers them itself.
pub struct FieldDescriptor<T> {
    field_name: String,
    column_name: String,
    id_kind: IdKind,
    foreign_auto_create: bool,
    extract: ExtractFn<T>,
    assign: Option<AssignFn<T>>,
}

impl<T> FieldDescriptor<T> {
    /// Create a descriptor with an infallible extraction closure.
    pub fn new(
        field_name: impl Into<String>,
        column_name: impl Into<String>,
        extract: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            column_name: column_name.into(),
            id_kind: IdKind::None,
            foreign_auto_create: false,
            extract: Box::new(move |instance| Ok(extract(instance))),
            assign: None,
        }
    }

    /// Replace the extraction capability with a fallible one.
    #[must_use]
    pub fn extract_with(
        mut self,
        extract: impl Fn(&T) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.extract = Box::new(extract);
        self
    }

    /// Set the assignment capability.
    #[must_use]
    pub fn assign_with(
        mut self,
        assign: impl Fn(&mut T, Value) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.assign = Some(Box::new(assign));
        self
    }

    /// Mark as the application-assigned id.
    #[must_use]
    pub fn id(mut self) -> Self {
        self.id_kind = IdKind::Plain;
        self
    }

    /// Mark as a database-generated id.
    #[must_use]
    pub fn generated_id(mut self) -> Self {
        self.id_kind = IdKind::Generated;
        self
    }

    /// Mark as a sequence-generated id drawing from `sequence`.
    #[must_use]
    pub fn generated_id_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.id_kind = IdKind::Sequence(sequence.into());
        self
    }

    /// Request automatic creation of the referenced foreign row on insert.
    #[must_use]
    pub fn foreign_auto_create(mut self) -> Self {
        self.foreign_auto_create = true;
        self
    }

    /// The programmatic field name on the mapped type.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The relational column name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// The field's id role.
    #[must_use]
    pub const fn id_kind(&self) -> &IdKind {
        &self.id_kind
    }

    /// True if the field carries any id role.
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.id_kind != IdKind::None
    }

    /// True for a database-generated id.
    #[must_use]
    pub fn is_generated_id(&self) -> bool {
        self.id_kind == IdKind::Generated
    }

    /// True for a sequence-generated id.
    #[must_use]
    pub const fn is_generated_id_sequence(&self) -> bool {
        matches!(self.id_kind, IdKind::Sequence(_))
    }

    /// True if the field requests foreign-auto-create on insert.
    #[must_use]
    pub const fn is_foreign_auto_create(&self) -> bool {
        self.foreign_auto_create
    }

    /// Read this field's value out of `instance`.
    pub fn extract(&self, instance: &T) -> Result<Value> {
        (self.extract)(instance).map_err(|source| {
            Error::Extract(ExtractError {
                kind: ExtractErrorKind::Read,
                column: self.column_name.clone(),
                message: format!("could not read value of column '{}'", self.column_name),
                source: Some(source),
            })
        })
    }

    /// Write `value` into this field on `instance`.
    pub fn assign(&self, instance: &mut T, value: Value) -> Result<()> {
        let Some(assign) = &self.assign else {
            return Err(Error::Extract(ExtractError {
                kind: ExtractErrorKind::Write,
                column: self.column_name.clone(),
                message: format!("column '{}' has no assignment capability", self.column_name),
                source: None,
            }));
        };
        assign(instance, value).map_err(|source| {
            Error::Extract(ExtractError {
                kind: ExtractErrorKind::Write,
                column: self.column_name.clone(),
                message: format!("could not write value of column '{}'", self.column_name),
                source: Some(source),
            })
        })
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("field_name", &self.field_name)
            .field("column_name", &self.column_name)
            .field("id_kind", &self.id_kind)
            .field("foreign_auto_create", &self.foreign_auto_create)
            .finish_non_exhaustive()
    }
}

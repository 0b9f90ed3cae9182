//! Resolved table configuration, as handed in by the configuration layer.
//!
//! This crate consumes a fully resolved bundle (table name, ordered field
//! descriptors, construction capability) and never discovers any of it
//! itself. How the bundle is produced (derive macro, hand-written builder,
//! schema file) is a concern of the layers above.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::field::FieldDescriptor;

/// No-argument construction capability bound to the mapped type.
///
/// Shared so the same capability can serve a table descriptor and any
/// collaborator constructing related objects on the side.
pub type Constructor<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>;

/// Pre-resolved mapping configuration for one table.
///
/// Field order is preserved exactly as supplied; it is the order diagnostics
/// and statement builders see.
pub struct TableConfig<T> {
    table_name: String,
    fields: Vec<FieldDescriptor<T>>,
    constructor: Constructor<T>,
}

impl<T> TableConfig<T> {
    /// Create a configuration with an infallible constructor.
    pub fn new(
        table_name: impl Into<String>,
        constructor: impl Fn() -> T + Send + Sync + 'static,
    ) -> Self {
        Self::with_constructor(table_name, Arc::new(move || Ok(constructor())))
    }

    /// Create a configuration from a fallible construction capability.
    pub fn with_constructor(table_name: impl Into<String>, constructor: Constructor<T>) -> Self {
        Self {
            table_name: table_name.into(),
            fields: Vec::new(),
            constructor,
        }
    }

    /// Append a field descriptor. Supplied order is preserved.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// The relational table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The field descriptors, in supplied order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// The construction capability.
    #[must_use]
    pub fn constructor(&self) -> &Constructor<T> {
        &self.constructor
    }

    pub(crate) fn into_parts(self) -> (String, Vec<FieldDescriptor<T>>, Constructor<T>) {
        (self.table_name, self.fields, self.constructor)
    }
}

impl<T> fmt::Debug for TableConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableConfig")
            .field("table_name", &self.table_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

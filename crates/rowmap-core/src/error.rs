//! Error surface for the table-mapping metadata layer.
//!
//! Every failure is reported through a single [`Error`] enum whose variants
//! carry enough context to diagnose without re-running: the mapped type, the
//! table, the offending field or column names, and the underlying cause where
//! one exists. This layer performs no retries and swallows nothing:
//! validation failures surface exactly once at registration time, misuse
//! failures surface at the point of misuse.

use std::error::Error as StdError;
use std::fmt;

/// Boxed underlying cause carried by wrapped failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures produced by this layer.
#[derive(Debug)]
pub enum Error {
    /// Invalid table configuration, detected once at registration time.
    Schema(SchemaError),
    /// Column lookup failed: unknown name, or a field name used in its place.
    Column(ColumnError),
    /// Constructing a new instance of the mapped type failed.
    Construct(ConstructError),
    /// Reading or writing a field value on an instance failed.
    Extract(ExtractError),
    /// Free-form error for downstream layers building on this crate.
    Custom(String),
}

/// Registration-time validation failure. Fatal to the table being registered.
#[derive(Debug)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
}

/// What went wrong while validating a table configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// More than one field claims an id role.
    DuplicateId,
    /// The table name is empty.
    EmptyTableName,
    /// The configuration holds no field descriptors.
    NoFields,
    /// Two field descriptors share a column name.
    DuplicateColumn,
}

/// Column lookup failure, reported at the point of misuse.
#[derive(Debug)]
pub struct ColumnError {
    pub kind: ColumnErrorKind,
    /// Table the lookup ran against.
    pub table: String,
    /// The name the caller passed in.
    pub column: String,
    pub message: String,
}

/// Why a column lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnErrorKind {
    /// Matches neither a column name nor a field name.
    Unknown,
    /// Matches a field's programmatic name; the message names the column to
    /// use instead.
    FieldNameUsed,
}

/// Object construction failure, wrapping the constructor's own error.
#[derive(Debug)]
pub struct ConstructError {
    /// The mapped type that could not be constructed.
    pub type_name: &'static str,
    pub message: String,
    pub source: Option<BoxError>,
}

/// Field value extraction or assignment failure.
#[derive(Debug)]
pub struct ExtractError {
    pub kind: ExtractErrorKind,
    /// Column whose value access failed.
    pub column: String,
    pub message: String,
    pub source: Option<BoxError>,
}

/// Direction of the failed value access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractErrorKind {
    /// Reading a value out of an instance.
    Read,
    /// Writing a value into an instance.
    Write,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(e) => f.write_str(&e.message),
            Error::Column(e) => f.write_str(&e.message),
            Error::Construct(e) => f.write_str(&e.message),
            Error::Extract(e) => f.write_str(&e.message),
            Error::Custom(message) => f.write_str(message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Construct(e) => e.source.as_ref().map(|s| &**s as &(dyn StdError + 'static)),
            Error::Extract(e) => e.source.as_ref().map(|s| &**s as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_message() {
        let err = Error::Schema(SchemaError {
            kind: SchemaErrorKind::EmptyTableName,
            message: "empty table name for type X".to_string(),
        });
        assert_eq!(err.to_string(), "empty table name for type X");
    }

    #[test]
    fn test_source_is_preserved() {
        let cause: BoxError = "field is private".into();
        let err = Error::Construct(ConstructError {
            type_name: "X",
            message: "could not construct instance of X".to_string(),
            source: Some(cause),
        });
        let source = StdError::source(&err).expect("cause should be exposed");
        assert_eq!(source.to_string(), "field is private");
    }

    #[test]
    fn test_schema_error_has_no_source() {
        let err = Error::Schema(SchemaError {
            kind: SchemaErrorKind::NoFields,
            message: "no fields configured for table 'accounts'".to_string(),
        });
        assert!(StdError::source(&err).is_none());
    }
}

//! Table descriptors: validated, cached mapping metadata for one type.
//!
//! A [`TableDescriptor`] is built once per mapped type when the table is
//! registered, validates the supplied configuration as a cohesive unit, and
//! is read, never re-derived, by every later read/write/update path.
//! Registration is fail-fast: an invalid configuration (two id fields, a
//! duplicated column name) stops the table from existing at all instead of
//! surfacing as a data error at some arbitrary later point.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::config::{Constructor, TableConfig};
use crate::dao::{DaoHandle, Record};
use crate::dialect::{ConnectionSource, Dialect};
use crate::error::{
    ColumnError, ColumnErrorKind, ConstructError, Error, Result, SchemaError, SchemaErrorKind,
};
use crate::field::FieldDescriptor;

/// Validated mapping metadata for one table and its mapped type `T`.
///
/// Immutable after construction; the lazily built column-name index is the
/// only post-construction state change and is published through a
/// [`OnceLock`], so concurrent readers are safe.
pub struct TableDescriptor<T> {
    table_name: String,
    fields: Vec<FieldDescriptor<T>>,
    id_index: Option<usize>,
    constructor: Constructor<T>,
    dao: DaoHandle,
    foreign_auto_create: bool,
    column_index: OnceLock<HashMap<String, usize>>,
}

impl<T> TableDescriptor<T> {
    /// Build a descriptor, taking the dialect from a connection source.
    pub fn new(
        source: &dyn ConnectionSource,
        dao: DaoHandle,
        config: TableConfig<T>,
    ) -> Result<Self> {
        Self::with_dialect(source.dialect(), dao, config)
    }

    /// Build a descriptor for the given dialect from a resolved
    /// configuration.
    ///
    /// Validates the configuration in a single pass over the descriptors:
    /// at most one field may carry an id role (zero is valid, the table is
    /// then non-updatable), column names must be unique, and the table name
    /// and field list must be non-empty. Any violation fails the whole
    /// registration.
    pub fn with_dialect(
        dialect: &dyn Dialect,
        dao: DaoHandle,
        config: TableConfig<T>,
    ) -> Result<Self> {
        let (table_name, fields, constructor) = config.into_parts();
        if table_name.is_empty() {
            return Err(Error::Schema(SchemaError {
                kind: SchemaErrorKind::EmptyTableName,
                message: format!("empty table name for type {}", type_name::<T>()),
            }));
        }
        if fields.is_empty() {
            return Err(Error::Schema(SchemaError {
                kind: SchemaErrorKind::NoFields,
                message: format!("no fields configured for table '{table_name}'"),
            }));
        }

        let mut id_index = None;
        let mut foreign_auto_create = false;
        let mut seen_columns = HashSet::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.is_id() {
                if let Some(first) = id_index {
                    let first_field: &FieldDescriptor<T> = &fields[first];
                    return Err(Error::Schema(SchemaError {
                        kind: SchemaErrorKind::DuplicateId,
                        message: format!(
                            "more than one id field configured for type {} ('{}', '{}')",
                            type_name::<T>(),
                            first_field.field_name(),
                            field.field_name(),
                        ),
                    }));
                }
                id_index = Some(index);
            }
            if field.is_foreign_auto_create() {
                foreign_auto_create = true;
            }
            if !seen_columns.insert(field.column_name()) {
                return Err(Error::Schema(SchemaError {
                    kind: SchemaErrorKind::DuplicateColumn,
                    message: format!(
                        "duplicate column name '{}' in table '{}'",
                        field.column_name(),
                        table_name,
                    ),
                }));
            }
        }

        tracing::debug!(
            table = %table_name,
            dialect = dialect.name(),
            fields = fields.len(),
            "registered table descriptor"
        );

        Ok(Self {
            table_name,
            fields,
            id_index,
            constructor,
            dao,
            foreign_auto_create,
            column_index: OnceLock::new(),
        })
    }

    /// Full path of the mapped type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        type_name::<T>()
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

    /// The id field, if the table has one.
    #[must_use]
    pub fn id_field(&self) -> Option<&FieldDescriptor<T>> {
        self.id_index.map(|index| &self.fields[index])
    }

    /// The construction capability this descriptor was registered with.
    #[must_use]
    pub fn constructor(&self) -> &Constructor<T> {
        &self.constructor
    }

    /// The handle of the owning data-access layer.
    #[must_use]
    pub fn dao(&self) -> &DaoHandle {
        &self.dao
    }

    /// Look up the field descriptor mapped to `column_name`.
    ///
    /// A miss distinguishes two caller mistakes: passing a field's
    /// programmatic name instead of its column name (the error names the
    /// column to use), and passing a name this table has never heard of.
    pub fn field_by_column_name(&self, column_name: &str) -> Result<&FieldDescriptor<T>> {
        let index = self.column_index.get_or_init(|| {
            tracing::trace!(table = %self.table_name, "building column name index");
            self.fields
                .iter()
                .enumerate()
                .map(|(index, field)| (field.column_name().to_string(), index))
                .collect()
        });
        if let Some(&index) = index.get(column_name) {
            return Ok(&self.fields[index]);
        }
        // Not a column. See whether the caller used the field name instead.
        if let Some(field) = self
            .fields
            .iter()
            .find(|field| field.field_name() == column_name)
        {
            return Err(Error::Column(ColumnError {
                kind: ColumnErrorKind::FieldNameUsed,
                table: self.table_name.clone(),
                column: column_name.to_string(),
                message: format!(
                    "use column name '{}' for table '{}' instead of field name '{}'",
                    field.column_name(),
                    self.table_name,
                    column_name,
                ),
            }));
        }
        Err(Error::Column(ColumnError {
            kind: ColumnErrorKind::Unknown,
            table: self.table_name.clone(),
            column: column_name.to_string(),
            message: format!(
                "unknown column '{}' in table '{}'",
                column_name, self.table_name,
            ),
        }))
    }

    /// True if some field maps exactly to `column_name`.
    ///
    /// Pure membership test: no field-name fallback, no error path.
    #[must_use]
    pub fn has_column(&self, column_name: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.column_name() == column_name)
    }

    /// Render `instance` as `TypeName column=value ...` in field order.
    ///
    /// Diagnostic-only; the first extraction failure aborts the whole
    /// rendering with an error naming the failing column.
    pub fn describe(&self, instance: &T) -> Result<String> {
        let mut out = String::with_capacity(64);
        out.push_str(short_type_name(type_name::<T>()));
        for field in &self.fields {
            let value = field.extract(instance)?;
            let _ = write!(out, " {}={}", field.column_name(), value);
        }
        Ok(out)
    }

    /// True if rows of this table can be updated via their id: an id field
    /// exists and at least one other field could change.
    #[must_use]
    pub fn is_updatable(&self) -> bool {
        self.id_index.is_some() && self.fields.len() > 1
    }

    /// True if any field requested automatic creation of its referenced
    /// foreign row on insert. Precomputed at registration.
    #[must_use]
    pub const fn is_foreign_auto_create(&self) -> bool {
        self.foreign_auto_create
    }
}

impl<T: Record> TableDescriptor<T> {
    /// Construct a new, empty instance of the mapped type.
    pub fn create(&self) -> Result<T> {
        create_record(&self.constructor, &self.dao)
    }
}

/// Construct a record through an arbitrary constructor/dao pair.
///
/// The reusable form of [`TableDescriptor::create`], for collaborators that
/// build related objects without a full table descriptor at hand. The new
/// instance receives the dao handle through [`Record::set_dao`] before it is
/// returned; a constructor failure is wrapped, never a half-built instance.
pub fn create_record<T: Record>(constructor: &Constructor<T>, dao: &DaoHandle) -> Result<T> {
    let construct = constructor.as_ref();
    match construct() {
        Ok(mut record) => {
            record.set_dao(dao.clone());
            Ok(record)
        }
        Err(source) => Err(Error::Construct(ConstructError {
            type_name: type_name::<T>(),
            message: format!("could not construct instance of {}", type_name::<T>()),
            source: Some(source),
        })),
    }
}

/// Last path segment of a type path, generics stripped.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl<T> fmt::Debug for TableDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDescriptor")
            .field("table_name", &self.table_name)
            .field("type_name", &self.type_name())
            .field("fields", &self.fields)
            .field("id_index", &self.id_index)
            .field("foreign_auto_create", &self.foreign_auto_create)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct TestDialect;

    impl Dialect for TestDialect {
        fn name(&self) -> &'static str {
            "sqlite"
        }
    }

    #[derive(Debug, Default)]
    struct Hero {
        id: i64,
        name: String,
        team_id: i64,
    }

    impl Record for Hero {}

    fn id_field() -> FieldDescriptor<Hero> {
        FieldDescriptor::new("id", "id", |h: &Hero| Value::BigInt(h.id)).generated_id()
    }

    fn name_field() -> FieldDescriptor<Hero> {
        FieldDescriptor::new("name", "hero_name", |h: &Hero| Value::Text(h.name.clone()))
    }

    fn team_field() -> FieldDescriptor<Hero> {
        FieldDescriptor::new("team_id", "team_id", |h: &Hero| Value::BigInt(h.team_id))
    }

    fn heroes() -> TableDescriptor<Hero> {
        let config = TableConfig::new("heroes", Hero::default)
            .field(id_field())
            .field(name_field())
            .field(team_field());
        TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config).unwrap()
    }

    #[test]
    fn test_registration_captures_metadata() {
        let table = heroes();
        assert_eq!(table.table_name(), "heroes");
        assert_eq!(table.fields().len(), 3);
        assert_eq!(table.id_field().unwrap().column_name(), "id");
        assert!(table.type_name().ends_with("Hero"));
        assert!(!table.is_foreign_auto_create());
    }

    #[test]
    fn test_no_id_field_is_valid_but_not_updatable() {
        let config = TableConfig::new("heroes", Hero::default)
            .field(name_field())
            .field(team_field());
        let table =
            TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config).unwrap();
        assert!(table.id_field().is_none());
        assert!(!table.is_updatable());
    }

    #[test]
    fn test_two_id_fields_fail_naming_both() {
        let config = TableConfig::new("heroes", Hero::default)
            .field(id_field())
            .field(name_field().id());
        let err = TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config)
            .unwrap_err();
        match err {
            Error::Schema(e) => {
                assert_eq!(e.kind, SchemaErrorKind::DuplicateId);
                assert!(e.message.contains("'id'"));
                assert!(e.message.contains("'name'"));
                assert!(e.message.contains("Hero"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_table_name_fails() {
        let config = TableConfig::new("", Hero::default).field(id_field());
        let err = TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config)
            .unwrap_err();
        match err {
            Error::Schema(e) => assert_eq!(e.kind, SchemaErrorKind::EmptyTableName),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_fields_fails() {
        let config: TableConfig<Hero> = TableConfig::new("heroes", Hero::default);
        let err = TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config)
            .unwrap_err();
        match err {
            Error::Schema(e) => {
                assert_eq!(e.kind, SchemaErrorKind::NoFields);
                assert!(e.message.contains("heroes"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_column_fails() {
        let config = TableConfig::new("heroes", Hero::default)
            .field(name_field())
            .field(FieldDescriptor::new("alias", "hero_name", |h: &Hero| {
                Value::Text(h.name.clone())
            }));
        let err = TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config)
            .unwrap_err();
        match err {
            Error::Schema(e) => {
                assert_eq!(e.kind, SchemaErrorKind::DuplicateColumn);
                assert!(e.message.contains("hero_name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_is_left_inverse_of_column_assignment() {
        let table = heroes();
        for (index, field) in table.fields().iter().enumerate() {
            let resolved = table.field_by_column_name(field.column_name()).unwrap();
            assert!(std::ptr::eq(resolved, &table.fields()[index]));
        }
    }

    #[test]
    fn test_resolve_field_name_gets_corrective_hint() {
        let table = heroes();
        let err = table.field_by_column_name("name").unwrap_err();
        match err {
            Error::Column(e) => {
                assert_eq!(e.kind, ColumnErrorKind::FieldNameUsed);
                assert_eq!(e.column, "name");
                assert!(e.message.contains("'hero_name'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_unknown_column_names_table() {
        let table = heroes();
        let err = table.field_by_column_name("power_level").unwrap_err();
        match err {
            Error::Column(e) => {
                assert_eq!(e.kind, ColumnErrorKind::Unknown);
                assert!(e.message.contains("'heroes'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_has_column_is_exact_and_quiet() {
        let table = heroes();
        assert!(table.has_column("hero_name"));
        assert!(!table.has_column("name"));
        assert!(!table.has_column("HERO_NAME"));
        assert!(!table.has_column("power_level"));
    }

    #[test]
    fn test_concurrent_first_resolution() {
        let table = heroes();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let field = table.field_by_column_name("team_id").unwrap();
                    assert_eq!(field.field_name(), "team_id");
                });
            }
        });
    }

    #[test]
    fn test_is_updatable_requires_a_non_id_field() {
        let id_only = TableConfig::new("heroes", Hero::default).field(id_field());
        let table =
            TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), id_only).unwrap();
        assert!(!table.is_updatable());
        assert!(heroes().is_updatable());
    }

    #[test]
    fn test_foreign_auto_create_is_accumulated() {
        let config = TableConfig::new("heroes", Hero::default)
            .field(id_field())
            .field(team_field().foreign_auto_create());
        let table =
            TableDescriptor::with_dialect(&TestDialect, DaoHandle::new(()), config).unwrap();
        assert!(table.is_foreign_auto_create());
    }

    #[test]
    fn test_describe_renders_field_order() {
        let table = heroes();
        let hero = Hero {
            id: 7,
            name: "Deadpond".to_string(),
            team_id: 2,
        };
        assert_eq!(
            table.describe(&hero).unwrap(),
            "Hero id=7 hero_name=Deadpond team_id=2"
        );
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("crate::table::Hero"), "Hero");
        assert_eq!(short_type_name("Hero"), "Hero");
        assert_eq!(short_type_name("alloc::vec::Vec<alloc::string::String>"), "Vec");
    }
}

use crate::{
    HasDialect,
    bind::{Binds, IntoBinds},
    cond::Conditions,
    delete::DeleteBuilder,
    dialect::Dialect,
    error::{InvalidInput, Result},
    fields::Fields,
    ident::{Ident, IntoIdent},
    insert::InsertBuilder,
    raw::{IntoRaw, Raw},
    statement::{Statement, StatementKind},
    update::UpdateBuilder,
    writer::{FormatContext, FormatWriter},
};

/// Entry point for every statement, bound to one dialect.
///
/// ```
/// use qcrud::{Conditions, Fields, Literal, StatementBuilder};
///
/// let builder = StatementBuilder::default();
/// let insert = builder
///     .insert("users", Fields::new().with("name", "Bennett").with("created", Literal::Now))
///     .unwrap();
/// assert_eq!("INSERT INTO users (name, created) VALUES (?, NOW())", insert.sql());
///
/// let delete = builder.delete("users", Conditions::new(), None);
/// assert!(delete.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementBuilder {
    dialect: Dialect,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::new(Dialect::MySql)
    }
}

impl StatementBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn for_database<Database: HasDialect>() -> Self {
        Self::new(Database::DIALECT)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn insert<T: IntoIdent>(&self, table: T, fields: Fields) -> Result<Statement> {
        InsertBuilder::insert_into(table)
            .fields(fields)
            .build_for(self.dialect)
    }

    pub fn update<T: IntoIdent>(
        &self,
        table: T,
        fields: Fields,
        conditions: Conditions,
        limit: Option<u64>,
    ) -> Result<Statement> {
        UpdateBuilder::table(table)
            .fields(fields)
            .conditions(conditions)
            .maybe_limit(limit)
            .build_for(self.dialect)
    }

    pub fn delete<T: IntoIdent>(
        &self,
        table: T,
        conditions: Conditions,
        limit: Option<u64>,
    ) -> Result<Statement> {
        DeleteBuilder::from(table)
            .conditions(conditions)
            .maybe_limit(limit)
            .build_for(self.dialect)
    }

    /// A query whose first column of the first row is the result, usually a
    /// `COUNT(*)`.
    pub fn select_count<S: IntoRaw, B: IntoBinds>(&self, sql: S, binds: B) -> Result<Statement> {
        self.raw(sql, binds, StatementKind::Scalar)
    }

    pub fn select_row<S: IntoRaw, B: IntoBinds>(&self, sql: S, binds: B) -> Result<Statement> {
        self.raw(sql, binds, StatementKind::Row)
    }

    pub fn select_all<S: IntoRaw, B: IntoBinds>(&self, sql: S, binds: B) -> Result<Statement> {
        self.raw(sql, binds, StatementKind::Rows)
    }

    /// Any other statement, run for its side effects.
    pub fn execute<S: IntoRaw, B: IntoBinds>(&self, sql: S, binds: B) -> Result<Statement> {
        self.raw(sql, binds, StatementKind::Execute)
    }

    pub fn truncate<T: IntoIdent>(&self, table: T) -> Result<Statement> {
        let truncate = Truncate(table.into_ident());
        if truncate.0.is_empty() {
            return Err(InvalidInput::EmptyTable.into());
        }
        Ok(Statement::render(&truncate, self.dialect, StatementKind::Truncate))
    }

    /// Counts the tables named `name` in the current schema.
    pub fn table_exists(&self, name: &str) -> Result<Statement> {
        let sql = match self.dialect {
            Dialect::MySql => {
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = ?"
            }
            Dialect::Postgres => {
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = ?"
            }
            Dialect::Sqlite => "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        };
        self.raw(Raw::new_static(sql), name, StatementKind::Scalar)
    }

    /// Column names of `table`, in declaration order.
    pub fn list_fields(&self, table: &str) -> Result<Statement> {
        let sql = match self.dialect {
            Dialect::MySql => {
                "SELECT column_name FROM information_schema.columns WHERE table_schema = DATABASE() AND table_name = ? ORDER BY ordinal_position"
            }
            Dialect::Postgres => {
                "SELECT column_name FROM information_schema.columns WHERE table_schema = current_schema() AND table_name = ? ORDER BY ordinal_position"
            }
            Dialect::Sqlite => "SELECT name FROM pragma_table_info(?) ORDER BY cid",
        };
        self.raw(Raw::new_static(sql), table, StatementKind::Rows)
    }

    fn raw<S: IntoRaw, B: IntoBinds>(
        &self,
        sql: S,
        binds: B,
        kind: StatementKind,
    ) -> Result<Statement> {
        let binds: Binds = binds.into_binds();
        Statement::raw(&sql.into_raw(), binds, self.dialect, kind)
    }
}

struct Truncate(Ident);

impl FormatWriter for Truncate {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match context.dialect {
            Dialect::MySql | Dialect::Postgres => context.writer.write_str("TRUNCATE TABLE ")?,
            Dialect::Sqlite => context.writer.write_str("DELETE FROM ")?,
        }
        self.0.format_writer(context)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::{
        Bind, Literal, MySql, Postgres, Sqlite, Value, classify, error::Error, placeholders,
    };

    use super::*;

    fn count_placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    fn random_value(rng: &mut StdRng, expected: &mut Vec<Bind>) -> Value {
        if rng.gen_bool(0.3) {
            Value::Literal(Literal::ALL[rng.gen_range(0..Literal::ALL.len())])
        } else {
            let value = rng.gen_range(-1000i64..1000);
            expected.push(Bind::I64(value));
            Value::Bind(Bind::I64(value))
        }
    }

    #[test]
    fn test_random_fields_align_with_binds() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let builder = StatementBuilder::default();

        for _ in 0..500 {
            let size: usize = rng.gen_range(0..=20);
            let mut fields = Fields::new();
            let mut set_binds = Vec::new();
            for index in 0..size {
                let value = random_value(&mut rng, &mut set_binds);
                fields.field(format!("col_{index}"), value);
            }

            let mut conditions = Conditions::new();
            let mut where_binds = Vec::new();
            for index in 0..rng.gen_range(0..5usize) {
                let value = random_value(&mut rng, &mut where_binds);
                conditions.where_eq(format!("key_{index}"), value);
            }

            match builder.insert("t", fields.clone()) {
                Ok(statement) => {
                    assert!(size > 0);
                    assert_eq!(count_placeholders(statement.sql()), statement.binds().len());
                    assert_eq!(set_binds, statement.binds().as_slice());

                    // walk the values list back against the fields
                    let (_, values) = statement.sql().split_once(" VALUES (").unwrap();
                    let values = values.strip_suffix(')').unwrap();
                    let mut binds = statement.binds().iter();
                    for (item, (_, value)) in values.split(", ").zip(fields.iter()) {
                        match value {
                            Value::Literal(literal) => assert_eq!(literal.as_str(), item),
                            Value::Bind(bind) => {
                                assert_eq!("?", item);
                                assert_eq!(Some(bind), binds.next());
                            }
                        }
                    }
                    assert_eq!(None, binds.next());
                }
                Err(err) => {
                    assert_eq!(0, size);
                    assert_eq!(Some(&InvalidInput::EmptyFields), err.as_invalid_input());
                }
            }

            match builder.update("t", fields, conditions.clone(), Some(1)) {
                Ok(statement) => {
                    let mut expected = set_binds.clone();
                    expected.extend(where_binds.iter().cloned());
                    assert_eq!(count_placeholders(statement.sql()), statement.binds().len());
                    assert_eq!(expected, statement.binds().as_slice());
                }
                Err(err) => {
                    assert_eq!(0, size);
                    assert!(err.is_invalid_input());
                }
            }

            match builder.delete("t", conditions, None) {
                Ok(statement) => {
                    assert_eq!(count_placeholders(statement.sql()), statement.binds().len());
                    assert_eq!(where_binds, statement.binds().as_slice());
                }
                Err(err) => {
                    assert!(where_binds.is_empty());
                    assert_eq!(
                        Some(&InvalidInput::MissingCondition),
                        err.as_invalid_input()
                    );
                }
            }
        }
    }

    #[test]
    fn test_builder_insert_example() {
        let mut fields = Fields::new();
        fields.field("name", "Bennett").field("created", classify("NOW()"));
        let statement = StatementBuilder::default().insert("users", fields).unwrap();
        assert_eq!(
            "INSERT INTO users (name, created) VALUES (?, NOW())",
            statement.sql()
        );
        assert_eq!(
            vec![Bind::String("Bennett".into())],
            statement.binds().as_slice()
        );
        assert_eq!(StatementKind::Insert, statement.kind());
    }

    #[test]
    fn test_builder_update_example() {
        let statement = StatementBuilder::for_database::<MySql>()
            .update(
                "users",
                Fields::new().with("name", "X"),
                Conditions::new().and("id", 44),
                Some(1),
            )
            .unwrap();
        assert_eq!(
            "UPDATE users SET name = ? WHERE id = ? LIMIT 1",
            statement.sql()
        );
        assert_eq!(
            vec![Bind::String("X".into()), Bind::I64(44)],
            statement.binds().as_slice()
        );
    }

    #[test]
    fn test_builder_delete_example() {
        let err = StatementBuilder::default()
            .delete("users", Conditions::new(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::MissingCondition)
        ));
    }

    #[test]
    fn test_builder_delete_literal() {
        let statement = StatementBuilder::default()
            .delete(
                "tokens",
                Conditions::new().and("revoked_at", Literal::Null).and("owner", 3),
                Some(10),
            )
            .unwrap();
        assert_eq!(
            "DELETE FROM tokens WHERE revoked_at = NULL AND owner = ? LIMIT 10",
            statement.sql()
        );
        assert_eq!(
            count_placeholders(statement.sql()),
            statement.binds().len()
        );
    }

    #[test]
    fn test_select_passthrough() {
        let builder = StatementBuilder::for_database::<Postgres>();
        let statement = builder
            .select_row(
                "SELECT name, email FROM users WHERE user_id = ? AND name LIKE ?",
                vec![Bind::I64(44), Bind::String("%bennett%".into())],
            )
            .unwrap();
        assert_eq!(
            "SELECT name, email FROM users WHERE user_id = $1 AND name LIKE $2",
            statement.sql()
        );
        assert_eq!(StatementKind::Row, statement.kind());

        let statement = builder
            .select_count("SELECT COUNT(id) FROM users WHERE user_id = ?", 10)
            .unwrap();
        assert_eq!(StatementKind::Scalar, statement.kind());
        assert_eq!(1, statement.binds().len());

        let statement = builder
            .select_all("SELECT name, email FROM users ORDER BY name ASC", ())
            .unwrap();
        assert_eq!(StatementKind::Rows, statement.kind());
        assert!(statement.binds().is_empty());
    }

    #[test]
    fn test_select_placeholder_mismatch() {
        let err = StatementBuilder::default()
            .select_all("SELECT * FROM users WHERE id = ? OR id = ?", 1)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::PlaceholderMismatch {
                placeholders: 2,
                binds: 1
            })
        ));
    }

    #[test]
    fn test_select_comment_is_not_a_placeholder() {
        let statement = StatementBuilder::default()
            .select_row("SELECT * FROM users WHERE id = ? -- is it active?", 1)
            .unwrap();
        assert_eq!(1, statement.binds().len());

        let statement = StatementBuilder::for_database::<Postgres>()
            .select_all("SELECT /* who? */ name FROM users WHERE id = ?", 1)
            .unwrap();
        assert_eq!(
            "SELECT /* who? */ name FROM users WHERE id = $1",
            statement.sql()
        );
    }

    #[test]
    fn test_select_in_list() {
        let list = vec![1, 48, 51];
        let sql = format!(
            "SELECT user_name FROM users WHERE user_id IN ({})",
            placeholders(list.len())
        );
        let statement = StatementBuilder::for_database::<Sqlite>()
            .select_all(sql, list)
            .unwrap();
        assert_eq!(
            "SELECT user_name FROM users WHERE user_id IN (?1, ?2, ?3)",
            statement.sql()
        );
        assert_eq!(3, statement.binds().len());
    }

    #[test]
    fn test_truncate_per_dialect() {
        assert_eq!(
            "TRUNCATE TABLE user_data",
            StatementBuilder::default().truncate(" user_data ").unwrap().sql()
        );
        assert_eq!(
            "DELETE FROM user_data",
            StatementBuilder::for_database::<Sqlite>()
                .truncate("user_data")
                .unwrap()
                .sql()
        );
        assert!(StatementBuilder::default().truncate("").is_err());
    }

    #[test]
    fn test_schema_lookups_bind_the_name() {
        let builder = StatementBuilder::for_database::<Postgres>();
        let exists = builder.table_exists("users").unwrap();
        assert!(exists.sql().ends_with("table_name = $1"));
        assert_eq!(
            vec![Bind::String("users".into())],
            exists.binds().as_slice()
        );

        let fields = StatementBuilder::for_database::<Sqlite>()
            .list_fields("users")
            .unwrap();
        assert_eq!(
            "SELECT name FROM pragma_table_info(?1) ORDER BY cid",
            fields.sql()
        );
        assert_eq!(StatementKind::Rows, fields.kind());
    }
}

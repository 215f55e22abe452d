use crate::{
    HasDialect,
    cond::Conditions,
    dialect::Dialect,
    error::{InvalidInput, Result},
    ident::{Ident, IntoIdent},
    literal::IntoValue,
    statement::{Statement, StatementKind},
    update::check_limit,
    writer::{FormatContext, FormatWriter},
};

/// `DELETE FROM table WHERE ... [LIMIT n]`
///
/// At least one condition is required. Clearing a whole table goes through
/// truncate instead.
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: Ident,
    conditions: Conditions,
    maybe_limit: Option<u64>,
}

impl DeleteBuilder {
    pub fn from<T: IntoIdent>(table: T) -> Self {
        Self {
            table: table.into_ident(),
            conditions: Conditions::new(),
            maybe_limit: None,
        }
    }

    pub fn where_eq<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        self.conditions.where_eq(column, value);
        self
    }

    pub fn conditions(&mut self, conditions: Conditions) -> &mut Self {
        self.conditions = conditions;
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.maybe_limit = Some(limit);
        self
    }

    pub(crate) fn maybe_limit(&mut self, limit: Option<u64>) -> &mut Self {
        self.maybe_limit = limit;
        self
    }

    pub fn build<Database: HasDialect>(&self) -> Result<Statement> {
        self.build_for(Database::DIALECT)
    }

    pub fn build_for(&self, dialect: Dialect) -> Result<Statement> {
        if self.table.is_empty() {
            return Err(InvalidInput::EmptyTable.into());
        }
        if self.conditions.is_empty() {
            return Err(InvalidInput::MissingCondition.into());
        }
        check_limit(self.maybe_limit, dialect)?;
        Ok(Statement::render(self, dialect, StatementKind::Delete))
    }
}

impl FormatWriter for DeleteBuilder {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        context.writer.write_str("DELETE FROM ")?;
        self.table.format_writer(context)?;
        self.conditions.format_where(context)?;
        context.write_limit(self.maybe_limit)
    }
}

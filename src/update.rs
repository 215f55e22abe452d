use crate::{
    HasDialect,
    cond::Conditions,
    dialect::Dialect,
    error::{InvalidInput, Result},
    fields::Fields,
    ident::{Ident, IntoIdent},
    literal::IntoValue,
    statement::{Statement, StatementKind},
    writer::{FormatContext, FormatWriter},
};

/// `UPDATE table SET ... [WHERE ...] [LIMIT n]`
///
/// An update without conditions touches every row of the table. That is
/// allowed, but it is on the caller to mean it.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: Ident,
    fields: Fields,
    conditions: Conditions,
    maybe_limit: Option<u64>,
}

impl UpdateBuilder {
    pub fn table<T: IntoIdent>(table: T) -> Self {
        Self {
            table: table.into_ident(),
            fields: Fields::new(),
            conditions: Conditions::new(),
            maybe_limit: None,
        }
    }

    pub fn set<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        self.fields.field(column, value);
        self
    }

    pub fn fields(&mut self, fields: Fields) -> &mut Self {
        self.fields = fields;
        self
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
        if self.fields.is_empty() {
            return Err(InvalidInput::EmptyFields.into());
        }
        check_limit(self.maybe_limit, dialect)?;
        Ok(Statement::render(self, dialect, StatementKind::Update))
    }
}

pub(crate) fn check_limit(limit: Option<u64>, dialect: Dialect) -> Result<()> {
    match limit {
        Some(limit) if limit > 0 && !dialect.supports_dml_limit() => {
            Err(InvalidInput::LimitUnsupported(dialect).into())
        }
        _ => Ok(()),
    }
}

impl FormatWriter for UpdateBuilder {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        context.writer.write_str("UPDATE ")?;
        self.table.format_writer(context)?;
        context.writer.write_str(" SET ")?;
        self.fields.format_assignments(context)?;
        self.conditions.format_where(context)?;
        context.write_limit(self.maybe_limit)
    }
}

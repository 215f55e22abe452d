use crate::{
    HasDialect,
    dialect::Dialect,
    error::{InvalidInput, Result},
    fields::Fields,
    ident::{Ident, IntoIdent},
    literal::IntoValue,
    statement::{Statement, StatementKind},
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: Ident,
    fields: Fields,
}

impl InsertBuilder {
    pub fn insert_into<T: IntoIdent>(table: T) -> Self {
        Self {
            table: table.into_ident(),
            fields: Fields::new(),
        }
    }

    pub fn field<K, V>(&mut self, column: K, value: V) -> &mut Self
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
        Ok(Statement::render(self, dialect, StatementKind::Insert))
    }
}

impl FormatWriter for InsertBuilder {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        context.writer.write_str("INSERT INTO ")?;
        self.table.format_writer(context)?;
        context.writer.write_str(" (")?;
        self.fields.format_columns(context)?;
        context.writer.write_str(") VALUES (")?;
        self.fields.format_values(context)?;
        context.writer.write_char(')')
    }
}

use crate::{
    bind::Binds,
    dialect::Dialect,
    error::{InvalidInput, Result},
    raw::Raw,
    writer::{FormatContext, FormatWriter},
};

/// How the driver result of a statement is meant to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
    Truncate,
    /// First column of the first row.
    Scalar,
    Row,
    Rows,
    Execute,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Truncate => "truncate",
            StatementKind::Scalar => "scalar",
            StatementKind::Row => "row",
            StatementKind::Rows => "rows",
            StatementKind::Execute => "execute",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text and the binds for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    binds: Binds,
    kind: StatementKind,
    dialect: Dialect,
}

impl Statement {
    pub(crate) fn render<F: FormatWriter>(
        fragment: &F,
        dialect: Dialect,
        kind: StatementKind,
    ) -> Self {
        let mut sql = String::with_capacity(64);
        let mut context = FormatContext::new(&mut sql, dialect);
        fragment
            .format_writer(&mut context)
            .expect("should not fail on a string writer");
        let binds = context.take_binds();
        Self {
            sql,
            binds,
            kind,
            dialect,
        }
    }

    /// Caller written SQL; the number of `?` must match the binds.
    pub(crate) fn raw(raw: &Raw, binds: Binds, dialect: Dialect, kind: StatementKind) -> Result<Self> {
        let mut sql = String::with_capacity(raw.as_str().len());
        let mut context = FormatContext::new(&mut sql, dialect);
        raw.format_writer(&mut context)
            .expect("should not fail on a string writer");
        let placeholders = context.placeholder;
        if placeholders != binds.len() {
            return Err(InvalidInput::PlaceholderMismatch {
                placeholders,
                binds: binds.len(),
            }
            .into());
        }
        Ok(Self {
            sql,
            binds,
            kind,
            dialect,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &Binds {
        &self.binds
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn into_parts(self) -> (String, Binds) {
        (self.sql, self.binds)
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

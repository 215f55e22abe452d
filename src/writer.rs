use std::fmt::Write;

use crate::{
    bind::{Bind, Binds},
    dialect::Dialect,
};

pub(crate) trait FormatWriter {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result;
}

/// Writer state shared by every fragment of a statement.
///
/// Placeholders and binds are produced by the same call so their count and
/// order cannot drift apart.
pub(crate) struct FormatContext<'a, W: Write> {
    pub(crate) writer: &'a mut W,
    pub(crate) dialect: Dialect,
    pub(crate) placeholder: usize,
    pub(crate) binds: Binds,
}

impl<'a, W: Write> FormatContext<'a, W> {
    pub fn new(writer: &'a mut W, dialect: Dialect) -> Self {
        Self {
            writer,
            dialect,
            placeholder: 0,
            binds: Binds::None,
        }
    }

    pub(crate) fn write_placeholder(&mut self) -> std::fmt::Result {
        self.placeholder += 1;
        match self.dialect {
            Dialect::MySql => self.writer.write_char('?'),
            Dialect::Postgres => write!(self.writer, "${}", self.placeholder),
            Dialect::Sqlite => write!(self.writer, "?{}", self.placeholder),
        }
    }

    pub(crate) fn write_bind(&mut self, bind: Bind) -> std::fmt::Result {
        self.write_placeholder()?;
        self.binds.push(bind);
        Ok(())
    }

    pub(crate) fn write_limit(&mut self, limit: Option<u64>) -> std::fmt::Result {
        // zero means no limit
        match limit {
            Some(limit) if limit > 0 => write!(self.writer, " LIMIT {limit}"),
            _ => Ok(()),
        }
    }

    pub(crate) fn take_binds(&mut self) -> Binds {
        self.binds.take()
    }
}

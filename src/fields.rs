use indexmap::IndexMap;

use crate::{
    ident::{Ident, IntoIdent},
    literal::{IntoValue, Value},
    writer::{FormatContext, FormatWriter},
};

/// Column to value map for inserts and updates.
///
/// Columns keep the order they were first set in, which is also the order of
/// the emitted columns and of the binds. Setting a column twice replaces its
/// value without moving it.
#[derive(Debug, Default, Clone)]
pub struct Fields {
    values: IndexMap<Ident, Value>,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    pub fn field<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        self.values.insert(column.into_ident(), value.into_value());
        self
    }

    pub fn with<K, V>(mut self, column: K, value: V) -> Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        self.field(column, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Value)> {
        self.values.iter()
    }

    pub(crate) fn format_columns<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        for (index, column) in self.values.keys().enumerate() {
            if index > 0 {
                context.writer.write_str(", ")?;
            }
            column.format_writer(context)?;
        }
        Ok(())
    }

    pub(crate) fn format_values<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        for (index, value) in self.values.values().enumerate() {
            if index > 0 {
                context.writer.write_str(", ")?;
            }
            value.format_writer(context)?;
        }
        Ok(())
    }

    pub(crate) fn format_assignments<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        for (index, (column, value)) in self.values.iter().enumerate() {
            if index > 0 {
                context.writer.write_str(", ")?;
            }
            column.format_writer(context)?;
            context.writer.write_str(" = ")?;
            value.format_writer(context)?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: IntoIdent,
    V: IntoValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (column, value) in iter {
            fields.field(column, value);
        }
        fields
    }
}

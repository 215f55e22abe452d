use crate::{
    ident::{Ident, IntoIdent},
    literal::{IntoValue, Value},
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    column: Ident,
    value: Value,
}

impl Condition {
    pub fn new<K, V>(column: K, value: V) -> Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        Self {
            column: column.into_ident(),
            value: value.into_value(),
        }
    }

    pub fn column(&self) -> &Ident {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl FormatWriter for Condition {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        self.column.format_writer(context)?;
        context.writer.write_str(" = ")?;
        self.value.format_writer(context)
    }
}

/// Equality conditions joined with `AND`, in the order they were added.
#[derive(Debug, Default, Clone)]
pub struct Conditions(pub(crate) Vec<Condition>);

impl Conditions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, other: Condition) {
        self.0.push(other);
    }

    pub fn where_eq<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        self.push(Condition::new(column, value));
        self
    }

    /// Adds `column = value`.
    ///
    /// Every condition is an equality, so [`Literal::Null`](crate::Literal::Null)
    /// renders `column = NULL`, which SQL never treats as true. Write an
    /// `IS NULL` query through the pass-through selects instead.
    ///
    /// ```
    /// use qcrud::{Conditions, Literal, StatementBuilder};
    ///
    /// let delete = StatementBuilder::default()
    ///     .delete("tokens", Conditions::new().and("revoked_at", Literal::Null), None)
    ///     .unwrap();
    /// assert_eq!("DELETE FROM tokens WHERE revoked_at = NULL", delete.sql());
    /// ```
    pub fn and<K, V>(mut self, column: K, value: V) -> Self
    where
        K: IntoIdent,
        V: IntoValue,
    {
        self.where_eq(column, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    /// Writes ` WHERE ...`, or nothing at all when there are no conditions.
    pub(crate) fn format_where<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        context.writer.write_str(" WHERE ")?;
        self.format_writer(context)
    }
}

impl FormatWriter for Conditions {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        for (index, condition) in self.0.iter().enumerate() {
            if index > 0 {
                context.writer.write_str(" AND ")?;
            }
            condition.format_writer(context)?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Conditions
where
    K: IntoIdent,
    V: IntoValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| Condition::new(column, value))
                .collect(),
        )
    }
}

impl From<Condition> for Conditions {
    fn from(condition: Condition) -> Self {
        Self(vec![condition])
    }
}

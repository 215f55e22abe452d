use crate::{
    bind::{Bind, IntoBind},
    writer::{FormatContext, FormatWriter},
};

/// SQL tokens that are written into the statement text as-is instead of being
/// bound as parameters.
///
/// The set is closed: a token only becomes a literal by adding a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Now,
    Timestamp,
    UnixTimestamp,
    CurrentTimestamp,
    /// Fine as a written value. In a condition it renders `col = NULL`,
    /// which matches no row.
    Null,
}

impl Literal {
    pub const ALL: [Literal; 5] = [
        Literal::Now,
        Literal::Timestamp,
        Literal::UnixTimestamp,
        Literal::CurrentTimestamp,
        Literal::Null,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Literal::Now => "NOW()",
            Literal::Timestamp => "TIMESTAMP()",
            Literal::UnixTimestamp => "UNIX_TIMESTAMP()",
            Literal::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Literal::Null => "NULL",
        }
    }

    /// Exact, case sensitive lookup of a token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|literal| literal.as_str() == token)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field or condition value: either spliced into the text or bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(Literal),
    Bind(Bind),
}

impl Value {
    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    pub fn as_bind(&self) -> Option<&Bind> {
        match self {
            Value::Bind(bind) => Some(bind),
            Value::Literal(_) => None,
        }
    }
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for Literal {
    fn into_value(self) -> Value {
        Value::Literal(self)
    }
}

// plain strings are never matched against the registry, see `classify`
impl<T> IntoValue for T
where
    T: IntoBind,
{
    fn into_value(self) -> Value {
        Value::Bind(self.into_bind())
    }
}

/// Turn a string into a literal when it is exactly one of the registry tokens,
/// otherwise bind it as a string.
///
/// ```
/// use qcrud::{classify, Literal, Value};
///
/// assert_eq!(Value::Literal(Literal::Now), classify("NOW()"));
/// assert!(!classify("now()").is_literal());
/// ```
pub fn classify(value: &str) -> Value {
    match Literal::from_token(value) {
        Some(literal) => Value::Literal(literal),
        None => Value::Bind(Bind::String(value.to_owned())),
    }
}

impl FormatWriter for Value {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            Value::Literal(literal) => context.writer.write_str(literal.as_str()),
            Value::Bind(bind) => context.write_bind(bind.clone()),
        }
    }
}

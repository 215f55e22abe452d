use smol_str::SmolStr;

use crate::{
    dialect::Dialect,
    writer::{FormatContext, FormatWriter},
};

/// Caller written SQL using `?` placeholders.
///
/// Placeholders are rewritten for the target dialect. Anything inside quotes
/// is copied untouched.
#[derive(Debug, Clone)]
pub struct Raw(SmolStr);

pub trait IntoRaw {
    fn into_raw(self) -> Raw;
}

impl IntoRaw for Raw {
    fn into_raw(self) -> Raw {
        self
    }
}

impl IntoRaw for &str {
    fn into_raw(self) -> Raw {
        Raw::new(self)
    }
}

impl IntoRaw for String {
    fn into_raw(self) -> Raw {
        Raw::new(self)
    }
}

impl IntoRaw for &String {
    fn into_raw(self) -> Raw {
        Raw::new(self.as_str())
    }
}

impl Raw {
    pub fn new<T>(value: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self(value.into())
    }

    pub fn new_static(value: &'static str) -> Self {
        Self(SmolStr::new_static(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// `?, ?, ?` for an `IN (...)` list of `count` values.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl FormatWriter for Raw {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        let sql = self.0.as_str();

        #[derive(Clone, Copy)]
        enum State {
            Normal,
            Quoted(char),
            LineComment,
            BlockComment,
        }

        let mut state = State::Normal;
        let mut span_start = 0;
        let mut chars = sql.char_indices().peekable();

        while let Some((index, char)) = chars.next() {
            match state {
                State::Normal => match char {
                    '\'' | '"' | '`' => state = State::Quoted(char),
                    '-' if starts_line_comment(&sql[index..], context.dialect) => {
                        chars.next();
                        state = State::LineComment;
                    }
                    '#' if matches!(context.dialect, Dialect::MySql) => state = State::LineComment,
                    '/' if matches!(chars.peek(), Some((_, '*'))) => {
                        chars.next();
                        state = State::BlockComment;
                    }
                    '?' => {
                        // ?| ?& and ?? are jsonb operators on postgres
                        let is_operator = matches!(context.dialect, Dialect::Postgres)
                            && matches!(chars.peek(), Some((_, '?' | '|' | '&')));
                        if is_operator {
                            chars.next();
                        } else {
                            context.writer.write_str(&sql[span_start..index])?;
                            context.write_placeholder()?;
                            span_start = index + char.len_utf8();
                        }
                    }
                    _ => {}
                },
                State::Quoted(quote) => {
                    if char == '\\' && matches!(context.dialect, Dialect::MySql) {
                        chars.next();
                    } else if char == quote {
                        if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                            // doubled quote
                            chars.next();
                        } else {
                            state = State::Normal;
                        }
                    }
                }
                State::LineComment => {
                    if char == '\n' {
                        state = State::Normal;
                    }
                }
                State::BlockComment => {
                    if char == '*' && matches!(chars.peek(), Some((_, '/'))) {
                        chars.next();
                        state = State::Normal;
                    }
                }
            }
        }

        if span_start < sql.len() {
            context.writer.write_str(&sql[span_start..])?;
        }

        Ok(())
    }
}

/// MySQL only treats `--` as a comment when whitespace or the end of the
/// statement follows, so `a--1` stays arithmetic.
fn starts_line_comment(rest: &str, dialect: Dialect) -> bool {
    let Some(after) = rest.strip_prefix("--") else {
        return false;
    };
    match dialect {
        Dialect::MySql => after.chars().next().is_none_or(char::is_whitespace),
        Dialect::Postgres | Dialect::Sqlite => true,
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::format_writer;

    use super::*;

    #[test]
    fn test_raw_str() {
        let value = Raw::new_static("'te?st'");
        let raw = format_writer(value, Dialect::Postgres);
        assert_eq!("'te?st'", raw);
    }

    #[test]
    fn test_raw_double_quote() {
        let value = Raw::new_static("'te''? st'");
        let raw = format_writer(value, Dialect::Postgres);
        assert_eq!("'te''? st'", raw);
    }

    #[test]
    fn test_raw_bind() {
        let value = Raw::new_static("select * from users where id = ? and name like ?");
        let raw = format_writer(value.clone(), Dialect::Postgres);
        assert_eq!("select * from users where id = $1 and name like $2", raw);
        let raw = format_writer(value.clone(), Dialect::Sqlite);
        assert_eq!("select * from users where id = ?1 and name like ?2", raw);
        let raw = format_writer(value, Dialect::MySql);
        assert_eq!("select * from users where id = ? and name like ?", raw);
    }

    #[test]
    fn test_raw_ident() {
        let value = Raw::new_static("\"te? ? \"\"st\" = ?");
        let raw = format_writer(value, Dialect::Postgres);
        assert_eq!("\"te? ? \"\"st\" = $1", raw);
    }

    #[test]
    fn test_raw_mysql_backslash_escape() {
        let value = Raw::new_static(r"select 'it\'s ?' from `we?rd` where a = ?");
        let mut sql = String::new();
        let mut context = FormatContext::new(&mut sql, Dialect::MySql);
        value.format_writer(&mut context).unwrap();
        assert_eq!(1, context.placeholder);
        assert_eq!(r"select 'it\'s ?' from `we?rd` where a = ?", sql);
    }

    #[test]
    fn test_placeholders_list() {
        assert_eq!("", placeholders(0));
        assert_eq!("?", placeholders(1));
        assert_eq!("?, ?, ?", placeholders(3));
    }

    #[test]
    fn test_placeholder_double() {
        let value = Raw::new_static("data ?? 'key' and data ?| array['a'] and id = ?");
        let raw = format_writer(value, Dialect::Postgres);
        assert_eq!("data ?? 'key' and data ?| array['a'] and id = $1", raw);
    }

    #[test]
    fn test_line_comment_question_mark() {
        let value = Raw::new_static("select * from users where id = ? -- is it active?\nand a = ?");
        let raw = format_writer(value.clone(), Dialect::Sqlite);
        assert_eq!("select * from users where id = ?1 -- is it active?\nand a = ?2", raw);

        let mut sql = String::new();
        let mut context = FormatContext::new(&mut sql, Dialect::MySql);
        value.format_writer(&mut context).unwrap();
        assert_eq!(2, context.placeholder);
    }

    #[test]
    fn test_mysql_double_dash_needs_whitespace() {
        let mut sql = String::new();
        let mut context = FormatContext::new(&mut sql, Dialect::MySql);
        Raw::new_static("select a--? from t where b = ?")
            .format_writer(&mut context)
            .unwrap();
        assert_eq!(2, context.placeholder);

        let raw = format_writer(Raw::new_static("select 1 --?"), Dialect::Postgres);
        assert_eq!("select 1 --?", raw);
    }

    #[test]
    fn test_hash_comment_is_mysql_only() {
        let mut sql = String::new();
        let mut context = FormatContext::new(&mut sql, Dialect::MySql);
        Raw::new_static("select * from t where id = ? # why?\n")
            .format_writer(&mut context)
            .unwrap();
        assert_eq!(1, context.placeholder);

        let raw = format_writer(Raw::new_static("select a # ?"), Dialect::Sqlite);
        assert_eq!("select a # ?1", raw);
    }

    #[test]
    fn test_block_comment_question_mark() {
        let value = Raw::new_static("select /* who? */ name from users where id = ? /* ?? */");
        let raw = format_writer(value, Dialect::Postgres);
        assert_eq!("select /* who? */ name from users where id = $1 /* ?? */", raw);

        let raw = format_writer(Raw::new_static("select 'a/*' = ?, \"*/\""), Dialect::Postgres);
        assert_eq!("select 'a/*' = $1, \"*/\"", raw);
    }
}

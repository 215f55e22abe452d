//! Parameterized CRUD statements and a small MySQL client.
//!
//! Values are either bound as parameters or, for a closed set of SQL tokens
//! such as `NOW()` and `NULL`, written into the statement text.
//!
//! ```
//! use qcrud::{Conditions, Fields, Literal, StatementBuilder};
//!
//! let builder = StatementBuilder::default();
//! let update = builder
//!     .update(
//!         "users",
//!         Fields::new().with("name", "X").with("updated", Literal::Now),
//!         Conditions::new().and("id", 44),
//!         Some(1),
//!     )
//!     .unwrap();
//! assert_eq!("UPDATE users SET name = ?, updated = NOW() WHERE id = ? LIMIT 1", update.sql());
//! assert_eq!(2, update.binds().len());
//! ```

mod bind;
mod builder;
mod cond;
mod delete;
mod dialect;
mod error;
mod fields;
mod ident;
mod insert;
mod literal;
mod raw;
mod record;
mod settings;
mod statement;
mod update;
mod writer;

#[cfg(feature = "mysql")]
mod client;

pub use bind::{Array, Bind, Binds, IntoBind, IntoBinds};
pub use builder::StatementBuilder;
pub use cond::{Condition, Conditions};
pub use delete::DeleteBuilder;
pub use dialect::{Dialect, HasDialect, MySql, Postgres, Sqlite};
pub use error::{Error, InvalidInput, Result};
pub use fields::Fields;
pub use ident::{Ident, IntoIdent};
pub use insert::InsertBuilder;
pub use literal::{IntoValue, Literal, Value, classify};
pub use raw::{IntoRaw, Raw, placeholders};
pub use record::Record;
pub use settings::{ResultShape, Settings};
pub use statement::{Statement, StatementKind};
pub use update::UpdateBuilder;

#[cfg(feature = "mysql")]
pub use client::{Client, Outcome, Row, Rows};

pub fn ident(value: &str) -> Ident {
    Ident::new(value)
}

pub fn raw(value: &str) -> Raw {
    Raw::new(value)
}

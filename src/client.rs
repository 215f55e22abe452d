use std::{
    fmt,
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use sqlx::{
    Connection, FromRow, Row as _,
    mysql::{MySqlArguments, MySqlConnection, MySqlQueryResult, MySqlRow},
};
use tokio::sync::Mutex;

use crate::{
    bind::{Bind, into_mysql_arguments},
    builder::StatementBuilder,
    cond::Conditions,
    dialect::Dialect,
    error::{Error, InvalidInput, Result},
    fields::Fields,
    ident::IntoIdent,
    record::{Record, column_value},
    settings::{ResultShape, Settings},
    statement::{Statement, StatementKind},
};

/// Rows shaped by [`Settings::result_shape`].
pub enum Rows {
    Structured(Vec<MySqlRow>),
    Associative(Vec<Record>),
}

impl Rows {
    pub fn len(&self) -> usize {
        match self {
            Rows::Structured(rows) => rows.len(),
            Rows::Associative(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub enum Row {
    Structured(MySqlRow),
    Associative(Record),
}

impl fmt::Debug for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rows::Structured(rows) => f.debug_tuple("Structured").field(&rows.len()).finish(),
            Rows::Associative(records) => f.debug_tuple("Associative").field(records).finish(),
        }
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Row::Structured(row) => f.debug_tuple("Structured").field(&row.len()).finish(),
            Row::Associative(record) => f.debug_tuple("Associative").field(record).finish(),
        }
    }
}

/// What [`Client::run`] got back, chosen by the statement kind.
#[derive(Debug)]
pub enum Outcome {
    /// Generated id, `0` when the table has none.
    Inserted(u64),
    /// Rows affected by an update, delete, truncate or other statement.
    Affected(u64),
    Value(Option<Bind>),
    Row(Option<Row>),
    Rows(Rows),
}

/// Statement kinds a reader accepts and how it reads them.
struct Reads {
    kinds: &'static [StatementKind],
    label: &'static str,
}

const VALUE: Reads = Reads {
    kinds: &[StatementKind::Scalar, StatementKind::Row],
    label: "a single value",
};

const ROW: Reads = Reads {
    kinds: &[StatementKind::Row, StatementKind::Rows],
    label: "a row",
};

const ROWS: Reads = Reads {
    kinds: &[StatementKind::Rows, StatementKind::Row],
    label: "rows",
};

/// Rejects statements rendered for another dialect, and, when `reads` is
/// given, statements whose result cannot be read that way.
fn check_statement(statement: &Statement, reads: Option<&Reads>) -> Result<()> {
    if statement.dialect() != Dialect::MySql {
        return Err(InvalidInput::DialectMismatch {
            expected: Dialect::MySql,
            found: statement.dialect(),
        }
        .into());
    }
    if let Some(reads) = reads {
        if !reads.kinds.contains(&statement.kind()) {
            return Err(InvalidInput::KindMismatch {
                kind: statement.kind(),
                expected: reads.label,
            }
            .into());
        }
    }
    Ok(())
}

fn prepare(statement: &Statement, reads: Option<&Reads>) -> Result<MySqlArguments> {
    check_statement(statement, reads)?;
    into_mysql_arguments(statement.binds().clone())
}

/// A single MySQL connection with the CRUD helpers on top.
///
/// Statements run one at a time; concurrent callers wait on the connection.
#[derive(Debug)]
pub struct Client {
    conn: Mutex<MySqlConnection>,
    builder: StatementBuilder,
    result_shape: ResultShape,
    query_timeout: Option<Duration>,
    queries: AtomicU64,
    last_insert_id: AtomicU64,
    affected: AtomicU64,
}

impl Client {
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let options = settings.connect_options();
        let connect = MySqlConnection::connect_with(&options);
        let conn = match settings.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, connect).await {
                Ok(conn) => conn,
                Err(_) => {
                    tracing::warn!(host = %settings.host, port = settings.port, ?limit, "connect timed out");
                    return Err(Error::Timeout(limit));
                }
            },
            None => connect.await,
        }
        .map_err(|err| {
            tracing::warn!(error = %err, host = %settings.host, port = settings.port, "could not connect");
            Error::Connection(err)
        })?;

        tracing::info!(host = %settings.host, database = %settings.database, "connected");
        Ok(Self::with_connection(
            conn,
            settings.result_shape,
            settings.query_timeout,
        ))
    }

    fn with_connection(
        conn: MySqlConnection,
        result_shape: ResultShape,
        query_timeout: Option<Duration>,
    ) -> Self {
        Self {
            conn: Mutex::new(conn),
            builder: StatementBuilder::new(Dialect::MySql),
            result_shape,
            query_timeout,
            queries: AtomicU64::new(0),
            last_insert_id: AtomicU64::new(0),
            affected: AtomicU64::new(0),
        }
    }

    pub fn builder(&self) -> &StatementBuilder {
        &self.builder
    }

    pub fn result_shape(&self) -> ResultShape {
        self.result_shape
    }

    /// Statements handed to the driver so far, failed ones included.
    pub fn total_queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id.load(Ordering::Relaxed)
    }

    /// Rows affected by the last statement run through [`Client::execute`].
    pub fn affected(&self) -> u64 {
        self.affected.load(Ordering::Relaxed)
    }

    async fn guarded<T, F>(&self, sql: &str, query: F) -> Result<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let number = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(query = number, sql, "executing");

        let result = match self.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, query).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(query = number, sql, ?limit, "query timed out");
                    return Err(Error::Timeout(limit));
                }
            },
            None => query.await,
        };

        result.map_err(|err| {
            tracing::warn!(query = number, sql, error = %err, "query failed");
            Error::Driver(err)
        })
    }

    /// Runs a statement of any kind and keeps the insert id and affected
    /// count it reported.
    pub async fn execute(&self, statement: &Statement) -> Result<MySqlQueryResult> {
        let args = prepare(statement, None)?;
        let mut conn = self.conn.lock().await;
        let query = sqlx::query_with(statement.sql(), args).execute(&mut *conn);
        let result = self.guarded(statement.sql(), query).await?;
        self.last_insert_id
            .store(result.last_insert_id(), Ordering::Relaxed);
        self.affected.store(result.rows_affected(), Ordering::Relaxed);
        Ok(result)
    }

    /// Runs any statement, returning the generated id when it produced one.
    pub async fn query(&self, statement: &Statement) -> Result<Option<u64>> {
        let result = self.execute(statement).await?;
        Ok(Some(result.last_insert_id()).filter(|id| *id > 0))
    }

    /// Returns the auto increment id of the new row, `0` when the table has
    /// none.
    pub async fn insert<T: IntoIdent>(&self, table: T, fields: Fields) -> Result<u64> {
        let statement = self.builder.insert(table, fields)?;
        Ok(self.execute(&statement).await?.last_insert_id())
    }

    pub async fn update<T: IntoIdent>(
        &self,
        table: T,
        fields: Fields,
        conditions: Conditions,
        limit: Option<u64>,
    ) -> Result<u64> {
        let statement = self.builder.update(table, fields, conditions, limit)?;
        Ok(self.execute(&statement).await?.rows_affected())
    }

    pub async fn delete<T: IntoIdent>(
        &self,
        table: T,
        conditions: Conditions,
        limit: Option<u64>,
    ) -> Result<u64> {
        let statement = self.builder.delete(table, conditions, limit)?;
        Ok(self.execute(&statement).await?.rows_affected())
    }

    pub async fn get_results(&self, statement: &Statement) -> Result<Rows> {
        let args = prepare(statement, Some(&ROWS))?;
        let mut conn = self.conn.lock().await;
        let query = sqlx::query_with(statement.sql(), args).fetch_all(&mut *conn);
        let rows = self.guarded(statement.sql(), query).await?;
        match self.result_shape {
            ResultShape::Structured => Ok(Rows::Structured(rows)),
            ResultShape::Associative => rows
                .iter()
                .map(Record::from_mysql_row)
                .collect::<Result<Vec<_>>>()
                .map(Rows::Associative),
        }
    }

    pub async fn get_results_as<T>(&self, statement: &Statement) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let args = prepare(statement, Some(&ROWS))?;
        let mut conn = self.conn.lock().await;
        let query = sqlx::query_as_with::<_, T, _>(statement.sql(), args).fetch_all(&mut *conn);
        self.guarded(statement.sql(), query).await
    }

    /// First row of the result, `None` when nothing matched.
    pub async fn get_row(&self, statement: &Statement) -> Result<Option<Row>> {
        let args = prepare(statement, Some(&ROW))?;
        let mut conn = self.conn.lock().await;
        let query = sqlx::query_with(statement.sql(), args).fetch_optional(&mut *conn);
        let Some(row) = self.guarded(statement.sql(), query).await? else {
            return Ok(None);
        };
        match self.result_shape {
            ResultShape::Structured => Ok(Some(Row::Structured(row))),
            ResultShape::Associative => Ok(Some(Row::Associative(Record::from_mysql_row(&row)?))),
        }
    }

    pub async fn get_row_as<T>(&self, statement: &Statement) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let args = prepare(statement, Some(&ROW))?;
        let mut conn = self.conn.lock().await;
        let query =
            sqlx::query_as_with::<_, T, _>(statement.sql(), args).fetch_optional(&mut *conn);
        self.guarded(statement.sql(), query).await
    }

    /// First column of the first row.
    pub async fn get_var<T>(&self, statement: &Statement) -> Result<Option<T>>
    where
        T: Send + Unpin,
        (T,): for<'r> FromRow<'r, MySqlRow>,
    {
        let args = prepare(statement, Some(&VALUE))?;
        let mut conn = self.conn.lock().await;
        let query =
            sqlx::query_scalar_with::<_, T, _>(statement.sql(), args).fetch_optional(&mut *conn);
        self.guarded(statement.sql(), query).await
    }

    /// Value of a `SELECT COUNT(...)` query, `0` when it returned no row.
    pub async fn num_rows(&self, statement: &Statement) -> Result<i64> {
        Ok(self.get_var::<i64>(statement).await?.unwrap_or(0))
    }

    /// First column of the first row, decoded without a target type.
    pub async fn get_value(&self, statement: &Statement) -> Result<Option<Bind>> {
        let args = prepare(statement, Some(&VALUE))?;
        let mut conn = self.conn.lock().await;
        let query = sqlx::query_with(statement.sql(), args).fetch_optional(&mut *conn);
        match self.guarded(statement.sql(), query).await? {
            Some(row) => column_value(&row, 0).map(Some),
            None => Ok(None),
        }
    }

    /// Runs `statement` and reads its result the way its kind asks for.
    pub async fn run(&self, statement: &Statement) -> Result<Outcome> {
        match statement.kind() {
            StatementKind::Insert => {
                let result = self.execute(statement).await?;
                Ok(Outcome::Inserted(result.last_insert_id()))
            }
            StatementKind::Update
            | StatementKind::Delete
            | StatementKind::Truncate
            | StatementKind::Execute => {
                let result = self.execute(statement).await?;
                Ok(Outcome::Affected(result.rows_affected()))
            }
            StatementKind::Scalar => self.get_value(statement).await.map(Outcome::Value),
            StatementKind::Row => self.get_row(statement).await.map(Outcome::Row),
            StatementKind::Rows => self.get_results(statement).await.map(Outcome::Rows),
        }
    }

    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let statement = self.builder.table_exists(name)?;
        Ok(self.num_rows(&statement).await? > 0)
    }

    pub async fn list_fields(&self, table: &str) -> Result<Vec<String>> {
        let statement = self.builder.list_fields(table)?;
        let args = prepare(&statement, Some(&ROWS))?;
        let mut conn = self.conn.lock().await;
        let query =
            sqlx::query_scalar_with::<_, String, _>(statement.sql(), args).fetch_all(&mut *conn);
        self.guarded(statement.sql(), query).await
    }

    pub async fn num_fields(&self, table: &str) -> Result<usize> {
        Ok(self.list_fields(table).await?.len())
    }

    /// Empties every table in `tables`, stopping at the first failure.
    /// Returns the number of tables truncated.
    pub async fn truncate<I, T>(&self, tables: I) -> Result<u64>
    where
        I: IntoIterator<Item = T>,
        T: IntoIdent,
    {
        let mut truncated = 0;
        for table in tables {
            let statement = self.builder.truncate(table)?;
            self.execute(&statement).await?;
            truncated += 1;
        }
        if truncated == 0 {
            return Err(InvalidInput::NoTables.into());
        }
        Ok(truncated)
    }

    pub async fn close(self) -> Result<()> {
        tracing::info!(queries = self.total_queries(), "closing connection");
        self.conn.into_inner().close().await.map_err(Error::Driver)
    }
}

/// Query Execution Module
///
/// This module runs SQL statements against a connection and materializes the
/// results. Rows are collected eagerly into `Row` values so a `Cursor` does
/// not borrow the connection it came from.

use crate::core::{HotelDbError, Result};
use rusqlite::types::{ToSqlOutput, Type, ValueRef};
use rusqlite::{Batch, Connection, Params, ToSql};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;
use std::sync::Arc;
use tracing::trace;

/// A single SQLite value as returned by the driver
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Parses a command-line literal: `null`, an integer, a real, or text.
    pub fn from_literal(literal: &str) -> Self {
        if literal.eq_ignore_ascii_case("null") {
            Value::Null
        } else if let Ok(i) = literal.parse::<i64>() {
            Value::Integer(i)
        } else if let Ok(f) = literal.parse::<f64>() {
            Value::Real(f)
        } else {
            Value::Text(literal.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to reals, matching SQLite's numeric affinity.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// SQLite stores BOOLEAN columns as 0/1 integers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Name of the storage class, used in decoding errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }
}

/// TEXT must be valid UTF-8; invalid bytes are an error, never replaced.
impl TryFrom<ValueRef<'_>> for Value {
    type Error = std::str::Utf8Error;

    fn try_from(value: ValueRef<'_>) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(std::str::from_utf8(t)?.to_string()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        })
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Blob(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(f) => ValueRef::Real(*f),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

/// Conversion from a `Value` into a Rust type, used by `Row::get_as`.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;

    /// Expected storage class, for error messages.
    fn expected() -> &'static str;
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn expected() -> &'static str {
        "INTEGER"
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn expected() -> &'static str {
        "REAL"
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn expected() -> &'static str {
        "BOOLEAN"
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn expected() -> &'static str {
        "TEXT"
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(b) => Some(b.clone()),
            _ => None,
        }
    }

    fn expected() -> &'static str {
        "BLOB"
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn expected() -> &'static str {
        T::expected()
    }
}

/// One result record: column names in result order mapped to values.
///
/// Lookup by name is ASCII case-insensitive, as SQLite column names are.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Row { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).and_then(|i| self.values.get(i))
    }

    /// Looks up a value by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Looks up a column and converts it, failing with `HotelDbError::Column`.
    pub fn get_as<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get(column).ok_or_else(|| HotelDbError::Column {
            column: column.to_string(),
            reason: "no such column in result".to_string(),
        })?;
        T::from_value(value).ok_or_else(|| HotelDbError::Column {
            column: column.to_string(),
            reason: format!("expected {}, found {}", T::expected(), value.type_name()),
        })
    }

    /// Iterates `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(column)))
    }
}

impl Index<&str> for Row {
    type Output = Value;

    /// Panics if the column is absent; use `get` for a fallible lookup.
    fn index(&self, column: &str) -> &Value {
        match self.get(column) {
            Some(value) => value,
            None => panic!("no column named {:?} in row", column),
        }
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Result of `execute`: the statement's rows, positioned before the first.
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: std::vec::IntoIter<Row>,
    rows_affected: usize,
    last_insert_rowid: i64,
}

impl Cursor {
    fn empty(conn: &Connection) -> Self {
        Cursor {
            columns: Arc::from(Vec::new()),
            rows: Vec::new().into_iter(),
            rows_affected: 0,
            last_insert_rowid: conn.last_insert_rowid(),
        }
    }

    /// Column names of the result set; empty for statements without results.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows changed by an INSERT, UPDATE or DELETE; zero for read-only statements.
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    /// Rowid of the most recent successful INSERT on the connection.
    pub fn last_insert_rowid(&self) -> i64 {
        self.last_insert_rowid
    }

    /// Returns the next row, or `None` once the result set is exhausted.
    pub fn fetchone(&mut self) -> Option<Row> {
        self.rows.next()
    }

    /// Returns every remaining row.
    pub fn fetchall(self) -> Vec<Row> {
        self.rows.collect()
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next()
    }
}

/// Runs one statement on `conn` and materializes its result.
///
/// Errors from prepare, bind and step are returned as the driver produced
/// them. Text holding more than one statement fails with
/// `rusqlite::Error::MultipleStatement` before anything runs. Empty or
/// comment-only text is a no-op with an empty cursor. Outside an explicit
/// transaction SQLite commits the statement before this returns.
pub(crate) fn run_statement<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Cursor> {
    trace!(sql, "executing statement");
    let mut batch = Batch::new(conn, sql);
    let mut stmt = match batch.next()? {
        Some(stmt) => stmt,
        None => return Ok(Cursor::empty(conn)),
    };
    // Any trailing text other than whitespace and comments is a second statement
    if !matches!(batch.next(), Ok(None)) {
        return Err(rusqlite::Error::MultipleStatement.into());
    }

    let columns: Arc<[String]> = stmt.column_names().into_iter().map(String::from).collect();
    let changes_before = total_changes(conn)?;

    let mut collected = Vec::new();
    if columns.is_empty() {
        stmt.execute(params)?;
    } else {
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value = Value::try_from(row.get_ref(i)?)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(i, Type::Text, Box::new(e)))?;
                values.push(value);
            }
            collected.push(Row::new(Arc::clone(&columns), values));
        }
    }
    drop(stmt);

    // sqlite3_changes() keeps the last DML count across DDL and PRAGMA statements
    let rows_affected = if total_changes(conn)? == changes_before {
        0
    } else {
        conn.changes() as usize
    };
    Ok(Cursor {
        columns,
        rows: collected.into_iter(),
        rows_affected,
        last_insert_rowid: conn.last_insert_rowid(),
    })
}

fn total_changes(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT total_changes()", [], |row| row.get(0))
}

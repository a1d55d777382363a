//! Generic record wrapper over the relational store.
//!
//! Every model implements [`Record`] and gets create/get/all/update/delete/filter/exists
//! for free. Field names are checked against the declared columns before any SQL is
//! assembled, so callers can never smuggle identifiers into a query.

use std::fmt;

use sqlx::{FromRow, Postgres, QueryBuilder, postgres::PgRow};

use crate::Database;

/// A row type with an integer primary key `id`.
pub trait Record: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Table the record lives in.
    const TABLE: &'static str;
    /// Writable columns, excluding `id`.
    const COLUMNS: &'static [&'static str];
}

/// A single bindable column value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl FieldValue {
    fn bind_into(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Self::Int(value) => builder.push_bind(*value),
            Self::Float(value) => builder.push_bind(*value),
            Self::Text(value) => builder.push_bind(value.clone()),
            Self::Bool(value) => builder.push_bind(*value),
        };
    }
}

/// Failure modes of the generic record operations.
#[derive(Debug)]
pub enum RecordError {
    /// A field name that is not one of the record's columns.
    UnknownColumn(String),
    /// An insert or update without any fields.
    NoFields,
    Database(sqlx::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn(name) => write!(f, "unknown column `{name}`"),
            Self::NoFields => write!(f, "at least one field is required"),
            Self::Database(source) => write!(f, "database error: {source}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(source) => Some(source),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for RecordError {
    fn from(source: sqlx::Error) -> Self {
        Self::Database(source)
    }
}

/// Insert a new row and return it.
pub async fn create<R: Record>(
    db: &Database,
    fields: &[(&str, FieldValue)],
) -> Result<R, RecordError> {
    let mut query = insert_query::<R>(fields)?;
    let record = query.build_query_as::<R>().fetch_one(db.pool()).await?;
    Ok(record)
}

/// Fetch a row by id.
pub async fn get<R: Record>(db: &Database, id: i64) -> Result<Option<R>, RecordError> {
    let mut query = by_id_query::<R>("SELECT * FROM", id, "");
    let record = query
        .build_query_as::<R>()
        .fetch_optional(db.pool())
        .await?;
    Ok(record)
}

/// Fetch every row ordered by id.
pub async fn all<R: Record>(db: &Database) -> Result<Vec<R>, RecordError> {
    filter::<R>(db, &[]).await
}

/// Overwrite the given fields of a row. Returns `None` when the row does not exist.
pub async fn update<R: Record>(
    db: &Database,
    id: i64,
    fields: &[(&str, FieldValue)],
) -> Result<Option<R>, RecordError> {
    let mut query = update_query::<R>(id, fields)?;
    let record = query
        .build_query_as::<R>()
        .fetch_optional(db.pool())
        .await?;
    Ok(record)
}

/// Delete a row by id, returning what was deleted.
pub async fn delete<R: Record>(db: &Database, id: i64) -> Result<Option<R>, RecordError> {
    let mut query = by_id_query::<R>("DELETE FROM", id, " RETURNING *");
    let record = query
        .build_query_as::<R>()
        .fetch_optional(db.pool())
        .await?;
    Ok(record)
}

/// Fetch every row whose fields all equal the given values.
pub async fn filter<R: Record>(
    db: &Database,
    fields: &[(&str, FieldValue)],
) -> Result<Vec<R>, RecordError> {
    let mut query = filter_query::<R>(fields)?;
    let records = query.build_query_as::<R>().fetch_all(db.pool()).await?;
    Ok(records)
}

/// Whether a row with `id` exists.
pub async fn exists<R: Record>(db: &Database, id: i64) -> Result<bool, RecordError> {
    let sql = exists_query::<R>();
    let found = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(db.pool())
        .await?;
    Ok(found)
}

fn exists_query<R: Record>() -> String {
    format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", R::TABLE)
}

fn is_column<R: Record>(name: &str) -> bool {
    R::COLUMNS.iter().any(|column| *column == name)
}

fn check_writable<R: Record>(fields: &[(&str, FieldValue)]) -> Result<(), RecordError> {
    if fields.is_empty() {
        return Err(RecordError::NoFields);
    }

    match fields.iter().find(|(name, _)| !is_column::<R>(name)) {
        Some((name, _)) => Err(RecordError::UnknownColumn((*name).to_owned())),
        None => Ok(()),
    }
}

fn insert_query<R: Record>(
    fields: &[(&str, FieldValue)],
) -> Result<QueryBuilder<'static, Postgres>, RecordError> {
    check_writable::<R>(fields)?;

    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", R::TABLE));
    for (index, (name, _)) in fields.iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push(*name);
    }

    builder.push(") VALUES (");
    for (index, (_, value)) in fields.iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        value.bind_into(&mut builder);
    }
    builder.push(") RETURNING *");

    Ok(builder)
}

fn update_query<R: Record>(
    id: i64,
    fields: &[(&str, FieldValue)],
) -> Result<QueryBuilder<'static, Postgres>, RecordError> {
    check_writable::<R>(fields)?;

    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", R::TABLE));
    for (index, (name, value)) in fields.iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push(*name).push(" = ");
        value.bind_into(&mut builder);
    }
    builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    Ok(builder)
}

fn by_id_query<R: Record>(
    verb: &str,
    id: i64,
    suffix: &str,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("{verb} {} WHERE id = ", R::TABLE));
    builder.push_bind(id).push(suffix);
    builder
}

fn filter_query<R: Record>(
    fields: &[(&str, FieldValue)],
) -> Result<QueryBuilder<'static, Postgres>, RecordError> {
    if let Some((name, _)) = fields
        .iter()
        .find(|(name, _)| *name != "id" && !is_column::<R>(name))
    {
        return Err(RecordError::UnknownColumn((*name).to_owned()));
    }

    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", R::TABLE));
    for (index, (name, value)) in fields.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        builder.push(*name).push(" = ");
        value.bind_into(&mut builder);
    }
    builder.push(" ORDER BY id");

    Ok(builder)
}

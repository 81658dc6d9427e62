pub mod artist;
pub mod show;
pub mod venue;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect, SqlErr,
    TransactionError,
};

use crate::entities::show as show_entity;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Conflicting record: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(reason)) => Self::InvalidReference(reason),
            Some(SqlErr::UniqueConstraintViolation(reason)) => Self::Conflict(reason),
            _ => Self::Database(err),
        }
    }
}

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(err) => err.into(),
            TransactionError::Transaction(err) => err,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A venue or artist together with how many of its shows are still to come.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithUpcomingShows<T> {
    pub model: T,
    pub num_upcoming_shows: u64,
}

/// Shows for one venue or artist, each paired with the record on the other
/// side of the booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowsPartition<T> {
    pub past: Vec<(show_entity::Model, T)>,
    pub upcoming: Vec<(show_entity::Model, T)>,
}

impl<T> ShowsPartition<T> {
    pub fn split(
        rows: impl IntoIterator<Item = (show_entity::Model, T)>,
        now: DateTime<Utc>,
    ) -> Self {
        let (upcoming, past) = rows
            .into_iter()
            .partition(|(show, _)| show.is_upcoming(now));
        Self { past, upcoming }
    }
}

/// Count upcoming shows keyed by the id found in `column` (venue or artist).
pub(crate) async fn upcoming_show_counts<C>(
    conn: &C,
    column: show_entity::Column,
    now: DateTime<Utc>,
) -> ServiceResult<HashMap<i64, u64>>
where
    C: ConnectionTrait,
{
    let ids: Vec<i64> = show_entity::Entity::find()
        .select_only()
        .column(column)
        .filter(show_entity::Column::StartTime.gt(now))
        .into_tuple()
        .all(conn)
        .await?;

    let mut counts = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Build a `%term%` pattern for `LIKE ... ESCAPE '\'`, matched against
/// `LOWER(column)`. SQLite folds ASCII letters only, so the term does too.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

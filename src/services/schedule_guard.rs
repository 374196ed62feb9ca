//! schedule_guard.rs
//!
//! Вставка сеанса только при отсутствии пересечения с другими сеансами
//! того же экрана в тот же день.
//!
//! Проверка и вставка - один условный `INSERT ... WHERE NOT EXISTS`. Перед ним
//! берётся блокировка строки экрана (`SELECT ... FOR UPDATE`), поэтому два
//! параллельных запроса на один экран проходят проверку строго по очереди.

use sqlx::PgConnection;
use tracing::warn;

use crate::{
    database::Database,
    error::{ServiceError, ServiceResult},
    models::{Show, ShowSlot},
};

#[derive(Clone)]
pub struct ScheduleConflictGuard {
    db: Database,
}

impl ScheduleConflictGuard {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Возвращает id нового сеанса или `ScheduleConflict`, если условная
    /// вставка не затронула ни одной строки.
    pub async fn insert_if_no_conflict(&self, conn: &mut PgConnection, slot: &ShowSlot) -> ServiceResult<i64> {
        // Сериализуем создание сеансов на одном экране
        let locked = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>("SELECT screen_id FROM screens WHERE screen_id = $1 FOR UPDATE")
                    .bind(slot.screen_id)
                    .fetch_optional(&mut *conn),
            )
            .await?;
        if locked.is_none() {
            return Err(ServiceError::InvalidScreen);
        }

        let inserted = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO shows (show_date, start_time, end_time, screen_id, movie_id, multiplex_id)
                    SELECT $1, $2, $3, $4, $5, $6
                    WHERE NOT EXISTS (
                        SELECT 1 FROM shows
                        WHERE screen_id = $4
                          AND show_date = $1
                          AND (
                                start_time BETWEEN $2 AND $3
                             OR end_time   BETWEEN $2 AND $3
                             OR $2 BETWEEN start_time AND end_time
                             OR $3 BETWEEN start_time AND end_time
                          )
                    )
                    RETURNING show_id
                    "#,
                )
                .bind(slot.show_date)
                .bind(slot.window.start())
                .bind(slot.window.end())
                .bind(slot.screen_id)
                .bind(slot.movie_id)
                .bind(slot.multiplex_id)
                .fetch_optional(&mut *conn),
            )
            .await?;

        match inserted {
            Some(show_id) => Ok(show_id),
            None => {
                let conflicting = self
                    .conflicting_show(conn, slot)
                    .await
                    .unwrap_or_else(|e| {
                        warn!("Cannot look up conflicting show on screen {}: {:?}", slot.screen_id, e);
                        None
                    });
                warn!(
                    "Schedule conflict on screen {} at {} {}-{} (existing show {:?})",
                    slot.screen_id,
                    slot.show_date,
                    slot.window.start(),
                    slot.window.end(),
                    conflicting.map(|s| s.show_id),
                );
                Err(ServiceError::ScheduleConflict)
            }
        }
    }

    // Только для диагностики: какой сеанс помешал вставке
    async fn conflicting_show(&self, conn: &mut PgConnection, slot: &ShowSlot) -> ServiceResult<Option<Show>> {
        let shows = self
            .db
            .timed(
                sqlx::query_as::<_, Show>(
                    "SELECT show_id, show_date, start_time, end_time, screen_id, movie_id, multiplex_id
                     FROM shows
                     WHERE screen_id = $1 AND show_date = $2
                     ORDER BY start_time",
                )
                .bind(slot.screen_id)
                .bind(slot.show_date)
                .fetch_all(&mut *conn),
            )
            .await?;

        Ok(shows
            .into_iter()
            .find(|show| show.window().is_some_and(|w| w.overlaps(&slot.window))))
    }
}

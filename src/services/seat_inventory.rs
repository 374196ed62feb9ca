//! seat_inventory.rs
//!
//! Места сеанса: массовое создание при появлении сеанса, карта мест и
//! блокировка набора мест для транзакции бронирования.
//! Статус места меняется только в `reservation` (продажа) и `booking` (отмена).

use sqlx::PgConnection;
use tracing::debug;

use crate::{
    database::Database,
    error::{ServiceError, ServiceResult},
    models::Seat,
};

#[derive(Clone)]
pub struct SeatInventory {
    db: Database,
}

impl SeatInventory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Создаёт места 1..=seat_count в статусе available. Выполняется в транзакции
    /// вызывающего, один раз сразу после вставки сеанса.
    pub async fn generate(
        &self,
        conn: &mut PgConnection,
        show_id: i64,
        seat_count: i32,
        unit_price: i32,
    ) -> ServiceResult<u64> {
        if seat_count <= 0 {
            return Err(ServiceError::InvalidRequest("количество мест должно быть > 0".to_string()));
        }
        if unit_price < 0 {
            return Err(ServiceError::InvalidRequest("цена места не может быть отрицательной".to_string()));
        }

        let inserted = self
            .db
            .timed(
                sqlx::query(
                    r#"
                    INSERT INTO seats (show_id, seat_number, price, status)
                    SELECT $1, n, $2, 'available'
                    FROM generate_series(1, $3::int) AS n
                    "#,
                )
                .bind(show_id)
                .bind(unit_price)
                .bind(seat_count)
                .execute(&mut *conn),
            )
            .await?
            .rows_affected();

        debug!("Generated {} seats for show {}", inserted, show_id);
        Ok(inserted)
    }

    /// Карта мест сеанса по возрастанию номера. Для неизвестного сеанса - пустой список.
    pub async fn list_by_show(&self, show_id: i64) -> ServiceResult<Vec<Seat>> {
        self.db
            .timed(
                sqlx::query_as::<_, Seat>(
                    "SELECT seat_id, show_id, seat_number, price, status
                     FROM seats
                     WHERE show_id = $1
                     ORDER BY seat_number",
                )
                .bind(show_id)
                .fetch_all(&self.db.pool),
            )
            .await
    }

    /// Блокирует запрошенные места до конца транзакции и возвращает их текущее
    /// состояние. Несуществующие id просто отсутствуют в ответе.
    ///
    /// Строки блокируются по возрастанию seat_id: две пересекающиеся брони
    /// ждут друг друга, а не попадают в deadlock.
    pub async fn lock_by_ids(&self, conn: &mut PgConnection, seat_ids: &[i64]) -> ServiceResult<Vec<Seat>> {
        self.db
            .timed(
                sqlx::query_as::<_, Seat>(
                    "SELECT seat_id, show_id, seat_number, price, status
                     FROM seats
                     WHERE seat_id = ANY($1)
                     ORDER BY seat_id
                     FOR UPDATE",
                )
                .bind(seat_ids)
                .fetch_all(&mut *conn),
            )
            .await
    }
}

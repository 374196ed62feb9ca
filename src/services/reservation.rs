//! reservation.rs
//!
//! Атомарная продажа набора мест: либо все места переходят available -> sold,
//! появляется бронь и собирается счёт, либо не меняется ничего.
//!
//! Корректность при гонках обеспечивает сам Postgres. Места читаются под
//! `FOR UPDATE` в порядке seat_id, а переход статуса - условный
//! `UPDATE ... WHERE status = 'available'`. Конкурирующая транзакция ждёт
//! блокировку строки, видит уже проданное место и откатывается целиком
//! с `SeatsUnavailable`.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::{
    database::Database,
    error::{ServiceError, ServiceResult},
    models::{booking::BOOKING_SOLD, Invoice, ReservedBooking},
    services::{invoice::InvoiceAssembler, seat_inventory::SeatInventory},
};

/// Проверка набора id на границе: не пустой, только положительные, без повторов.
pub fn validate_seat_ids(seat_ids: &[i64]) -> ServiceResult<()> {
    if seat_ids.is_empty() {
        return Err(ServiceError::InvalidRequest("нужно выбрать хотя бы одно место".to_string()));
    }
    if seat_ids.iter().any(|id| *id <= 0) {
        return Err(ServiceError::InvalidRequest("seat id должен быть > 0".to_string()));
    }
    let unique: HashSet<i64> = seat_ids.iter().copied().collect();
    if unique.len() != seat_ids.len() {
        return Err(ServiceError::InvalidRequest("seat id не должны повторяться".to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ReservationTransaction {
    db: Database,
    seats: SeatInventory,
    invoices: InvoiceAssembler,
}

impl ReservationTransaction {
    pub fn new(db: Database, seats: SeatInventory, invoices: InvoiceAssembler) -> Self {
        Self { db, seats, invoices }
    }

    /// Продаёт места и возвращает счёт. Коммит - последний шаг: любая ошибка,
    /// включая сборку счёта, оставляет места свободными и брони нет.
    pub async fn reserve(&self, seat_ids: &[i64], email: &str) -> ServiceResult<Invoice> {
        validate_seat_ids(seat_ids)?;

        let mut tx = self.db.timed(self.db.pool.begin()).await?;

        match self.reserve_in(&mut tx, seat_ids, email).await {
            Ok(invoice) => {
                self.db.timed(tx.commit()).await?;
                info!(
                    "Booking {} created: {} on {}, seats {:?}, buyer {}",
                    invoice.booking_id, invoice.title, invoice.show_date, invoice.seats, email
                );
                Ok(invoice)
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.timed(tx.rollback()).await {
                    tracing::error!("reserve rollback failed: {:?}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn reserve_in(
        &self,
        conn: &mut PgConnection,
        seat_ids: &[i64],
        email: &str,
    ) -> ServiceResult<Invoice> {
        // 1) Свежее чтение под блокировкой: все места должны существовать и быть свободны
        let seats = self.seats.lock_by_ids(conn, seat_ids).await?;
        let available = seats.iter().filter(|s| s.is_available()).count();
        if available != seat_ids.len() {
            debug!("Seats unavailable: requested {}, available {}", seat_ids.len(), available);
            return Err(ServiceError::SeatsUnavailable);
        }

        let Some(first) = seats.first() else {
            return Err(ServiceError::SeatsUnavailable);
        };
        let show_id = first.show_id;
        let unit_price = first.price;
        if seats.iter().any(|s| s.show_id != show_id) {
            return Err(ServiceError::InvalidRequest(
                "все места должны относиться к одному сеансу".to_string(),
            ));
        }

        // 2) Условный переход статуса; меньше строк, чем запрошено - кто-то успел раньше
        let updated = self
            .db
            .timed(
                sqlx::query(
                    "UPDATE seats SET status = 'sold'
                     WHERE seat_id = ANY($1) AND status = 'available'",
                )
                .bind(seat_ids)
                .execute(&mut *conn),
            )
            .await?
            .rows_affected();

        if updated as usize != seat_ids.len() {
            debug!("Lost seat race: updated {} of {}", updated, seat_ids.len());
            return Err(ServiceError::SeatsUnavailable);
        }

        // 3) Бронь
        let mut seat_numbers: Vec<i32> = seats.iter().map(|s| s.seat_number).collect();
        seat_numbers.sort_unstable();
        let (booking_id, created_at) = self
            .db
            .timed(
                sqlx::query_as::<_, (i64, DateTime<Utc>)>(
                    "INSERT INTO bookings (email, show_id, seat_numbers, status)
                     VALUES ($1, $2, $3, $4)
                     RETURNING booking_id, created_at",
                )
                .bind(email)
                .bind(show_id)
                .bind(&seat_numbers)
                .bind(BOOKING_SOLD)
                .fetch_one(&mut *conn),
            )
            .await?;

        let booking = ReservedBooking {
            booking_id,
            show_id,
            email: email.to_string(),
            seat_numbers,
            unit_price,
            created_at,
        };

        // 4) Счёт - на том же соединении, до коммита
        self.invoices.assemble_in(conn, &booking).await
    }
}

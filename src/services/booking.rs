//! booking.rs
//!
//! Жизненный цикл брони и создание сеансов.
//!
//! Единственный сервис, который знает обо всех частях ядра:
//! - **book**: транзакция резервирования вместе со счётом;
//! - **cancel**: отмена брони и возврат её мест в продажу одной транзакцией;
//! - **add_show**: проверка ссылок, вставка сеанса без пересечений и создание
//!   мест - тоже одной транзакцией, чтобы сеанс без мест не мог появиться.

use sqlx::PgConnection;
use tracing::{error, info, warn};

use crate::{
    config::BookingConfig,
    database::Database,
    error::{ServiceError, ServiceResult},
    models::{
        booking::{BOOKING_CANCELLED, BOOKING_SOLD},
        Booking, Invoice, NewShow, Seat, ShowSlot,
    },
    services::{
        catalog::CatalogService, invoice::InvoiceAssembler, reservation::ReservationTransaction,
        schedule_guard::ScheduleConflictGuard, seat_inventory::SeatInventory,
    },
};

#[derive(Clone)]
pub struct BookingLifecycleService {
    db: Database,
    catalog: CatalogService,
    seats: SeatInventory,
    guard: ScheduleConflictGuard,
    reservations: ReservationTransaction,
    settings: BookingConfig,
}

impl BookingLifecycleService {
    pub fn new(db: Database, catalog: CatalogService, settings: BookingConfig) -> Self {
        let seats = SeatInventory::new(db.clone());
        Self {
            guard: ScheduleConflictGuard::new(db.clone()),
            reservations: ReservationTransaction::new(
                db.clone(),
                seats.clone(),
                InvoiceAssembler::new(db.clone()),
            ),
            seats,
            catalog,
            settings,
            db,
        }
    }

    /* ---------- BOOKINGS ---------- */

    pub async fn book(&self, seat_ids: &[i64], email: &str) -> ServiceResult<Invoice> {
        self.reservations.reserve(seat_ids, email).await.inspect_err(|e| {
            if e.is_fault() {
                error!("book: reservation failed for {}: {:?}", email, e);
            }
        })
    }

    /// Отменяет бронь и освобождает её места. Повторная отмена ничего не меняет
    /// и завершается успешно: места, уже проданные другой брони, не трогаются.
    pub async fn cancel(&self, booking_id: i64) -> ServiceResult<()> {
        if booking_id <= 0 {
            return Err(ServiceError::InvalidRequest("booking_id должен быть > 0".to_string()));
        }

        let mut tx = self.db.timed(self.db.pool.begin()).await.map_err(|e| {
            error!("cancel: cannot begin transaction for {}: {:?}", booking_id, e);
            ServiceError::CancellationFailed
        })?;

        match self.cancel_in(&mut tx, booking_id).await {
            Ok(released) => {
                self.db.timed(tx.commit()).await.map_err(|e| {
                    error!("cancel: commit failed for {}: {:?}", booking_id, e);
                    ServiceError::CancellationFailed
                })?;
                info!("Booking {} cancelled, {} seats released", booking_id, released);
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.timed(tx.rollback()).await {
                    error!("cancel: rollback failed for {}: {:?}", booking_id, rollback_err);
                }
                match e {
                    ServiceError::BookingNotFound => Err(e),
                    other => {
                        error!("cancel: booking {} failed: {:?}", booking_id, other);
                        Err(ServiceError::CancellationFailed)
                    }
                }
            }
        }
    }

    async fn cancel_in(&self, conn: &mut PgConnection, booking_id: i64) -> ServiceResult<u64> {
        // 1) Пометим бронь отменённой - только если она ещё продана
        let cancelled = self
            .db
            .timed(
                sqlx::query_as::<_, (i64, Vec<i32>)>(
                    "UPDATE bookings SET status = $2
                     WHERE booking_id = $1 AND status = $3
                     RETURNING show_id, seat_numbers",
                )
                .bind(booking_id)
                .bind(BOOKING_CANCELLED)
                .bind(BOOKING_SOLD)
                .fetch_optional(&mut *conn),
            )
            .await?;

        let Some((show_id, seat_numbers)) = cancelled else {
            let exists = self
                .db
                .timed(
                    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM bookings WHERE booking_id = $1)")
                        .bind(booking_id)
                        .fetch_one(&mut *conn),
                )
                .await?;
            if exists {
                warn!("Booking {} is already cancelled", booking_id);
                return Ok(0);
            }
            return Err(ServiceError::BookingNotFound);
        };

        // 2) Вернём места в продажу. Блокировка в том же порядке, что и при бронировании
        self.db
            .timed(
                sqlx::query(
                    "SELECT seat_id FROM seats
                     WHERE show_id = $1 AND seat_number = ANY($2)
                     ORDER BY seat_id
                     FOR UPDATE",
                )
                .bind(show_id)
                .bind(&seat_numbers)
                .execute(&mut *conn),
            )
            .await?;

        let released = self
            .db
            .timed(
                sqlx::query(
                    "UPDATE seats SET status = 'available'
                     WHERE show_id = $1 AND seat_number = ANY($2) AND status = 'sold'",
                )
                .bind(show_id)
                .bind(&seat_numbers)
                .execute(&mut *conn),
            )
            .await?
            .rows_affected();

        Ok(released)
    }

    /// Брони покупателя, новые сверху.
    pub async fn bookings_for(&self, email: &str) -> ServiceResult<Vec<Booking>> {
        self.db
            .timed(
                sqlx::query_as::<_, Booking>(
                    "SELECT booking_id, email, show_id, seat_numbers, status, created_at
                     FROM bookings
                     WHERE email = $1
                     ORDER BY created_at DESC, booking_id DESC",
                )
                .bind(email)
                .fetch_all(&self.db.pool),
            )
            .await
    }

    pub async fn booking_owner(&self, booking_id: i64) -> ServiceResult<Option<String>> {
        self.db
            .timed(
                sqlx::query_scalar::<_, String>("SELECT email FROM bookings WHERE booking_id = $1")
                    .bind(booking_id)
                    .fetch_optional(&self.db.pool),
            )
            .await
    }

    /* ---------- SHOWS ---------- */

    pub async fn add_show(&self, show: &NewShow) -> ServiceResult<i64> {
        let mut tx = self.db.timed(self.db.pool.begin()).await?;

        match self.add_show_in(&mut tx, show).await {
            Ok(show_id) => {
                self.db.timed(tx.commit()).await?;
                info!("Show ID {}", show_id);
                Ok(show_id)
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.timed(tx.rollback()).await {
                    error!("add_show: rollback failed: {:?}", rollback_err);
                }
                if e.is_fault() {
                    error!("Err: Adding Show: {:?}", e);
                }
                Err(e)
            }
        }
    }

    async fn add_show_in(&self, conn: &mut PgConnection, show: &NewShow) -> ServiceResult<i64> {
        self.catalog
            .find_multiplex(conn, show.multiplex_id)
            .await?
            .ok_or(ServiceError::InvalidMultiplex)?;

        let screen = self
            .catalog
            .find_screen(conn, show.multiplex_id, show.screen_number)
            .await?
            .ok_or(ServiceError::InvalidScreen)?;

        let movie = self
            .catalog
            .find_movie(conn, &show.movie_title)
            .await?
            .ok_or(ServiceError::MovieNotFound)?;

        let slot = ShowSlot {
            show_date: show.date,
            window: show.window,
            screen_id: screen.screen_id,
            movie_id: movie.movie_id,
            multiplex_id: show.multiplex_id,
        };
        let show_id = self.guard.insert_if_no_conflict(conn, &slot).await?;

        let price = show.seat_price.unwrap_or(self.settings.default_seat_price);
        self.seats
            .generate(conn, show_id, screen.total_seats, price)
            .await?;

        Ok(show_id)
    }

    pub async fn list_seats(&self, show_id: i64) -> ServiceResult<Vec<Seat>> {
        self.seats.list_by_show(show_id).await
    }
}

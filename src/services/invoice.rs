use sqlx::PgConnection;

use crate::{
    database::Database,
    error::{ServiceError, ServiceResult},
    models::{invoice::InvoiceDetails, Invoice, ReservedBooking},
};

/// Собирает счёт по брони внутри транзакции резервирования: ошибка чтения
/// откатывает и продажу мест, и вставку брони. Только чтение.
#[derive(Clone)]
pub struct InvoiceAssembler {
    db: Database,
}

impl InvoiceAssembler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn assemble_in(&self, conn: &mut PgConnection, booking: &ReservedBooking) -> ServiceResult<Invoice> {
        let details = self.details_in(conn, booking.show_id).await?;
        Ok(compose(booking, details))
    }

    async fn details_in(&self, conn: &mut PgConnection, show_id: i64) -> ServiceResult<InvoiceDetails> {
        self.db
            .timed(
                sqlx::query_as::<_, InvoiceDetails>(
                    r#"
                    SELECT m.title, m.language, m.duration_minutes,
                           sc.screen_number, sh.show_date, sh.start_time,
                           mp.name AS multiplex_name, mp.locality
                    FROM shows sh
                    JOIN movies m       ON m.movie_id = sh.movie_id
                    JOIN screens sc     ON sc.screen_id = sh.screen_id
                    JOIN multiplexes mp ON mp.multiplex_id = sh.multiplex_id
                    WHERE sh.show_id = $1
                    "#,
                )
                .bind(show_id)
                .fetch_optional(&mut *conn),
            )
            .await?
            .ok_or(ServiceError::InvoiceUnavailable)
    }
}

fn compose(booking: &ReservedBooking, details: InvoiceDetails) -> Invoice {
    Invoice {
        booking_id: booking.booking_id,
        email: booking.email.clone(),
        title: details.title,
        language: details.language,
        duration_minutes: details.duration_minutes,
        screen_number: details.screen_number,
        show_date: details.show_date,
        start_time: details.start_time,
        multiplex_name: details.multiplex_name,
        locality: details.locality,
        seats: booking.seat_numbers.clone(),
        total_price: booking.total_price(),
    }
}

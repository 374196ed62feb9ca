use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const BOOKING_SOLD: &str = "sold";
pub const BOOKING_CANCELLED: &str = "cancelled";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub booking_id: i64,
    pub email: String,
    pub show_id: i64,
    pub seat_numbers: Vec<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.status == BOOKING_CANCELLED
    }
}

/// Бронь, вставленная транзакцией резервирования; из неё собирается счёт.
#[derive(Debug, Clone)]
pub struct ReservedBooking {
    pub booking_id: i64,
    pub show_id: i64,
    pub email: String,
    pub seat_numbers: Vec<i32>,
    pub unit_price: i32,
    pub created_at: DateTime<Utc>,
}

impl ReservedBooking {
    pub fn total_price(&self) -> i64 {
        self.unit_price as i64 * self.seat_numbers.len() as i64
    }
}

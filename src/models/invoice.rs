use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

/// Описательные поля сеанса для счёта (фильм, экран, мультиплекс).
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceDetails {
    pub title: String,
    pub language: String,
    pub duration_minutes: i32,
    pub screen_number: i32,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub multiplex_name: String,
    pub locality: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub booking_id: i64,
    pub email: String,
    pub title: String,
    pub language: String,
    pub duration_minutes: i32,
    pub screen_number: i32,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub multiplex_name: String,
    pub locality: String,
    pub seats: Vec<i32>,
    pub total_price: i64,
}

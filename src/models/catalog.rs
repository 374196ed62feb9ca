use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Location {
    pub location_id: i64,
    pub city: String,
    pub state: String,
    pub pincode: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewLocation {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(range(min = 1))]
    pub pincode: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Multiplex {
    pub multiplex_id: i64,
    pub name: String,
    pub contact: String,
    pub total_screens: i32,
    pub locality: String,
    pub location_id: i64,
}

// Мультиплекс вместе с адресом - для выдачи по городу
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MultiplexSummary {
    pub multiplex_id: i64,
    pub name: String,
    pub contact: String,
    pub total_screens: i32,
    pub locality: String,
    pub city: String,
    pub state: String,
    pub pincode: i32,
    pub location_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMultiplex {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(range(min = 1))]
    pub total_screens: i32,
    #[validate(length(min = 1))]
    pub locality: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(range(min = 1))]
    pub pincode: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Screen {
    pub screen_id: i64,
    pub screen_number: i32,
    pub total_seats: i32,
    pub sound_system: String,
    pub screen_dimension: String,
    pub multiplex_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewScreen {
    #[validate(range(min = 1))]
    pub screen_number: i32,
    #[validate(range(min = 1, max = 1000))]
    pub total_seats: i32,
    #[validate(length(min = 1))]
    pub sound_system: String,
    #[validate(length(min = 1))]
    pub screen_dimension: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub language: String,
    pub release_date: NaiveDate,
    pub genre: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMovie {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub language: String,
    pub release_date: NaiveDate,
    #[validate(length(min = 1))]
    pub genre: String,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_requires_positive_seat_count() {
        let screen = NewScreen {
            screen_number: 3,
            total_seats: 0,
            sound_system: "Dolby Atmos".to_string(),
            screen_dimension: "IMAX".to_string(),
        };
        assert!(screen.validate().is_err());

        let screen = NewScreen { total_seats: 120, ..screen };
        assert!(screen.validate().is_ok());
    }

    #[test]
    fn movie_requires_title() {
        let movie = NewMovie {
            title: String::new(),
            language: "Hindi".to_string(),
            release_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            genre: "Drama".to_string(),
            duration_minutes: 150,
        };
        assert!(movie.validate().is_err());
    }
}

//! catalog.rs
//!
//! Справочники: города, мультиплексы, экраны, фильмы, а также выдача
//! расписания. Здесь же проверки ссылок, которые выполняются перед созданием
//! сеанса (мультиплекс, экран в мультиплексе, фильм по названию).

use chrono::NaiveDate;
use sqlx::PgConnection;
use std::collections::BTreeMap;
use tracing::info;

use crate::{
    database::Database,
    error::{ServiceError, ServiceResult},
    models::{
        catalog::{NewLocation, NewMovie, NewMultiplex, NewScreen},
        Movie, Multiplex, MultiplexSummary, Screen, ShowListing,
    },
};

const SHOW_LISTING_COLUMNS: &str = r#"
    sh.show_id, sh.show_date, sh.start_time, sh.end_time,
    sc.screen_number, m.title, m.language,
    mp.name AS multiplex_name, mp.locality
"#;

#[derive(Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /* ---------- локации и мультиплексы ---------- */

    pub async fn add_location(&self, location: &NewLocation) -> ServiceResult<i64> {
        let id = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO locations (city, state, pincode) VALUES ($1, $2, $3) RETURNING location_id",
                )
                .bind(&location.city)
                .bind(&location.state)
                .bind(location.pincode)
                .fetch_one(&self.db.pool),
            )
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    ServiceError::InvalidRequest(format!("город {} уже существует", location.city))
                } else {
                    e
                }
            })?;
        info!("Location ID {}", id);
        Ok(id)
    }

    /// id города; если города ещё нет - создаёт его.
    async fn location_for_city(&self, city: &str, state: &str, pincode: i32) -> ServiceResult<i64> {
        self.db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO locations (city, state, pincode)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (city) DO UPDATE SET city = EXCLUDED.city
                    RETURNING location_id
                    "#,
                )
                .bind(city)
                .bind(state)
                .bind(pincode)
                .fetch_one(&self.db.pool),
            )
            .await
    }

    pub async fn add_multiplex(&self, multiplex: &NewMultiplex) -> ServiceResult<i64> {
        let location_id = self
            .location_for_city(&multiplex.city, &multiplex.state, multiplex.pincode)
            .await?;

        let id = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO multiplexes (name, contact, total_screens, locality, location_id)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING multiplex_id",
                )
                .bind(&multiplex.name)
                .bind(&multiplex.contact)
                .bind(multiplex.total_screens)
                .bind(&multiplex.locality)
                .bind(location_id)
                .fetch_one(&self.db.pool),
            )
            .await?;
        info!("Multiplex ID {}", id);
        Ok(id)
    }

    pub async fn multiplexes_in_city(&self, city: &str) -> ServiceResult<Vec<MultiplexSummary>> {
        self.db
            .timed(
                sqlx::query_as::<_, MultiplexSummary>(
                    r#"
                    SELECT mp.multiplex_id, mp.name, mp.contact, mp.total_screens, mp.locality,
                           l.city, l.state, l.pincode, l.location_id
                    FROM multiplexes mp
                    JOIN locations l ON l.location_id = mp.location_id
                    WHERE lower(l.city) = lower($1)
                    ORDER BY mp.name
                    "#,
                )
                .bind(city)
                .fetch_all(&self.db.pool),
            )
            .await
    }

    pub async fn find_multiplex(&self, conn: &mut PgConnection, multiplex_id: i64) -> ServiceResult<Option<Multiplex>> {
        self.db
            .timed(
                sqlx::query_as::<_, Multiplex>(
                    "SELECT multiplex_id, name, contact, total_screens, locality, location_id
                     FROM multiplexes WHERE multiplex_id = $1",
                )
                .bind(multiplex_id)
                .fetch_optional(&mut *conn),
            )
            .await
    }

    /* ---------- экраны ---------- */

    pub async fn add_screen(&self, multiplex_id: i64, screen: &NewScreen) -> ServiceResult<i64> {
        let mut conn = self.db.timed(self.db.pool.acquire()).await?;
        if self.find_multiplex(&mut conn, multiplex_id).await?.is_none() {
            return Err(ServiceError::InvalidMultiplex);
        }

        let id = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO screens (screen_number, total_seats, sound_system, screen_dimension, multiplex_id)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING screen_id",
                )
                .bind(screen.screen_number)
                .bind(screen.total_seats)
                .bind(&screen.sound_system)
                .bind(&screen.screen_dimension)
                .bind(multiplex_id)
                .fetch_one(&mut *conn),
            )
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    ServiceError::InvalidRequest(format!("экран {} уже существует", screen.screen_number))
                } else {
                    e
                }
            })?;
        info!("Screen ID {}", id);
        Ok(id)
    }

    pub async fn find_screen(
        &self,
        conn: &mut PgConnection,
        multiplex_id: i64,
        screen_number: i32,
    ) -> ServiceResult<Option<Screen>> {
        self.db
            .timed(
                sqlx::query_as::<_, Screen>(
                    "SELECT screen_id, screen_number, total_seats, sound_system, screen_dimension, multiplex_id
                     FROM screens WHERE multiplex_id = $1 AND screen_number = $2",
                )
                .bind(multiplex_id)
                .bind(screen_number)
                .fetch_optional(&mut *conn),
            )
            .await
    }

    /* ---------- фильмы ---------- */

    pub async fn add_movie(&self, movie: &NewMovie) -> ServiceResult<i64> {
        let id = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO movies (title, language, release_date, genre, duration_minutes)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING movie_id",
                )
                .bind(&movie.title)
                .bind(&movie.language)
                .bind(movie.release_date)
                .bind(&movie.genre)
                .bind(movie.duration_minutes)
                .fetch_one(&self.db.pool),
            )
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    ServiceError::InvalidRequest(format!("фильм {} уже существует", movie.title))
                } else {
                    e
                }
            })?;
        info!("Movie id {}", id);
        Ok(id)
    }

    pub async fn find_movie(&self, conn: &mut PgConnection, title: &str) -> ServiceResult<Option<Movie>> {
        self.db
            .timed(
                sqlx::query_as::<_, Movie>(
                    "SELECT movie_id, title, language, release_date, genre, duration_minutes
                     FROM movies WHERE title = $1",
                )
                .bind(title)
                .fetch_optional(&mut *conn),
            )
            .await
    }

    pub async fn movie_by_title(&self, title: &str) -> ServiceResult<Movie> {
        let mut conn = self.db.timed(self.db.pool.acquire()).await?;
        self.find_movie(&mut conn, title)
            .await?
            .ok_or(ServiceError::MovieNotFound)
    }

    /// Фильмы с датой выхода не раньше `from`.
    pub async fn upcoming_movies(&self, from: NaiveDate) -> ServiceResult<Vec<Movie>> {
        self.db
            .timed(
                sqlx::query_as::<_, Movie>(
                    "SELECT movie_id, title, language, release_date, genre, duration_minutes
                     FROM movies
                     WHERE release_date >= $1
                     ORDER BY release_date, title",
                )
                .bind(from)
                .fetch_all(&self.db.pool),
            )
            .await
    }

    /* ---------- расписание ---------- */

    /// Сеансы мультиплекса на дату, сгруппированные по названию фильма.
    pub async fn shows_by_multiplex_and_date(
        &self,
        multiplex_id: i64,
        date: NaiveDate,
    ) -> ServiceResult<BTreeMap<String, Vec<ShowListing>>> {
        let sql = format!(
            r#"
            SELECT {SHOW_LISTING_COLUMNS}
            FROM shows sh
            JOIN movies m       ON m.movie_id = sh.movie_id
            JOIN screens sc     ON sc.screen_id = sh.screen_id
            JOIN multiplexes mp ON mp.multiplex_id = sh.multiplex_id
            WHERE sh.multiplex_id = $1 AND sh.show_date = $2
            ORDER BY m.title, sh.start_time
            "#
        );
        let shows = self
            .db
            .timed(
                sqlx::query_as::<_, ShowListing>(&sql)
                    .bind(multiplex_id)
                    .bind(date)
                    .fetch_all(&self.db.pool),
            )
            .await?;

        Ok(group_by(shows, |s| s.title.clone()))
    }

    /// Сеансы фильма в городе на дату, сгруппированные по "мультиплекс район".
    pub async fn shows_by_movie_and_date(
        &self,
        title: &str,
        city: &str,
        date: NaiveDate,
    ) -> ServiceResult<BTreeMap<String, Vec<ShowListing>>> {
        let sql = format!(
            r#"
            SELECT {SHOW_LISTING_COLUMNS}
            FROM shows sh
            JOIN movies m       ON m.movie_id = sh.movie_id
            JOIN screens sc     ON sc.screen_id = sh.screen_id
            JOIN multiplexes mp ON mp.multiplex_id = sh.multiplex_id
            JOIN locations l    ON l.location_id = mp.location_id
            WHERE m.title = $1 AND lower(l.city) = lower($2) AND sh.show_date = $3
            ORDER BY mp.name, sh.start_time
            "#
        );
        let shows = self
            .db
            .timed(
                sqlx::query_as::<_, ShowListing>(&sql)
                    .bind(title)
                    .bind(city)
                    .bind(date)
                    .fetch_all(&self.db.pool),
            )
            .await?;

        Ok(group_by(shows, |s| format!("{} {}", s.multiplex_name, s.locality)))
    }
}

fn group_by<F>(shows: Vec<ShowListing>, key: F) -> BTreeMap<String, Vec<ShowListing>>
where
    F: Fn(&ShowListing) -> String,
{
    let mut grouped: BTreeMap<String, Vec<ShowListing>> = BTreeMap::new();
    for show in shows {
        grouped.entry(key(&show)).or_default().push(show);
    }
    grouped
}

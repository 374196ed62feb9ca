use chrono::NaiveDate;
use redis::AsyncCommands;
use tracing::{info, warn};

use crate::cache::CacheService;
use crate::error::ServiceResult;
use crate::models::{Movie, MultiplexSummary};

fn upcoming_movies_key(from: NaiveDate) -> String {
    format!("movies:upcoming:{}", from)
}

fn multiplexes_key(city: &str) -> String {
    format!("multiplexes:{}", city.to_lowercase())
}

impl CacheService {
    // Фильмы к показу: сначала кеш, потом БД
    pub async fn upcoming_movies(&self, from: NaiveDate) -> ServiceResult<Vec<Movie>> {
        let key = upcoming_movies_key(from);
        if let Ok(movies) = self.get_json::<Vec<Movie>>(&key).await {
            return Ok(movies);
        }

        let movies = self.catalog.upcoming_movies(from).await?;
        if let Err(e) = self.set_json(&key, &movies).await {
            warn!("Failed to cache upcoming movies: {:?}", e);
        }
        Ok(movies)
    }

    pub async fn multiplexes_in_city(&self, city: &str) -> ServiceResult<Vec<MultiplexSummary>> {
        let key = multiplexes_key(city);
        if let Ok(multiplexes) = self.get_json::<Vec<MultiplexSummary>>(&key).await {
            return Ok(multiplexes);
        }

        let multiplexes = self.catalog.multiplexes_in_city(city).await?;
        if let Err(e) = self.set_json(&key, &multiplexes).await {
            warn!("Failed to cache multiplexes for {}: {:?}", city, e);
        }
        Ok(multiplexes)
    }

    // Инвалидировать списки фильмов после добавления фильма
    pub async fn invalidate_movies(&self) {
        match self.delete_pattern("movies:upcoming:*").await {
            Ok(n) => info!("Invalidated {} upcoming movie lists", n),
            Err(e) => warn!("Failed to invalidate movie cache: {:?}", e),
        }
    }

    pub async fn invalidate_multiplexes(&self, city: &str) {
        let mut conn = self.redis.conn.clone();
        let result: Result<(), _> = conn.del(multiplexes_key(city)).await;
        if let Err(e) = result {
            warn!("Failed to invalidate multiplex cache for {}: {:?}", city, e);
        }
    }
}

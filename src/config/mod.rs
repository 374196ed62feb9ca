use ::config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub booking: BookingConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    /// Верхняя граница одного обращения к БД (запрос, commit, получение соединения).
    pub query_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

// Настройки Redis
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub catalog_ttl_seconds: u64,
}

// Настройки JWT
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_minutes: i64,
}

// Настройки продажи мест
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Цена места, если при создании сеанса цена не передана.
    pub default_seat_price: i32,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub allow_admin_signup: bool,
}

impl Config {
    /// Собирает конфигурацию: значения по умолчанию, затем `application.*`,
    /// затем переменные окружения `APP__SECTION__KEY` и привычные
    /// `DATABASE_URL`, `REDIS_URL`, `JWT_SECRET`, `PORT`, `RUST_LOG`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("application").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("app.host", env::var("HOST").ok())?
            .set_override_option("app.port", env::var("PORT").ok())?
            .set_override_option("app.environment", env::var("ENVIRONMENT").ok())?
            .set_override_option("app.rust_log", env::var("RUST_LOG").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("database.pool_size", env::var("DB_POOL_SIZE").ok())?
            .set_override_option("redis.url", env::var("REDIS_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
    }

    /// Значения по умолчанию. `database.url` и `jwt.secret` обязаны прийти извне.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ::config::Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000)?
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "cinema_booking=debug,tower_http=debug")?
            .set_default("database.pool_size", 20)?
            .set_default("database.query_timeout_ms", 1000)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.catalog_ttl_seconds", 3600)?
            .set_default("jwt.expires_in_minutes", 30)?
            .set_default("booking.default_seat_price", 300)?
            .set_default("features.allow_admin_signup", false)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }
}

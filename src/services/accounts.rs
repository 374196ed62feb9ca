use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::JwtConfig,
    database::Database,
    error::{ServiceError, ServiceResult},
    models::{
        user::{Credentials, NewUser},
        User,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub role: String,
    pub exp: usize,
}

/// Ключи подписи JWT. Создаются из конфигурации при старте.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::minutes(config.expires_in_minutes),
        }
    }

    pub fn issue(&self, email: &str, role: &str) -> ServiceResult<String> {
        let claims = Claims {
            email: email.to_string(),
            role: role.to_string(),
            exp: (Utc::now() + self.ttl).timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized)
    }
}

#[derive(Clone)]
pub struct AccountService {
    db: Database,
    keys: JwtKeys,
}

impl AccountService {
    pub fn new(db: Database, keys: JwtKeys) -> Self {
        Self { db, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn register(&self, user: &NewUser, role: &str) -> ServiceResult<i64> {
        let password_hash = bcrypt::hash(&user.password, bcrypt::DEFAULT_COST)?;

        let user_id = self
            .db
            .timed(
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO users (name, email, password, phone_number, role)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING user_id",
                )
                .bind(&user.name)
                .bind(user.email.trim())
                .bind(password_hash)
                .bind(&user.phone_number)
                .bind(role)
                .fetch_one(&self.db.pool),
            )
            .await
            .map_err(|e| if e.is_unique_violation() { ServiceError::UserExists } else { e })?;

        info!("User {} registered with role {}", user_id, role);
        Ok(user_id)
    }

    pub async fn login(&self, credentials: &Credentials) -> ServiceResult<String> {
        let user = self
            .db
            .timed(
                sqlx::query_as::<_, User>(
                    "SELECT user_id, name, email, password, phone_number, role
                     FROM users WHERE email = $1",
                )
                .bind(credentials.email.trim())
                .fetch_optional(&self.db.pool),
            )
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        if !bcrypt::verify(&credentials.password, &user.password).unwrap_or(false) {
            return Err(ServiceError::Unauthorized);
        }

        self.keys.issue(&user.email, &user.role)
    }
}

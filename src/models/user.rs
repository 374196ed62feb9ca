use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

// Телефон - ровно 10 цифр
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_must_contain_10_digits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, phone: &str) -> NewUser {
        NewUser {
            name: "Asha".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            phone_number: phone.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_user() {
        assert!(user("asha@example.com", "9876543210").validate().is_ok());
    }

    #[test]
    fn rejects_bad_phone_and_email() {
        assert!(user("asha@example.com", "98765").validate().is_err());
        assert!(user("asha@example.com", "98765abcde").validate().is_err());
        assert!(user("not-an-email", "9876543210").validate().is_err());
    }
}

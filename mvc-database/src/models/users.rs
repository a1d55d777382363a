use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Database;
use crate::record::{self, FieldValue, Record, RecordError};

/// A registered user.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "email", "password_hash"];
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User(name={}, email={})", self.name, self.email)
    }
}

impl User {
    /// Whether `password` matches the stored digest.
    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }
}

/// Insert a user, storing only the digest of `password`.
pub async fn create_user(
    db: &Database,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, RecordError> {
    record::create::<User>(
        db,
        &[
            ("name", FieldValue::from(name)),
            ("email", FieldValue::from(email)),
            ("password_hash", FieldValue::from(hash_password(password))),
        ],
    )
    .await
}

/// Look a user up by email address.
pub async fn find_by_email(db: &Database, email: &str) -> Result<Option<User>, RecordError> {
    let mut users = record::filter::<User>(db, &[("email", FieldValue::from(email))]).await?;
    Ok(users.pop())
}

/// Hex-encoded SHA-256 digest of a password.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 1,
            name: "Zaber".to_owned(),
            email: "zaber@example.com".to_owned(),
            password_hash: hash_password("hunter2"),
        }
    }

    #[test]
    fn password_digest_is_hex_sha256() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verify_password_compares_digests() {
        let user = sample();
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }

    #[test]
    fn display_shows_name_and_email() {
        assert_eq!(
            sample().to_string(),
            "User(name=Zaber, email=zaber@example.com)"
        );
    }
}

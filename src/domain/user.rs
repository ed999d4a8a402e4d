// User account domain model

/// A registered account. Passwords are stored only as Argon2id PHC
/// hash strings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

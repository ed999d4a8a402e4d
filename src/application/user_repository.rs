// Repository contract for user accounts
use async_trait::async_trait;

use crate::domain::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Insert a new account and return its id.
    async fn insert_user(&self, username: &str, password_hash: &str) -> anyhow::Result<i64>;
}

// SQLite-backed repositories for routes, users, and the geocode cache
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

use crate::application::geocode_service::GeocodeCache;
use crate::application::route_repository::RouteRepository;
use crate::application::user_repository::UserRepository;
use crate::domain::route::{NewRoute, RouteRecord};
use crate::domain::user::User;

const ROUTE_COLUMNS: &str = "id, name, filename, created_at, supplier, product, route_info";

#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (creating if missing) the database file and ensure the
    /// schema exists.
    pub async fn connect(database_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("failed to open sqlite database")?;

        let repository = Self { pool };
        repository.init_schema().await?;
        Ok(repository)
    }

    /// Private in-memory database, one connection so every query sees
    /// the same store.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("failed to open in-memory sqlite database")?;

        let repository = Self { pool };
        repository.init_schema().await?;
        Ok(repository)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routes (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                filename TEXT NOT NULL,
                created_at DATETIME,
                supplier TEXT,
                product TEXT,
                route_info TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .context("failed to create routes table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS geocache (
                id INTEGER PRIMARY KEY,
                lat REAL,
                lon REAL,
                address TEXT,
                UNIQUE(lat, lon)
            )",
        )
        .execute(&self.pool)
        .await
        .context("failed to create geocache table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("failed to create users table")?;

        Ok(())
    }
}

#[async_trait]
impl RouteRepository for SqliteRepository {
    async fn list_routes(&self) -> Result<Vec<RouteRecord>> {
        let query = format!("SELECT {ROUTE_COLUMNS} FROM routes ORDER BY created_at DESC");
        sqlx::query_as::<_, RouteRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .context("failed to list routes")
    }

    async fn find_route(&self, id: i64) -> Result<Option<RouteRecord>> {
        let query = format!("SELECT {ROUTE_COLUMNS} FROM routes WHERE id = ?1");
        sqlx::query_as::<_, RouteRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("failed to find route")
    }

    async fn find_route_by_name(&self, name: &str) -> Result<Option<RouteRecord>> {
        let query = format!("SELECT {ROUTE_COLUMNS} FROM routes WHERE name = ?1");
        sqlx::query_as::<_, RouteRecord>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("failed to find route by name")
    }

    async fn insert_route(
        &self,
        route: &NewRoute,
        filename: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO routes (name, filename, created_at, supplier, product, route_info)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&route.name)
        .bind(filename)
        .bind(created_at)
        .bind(&route.supplier)
        .bind(&route.product)
        .bind(&route.route_info)
        .execute(&self.pool)
        .await
        .context("failed to insert route")?;

        Ok(result.last_insert_rowid())
    }

    async fn delete_route(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM routes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete route")?;
        Ok(())
    }
}

#[async_trait]
impl GeocodeCache for SqliteRepository {
    async fn lookup_address(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT address FROM geocache WHERE lat = ?1 AND lon = ?2")
            .bind(lat)
            .bind(lon)
            .fetch_optional(&self.pool)
            .await
            .context("failed to query geocode cache")
    }

    async fn store_address(&self, lat: f64, lon: f64, address: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO geocache (lat, lon, address) VALUES (?1, ?2, ?3)")
            .bind(lat)
            .bind(lon)
            .bind(address)
            .execute(&self.pool)
            .await
            .context("failed to store geocode cache entry")?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("failed to find user")
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?1, ?2)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .context("failed to insert user")?;

        Ok(result.last_insert_rowid())
    }
}

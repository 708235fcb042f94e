use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::web::auth;

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    admin_password_hash: String,
    storage_root: PathBuf,
    public_base_url: String,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL env var is missing")?;
        let admin_password =
            env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD env var is missing")?;

        // The plaintext secret is hashed once at boot and dropped; logins are
        // verified server-side against the hash only.
        let admin_password_hash = auth::hash_password(&admin_password)
            .map_err(|err| anyhow::anyhow!("failed to hash admin password: {err}"))?;

        let storage_root =
            PathBuf::from(env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage/payments".into()));
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await
            .context("failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        crate::web::storage::ensure_storage_root(&storage_root)
            .await
            .context("failed to prepare evidence storage root")?;

        info!(storage_root = %storage_root.display(), "state initialized");

        Ok(Self {
            pool,
            admin_password_hash,
            storage_root,
            public_base_url,
        })
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    pub fn pool_ref(&self) -> &PgPool {
        &self.pool
    }

    pub fn admin_password_hash(&self) -> &str {
        &self.admin_password_hash
    }

    pub fn storage_root(&self) -> &PathBuf {
        &self.storage_root
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

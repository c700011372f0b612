use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::config::DatabaseConfig;
use crate::entities::{column, label, task, task_label};

/// Relational store for columns, tasks and labels.
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Connect to the configured database and make sure every table exists.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        Self::connect(&config.url).await
    }

    /// Connect to a database URL and create the schema.
    ///
    /// In-memory SQLite databases are pinned to a single pooled connection,
    /// since every new connection would otherwise open an empty database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options.sqlx_logging(false);
        if database_url.contains(":memory:") || database_url.contains("mode=memory") {
            options.min_connections(1).max_connections(1);
        }

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", redact_url(database_url)))?;

        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        log::info!("Connected to {:?} database", storage.conn.get_database_backend());

        Ok(storage)
    }

    /// Create tables in dependency order.
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut statements = vec![
            schema.create_table_from_entity(column::Entity),
            schema.create_table_from_entity(label::Entity),
            schema.create_table_from_entity(task::Entity),
            schema.create_table_from_entity(task_label::Entity),
        ];

        for statement in &mut statements {
            statement.if_not_exists();
            self.conn
                .execute(backend.build(&*statement))
                .await
                .context("Failed to create database schema")?;
        }

        Ok(())
    }
}

/// Hide the password part of a database URL before it reaches the logs.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!("{}://{}:***{}", &url[..scheme_end], &credentials[..colon], &url[at..]),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    ExprTrait, PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{LinkcutError, Result};
use crate::storage::Link;

use migration::{Migrator, MigratorTrait, entities::link};

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStore {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkcutError::database_config(
                "database_url is not set".to_string(),
            ));
        }

        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let store = SeaOrmStore {
            db,
            backend_name: backend_name.to_string(),
        };

        store.run_migrations().await?;

        warn!("{} link store initialized.", store.backend_name.to_uppercase());
        Ok(store)
    }

    /// Connect to SQLite with auto-create and performance pragmas
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| LinkcutError::database_config(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            LinkcutError::database_connection(format!("Failed to connect to SQLite: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// Connect to MySQL/PostgreSQL
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .idle_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            LinkcutError::database_connection(format!(
                "Failed to connect to {}: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| LinkcutError::database_operation(format!("Migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    fn model_to_link(model: link::Model) -> Link {
        Link {
            id: model.id,
            code: model.code,
            original_url: model.original_url,
            created_at: model.created_at,
            access_count: Ord::max(model.access_count, 0) as u64,
        }
    }

    /// Whether a DbErr is a unique-constraint violation on insert.
    fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
        use sea_orm::sqlx::Error;

        let sqlx_err = match err {
            sea_orm::DbErr::Exec(sea_orm::RuntimeErr::SqlxError(e)) => e,
            sea_orm::DbErr::Query(sea_orm::RuntimeErr::SqlxError(e)) => e,
            _ => return false,
        };

        match &**sqlx_err {
            Error::Database(db_err) => {
                let code = db_err.code();
                // SQLite: SQLITE_CONSTRAINT_UNIQUE (code 2067)
                // MySQL: ER_DUP_ENTRY (code 1062)
                // PostgreSQL: unique_violation (code 23505)
                code.as_ref()
                    .map(|c| c == "2067" || c == "1062" || c == "23505")
                    .unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Insert a new link. Fails with `DuplicateCode` when the code is taken;
    /// never overwrites an existing row.
    pub async fn insert(&self, code: &str, original_url: &str) -> Result<Link> {
        use sea_orm::ActiveValue::Set;

        let new_link = Link {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            original_url: original_url.to_string(),
            created_at: Utc::now(),
            access_count: 0,
        };

        let active_model = link::ActiveModel {
            id: Set(new_link.id.clone()),
            code: Set(new_link.code.clone()),
            original_url: Set(new_link.original_url.clone()),
            created_at: Set(new_link.created_at),
            access_count: Set(0),
        };

        match active_model.insert(&self.db).await {
            Ok(_) => {
                info!("Short link created: {}", new_link.code);
                Ok(new_link)
            }
            Err(e) if Self::is_unique_violation(&e) => Err(LinkcutError::duplicate_code(
                format!("Short code '{}' already exists", code),
            )),
            Err(e) => Err(LinkcutError::database_operation(format!(
                "Failed to insert link: {}",
                e
            ))),
        }
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkcutError::database_operation(format!("Failed to query link: {}", e))
            })?;

        Ok(model.map(Self::model_to_link))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Link>> {
        let model = link::Entity::find_by_id(id).one(&self.db).await.map_err(|e| {
            LinkcutError::database_operation(format!("Failed to query link: {}", e))
        })?;

        Ok(model.map(Self::model_to_link))
    }

    /// Atomically add 1 to a link's access counter and return the updated row.
    ///
    /// The increment runs in the database (`access_count = access_count + 1`)
    /// so concurrent calls for the same id never lose updates.
    pub async fn increment_access_count(&self, id: &str) -> Result<Link> {
        let result = link::Entity::update_many()
            .col_expr(
                link::Column::AccessCount,
                Expr::col(link::Column::AccessCount).add(1),
            )
            .filter(link::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkcutError::database_operation(format!("Failed to increment access count: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(LinkcutError::not_found(format!("Link not found: {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| LinkcutError::not_found(format!("Link not found: {}", id)))
    }

    /// Page through all links, newest first. Returns `(items, total)`.
    pub async fn list_paginated(&self, page: u64, page_size: u64) -> Result<(Vec<Link>, u64)> {
        let paginator = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await.map_err(|e| {
            LinkcutError::database_operation(format!("Failed to count links: {}", e))
        })?;

        let models = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            LinkcutError::database_operation(format!("Failed to list links: {}", e))
        })?;

        Ok((models.into_iter().map(Self::model_to_link).collect(), total))
    }

    /// All links, newest first. Used by the CSV export.
    pub async fn load_all(&self) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                LinkcutError::database_operation(format!("Failed to load links: {}", e))
            })?;

        Ok(models.into_iter().map(Self::model_to_link).collect())
    }

    pub async fn count_links(&self) -> Result<u64> {
        link::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LinkcutError::database_operation(format!("Failed to count links: {}", e)))
    }

    /// Delete by id. Returns the number of rows removed; deleting an absent
    /// id is not an error here, callers decide what zero means.
    pub async fn remove(&self, id: &str) -> Result<u64> {
        let result = link::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkcutError::database_operation(format!("Failed to delete link: {}", e))
            })?;

        if result.rows_affected > 0 {
            info!("Short link deleted: {}", id);
        } else {
            debug!("Delete for absent link id: {}", id);
        }

        Ok(result.rows_affected)
    }
}

//! # 数据库模块
//!
//! 数据库连接和迁移管理

use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{Context, Result};
use entity::{AuditLogs, Batches, Capa, Deviations, Documents, Monitoring, Reports, Users};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tracing::{error, info, warn};

/// 初始化数据库连接
///
/// SQLite 文件数据库会先确保目录与文件存在；内存数据库固定为单连接，
/// 否则每个连接都会看到一个独立的空库。
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    info!(
        "正在连接数据库: {}",
        config.url.chars().take(50).collect::<String>()
    );

    config.ensure_database_path()?;

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);

    if config.is_memory_database() {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(config.max_connections);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("数据库连接失败: {}", config.url))?;

    info!("数据库连接成功");
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> std::result::Result<(), DbErr> {
    info!("开始运行数据库迁移...");

    match ::migration::Migrator::up(db, None).await {
        Ok(()) => {
            info!("数据库迁移完成");
            Ok(())
        }
        Err(e) => {
            error!("数据库迁移失败: {}", e);
            Err(e)
        }
    }
}

/// 检查数据库状态
pub async fn check_database_status(db: &DatabaseConnection) -> std::result::Result<usize, DbErr> {
    info!("检查数据库状态...");

    let pending = ::migration::Migrator::get_pending_migrations(db).await?;

    if pending.is_empty() {
        info!("所有迁移都已应用");
    } else {
        warn!("有 {} 个待应用的迁移", pending.len());
    }

    Ok(pending.len())
}

/// 单表记录数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub count: u64,
}

/// 统计所有业务表的记录数（按建表顺序）
pub async fn table_counts(db: &DatabaseConnection) -> Result<Vec<TableCount>> {
    Ok(vec![
        TableCount {
            table: "users",
            count: Users::find().count(db).await?,
        },
        TableCount {
            table: "deviations",
            count: Deviations::find().count(db).await?,
        },
        TableCount {
            table: "capa",
            count: Capa::find().count(db).await?,
        },
        TableCount {
            table: "monitoring",
            count: Monitoring::find().count(db).await?,
        },
        TableCount {
            table: "batches",
            count: Batches::find().count(db).await?,
        },
        TableCount {
            table: "reports",
            count: Reports::find().count(db).await?,
        },
        TableCount {
            table: "documents",
            count: Documents::find().count(db).await?,
        },
        TableCount {
            table: "audit_logs",
            count: AuditLogs::find().count(db).await?,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_migrations_create_default_actor() {
        let db = init_database(&memory_config()).await.unwrap();
        run_migrations(&db).await.unwrap();

        assert_eq!(check_database_status(&db).await.unwrap(), 0);

        let counts = table_counts(&db).await.unwrap();
        assert_eq!(counts.len(), 8);
        assert_eq!(counts[0], TableCount { table: "users", count: 1 });
        assert!(counts[1..].iter().all(|c| c.count == 0));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = init_database(&memory_config()).await.unwrap();
        run_migrations(&db).await.unwrap();
        run_migrations(&db).await.unwrap();

        let admin = Users::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(admin.username, "qa.admin");
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("qms.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            ..Default::default()
        };

        let db = init_database(&config).await.unwrap();
        run_migrations(&db).await.unwrap();
        assert!(path.exists());
    }
}

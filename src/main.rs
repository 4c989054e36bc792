//! # QMS API 主程序
//!
//! `serve`（默认）启动 HTTP 服务；`init` 初始化数据库；`summary` 打印数据概览。

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use qms_api::{
    Result,
    app::AppContext,
    config::{AppConfig, ConfigManager},
    database,
    error::Context,
    inspect::DatabaseSummary,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::ApiServer,
    seed,
};
use sea_orm::DatabaseConnection;

#[derive(Debug, Parser)]
#[command(name = "qms-api", version, about = "Pharmaceutical QMS API Server")]
struct Cli {
    /// 配置文件路径（默认 config/config.{RUST_ENV}.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 日志级别，`RUST_LOG` 优先
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 迁移数据库并启动 HTTP 服务
    Serve {
        /// 启动前填充演示数据
        #[arg(long)]
        seed: bool,
    },
    /// 迁移数据库并打印概览
    Init {
        #[arg(long)]
        seed: bool,
    },
    /// 打印各表记录数与最近的偏差
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_optimized_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        lerror!(
            "system",
            LogStage::Error,
            LogComponent::Main,
            "run_failed",
            &format!("程序异常退出: {e:?}")
        );
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config_manager = ConfigManager::new(cli.config.as_deref())?;
    let config = config_manager.get_config();

    let db = prepare_database(&config).await?;

    match cli.command.unwrap_or(Command::Serve { seed: false }) {
        Command::Serve { seed } => {
            if seed || config.seed.on_startup {
                seed::seed_sample_data(&db).await?;
            }

            linfo!(
                "system",
                LogStage::Startup,
                LogComponent::Main,
                "service_starting",
                "服务启动"
            );
            let context = Arc::new(AppContext::new(Arc::clone(&config), Arc::new(db)));
            ApiServer::new(config.server.clone(), context).serve().await?;

            linfo!(
                "system",
                LogStage::Shutdown,
                LogComponent::Main,
                "service_shutdown",
                "服务正常关闭"
            );
        }
        Command::Init { seed } => {
            if seed {
                let summary = seed::seed_sample_data(&db).await?;
                println!("Inserted {} sample rows", summary.total());
            }
            println!("{}", DatabaseSummary::collect(&db).await?);
            println!("Database: {}", config.database.url);
        }
        Command::Summary => {
            println!("{}", DatabaseSummary::collect(&db).await?);
        }
    }

    Ok(())
}

/// 连接数据库并执行迁移
async fn prepare_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let db = database::init_database(&config.database).await?;
    database::run_migrations(&db)
        .await
        .context("数据库迁移失败")?;
    Ok(db)
}

//! # 配置管理器
//!
//! 统一的配置加载接口：TOML 文件 + `QMS_` 前缀环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::AppConfig;
use crate::error::{QmsError, Result};

/// 环境变量覆盖前缀，例如 `QMS_SERVER_PORT`
pub const ENV_PREFIX: &str = "QMS_";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "QMS_CONFIG_PATH";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: Arc<AppConfig>,
    /// 实际加载的配置文件，使用内置默认值时为 `None`
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 路径优先级：`explicit_path`（命令行）> `QMS_CONFIG_PATH` > `config/config.{RUST_ENV}.toml`。
    /// 显式指定的文件必须存在；默认路径不存在时使用内置默认值。
    pub fn new(explicit_path: Option<&Path>) -> Result<Self> {
        let overrides = Self::build_env_overrides();

        let explicit = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        match explicit {
            Some(path) => Self::from_file(&path, &overrides),
            None => {
                let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
                let default_path = PathBuf::from(format!("config/config.{env_name}.toml"));
                if default_path.exists() {
                    Self::from_file(&default_path, &overrides)
                } else {
                    warn!(
                        "配置文件不存在，使用内置默认配置: {}",
                        default_path.display()
                    );
                    Self::from_config(AppConfig::default(), &overrides)
                }
            }
        }
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(path: &Path, overrides: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::load_config_file(path)?;
        Self::apply_env_overrides(&mut config, overrides)?;
        config.validate()?;

        info!(
            "配置加载完成: {} (环境变量覆盖 {} 个)",
            path.display(),
            overrides.len()
        );

        Ok(Self {
            config: Arc::new(config),
            source: Some(path.to_path_buf()),
        })
    }

    /// 从内存中的配置创建（默认配置或测试）
    pub fn from_config(mut config: AppConfig, overrides: &HashMap<String, String>) -> Result<Self> {
        Self::apply_env_overrides(&mut config, overrides)?;
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            source: None,
        })
    }

    /// 获取当前配置
    #[must_use]
    pub fn get_config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// 配置来源文件
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(QmsError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            QmsError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            QmsError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// `QMS_SERVER_PORT` -> `server_port`，`QMS_CONFIG_PATH` 不参与覆盖。
    #[must_use]
    pub fn build_env_overrides() -> HashMap<String, String> {
        Self::collect_overrides(env::vars())
    }

    /// 从任意键值对中挑出覆盖项
    pub fn collect_overrides<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: HashMap<String, String> = vars
            .into_iter()
            .filter(|(key, _)| key != CONFIG_PATH_ENV)
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|config_key| (config_key.to_lowercase(), value))
            })
            .collect();

        debug!("发现 {} 个环境变量覆盖", overrides.len());
        overrides
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            debug!("应用环境变量覆盖: {} = {}", path, value);
            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将环境变量覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let Some((section, key)) = path.split_once('_') else {
            warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            return Ok(());
        };

        match (section, key) {
            ("server", "host") => config.server.host = value.to_string(),
            ("server", "port") => config.server.port = parse_value(path, value)?,
            ("server", "cors_origins") => {
                config.server.cors_origins = value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            ("server", "max_request_size") => {
                config.server.max_request_size = parse_value(path, value)?;
            }
            ("database", "url") => config.database.url = value.to_string(),
            ("database", "max_connections") => {
                config.database.max_connections = parse_value(path, value)?;
            }
            ("database", "connect_timeout") => {
                config.database.connect_timeout = parse_value(path, value)?;
            }
            ("identity", "default_actor_id") => {
                config.identity.default_actor_id = parse_value(path, value)?;
            }
            ("seed", "on_startup") => config.seed.on_startup = parse_value(path, value)?,
            _ => {
                warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            }
        }

        Ok(())
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| {
        QmsError::config_with_source(format!("环境变量覆盖无效: {path} = {value}"), e)
    })
}

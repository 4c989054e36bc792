//! # Pharmaceutical QMS API
//!
//! 质量管理记录后端：偏差、CAPA、环境与工艺监测、批次、报告以及审计日志，
//! 通过 REST 接口提供给前端。

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod management;
pub mod rules;
pub mod seed;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{QmsError, Result};

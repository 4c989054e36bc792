//! # HTTP 接口模块
//!
//! REST 接口：路由、处理器、服务层、提取器与中间件

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use routes::create_routes;
pub use server::{ApiServer, AppState, create_router};

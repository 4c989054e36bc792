//! 应用级共享状态

pub mod context;

pub use context::AppContext;

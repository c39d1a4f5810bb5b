/// 统一错误类型模块
pub mod error;
/// 配置管理模块
pub mod config;
/// 单元测试模块
pub mod tests;

// 重新导出常用类型
pub use error::{AppError, AppResult};
pub use config::{AppConfig, AppSettings, ConfigManager, LoggingConfig};

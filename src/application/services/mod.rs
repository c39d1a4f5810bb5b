/// 应用服务模块

pub mod lifecycle_service;
pub mod query_service;

pub use lifecycle_service::ConformanceOperationalService;
pub use query_service::ConformanceQueryService;

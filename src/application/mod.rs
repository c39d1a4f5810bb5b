/// 应用层模块
///
/// 面向宿主的服务门面：生命周期管理与只读报告查询

pub mod services;

pub use services::{ConformanceOperationalService, ConformanceQueryService};

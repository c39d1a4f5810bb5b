/// 开放元数据一致性测试套件引擎
///
/// 针对一个元数据服务器/平台（被测技术）运行一致性测试工作台，
/// 收集测试结果并提供报告查询。
/// 分层结构：
/// - models: 数据模型（状态、结果、报告、配置）
/// - utils: 错误类型与配置管理
/// - domain: 记分板、工作台、聚合视图、注册表与边界接口
/// - application: 生命周期服务与查询服务

pub mod application;
pub mod domain;
pub mod models;
pub mod utils;

// 重新导出常用类型
pub use application::{ConformanceOperationalService, ConformanceQueryService};
pub use domain::{
    DefaultTestCaseProvider, ServerInstance, ServerInstanceRegistry,
    TechnologyUnderTestWorkPad, Workbench, WorkPad,
};
pub use models::{
    ConformanceStatus, ConformanceSuiteConfig, TestArea, TestCaseResult, TestCaseStatus,
    TestLabReport, TestLabSummary, WorkbenchState,
};
pub use utils::{AppConfig, AppError, AppResult, ConfigManager};

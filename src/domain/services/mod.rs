/// 领域层边界接口模块
///
/// 引擎与外部协作者之间的接口都定义在这里：
/// 被测技术连接器、联盟基础设施、审计日志、测试用例

/// 审计日志接口
pub mod audit_log;
/// 联盟基础设施接口（事件总线、连接器管理器）
pub mod cohort_services;
/// 测试用例接口与提供者
pub mod conformance_test_case;
/// Mock实现
pub mod mocks;
/// 被测技术仓库连接器接口
pub mod repository_connector;

// 重新导出常用类型
pub use audit_log::{AuditSeverity, IAuditLog, LoggerAuditLog};
pub use cohort_services::{
    ICohortEventListener, IConnectorConsumer, IConnectorManager, IEventBusConnector,
    WorkPadCohortListener, WorkPadConnectorConsumer,
};
pub use conformance_test_case::{IConformanceTestCase, ITestCaseProvider, TestCaseContext};
pub use repository_connector::{IConnectorFactory, IRepositoryConnector};

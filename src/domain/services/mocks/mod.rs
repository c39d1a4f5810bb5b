/// Mock服务模块
///
/// 为各边界接口提供手写Mock实现，供单元测试、集成测试和演示运行使用

pub mod mock_cohort_services;
pub mod mock_repository_connector;
pub mod scripted_test_case;

pub use mock_cohort_services::{MockAuditLog, MockConnectorManager, MockEventBusConnector};
pub use mock_repository_connector::{MockConnectorFactory, MockRepositoryConnector};
pub use scripted_test_case::ScriptedTestCase;

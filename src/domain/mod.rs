/// 领域层模块
///
/// 一致性测试引擎的核心：记分板、工作台、聚合视图、
/// 服务器实例注册表以及领域服务接口。

pub mod aggregate_workpad;
pub mod registry;
pub mod services;
pub mod test_cases;
pub mod workbench;
pub mod workpad;

pub use aggregate_workpad::TechnologyUnderTestWorkPad;
pub use registry::{ServerInstance, ServerInstanceRegistry};
pub use test_cases::DefaultTestCaseProvider;
pub use workbench::Workbench;
pub use workpad::WorkPad;

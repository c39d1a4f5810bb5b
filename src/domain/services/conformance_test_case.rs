/// 一致性测试用例接口
///
/// 工作台驱动的最小执行单元。具体测试内容由用例提供者注入；
/// 引擎只约定：每个用例产出一个完整的 TestCaseResult，
/// 执行过程中的错误由工作台捕获并记录为失败结果。

use async_trait::async_trait;
use std::sync::Arc;

use super::repository_connector::IRepositoryConnector;
use crate::models::{ConformanceSuiteConfig, TestArea, TestCaseResult};
use crate::utils::error::AppResult;

/// 测试用例执行上下文
///
/// 携带调用被测技术所需的身份与约束，由工作台在运行时构建
#[derive(Clone)]
pub struct TestCaseContext {
    /// 调用被测技术使用的用户标识
    pub user_id: String,
    /// 分页查询的最大页大小
    pub max_page_size: u32,
    /// 被测技术连接器
    pub connector: Arc<dyn IRepositoryConnector>,
}

/// 一致性测试用例接口
#[async_trait]
pub trait IConformanceTestCase: Send + Sync {
    /// 测试用例标识（一轮运行内唯一）
    fn test_case_id(&self) -> &str;

    /// 测试用例名称
    fn test_case_name(&self) -> &str;

    /// 该用例支撑的能力域名称
    fn profile_names(&self) -> Vec<String>;

    /// 执行测试用例
    ///
    /// 返回完整的测试结果；返回Err时由工作台记录为失败结果，
    /// 不会中断整轮运行
    async fn execute(&self, context: &TestCaseContext) -> AppResult<TestCaseResult>;
}

/// 测试用例提供者接口
///
/// 根据测试区域及其配置构建该工作台要执行的用例序列
pub trait ITestCaseProvider: Send + Sync {
    /// 返回指定测试区域的用例序列（执行顺序即返回顺序）
    fn test_cases_for_area(
        &self,
        area: TestArea,
        config: &ConformanceSuiteConfig,
    ) -> Vec<Arc<dyn IConformanceTestCase>>;
}

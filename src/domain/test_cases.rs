/// 内置一致性测试用例
///
/// 每个测试区域提供一组代表性用例：
/// - 平台区域：来源信息检查
/// - 仓库区域：能力域声明检查、元数据实例分页读取
/// - 性能区域：重复读取计时
/// 用例只通过连接器接口访问被测技术，不关心传输协议。

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::services::{IConformanceTestCase, ITestCaseProvider, TestCaseContext};
use crate::models::{AssertionRecord, ConformanceSuiteConfig, TestArea, TestCaseResult};
use crate::utils::error::AppResult;

/// 已知能力域目录（名称，说明）
pub static PROFILE_CATALOG: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("platform-origin", "平台来源信息"),
        ("metadata-sharing", "元数据共享"),
        ("metadata-maintenance", "元数据维护"),
        ("repository-performance", "仓库性能"),
    ]
});

/// 平台来源检查用例
///
/// 验证被测平台能报告自己的来源信息
pub struct PlatformOriginTestCase;

#[async_trait]
impl IConformanceTestCase for PlatformOriginTestCase {
    fn test_case_id(&self) -> &str {
        "platform-origin-test"
    }

    fn test_case_name(&self) -> &str {
        "平台来源信息检查"
    }

    fn profile_names(&self) -> Vec<String> {
        vec!["platform-origin".to_string()]
    }

    async fn execute(&self, context: &TestCaseContext) -> AppResult<TestCaseResult> {
        let mut result = TestCaseResult::in_progress(
            self.test_case_id(),
            self.test_case_name(),
            self.profile_names(),
        );

        let origin = context.connector.read_origin().await?;
        if origin.is_null() {
            result.add_assertion(AssertionRecord::failed(
                "platform-origin-01",
                "平台返回了空的来源信息",
            ));
        } else {
            result.add_assertion(AssertionRecord::passed(
                "platform-origin-01",
                "平台报告了来源信息",
            ));
            result.add_discovered_property("origin", origin);
        }
        Ok(result.complete())
    }
}

/// 仓库能力域声明用例
///
/// 验证被测仓库能列出自己支持的能力域
pub struct RepositoryProfileDeclarationTestCase;

#[async_trait]
impl IConformanceTestCase for RepositoryProfileDeclarationTestCase {
    fn test_case_id(&self) -> &str {
        "repository-profile-declaration-test"
    }

    fn test_case_name(&self) -> &str {
        "仓库能力域声明检查"
    }

    fn profile_names(&self) -> Vec<String> {
        vec!["metadata-sharing".to_string()]
    }

    async fn execute(&self, context: &TestCaseContext) -> AppResult<TestCaseResult> {
        let mut result = TestCaseResult::in_progress(
            self.test_case_id(),
            self.test_case_name(),
            self.profile_names(),
        );

        let profiles = context.connector.supported_profiles().await?;
        if profiles.is_empty() {
            // 不声明任何能力域不算失败，按不支持处理
            return Ok(result.complete_not_supported("被测仓库未声明任何能力域"));
        }

        result.add_assertion(AssertionRecord::passed(
            "repository-profile-01",
            "被测仓库声明了至少一个能力域",
        ));
        result.add_discovered_property(
            "declared_profiles",
            serde_json::json!(profiles),
        );
        Ok(result.complete())
    }
}

/// 元数据实例读取用例
///
/// 按最大页大小读取指定类型的实例，验证分页约束被遵守
pub struct MetadataInstanceReadTestCase {
    type_name: String,
}

impl MetadataInstanceReadTestCase {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

#[async_trait]
impl IConformanceTestCase for MetadataInstanceReadTestCase {
    fn test_case_id(&self) -> &str {
        "repository-metadata-read-test"
    }

    fn test_case_name(&self) -> &str {
        "元数据实例分页读取检查"
    }

    fn profile_names(&self) -> Vec<String> {
        vec!["metadata-sharing".to_string()]
    }

    async fn execute(&self, context: &TestCaseContext) -> AppResult<TestCaseResult> {
        let mut result = TestCaseResult::in_progress(
            self.test_case_id(),
            self.test_case_name(),
            self.profile_names(),
        );

        let instances = context
            .connector
            .read_metadata_instances(&self.type_name, context.max_page_size)
            .await?;

        if instances.len() as u32 <= context.max_page_size {
            result.add_assertion(AssertionRecord::passed(
                "repository-read-01",
                "返回的实例数量未超过最大页大小",
            ));
        } else {
            result.add_assertion(AssertionRecord::failed(
                "repository-read-01",
                "返回的实例数量超过了最大页大小",
            ));
        }
        result.add_discovered_property(
            "instance_count",
            serde_json::json!(instances.len()),
        );
        Ok(result.complete())
    }
}

/// 仓库读取性能用例
///
/// 重复执行元数据读取并记录耗时统计
pub struct RepositoryReadPerformanceTestCase {
    repetitions: u32,
}

impl RepositoryReadPerformanceTestCase {
    pub fn new(repetitions: u32) -> Self {
        Self { repetitions }
    }
}

#[async_trait]
impl IConformanceTestCase for RepositoryReadPerformanceTestCase {
    fn test_case_id(&self) -> &str {
        "repository-read-performance-test"
    }

    fn test_case_name(&self) -> &str {
        "仓库读取性能测量"
    }

    fn profile_names(&self) -> Vec<String> {
        vec!["repository-performance".to_string()]
    }

    async fn execute(&self, context: &TestCaseContext) -> AppResult<TestCaseResult> {
        let mut result = TestCaseResult::in_progress(
            self.test_case_id(),
            self.test_case_name(),
            self.profile_names(),
        );

        let mut total_ms = 0u128;
        let mut max_ms = 0u128;
        for _ in 0..self.repetitions {
            let started = Instant::now();
            context
                .connector
                .read_metadata_instances("Referenceable", context.max_page_size)
                .await?;
            let elapsed = started.elapsed().as_millis();
            total_ms += elapsed;
            max_ms = max_ms.max(elapsed);
        }

        let avg_ms = if self.repetitions > 0 {
            total_ms as f64 / self.repetitions as f64
        } else {
            0.0
        };

        result.add_assertion(AssertionRecord::passed(
            "performance-read-01",
            "完成了全部重复读取",
        ));
        result.add_discovered_property("repetitions", serde_json::json!(self.repetitions));
        result.add_discovered_property("average_ms", serde_json::json!(avg_ms));
        result.add_discovered_property("max_ms", serde_json::json!(max_ms));
        Ok(result.complete())
    }
}

/// 默认测试用例提供者
///
/// 按测试区域装配内置用例序列
pub struct DefaultTestCaseProvider;

impl ITestCaseProvider for DefaultTestCaseProvider {
    fn test_cases_for_area(
        &self,
        area: TestArea,
        config: &ConformanceSuiteConfig,
    ) -> Vec<Arc<dyn IConformanceTestCase>> {
        match area {
            TestArea::Platform => vec![Arc::new(PlatformOriginTestCase)],
            TestArea::Repository => vec![
                Arc::new(RepositoryProfileDeclarationTestCase),
                Arc::new(MetadataInstanceReadTestCase::new("Referenceable")),
            ],
            TestArea::Performance => {
                let repetitions = config
                    .performance
                    .as_ref()
                    .map(|c| c.repetitions)
                    .unwrap_or(10);
                vec![Arc::new(RepositoryReadPerformanceTestCase::new(repetitions))]
            }
        }
    }
}

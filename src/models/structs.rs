use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{
    AssertionStatus, ConformanceStatus, TestArea, TestCaseStatus, WorkbenchState,
};

/// 生成默认UUID字符串的辅助函数
pub fn default_id() -> String {
    Uuid::new_v4().to_string()
}

/// 断言记录
/// 测试用例内部一条判定的不可变记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionRecord {
    /// 断言标识（用例内唯一）
    pub assertion_id: String,
    /// 断言描述
    pub description: String,
    /// 判定结果
    pub status: AssertionStatus,
}

impl AssertionRecord {
    pub fn passed(assertion_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            assertion_id: assertion_id.into(),
            description: description.into(),
            status: AssertionStatus::Passed,
        }
    }

    pub fn failed(assertion_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            assertion_id: assertion_id.into(),
            description: description.into(),
            status: AssertionStatus::Failed,
        }
    }

    pub fn unknown(assertion_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            assertion_id: assertion_id.into(),
            description: description.into(),
            status: AssertionStatus::Unknown,
        }
    }
}

/// 测试用例结果
///
/// 一个测试用例执行的完整记录：状态、有序断言序列、发现的属性、
/// 所属能力域。由测试用例构建后整体提交到 WorkPad，提交后即为
/// 只读值——终态结果在同一轮运行内不可被覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// 测试用例标识
    pub test_case_id: String,
    /// 测试用例名称
    pub test_case_name: String,
    /// 执行结果状态
    pub status: TestCaseStatus,
    /// 关联的能力域名称（一个用例可以支撑多个能力域）
    pub profile_names: Vec<String>,
    /// 有序断言记录
    pub assertions: Vec<AssertionRecord>,
    /// 测试过程中发现的被测技术属性
    pub discovered_properties: HashMap<String, serde_json::Value>,
    /// 附加消息（失败原因等）
    pub message: Option<String>,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 完成时间（进行中结果为None）
    pub completed_at: Option<DateTime<Utc>>,
}

impl TestCaseResult {
    /// 创建一个进行中（Unknown状态）的测试用例结果
    pub fn in_progress(
        test_case_id: impl Into<String>,
        test_case_name: impl Into<String>,
        profile_names: Vec<String>,
    ) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            test_case_name: test_case_name.into(),
            status: TestCaseStatus::Unknown,
            profile_names,
            assertions: Vec::new(),
            discovered_properties: HashMap::new(),
            message: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// 追加一条断言记录
    pub fn add_assertion(&mut self, assertion: AssertionRecord) {
        self.assertions.push(assertion);
    }

    /// 记录一条发现的被测技术属性
    pub fn add_discovered_property(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) {
        self.discovered_properties.insert(name.into(), value);
    }

    /// 结束用例：根据断言推导最终状态
    ///
    /// 存在失败断言 → Failed；全部通过 → Success；否则保持 Unknown
    pub fn complete(mut self) -> Self {
        let any_failed = self
            .assertions
            .iter()
            .any(|a| a.status == AssertionStatus::Failed);
        let all_passed = !self.assertions.is_empty()
            && self
                .assertions
                .iter()
                .all(|a| a.status == AssertionStatus::Passed);

        self.status = if any_failed {
            TestCaseStatus::Failed
        } else if all_passed {
            TestCaseStatus::Success
        } else {
            TestCaseStatus::Unknown
        };
        self.completed_at = Some(Utc::now());
        self
    }

    /// 结束用例并标记为失败（用于执行过程抛错的用例）
    pub fn complete_failed(mut self, message: impl Into<String>) -> Self {
        self.status = TestCaseStatus::Failed;
        self.message = Some(message.into());
        self.completed_at = Some(Utc::now());
        self
    }

    /// 结束用例并标记为被测技术不支持
    pub fn complete_not_supported(mut self, message: impl Into<String>) -> Self {
        self.status = TestCaseStatus::NotSupported;
        self.message = Some(message.into());
        self.completed_at = Some(Utc::now());
        self
    }
}

/// 能力域（Profile）结果
///
/// 聚合该能力域下所有测试用例的结果；读取时推导，不独立存储
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResult {
    /// 能力域名称
    pub profile_name: String,
    /// 综合一致性结论
    pub conformance_status: ConformanceStatus,
    /// 该能力域下的测试用例标识
    pub test_case_ids: Vec<String>,
    /// 通过的用例数
    pub passed_count: usize,
    /// 失败的用例数
    pub failed_count: usize,
    /// 不支持的用例数
    pub not_supported_count: usize,
    /// 进行中/未知的用例数
    pub unknown_count: usize,
}

impl ProfileResult {
    /// 从该能力域下的测试用例结果推导出聚合结论
    pub fn derive(profile_name: impl Into<String>, results: &[&TestCaseResult]) -> Self {
        let mut passed_count = 0;
        let mut failed_count = 0;
        let mut not_supported_count = 0;
        let mut unknown_count = 0;
        let mut test_case_ids = Vec::with_capacity(results.len());

        for result in results {
            test_case_ids.push(result.test_case_id.clone());
            match result.status {
                TestCaseStatus::Success => passed_count += 1,
                TestCaseStatus::Failed => failed_count += 1,
                TestCaseStatus::NotSupported => not_supported_count += 1,
                TestCaseStatus::Unknown => unknown_count += 1,
            }
        }

        // 结论推导：有失败即不符合；有未完成即无法判定；
        // 全部不支持视为不支持；否则（全部通过）为符合
        let conformance_status = if failed_count > 0 {
            ConformanceStatus::NotConformant
        } else if unknown_count > 0 || results.is_empty() {
            ConformanceStatus::Unknown
        } else if passed_count == 0 && not_supported_count > 0 {
            ConformanceStatus::NotSupported
        } else {
            ConformanceStatus::Conformant
        };

        Self {
            profile_name: profile_name.into(),
            conformance_status,
            test_case_ids,
            passed_count,
            failed_count,
            not_supported_count,
            unknown_count,
        }
    }
}

/// 工作台结果
///
/// 一个工作台的运行状态与用例统计汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchResult {
    /// 工作台标识
    pub workbench_id: String,
    /// 工作台名称
    pub workbench_name: String,
    /// 所属测试区域
    pub test_area: TestArea,
    /// 当前状态
    pub state: WorkbenchState,
    /// 已记录的用例总数
    pub test_case_count: usize,
    /// 通过的用例数
    pub passed_count: usize,
    /// 失败的用例数
    pub failed_count: usize,
    /// 不支持的用例数
    pub not_supported_count: usize,
    /// 进行中/未知的用例数
    pub unknown_count: usize,
    /// 工作台级失败信息（无法启动运行时记录）
    pub failure_message: Option<String>,
    /// 启动时间
    pub started_at: Option<DateTime<Utc>>,
    /// 停止时间
    pub completed_at: Option<DateTime<Utc>>,
}

/// 完整报告中单个工作台的章节：汇总 + 全部用例明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchReportSection {
    /// 工作台汇总
    pub workbench: WorkbenchResult,
    /// 该工作台全部测试用例结果（含断言明细）
    pub test_case_results: Vec<TestCaseResult>,
}

/// 完整一致性测试报告
///
/// 嵌套结构：每个工作台、每个测试用例、每条断言
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestLabReport {
    /// 服务器名称
    pub server_name: String,
    /// 本轮运行标识
    pub run_id: String,
    /// 报告生成时间
    pub generated_at: DateTime<Utc>,
    /// 各工作台章节
    pub workbenches: Vec<WorkbenchReportSection>,
    /// 各能力域聚合结果
    pub profile_results: Vec<ProfileResult>,
}

/// 摘要报告中单个能力域的条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummaryEntry {
    /// 能力域名称
    pub profile_name: String,
    /// 综合一致性结论
    pub conformance_status: ConformanceStatus,
}

/// 一致性测试摘要报告
///
/// 只包含计数和通过率，不含断言明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestLabSummary {
    /// 服务器名称
    pub server_name: String,
    /// 本轮运行标识
    pub run_id: String,
    /// 报告生成时间
    pub generated_at: DateTime<Utc>,
    /// 工作台总数
    pub workbench_count: usize,
    /// 仍在运行的工作台数
    pub running_workbench_count: usize,
    /// 用例总数
    pub test_case_count: usize,
    /// 通过的用例数
    pub passed_count: usize,
    /// 失败的用例数
    pub failed_count: usize,
    /// 不支持的用例数
    pub not_supported_count: usize,
    /// 进行中/未知的用例数
    pub unknown_count: usize,
    /// 通过率（已完成用例中通过的比例，无已完成用例时为0）
    pub pass_ratio: f64,
    /// 各能力域结论
    pub profiles: Vec<ProfileSummaryEntry>,
}

/// 联盟（Cohort）事件
///
/// 主题连接器投递的元数据交换事件，引擎只在边界上消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortEvent {
    /// 事件标识
    #[serde(default = "default_id")]
    pub event_id: String,
    /// 事件来源服务器
    pub source_server: String,
    /// 事件类型标识（由联盟协议定义，引擎不解释）
    pub event_kind: String,
    /// 事件负载
    pub payload: serde_json::Value,
    /// 接收时间
    pub received_at: DateTime<Utc>,
}

impl CohortEvent {
    pub fn new(
        source_server: impl Into<String>,
        event_kind: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: default_id(),
            source_server: source_server.into(),
            event_kind: event_kind.into(),
            payload,
            received_at: Utc::now(),
        }
    }
}

// ==================== 套件配置 ====================

fn default_max_page_size() -> u32 {
    50
}

fn default_connection_timeout_ms() -> u64 {
    5000
}

/// 被测技术目标连接信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConnection {
    /// 被测技术端点URL
    pub endpoint_url: String,
    /// 连接超时（毫秒）
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
}

impl TargetConnection {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            connection_timeout_ms: default_connection_timeout_ms(),
        }
    }
}

/// 平台一致性工作台配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformWorkbenchConfig {
    /// 调用被测技术使用的用户标识
    pub user_id: String,
    /// 调用凭据
    #[serde(default)]
    pub password: String,
    /// 分页查询的最大页大小
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// 被测平台连接信息
    pub target: TargetConnection,
}

/// 仓库一致性工作台配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryWorkbenchConfig {
    /// 调用被测技术使用的用户标识
    pub user_id: String,
    /// 调用凭据
    #[serde(default)]
    pub password: String,
    /// 分页查询的最大页大小
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// 被测仓库连接信息
    pub target: TargetConnection,
    /// 参与元数据读取测试的类型名称
    #[serde(default)]
    pub test_entity_types: Vec<String>,
}

/// 仓库性能工作台配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceWorkbenchConfig {
    /// 调用被测技术使用的用户标识
    pub user_id: String,
    /// 调用凭据
    #[serde(default)]
    pub password: String,
    /// 分页查询的最大页大小
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// 被测仓库连接信息
    pub target: TargetConnection,
    /// 每个性能用例的操作次数
    #[serde(default = "default_performance_repetitions")]
    pub repetitions: u32,
}

fn default_performance_repetitions() -> u32 {
    10
}

/// 一致性测试套件配置
///
/// 每个服务器一份；未配置的测试区域不会创建工作台。
/// 零个启用区域是合法（但无产出）的配置。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConformanceSuiteConfig {
    /// 平台一致性工作台配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformWorkbenchConfig>,
    /// 仓库一致性工作台配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryWorkbenchConfig>,
    /// 仓库性能工作台配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceWorkbenchConfig>,
}

impl ConformanceSuiteConfig {
    /// 按固定启动顺序返回已启用的测试区域
    pub fn enabled_areas(&self) -> Vec<TestArea> {
        let mut areas = Vec::new();
        if self.platform.is_some() {
            areas.push(TestArea::Platform);
        }
        if self.repository.is_some() {
            areas.push(TestArea::Repository);
        }
        if self.performance.is_some() {
            areas.push(TestArea::Performance);
        }
        areas
    }

    /// 是否没有启用任何测试区域
    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.repository.is_none() && self.performance.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_case_result_complete_from_assertions() {
        let mut result =
            TestCaseResult::in_progress("T1", "示例用例", vec!["基础能力".to_string()]);
        result.add_assertion(AssertionRecord::passed("T1-01", "连接可达"));
        result.add_assertion(AssertionRecord::passed("T1-02", "返回元数据"));
        let result = result.complete();
        assert_eq!(result.status, TestCaseStatus::Success);
        assert!(result.completed_at.is_some());

        let mut failed =
            TestCaseResult::in_progress("T2", "失败用例", vec!["基础能力".to_string()]);
        failed.add_assertion(AssertionRecord::passed("T2-01", "连接可达"));
        failed.add_assertion(AssertionRecord::failed("T2-02", "类型不一致"));
        assert_eq!(failed.complete().status, TestCaseStatus::Failed);

        // 没有任何断言时保持Unknown
        let empty = TestCaseResult::in_progress("T3", "空用例", vec![]);
        assert_eq!(empty.complete().status, TestCaseStatus::Unknown);
    }

    #[test]
    fn test_profile_result_derivation() {
        let ok = TestCaseResult::in_progress("T1", "A", vec!["P".to_string()])
            .complete_failed("boom");
        let mut good = TestCaseResult::in_progress("T2", "B", vec!["P".to_string()]);
        good.add_assertion(AssertionRecord::passed("T2-01", "ok"));
        let good = good.complete();

        let profile = ProfileResult::derive("P", &[&ok, &good]);
        assert_eq!(profile.conformance_status, ConformanceStatus::NotConformant);
        assert_eq!(profile.failed_count, 1);
        assert_eq!(profile.passed_count, 1);

        let only_good = ProfileResult::derive("P", &[&good]);
        assert_eq!(only_good.conformance_status, ConformanceStatus::Conformant);

        let none = ProfileResult::derive("P", &[]);
        assert_eq!(none.conformance_status, ConformanceStatus::Unknown);
    }

    #[test]
    fn test_suite_config_enabled_areas_order() {
        let mut config = ConformanceSuiteConfig::default();
        assert!(config.is_empty());
        assert!(config.enabled_areas().is_empty());

        config.performance = Some(PerformanceWorkbenchConfig {
            user_id: "tester".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("local://mock"),
            repetitions: 5,
        });
        config.platform = Some(PlatformWorkbenchConfig {
            user_id: "tester".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("local://mock"),
        });

        // 启动顺序固定：Platform在前
        assert_eq!(
            config.enabled_areas(),
            vec![TestArea::Platform, TestArea::Performance]
        );
    }

    #[test]
    fn test_suite_config_serialization() {
        let json = r#"{
            "repository": {
                "user_id": "conformance",
                "target": { "endpoint_url": "local://mock" }
            }
        }"#;
        let config: ConformanceSuiteConfig = serde_json::from_str(json).unwrap();
        assert!(config.platform.is_none());
        let repo = config.repository.unwrap();
        assert_eq!(repo.max_page_size, 50);
        assert_eq!(repo.target.connection_timeout_ms, 5000);
        assert!(repo.test_entity_types.is_empty());
    }
}

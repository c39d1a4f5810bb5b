/// 工作台记分板（WorkPad）
///
/// 每个工作台独占一个记分板用于写入测试结果；
/// 任意数量的并发查询通过应用层读取同一记分板。
/// 写入纪律：结果整体提交（读者绝不会观察到半写入的结果）；
/// 终态结果在同一轮运行内只追加、不覆盖。

use chrono::{DateTime, Utc};
use log::{trace, warn};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::services::audit_log::IAuditLog;
use crate::models::{
    CohortEvent, TestArea, TestCaseResult, WorkbenchResult, WorkbenchState,
};
use crate::utils::error::{AppError, AppResult};

/// 记分板内部可变状态
///
/// 所有字段在同一把读写锁下整体发布，保证单条结果的原子可见性
struct WorkPadInner {
    /// 工作台状态
    state: WorkbenchState,
    /// 测试用例提交顺序
    test_case_order: Vec<String>,
    /// 测试用例结果（test_case_id → 结果）
    results: HashMap<String, TestCaseResult>,
    /// 已发现的能力域名称
    profile_names: BTreeSet<String>,
    /// 工作台级发现属性（联盟成员、事件计数等）
    workbench_properties: HashMap<String, serde_json::Value>,
    /// 收到的联盟事件计数
    cohort_event_count: u64,
    /// 工作台级失败信息（无法开始运行时记录）
    failure_message: Option<String>,
    /// 启动时间
    started_at: Option<DateTime<Utc>>,
    /// 停止时间
    completed_at: Option<DateTime<Utc>>,
}

/// 工作台记分板
pub struct WorkPad {
    workbench_id: String,
    workbench_name: String,
    test_area: TestArea,
    user_id: String,
    max_page_size: u32,
    audit_log: Arc<dyn IAuditLog>,
    inner: RwLock<WorkPadInner>,
}

impl WorkPad {
    /// 创建新的记分板
    ///
    /// # 参数
    /// * `test_area` - 所属测试区域（决定工作台标识与名称）
    /// * `user_id` - 调用被测技术使用的用户标识
    /// * `max_page_size` - 分页查询的最大页大小
    /// * `audit_log` - 注入的审计日志槽
    pub fn new(
        test_area: TestArea,
        user_id: impl Into<String>,
        max_page_size: u32,
        audit_log: Arc<dyn IAuditLog>,
    ) -> Self {
        Self {
            workbench_id: test_area.workbench_id().to_string(),
            workbench_name: test_area.workbench_name().to_string(),
            test_area,
            user_id: user_id.into(),
            max_page_size,
            audit_log,
            inner: RwLock::new(WorkPadInner {
                state: WorkbenchState::NotStarted,
                test_case_order: Vec::new(),
                results: HashMap::new(),
                profile_names: BTreeSet::new(),
                workbench_properties: HashMap::new(),
                cohort_event_count: 0,
                failure_message: None,
                started_at: None,
                completed_at: None,
            }),
        }
    }

    /// 工作台标识
    pub fn workbench_id(&self) -> &str {
        &self.workbench_id
    }

    /// 工作台名称
    pub fn workbench_name(&self) -> &str {
        &self.workbench_name
    }

    /// 所属测试区域
    pub fn test_area(&self) -> TestArea {
        self.test_area
    }

    /// 调用被测技术使用的用户标识
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// 分页查询的最大页大小
    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// 注入的审计日志槽
    pub fn audit_log(&self) -> Arc<dyn IAuditLog> {
        self.audit_log.clone()
    }

    // ==================== 写入操作（工作台独占） ====================

    /// 提交一条测试用例结果
    ///
    /// 按标识追加语义：
    /// - 新标识：直接提交；
    /// - 已存在且先前结果仍为进行中（Unknown）：允许显式更新；
    /// - 已存在且先前结果为终态：拒绝（不允许静默覆盖终态结果）。
    pub async fn record_result(&self, result: TestCaseResult) -> AppResult<()> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.results.get(&result.test_case_id) {
            if existing.status.is_final() {
                return Err(AppError::state_transition_error(
                    existing.status.to_string(),
                    result.status.to_string(),
                    format!(
                        "测试用例 {} 的终态结果不允许被覆盖",
                        result.test_case_id
                    ),
                ));
            }
        } else {
            inner.test_case_order.push(result.test_case_id.clone());
        }

        for profile_name in &result.profile_names {
            inner.profile_names.insert(profile_name.clone());
        }

        trace!(
            "[WorkPad] {} 提交用例结果: {} -> {}",
            self.workbench_id,
            result.test_case_id,
            result.status
        );
        inner.results.insert(result.test_case_id.clone(), result);
        Ok(())
    }

    /// 工作台状态转换
    ///
    /// 合法转换：NotStarted→Running、Running→Stopping、
    /// Running→Stopped、Stopping→Stopped、NotStarted→Stopped（启动失败）。
    /// Stopped为终态，任何离开终态的转换都会被拒绝。
    pub async fn set_state(&self, new_state: WorkbenchState) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let current = inner.state;

        let allowed = matches!(
            (current, new_state),
            (WorkbenchState::NotStarted, WorkbenchState::Running)
                | (WorkbenchState::Running, WorkbenchState::Stopping)
                | (WorkbenchState::Running, WorkbenchState::Stopped)
                | (WorkbenchState::Stopping, WorkbenchState::Stopped)
                | (WorkbenchState::NotStarted, WorkbenchState::Stopped)
        );

        if !allowed {
            return Err(AppError::state_transition_error(
                current.to_string(),
                new_state.to_string(),
                format!("工作台 {} 不允许该状态转换", self.workbench_id),
            ));
        }

        match new_state {
            WorkbenchState::Running => inner.started_at = Some(Utc::now()),
            WorkbenchState::Stopped => inner.completed_at = Some(Utc::now()),
            _ => {}
        }
        inner.state = new_state;
        trace!(
            "[WorkPad] {} 状态转换: {} -> {}",
            self.workbench_id,
            current,
            new_state
        );
        Ok(())
    }

    /// 记录工作台级启动失败
    ///
    /// 无法开始运行（如被测技术不可达）是该工作台的致命错误：
    /// 直接进入Stopped并保留失败信息供状态查询观察
    pub async fn record_startup_failure(&self, message: impl Into<String>) {
        let message = message.into();
        {
            let mut inner = self.inner.write().await;
            inner.failure_message = Some(message.clone());
            inner.state = WorkbenchState::Stopped;
            inner.completed_at = Some(Utc::now());
        }
        warn!(
            "[WorkPad] {} 启动失败: {}",
            self.workbench_id, message
        );
    }

    /// 记录一条收到的联盟事件
    pub async fn note_cohort_event(&self, event: &CohortEvent) {
        let mut inner = self.inner.write().await;
        inner.cohort_event_count += 1;
        let count = inner.cohort_event_count;
        inner.workbench_properties.insert(
            "cohort_event_count".to_string(),
            serde_json::json!(count),
        );
        inner.workbench_properties.insert(
            "last_cohort_event_kind".to_string(),
            serde_json::json!(event.event_kind),
        );
    }

    /// 记录一个新发现的联盟成员
    pub async fn note_discovered_cohort_member(&self, remote_server_name: &str) {
        let mut inner = self.inner.write().await;
        let members = inner
            .workbench_properties
            .entry("discovered_cohort_members".to_string())
            .or_insert_with(|| serde_json::json!([]));
        if let Some(list) = members.as_array_mut() {
            let value = serde_json::json!(remote_server_name);
            if !list.contains(&value) {
                list.push(value);
            }
        }
    }

    // ==================== 读取操作（并发查询） ====================

    /// 当前工作台状态
    pub async fn state(&self) -> WorkbenchState {
        self.inner.read().await.state
    }

    /// 已发现的能力域名称快照
    pub async fn profile_names(&self) -> BTreeSet<String> {
        self.inner.read().await.profile_names.clone()
    }

    /// 已知测试用例标识（按提交顺序）
    pub async fn test_case_ids(&self) -> Vec<String> {
        self.inner.read().await.test_case_order.clone()
    }

    /// 指定测试用例的结果快照
    pub async fn test_case_report(&self, test_case_id: &str) -> Option<TestCaseResult> {
        self.inner.read().await.results.get(test_case_id).cloned()
    }

    /// 全部测试用例结果快照（按提交顺序）
    pub async fn test_case_results(&self) -> Vec<TestCaseResult> {
        let inner = self.inner.read().await;
        inner
            .test_case_order
            .iter()
            .filter_map(|id| inner.results.get(id))
            .cloned()
            .collect()
    }

    /// 当前状态为失败的全部用例结果
    pub async fn failed_test_case_reports(&self) -> Vec<TestCaseResult> {
        let inner = self.inner.read().await;
        inner
            .test_case_order
            .iter()
            .filter_map(|id| inner.results.get(id))
            .filter(|r| r.status == crate::models::TestCaseStatus::Failed)
            .cloned()
            .collect()
    }

    /// 工作台汇总结果
    pub async fn workbench_result(&self) -> WorkbenchResult {
        let inner = self.inner.read().await;

        let mut passed_count = 0;
        let mut failed_count = 0;
        let mut not_supported_count = 0;
        let mut unknown_count = 0;
        for result in inner.results.values() {
            match result.status {
                crate::models::TestCaseStatus::Success => passed_count += 1,
                crate::models::TestCaseStatus::Failed => failed_count += 1,
                crate::models::TestCaseStatus::NotSupported => not_supported_count += 1,
                crate::models::TestCaseStatus::Unknown => unknown_count += 1,
            }
        }

        WorkbenchResult {
            workbench_id: self.workbench_id.clone(),
            workbench_name: self.workbench_name.clone(),
            test_area: self.test_area,
            state: inner.state,
            test_case_count: inner.results.len(),
            passed_count,
            failed_count,
            not_supported_count,
            unknown_count,
            failure_message: inner.failure_message.clone(),
            started_at: inner.started_at,
            completed_at: inner.completed_at,
        }
    }

    /// 工作台级发现属性快照
    pub async fn workbench_properties(&self) -> HashMap<String, serde_json::Value> {
        self.inner.read().await.workbench_properties.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::audit_log::LoggerAuditLog;
    use crate::models::{AssertionRecord, TestCaseStatus};

    fn make_pad() -> WorkPad {
        WorkPad::new(
            TestArea::Repository,
            "tester",
            50,
            Arc::new(LoggerAuditLog::new("test-server")),
        )
    }

    #[tokio::test]
    async fn test_record_and_read_result() {
        let pad = make_pad();
        let mut result =
            TestCaseResult::in_progress("T1", "读取元数据", vec!["基础读取".to_string()]);
        result.add_assertion(AssertionRecord::passed("T1-01", "返回非空"));
        pad.record_result(result.complete()).await.unwrap();

        assert_eq!(pad.test_case_ids().await, vec!["T1".to_string()]);
        let report = pad.test_case_report("T1").await.unwrap();
        assert_eq!(report.status, TestCaseStatus::Success);
        assert!(pad.profile_names().await.contains("基础读取"));
        assert!(pad.test_case_report("T9").await.is_none());
    }

    /// 终态结果不允许被覆盖；进行中结果允许显式更新
    #[tokio::test]
    async fn test_no_silent_overwrite_of_final_result() {
        let pad = make_pad();

        // 先提交进行中结果，再用终态结果显式更新：允许
        let in_progress = TestCaseResult::in_progress("T1", "用例", vec![]);
        pad.record_result(in_progress.clone()).await.unwrap();
        pad.record_result(in_progress.clone().complete_failed("失败"))
            .await
            .unwrap();

        // 终态结果再次写入：拒绝
        let err = pad
            .record_result(in_progress.complete_failed("重跑"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "STATE_TRANSITION_ERROR");

        // 拒绝写入不影响已提交结果
        let report = pad.test_case_report("T1").await.unwrap();
        assert_eq!(report.status, TestCaseStatus::Failed);
        assert_eq!(report.message.as_deref(), Some("失败"));
    }

    /// 单调可见性：结果一旦可见就不会退回到"未找到"
    #[tokio::test]
    async fn test_monotonic_result_visibility() {
        let pad = make_pad();
        let result = TestCaseResult::in_progress("T1", "用例", vec![]);
        pad.record_result(result.clone()).await.unwrap();
        assert!(pad.test_case_report("T1").await.is_some());

        // 显式更新后依然可见
        pad.record_result(result.complete()).await.unwrap();
        assert!(pad.test_case_report("T1").await.is_some());
    }

    #[tokio::test]
    async fn test_state_machine_transitions() {
        let pad = make_pad();
        assert_eq!(pad.state().await, WorkbenchState::NotStarted);

        pad.set_state(WorkbenchState::Running).await.unwrap();
        pad.set_state(WorkbenchState::Stopping).await.unwrap();
        pad.set_state(WorkbenchState::Stopped).await.unwrap();

        // Stopped为终态
        let err = pad.set_state(WorkbenchState::Running).await.unwrap_err();
        assert_eq!(err.error_code(), "STATE_TRANSITION_ERROR");
    }

    #[tokio::test]
    async fn test_startup_failure_is_observable() {
        let pad = make_pad();
        pad.record_startup_failure("被测技术不可达").await;
        assert_eq!(pad.state().await, WorkbenchState::Stopped);
        let result = pad.workbench_result().await;
        assert_eq!(result.failure_message.as_deref(), Some("被测技术不可达"));
    }

    #[tokio::test]
    async fn test_cohort_bookkeeping() {
        let pad = make_pad();
        let event = CohortEvent::new("remote-1", "NEW_ENTITY", serde_json::json!({}));
        pad.note_cohort_event(&event).await;
        pad.note_cohort_event(&event).await;
        pad.note_discovered_cohort_member("remote-1").await;
        pad.note_discovered_cohort_member("remote-1").await;

        let properties = pad.workbench_properties().await;
        assert_eq!(properties["cohort_event_count"], serde_json::json!(2));
        assert_eq!(
            properties["discovered_cohort_members"],
            serde_json::json!(["remote-1"])
        );
    }
}

/// 被测技术聚合记分板（TechnologyUnderTestWorkPad）
///
/// 把一个服务器的全部工作台记分板组合成统一的查询视图：
/// 能力域 / 测试用例 / 工作台 / 完整报告 / 摘要报告。
/// 不复制底层结果存储；所有读取都是即时快照——
/// 单条结果原子可见，跨工作台不保证全局快照隔离。

use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::workpad::WorkPad;
use crate::models::{
    ProfileResult, ProfileSummaryEntry, TestCaseResult, TestCaseStatus, TestLabReport,
    TestLabSummary, WorkbenchReportSection, WorkbenchResult, WorkbenchState,
};

/// 被测技术聚合记分板
pub struct TechnologyUnderTestWorkPad {
    server_name: String,
    run_id: String,
    work_pads: Vec<Arc<WorkPad>>,
}

impl TechnologyUnderTestWorkPad {
    /// 组合一个服务器的全部工作台记分板
    pub fn new(
        server_name: impl Into<String>,
        run_id: impl Into<String>,
        work_pads: Vec<Arc<WorkPad>>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            run_id: run_id.into(),
            work_pads,
        }
    }

    /// 服务器名称
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// 本轮运行标识
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// 组合的工作台记分板数量
    pub fn workbench_count(&self) -> usize {
        self.work_pads.len()
    }

    /// 所有工作台已发现的能力域名称
    pub async fn profile_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for pad in &self.work_pads {
            names.extend(pad.profile_names().await);
        }
        names
    }

    /// 所有工作台的已知测试用例标识
    pub async fn test_case_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for pad in &self.work_pads {
            ids.extend(pad.test_case_ids().await);
        }
        ids
    }

    /// 指定能力域的聚合结果；未知能力域返回None
    pub async fn profile_report(&self, profile_name: &str) -> Option<ProfileResult> {
        if !self.profile_names().await.contains(profile_name) {
            return None;
        }

        let mut matching: Vec<TestCaseResult> = Vec::new();
        for pad in &self.work_pads {
            for result in pad.test_case_results().await {
                if result.profile_names.iter().any(|p| p == profile_name) {
                    matching.push(result);
                }
            }
        }
        let refs: Vec<&TestCaseResult> = matching.iter().collect();
        Some(ProfileResult::derive(profile_name, &refs))
    }

    /// 指定测试用例的结果；未知标识返回None
    pub async fn test_case_report(&self, test_case_id: &str) -> Option<TestCaseResult> {
        for pad in &self.work_pads {
            if let Some(result) = pad.test_case_report(test_case_id).await {
                return Some(result);
            }
        }
        None
    }

    /// 当前所有状态为失败的用例结果
    pub async fn failed_test_case_reports(&self) -> Vec<TestCaseResult> {
        let mut failed = Vec::new();
        for pad in &self.work_pads {
            failed.extend(pad.failed_test_case_reports().await);
        }
        failed
    }

    /// 指定工作台的汇总结果；未知标识返回None
    pub async fn workbench_report(&self, workbench_id: &str) -> Option<WorkbenchResult> {
        for pad in &self.work_pads {
            if pad.workbench_id() == workbench_id {
                return Some(pad.workbench_result().await);
            }
        }
        None
    }

    /// 指定工作台的状态；未知标识返回None
    pub async fn workbench_status(&self, workbench_id: &str) -> Option<WorkbenchState> {
        for pad in &self.work_pads {
            if pad.workbench_id() == workbench_id {
                return Some(pad.state().await);
            }
        }
        None
    }

    /// 完整报告：每个工作台、每个用例、每条断言
    pub async fn full_report(&self) -> TestLabReport {
        let mut workbenches = Vec::with_capacity(self.work_pads.len());
        let mut results_by_profile: HashMap<String, Vec<TestCaseResult>> = HashMap::new();

        for pad in &self.work_pads {
            let test_case_results = pad.test_case_results().await;
            for result in &test_case_results {
                for profile_name in &result.profile_names {
                    results_by_profile
                        .entry(profile_name.clone())
                        .or_default()
                        .push(result.clone());
                }
            }
            workbenches.push(WorkbenchReportSection {
                workbench: pad.workbench_result().await,
                test_case_results,
            });
        }

        // 能力域结果按名称排序，报告输出保持稳定
        let mut profile_results: Vec<ProfileResult> = results_by_profile
            .into_iter()
            .map(|(name, results)| {
                let refs: Vec<&TestCaseResult> = results.iter().collect();
                ProfileResult::derive(name, &refs)
            })
            .collect();
        profile_results.sort_by(|a, b| a.profile_name.cmp(&b.profile_name));

        TestLabReport {
            server_name: self.server_name.clone(),
            run_id: self.run_id.clone(),
            generated_at: Utc::now(),
            workbenches,
            profile_results,
        }
    }

    /// 摘要报告：只有计数和通过率，不含断言明细
    pub async fn summary_report(&self) -> TestLabSummary {
        let mut workbench_count = 0;
        let mut running_workbench_count = 0;
        let mut test_case_count = 0;
        let mut passed_count = 0;
        let mut failed_count = 0;
        let mut not_supported_count = 0;
        let mut unknown_count = 0;

        for pad in &self.work_pads {
            workbench_count += 1;
            let state = pad.state().await;
            if matches!(state, WorkbenchState::Running | WorkbenchState::Stopping) {
                running_workbench_count += 1;
            }
            for result in pad.test_case_results().await {
                test_case_count += 1;
                match result.status {
                    TestCaseStatus::Success => passed_count += 1,
                    TestCaseStatus::Failed => failed_count += 1,
                    TestCaseStatus::NotSupported => not_supported_count += 1,
                    TestCaseStatus::Unknown => unknown_count += 1,
                }
            }
        }

        let completed = passed_count + failed_count;
        let pass_ratio = if completed > 0 {
            passed_count as f64 / completed as f64
        } else {
            0.0
        };

        let mut profiles = Vec::new();
        for profile_name in self.profile_names().await {
            if let Some(report) = self.profile_report(&profile_name).await {
                profiles.push(ProfileSummaryEntry {
                    profile_name,
                    conformance_status: report.conformance_status,
                });
            }
        }

        TestLabSummary {
            server_name: self.server_name.clone(),
            run_id: self.run_id.clone(),
            generated_at: Utc::now(),
            workbench_count,
            running_workbench_count,
            test_case_count,
            passed_count,
            failed_count,
            not_supported_count,
            unknown_count,
            pass_ratio,
            profiles,
        }
    }
}

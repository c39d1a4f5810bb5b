/// 一致性报告查询服务
///
/// 面向外部调用方的只读查询面。每个操作都遵循同一套校验顺序：
/// 先校验user_id、再校验server_name（都是参数错误），
/// 然后查注册表（未初始化的服务器是服务不可用），
/// 最后把资源缺失映射为未找到错误。

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::registry::{ServerInstance, ServerInstanceRegistry};
use crate::models::{
    ProfileResult, TestCaseResult, TestLabReport, TestLabSummary, WorkbenchResult, WorkbenchState,
};
use crate::utils::error::{AppError, AppResult};

/// 查询服务
pub struct ConformanceQueryService {
    registry: Arc<ServerInstanceRegistry>,
}

impl ConformanceQueryService {
    pub fn new(registry: Arc<ServerInstanceRegistry>) -> Self {
        Self { registry }
    }

    /// 校验调用参数并解析服务器实例
    async fn resolve_instance(
        &self,
        user_id: &str,
        server_name: &str,
    ) -> AppResult<Arc<ServerInstance>> {
        if user_id.trim().is_empty() {
            return Err(AppError::invalid_parameter(
                "user_id",
                "调用者用户标识不能为空",
            ));
        }
        if server_name.trim().is_empty() {
            return Err(AppError::invalid_parameter(
                "server_name",
                "服务器名称不能为空",
            ));
        }
        self.registry
            .get(server_name)
            .await
            .ok_or_else(|| AppError::service_not_initialized(server_name))
    }

    /// 已发现的能力域名称
    pub async fn get_profile_names(
        &self,
        user_id: &str,
        server_name: &str,
    ) -> AppResult<BTreeSet<String>> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        Ok(instance.work_pad.profile_names().await)
    }

    /// 指定能力域的聚合结果
    pub async fn get_profile_report(
        &self,
        user_id: &str,
        server_name: &str,
        profile_name: &str,
    ) -> AppResult<ProfileResult> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        instance
            .work_pad
            .profile_report(profile_name)
            .await
            .ok_or_else(|| {
                AppError::not_found_error(
                    "profile",
                    format!("服务器 {} 没有能力域 {}", server_name, profile_name),
                )
            })
    }

    /// 已知的测试用例标识
    pub async fn get_test_case_ids(
        &self,
        user_id: &str,
        server_name: &str,
    ) -> AppResult<Vec<String>> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        Ok(instance.work_pad.test_case_ids().await)
    }

    /// 指定测试用例的结果
    pub async fn get_test_case_report(
        &self,
        user_id: &str,
        server_name: &str,
        test_case_id: &str,
    ) -> AppResult<TestCaseResult> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        instance
            .work_pad
            .test_case_report(test_case_id)
            .await
            .ok_or_else(|| {
                AppError::not_found_error(
                    "test_case",
                    format!("服务器 {} 没有测试用例 {}", server_name, test_case_id),
                )
            })
    }

    /// 当前所有失败的测试用例结果
    pub async fn get_failed_test_case_reports(
        &self,
        user_id: &str,
        server_name: &str,
    ) -> AppResult<Vec<TestCaseResult>> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        Ok(instance.work_pad.failed_test_case_reports().await)
    }

    /// 指定工作台的汇总结果
    pub async fn get_workbench_report(
        &self,
        user_id: &str,
        server_name: &str,
        workbench_id: &str,
    ) -> AppResult<WorkbenchResult> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        instance
            .work_pad
            .workbench_report(workbench_id)
            .await
            .ok_or_else(|| {
                AppError::not_found_error(
                    "workbench",
                    format!("服务器 {} 没有工作台 {}", server_name, workbench_id),
                )
            })
    }

    /// 指定工作台的当前状态
    pub async fn get_workbench_status(
        &self,
        user_id: &str,
        server_name: &str,
        workbench_id: &str,
    ) -> AppResult<WorkbenchState> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        instance
            .work_pad
            .workbench_status(workbench_id)
            .await
            .ok_or_else(|| {
                AppError::not_found_error(
                    "workbench",
                    format!("服务器 {} 没有工作台 {}", server_name, workbench_id),
                )
            })
    }

    /// 完整一致性报告
    pub async fn get_conformance_report(
        &self,
        user_id: &str,
        server_name: &str,
    ) -> AppResult<TestLabReport> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        Ok(instance.work_pad.full_report().await)
    }

    /// 一致性摘要报告
    pub async fn get_conformance_summary_report(
        &self,
        user_id: &str,
        server_name: &str,
    ) -> AppResult<TestLabSummary> {
        let instance = self.resolve_instance(user_id, server_name).await?;
        Ok(instance.work_pad.summary_report().await)
    }
}

/// 一致性测试工作台
///
/// 独立调度的执行单元：在自己的tokio任务上按顺序驱动测试用例序列，
/// 每个用例完成后先提交结果到记分板再执行下一个。
/// 停止是协作式的：stopRunning只设置取消令牌，
/// 工作台在用例之间的安全检查点观察令牌并退出，已提交的结果不受影响。

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::services::audit_log::{AuditSeverity, IAuditLog};
use crate::domain::services::conformance_test_case::{IConformanceTestCase, TestCaseContext};
use crate::domain::services::repository_connector::IRepositoryConnector;
use crate::domain::workpad::WorkPad;
use crate::models::{TestArea, TestCaseResult, WorkbenchState};
use crate::utils::error::{AppError, AppResult};

/// 一致性测试工作台
pub struct Workbench {
    /// 所属测试区域
    test_area: TestArea,
    /// 独占的记分板
    work_pad: Arc<WorkPad>,
    /// 被测技术连接器
    connector: Arc<dyn IRepositoryConnector>,
    /// 要执行的用例序列
    test_cases: Vec<Arc<dyn IConformanceTestCase>>,
    /// 协作式停止令牌
    cancellation_token: CancellationToken,
    /// 运行任务句柄
    task_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Workbench {
    /// 创建新的工作台
    pub fn new(
        work_pad: Arc<WorkPad>,
        connector: Arc<dyn IRepositoryConnector>,
        test_cases: Vec<Arc<dyn IConformanceTestCase>>,
    ) -> Self {
        Self {
            test_area: work_pad.test_area(),
            work_pad,
            connector,
            test_cases,
            cancellation_token: CancellationToken::new(),
            task_handle: Mutex::new(None),
        }
    }

    /// 工作台标识
    pub fn workbench_id(&self) -> &str {
        self.work_pad.workbench_id()
    }

    /// 所属测试区域
    pub fn test_area(&self) -> TestArea {
        self.test_area
    }

    /// 该工作台的记分板
    pub fn work_pad(&self) -> Arc<WorkPad> {
        self.work_pad.clone()
    }

    /// 当前状态
    pub async fn state(&self) -> WorkbenchState {
        self.work_pad.state().await
    }

    /// 启动工作台
    ///
    /// 只允许从NotStarted启动；测试序列在独立的tokio任务上执行，
    /// 本方法不阻塞调用方。无法开始运行（被测技术探测失败）时
    /// 工作台直接进入Stopped，失败原因通过工作台状态可观察。
    pub async fn start(self: &Arc<Self>) -> AppResult<()> {
        let current = self.work_pad.state().await;
        if current != WorkbenchState::NotStarted {
            return Err(AppError::state_transition_error(
                current.to_string(),
                WorkbenchState::Running.to_string(),
                format!("工作台 {} 已经启动过，不能重复启动", self.workbench_id()),
            ));
        }

        info!(
            "🚀 [Workbench] 启动工作台: {} ({} 个用例)",
            self.workbench_id(),
            self.test_cases.len()
        );

        let workbench = Arc::clone(self);
        let handle = tokio::spawn(async move {
            workbench.run().await;
        });

        let mut task_handle = self.task_handle.lock().await;
        *task_handle = Some(handle);
        Ok(())
    }

    /// 请求停止运行
    ///
    /// 协作式异步信号：设置取消令牌，工作台在下一个安全检查点
    /// （用例之间）退出。对已停止或崩溃的工作台调用是安全的；
    /// 已提交的结果不会被丢弃。
    pub async fn stop_running(&self) {
        self.cancellation_token.cancel();

        // 仅当仍在运行时进入Stopping；其他状态保持不变
        if self.work_pad.state().await == WorkbenchState::Running {
            if let Err(e) = self.work_pad.set_state(WorkbenchState::Stopping).await {
                // 与运行任务自身的状态转换竞争时可能已经Stopped
                debug!(
                    "[Workbench] {} 停止信号与状态转换竞争: {}",
                    self.workbench_id(),
                    e
                );
            }
        }
        info!("[Workbench] 停止信号已发送: {}", self.workbench_id());
    }

    /// 等待工作台运行结束，超时返回false
    ///
    /// 首次调用合并（join）运行任务句柄，保证返回true时
    /// 运行任务已完整结束（包括收尾的审计记录）；
    /// 后续调用以及从未启动的工作台直接依据当前状态判断。
    pub async fn wait_until_stopped(&self, timeout: std::time::Duration) -> bool {
        let handle = self.task_handle.lock().await.take();
        if let Some(handle) = handle {
            if tokio::time::timeout(timeout, handle).await.is_err() {
                return false;
            }
        }
        self.work_pad.state().await == WorkbenchState::Stopped
    }

    /// 执行完整测试序列（运行在独立任务上）
    async fn run(self: Arc<Self>) {
        let audit_log: Arc<dyn IAuditLog> = self.work_pad.audit_log();

        // 先探测被测技术；探测失败是该工作台的致命错误
        if let Err(e) = self.connector.probe().await {
            let message = format!(
                "被测技术探测失败 ({}): {}",
                self.connector.connector_name(),
                e
            );
            error!("[Workbench] {} {}", self.workbench_id(), message);
            audit_log
                .record(AuditSeverity::Error, "workbench-start", &message)
                .await;
            self.work_pad.record_startup_failure(message).await;
            return;
        }

        if let Err(e) = self.work_pad.set_state(WorkbenchState::Running).await {
            // 启动前就收到了停止信号
            warn!(
                "[Workbench] {} 无法进入Running: {}",
                self.workbench_id(),
                e
            );
            return;
        }

        let context = TestCaseContext {
            user_id: self.work_pad.user_id().to_string(),
            max_page_size: self.work_pad.max_page_size(),
            connector: self.connector.clone(),
        };

        let total = self.test_cases.len();
        for (index, test_case) in self.test_cases.iter().enumerate() {
            // 安全检查点：用例之间观察停止信号
            if self.cancellation_token.is_cancelled() {
                info!(
                    "[Workbench] {} 在检查点观察到停止信号 ({}/{} 已执行)",
                    self.workbench_id(),
                    index,
                    total
                );
                break;
            }

            debug!(
                "[Workbench] {} 执行用例 {}/{}: {}",
                self.workbench_id(),
                index + 1,
                total,
                test_case.test_case_id()
            );

            // 先提交进行中结果，保证用例标识尽早可见
            let in_progress = TestCaseResult::in_progress(
                test_case.test_case_id(),
                test_case.test_case_name(),
                test_case.profile_names(),
            );
            if let Err(e) = self.work_pad.record_result(in_progress.clone()).await {
                // 同一轮内用例标识重复属于提供者缺陷，记录并跳过
                warn!(
                    "[Workbench] {} 用例 {} 无法登记: {}",
                    self.workbench_id(),
                    test_case.test_case_id(),
                    e
                );
                continue;
            }

            // 执行用例：单个用例的失败绝不中止整轮运行
            let result = match test_case.execute(&context).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        "[Workbench] {} 用例执行出错: {} - {}",
                        self.workbench_id(),
                        test_case.test_case_id(),
                        e
                    );
                    audit_log
                        .record(
                            AuditSeverity::Warning,
                            "test-case",
                            &format!("用例 {} 执行出错: {}", test_case.test_case_id(), e),
                        )
                        .await;
                    in_progress.complete_failed(format!("执行失败: {}", e))
                }
            };

            // 结果在下一个用例开始前提交（先提交后可见的顺序保证）
            if let Err(e) = self.work_pad.record_result(result).await {
                warn!(
                    "[Workbench] {} 提交用例结果失败: {} - {}",
                    self.workbench_id(),
                    test_case.test_case_id(),
                    e
                );
            }
        }

        if let Err(e) = self.work_pad.set_state(WorkbenchState::Stopped).await {
            warn!(
                "[Workbench] {} 无法进入Stopped: {}",
                self.workbench_id(),
                e
            );
        }

        let status_icon = if self.cancellation_token.is_cancelled() {
            "⏹"
        } else {
            "✅"
        };
        info!(
            "{} [Workbench] 工作台运行结束: {}",
            status_icon,
            self.workbench_id()
        );
        audit_log
            .record(
                AuditSeverity::Info,
                "workbench-stop",
                &format!("工作台 {} 运行结束", self.workbench_id()),
            )
            .await;
    }
}

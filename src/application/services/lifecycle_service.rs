/// 一致性套件生命周期服务
///
/// 管理单个一致性测试服务器实例的启动与关闭：
/// initialize 校验前置条件、装配记分板与工作台并整体发布实例，
/// terminate 协作停止全部工作台、断开联盟主题并移除实例。

use log::{error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::aggregate_workpad::TechnologyUnderTestWorkPad;
use crate::domain::registry::{ServerInstance, ServerInstanceRegistry};
use crate::domain::services::{
    AuditSeverity, IAuditLog, IConnectorFactory, IConnectorManager, IEventBusConnector,
    ITestCaseProvider, WorkPadCohortListener, WorkPadConnectorConsumer,
};
use crate::domain::workbench::Workbench;
use crate::domain::workpad::WorkPad;
use crate::models::{ConformanceSuiteConfig, TestArea};
use crate::utils::error::{AppError, AppResult};

/// 生命周期服务
pub struct ConformanceOperationalService {
    registry: Arc<ServerInstanceRegistry>,
    test_case_provider: Arc<dyn ITestCaseProvider>,
    connector_factory: Arc<dyn IConnectorFactory>,
}

impl ConformanceOperationalService {
    pub fn new(
        registry: Arc<ServerInstanceRegistry>,
        test_case_provider: Arc<dyn ITestCaseProvider>,
        connector_factory: Arc<dyn IConnectorFactory>,
    ) -> Self {
        Self {
            registry,
            test_case_provider,
            connector_factory,
        }
    }

    /// 初始化一致性测试服务器实例
    ///
    /// 前置条件：联盟主题连接与连接器管理器都已提供，且企业级访问已启用。
    /// 任一前置条件不满足时返回配置错误并写审计，不发布任何实例。
    /// 所有工作台宣告启动后才把实例整体发布到注册表；
    /// 在那之前查询方观察不到该服务器。
    /// 装配中途失败时，已启动的工作台被停掉、已注册的联盟监听器被断开，
    /// 然后才返回错误（失败的实例永远不会被发布）。
    pub async fn initialize(
        &self,
        server_name: &str,
        config: ConformanceSuiteConfig,
        event_bus: Option<Arc<dyn IEventBusConnector>>,
        connector_manager: Option<Arc<dyn IConnectorManager>>,
        audit_log: Arc<dyn IAuditLog>,
    ) -> AppResult<()> {
        info!("🚀 [Lifecycle] 初始化一致性测试服务器: {}", server_name);

        // 前置条件逐项校验，每种缺失产生可区分的配置错误
        let event_bus = match event_bus {
            Some(bus) => bus,
            None => {
                let err = AppError::configuration_error(format!(
                    "服务器 {} 缺少联盟主题连接，无法接入同侪群",
                    server_name
                ));
                self.record_init_failure(&audit_log, server_name, &err).await;
                return Err(err);
            }
        };
        let connector_manager = match connector_manager {
            Some(manager) => manager,
            None => {
                let err = AppError::configuration_error(format!(
                    "服务器 {} 缺少连接器管理器，无法发现联盟成员",
                    server_name
                ));
                self.record_init_failure(&audit_log, server_name, &err).await;
                return Err(err);
            }
        };
        if !connector_manager.is_enterprise_access_enabled() {
            let err = AppError::configuration_error(format!(
                "服务器 {} 的企业级访问未启用，一致性测试需要跨联盟访问",
                server_name
            ));
            self.record_init_failure(&audit_log, server_name, &err).await;
            return Err(err);
        }

        let enabled_areas = config.enabled_areas();
        if enabled_areas.is_empty() {
            // 合法但无事可做：发布空实例，所有查询返回空报告
            warn!(
                "[Lifecycle] 服务器 {} 未配置任何测试区域，发布空实例",
                server_name
            );
        }

        // 逐区域装配记分板与工作台；任一区域失败都回收已启动的部分，
        // 绝不留下无人持有的半启动引擎
        let mut work_pads = Vec::with_capacity(enabled_areas.len());
        let mut workbenches = Vec::with_capacity(enabled_areas.len());
        for area in &enabled_areas {
            match self
                .start_area(*area, &config, &event_bus, &connector_manager, &audit_log)
                .await
            {
                Ok((work_pad, workbench)) => {
                    work_pads.push(work_pad);
                    workbenches.push(workbench);
                }
                Err(e) => {
                    self.rollback_partial_start(server_name, &workbenches, &event_bus)
                        .await;
                    self.record_init_failure(&audit_log, server_name, &e).await;
                    return Err(e);
                }
            }
        }

        let run_id = Uuid::new_v4().to_string();
        let instance = Arc::new(ServerInstance {
            server_name: server_name.to_string(),
            work_pad: Arc::new(TechnologyUnderTestWorkPad::new(
                server_name,
                run_id,
                work_pads,
            )),
            workbenches,
            audit_log: audit_log.clone(),
            config,
            event_bus,
        });

        // 实例一次性整体发布，查询方看不到装配过程
        self.registry.put(instance).await;

        audit_log
            .record(
                AuditSeverity::Info,
                "initialize",
                &format!(
                    "一致性测试服务器 {} 初始化完成 ({} 个工作台)",
                    server_name,
                    enabled_areas.len()
                ),
            )
            .await;
        info!("✅ [Lifecycle] 服务器 {} 初始化完成", server_name);
        Ok(())
    }

    /// 关闭一致性测试服务器实例
    ///
    /// 对不存在的服务器是无操作成功（幂等）。
    /// 按顺序：发停止信号给全部工作台、等待它们停下、
    /// 断开联盟主题、从注册表移除实例。
    /// permanent标记当前仅影响审计内容；已收集的结果随实例一起丢弃。
    pub async fn terminate(&self, server_name: &str, permanent: bool) -> AppResult<()> {
        let instance = match self.registry.get(server_name).await {
            Some(instance) => instance,
            None => {
                info!(
                    "[Lifecycle] 服务器 {} 不存在或已关闭，terminate无操作",
                    server_name
                );
                return Ok(());
            }
        };

        info!(
            "[Lifecycle] 关闭一致性测试服务器: {} (permanent={})",
            server_name, permanent
        );

        for workbench in &instance.workbenches {
            workbench.stop_running().await;
        }
        for workbench in &instance.workbenches {
            if !workbench
                .wait_until_stopped(std::time::Duration::from_secs(10))
                .await
            {
                warn!(
                    "[Lifecycle] 工作台 {} 未在限期内停止",
                    workbench.workbench_id()
                );
            }
        }

        if let Err(e) = instance.event_bus.disconnect().await {
            // 断开失败不阻止实例移除
            error!(
                "[Lifecycle] 服务器 {} 断开联盟主题失败: {}",
                server_name, e
            );
        }

        self.registry.remove(server_name).await;

        instance
            .audit_log
            .record(
                AuditSeverity::Info,
                "terminate",
                &format!(
                    "一致性测试服务器 {} 已关闭 (permanent={})",
                    server_name, permanent
                ),
            )
            .await;
        info!("✅ [Lifecycle] 服务器 {} 已关闭", server_name);
        Ok(())
    }

    /// 装配并启动单个测试区域的工作台
    ///
    /// 先创建连接器：连接器创建失败时该区域还没有留下任何注册。
    /// 消费联盟事件的区域在工作台宣告启动前完成监听器与消费者注册。
    async fn start_area(
        &self,
        area: TestArea,
        config: &ConformanceSuiteConfig,
        event_bus: &Arc<dyn IEventBusConnector>,
        connector_manager: &Arc<dyn IConnectorManager>,
        audit_log: &Arc<dyn IAuditLog>,
    ) -> AppResult<(Arc<WorkPad>, Arc<Workbench>)> {
        let (user_id, max_page_size, target) = match area {
            TestArea::Platform => {
                let c = config
                    .platform
                    .as_ref()
                    .ok_or_else(|| AppError::configuration_error("平台工作台配置缺失"))?;
                (c.user_id.clone(), c.max_page_size, c.target.clone())
            }
            TestArea::Repository => {
                let c = config
                    .repository
                    .as_ref()
                    .ok_or_else(|| AppError::configuration_error("仓库工作台配置缺失"))?;
                (c.user_id.clone(), c.max_page_size, c.target.clone())
            }
            TestArea::Performance => {
                let c = config
                    .performance
                    .as_ref()
                    .ok_or_else(|| AppError::configuration_error("性能工作台配置缺失"))?;
                (c.user_id.clone(), c.max_page_size, c.target.clone())
            }
        };

        let connector = self.connector_factory.create_connector(&target)?;
        let work_pad = Arc::new(WorkPad::new(area, user_id, max_page_size, audit_log.clone()));

        if area.consumes_cohort_events() {
            event_bus
                .register_listener(Arc::new(WorkPadCohortListener::new(work_pad.clone())))
                .await?;
            connector_manager
                .register_consumer(Arc::new(WorkPadConnectorConsumer::new(work_pad.clone())))
                .await?;
        }

        let test_cases = self.test_case_provider.test_cases_for_area(area, config);
        let workbench = Arc::new(Workbench::new(work_pad.clone(), connector, test_cases));
        workbench.start().await?;
        Ok((work_pad, workbench))
    }

    /// 回收中途失败的initialize已启动的部分
    ///
    /// 失败的实例不会被发布，terminate无从触达这些工作台；
    /// 必须在返回错误前停掉它们并断开已注册的联盟监听器
    async fn rollback_partial_start(
        &self,
        server_name: &str,
        workbenches: &[Arc<Workbench>],
        event_bus: &Arc<dyn IEventBusConnector>,
    ) {
        if !workbenches.is_empty() {
            warn!(
                "[Lifecycle] 服务器 {} 初始化中途失败，回收 {} 个已启动的工作台",
                server_name,
                workbenches.len()
            );
        }
        for workbench in workbenches {
            workbench.stop_running().await;
        }
        for workbench in workbenches {
            if !workbench
                .wait_until_stopped(std::time::Duration::from_secs(10))
                .await
            {
                warn!(
                    "[Lifecycle] 工作台 {} 未在限期内停止",
                    workbench.workbench_id()
                );
            }
        }
        if let Err(e) = event_bus.disconnect().await {
            error!(
                "[Lifecycle] 服务器 {} 回收时断开联盟主题失败: {}",
                server_name, e
            );
        }
    }

    async fn record_init_failure(
        &self,
        audit_log: &Arc<dyn IAuditLog>,
        server_name: &str,
        err: &AppError,
    ) {
        error!("❌ [Lifecycle] 服务器 {} 初始化失败: {}", server_name, err);
        audit_log
            .record(AuditSeverity::Error, "initialize", &err.to_string())
            .await;
    }
}

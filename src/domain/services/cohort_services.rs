/// 联盟（Cohort）基础设施边界接口
///
/// 引擎对事件总线与跨联盟连接器管理器的义务仅限于：
/// 在工作台宣告启动前完成注册，在terminate时注销/断开。
/// 事件的传输与远端仓库的发现机制属于外部协作者。

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::repository_connector::IRepositoryConnector;
use crate::domain::workpad::WorkPad;
use crate::models::CohortEvent;
use crate::utils::error::AppResult;

/// 联盟事件监听器接口
///
/// 每个消费联盟事件的工作台注册一个监听器
#[async_trait]
pub trait ICohortEventListener: Send + Sync {
    /// 处理一条联盟事件
    async fn process_event(&self, event: CohortEvent);
}

/// 联盟主题连接器（事件总线）接口
#[async_trait]
pub trait IEventBusConnector: Send + Sync {
    /// 联盟主题名称
    fn topic_name(&self) -> &str;

    /// 注册事件监听器
    async fn register_listener(&self, listener: Arc<dyn ICohortEventListener>) -> AppResult<()>;

    /// 断开主题连接并注销所有监听器
    async fn disconnect(&self) -> AppResult<()>;
}

/// 连接器消费者接口
///
/// 联盟中发现新的远端仓库时，连接器管理器把连接器交给消费者
#[async_trait]
pub trait IConnectorConsumer: Send + Sync {
    /// 消费一个新发现的远端仓库连接器
    async fn consume_discovered_connector(
        &self,
        remote_server_name: &str,
        connector: Arc<dyn IRepositoryConnector>,
    );
}

/// 跨联盟连接器管理器接口
#[async_trait]
pub trait IConnectorManager: Send + Sync {
    /// 企业级（跨联盟）访问是否启用
    ///
    /// initialize的前置条件之一；未启用时引擎拒绝启动
    fn is_enterprise_access_enabled(&self) -> bool;

    /// 注册连接器消费者
    async fn register_consumer(&self, consumer: Arc<dyn IConnectorConsumer>) -> AppResult<()>;
}

/// 作用域限定到单个WorkPad的联盟事件监听器
///
/// 把收到的事件计入对应工作台的记分板，供报告查询观察测试进展
pub struct WorkPadCohortListener {
    work_pad: Arc<WorkPad>,
}

impl WorkPadCohortListener {
    pub fn new(work_pad: Arc<WorkPad>) -> Self {
        Self { work_pad }
    }
}

#[async_trait]
impl ICohortEventListener for WorkPadCohortListener {
    async fn process_event(&self, event: CohortEvent) {
        debug!(
            "[CohortListener] 工作台 {} 收到联盟事件: {} 来自 {}",
            self.work_pad.workbench_id(),
            event.event_kind,
            event.source_server
        );
        self.work_pad.note_cohort_event(&event).await;
    }
}

/// 作用域限定到单个WorkPad的连接器消费者
///
/// 把新发现的联盟成员记入对应工作台的记分板
pub struct WorkPadConnectorConsumer {
    work_pad: Arc<WorkPad>,
}

impl WorkPadConnectorConsumer {
    pub fn new(work_pad: Arc<WorkPad>) -> Self {
        Self { work_pad }
    }
}

#[async_trait]
impl IConnectorConsumer for WorkPadConnectorConsumer {
    async fn consume_discovered_connector(
        &self,
        remote_server_name: &str,
        connector: Arc<dyn IRepositoryConnector>,
    ) {
        debug!(
            "[ConnectorConsumer] 工作台 {} 发现联盟成员: {} ({})",
            self.work_pad.workbench_id(),
            remote_server_name,
            connector.connector_name()
        );
        self.work_pad
            .note_discovered_cohort_member(remote_server_name)
            .await;
    }
}

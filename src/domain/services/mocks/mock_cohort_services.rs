use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::services::audit_log::{AuditSeverity, IAuditLog};
use crate::domain::services::cohort_services::{
    ICohortEventListener, IConnectorConsumer, IConnectorManager, IEventBusConnector,
};
use crate::domain::services::repository_connector::IRepositoryConnector;
use crate::models::CohortEvent;
use crate::utils::error::AppResult;

/// Mock联盟主题连接器（事件总线）
///
/// 把注册的监听器保存在内存里，测试可以手动投递事件
pub struct MockEventBusConnector {
    topic_name: String,
    listeners: RwLock<Vec<Arc<dyn ICohortEventListener>>>,
    disconnected: RwLock<bool>,
}

impl MockEventBusConnector {
    pub fn new(topic_name: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            listeners: RwLock::new(Vec::new()),
            disconnected: RwLock::new(false),
        }
    }

    /// 当前注册的监听器数量
    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// 是否已断开
    pub async fn is_disconnected(&self) -> bool {
        *self.disconnected.read().await
    }

    /// 向所有注册的监听器投递一条事件
    pub async fn deliver(&self, event: CohortEvent) {
        let listeners = self.listeners.read().await.clone();
        for listener in listeners {
            listener.process_event(event.clone()).await;
        }
    }
}

#[async_trait]
impl IEventBusConnector for MockEventBusConnector {
    fn topic_name(&self) -> &str {
        &self.topic_name
    }

    async fn register_listener(
        &self,
        listener: Arc<dyn ICohortEventListener>,
    ) -> AppResult<()> {
        self.listeners.write().await.push(listener);
        Ok(())
    }

    async fn disconnect(&self) -> AppResult<()> {
        self.listeners.write().await.clear();
        *self.disconnected.write().await = true;
        Ok(())
    }
}

/// Mock跨联盟连接器管理器
///
/// 企业级访问开关可配置；测试可以手动宣告发现新的联盟成员
pub struct MockConnectorManager {
    enterprise_access_enabled: bool,
    consumers: RwLock<Vec<Arc<dyn IConnectorConsumer>>>,
}

impl MockConnectorManager {
    pub fn new(enterprise_access_enabled: bool) -> Self {
        Self {
            enterprise_access_enabled,
            consumers: RwLock::new(Vec::new()),
        }
    }

    /// 当前注册的消费者数量
    pub async fn consumer_count(&self) -> usize {
        self.consumers.read().await.len()
    }

    /// 向所有消费者宣告发现了一个新的联盟成员
    pub async fn announce_discovered_connector(
        &self,
        remote_server_name: &str,
        connector: Arc<dyn IRepositoryConnector>,
    ) {
        let consumers = self.consumers.read().await.clone();
        for consumer in consumers {
            consumer
                .consume_discovered_connector(remote_server_name, connector.clone())
                .await;
        }
    }
}

#[async_trait]
impl IConnectorManager for MockConnectorManager {
    fn is_enterprise_access_enabled(&self) -> bool {
        self.enterprise_access_enabled
    }

    async fn register_consumer(&self, consumer: Arc<dyn IConnectorConsumer>) -> AppResult<()> {
        self.consumers.write().await.push(consumer);
        Ok(())
    }
}

/// Mock审计日志
///
/// 把审计记录收集到内存，测试可以断言记录内容
#[derive(Default)]
pub struct MockAuditLog {
    records: RwLock<Vec<(AuditSeverity, String, String)>>,
}

impl MockAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部审计记录快照
    pub async fn records(&self) -> Vec<(AuditSeverity, String, String)> {
        self.records.read().await.clone()
    }

    /// 指定动作的记录数量
    pub async fn count_for_action(&self, action: &str) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|(_, a, _)| a == action)
            .count()
    }
}

#[async_trait]
impl IAuditLog for MockAuditLog {
    async fn record(&self, severity: AuditSeverity, action: &str, description: &str) {
        self.records
            .write()
            .await
            .push((severity, action.to_string(), description.to_string()));
    }
}

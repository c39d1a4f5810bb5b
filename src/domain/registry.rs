/// 服务器实例注册表
///
/// 保存所有已初始化的一致性测试服务器实例，
/// 生命周期服务负责写入，查询服务只读。
/// 实例一次性整体发布：查询方要么看不到实例，
/// 要么看到包含记分板和全部工作台的完整实例。

use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::aggregate_workpad::TechnologyUnderTestWorkPad;
use crate::domain::services::{IAuditLog, IEventBusConnector};
use crate::domain::workbench::Workbench;
use crate::models::ConformanceSuiteConfig;

/// 一个已初始化服务器的全部运行时部件
pub struct ServerInstance {
    /// 服务器名称（注册表键）
    pub server_name: String,
    /// 聚合记分板
    pub work_pad: Arc<TechnologyUnderTestWorkPad>,
    /// 本实例启动的全部工作台
    pub workbenches: Vec<Arc<Workbench>>,
    /// 审计日志
    pub audit_log: Arc<dyn IAuditLog>,
    /// 初始化时使用的套件配置
    pub config: ConformanceSuiteConfig,
    /// 同侪群事件总线连接
    pub event_bus: Arc<dyn IEventBusConnector>,
}

/// 服务器实例注册表
pub struct ServerInstanceRegistry {
    instances: RwLock<HashMap<String, Arc<ServerInstance>>>,
}

impl ServerInstanceRegistry {
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// 发布一个完整的服务器实例；同名实例被整体替换
    pub async fn put(&self, instance: Arc<ServerInstance>) {
        let server_name = instance.server_name.clone();
        let mut instances = self.instances.write().await;
        if instances.insert(server_name.clone(), instance).is_some() {
            info!("[Registry] 服务器实例被替换: {}", server_name);
        } else {
            info!("[Registry] 服务器实例已发布: {}", server_name);
        }
    }

    /// 按名称查找实例
    pub async fn get(&self, server_name: &str) -> Option<Arc<ServerInstance>> {
        let instances = self.instances.read().await;
        instances.get(server_name).cloned()
    }

    /// 移除实例并返回它；不存在时返回None（幂等）
    pub async fn remove(&self, server_name: &str) -> Option<Arc<ServerInstance>> {
        let mut instances = self.instances.write().await;
        let removed = instances.remove(server_name);
        if removed.is_some() {
            info!("[Registry] 服务器实例已移除: {}", server_name);
        }
        removed
    }

    /// 当前已注册的服务器名称
    pub async fn server_names(&self) -> Vec<String> {
        let instances = self.instances.read().await;
        instances.keys().cloned().collect()
    }
}

impl Default for ServerInstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

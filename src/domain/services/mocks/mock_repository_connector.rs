use async_trait::async_trait;
use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::services::repository_connector::{IConnectorFactory, IRepositoryConnector};
use crate::models::TargetConnection;
use crate::utils::error::{AppError, AppResult};

/// Mock被测技术仓库连接器
///
/// 模拟一个可配置的被测元数据仓库：可达性、响应延迟、
/// 声明支持的能力域都可以脚本化，用于单元测试和演示运行
pub struct MockRepositoryConnector {
    name: String,
    reachable: bool,
    /// 模拟的响应延迟区间（毫秒）
    max_latency_ms: u64,
    /// 声明支持的能力域
    profiles: Vec<String>,
}

impl MockRepositoryConnector {
    /// 创建一个可达的Mock仓库
    pub fn reachable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reachable: true,
            max_latency_ms: 0,
            profiles: vec!["元数据读取".to_string(), "实体生命周期".to_string()],
        }
    }

    /// 创建一个不可达的Mock仓库（探测永远失败）
    pub fn unreachable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reachable: false,
            max_latency_ms: 0,
            profiles: Vec::new(),
        }
    }

    /// 设置模拟响应延迟上限
    pub fn with_latency(mut self, max_latency_ms: u64) -> Self {
        self.max_latency_ms = max_latency_ms;
        self
    }

    /// 设置声明支持的能力域
    pub fn with_profiles(mut self, profiles: Vec<String>) -> Self {
        self.profiles = profiles;
        self
    }

    /// 模拟网络延迟
    async fn simulate_latency(&self) {
        if self.max_latency_ms > 0 {
            let delay = rand::thread_rng().gen_range(0..=self.max_latency_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[async_trait]
impl IRepositoryConnector for MockRepositoryConnector {
    fn connector_name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> AppResult<()> {
        self.simulate_latency().await;
        if self.reachable {
            Ok(())
        } else {
            Err(AppError::generic(format!(
                "Mock仓库 {} 不可达",
                self.name
            )))
        }
    }

    async fn read_origin(&self) -> AppResult<serde_json::Value> {
        self.simulate_latency().await;
        if !self.reachable {
            return Err(AppError::generic(format!("Mock仓库 {} 不可达", self.name)));
        }
        Ok(serde_json::json!({
            "vendor": "MockMetadata",
            "version": "1.0.0",
            "server": self.name,
        }))
    }

    async fn read_metadata_instances(
        &self,
        type_name: &str,
        max_page_size: u32,
    ) -> AppResult<Vec<serde_json::Value>> {
        self.simulate_latency().await;
        if !self.reachable {
            return Err(AppError::generic(format!("Mock仓库 {} 不可达", self.name)));
        }
        // 返回不超过页大小上限的模拟实例
        let count = std::cmp::min(3, max_page_size) as usize;
        Ok((0..count)
            .map(|i| {
                serde_json::json!({
                    "type": type_name,
                    "guid": format!("{}-{}", type_name.to_lowercase(), i),
                })
            })
            .collect())
    }

    async fn supported_profiles(&self) -> AppResult<Vec<String>> {
        self.simulate_latency().await;
        if !self.reachable {
            return Err(AppError::generic(format!("Mock仓库 {} 不可达", self.name)));
        }
        Ok(self.profiles.clone())
    }
}

/// Mock连接器工厂
///
/// 为每个连接目标返回同一类Mock连接器；
/// 可配置为产出不可达连接器（启动失败场景），
/// 或在创建若干连接器后开始失败（装配中途失败场景）
pub struct MockConnectorFactory {
    reachable: bool,
    fail_after: Option<u32>,
    created: AtomicU32,
}

impl MockConnectorFactory {
    pub fn new() -> Self {
        Self {
            reachable: true,
            fail_after: None,
            created: AtomicU32::new(0),
        }
    }

    /// 产出的连接器探测永远失败
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            fail_after: None,
            created: AtomicU32::new(0),
        }
    }

    /// 成功创建指定数量的连接器后开始失败
    pub fn failing_after(successful_creations: u32) -> Self {
        Self {
            reachable: true,
            fail_after: Some(successful_creations),
            created: AtomicU32::new(0),
        }
    }
}

impl Default for MockConnectorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl IConnectorFactory for MockConnectorFactory {
    fn create_connector(
        &self,
        target: &TargetConnection,
    ) -> AppResult<Arc<dyn IRepositoryConnector>> {
        let created = self.created.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if created >= limit {
                return Err(AppError::configuration_error(format!(
                    "无法为 {} 创建连接器",
                    target.endpoint_url
                )));
            }
        }
        let connector = if self.reachable {
            MockRepositoryConnector::reachable(target.endpoint_url.clone())
        } else {
            MockRepositoryConnector::unreachable(target.endpoint_url.clone())
        };
        Ok(Arc::new(connector))
    }
}

/// 被测技术仓库连接器接口
///
/// 测试用例通过该接口访问被测的元数据仓库/平台。
/// 连接器本身（OMRS协议、传输细节）不属于引擎实现范围，
/// 引擎只依赖这里声明的边界操作。

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::TargetConnection;
use crate::utils::error::AppResult;

/// 被测技术仓库连接器接口
#[async_trait]
pub trait IRepositoryConnector: Send + Sync {
    /// 连接器名称（用于日志与审计）
    fn connector_name(&self) -> &str;

    /// 探测被测技术是否可达
    ///
    /// 工作台在执行测试序列前调用；失败意味着该工作台无法开始运行
    async fn probe(&self) -> AppResult<()>;

    /// 读取被测技术的来源信息（厂商、版本等）
    async fn read_origin(&self) -> AppResult<serde_json::Value>;

    /// 按类型名称读取元数据实例，受最大页大小约束
    async fn read_metadata_instances(
        &self,
        type_name: &str,
        max_page_size: u32,
    ) -> AppResult<Vec<serde_json::Value>>;

    /// 列出被测技术声明支持的能力域名称
    async fn supported_profiles(&self) -> AppResult<Vec<String>>;
}

/// 仓库连接器工厂接口
///
/// 生命周期服务按工作台配置里的连接信息创建连接器；
/// 具体的连接器实现（协议、传输）由宿主注入
pub trait IConnectorFactory: Send + Sync {
    /// 为指定连接目标创建连接器
    fn create_connector(
        &self,
        target: &TargetConnection,
    ) -> AppResult<Arc<dyn IRepositoryConnector>>;
}

/// 审计日志接口
///
/// 引擎通过注入的审计日志槽输出生命周期与错误审计记录
/// （启动、关闭、配置错误）；单条审计记录的最终格式不属于引擎职责

use async_trait::async_trait;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

/// 审计记录严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditSeverity {
    /// 常规生命周期记录
    Info,
    /// 预期内异常（单个用例/工作台失败）
    Warning,
    /// 致命错误（配置错误、启动失败）
    Error,
}

/// 审计日志接口
#[async_trait]
pub trait IAuditLog: Send + Sync {
    /// 记录一条审计信息
    ///
    /// # 参数
    /// * `severity` - 严重级别
    /// * `action` - 动作标识（如 "initialize", "terminate"）
    /// * `description` - 记录内容
    async fn record(&self, severity: AuditSeverity, action: &str, description: &str);
}

/// 基于log门面的审计日志实现
///
/// 默认实现：把审计记录写入进程日志，带服务器名称前缀
pub struct LoggerAuditLog {
    server_name: String,
}

impl LoggerAuditLog {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
        }
    }
}

#[async_trait]
impl IAuditLog for LoggerAuditLog {
    async fn record(&self, severity: AuditSeverity, action: &str, description: &str) {
        match severity {
            AuditSeverity::Info => {
                info!("[Audit] {} - {}: {}", self.server_name, action, description)
            }
            AuditSeverity::Warning => {
                warn!("[Audit] {} - {}: {}", self.server_name, action, description)
            }
            AuditSeverity::Error => {
                error!("[Audit] {} - {}: {}", self.server_name, action, description)
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序统一错误类型
/// 用于封装一致性测试引擎中可能出现的各种错误，提供统一的错误处理机制
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AppError {
    /// 通用错误，包含错误消息
    #[error("通用错误: {message}")]
    Generic { message: String },

    /// 输入/输出错误
    #[error("IO错误: {message} (Kind: {kind})")]
    IoError { message: String, kind: String },

    /// 配置错误（initialize阶段的致命错误）
    ///
    /// **业务含义**: 启动一致性测试引擎所必需的联盟基础设施缺失或不可用
    /// **触发条件**:
    /// - 企业级主题连接器（事件总线）未提供
    /// - 连接器管理器未提供
    /// - 跨联盟（企业级）访问未启用
    ///
    /// **错误恢复**:
    /// - 引擎不做重试；半启动的引擎比干净失败更糟
    /// - 由运维人员修正服务器配置后重新启动
    #[error("配置错误: {message}")]
    ConfigurationError { message: String },

    /// 请求参数错误（调用方错误）
    /// 缺失用户标识、服务器名称等必填参数；不重试，不记录为系统故障
    #[error("无效参数: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// 服务未初始化错误（调用方视角下可恢复）
    /// 指定服务器当前没有运行一致性测试引擎：尚未启动或已终止
    #[error("服务未初始化: 服务器 {server_name} 当前没有运行一致性测试引擎")]
    ServiceNotInitialized { server_name: String },

    /// 资源未找到错误
    #[error("资源未找到: {resource_type} - {message}")]
    NotFoundError {
        resource_type: String,
        message: String,
    },

    /// 测试执行相关错误
    #[error("测试执行错误: {test_case_id} - {message}")]
    TestExecutionError {
        test_case_id: String,
        message: String,
    },

    /// 状态转换错误
    #[error("状态转换错误: 从 {from_state} 到 {to_state} - {message}")]
    StateTransitionError {
        from_state: String,
        to_state: String,
        message: String,
    },

    /// 联盟事件总线错误
    #[error("事件总线错误: {message}")]
    EventBusError { message: String },

    /// 数据序列化/反序列化错误
    #[error("序列化错误: {message}")]
    SerializationError { message: String },

    /// JSON序列化/反序列化错误
    #[error("JSON序列化/反序列化错误: {message}")]
    JsonError { message: String },

    /// 并发/异步操作错误
    #[error("并发错误: {message}")]
    ConcurrencyError { message: String },

    /// 服务初始化失败错误
    #[error("服务初始化失败: {service_name}, 原因: {reason}")]
    ServiceInitializationError { service_name: String, reason: String },

    /// 服务关闭失败错误
    #[error("服务关闭失败: {service_name}, 原因: {reason}")]
    ServiceShutdownError { service_name: String, reason: String },
}

impl AppError {
    /// 创建通用错误
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// 创建IO错误
    pub fn io_error(message: impl Into<String>, kind_str: impl Into<String>) -> Self {
        Self::IoError {
            message: message.into(),
            kind: kind_str.into(),
        }
    }

    /// 创建配置错误
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 创建无效参数错误
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// 创建服务未初始化错误
    pub fn service_not_initialized(server_name: impl Into<String>) -> Self {
        Self::ServiceNotInitialized {
            server_name: server_name.into(),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found_error(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    /// 创建测试执行错误
    pub fn test_execution_error(
        test_case_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::TestExecutionError {
            test_case_id: test_case_id.into(),
            message: message.into(),
        }
    }

    /// 创建状态转换错误
    pub fn state_transition_error(
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StateTransitionError {
            from_state: from_state.into(),
            to_state: to_state.into(),
            message: message.into(),
        }
    }

    /// 创建事件总线错误
    pub fn event_bus_error(message: impl Into<String>) -> Self {
        Self::EventBusError {
            message: message.into(),
        }
    }

    /// 创建序列化错误
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// 创建JSON序列化错误
    pub fn json_error(message: impl Into<String>) -> Self {
        Self::JsonError {
            message: message.into(),
        }
    }

    /// 创建并发错误
    pub fn concurrency_error(message: impl Into<String>) -> Self {
        Self::ConcurrencyError {
            message: message.into(),
        }
    }

    /// 创建服务初始化失败错误
    pub fn service_initialization_error(
        service_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ServiceInitializationError {
            service_name: service_name.into(),
            reason: reason.into(),
        }
    }

    /// 创建服务关闭失败错误
    pub fn service_shutdown_error(
        service_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ServiceShutdownError {
            service_name: service_name.into(),
            reason: reason.into(),
        }
    }

    /// 获取错误的简短描述
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Generic { .. } => "GENERIC",
            AppError::IoError { .. } => "IO_ERROR",
            AppError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            AppError::InvalidParameter { .. } => "INVALID_PARAMETER",
            AppError::ServiceNotInitialized { .. } => "SERVICE_NOT_INITIALIZED",
            AppError::NotFoundError { .. } => "NOT_FOUND_ERROR",
            AppError::TestExecutionError { .. } => "TEST_EXECUTION_ERROR",
            AppError::StateTransitionError { .. } => "STATE_TRANSITION_ERROR",
            AppError::EventBusError { .. } => "EVENT_BUS_ERROR",
            AppError::SerializationError { .. } => "SERIALIZATION_ERROR",
            AppError::JsonError { .. } => "JSON_ERROR",
            AppError::ConcurrencyError { .. } => "CONCURRENCY_ERROR",
            AppError::ServiceInitializationError { .. } => "SERVICE_INIT_ERROR",
            AppError::ServiceShutdownError { .. } => "SERVICE_SHUTDOWN_ERROR",
        }
    }

    /// 系统处置描述：发生该错误时系统做了什么
    pub fn system_action(&self) -> &'static str {
        match self {
            AppError::ConfigurationError { .. } => "引擎启动已中止，未发布任何服务器实例",
            AppError::InvalidParameter { .. } => "请求被拒绝，未执行任何查询",
            AppError::ServiceNotInitialized { .. } => "请求被拒绝，该服务器没有可查询的测试状态",
            AppError::NotFoundError { .. } => "查询已执行，但未找到匹配的标识",
            AppError::TestExecutionError { .. } => "该测试用例被记录为失败，运行继续执行后续用例",
            AppError::StateTransitionError { .. } => "请求的状态变更被拒绝，当前状态保持不变",
            AppError::EventBusError { .. } => "联盟事件未被投递，监听器保持注册状态",
            AppError::ServiceInitializationError { .. } => "服务启动已中止",
            AppError::ServiceShutdownError { .. } => "服务关闭未完成，可能残留运行中的任务",
            _ => "操作未完成",
        }
    }

    /// 用户处置建议：调用方应如何应对该错误
    pub fn user_action(&self) -> &'static str {
        match self {
            AppError::ConfigurationError { .. } => "检查服务器配置中的联盟基础设施设置后重新启动服务器",
            AppError::InvalidParameter { .. } => "补全缺失的请求参数后重试",
            AppError::ServiceNotInitialized { .. } => "先启动该服务器的一致性测试引擎，然后重试查询",
            AppError::NotFoundError { .. } => "确认标识拼写，或等待对应的测试用例/工作台产生结果",
            AppError::TestExecutionError { .. } => "查看该测试用例的失败详情，确认被测技术的行为",
            AppError::StateTransitionError { .. } => "检查当前状态；终态结果与已停止的工作台不可复用",
            AppError::EventBusError { .. } => "检查事件总线连接器与联盟主题配置",
            AppError::ServiceInitializationError { .. } => "查看日志中的失败原因并修正后重试",
            AppError::ServiceShutdownError { .. } => "查看日志确认残留任务，必要时重启进程",
            _ => "查看日志获取更多上下文",
        }
    }

    /// 错误对应的HTTP语义状态码
    ///
    /// REST外层不属于本引擎，但响应封装需要区分：
    /// 请求格式错误(400) / 标识未找到(404) / 服务器未运行套件(503) / 其他(500)
    pub fn related_http_code(&self) -> u16 {
        match self {
            AppError::InvalidParameter { .. } => 400,
            AppError::NotFoundError { .. } => 404,
            AppError::ServiceNotInitialized { .. } => 503,
            _ => 500,
        }
    }
}

/// 标准 I/O 错误到 AppError 的转换
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError {
            message: err.to_string(),
            kind: format!("{:?}", err.kind()),
        }
    }
}

/// serde_json 错误到 AppError 的转换
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError {
            message: err.to_string(),
        }
    }
}

/// 字符串错误到 AppError 的转换（通用错误）
impl From<String> for AppError {
    fn from(err_msg: String) -> Self {
        Self::Generic { message: err_msg }
    }
}

/// &str 错误到 AppError 的转换（通用错误）
impl From<&str> for AppError {
    fn from(err_msg: &str) -> Self {
        Self::Generic {
            message: err_msg.to_string(),
        }
    }
}

/// 应用程序结果类型别名
/// 简化错误处理的类型定义
pub type AppResult<T> = Result<T, AppError>;

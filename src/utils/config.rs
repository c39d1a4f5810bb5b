use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::ConformanceSuiteConfig;
use crate::utils::error::{AppError, AppResult};

/// 应用程序主配置结构
/// 包含一致性测试套件运行所需的所有配置信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 应用程序基本设置
    pub app_settings: AppSettings,
    /// 日志配置
    pub logging_config: LoggingConfig,
    /// 一致性测试套件配置（按服务器）
    #[serde(default)]
    pub suite_config: ConformanceSuiteConfig,
}

/// 应用程序基本设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// 应用程序名称
    pub app_name: String,
    /// 应用程序版本
    pub app_version: String,
    /// 运行环境 (development, testing, production)
    pub environment: String,
    /// 是否启用调试模式
    pub debug_mode: bool,
    /// 被配置运行测试套件的服务器名称
    pub server_name: String,
    /// 操作超时时间（毫秒）
    pub default_timeout_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别 (debug, info, warn, error)
    pub log_level: String,
    /// 是否启用控制台输出
    pub console_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_settings: AppSettings::default(),
            logging_config: LoggingConfig::default(),
            suite_config: ConformanceSuiteConfig::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "ConformanceSuite".to_string(),
            app_version: "1.0.0".to_string(),
            environment: "development".to_string(),
            debug_mode: true,
            server_name: "conformance-server".to_string(),
            default_timeout_ms: 30000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            console_output: true,
        }
    }
}

/// 配置管理器
/// 负责加载、保存和管理应用程序配置
pub struct ConfigManager {
    config: AppConfig,
    config_file_path: PathBuf,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new(config_file_path: PathBuf) -> Self {
        Self {
            config: AppConfig::default(),
            config_file_path,
        }
    }

    /// 从文件加载配置
    pub async fn load_from_file(&mut self) -> AppResult<()> {
        if !self.config_file_path.exists() {
            // 如果配置文件不存在，创建默认配置文件
            self.save_to_file().await?;
            return Ok(());
        }

        let content = tokio::fs::read_to_string(&self.config_file_path)
            .await
            .map_err(|e| {
                AppError::io_error(format!("读取配置文件失败: {}", e), e.kind().to_string())
            })?;

        self.config = serde_json::from_str(&content)
            .map_err(|e| AppError::configuration_error(format!("解析配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 将配置保存到文件
    pub async fn save_to_file(&self) -> AppResult<()> {
        // 确保目录存在
        if let Some(parent) = self.config_file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::io_error(format!("创建配置目录失败: {}", e), e.kind().to_string())
            })?;
        }

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| AppError::json_error(format!("序列化配置失败: {}", e)))?;

        tokio::fs::write(&self.config_file_path, content)
            .await
            .map_err(|e| {
                AppError::io_error(format!("写入配置文件失败: {}", e), e.kind().to_string())
            })?;

        Ok(())
    }

    /// 从环境变量覆盖配置
    pub fn override_from_env(&mut self) {
        if let Ok(server_name) = std::env::var("CONFORMANCE_SERVER_NAME") {
            self.config.app_settings.server_name = server_name;
        }
        if let Ok(env) = std::env::var("APP_ENVIRONMENT") {
            self.config.app_settings.environment = env;
        }
        if let Ok(debug) = std::env::var("DEBUG_MODE") {
            self.config.app_settings.debug_mode = debug.to_lowercase() == "true";
        }
        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            self.config.logging_config.log_level = log_level;
        }
    }

    /// 获取配置的只读引用
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取配置的可变引用
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// 验证配置的有效性
    pub fn validate_config(&self) -> AppResult<()> {
        if self.config.app_settings.server_name.trim().is_empty() {
            return Err(AppError::configuration_error("服务器名称不能为空"));
        }

        // 验证环境配置
        let valid_environments = ["development", "testing", "production"];
        if !valid_environments.contains(&self.config.app_settings.environment.as_str()) {
            return Err(AppError::configuration_error(format!(
                "无效的环境配置: {}，有效值: {:?}",
                self.config.app_settings.environment, valid_environments
            )));
        }

        // 验证日志级别
        let valid_log_levels = ["debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging_config.log_level.as_str()) {
            return Err(AppError::configuration_error(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.config.logging_config.log_level, valid_log_levels
            )));
        }

        // 验证各测试区域配置：用户标识非空、页大小非零
        let suite = &self.config.suite_config;
        if let Some(platform) = &suite.platform {
            if platform.user_id.trim().is_empty() {
                return Err(AppError::configuration_error("平台工作台的用户标识不能为空"));
            }
            if platform.max_page_size == 0 {
                return Err(AppError::configuration_error("平台工作台的最大页大小不能为0"));
            }
        }
        if let Some(repository) = &suite.repository {
            if repository.user_id.trim().is_empty() {
                return Err(AppError::configuration_error("仓库工作台的用户标识不能为空"));
            }
            if repository.max_page_size == 0 {
                return Err(AppError::configuration_error("仓库工作台的最大页大小不能为0"));
            }
        }
        if let Some(performance) = &suite.performance {
            if performance.user_id.trim().is_empty() {
                return Err(AppError::configuration_error("性能工作台的用户标识不能为空"));
            }
            if performance.repetitions == 0 {
                return Err(AppError::configuration_error("性能工作台的操作次数不能为0"));
            }
        }

        Ok(())
    }

    /// 重置为默认配置
    pub fn reset_to_default(&mut self) {
        self.config = AppConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{PlatformWorkbenchConfig, TargetConnection};
    use crate::utils::config::{AppConfig, ConfigManager};
    use crate::utils::error::{AppError, AppResult};
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// 测试AppError的创建和错误代码
    #[test]
    fn test_app_error_creation() {
        let error = AppError::generic("测试错误");
        assert_eq!(error.error_code(), "GENERIC");
        assert!(error.to_string().contains("测试错误"));

        let config_error = AppError::configuration_error("缺少企业级主题连接器");
        assert_eq!(config_error.error_code(), "CONFIGURATION_ERROR");
        assert!(config_error.to_string().contains("缺少企业级主题连接器"));

        let param_error = AppError::invalid_parameter("user_id", "用户标识不能为空");
        assert_eq!(param_error.error_code(), "INVALID_PARAMETER");
        assert!(param_error.to_string().contains("user_id"));

        let init_error = AppError::service_not_initialized("serverX");
        assert_eq!(init_error.error_code(), "SERVICE_NOT_INITIALIZED");
        assert!(init_error.to_string().contains("serverX"));
    }

    /// 测试错误的HTTP语义状态码映射
    #[test]
    fn test_error_http_code_mapping() {
        assert_eq!(
            AppError::invalid_parameter("server_name", "缺失").related_http_code(),
            400
        );
        assert_eq!(
            AppError::not_found_error("TestCase", "未知标识").related_http_code(),
            404
        );
        assert_eq!(
            AppError::service_not_initialized("serverX").related_http_code(),
            503
        );
        assert_eq!(AppError::generic("其他").related_http_code(), 500);
    }

    /// 测试错误的处置描述：每种错误都应携带系统处置与用户建议
    #[test]
    fn test_error_actions_present() {
        let errors = [
            AppError::configuration_error("x"),
            AppError::invalid_parameter("user_id", "x"),
            AppError::service_not_initialized("s"),
            AppError::not_found_error("Profile", "x"),
            AppError::test_execution_error("T1", "x"),
            AppError::state_transition_error("Running", "Running", "x"),
        ];
        for error in errors {
            assert!(!error.system_action().is_empty());
            assert!(!error.user_action().is_empty());
        }
    }

    /// 测试错误转换 (From trait)
    #[test]
    fn test_error_conversion() {
        // 测试从String转换
        let string_error: AppError = "字符串错误".to_string().into();
        assert_eq!(string_error.error_code(), "GENERIC");

        // 测试从&str转换
        let str_error: AppError = "字符串错误".into();
        assert_eq!(str_error.error_code(), "GENERIC");

        // 测试serde_json错误转换
        let invalid_json = "{invalid json}";
        let json_error: Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str(invalid_json);
        match json_error {
            Err(e) => {
                let app_error: AppError = e.into();
                assert_eq!(app_error.error_code(), "JSON_ERROR");
            }
            Ok(_) => panic!("应该产生JSON错误"),
        }
    }

    /// 测试状态转换错误
    #[test]
    fn test_state_transition_error() {
        let error = AppError::state_transition_error(
            "Stopped",
            "Running",
            "已停止的工作台不能重新启动",
        );
        assert_eq!(error.error_code(), "STATE_TRANSITION_ERROR");
        assert!(error.to_string().contains("从 Stopped 到 Running"));
        assert!(error.to_string().contains("已停止的工作台不能重新启动"));
    }

    /// 测试应用配置的默认值
    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();

        // 检查应用设置默认值
        assert_eq!(config.app_settings.app_name, "ConformanceSuite");
        assert_eq!(config.app_settings.environment, "development");
        assert!(config.app_settings.debug_mode);
        assert_eq!(config.app_settings.server_name, "conformance-server");

        // 检查日志配置默认值
        assert_eq!(config.logging_config.log_level, "info");
        assert!(config.logging_config.console_output);

        // 默认不启用任何测试区域
        assert!(config.suite_config.is_empty());
    }

    /// 测试配置序列化和反序列化
    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();

        // 序列化
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("ConformanceSuite"));
        assert!(json.contains("development"));

        // 反序列化
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            deserialized.app_settings.app_name,
            config.app_settings.app_name
        );
        assert_eq!(
            deserialized.app_settings.server_name,
            config.app_settings.server_name
        );
    }

    /// 测试配置管理器基本功能
    #[tokio::test]
    async fn test_config_manager_basic_operations() {
        // 创建临时目录和文件路径
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.json");

        let mut manager = ConfigManager::new(config_path.clone());

        // 测试保存和加载
        manager.get_config_mut().app_settings.server_name = "metadata-server-1".to_string();
        manager.get_config_mut().suite_config.platform = Some(PlatformWorkbenchConfig {
            user_id: "conformance".to_string(),
            password: String::new(),
            max_page_size: 25,
            target: TargetConnection::new("local://mock"),
        });

        // 保存配置到文件
        manager.save_to_file().await.unwrap();
        assert!(config_path.exists());

        // 创建新的管理器并加载配置
        let mut new_manager = ConfigManager::new(config_path);
        new_manager.load_from_file().await.unwrap();

        assert_eq!(
            new_manager.get_config().app_settings.server_name,
            "metadata-server-1"
        );
        let platform = new_manager.get_config().suite_config.platform.as_ref().unwrap();
        assert_eq!(platform.max_page_size, 25);
    }

    /// 测试配置验证
    #[test]
    fn test_config_validation() {
        let manager = ConfigManager::new(PathBuf::from("test_config.json"));

        // 默认配置应该通过验证
        assert!(manager.validate_config().is_ok());

        // 测试无效的环境配置
        let mut manager = ConfigManager::new(PathBuf::from("test.json"));
        manager.get_config_mut().app_settings.environment = "invalid_env".to_string();
        assert!(manager.validate_config().is_err());

        // 测试空的服务器名称
        let mut manager = ConfigManager::new(PathBuf::from("test.json"));
        manager.get_config_mut().app_settings.server_name = "  ".to_string();
        assert!(manager.validate_config().is_err());

        // 测试无效的工作台配置：空用户标识
        let mut manager = ConfigManager::new(PathBuf::from("test.json"));
        manager.get_config_mut().suite_config.platform = Some(PlatformWorkbenchConfig {
            user_id: String::new(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("local://mock"),
        });
        assert!(manager.validate_config().is_err());
    }

    /// 测试环境变量覆盖
    #[test]
    fn test_env_override() {
        // 设置环境变量
        std::env::set_var("CONFORMANCE_SERVER_NAME", "env-server");
        std::env::set_var("APP_ENVIRONMENT", "production");
        std::env::set_var("DEBUG_MODE", "false");
        std::env::set_var("LOG_LEVEL", "error");

        let mut manager = ConfigManager::new(PathBuf::from("test.json"));
        manager.override_from_env();

        let config = manager.get_config();
        assert_eq!(config.app_settings.server_name, "env-server");
        assert_eq!(config.app_settings.environment, "production");
        assert!(!config.app_settings.debug_mode);
        assert_eq!(config.logging_config.log_level, "error");

        // 清理环境变量
        std::env::remove_var("CONFORMANCE_SERVER_NAME");
        std::env::remove_var("APP_ENVIRONMENT");
        std::env::remove_var("DEBUG_MODE");
        std::env::remove_var("LOG_LEVEL");
    }

    /// 测试AppResult类型别名
    #[test]
    fn test_app_result() {
        // 测试成功情况
        let success: AppResult<String> = Ok("成功".to_string());
        assert!(success.is_ok());

        // 测试错误情况
        let error: AppResult<String> = Err(AppError::generic("测试错误"));
        assert!(error.is_err());

        match error {
            Err(e) => assert_eq!(e.error_code(), "GENERIC"),
            Ok(_) => panic!("应该是错误"),
        }
    }
}

/// 一致性测试套件演示运行
///
/// 加载配置、用Mock连接器装配一个被测技术、
/// 运行全部配置的工作台直到结束，打印摘要报告后关闭。

use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use conformance_suite::application::{
    ConformanceOperationalService, ConformanceQueryService,
};
use conformance_suite::domain::services::mocks::{
    MockConnectorFactory, MockConnectorManager, MockEventBusConnector,
};
use conformance_suite::domain::services::LoggerAuditLog;
use conformance_suite::domain::{DefaultTestCaseProvider, ServerInstanceRegistry};
use conformance_suite::models::{
    ConformanceSuiteConfig, PlatformWorkbenchConfig, RepositoryWorkbenchConfig,
    TargetConnection,
};
use conformance_suite::utils::{AppResult, ConfigManager};

#[tokio::main]
async fn main() -> AppResult<()> {
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config/conformance_suite.json".to_string());
    let mut config_manager = ConfigManager::new(PathBuf::from(config_path));
    config_manager.load_from_file().await?;
    config_manager.override_from_env();
    config_manager.validate_config()?;
    let config = config_manager.get_config().clone();

    env_logger::Builder::new()
        .parse_filters(&config.logging_config.log_level)
        .init();

    let server_name = config.app_settings.server_name.clone();
    info!("🚀 一致性测试套件启动: {}", server_name);

    // 配置文件未启用任何区域时使用演示配置
    let suite_config = if config.suite_config.is_empty() {
        demo_suite_config()
    } else {
        config.suite_config.clone()
    };

    let registry = Arc::new(ServerInstanceRegistry::new());
    let lifecycle = ConformanceOperationalService::new(
        registry.clone(),
        Arc::new(DefaultTestCaseProvider),
        Arc::new(MockConnectorFactory::new()),
    );
    let query = ConformanceQueryService::new(registry.clone());

    lifecycle
        .initialize(
            &server_name,
            suite_config,
            Some(Arc::new(MockEventBusConnector::new("cohort.demo.topic"))),
            Some(Arc::new(MockConnectorManager::new(true))),
            Arc::new(LoggerAuditLog::new(server_name.clone())),
        )
        .await?;

    // 等待全部工作台运行结束
    if let Some(instance) = registry.get(&server_name).await {
        for workbench in &instance.workbenches {
            if !workbench
                .wait_until_stopped(Duration::from_millis(
                    config.app_settings.default_timeout_ms,
                ))
                .await
            {
                error!("工作台 {} 未在限期内结束", workbench.workbench_id());
            }
        }
    }

    let summary = query
        .get_conformance_summary_report("demo-operator", &server_name)
        .await?;
    info!(
        "✅ 测试运行结束: {} 个用例, {} 通过, {} 失败",
        summary.test_case_count, summary.passed_count, summary.failed_count
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    lifecycle.terminate(&server_name, false).await?;
    Ok(())
}

/// 演示用套件配置：平台与仓库两个工作台
fn demo_suite_config() -> ConformanceSuiteConfig {
    ConformanceSuiteConfig {
        platform: Some(PlatformWorkbenchConfig {
            user_id: "demo-operator".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("mock://platform-under-test"),
        }),
        repository: Some(RepositoryWorkbenchConfig {
            user_id: "demo-operator".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("mock://repository-under-test"),
            test_entity_types: vec!["Referenceable".to_string()],
        }),
        performance: None,
    }
}

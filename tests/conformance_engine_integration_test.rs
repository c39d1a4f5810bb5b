/// 一致性测试引擎端到端集成测试
///
/// 用Mock连接器和Mock联盟基础设施驱动完整流程：
/// initialize → 工作台运行 → 查询报告 → terminate

use std::sync::Arc;
use std::time::Duration;

use tokio_test::assert_ok;

use conformance_suite::application::{
    ConformanceOperationalService, ConformanceQueryService,
};
use conformance_suite::domain::services::mocks::{
    MockAuditLog, MockConnectorFactory, MockConnectorManager, MockEventBusConnector,
};
use conformance_suite::domain::{DefaultTestCaseProvider, ServerInstanceRegistry};
use conformance_suite::models::{
    CohortEvent, ConformanceSuiteConfig, PerformanceWorkbenchConfig, PlatformWorkbenchConfig,
    RepositoryWorkbenchConfig, TargetConnection, TestCaseStatus, WorkbenchState,
};

fn full_suite_config() -> ConformanceSuiteConfig {
    ConformanceSuiteConfig {
        platform: Some(PlatformWorkbenchConfig {
            user_id: "it-operator".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("mock://platform"),
        }),
        repository: Some(RepositoryWorkbenchConfig {
            user_id: "it-operator".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("mock://repository"),
            test_entity_types: vec!["Referenceable".to_string()],
        }),
        performance: Some(PerformanceWorkbenchConfig {
            user_id: "it-operator".to_string(),
            password: String::new(),
            max_page_size: 50,
            target: TargetConnection::new("mock://performance"),
            repetitions: 3,
        }),
    }
}

struct TestHarness {
    registry: Arc<ServerInstanceRegistry>,
    lifecycle: ConformanceOperationalService,
    query: ConformanceQueryService,
    event_bus: Arc<MockEventBusConnector>,
    connector_manager: Arc<MockConnectorManager>,
    audit_log: Arc<MockAuditLog>,
}

fn make_harness(factory: MockConnectorFactory) -> TestHarness {
    let registry = Arc::new(ServerInstanceRegistry::new());
    TestHarness {
        lifecycle: ConformanceOperationalService::new(
            registry.clone(),
            Arc::new(DefaultTestCaseProvider),
            Arc::new(factory),
        ),
        query: ConformanceQueryService::new(registry.clone()),
        registry,
        event_bus: Arc::new(MockEventBusConnector::new("cohort.it.topic")),
        connector_manager: Arc::new(MockConnectorManager::new(true)),
        audit_log: Arc::new(MockAuditLog::new()),
    }
}

async fn wait_all_stopped(harness: &TestHarness, server_name: &str) {
    let instance = harness
        .registry
        .get(server_name)
        .await
        .expect("实例应已发布");
    for workbench in &instance.workbenches {
        assert!(
            workbench.wait_until_stopped(Duration::from_secs(10)).await,
            "工作台 {} 未在限期内停止",
            workbench.workbench_id()
        );
    }
}

#[tokio::test]
async fn test_full_run_and_reports() {
    let harness = make_harness(MockConnectorFactory::new());

    harness
        .lifecycle
        .initialize(
            "it-server",
            full_suite_config(),
            Some(harness.event_bus.clone()),
            Some(harness.connector_manager.clone()),
            harness.audit_log.clone(),
        )
        .await
        .unwrap();
    wait_all_stopped(&harness, "it-server").await;

    // 三个工作台都应正常走完并停止
    for workbench_id in [
        "platform-workbench",
        "repository-workbench",
        "performance-workbench",
    ] {
        let state = harness
            .query
            .get_workbench_status("it-operator", "it-server", workbench_id)
            .await
            .unwrap();
        assert_eq!(state, WorkbenchState::Stopped);
    }

    let summary = harness
        .query
        .get_conformance_summary_report("it-operator", "it-server")
        .await
        .unwrap();
    assert_eq!(summary.workbench_count, 3);
    assert_eq!(summary.running_workbench_count, 0);
    assert!(summary.test_case_count >= 4);
    assert_eq!(summary.failed_count, 0);

    let full = harness
        .query
        .get_conformance_report("it-operator", "it-server")
        .await
        .unwrap();
    assert_eq!(full.server_name, "it-server");
    assert_eq!(full.workbenches.len(), 3);
    assert!(!full.profile_results.is_empty());

    // 按用例标识能取到完整结果
    let origin = harness
        .query
        .get_test_case_report("it-operator", "it-server", "platform-origin-test")
        .await
        .unwrap();
    assert_eq!(origin.status, TestCaseStatus::Success);
    assert!(origin.discovered_properties.contains_key("origin"));

    harness.lifecycle.terminate("it-server", false).await.unwrap();
    assert!(harness.event_bus.is_disconnected().await);
}

/// 初始化前的查询：服务器不可见，映射为服务未初始化
#[tokio::test]
async fn test_query_before_initialize() {
    let harness = make_harness(MockConnectorFactory::new());
    let err = harness
        .query
        .get_profile_names("it-operator", "it-server")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "SERVICE_NOT_INITIALIZED");
    assert_eq!(err.related_http_code(), 503);
}

/// 一个工作台的被测目标不可达时，其他工作台照常运行
#[tokio::test]
async fn test_unreachable_target_does_not_affect_other_workbenches() {
    // 所有连接器不可达：每个工作台独立进入Stopped并记录失败
    let harness = make_harness(MockConnectorFactory::unreachable());

    harness
        .lifecycle
        .initialize(
            "it-server",
            full_suite_config(),
            Some(harness.event_bus.clone()),
            Some(harness.connector_manager.clone()),
            harness.audit_log.clone(),
        )
        .await
        .unwrap();
    wait_all_stopped(&harness, "it-server").await;

    for workbench_id in [
        "platform-workbench",
        "repository-workbench",
        "performance-workbench",
    ] {
        let report = harness
            .query
            .get_workbench_report("it-operator", "it-server", workbench_id)
            .await
            .unwrap();
        assert_eq!(report.state, WorkbenchState::Stopped);
        assert!(report.failure_message.is_some());
        assert_eq!(report.test_case_count, 0);
    }

    // 启动失败写了审计
    assert!(harness.audit_log.count_for_action("workbench-start").await >= 3);
}

/// 联盟事件经事件总线投递后计入消费该类事件的工作台
#[tokio::test]
async fn test_cohort_event_delivery() {
    let harness = make_harness(MockConnectorFactory::new());

    harness
        .lifecycle
        .initialize(
            "it-server",
            full_suite_config(),
            Some(harness.event_bus.clone()),
            Some(harness.connector_manager.clone()),
            harness.audit_log.clone(),
        )
        .await
        .unwrap();

    // 仓库与性能区域消费联盟事件
    assert_eq!(harness.event_bus.listener_count().await, 2);
    assert_eq!(harness.connector_manager.consumer_count().await, 2);

    harness
        .event_bus
        .deliver(CohortEvent::new(
            "remote-member",
            "NEW_ENTITY",
            serde_json::json!({"guid": "e-1"}),
        ))
        .await;

    wait_all_stopped(&harness, "it-server").await;

    let report = harness
        .query
        .get_workbench_report("it-operator", "it-server", "repository-workbench")
        .await
        .unwrap();
    assert_eq!(report.state, WorkbenchState::Stopped);

    harness.lifecycle.terminate("it-server", false).await.unwrap();
}

/// terminate幂等：重复关闭与关闭不存在的服务器都成功
#[tokio::test]
async fn test_terminate_idempotency() {
    let harness = make_harness(MockConnectorFactory::new());

    harness
        .lifecycle
        .initialize(
            "it-server",
            full_suite_config(),
            Some(harness.event_bus.clone()),
            Some(harness.connector_manager.clone()),
            harness.audit_log.clone(),
        )
        .await
        .unwrap();

    tokio_test::assert_ok!(harness.lifecycle.terminate("it-server", false).await);
    tokio_test::assert_ok!(harness.lifecycle.terminate("it-server", false).await);
    tokio_test::assert_ok!(harness.lifecycle.terminate("never-existed", true).await);

    assert!(harness.registry.get("it-server").await.is_none());
}

/// 同一注册表上的两个服务器互不影响
#[tokio::test]
async fn test_two_servers_are_independent() {
    let harness = make_harness(MockConnectorFactory::new());

    for server_name in ["server-one", "server-two"] {
        harness
            .lifecycle
            .initialize(
                server_name,
                full_suite_config(),
                Some(harness.event_bus.clone()),
                Some(harness.connector_manager.clone()),
                harness.audit_log.clone(),
            )
            .await
            .unwrap();
    }
    wait_all_stopped(&harness, "server-one").await;
    wait_all_stopped(&harness, "server-two").await;

    harness.lifecycle.terminate("server-one", false).await.unwrap();

    assert!(harness.registry.get("server-one").await.is_none());
    let summary = harness
        .query
        .get_conformance_summary_report("it-operator", "server-two")
        .await
        .unwrap();
    assert_eq!(summary.workbench_count, 3);
}

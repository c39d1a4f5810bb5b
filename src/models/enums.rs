//! # 模型枚举类型模块
//!
//! 定义一致性测试引擎中使用的各种枚举类型：
//! - **工作台状态枚举**: 描述工作台生命周期状态机
//! - **测试用例状态枚举**: 描述单个测试用例的执行结果
//! - **断言状态枚举**: 描述测试用例内单条断言的结果
//! - **一致性状态枚举**: 描述能力域（Profile）的综合符合性结论
//! - **测试区域枚举**: 平台 / 仓库一致性 / 仓库性能
//!
//! 所有枚举均支持JSON序列化，并提供字符串双向转换能力。

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 工作台状态枚举
///
/// 状态机：`NotStarted → Running → Stopping → Stopped`
/// `Stopped` 为终态，不允许从终态重新启动；需要重新运行时必须构建新的工作台。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkbenchState {
    /// 未启动
    NotStarted,
    /// 运行中
    Running,
    /// 停止中（已收到协作式停止信号，尚未到达安全检查点）
    Stopping,
    /// 已停止（终态）
    Stopped,
}

impl Default for WorkbenchState {
    fn default() -> Self {
        WorkbenchState::NotStarted
    }
}

impl Display for WorkbenchState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkbenchState::NotStarted => "NotStarted",
            WorkbenchState::Running => "Running",
            WorkbenchState::Stopping => "Stopping",
            WorkbenchState::Stopped => "Stopped",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for WorkbenchState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotStarted" => Ok(WorkbenchState::NotStarted),
            "Running" => Ok(WorkbenchState::Running),
            "Stopping" => Ok(WorkbenchState::Stopping),
            "Stopped" => Ok(WorkbenchState::Stopped),
            _ => Err(format!("未知的工作台状态: {}", s)),
        }
    }
}

/// 测试用例状态枚举
///
/// `Unknown` 表示测试用例尚在执行中（进行中结果允许被显式更新）；
/// 其余三种为终态，终态结果一经提交不允许被静默覆盖。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestCaseStatus {
    /// 状态未知（执行中）
    Unknown,
    /// 测试通过
    Success,
    /// 测试失败
    Failed,
    /// 被测技术不支持该能力（不计为失败）
    NotSupported,
}

impl Default for TestCaseStatus {
    fn default() -> Self {
        TestCaseStatus::Unknown
    }
}

impl TestCaseStatus {
    /// 是否为终态结果
    ///
    /// 终态结果在同一轮运行内不可被覆盖，见 `WorkPad::record_result`
    pub fn is_final(&self) -> bool {
        !matches!(self, TestCaseStatus::Unknown)
    }
}

impl Display for TestCaseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestCaseStatus::Unknown => "Unknown",
            TestCaseStatus::Success => "Success",
            TestCaseStatus::Failed => "Failed",
            TestCaseStatus::NotSupported => "NotSupported",
        };
        write!(f, "{}", s)
    }
}

/// 断言状态枚举
///
/// 表示测试用例内单条断言记录的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionStatus {
    /// 断言通过
    Passed,
    /// 断言失败
    Failed,
    /// 无法判定（例如被测技术未返回足够信息）
    Unknown,
}

impl Display for AssertionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssertionStatus::Passed => "Passed",
            AssertionStatus::Failed => "Failed",
            AssertionStatus::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// 能力域（Profile）一致性状态枚举
///
/// 由该能力域下所有测试用例结果在读取时推导得出，不独立存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConformanceStatus {
    /// 完全符合：所有已完成用例均通过
    Conformant,
    /// 不符合：存在失败用例
    NotConformant,
    /// 被测技术不支持该能力域
    NotSupported,
    /// 尚无法判定（存在执行中的用例或无用例）
    Unknown,
}

impl Default for ConformanceStatus {
    fn default() -> Self {
        ConformanceStatus::Unknown
    }
}

impl Display for ConformanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConformanceStatus::Conformant => "Conformant",
            ConformanceStatus::NotConformant => "NotConformant",
            ConformanceStatus::NotSupported => "NotSupported",
            ConformanceStatus::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// 测试区域枚举
///
/// 每个配置启用的测试区域对应一个独立调度的工作台，
/// 启动顺序固定为：Platform → Repository → Performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestArea {
    /// 平台一致性测试
    Platform,
    /// 仓库一致性测试（消费联盟事件）
    Repository,
    /// 仓库性能测试（消费联盟事件）
    Performance,
}

impl TestArea {
    /// 该测试区域的工作台是否消费联盟（Cohort）事件
    ///
    /// 消费联盟事件的工作台在启动前必须注册主题监听器和连接器消费者
    pub fn consumes_cohort_events(&self) -> bool {
        matches!(self, TestArea::Repository | TestArea::Performance)
    }

    /// 工作台标识（同时用作聚合查询中的 workbench_id）
    pub fn workbench_id(&self) -> &'static str {
        match self {
            TestArea::Platform => "platform-workbench",
            TestArea::Repository => "repository-workbench",
            TestArea::Performance => "performance-workbench",
        }
    }

    /// 工作台显示名称
    pub fn workbench_name(&self) -> &'static str {
        match self {
            TestArea::Platform => "Platform Conformance Workbench",
            TestArea::Repository => "Repository Conformance Workbench",
            TestArea::Performance => "Repository Performance Workbench",
        }
    }
}

impl Display for TestArea {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestArea::Platform => "Platform",
            TestArea::Repository => "Repository",
            TestArea::Performance => "Performance",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TestArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Platform" | "platform" => Ok(TestArea::Platform),
            "Repository" | "repository" => Ok(TestArea::Repository),
            "Performance" | "performance" => Ok(TestArea::Performance),
            _ => Err(format!("未知的测试区域: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbench_state_roundtrip() {
        for state in [
            WorkbenchState::NotStarted,
            WorkbenchState::Running,
            WorkbenchState::Stopping,
            WorkbenchState::Stopped,
        ] {
            let parsed: WorkbenchState = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("Unknown".parse::<WorkbenchState>().is_err());
    }

    #[test]
    fn test_test_case_status_finality() {
        assert!(!TestCaseStatus::Unknown.is_final());
        assert!(TestCaseStatus::Success.is_final());
        assert!(TestCaseStatus::Failed.is_final());
        assert!(TestCaseStatus::NotSupported.is_final());
    }

    #[test]
    fn test_test_area_cohort_consumption() {
        assert!(!TestArea::Platform.consumes_cohort_events());
        assert!(TestArea::Repository.consumes_cohort_events());
        assert!(TestArea::Performance.consumes_cohort_events());
    }

    #[test]
    fn test_test_area_from_str() {
        assert_eq!("platform".parse::<TestArea>().unwrap(), TestArea::Platform);
        assert_eq!("Repository".parse::<TestArea>().unwrap(), TestArea::Repository);
        assert!("Fuzz".parse::<TestArea>().is_err());
    }
}

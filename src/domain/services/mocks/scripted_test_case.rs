use async_trait::async_trait;
use std::time::Duration;

use crate::domain::services::conformance_test_case::{IConformanceTestCase, TestCaseContext};
use crate::models::{AssertionRecord, TestCaseResult};
use crate::utils::error::{AppError, AppResult};

/// 脚本化行为
enum ScriptedBehavior {
    /// 产出通过结果
    Pass,
    /// 产出失败结果
    Fail,
    /// 执行过程抛错（用于验证工作台的失败隔离）
    Error,
}

/// 脚本化测试用例
///
/// 行为完全由构造函数决定：通过 / 失败 / 抛错，可叠加执行延迟。
/// 用于验证工作台调度语义而不依赖真实测试内容。
pub struct ScriptedTestCase {
    test_case_id: String,
    test_case_name: String,
    profile_name: String,
    behavior: ScriptedBehavior,
    delay: Duration,
}

impl ScriptedTestCase {
    /// 产出通过结果的用例
    pub fn passing(
        test_case_id: impl Into<String>,
        test_case_name: impl Into<String>,
        profile_name: impl Into<String>,
    ) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            test_case_name: test_case_name.into(),
            profile_name: profile_name.into(),
            behavior: ScriptedBehavior::Pass,
            delay: Duration::ZERO,
        }
    }

    /// 产出失败结果的用例
    pub fn failing(
        test_case_id: impl Into<String>,
        test_case_name: impl Into<String>,
        profile_name: impl Into<String>,
    ) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            test_case_name: test_case_name.into(),
            profile_name: profile_name.into(),
            behavior: ScriptedBehavior::Fail,
            delay: Duration::ZERO,
        }
    }

    /// 执行过程抛错的用例
    pub fn erroring(
        test_case_id: impl Into<String>,
        test_case_name: impl Into<String>,
        profile_name: impl Into<String>,
    ) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            test_case_name: test_case_name.into(),
            profile_name: profile_name.into(),
            behavior: ScriptedBehavior::Error,
            delay: Duration::ZERO,
        }
    }

    /// 叠加执行延迟
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl IConformanceTestCase for ScriptedTestCase {
    fn test_case_id(&self) -> &str {
        &self.test_case_id
    }

    fn test_case_name(&self) -> &str {
        &self.test_case_name
    }

    fn profile_names(&self) -> Vec<String> {
        vec![self.profile_name.clone()]
    }

    async fn execute(&self, _context: &TestCaseContext) -> AppResult<TestCaseResult> {
        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }

        let mut result = TestCaseResult::in_progress(
            &self.test_case_id,
            &self.test_case_name,
            self.profile_names(),
        );

        match self.behavior {
            ScriptedBehavior::Pass => {
                result.add_assertion(AssertionRecord::passed(
                    format!("{}-01", self.test_case_id),
                    "脚本化断言通过",
                ));
                Ok(result.complete())
            }
            ScriptedBehavior::Fail => {
                result.add_assertion(AssertionRecord::failed(
                    format!("{}-01", self.test_case_id),
                    "脚本化断言失败",
                ));
                Ok(result.complete())
            }
            ScriptedBehavior::Error => Err(AppError::test_execution_error(
                &self.test_case_id,
                "脚本化执行错误",
            )),
        }
    }
}

use crate::{aggregate, detect};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use vigil_allowlist::AllowlistStore;
use vigil_notify::{AlertDispatcher, RunPhase};
use vigil_query::{QueryError, TimeWindow, UsageQuery, UsageSource};
use vigil_types::SweepResult;

/// 扫描编排器
///
/// 生命周期固定三态：ping start -> 拉取/聚合/求差/告警 -> ping success，
/// 任何查询失败统一收敛为 ping error + 一条失败告警 + error 结果。
/// 内部单飞锁串行化定时触发与手动触发的重叠执行。
pub struct SweepRunner {
    source: Arc<dyn UsageSource>,
    store: Arc<AllowlistStore>,
    dispatcher: Arc<AlertDispatcher>,
    window_hours: i64,

    /// 单飞锁：同一时刻只跑一次扫描
    run_lock: Mutex<()>,
}

impl SweepRunner {
    pub fn new(
        source: Arc<dyn UsageSource>,
        store: Arc<AllowlistStore>,
        dispatcher: Arc<AlertDispatcher>,
        window_hours: i64,
    ) -> Self {
        Self {
            source,
            store,
            dispatcher,
            window_hours,
            run_lock: Mutex::new(()),
        }
    }

    /// 同步跑完一次扫描，结果通过返回值给调用方
    pub async fn run(&self) -> SweepResult {
        let _guard = self.run_lock.lock().await;

        self.dispatcher.ping(RunPhase::Start).await;

        match self.execute().await {
            Ok(alerts) => {
                info!(alerts = alerts.len(), "Sweep completed");
                self.dispatcher.ping(RunPhase::Success).await;
                SweepResult::success(alerts)
            }
            Err(e) => {
                warn!(error = %e, "Sweep failed");
                self.dispatcher.ping(RunPhase::Error).await;
                self.dispatcher
                    .alert(&format!("Error fetching model usage: {}", e))
                    .await;
                SweepResult::error(e.to_string())
            }
        }
    }

    async fn execute(&self) -> Result<Vec<String>, QueryError> {
        // 每次扫描加载自己的白名单快照；读失败退化为空集（fail-closed）
        let allowlist = match self.store.load().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "Allowlist load failed, treating as empty");
                BTreeSet::new()
            }
        };

        let query = UsageQuery::new(TimeWindow::trailing_hours(self.window_hours));
        let observations = self.source.fetch(&query).await?;

        let usage = aggregate(observations);
        let violations = detect(&usage, &allowlist);

        let mut alerts = Vec::with_capacity(violations.len());
        for violation in violations {
            let message = violation.message();
            self.dispatcher.alert(&message).await;
            alerts.push(message);
        }

        Ok(alerts)
    }
}

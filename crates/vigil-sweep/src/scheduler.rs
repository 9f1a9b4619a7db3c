use crate::runner::SweepRunner;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

/// 定时扫描任务句柄
pub struct SweepTaskHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handle: JoinHandle<()>,
}

impl SweepTaskHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.join_handle.await;
    }

    pub fn abort(self) {
        self.join_handle.abort();
    }
}

/// 启动固定间隔的后台扫描任务
///
/// run_on_start 为 false 时跳过启动瞬间的第一个 tick，
/// 手动触发走 HTTP，不经过这里。
pub fn start_sweep_task(
    runner: Arc<SweepRunner>,
    interval_secs: u64,
    run_on_start: bool,
) -> SweepTaskHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let join_handle = tokio::spawn(async move {
        info!(interval_secs, "Starting scheduled sweep task");

        let mut ticker = interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if !run_on_start {
            ticker.tick().await;
        }

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // 结果通过告警通道上报，这里只需要触发
                    let _ = runner.run().await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Scheduled sweep task shutting down");
                        break;
                    }
                }
            }
        }
    });

    SweepTaskHandle {
        shutdown_tx,
        join_handle,
    }
}

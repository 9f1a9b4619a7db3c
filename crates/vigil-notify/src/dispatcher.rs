use crate::sink::AlertSink;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// 生命周期 ping 的严重度参数
const PING_PARAMETER: i64 = 0;

/// 违规/失败告警的严重度参数
const ALERT_PARAMETER: i64 = 10;

/// 扫描生命周期阶段，作为存活信号上报
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    Success,
    Error,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Start => write!(f, "start"),
            RunPhase::Success => write!(f, "success"),
            RunPhase::Error => write!(f, "error"),
        }
    }
}

/// 尽力而为的告警出口
///
/// 所有投递失败都在这里吞掉并告警日志，绝不影响扫描结果。
pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,

    /// 存活 ping 上报用的服务名
    monitor_service: String,

    /// 违规告警上报用的服务名
    usage_service: String,
}

impl AlertDispatcher {
    pub fn new(
        sink: Arc<dyn AlertSink>,
        monitor_service: impl Into<String>,
        usage_service: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            monitor_service: monitor_service.into(),
            usage_service: usage_service.into(),
        }
    }

    /// 上报生命周期 ping："Script {phase}"
    pub async fn ping(&self, phase: RunPhase) {
        let message = format!("Script {}", phase);
        if let Err(e) = self
            .sink
            .send(&self.monitor_service, &message, PING_PARAMETER)
            .await
        {
            warn!(phase = %phase, error = %e, "Liveness ping failed");
        }
    }

    /// 上报一条违规或失败告警
    pub async fn alert(&self, message: &str) {
        if let Err(e) = self
            .sink
            .send(&self.usage_service, message, ALERT_PARAMETER)
            .await
        {
            warn!(error = %e, "Alert send failed");
        }
    }
}

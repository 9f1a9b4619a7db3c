use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 告警投递错误，只在 dispatcher 内部记日志，从不向上传播
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("alert request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("alert endpoint returned status {0}")]
    Status(u16),

    #[error("alert request timed out")]
    Timeout,
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifyError::Timeout
        } else {
            NotifyError::Http(err)
        }
    }
}

/// 告警接收端
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// 投递一条消息，parameter 是接收端的严重度参数
    async fn send(&self, service: &str, message: &str, parameter: i64) -> Result<(), NotifyError>;
}

/// HTTP GET 形式的告警接收端
///
/// 端点约定的查询参数：service-name / alert-message / parameter
pub struct HttpAlertSink {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpAlertSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AlertSink for HttpAlertSink {
    async fn send(&self, service: &str, message: &str, parameter: i64) -> Result<(), NotifyError> {
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[
                ("service-name", service),
                ("alert-message", message),
                ("parameter", &parameter.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        Ok(())
    }
}

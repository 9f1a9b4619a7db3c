use crate::error::QueryError;
use crate::query::UsageQuery;
use crate::source::UsageSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use vigil_types::{observation::GLOBAL_REGION, Observation};

/// 监控 API 默认地址
pub const DEFAULT_API_BASE_URL: &str = "https://monitoring.googleapis.com";

/// 资源标签：区域
const LABEL_LOCATION: &str = "location";

/// 资源标签：模型标识
const LABEL_MODEL: &str = "model_user_id";

/// 云监控 timeSeries.list 客户端
///
/// 按全保真（FULL 视图，不降采样）拉取整个窗口，带显式请求超时，
/// 结果跨 nextPageToken 分页拼接。
pub struct MonitoringClient {
    base_url: String,
    project_id: String,
    token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl MonitoringClient {
    pub fn new(project_id: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL, project_id, token, timeout)
    }

    /// base_url 可覆盖，测试指向本地假服务
    pub fn with_base_url(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            token,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    async fn list_page(
        &self,
        query: &UsageQuery,
        page_token: Option<&str>,
    ) -> Result<ListTimeSeriesResponse, QueryError> {
        let url = format!(
            "{}/v3/projects/{}/timeSeries",
            self.base_url, self.project_id
        );

        let mut request = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&[
                ("filter", query.filter().as_str()),
                ("interval.startTime", &query.window.start.to_rfc3339()),
                ("interval.endTime", &query.window.end.to_rfc3339()),
                ("view", "FULL"),
            ]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                code: status.as_u16(),
                body,
            });
        }

        response
            .json::<ListTimeSeriesResponse>()
            .await
            .map_err(|e| QueryError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl UsageSource for MonitoringClient {
    async fn fetch(&self, query: &UsageQuery) -> Result<Vec<Observation>, QueryError> {
        let mut observations = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.list_page(query, page_token.as_deref()).await?;
            pages += 1;
            observations.extend(observations_from_series(page.time_series));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(
            pages,
            observations = observations.len(),
            "Fetched model usage time series"
        );

        Ok(observations)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTimeSeriesResponse {
    #[serde(default)]
    time_series: Vec<TimeSeries>,

    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TimeSeries {
    #[serde(default)]
    resource: MonitoredResource,
}

#[derive(Debug, Default, Deserialize)]
struct MonitoredResource {
    #[serde(default)]
    labels: HashMap<String, String>,
}

/// 序列 -> 观测：缺 location 归入 global，缺 model_user_id 丢弃
fn observations_from_series(series: Vec<TimeSeries>) -> Vec<Observation> {
    series
        .into_iter()
        .filter_map(|ts| {
            let model = ts
                .resource
                .labels
                .get(LABEL_MODEL)
                .filter(|m| !m.is_empty())?;
            let region = ts
                .resource
                .labels
                .get(LABEL_LOCATION)
                .filter(|r| !r.is_empty())
                .map(String::as_str)
                .unwrap_or(GLOBAL_REGION);
            Some(Observation::new(region, model.as_str()))
        })
        .collect()
}

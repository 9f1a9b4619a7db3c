use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 默认指标类型：发布者模型在线服务字符数
pub const DEFAULT_METRIC_TYPE: &str =
    "aiplatform.googleapis.com/publisher/online_serving/character_count";

/// 默认资源类型：发布者模型
pub const DEFAULT_RESOURCE_TYPE: &str = "aiplatform.googleapis.com/PublisherModel";

/// 查询时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// 以当前时刻结尾的尾随窗口
    pub fn trailing(length: Duration) -> Self {
        let end = Utc::now();
        Self {
            start: end - length,
            end,
        }
    }

    /// 尾随 N 小时窗口，扫描默认用 24 小时
    pub fn trailing_hours(hours: i64) -> Self {
        Self::trailing(Duration::hours(hours))
    }
}

/// 一次用量查询：窗口 + 指标/资源过滤条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageQuery {
    pub window: TimeWindow,
    pub metric_type: String,
    pub resource_type: String,
}

impl UsageQuery {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            metric_type: DEFAULT_METRIC_TYPE.to_string(),
            resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
        }
    }

    pub fn with_metric_type(mut self, metric_type: impl Into<String>) -> Self {
        self.metric_type = metric_type.into();
        self
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = resource_type.into();
        self
    }

    /// 监控 API 的过滤表达式
    pub fn filter(&self) -> String {
        format!(
            "metric.type = \"{}\" AND resource.type = \"{}\"",
            self.metric_type, self.resource_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_expression() {
        let query = UsageQuery::new(TimeWindow::trailing_hours(24));
        assert_eq!(
            query.filter(),
            "metric.type = \"aiplatform.googleapis.com/publisher/online_serving/character_count\" \
             AND resource.type = \"aiplatform.googleapis.com/PublisherModel\""
        );
    }

    #[test]
    fn test_trailing_window_length() {
        let window = TimeWindow::trailing_hours(24);
        assert_eq!(window.end - window.start, Duration::hours(24));
    }
}

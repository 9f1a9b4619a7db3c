use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 全局配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub alert: AlertConfig,

    #[serde(default)]
    pub allowlist: AllowlistConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// 监控查询配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// 云项目标识
    pub project_id: String,

    /// 启动时读取一次的 bearer token 文件路径
    pub token_file: Option<PathBuf>,

    /// 监控 API 地址，测试时指向假服务
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// 尾随窗口长度（小时）
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,

    /// 单次请求超时（秒）
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

/// 告警出口配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertConfig {
    /// 告警端点 URL
    pub endpoint: String,

    /// 存活 ping 的服务名
    #[serde(default = "default_monitor_service")]
    pub monitor_service: String,

    /// 违规告警的服务名
    #[serde(default = "default_usage_service")]
    pub usage_service: String,

    /// 投递超时（秒）
    #[serde(default = "default_alert_timeout_secs")]
    pub timeout_secs: u64,
}

/// 白名单存储配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowlistConfig {
    /// 行分隔白名单文件路径
    pub path: PathBuf,
}

/// 定时触发配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// 扫描间隔（秒）
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// 启动时是否立即扫描一次
    #[serde(default)]
    pub run_on_start: bool,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_api_base_url() -> String {
    "https://monitoring.googleapis.com".to_string()
}

fn default_window_hours() -> i64 {
    24
}

fn default_query_timeout_secs() -> u64 {
    10
}

fn default_monitor_service() -> String {
    "gemini-monitor".to_string()
}

fn default_usage_service() -> String {
    "gemini-model-usage".to_string()
}

fn default_alert_timeout_secs() -> u64 {
    5
}

fn default_interval_secs() -> u64 {
    300
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            token_file: None,
            api_base_url: default_api_base_url(),
            window_hours: default_window_hours(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            monitor_service: default_monitor_service(),
            usage_service: default_usage_service(),
            timeout_secs: default_alert_timeout_secs(),
        }
    }
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/allowed_models.txt"),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            run_on_start: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_global_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.monitoring.window_hours, 24);
        assert_eq!(config.schedule.interval_secs, 300);
        assert_eq!(config.alert.monitor_service, "gemini-monitor");
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }
}

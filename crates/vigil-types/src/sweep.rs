use serde::{Deserialize, Serialize};

/// 扫描结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepStatus {
    Success,
    Error,
}

/// 一个区域的违规：该区域观测到但不在白名单内的模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// 区域标签
    pub region: String,

    /// 违规模型，按字典序排序
    pub bad_models: Vec<String>,
}

impl Violation {
    pub fn new(region: impl Into<String>, bad_models: Vec<String>) -> Self {
        Self {
            region: region.into(),
            bad_models,
        }
    }

    /// 渲染为告警文本
    pub fn message(&self) -> String {
        format!(
            "Unapproved models from region {}: {}",
            self.region,
            self.bad_models.join(", ")
        )
    }
}

/// 一次扫描的完整结果，也是 /run-monitor 的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub status: SweepStatus,

    /// 已发出的告警文本，按区域顺序
    #[serde(default)]
    pub alerts: Vec<String>,

    /// 失败原因，仅 status = error 时出现
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SweepResult {
    pub fn success(alerts: Vec<String>) -> Self {
        Self {
            status: SweepStatus::Success,
            alerts,
            details: None,
        }
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self {
            status: SweepStatus::Error,
            alerts: Vec::new(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_message_format() {
        let v = Violation::new(
            "us",
            vec!["gemini-ultra".to_string(), "gemini-x".to_string()],
        );
        assert_eq!(
            v.message(),
            "Unapproved models from region us: gemini-ultra, gemini-x"
        );
    }

    #[test]
    fn test_sweep_result_success_serde() {
        let result = SweepResult::success(vec!["msg".to_string()]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["alerts"][0], "msg");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_sweep_result_error_serde() {
        let result = SweepResult::error("query failed");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["details"], "query failed");
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 区域默认值：资源缺少 location 标签时使用
pub const GLOBAL_REGION: &str = "global";

/// 单条用量观测：一个区域里上报过的一个模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// 区域标签
    pub region: String,

    /// 模型标识
    pub model_id: String,
}

impl Observation {
    pub fn new(region: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            model_id: model_id.into(),
        }
    }
}

/// 每次扫描重建的区域用量映射（区域 -> 去重后的模型集合）
///
/// BTreeMap/BTreeSet 保证迭代顺序确定，告警输出可复现。
pub type RegionUsage = BTreeMap<String, BTreeSet<String>>;

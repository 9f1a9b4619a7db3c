use std::collections::BTreeSet;
use vigil_types::{RegionUsage, Violation};

/// 逐区域与白名单求差
///
/// 纯函数：区域按字典序处理，bad_models 排序后输出，
/// 差集为空的区域不产生违规。空白名单会标记所有观测到的模型（fail-closed）。
pub fn detect(usage: &RegionUsage, allowlist: &BTreeSet<String>) -> Vec<Violation> {
    usage
        .iter()
        .filter_map(|(region, models)| {
            let bad_models: Vec<String> = models
                .iter()
                .filter(|m| !allowlist.contains(*m))
                .cloned()
                .collect();

            if bad_models.is_empty() {
                None
            } else {
                Some(Violation::new(region.clone(), bad_models))
            }
        })
        .collect()
}

use vigil_types::{observation::GLOBAL_REGION, Observation, RegionUsage};

/// 按区域聚合观测到的模型
///
/// 纯函数：空 region 归入 global，空 model_id 丢弃，集合自动去重。
pub fn aggregate(observations: impl IntoIterator<Item = Observation>) -> RegionUsage {
    let mut usage = RegionUsage::new();

    for obs in observations {
        if obs.model_id.is_empty() {
            continue;
        }
        let region = if obs.region.is_empty() {
            GLOBAL_REGION.to_string()
        } else {
            obs.region
        };
        usage.entry(region).or_default().insert(obs.model_id);
    }

    usage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_region_and_dedups() {
        let usage = aggregate(vec![
            Observation::new("us", "gemini-pro"),
            Observation::new("us", "gemini-pro"),
            Observation::new("us", "gemini-ultra"),
            Observation::new("eu", "gemini-pro"),
        ]);

        assert_eq!(usage.len(), 2);
        assert_eq!(usage["us"].len(), 2);
        assert!(usage["us"].contains("gemini-ultra"));
        assert_eq!(usage["eu"].len(), 1);
    }

    #[test]
    fn test_empty_region_defaults_to_global() {
        let usage = aggregate(vec![Observation::new("", "gemini-pro")]);
        assert!(usage["global"].contains("gemini-pro"));
    }

    #[test]
    fn test_empty_model_is_dropped() {
        let usage = aggregate(vec![Observation::new("us", "")]);
        assert!(usage.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}

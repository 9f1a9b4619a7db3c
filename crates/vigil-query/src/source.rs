use crate::error::QueryError;
use crate::query::UsageQuery;
use async_trait::async_trait;
use vigil_types::Observation;

/// 用量数据来源
///
/// 生产实现是 MonitoringClient，测试里用固定数据的假实现替换。
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// 拉取窗口内的全部观测，失败时整次扫描中止
    async fn fetch(&self, query: &UsageQuery) -> Result<Vec<Observation>, QueryError>;
}

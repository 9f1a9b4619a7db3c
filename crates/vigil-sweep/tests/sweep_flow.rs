use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use vigil_allowlist::AllowlistStore;
use vigil_notify::{AlertDispatcher, AlertSink, NotifyError};
use vigil_query::{QueryError, UsageQuery, UsageSource};
use vigil_sweep::SweepRunner;
use vigil_types::{Observation, SweepStatus};

/// 返回固定观测集的假数据源
struct FakeSource {
    observations: Vec<Observation>,
    fail: bool,
}

#[async_trait]
impl UsageSource for FakeSource {
    async fn fetch(&self, _query: &UsageQuery) -> Result<Vec<Observation>, QueryError> {
        if self.fail {
            return Err(QueryError::Status {
                code: 503,
                body: "backend unavailable".to_string(),
            });
        }
        Ok(self.observations.clone())
    }
}

/// 记录所有投递的假告警端
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(String, String, i64)>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<(String, String, i64)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, service: &str, message: &str, parameter: i64) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((service.to_string(), message.to_string(), parameter));
        Ok(())
    }
}

struct Fixture {
    runner: SweepRunner,
    store: Arc<AllowlistStore>,
    sink: Arc<RecordingSink>,
    _dir: tempfile::TempDir,
}

fn fixture(observations: Vec<Observation>, fail: bool) -> Fixture {
    let dir = tempdir().unwrap();
    let store = Arc::new(AllowlistStore::new(dir.path().join("allowed_models.txt")));
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = Arc::new(AlertDispatcher::new(
        sink.clone(),
        "gemini-monitor",
        "gemini-model-usage",
    ));
    let source = Arc::new(FakeSource { observations, fail });

    Fixture {
        runner: SweepRunner::new(source, store.clone(), dispatcher, 24),
        store,
        sink,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_single_region_violation() {
    let fx = fixture(
        vec![
            Observation::new("us", "gemini-pro"),
            Observation::new("us", "gemini-ultra"),
            Observation::new("eu", "gemini-pro"),
        ],
        false,
    );
    fx.store.add("gemini-pro").await.unwrap();

    let result = fx.runner.run().await;

    assert_eq!(result.status, SweepStatus::Success);
    assert_eq!(
        result.alerts,
        vec!["Unapproved models from region us: gemini-ultra".to_string()]
    );

    // start ping、一条违规告警、success ping，顺序固定
    let sent = fx.sink.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], ("gemini-monitor".into(), "Script start".into(), 0));
    assert_eq!(
        sent[1],
        (
            "gemini-model-usage".into(),
            "Unapproved models from region us: gemini-ultra".into(),
            10
        )
    );
    assert_eq!(
        sent[2],
        ("gemini-monitor".into(), "Script success".into(), 0)
    );
}

#[tokio::test]
async fn test_empty_allowlist_fails_closed() {
    let fx = fixture(
        vec![
            Observation::new("us", "gemini-pro"),
            Observation::new("eu", "gemini-flash"),
        ],
        false,
    );

    let result = fx.runner.run().await;

    assert_eq!(result.status, SweepStatus::Success);
    assert_eq!(
        result.alerts,
        vec![
            "Unapproved models from region eu: gemini-flash".to_string(),
            "Unapproved models from region us: gemini-pro".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_clean_sweep_sends_no_alerts() {
    let fx = fixture(vec![Observation::new("us", "gemini-pro")], false);
    fx.store.add("gemini-pro").await.unwrap();

    let result = fx.runner.run().await;

    assert_eq!(result.status, SweepStatus::Success);
    assert!(result.alerts.is_empty());

    // 只有生命周期 ping
    let sent = fx.sink.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|(service, _, _)| service.as_str() == "gemini-monitor"));
}

#[tokio::test]
async fn test_add_model_takes_effect_next_sweep() {
    let fx = fixture(vec![Observation::new("us", "gemini-ultra")], false);

    let result = fx.runner.run().await;
    assert_eq!(result.alerts.len(), 1);

    fx.store.add("gemini-ultra").await.unwrap();
    let result = fx.runner.run().await;
    assert!(result.alerts.is_empty());
}

#[tokio::test]
async fn test_remove_model_takes_effect_next_sweep() {
    let fx = fixture(vec![Observation::new("us", "gemini-pro")], false);
    fx.store.add("gemini-pro").await.unwrap();

    let result = fx.runner.run().await;
    assert!(result.alerts.is_empty());

    fx.store.remove("gemini-pro").await.unwrap();
    let result = fx.runner.run().await;
    assert_eq!(
        result.alerts,
        vec!["Unapproved models from region us: gemini-pro".to_string()]
    );
}

#[tokio::test]
async fn test_query_failure_yields_error_result() {
    let fx = fixture(Vec::new(), true);

    let result = fx.runner.run().await;

    assert_eq!(result.status, SweepStatus::Error);
    assert!(result.alerts.is_empty());
    let details = result.details.expect("error result carries details");
    assert!(details.contains("503"));

    // start ping、error ping、恰好一条失败告警，没有违规告警
    let sent = fx.sink.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].1, "Script start");
    assert_eq!(sent[1].1, "Script error");
    assert_eq!(sent[2].0, "gemini-model-usage");
    assert!(sent[2].1.starts_with("Error fetching model usage:"));
}

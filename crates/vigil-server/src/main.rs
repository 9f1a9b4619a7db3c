use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use vigil_allowlist::AllowlistStore;
use vigil_api::{create_router, AppState};
use vigil_config::{ConfigLoader, GlobalConfig};
use vigil_notify::{AlertDispatcher, HttpAlertSink};
use vigil_query::MonitoringClient;
use vigil_sweep::{start_sweep_task, SweepRunner};

#[derive(Parser, Debug)]
#[command(author, version, about = "Model usage vigil daemon")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config/vigil.toml")]
    config: String,

    /// Override the HTTP bind address from the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    info!("Starting vigil-server with config: {}", args.config);

    let config = ConfigLoader::new(&args.config)
        .load_validated()
        .context("failed to load configuration")?;

    // 扫描和白名单变更端点共用同一个 store
    let store = Arc::new(AllowlistStore::new(&config.allowlist.path));
    let runner = build_runner(&config, store.clone());

    // 定时扫描任务
    let sweep_handle = start_sweep_task(
        runner.clone(),
        config.schedule.interval_secs,
        config.schedule.run_on_start,
    );

    // HTTP 控制面
    let app = create_router(AppState {
        runner,
        store,
    });

    let bind = args.bind.unwrap_or(config.server.bind);
    info!("HTTP API listening on {}", bind);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweep_handle.shutdown().await;
    info!("vigil-server stopped");

    Ok(())
}

fn build_runner(config: &GlobalConfig, store: Arc<AllowlistStore>) -> Arc<SweepRunner> {
    // token 启动时读一次；缺失时走匿名请求（对假后端调试有用）
    let token = match &config.monitoring.token_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(token) => Some(token.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Token file unreadable, querying unauthenticated");
                None
            }
        },
        None => None,
    };

    let client = MonitoringClient::with_base_url(
        &config.monitoring.api_base_url,
        &config.monitoring.project_id,
        token,
        Duration::from_secs(config.monitoring.query_timeout_secs),
    );

    let sink = HttpAlertSink::new(
        &config.alert.endpoint,
        Duration::from_secs(config.alert.timeout_secs),
    );
    let dispatcher = Arc::new(AlertDispatcher::new(
        Arc::new(sink),
        &config.alert.monitor_service,
        &config.alert.usage_service,
    ));

    Arc::new(SweepRunner::new(
        Arc::new(client),
        store,
        dispatcher,
        config.monitoring.window_hours,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

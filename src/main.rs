// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use catalogrs::config::settings::Settings;
use catalogrs::domain::services::execute_service::ExecuteService;
use catalogrs::engines::browser_engine::BrowserCatalogTask;
use catalogrs::engines::traits::ScrapeTask;
use catalogrs::infrastructure::metrics;
use catalogrs::presentation::routes;
use catalogrs::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting catalogrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!(
        work_threads = settings.concurrency.work_threads,
        acquire_timeout_ms = settings.concurrency.acquire_timeout_ms,
        "Configuration loaded"
    );

    // 3. Initialize Prometheus Metrics
    metrics::init_metrics(&settings.metrics)?;

    // 4. Wire the scrape task, admission gate and worker pool
    let task: Arc<dyn ScrapeTask> = Arc::new(BrowserCatalogTask::new(settings.scraper.clone())?);
    let service = Arc::new(ExecuteService::from_settings(&settings.concurrency, task));

    // 5. Start HTTP server
    let app = routes::routes(service);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use crate::config::settings::MetricsSettings;

/// 初始化指标系统
///
/// 启动 Prometheus 导出器并注册准入控制和抓取相关的指标
pub fn init_metrics(settings: &MetricsSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = settings.listen_addr.parse()?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return Ok(());
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "admission_granted_total",
        "Total number of scrape requests admitted by the admission gate"
    );
    describe_counter!(
        "admission_rejected_total",
        "Total number of scrape requests rejected because no permit was available"
    );
    describe_gauge!(
        "admission_permits_in_use",
        "Number of admission permits currently held"
    );
    describe_counter!(
        "scrape_tasks_total",
        "Total number of finished scrape tasks, labelled by outcome"
    );
    describe_counter!(
        "scrape_products_total",
        "Total number of products returned by successful scrape tasks"
    );
    describe_histogram!(
        "scrape_request_duration_seconds",
        "Duration of admitted scrape requests in seconds"
    );
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、并发控制、浏览器抓取和指标导出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 并发控制配置
    pub concurrency: ConcurrencySettings,
    /// 浏览器抓取配置
    pub scraper: ScraperSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 并发控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencySettings {
    /// 工作线程数，同时决定准入许可数量和每个请求的扇出数量
    pub work_threads: usize,
    /// 获取准入许可的超时时间（毫秒）
    pub acquire_timeout_ms: u64,
}

impl ConcurrencySettings {
    /// 获取许可超时时间
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

/// 浏览器抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 商品目录页面地址
    pub url: String,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 是否禁用沙箱
    pub no_sandbox: bool,
    /// 是否禁用 /dev/shm
    pub disable_dev_shm_usage: bool,
    /// 等待页面元素的超时时间（秒）
    pub element_timeout_secs: u64,
    /// 下拉框按键之间的停顿（毫秒）
    pub key_pause_ms: u64,
    /// 远程 Chrome 调试地址 (可选)
    pub remote_debugging_url: Option<String>,
}

impl ScraperSettings {
    /// 元素等待超时时间
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    /// 按键停顿时间
    pub fn key_pause(&self) -> Duration {
        Duration::from_millis(self.key_pause_ms)
    }
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、配置文件和环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并通过校验的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let settings: Settings = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CATALOGRS").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// 带有全部默认值的配置构建器
    ///
    /// `scraper.url` 没有默认值，必须由配置文件或环境变量提供
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            // One value drives both admission capacity and fan-out
            .set_default("concurrency.work_threads", 4)?
            .set_default("concurrency.acquire_timeout_ms", 100)?
            .set_default("scraper.headless", true)?
            .set_default("scraper.no_sandbox", true)?
            .set_default("scraper.disable_dev_shm_usage", true)?
            .set_default("scraper.element_timeout_secs", 20)?
            .set_default("scraper.key_pause_ms", 500)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 校验配置
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 配置有效
    /// * `Err(ConfigError::Message)` - 工作线程数为0或抓取地址无效
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency.work_threads == 0 {
            return Err(ConfigError::Message(
                "concurrency.work_threads must be at least 1".to_string(),
            ));
        }

        url::Url::parse(&self.scraper.url).map_err(|e| {
            ConfigError::Message(format!("scraper.url is not a valid URL: {}", e))
        })?;

        Ok(())
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::fmt::Display;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

use crate::config::settings::ScraperSettings;
use crate::domain::models::{Category, Product};
use crate::engines::catalog_parser::{self, PRODUCT_COUNT_SELECTOR, PRODUCT_ROW_SELECTOR};
use crate::engines::traits::{ScrapeTask, TaskError};

const CATEGORY_FILTER_SELECTOR: &str = "#category-filter";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn browser_error(e: impl Display) -> TaskError {
    TaskError::Browser(e.to_string())
}

/// 独占的浏览器会话
///
/// 每个抓取任务打开自己的会话，任务结束时关闭。
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    launched: bool,
}

impl BrowserSession {
    async fn open(settings: &ScraperSettings) -> Result<Self, TaskError> {
        let launched = settings.remote_debugging_url.is_none();

        let (browser, mut handler) = match &settings.remote_debugging_url {
            Some(url) => {
                info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url).await.map_err(|e| {
                    TaskError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            }
            None => {
                let mut builder = BrowserConfig::builder()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu");
                if !settings.headless {
                    builder = builder.with_head();
                }
                if settings.no_sandbox {
                    builder = builder.no_sandbox();
                }
                if settings.disable_dev_shm_usage {
                    builder = builder.arg("--disable-dev-shm-usage");
                }

                Browser::launch(builder.build().map_err(TaskError::Browser)?)
                    .await
                    .map_err(browser_error)?
            }
        };

        // Drive CDP events until the connection goes away
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            launched,
        })
    }

    async fn close(mut self) {
        if self.launched {
            if let Err(e) = self.browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }
        }
        self.handler.abort();
    }
}

/// 浏览器商品目录抓取任务
///
/// 基于chromiumoxide驱动目录页面：选择分类、等待商品表格加载，
/// 然后把页面HTML交给 [`catalog_parser`] 解析。
pub struct BrowserCatalogTask {
    settings: ScraperSettings,
    base_url: Url,
}

impl BrowserCatalogTask {
    /// 创建新的浏览器抓取任务
    ///
    /// # 参数
    ///
    /// * `settings` - 浏览器抓取配置
    ///
    /// # 返回值
    ///
    /// * `Ok(BrowserCatalogTask)` - 新的任务
    /// * `Err(TaskError::Other)` - 目录地址无效
    pub fn new(settings: ScraperSettings) -> Result<Self, TaskError> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| TaskError::Other(format!("Invalid catalog URL '{}': {}", settings.url, e)))?;
        Ok(Self { settings, base_url })
    }

    async fn scrape(&self, page: &Page, category: Category) -> Result<Vec<Product>, TaskError> {
        let timeout = self.settings.element_timeout();

        page.goto(self.base_url.as_str()).await.map_err(browser_error)?;
        wait_for_element(page, PRODUCT_COUNT_SELECTOR, timeout).await?;

        if category != Category::AllCategories {
            self.select_category(page, category).await?;
        }

        match wait_for_rows(page, timeout).await {
            Ok(count) => info!("Found {} product rows", count),
            Err(e) => warn!("Could not load product rows: {}", e),
        }

        let html = page.content().await.map_err(browser_error)?;
        let parsed = catalog_parser::parse_catalog(&html, &self.base_url)?;

        Ok(parsed.products)
    }

    async fn select_category(&self, page: &Page, category: Category) -> Result<(), TaskError> {
        info!("Selecting category {}", category);
        let timeout = self.settings.element_timeout();
        let pause = self.settings.key_pause();

        let dropdown = wait_for_element(page, CATEGORY_FILTER_SELECTOR, timeout).await?;
        dropdown.click().await.map_err(browser_error)?;

        for _ in 0..category.position() {
            dropdown.press_key("ArrowDown").await.map_err(browser_error)?;
            tokio::time::sleep(pause).await;
        }
        dropdown.press_key("Enter").await.map_err(browser_error)?;
        tokio::time::sleep(pause).await;

        wait_for_rows(page, timeout).await?;
        info!("Category '{}' selected.", category);

        Ok(())
    }
}

async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> Result<Element, TaskError> {
    let deadline = Instant::now() + timeout;
    loop {
        match page.find_element(selector).await {
            Ok(element) => return Ok(element),
            Err(_) if Instant::now() < deadline => tokio::time::sleep(POLL_INTERVAL).await,
            Err(_) => return Err(TaskError::Timeout(selector.to_string())),
        }
    }
}

async fn wait_for_rows(page: &Page, timeout: Duration) -> Result<usize, TaskError> {
    let deadline = Instant::now() + timeout;
    loop {
        match page.find_elements(PRODUCT_ROW_SELECTOR).await {
            Ok(rows) if !rows.is_empty() => return Ok(rows.len()),
            _ if Instant::now() < deadline => tokio::time::sleep(POLL_INTERVAL).await,
            _ => return Err(TaskError::Timeout(PRODUCT_ROW_SELECTOR.to_string())),
        }
    }
}

#[async_trait]
impl ScrapeTask for BrowserCatalogTask {
    /// 在独立浏览器会话中抓取一个分类
    ///
    /// 无论抓取成功与否，页面和会话都会被关闭。
    async fn execute(&self, category: Category) -> Result<Vec<Product>, TaskError> {
        info!("Scraping category: {}", category);
        let session = BrowserSession::open(&self.settings).await?;

        let result = match session.browser.new_page("about:blank").await {
            Ok(page) => {
                let result = self.scrape(&page, category).await;
                if let Err(e) = page.close().await {
                    warn!("Failed to close page: {}", e);
                }
                result
            }
            Err(e) => Err(browser_error(e)),
        };

        session.close().await;
        result
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::domain::models::{Category, Product};
use crate::engines::traits::ScrapeTask;

/// 工作池错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// 扇出数量为0，无法启动工作池
    #[error("Fan-out size must be at least 1")]
    InvalidFanOut,
}

/// 抓取工作池
///
/// 对同一个分类并行启动多次完整抓取，并把所有成功任务的结果
/// 按原样拼接。单个任务失败只记录日志，不会让整次运行失败，
/// 结果不做去重。
pub struct WorkerPool {
    task: Arc<dyn ScrapeTask>,
}

impl WorkerPool {
    /// 创建新的工作池
    ///
    /// # 参数
    ///
    /// * `task` - 每个工作器执行的抓取任务
    pub fn new(task: Arc<dyn ScrapeTask>) -> Self {
        Self { task }
    }

    /// 并行执行 `size` 次抓取并聚合结果
    ///
    /// 返回前会等待全部任务结束，没有任务会被遗留在后台。
    /// 任务之间的结果顺序不确定，单个任务内部的顺序保持不变。
    ///
    /// # 参数
    ///
    /// * `category` - 要抓取的分类
    /// * `size` - 并行任务数量
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Product>)` - 所有成功任务结果的拼接，全部失败时为空
    /// * `Err(PoolError)` - 工作池无法启动
    pub async fn run(&self, category: Category, size: usize) -> Result<Vec<Product>, PoolError> {
        if size == 0 {
            return Err(PoolError::InvalidFanOut);
        }

        info!(
            category = %category,
            size,
            task = self.task.name(),
            "Launching scrape workers"
        );

        let mut workers = JoinSet::new();
        for worker in 0..size {
            let task = self.task.clone();
            workers.spawn(async move {
                info!(category = %category, worker, "Start scraper");
                (worker, task.execute(category).await)
            });
        }

        let mut products = Vec::new();
        let mut failed = 0usize;

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((worker, Ok(batch))) => {
                    info!(
                        category = %category,
                        worker,
                        count = batch.len(),
                        "Success scraper"
                    );
                    counter!("scrape_tasks_total", "outcome" => "success").increment(1);
                    counter!("scrape_products_total").increment(batch.len() as u64);
                    products.extend(batch);
                }
                Ok((worker, Err(e))) => {
                    failed += 1;
                    error!(category = %category, worker, "Scraper failed: {}", e);
                    counter!("scrape_tasks_total", "outcome" => "failure").increment(1);
                }
                Err(e) => {
                    failed += 1;
                    error!(category = %category, "Scraper worker aborted: {}", e);
                    counter!("scrape_tasks_total", "outcome" => "failure").increment(1);
                }
            }
        }

        info!(
            category = %category,
            total = products.len(),
            failed,
            "Total of products"
        );

        Ok(products)
    }
}

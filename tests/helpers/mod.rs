// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use catalogrs::domain::models::{Category, Product, StockStatus};
use catalogrs::engines::traits::{ScrapeTask, TaskError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 脚本化抓取任务的单步行为
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Step {
    Products(Vec<Product>),
    Fail,
    Panic,
}

/// 按脚本返回结果的抓取任务替身
///
/// 每次调用消费一个步骤，脚本耗尽后返回空列表。
pub struct ScriptedTask {
    steps: Mutex<VecDeque<Step>>,
    delay: Duration,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedTask {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// 每个步骤都返回同样的商品
    pub fn always(products: Vec<Product>, times: usize) -> Self {
        Self::new(vec![Step::Products(products); times])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScrapeTask for ScriptedTask {
    async fn execute(&self, category: Category) -> Result<Vec<Product>, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match step {
            Some(Step::Products(products)) => Ok(products),
            Some(Step::Fail) => Err(TaskError::Timeout(format!("{} rows", category))),
            Some(Step::Panic) => panic!("scripted task panicked"),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[allow(dead_code)]
pub fn product(title: &str, total: u32) -> Product {
    Product::new(
        title,
        19.99,
        format!("https://shop.example.com/product/{}", title),
        StockStatus::InStock,
        5,
        total,
    )
    .unwrap()
}

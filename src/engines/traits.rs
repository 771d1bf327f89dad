// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{Category, Product};

/// 抓取任务错误类型
#[derive(Error, Debug)]
pub enum TaskError {
    /// 浏览器会话或 CDP 调用失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 等待页面元素超时
    #[error("Timed out waiting for {0}")]
    Timeout(String),
    /// 页面内容无法解析
    #[error("Parse error: {0}")]
    Parse(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 抓取任务特质
///
/// 针对一个分类执行一次完整抓取，返回保持页面顺序的商品列表。
/// 实现者自行管理其浏览器会话，可能较慢且带有副作用。
#[async_trait]
pub trait ScrapeTask: Send + Sync {
    /// 执行抓取
    async fn execute(&self, category: Category) -> Result<Vec<Product>, TaskError>;

    /// 任务名称
    fn name(&self) -> &'static str;
}

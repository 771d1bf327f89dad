// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)").unwrap());

const IN_STOCK_MARKER: &str = "In Stock";

/// 商品构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    #[error("商品标题为空")]
    EmptyTitle,

    #[error("无效价格: {0}")]
    InvalidPrice(f64),

    #[error("缺货商品的库存数量必须为0，实际为 {0}")]
    QuantityWhileOutOfStock(u32),

    #[error("无法解析库存信息: {0}")]
    InvalidStockText(String),
}

/// 库存状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// 从页面上的原始库存文本推导状态和数量
    ///
    /// 包含 `In Stock` 的文本视为有货，数量取第一个括号中的整数；
    /// 其他文本均视为缺货，数量为0。
    ///
    /// # 参数
    ///
    /// * `raw` - 原始库存文本，例如 `In Stock (5)`
    ///
    /// # 返回值
    ///
    /// * `Ok((StockStatus, u32))` - 状态与数量
    /// * `Err(ProductError)` - 有货但没有可解析的数量
    pub fn parse_raw(raw: &str) -> Result<(StockStatus, u32), ProductError> {
        if !raw.contains(IN_STOCK_MARKER) {
            return Ok((StockStatus::OutOfStock, 0));
        }

        let quantity = QUANTITY_PATTERN
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| ProductError::InvalidStockText(raw.to_string()))?;

        Ok((StockStatus::InStock, quantity))
    }
}

/// 商品记录
///
/// 由单次抓取任务产生的不可变值对象。只能通过 [`Product::new`] 构造，
/// 反序列化同样经过校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct")]
pub struct Product {
    title: String,
    price: f64,
    link: String,
    stock_status: StockStatus,
    stock_quantity: u32,
    total: u32,
}

#[derive(Deserialize)]
struct RawProduct {
    title: String,
    price: f64,
    link: String,
    stock_status: StockStatus,
    stock_quantity: u32,
    total: u32,
}

impl TryFrom<RawProduct> for Product {
    type Error = ProductError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        Product::new(
            raw.title,
            raw.price,
            raw.link,
            raw.stock_status,
            raw.stock_quantity,
            raw.total,
        )
    }
}

impl Product {
    /// 创建一个经过校验的商品
    ///
    /// # 参数
    ///
    /// * `title` - 商品标题，不能为空
    /// * `price` - 商品价格，必须是非负有限数
    /// * `link` - 详情页链接，可以为空
    /// * `stock_status` - 库存状态
    /// * `stock_quantity` - 库存数量，缺货时必须为0
    /// * `total` - 抓取时页面报告的分类商品总数
    ///
    /// # 返回值
    ///
    /// * `Ok(Product)` - 新的商品
    /// * `Err(ProductError)` - 违反商品约束
    pub fn new(
        title: impl Into<String>,
        price: f64,
        link: impl Into<String>,
        stock_status: StockStatus,
        stock_quantity: u32,
        total: u32,
    ) -> Result<Self, ProductError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ProductError::EmptyTitle);
        }
        if !price.is_finite() || price < 0.0 {
            return Err(ProductError::InvalidPrice(price));
        }
        if stock_status == StockStatus::OutOfStock && stock_quantity != 0 {
            return Err(ProductError::QuantityWhileOutOfStock(stock_quantity));
        }

        Ok(Self {
            title,
            price,
            link: link.into(),
            stock_status,
            stock_quantity,
            total,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn stock_status(&self) -> StockStatus {
        self.stock_status
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

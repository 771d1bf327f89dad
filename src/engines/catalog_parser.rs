// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{error, warn};
use url::Url;

use crate::domain::models::{Product, StockStatus};
use crate::engines::traits::TaskError;

/// 商品总数元素
pub const PRODUCT_COUNT_SELECTOR: &str = "#product-count";
/// 商品行
pub const PRODUCT_ROW_SELECTOR: &str = "#product-tbody tr";

const MINIMUM_COLUMN_COUNT: usize = 6;

static PRODUCT_COUNT: Lazy<Selector> = Lazy::new(|| Selector::parse(PRODUCT_COUNT_SELECTOR).unwrap());
static PRODUCT_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse(PRODUCT_ROW_SELECTOR).unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static DETAILS_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(".view-details-btn").unwrap());
static NON_PRICE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.]").unwrap());

/// 一次页面解析的结果
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    /// 页面报告的分类商品总数
    pub total: u32,
    /// 按页面顺序解析出的商品
    pub products: Vec<Product>,
    /// 因格式问题被跳过的行数
    pub skipped: usize,
}

/// 解析商品目录页面
///
/// 读取 `#product-count` 作为分类总数，然后逐行解析 `#product-tbody` 中的商品。
/// 单行失败只会跳过该行，不会让整页失败。
///
/// # 参数
///
/// * `html` - 页面HTML
/// * `base_url` - 用于解析相对详情链接的页面地址
///
/// # 返回值
///
/// * `Ok(CatalogPage)` - 解析结果
/// * `Err(TaskError::Parse)` - 页面缺少可用的商品总数
pub fn parse_catalog(html: &str, base_url: &Url) -> Result<CatalogPage, TaskError> {
    let document = Html::parse_document(html);

    let total = document
        .select(&PRODUCT_COUNT)
        .next()
        .ok_or_else(|| TaskError::Parse("product count element not found".to_string()))
        .and_then(|element| {
            let text = element_text(&element);
            text.parse::<u32>()
                .map_err(|e| TaskError::Parse(format!("invalid product count '{}': {}", text, e)))
        })?;

    let mut products = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in document.select(&PRODUCT_ROW).enumerate() {
        let cells: Vec<ElementRef> = row.select(&CELL).collect();
        if cells.len() < MINIMUM_COLUMN_COUNT {
            warn!(row = index, columns = cells.len(), "Row does not have enough columns");
            skipped += 1;
            continue;
        }

        match parse_row(&cells, base_url, total) {
            Ok(product) => products.push(product),
            Err(e) => {
                error!(row = index, "Failed to scrape product: {}", e);
                skipped += 1;
            }
        }
    }

    if products.len() != total as usize {
        warn!(
            expected = total,
            parsed = products.len(),
            "Expected {} products",
            total
        );
    }

    Ok(CatalogPage {
        total,
        products,
        skipped,
    })
}

fn parse_row(cells: &[ElementRef], base_url: &Url, total: u32) -> Result<Product, TaskError> {
    let title = element_text(&cells[1]);

    let price_text = NON_PRICE_CHARS.replace_all(&element_text(&cells[3]), "").into_owned();
    let price = price_text
        .parse::<f64>()
        .map_err(|e| TaskError::Parse(format!("invalid price '{}': {}", price_text, e)))?;

    let (stock_status, stock_quantity) = StockStatus::parse_raw(&element_text(&cells[4]))
        .map_err(|e| TaskError::Parse(e.to_string()))?;

    let link = match cells[5]
        .select(&DETAILS_LINK)
        .next()
        .and_then(|element| element.value().attr("href"))
    {
        Some(href) => base_url
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string()),
        None => {
            warn!("No link found for product: {}", title);
            String::new()
        }
    };

    Product::new(title, price, link, stock_status, stock_quantity, total)
        .map_err(|e| TaskError::Parse(e.to_string()))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

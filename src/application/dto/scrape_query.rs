// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::application::dto::scrape_response::{ValidationDetailDto, ValidationErrorDto};
use crate::domain::models::Category;

/// 抓取请求查询参数
///
/// 分类以原始字符串接收，以便在校验失败时回显输入
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeQueryDto {
    /// 分类名称
    pub category: Option<String>,
}

impl ScrapeQueryDto {
    /// 校验并转换分类
    ///
    /// # 返回值
    ///
    /// * `Ok(Category)` - 已知分类
    /// * `Err(ValidationErrorDto)` - 分类缺失或不在允许列表中
    pub fn category(&self) -> Result<Category, ValidationErrorDto> {
        let input = self.category.as_deref().unwrap_or_default();
        input.parse::<Category>().map_err(|_| {
            let allowed = Category::ALL
                .iter()
                .map(|category| format!("'{}'", category))
                .collect::<Vec<_>>();
            let msg = match allowed.split_last() {
                Some((last, rest)) if !rest.is_empty() => {
                    format!("Input should be {} or {}", rest.join(", "), last)
                }
                _ => format!("Input should be {}", allowed.join(", ")),
            };

            ValidationErrorDto {
                detail: vec![ValidationDetailDto {
                    error_type: if self.category.is_some() {
                        "literal_error".to_string()
                    } else {
                        "missing".to_string()
                    },
                    loc: vec!["query".to_string(), "category".to_string()],
                    msg,
                    input: input.to_string(),
                }],
            }
        })
    }
}

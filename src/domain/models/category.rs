// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 未知分类错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// 商品分类
///
/// 目录页面分类下拉框中的固定选项，顺序与下拉框一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "All Categories")]
    AllCategories,
    #[serde(rename = "Apparel")]
    Apparel,
    #[serde(rename = "Cosmetics")]
    Cosmetics,
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Home Goods")]
    HomeGoods,
}

impl Category {
    /// 按下拉框顺序排列的全部分类
    pub const ALL: [Category; 5] = [
        Category::AllCategories,
        Category::Apparel,
        Category::Cosmetics,
        Category::Electronics,
        Category::HomeGoods,
    ];

    /// 分类在下拉框中的位置
    pub fn position(&self) -> usize {
        match self {
            Category::AllCategories => 0,
            Category::Apparel => 1,
            Category::Cosmetics => 2,
            Category::Electronics => 3,
            Category::HomeGoods => 4,
        }
    }

    /// 分类的显示名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AllCategories => "All Categories",
            Category::Apparel => "Apparel",
            Category::Cosmetics => "Cosmetics",
            Category::Electronics => "Electronics",
            Category::HomeGoods => "Home Goods",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|category| category.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义商品目录的核心值类型
pub mod category;
pub mod product;

pub use category::{Category, UnknownCategory};
pub use product::{Product, ProductError, StockStatus};

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：商品、库存状态和分类
/// - 服务（services）：准入控制和请求编排
///
/// 领域层不依赖于HTTP或浏览器的具体实现，
/// 抓取行为通过 `ScrapeTask` 特质注入。
pub mod models;
pub mod services;

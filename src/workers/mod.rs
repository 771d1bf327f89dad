// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供抓取任务的并行扇出与结果聚合
pub mod pool;

pub use pool::{PoolError, WorkerPool};

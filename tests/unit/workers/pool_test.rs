// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作池测试模块
///
/// 验证扇出、部分失败聚合和任务内顺序
#[cfg(test)]
mod tests {
    use crate::helpers::{product, ScriptedTask, Step};
    use catalogrs::domain::models::Category;
    use catalogrs::workers::pool::{PoolError, WorkerPool};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_results() {
        let batch = vec![product("a", 2), product("b", 2)];
        let task = Arc::new(ScriptedTask::new(vec![
            Step::Products(batch.clone()),
            Step::Fail,
            Step::Products(batch.clone()),
            Step::Products(batch.clone()),
        ]));
        let pool = WorkerPool::new(task.clone());

        let products = pool.run(Category::Electronics, 4).await.unwrap();

        assert_eq!(task.calls(), 4);
        assert_eq!(products.len(), 6);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_result() {
        let task = Arc::new(ScriptedTask::new(vec![Step::Fail, Step::Fail, Step::Fail]));
        let pool = WorkerPool::new(task.clone());

        let products = pool.run(Category::Apparel, 3).await.unwrap();

        assert_eq!(task.calls(), 3);
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_task_counts_as_failure() {
        let task = Arc::new(ScriptedTask::new(vec![
            Step::Panic,
            Step::Products(vec![product("kept", 1)]),
        ]));
        let pool = WorkerPool::new(task);

        let products = pool.run(Category::Cosmetics, 2).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title(), "kept");
    }

    #[tokio::test]
    async fn test_zero_fan_out_is_rejected() {
        let task = Arc::new(ScriptedTask::new(Vec::new()));
        let pool = WorkerPool::new(task.clone());

        let result = pool.run(Category::AllCategories, 0).await;

        assert_eq!(result, Err(PoolError::InvalidFanOut));
        assert_eq!(task.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_worker_preserves_page_order() {
        let batch = vec![product("first", 3), product("second", 3), product("third", 3)];
        let task = Arc::new(ScriptedTask::always(batch.clone(), 1));
        let pool = WorkerPool::new(task);

        let products = pool.run(Category::HomeGoods, 1).await.unwrap();

        assert_eq!(products, batch);
    }

    #[tokio::test]
    async fn test_results_are_not_deduplicated() {
        let task = Arc::new(ScriptedTask::always(vec![product("same", 1)], 3));
        let pool = WorkerPool::new(task);

        let products = pool.run(Category::Electronics, 3).await.unwrap();

        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p.title() == "same"));
    }
}

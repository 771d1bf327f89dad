// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 执行服务测试模块
///
/// 验证许可的获取与归还、过载拒绝以及意外错误路径
#[cfg(test)]
mod tests {
    use crate::helpers::{product, ScriptedTask, Step};
    use catalogrs::config::settings::ConcurrencySettings;
    use catalogrs::domain::models::Category;
    use catalogrs::domain::services::admission_gate::AdmissionGate;
    use catalogrs::domain::services::execute_service::{
        ExecuteError, ExecuteOutcome, ExecuteService,
    };
    use catalogrs::engines::traits::ScrapeTask;
    use catalogrs::workers::pool::{PoolError, WorkerPool};
    use std::sync::Arc;
    use std::time::Duration;

    fn service(task: Arc<dyn ScrapeTask>, work_threads: usize, timeout_ms: u64) -> ExecuteService {
        ExecuteService::from_settings(
            &ConcurrencySettings {
                work_threads,
                acquire_timeout_ms: timeout_ms,
            },
            task,
        )
    }

    #[tokio::test]
    async fn test_admitted_request_aggregates_and_releases_permit() {
        let batch = vec![product("Phone", 2), product("Laptop", 2)];
        let task = Arc::new(ScriptedTask::new(vec![
            Step::Products(batch.clone()),
            Step::Products(batch.clone()),
            Step::Fail,
            Step::Products(batch.clone()),
        ]));
        let service = service(task.clone(), 4, 100);

        let outcome = service.run(Category::Electronics).await.unwrap();

        match outcome {
            ExecuteOutcome::Completed(products) => assert_eq!(products.len(), 6),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(task.calls(), 4);
        assert_eq!(service.gate().available(), 4);
    }

    #[tokio::test]
    async fn test_all_tasks_failing_completes_empty() {
        let task = Arc::new(ScriptedTask::new(vec![Step::Fail, Step::Fail]));
        let service = service(task, 2, 100);

        let outcome = service.run(Category::Apparel).await.unwrap();

        assert_eq!(outcome, ExecuteOutcome::Completed(Vec::new()));
        assert_eq!(service.gate().available(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_is_rejected_while_capacity_is_held() {
        let task = Arc::new(
            ScriptedTask::always(vec![product("Lamp", 1)], 2).with_delay(Duration::from_secs(1)),
        );
        let service = service(task.clone(), 1, 100);

        let (first, second) = tokio::join!(
            service.run(Category::HomeGoods),
            service.run(Category::HomeGoods)
        );

        assert_eq!(
            first.unwrap(),
            ExecuteOutcome::Completed(vec![product("Lamp", 1)])
        );
        assert_eq!(second.unwrap(), ExecuteOutcome::Overloaded);
        assert_eq!(task.calls(), 1);
        assert_eq!(service.gate().available(), 1);
    }

    #[tokio::test]
    async fn test_overloaded_request_runs_no_tasks() {
        let task = Arc::new(ScriptedTask::new(Vec::new()));
        let service = ExecuteService::new(
            Arc::new(AdmissionGate::new(0)),
            Arc::new(WorkerPool::new(task.clone())),
            1,
            Duration::from_millis(10),
        );

        let outcome = service.run(Category::Cosmetics).await.unwrap();

        assert_eq!(outcome, ExecuteOutcome::Overloaded);
        assert_eq!(task.calls(), 0);
    }

    #[tokio::test]
    async fn test_pool_error_propagates_after_release() {
        let task = Arc::new(ScriptedTask::new(Vec::new()));
        let gate = Arc::new(AdmissionGate::new(1));
        let service = ExecuteService::new(
            gate.clone(),
            Arc::new(WorkerPool::new(task)),
            0,
            Duration::from_millis(100),
        );

        let result = service.run(Category::Electronics).await;

        assert!(matches!(
            result,
            Err(ExecuteError::Pool(PoolError::InvalidFanOut))
        ));
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_caller_does_not_leak_permit() {
        let task = Arc::new(
            ScriptedTask::always(vec![product("Shirt", 1)], 1).with_delay(Duration::from_secs(5)),
        );
        let service = Arc::new(service(task, 1, 100));

        let handle = {
            let service = service.clone();
            tokio::spawn(async move { service.run(Category::Apparel).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.gate().in_use(), 1);

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        // The pool task keeps the permit until its scrape finishes
        assert_eq!(service.gate().in_use(), 1);
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(service.gate().available(), 1);
    }
}

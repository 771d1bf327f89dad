// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::histogram;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::config::settings::ConcurrencySettings;
use crate::domain::models::{Category, Product};
use crate::domain::services::admission_gate::{AdmissionError, AdmissionGate};
use crate::engines::traits::ScrapeTask;
use crate::workers::pool::{PoolError, WorkerPool};

/// 请求执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteOutcome {
    /// 已完成，商品列表可能为空
    Completed(Vec<Product>),
    /// 超时内没有可用的准入许可
    Overloaded,
}

/// 请求执行中的意外错误
///
/// 普通的单任务抓取失败由工作池吸收，不会出现在这里。
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Worker pool crashed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// 单个请求的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    AdmissionPending,
    Admitted,
    Running,
    Completed,
    Rejected,
}

impl RequestState {
    /// 判断状态迁移是否合法
    pub fn can_transition_to(self, next: RequestState) -> bool {
        matches!(
            (self, next),
            (RequestState::Idle, RequestState::AdmissionPending)
                | (RequestState::AdmissionPending, RequestState::Admitted)
                | (RequestState::AdmissionPending, RequestState::Rejected)
                | (RequestState::Admitted, RequestState::Running)
                | (RequestState::Running, RequestState::Completed)
        )
    }

    /// 是否为终止状态
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Completed | RequestState::Rejected)
    }

    fn advance(self, next: RequestState) -> RequestState {
        debug_assert!(
            self.can_transition_to(next),
            "illegal request transition {:?} -> {:?}",
            self,
            next
        );
        debug!(from = ?self, to = ?next, "Request state transition");
        next
    }
}

/// 抓取请求执行服务
///
/// 把准入闸门和工作池绑定成单个请求的生命周期：
/// 获取许可 → 运行工作池 → 无条件归还许可。
pub struct ExecuteService {
    gate: Arc<AdmissionGate>,
    pool: Arc<WorkerPool>,
    fan_out: usize,
    acquire_timeout: Duration,
}

impl ExecuteService {
    /// 创建新的执行服务
    ///
    /// # 参数
    ///
    /// * `gate` - 进程级准入闸门
    /// * `pool` - 抓取工作池
    /// * `fan_out` - 每个请求的并行任务数量
    /// * `acquire_timeout` - 获取许可的超时时间
    pub fn new(
        gate: Arc<AdmissionGate>,
        pool: Arc<WorkerPool>,
        fan_out: usize,
        acquire_timeout: Duration,
    ) -> Self {
        Self {
            gate,
            pool,
            fan_out,
            acquire_timeout,
        }
    }

    /// 按配置创建执行服务
    ///
    /// 闸门容量与扇出数量都取自 `work_threads`，因此一个被接纳的请求
    /// 会用满整个扇出预算。
    pub fn from_settings(settings: &ConcurrencySettings, task: Arc<dyn ScrapeTask>) -> Self {
        Self::new(
            Arc::new(AdmissionGate::new(settings.work_threads)),
            Arc::new(WorkerPool::new(task)),
            settings.work_threads,
            settings.acquire_timeout(),
        )
    }

    /// 准入闸门
    pub fn gate(&self) -> &Arc<AdmissionGate> {
        &self.gate
    }

    /// 执行一次分类抓取请求
    ///
    /// 许可在工作池所在的任务中归还，无论工作池正常结束、返回错误还是
    /// 发生 panic，调用方被取消时也不会提前释放容量。
    ///
    /// # 参数
    ///
    /// * `category` - 要抓取的分类，由上游校验
    ///
    /// # 返回值
    ///
    /// * `Ok(ExecuteOutcome::Completed)` - 聚合后的商品列表（可能为空）
    /// * `Ok(ExecuteOutcome::Overloaded)` - 没有可用许可，未执行任何抓取
    /// * `Err(ExecuteError)` - 工作池意外失败，许可已归还
    pub async fn run(&self, category: Category) -> Result<ExecuteOutcome, ExecuteError> {
        let span = tracing::info_span!(
            "execute",
            request_id = %Uuid::new_v4(),
            category = %category
        );
        self.run_admitted(category).instrument(span).await
    }

    async fn run_admitted(&self, category: Category) -> Result<ExecuteOutcome, ExecuteError> {
        let start = Instant::now();
        let state = RequestState::Idle.advance(RequestState::AdmissionPending);

        let permit = match self.gate.try_acquire(self.acquire_timeout).await {
            Ok(permit) => permit,
            Err(AdmissionError::Overloaded) => {
                state.advance(RequestState::Rejected);
                info!("Error no worker available");
                return Ok(ExecuteOutcome::Overloaded);
            }
        };

        let state = state
            .advance(RequestState::Admitted)
            .advance(RequestState::Running);

        let gate = self.gate.clone();
        let pool = self.pool.clone();
        let fan_out = self.fan_out;
        let joined = tokio::spawn(
            async move {
                let result = pool.run(category, fan_out).await;
                gate.release(permit);
                result
            }
            .in_current_span(),
        )
        .await;

        state.advance(RequestState::Completed);
        histogram!("scrape_request_duration_seconds").record(start.elapsed().as_secs_f64());

        let products = joined??;
        Ok(ExecuteOutcome::Completed(products))
    }
}

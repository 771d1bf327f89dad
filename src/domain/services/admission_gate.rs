// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// 准入错误类型
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    /// 在超时时间内没有可用许可
    #[error("No worker available")]
    Overloaded,
}

/// 进程级准入闸门
///
/// 用固定容量的信号量限制整个进程中同时进行的抓取会话数量。
/// 获取许可带有超时，超时后立即以 [`AdmissionError::Overloaded`] 拒绝，
/// 不保留排队的等待者。
#[derive(Clone, Debug)]
pub struct AdmissionGate {
    /// 许可池
    semaphore: Arc<Semaphore>,
    /// 固定容量
    capacity: usize,
}

/// 准入许可
///
/// 释放（`release` 或 drop）时归还到许可池，每个许可只能归还一次。
#[must_use = "dropping a permit releases it immediately"]
#[derive(Debug)]
pub struct Permit {
    inner: Option<OwnedSemaphorePermit>,
    gate: AdmissionGate,
}

impl AdmissionGate {
    /// 创建一个新的准入闸门
    ///
    /// # 参数
    ///
    /// * `capacity` - 许可总数，进程生命周期内不变
    ///
    /// # 返回值
    ///
    /// 返回新的AdmissionGate实例
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// 在超时时间内尝试获取许可
    ///
    /// 已有空闲许可时立即返回，即使超时时间为零。
    ///
    /// # 参数
    ///
    /// * `timeout` - 最长等待时间
    ///
    /// # 返回值
    ///
    /// * `Ok(Permit)` - 获取到的许可
    /// * `Err(AdmissionError::Overloaded)` - 超时内没有可用许可
    pub async fn try_acquire(&self, timeout: Duration) -> Result<Permit, AdmissionError> {
        match tokio::time::timeout(timeout, self.semaphore.clone().acquire_owned()).await {
            Ok(Ok(permit)) => {
                counter!("admission_granted_total").increment(1);
                let permit = Permit {
                    inner: Some(permit),
                    gate: self.clone(),
                };
                self.record_in_use();
                debug!(in_use = self.in_use(), capacity = self.capacity, "Permit acquired");
                Ok(permit)
            }
            // The semaphore is never closed, a closed pool counts as no capacity
            Ok(Err(_)) | Err(_) => {
                counter!("admission_rejected_total").increment(1);
                debug!(
                    capacity = self.capacity,
                    timeout_ms = timeout.as_millis() as u64,
                    "Permit acquisition timed out"
                );
                Err(AdmissionError::Overloaded)
            }
        }
    }

    /// 归还许可
    pub fn release(&self, permit: Permit) {
        permit.release();
    }

    /// 许可总数
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前空闲许可数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// 当前已被持有的许可数
    pub fn in_use(&self) -> usize {
        self.capacity - self.available()
    }

    fn record_in_use(&self) {
        gauge!("admission_permits_in_use").set(self.in_use() as f64);
    }
}

impl Permit {
    /// 归还许可到许可池
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        if let Some(permit) = self.inner.take() {
            drop(permit);
            self.gate.record_in_use();
            debug!(in_use = self.gate.in_use(), "Permit released");
        }
    }
}

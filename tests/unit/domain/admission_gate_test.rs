// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 准入闸门并发测试模块
///
/// 验证并发获取时容量上限始终成立
#[cfg(test)]
mod tests {
    use catalogrs::domain::services::admission_gate::{AdmissionError, AdmissionGate};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_never_exceed_capacity() {
        let gate = AdmissionGate::new(3);

        let attempts = (0..4).map(|_| gate.try_acquire(Duration::from_millis(100)));
        let results = futures::future::join_all(attempts).await;

        let granted: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
        assert_eq!(granted.len(), 3);
        assert_eq!(gate.in_use(), 3);

        drop(granted);
        assert_eq!(gate.available(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_released_permit_can_be_reacquired() {
        let gate = AdmissionGate::new(1);

        let permit = gate.try_acquire(Duration::ZERO).await.unwrap();
        assert_eq!(
            gate.try_acquire(Duration::from_millis(50)).await.unwrap_err(),
            AdmissionError::Overloaded
        );

        gate.release(permit);

        let again = gate.try_acquire(Duration::ZERO).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_zero_capacity_always_rejects() {
        let gate = AdmissionGate::new(0);

        let result = gate.try_acquire(Duration::from_millis(10)).await;

        assert_eq!(result.unwrap_err(), AdmissionError::Overloaded);
        assert_eq!(gate.in_use(), 0);
    }
}

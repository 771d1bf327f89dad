// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 准入闸门（admission_gate）：限制进程内同时进行的抓取会话数量
/// - 执行服务（execute_service）：把准入控制和工作池组合成单个请求的生命周期
pub mod admission_gate;
pub mod execute_service;

pub use admission_gate::{AdmissionError, AdmissionGate, Permit};
pub use execute_service::{ExecuteError, ExecuteOutcome, ExecuteService, RequestState};

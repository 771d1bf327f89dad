// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 没有商品时的响应
#[derive(Debug, Deserialize, Serialize)]
pub struct NotFoundDto {
    pub message_id: String,
}

/// 没有可用工作器时的响应
#[derive(Debug, Deserialize, Serialize)]
pub struct OverloadedDto {
    pub detail: String,
}

/// 查询参数校验失败的响应
#[derive(Debug, Deserialize, Serialize)]
pub struct ValidationErrorDto {
    pub detail: Vec<ValidationDetailDto>,
}

/// 单条校验错误
#[derive(Debug, Deserialize, Serialize)]
pub struct ValidationDetailDto {
    /// 错误类型
    #[serde(rename = "type")]
    pub error_type: String,
    /// 出错参数的位置
    pub loc: Vec<String>,
    /// 错误描述
    pub msg: String,
    /// 原始输入
    pub input: String,
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::dto::{
        scrape_query::ScrapeQueryDto,
        scrape_response::{NotFoundDto, OverloadedDto},
    },
    domain::services::execute_service::{ExecuteOutcome, ExecuteService},
    presentation::errors::AppError,
};

/// 按分类抓取商品
///
/// * 分类无效 → 422
/// * 没有商品 → 404
/// * 没有可用工作器 → 429
/// * 意外错误 → 500
pub async fn scrape_products(
    Extension(service): Extension<Arc<ExecuteService>>,
    Query(query): Query<ScrapeQueryDto>,
) -> Result<Response, AppError> {
    let category = match query.category() {
        Ok(category) => category,
        Err(validation) => {
            warn!(input = ?query.category, "Rejected scrape request with invalid category");
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response());
        }
    };

    let response = match service.run(category).await? {
        ExecuteOutcome::Completed(products) if products.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(NotFoundDto {
                message_id: "Product not found".to_string(),
            }),
        )
            .into_response(),
        ExecuteOutcome::Completed(products) => {
            info!(category = %category, count = products.len(), "Scrape request completed");
            (StatusCode::OK, Json(products)).into_response()
        }
        ExecuteOutcome::Overloaded => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(OverloadedDto {
                detail: "No worker available".to_string(),
            }),
        )
            .into_response(),
    };

    Ok(response)
}

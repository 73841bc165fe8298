//! 健康检查接口，不需要认证

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::models::ApiResponse;
use crate::services::market::MarketService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    /// 最近一次刷新时间，尚未刷新时为空
    pub last_updated: Option<String>,
    /// 当前快照是否为回退数据
    pub stale: bool,
}

/// GET /api/v1/health
pub async fn health_check(service: web::Data<MarketService>) -> Result<HttpResponse> {
    let snapshot = service.snapshot().await;
    let response = ApiResponse::success(HealthStatus {
        status: "ok",
        stale: snapshot.error.is_some(),
        last_updated: snapshot.last_updated,
    });
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

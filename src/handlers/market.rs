//! 行情看板接口处理器
//!
//! ## API 列表
//! - GET /market/snapshot - 获取当前快照（不请求行情接口）
//! - POST /market/refresh - 刷新行情，失败时返回回退快照
//! - GET /market/overview - 获取快照及展示文本
//! - POST /market/prediction - 生成市场预测

use actix_web::{web, HttpResponse, Result};
use crate::models::{ApiResponse, Prediction};
use crate::services::market::{MarketService, PREDICTION_UNAVAILABLE};

/// 获取当前快照
///
/// GET /api/v1/market/snapshot
pub async fn get_snapshot(service: web::Data<MarketService>) -> Result<HttpResponse> {
    let snapshot = service.snapshot().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
}

/// 刷新行情
///
/// POST /api/v1/market/refresh
///
/// 回退数据同样返回 success，提示信息放在 data.error 和 message 中
pub async fn refresh(service: web::Data<MarketService>) -> Result<HttpResponse> {
    let snapshot = service.refresh().await;

    let response = match snapshot.error.clone() {
        Some(advisory) => ApiResponse::success_with_message(snapshot, advisory),
        None => ApiResponse::success(snapshot),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// 获取看板概览
///
/// GET /api/v1/market/overview
pub async fn get_overview(service: web::Data<MarketService>) -> Result<HttpResponse> {
    let overview = service.overview().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(overview)))
}

/// 生成市场预测
///
/// POST /api/v1/market/prediction
pub async fn predict(service: web::Data<MarketService>) -> Result<HttpResponse> {
    match service.predict().await {
        Ok(prediction) => Ok(HttpResponse::Ok().json(ApiResponse::success(prediction))),
        Err(e) => {
            log::warn!("生成预测失败: {}", e);
            let response = ApiResponse::<Prediction>::error(PREDICTION_UNAVAILABLE.to_string());
            Ok(HttpResponse::ServiceUnavailable().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/market")
            .route("/snapshot", web::get().to(get_snapshot))
            .route("/refresh", web::post().to(refresh))
            .route("/overview", web::get().to(get_overview))
            .route("/prediction", web::post().to(predict))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers;
    use crate::services::market::test_support::{config_with_quote_url, serve_once};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    fn service_for(url: &str) -> web::Data<MarketService> {
        web::Data::new(MarketService::new(&config_with_quote_url(url)).unwrap())
    }

    #[actix_web::test]
    async fn test_get_snapshot_returns_seed() {
        let app = test::init_service(
            App::new()
                .app_data(service_for("http://127.0.0.1:1/query"))
                .configure(handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/market/snapshot").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["current"], 60245.35);
        assert_eq!(body["data"]["high52Week"], 62245.43);
        assert_eq!(body["data"]["volume"], "452.1M");
        assert_eq!(body["data"]["loading"], true);
        assert!(body["data"]["lastUpdated"].is_null());
    }

    #[actix_web::test]
    async fn test_refresh_connection_failure_is_advisory() {
        let app = test::init_service(
            App::new()
                .app_data(service_for("http://127.0.0.1:1/query"))
                .configure(handlers::config),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/v1/market/refresh").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Failed to connect to API - showing cached data");
        assert_eq!(body["data"]["error"], "Failed to connect to API - showing cached data");
        assert_eq!(body["data"]["loading"], false);
        assert!(body["data"]["lastUpdated"].is_string());
    }

    #[actix_web::test]
    async fn test_refresh_then_overview() {
        let url = serve_once(
            200,
            r#"{"Global Quote": {"05. price": "70000.00", "06. volume": "123456789", "10. change percent": "0.75%"}}"#,
        )
        .await;
        let app = test::init_service(
            App::new()
                .app_data(service_for(&url))
                .configure(handlers::config),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/v1/market/refresh").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Success");
        assert_eq!(body["data"]["current"], 70000.0);
        assert!(body["data"]["error"].is_null());

        let req = test::TestRequest::get().uri("/api/v1/market/overview").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["currentDisplay"], "70,000");
        assert_eq!(body["data"]["changeDisplay"], "+0.75%");
        assert_eq!(body["data"]["highCaption"], "+3.32% from current");
        assert_eq!(body["data"]["lowCaption"], "-12.42% from current");
        assert_eq!(body["data"]["volumeDisplay"], "123.5M");
        assert_eq!(body["data"]["volumeCaption"], "+8.2% from avg");
    }

    #[actix_web::test]
    async fn test_prediction() {
        let app = test::init_service(
            App::new()
                .app_data(service_for("http://127.0.0.1:1/query"))
                .configure(handlers::config),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/v1/market/prediction").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["trend"], "bullish");
        assert!(body["data"]["text"].as_str().unwrap().ends_with('.'));
        let template = body["data"]["template"].as_str().unwrap();
        assert!(["momentum", "support", "resistance", "analyst"].contains(&template));
    }
}

//! Sensex 行情看板后端服务
//!
//! 为看板页面提供行情快照、回退数据和市场预测的 RESTful API
//! 数据来源：Alpha Vantage

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{App, HttpServer, middleware::{Condition, Logger}, web};
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::market::MarketService;

/// 应用程序入口
///
/// 加载配置，启动时刷新一次行情，然后启动 HTTP 服务器
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &config.loaded_from {
        Some(path) => log::info!("从 {} 加载配置成功", path.display()),
        None => log::info!("使用默认配置"),
    }

    if !config.auth_enabled() {
        log::warn!("未设置 API_KEY，看板接口不启用认证");
    }
    if config.market.quote_api_key == "demo" {
        log::warn!("未设置 QUOTE_API_KEY 环境变量，使用 demo apikey");
    }

    let service = MarketService::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let service = web::Data::new(service);

    // 页面加载时即请求一次行情，不阻塞服务启动
    let startup = service.clone();
    actix_web::rt::spawn(async move {
        startup.refresh().await;
    });

    log::info!("启动 Sensex 看板服务，监听 {}", config.bind_addr());

    let auth_enabled = config.auth_enabled();
    let api_key = config.api.api_key.clone();

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Condition::new(auth_enabled, ApiKeyMiddleware::new(api_key.clone())))  // Bearer Token 认证
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.bind_addr())?
        .run()
        .await
}

//! 中间件模块

pub mod api_key;

pub use api_key::ApiKeyMiddleware;

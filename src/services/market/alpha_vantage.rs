//! Alpha Vantage 行情接口实现
//!
//! 对接 GLOBAL_QUOTE 接口: https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=<symbol>&apikey=<key>
//!
//! 返回格式:
//! {"Global Quote": {"01. symbol": "BSESN.BSE", "05. price": "72500.1200", "06. volume": "452123456", "10. change percent": "1.2400%", ...}}
//!
//! 限流或 apikey 无效时接口仍返回 200，但没有 "Global Quote"，而是 "Note" / "Information" / "Error Message"

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::{ApiConfig, MarketConfig};
use crate::models::MarketSnapshot;
use super::fallback::{FALLBACK_VOLUME, FALLBACK_VOLUME_CHANGE};

pub const GLOBAL_QUOTE_FUNCTION: &str = "GLOBAL_QUOTE";

/// 52 周最高/最低并非真实历史数据，按当前点位的固定倍数推算
pub const HIGH_52_WEEK_FACTOR: f64 = 1.0332;
pub const LOW_52_WEEK_FACTOR: f64 = 0.8758;

/// 行情获取失败
#[derive(Debug, Error)]
pub enum FetchError {
    /// JSON 解析成功但缺少可用的价格字段
    #[error("行情返回结构异常: {0}")]
    UnexpectedShape(String),
    /// 请求失败或超时
    #[error("行情请求失败: {0}")]
    Transport(#[from] reqwest::Error),
    /// 响应体不是 JSON
    #[error("行情响应不是合法 JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl FetchError {
    /// 是否属于连接类失败（请求失败、超时、响应体无法解析）
    pub fn is_connection_failure(&self) -> bool {
        !matches!(self, FetchError::UnexpectedShape(_))
    }
}

/// 从 "Global Quote" 中提取的字段
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalQuote {
    pub price: f64,
    /// 缺失或无法解析时为 0
    pub change_percent: f64,
    pub volume: Option<u64>,
}

/// 行情获取器
pub struct QuoteFetcher {
    client: Client,
    quote_url: String,
    symbol: String,
    api_key: String,
}

impl QuoteFetcher {
    pub fn new(market: &MarketConfig, api: &ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            quote_url: market.quote_url.clone(),
            symbol: market.symbol.clone(),
            api_key: market.quote_api_key.clone(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 请求一次实时行情，不重试
    pub async fn fetch(&self) -> Result<GlobalQuote, FetchError> {
        log::debug!("请求行情数据 URL: {} symbol={}", self.quote_url, self.symbol);

        let response = self
            .client
            .get(&self.quote_url)
            .query(&[
                ("function", GLOBAL_QUOTE_FUNCTION),
                ("symbol", self.symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        // 状态码异常时仍尝试解析响应体，由结构校验决定是否回退
        let status = response.status();
        if !status.is_success() {
            log::warn!("行情接口返回状态码 {}", status);
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        parse_global_quote(&body)
    }
}

/// 解析 GLOBAL_QUOTE 响应
pub fn parse_global_quote(body: &Value) -> Result<GlobalQuote, FetchError> {
    let quote = body
        .get("Global Quote")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            FetchError::UnexpectedShape(
                provider_notice(body).unwrap_or_else(|| "缺少 Global Quote 字段".to_string()),
            )
        })?;

    let price = quote
        .get("05. price")
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| FetchError::UnexpectedShape("缺少有效的 05. price 字段".to_string()))?;

    let change_percent = quote
        .get("10. change percent")
        .and_then(Value::as_str)
        .and_then(|s| s.replace('%', "").trim().parse::<f64>().ok())
        .filter(|c| c.is_finite())
        .unwrap_or(0.0);

    let volume = quote
        .get("06. volume")
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<u64>().ok());

    Ok(GlobalQuote {
        price,
        change_percent,
        volume,
    })
}

/// 接口在限流、apikey 无效时给出的说明文字
fn provider_notice(body: &Value) -> Option<String> {
    ["Note", "Information", "Error Message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(|s| s.to_string())
}

/// 成交量换算为百万单位，保留一位小数，恰好为 .x5 时向上进位
pub fn format_volume(volume: u64) -> String {
    let millions = (volume as f64 / 100_000.0).round() / 10.0;
    format!("{:.1}M", millions)
}

/// 由行情构造新的快照
pub fn snapshot_from_quote(quote: &GlobalQuote, last_updated: String) -> MarketSnapshot {
    MarketSnapshot {
        current: quote.price,
        change_percent: quote.change_percent,
        high_52_week: quote.price * HIGH_52_WEEK_FACTOR,
        low_52_week: quote.price * LOW_52_WEEK_FACTOR,
        volume: quote
            .volume
            .map(format_volume)
            .unwrap_or_else(|| FALLBACK_VOLUME.to_string()),
        volume_change: FALLBACK_VOLUME_CHANGE,
        loading: false,
        error: None,
        last_updated: Some(last_updated),
    }
}

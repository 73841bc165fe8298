//! 行情看板服务
//!
//! 持有唯一的看板快照，负责刷新行情、回退和生成预测
//!
//! ## 数据来源
//! - Alpha Vantage GLOBAL_QUOTE 接口（默认 BSESN.BSE）
//!
//! ## 快照更新规则
//! - 刷新开始：只合并 loading = true、error = None
//! - 刷新成功：整体替换为新行情
//! - 返回结构异常：整体替换为固定常量
//! - 连接失败：保留原数值，只更新 loading / error / lastUpdated

mod alpha_vantage;
mod fallback;
mod format;
mod prediction;

use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::models::{MarketOverview, MarketSnapshot, Prediction};

use alpha_vantage::QuoteFetcher;
use prediction::PredictionError;

pub use prediction::PREDICTION_UNAVAILABLE;

/// 行情看板服务
pub struct MarketService {
    fetcher: QuoteFetcher,
    snapshot: RwLock<MarketSnapshot>,
    // 保证同一时间只有一次刷新
    refresh_lock: Mutex<()>,
    tz: Tz,
    prediction_delay: Duration,
}

impl MarketService {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        config.market.validate()?;

        Ok(Self {
            fetcher: QuoteFetcher::new(&config.market, &config.api)?,
            snapshot: RwLock::new(fallback::seed_snapshot()),
            refresh_lock: Mutex::new(()),
            tz: config.market.tz()?,
            prediction_delay: config.market.prediction_delay(),
        })
    }

    /// 当前快照，不触发网络请求
    pub async fn snapshot(&self) -> MarketSnapshot {
        self.snapshot.read().await.clone()
    }

    /// 当前快照及展示文本
    pub async fn overview(&self) -> MarketOverview {
        format::overview(self.snapshot().await)
    }

    /// 刷新行情
    ///
    /// 任何失败都转换为回退快照，调用方总能拿到可展示的数据
    pub async fn refresh(&self) -> MarketSnapshot {
        let _guard = self.refresh_lock.lock().await;

        {
            let mut snapshot = self.snapshot.write().await;
            snapshot.loading = true;
            snapshot.error = None;
        }

        let outcome = self.fetcher.fetch().await;
        let now = self.clock_label();

        let mut snapshot = self.snapshot.write().await;
        let next = match outcome {
            Ok(quote) => {
                log::info!("{} 行情更新: {:.2} ({}%)", self.fetcher.symbol(), quote.price, quote.change_percent);
                alpha_vantage::snapshot_from_quote(&quote, now)
            }
            Err(e) if e.is_connection_failure() => {
                log::error!("获取行情数据失败: {}", e);
                fallback::connection_failed(&snapshot, now)
            }
            Err(e) => {
                log::warn!("使用回退数据: {}", e);
                fallback::unexpected_shape(now)
            }
        };

        *snapshot = next.clone();
        next
    }

    /// 基于当前快照生成预测，生成前有固定的人为延迟
    pub async fn predict(&self) -> Result<Prediction, PredictionError> {
        tokio::time::sleep(self.prediction_delay).await;

        let snapshot = self.snapshot().await;
        let generated_at = Utc::now().with_timezone(&self.tz).to_rfc3339();
        prediction::generate(&snapshot, &mut rand::rng(), generated_at)
    }

    fn clock_label(&self) -> String {
        format::clock_label(Utc::now().with_timezone(&self.tz))
    }
}

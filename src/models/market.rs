//! 行情看板数据模型
//!
//! 定义看板快照、预测结果和展示用的概览结构

use serde::{Deserialize, Serialize};

/// 看板行情快照
///
/// 整个服务只持有一份，每次刷新整体替换（连接失败时除外）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// 当前点位
    pub current: f64,
    /// 涨跌幅（百分比）
    pub change_percent: f64,
    /// 52 周最高（由当前点位推算）
    pub high_52_week: f64,
    /// 52 周最低（由当前点位推算）
    pub low_52_week: f64,
    /// 成交量显示字符串，如 "452.1M"
    pub volume: String,
    /// 成交量相对均值变化（百分比）
    pub volume_change: f64,
    /// 是否正在刷新
    pub loading: bool,
    /// 提示信息，非空表示数据可能已过期
    pub error: Option<String>,
    /// 最近一次刷新时间
    pub last_updated: Option<String>,
}

/// 预测趋势
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
        }
    }
}

/// 预测文本模板
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PredictionTemplate {
    /// 动量 + 明日涨跌幅
    Momentum,
    /// 技术指标 + 支撑位
    Support,
    /// 走势 + 阻力位
    Resistance,
    /// 分析师涨跌幅 + 关注价位
    Analyst,
}

impl PredictionTemplate {
    pub const ALL: [PredictionTemplate; 4] = [
        PredictionTemplate::Momentum,
        PredictionTemplate::Support,
        PredictionTemplate::Resistance,
        PredictionTemplate::Analyst,
    ];
}

/// 市场预测结果
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// 预测文本
    pub text: String,
    /// 使用的模板
    pub template: PredictionTemplate,
    pub trend: Trend,
    /// 支撑位（当前点位 × 0.985）
    pub support: f64,
    /// 阻力位（当前点位 × 1.015）
    pub resistance: f64,
    /// 生成时间
    pub generated_at: String,
}

/// 看板概览
///
/// 快照加上卡片上直接展示的格式化文本
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub snapshot: MarketSnapshot,
    /// 当前点位，如 "60,245.35"
    pub current_display: String,
    /// 涨跌幅，如 "+1.24%"
    pub change_display: String,
    pub high_display: String,
    /// 如 "+3.32% from current"
    pub high_caption: String,
    pub low_display: String,
    /// 如 "-12.42% from current"
    pub low_caption: String,
    pub volume_display: String,
    /// 如 "+8.2% from avg"
    pub volume_caption: String,
}

//! 市场预测
//!
//! 并非预测模型：从四个固定模板中随机选择一个，代入当前趋势和支撑/阻力位

use rand::Rng;
use thiserror::Error;

use crate::models::{MarketSnapshot, Prediction, PredictionTemplate, Trend};

pub const SUPPORT_FACTOR: f64 = 0.985;
pub const RESISTANCE_FACTOR: f64 = 1.015;
/// 当前点位高于 52 周最高的 95% 视为强势
const STRONG_TREND_RATIO: f64 = 0.95;

/// 无法生成预测时返回给用户的提示
pub const PREDICTION_UNAVAILABLE: &str =
    "Unable to generate prediction at this time. Please try again later.";

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("当前点位无效: {0}")]
    InvalidPrice(f64),
}

/// 模板代入参数
#[derive(Debug, Clone, Copy)]
struct Inputs {
    trend: Trend,
    /// 预计涨跌幅，[0.5, 2.5)
    change: f64,
    support: f64,
    resistance: f64,
    strong: bool,
}

/// 生成一条预测
pub fn generate<R: Rng>(
    snapshot: &MarketSnapshot,
    rng: &mut R,
    generated_at: String,
) -> Result<Prediction, PredictionError> {
    if !snapshot.current.is_finite() || snapshot.current <= 0.0 {
        return Err(PredictionError::InvalidPrice(snapshot.current));
    }

    let inputs = Inputs {
        trend: if snapshot.change_percent >= 0.0 {
            Trend::Bullish
        } else {
            Trend::Bearish
        },
        change: rng.random_range(0.5..2.5),
        support: snapshot.current * SUPPORT_FACTOR,
        resistance: snapshot.current * RESISTANCE_FACTOR,
        strong: snapshot.current > snapshot.high_52_week * STRONG_TREND_RATIO,
    };

    let template = PredictionTemplate::ALL[rng.random_range(0..PredictionTemplate::ALL.len())];

    Ok(Prediction {
        text: render(template, &inputs),
        template,
        trend: inputs.trend,
        support: round2(inputs.support),
        resistance: round2(inputs.resistance),
        generated_at,
    })
}

fn render(template: PredictionTemplate, inputs: &Inputs) -> String {
    let bullish = inputs.trend == Trend::Bullish;
    let trend = inputs.trend.as_str();

    match template {
        PredictionTemplate::Momentum => format!(
            "Sensex shows {} momentum, expected to {} by {:.2}% tomorrow.",
            trend,
            if bullish { "rise" } else { "fall" },
            inputs.change
        ),
        PredictionTemplate::Support => format!(
            "Technical indicators suggest {} {} trend with support at {:.2}.",
            if inputs.strong { "strong" } else { "weak" },
            trend,
            inputs.support
        ),
        PredictionTemplate::Resistance => format!(
            "Market expected to {} with resistance near {:.2}.",
            if bullish { "continue upward" } else { "correct downward" },
            inputs.resistance
        ),
        PredictionTemplate::Analyst => format!(
            "Analysts predict {:.2}% {} in coming session, watch {} levels.",
            inputs.change,
            if bullish { "gain" } else { "decline" },
            if inputs.strong { "resistance" } else { "support" }
        ),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! 回退策略
//!
//! 行情接口不可用时给出固定常量，并用提示信息标注数据可能过期

use crate::models::MarketSnapshot;

pub const FALLBACK_CURRENT: f64 = 60245.35;
pub const FALLBACK_CHANGE_PERCENT: f64 = 1.24;
pub const FALLBACK_HIGH_52_WEEK: f64 = 62245.43;
pub const FALLBACK_LOW_52_WEEK: f64 = 52769.58;
pub const FALLBACK_VOLUME: &str = "452.1M";
pub const FALLBACK_VOLUME_CHANGE: f64 = 8.2;

/// 返回结构不符合预期（多为接口限流）
pub const UNEXPECTED_SHAPE_ADVISORY: &str = "API limit reached - showing cached data";
/// 网络请求失败
pub const CONNECTION_FAILED_ADVISORY: &str = "Failed to connect to API - showing cached data";

/// 服务启动时的初始快照
pub fn seed_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        current: FALLBACK_CURRENT,
        change_percent: FALLBACK_CHANGE_PERCENT,
        high_52_week: FALLBACK_HIGH_52_WEEK,
        low_52_week: FALLBACK_LOW_52_WEEK,
        volume: FALLBACK_VOLUME.to_string(),
        volume_change: FALLBACK_VOLUME_CHANGE,
        loading: true,
        error: None,
        last_updated: None,
    }
}

/// 返回结构异常：整体替换为固定常量
pub fn unexpected_shape(last_updated: String) -> MarketSnapshot {
    MarketSnapshot {
        loading: false,
        error: Some(UNEXPECTED_SHAPE_ADVISORY.to_string()),
        last_updated: Some(last_updated),
        ..seed_snapshot()
    }
}

/// 连接失败：保留上一份快照的数值，只更新状态字段
pub fn connection_failed(previous: &MarketSnapshot, last_updated: String) -> MarketSnapshot {
    MarketSnapshot {
        loading: false,
        error: Some(CONNECTION_FAILED_ADVISORY.to_string()),
        last_updated: Some(last_updated),
        ..previous.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_snapshot() {
        let seed = seed_snapshot();
        assert!(seed.loading);
        assert!(seed.error.is_none());
        assert!(seed.last_updated.is_none());
        assert_eq!(seed.current, 60245.35);
        assert_eq!(seed.volume, "452.1M");
    }

    #[test]
    fn test_unexpected_shape_uses_constants() {
        let snapshot = unexpected_shape("10:15:00 AM".to_string());
        assert_eq!(
            snapshot,
            MarketSnapshot {
                current: 60245.35,
                change_percent: 1.24,
                high_52_week: 62245.43,
                low_52_week: 52769.58,
                volume: "452.1M".to_string(),
                volume_change: 8.2,
                loading: false,
                error: Some("API limit reached - showing cached data".to_string()),
                last_updated: Some("10:15:00 AM".to_string()),
            }
        );
    }

    #[test]
    fn test_connection_failed_preserves_previous_values() {
        let previous = MarketSnapshot {
            current: 71000.0,
            change_percent: -0.42,
            high_52_week: 73357.2,
            low_52_week: 62181.8,
            volume: "12.3M".to_string(),
            volume_change: 8.2,
            loading: true,
            error: None,
            last_updated: Some("9:00:00 AM".to_string()),
        };

        let snapshot = connection_failed(&previous, "9:05:00 AM".to_string());

        assert_eq!(snapshot.current, 71000.0);
        assert_eq!(snapshot.change_percent, -0.42);
        assert_eq!(snapshot.high_52_week, 73357.2);
        assert_eq!(snapshot.low_52_week, 62181.8);
        assert_eq!(snapshot.volume, "12.3M");
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error.as_deref(), Some(CONNECTION_FAILED_ADVISORY));
        assert_eq!(snapshot.last_updated.as_deref(), Some("9:05:00 AM"));
    }
}

//! 看板展示格式化
//!
//! 数字按印度习惯分组（en-IN），如 6024535.1 -> "60,24,535.1"

use chrono::DateTime;
use chrono_tz::Tz;

use crate::models::{MarketOverview, MarketSnapshot};

/// 按 en-IN 分组格式化数字，最多两位小数，去掉末尾的 0
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return "--".to_string();
    }

    let rounded = format!("{:.2}", num.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let sign = if num < 0.0 && rounded != "0.00" { "-" } else { "" };

    let grouped = group_indian(int_part);
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// 最后三位一组，其余每两位一组
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, t) = rest.split_at(rest.len() - 2);
        groups.push(t);
        rest = h;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// 带符号的百分比，非负数前加 "+"
pub fn signed_percent(value: f64) -> String {
    // -0.0 按 0 显示
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{}%", sign, value)
}

/// 相对当前点位的偏离，如 "+3.32% from current"
pub fn relative_caption(value: f64, current: f64) -> String {
    if current == 0.0 || !current.is_finite() || !value.is_finite() {
        return "--".to_string();
    }
    let diff = (value / current - 1.0) * 100.0;
    let sign = if diff >= 0.0 { "+" } else { "" };
    format!("{}{:.2}% from current", sign, diff)
}

/// lastUpdated 显示的时间，如 "3:04:05 PM"
pub fn clock_label(now: DateTime<Tz>) -> String {
    now.format("%-I:%M:%S %p").to_string()
}

/// 构造看板概览
pub fn overview(snapshot: MarketSnapshot) -> MarketOverview {
    MarketOverview {
        current_display: format_number(snapshot.current),
        change_display: signed_percent(snapshot.change_percent),
        high_display: format_number(snapshot.high_52_week),
        high_caption: relative_caption(snapshot.high_52_week, snapshot.current),
        low_display: format_number(snapshot.low_52_week),
        low_caption: relative_caption(snapshot.low_52_week, snapshot.current),
        volume_display: snapshot.volume.clone(),
        volume_caption: format!("{} from avg", signed_percent(snapshot.volume_change)),
        snapshot,
    }
}

use serde_json::Value;

use crate::models::PoolMetrics;

/// Ordered key aliases per logical field. The upstream schema has drifted
/// across API versions, so each metric is looked up under every name it has
/// ever carried; first present, non-null key wins.
pub const ADDRESS_KEYS: &[&str] = &["pair_address", "address"];
pub const TVL_KEYS: &[&str] = &["tvl", "liquidity", "tvl_usd"];
pub const VOLUME_KEYS: &[&str] = &["volume_24h", "trade_volume_24h", "volume_24h_usd"];
pub const FEES_KEYS: &[&str] = &["fees_24h", "fee_24h", "fees"];
pub const PRICE_KEYS: &[&str] = &["current_price", "price"];
pub const APR_KEYS: &[&str] = &["apr", "apr_24h"];
pub const APY_KEYS: &[&str] = &["apy", "apy_24h"];
pub const BASE_FEE_KEYS: &[&str] = &["base_fee_percentage", "base_fee_pct"];
pub const BIN_STEP_KEYS: &[&str] = &["bin_step"];
pub const MINT_X_KEYS: &[&str] = &["mint_x", "token_x_mint"];
pub const MINT_Y_KEYS: &[&str] = &["mint_y", "token_y_mint"];

/// Best-effort float coercion. Accepts numbers and numeric strings
/// (tolerating `%`, thousands separators and surrounding whitespace);
/// anything else yields the default.
pub fn safe_float(value: &Value, default: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::String(s) => {
            let cleaned = s.trim().replace(['%', ','], "");
            cleaned.trim().parse::<f64>().unwrap_or(default)
        }
        _ => default,
    }
}

/// Integer counterpart of [`safe_float`]. Float inputs truncate.
pub fn safe_int(value: &Value, default: i64) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(default),
        _ => default,
    }
}

/// Resolve a metric through its alias list.
pub fn metric(pair: &Value, keys: &[&str], default: f64) -> f64 {
    for key in keys {
        if let Some(v) = pair.get(key) {
            if !v.is_null() {
                return safe_float(v, default);
            }
        }
    }
    default
}

/// Integer counterpart of [`metric`].
pub fn int_metric(pair: &Value, keys: &[&str], default: i64) -> i64 {
    for key in keys {
        if let Some(v) = pair.get(key) {
            if !v.is_null() {
                return safe_int(v, default);
            }
        }
    }
    default
}

fn str_field(pair: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = pair.get(key).and_then(|v| v.as_str()) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

/// The stable identifier for all persisted state. Records without one are
/// dropped by the pipeline.
pub fn pair_address(pair: &Value) -> Option<String> {
    str_field(pair, ADDRESS_KEYS)
}

pub fn mint_x(pair: &Value) -> String {
    str_field(pair, MINT_X_KEYS).unwrap_or_default()
}

pub fn mint_y(pair: &Value) -> String {
    str_field(pair, MINT_Y_KEYS).unwrap_or_default()
}

/// Display name: explicit name, else "X/Y" from token symbols, else the
/// address, else UNKNOWN.
pub fn pair_name(pair: &Value) -> String {
    if let Some(name) = str_field(pair, &["name"]) {
        return name;
    }
    let symbol_x = str_field(pair, &["token_x_symbol", "symbol_x"]);
    let symbol_y = str_field(pair, &["token_y_symbol", "symbol_y"]);
    if let (Some(x), Some(y)) = (symbol_x, symbol_y) {
        return format!("{}/{}", x, y);
    }
    pair_address(pair).unwrap_or_else(|| "UNKNOWN".to_string())
}

pub fn extract_metrics(pair: &Value) -> PoolMetrics {
    PoolMetrics {
        tvl: metric(pair, TVL_KEYS, 0.0),
        volume_24h: metric(pair, VOLUME_KEYS, 0.0),
        fees_24h: metric(pair, FEES_KEYS, 0.0),
        current_price: metric(pair, PRICE_KEYS, 0.0),
        apr: metric(pair, APR_KEYS, 0.0),
        apy: metric(pair, APY_KEYS, 0.0),
        base_fee_pct: metric(pair, BASE_FEE_KEYS, 0.0),
        bin_step: int_metric(pair, BIN_STEP_KEYS, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_float_accepts_numbers_and_numeric_strings() {
        assert_eq!(safe_float(&json!(12.5), 0.0), 12.5);
        assert_eq!(safe_float(&json!("12.5"), 0.0), 12.5);
        assert_eq!(safe_float(&json!(" 12.5 "), 0.0), 12.5);
        assert_eq!(safe_float(&json!("0.25%"), 0.0), 0.25);
        assert_eq!(safe_float(&json!("1,234,567.5"), 0.0), 1_234_567.5);
    }

    #[test]
    fn safe_float_defaults_on_garbage() {
        assert_eq!(safe_float(&json!(null), 1.0), 1.0);
        assert_eq!(safe_float(&json!("abc"), 1.0), 1.0);
        assert_eq!(safe_float(&json!({"nested": 1}), 1.0), 1.0);
        assert_eq!(safe_float(&json!([1, 2]), 1.0), 1.0);
        assert_eq!(safe_float(&json!(true), 1.0), 1.0);
    }

    #[test]
    fn safe_int_truncates_floats() {
        assert_eq!(safe_int(&json!(42), 0), 42);
        assert_eq!(safe_int(&json!(42.9), 0), 42);
        assert_eq!(safe_int(&json!("42"), 0), 42);
        assert_eq!(safe_int(&json!("42.9"), 0), 0);
        assert_eq!(safe_int(&json!(null), 7), 7);
    }

    #[test]
    fn metric_tries_aliases_in_order() {
        let pair = json!({ "liquidity": "5000", "tvl_usd": 9999.0 });
        assert_eq!(metric(&pair, TVL_KEYS, 0.0), 5000.0);

        let pair = json!({ "tvl": null, "tvl_usd": 123.0 });
        assert_eq!(metric(&pair, TVL_KEYS, 0.0), 123.0);

        let pair = json!({ "unrelated": 1 });
        assert_eq!(metric(&pair, TVL_KEYS, 0.0), 0.0);
    }

    #[test]
    fn present_but_malformed_key_coerces_to_default() {
        // First present key wins even when it fails to parse.
        let pair = json!({ "tvl": "n/a", "liquidity": 5000.0 });
        assert_eq!(metric(&pair, TVL_KEYS, 0.0), 0.0);
    }

    #[test]
    fn pair_name_fallback_chain() {
        assert_eq!(pair_name(&json!({"name": "SOL-USDC"})), "SOL-USDC");
        assert_eq!(
            pair_name(&json!({"token_x_symbol": "SOL", "symbol_y": "USDC"})),
            "SOL/USDC"
        );
        assert_eq!(pair_name(&json!({"address": "abc123"})), "abc123");
        assert_eq!(pair_name(&json!({})), "UNKNOWN");
    }

    #[test]
    fn pair_address_requires_non_empty() {
        assert_eq!(pair_address(&json!({"pair_address": "p1"})), Some("p1".into()));
        assert_eq!(pair_address(&json!({"pair_address": "", "address": "a2"})), Some("a2".into()));
        assert_eq!(pair_address(&json!({})), None);
    }

    #[test]
    fn extract_metrics_mixed_shapes() {
        let pair = json!({
            "liquidity": "10,000",
            "trade_volume_24h": 5000.0,
            "fees": "50",
            "price": "1.0",
            "apr": "12.5%",
            "bin_step": 20
        });
        let m = extract_metrics(&pair);
        assert_eq!(m.tvl, 10_000.0);
        assert_eq!(m.volume_24h, 5000.0);
        assert_eq!(m.fees_24h, 50.0);
        assert_eq!(m.current_price, 1.0);
        assert_eq!(m.apr, 12.5);
        assert_eq!(m.apy, 0.0);
        assert_eq!(m.bin_step, 20);
    }
}

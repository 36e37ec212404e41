use serde::{de, Deserialize, Deserializer};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Trims a user-supplied string, returning `None` if nothing is left.
pub fn sanitize(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Deserializes an integer that may arrive as a JSON number or as a numeric string. Fractions are truncated.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where D: Deserializer<'de> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| de::Error::custom(format!("{n} is not an integer"))),
        serde_json::Value::String(s) => {
            let s = s.trim();
            let whole = s.split_once('.').map(|(w, _)| w).unwrap_or(s);
            whole.parse::<i64>().map_err(|e| de::Error::custom(format!("'{s}' is not an integer. {e}")))
        },
        other => Err(de::Error::custom(format!("{other} is not an integer"))),
    }
}

/// Deserializes an optional string field that some senders encode as a JSON number (e.g. `"status_code": 200`).
///
/// Numbers are rendered the way a JavaScript sender would stringify them: whole-valued floats lose their fractional
/// part (`10000.00` becomes `"10000"`), so signatures computed by such senders still match. Strings are kept verbatim.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(render_number(&n))),
        Some(other) => Err(de::Error::custom(format!("{other} is not a string"))),
    }
}

// Beyond 2^53 a float no longer holds every integer exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn render_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT) {
            #[allow(clippy::cast_possible_truncation)]
            return (f as i64).to_string();
        }
    }
    n.to_string()
}

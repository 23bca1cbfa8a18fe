//! Context block rendering.

use crate::types::{render_value, FactRecord};

/// Render facts as the context block sent to the model.
///
/// One newline-terminated line per fact, in the given order:
/// `[<index>, Score: <score>]: <field>:<value>, <field>:<value>`.
/// Internal fields are omitted. No facts yields an empty string.
pub fn build_context(facts: &[FactRecord]) -> String {
    let mut context = String::new();
    for fact in facts {
        context.push_str(&render_fact(fact));
        context.push('\n');
    }
    context
}

/// Render a single fact without the trailing newline.
pub fn render_fact(fact: &FactRecord) -> String {
    let fields: Vec<String> = fact
        .visible_fields()
        .map(|(name, value)| format!("{}:{}", name, single_line(&render_value(value))))
        .collect();

    format!(
        "[{}, Score: {}]: {}",
        fact.index,
        format_score(fact.score),
        fields.join(", ")
    )
}

/// Render a score the way Python's `repr(float)` does: shortest round-trip
/// digits, ".0" on whole numbers, and exponent form ("1e-07", "1.5e+16")
/// below 1e-4 or from 1e16 up.
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        return "nan".to_string();
    }
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", score);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if score != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let fixed = score.to_string();
    if fixed.contains('.') {
        fixed
    } else {
        format!("{}.0", fixed)
    }
}

// Values spanning lines would break the one-line-per-fact layout
fn single_line(value: &str) -> String {
    if value.contains(['\n', '\r']) {
        value.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        value.to_string()
    }
}

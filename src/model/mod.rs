//! Data model for search runs
//!
//! Requests are immutable once a run starts; records are flat and carry the
//! page they were fetched from.

mod product;
mod request;
mod review;

pub use product::Product;
pub use request::{Country, ReviewRequest, ReviewSort, SearchRequest, SearchSort};
pub use review::Review;

use serde::{Deserialize, Deserializer};

/// Parses a numeric field that the backend may send as a number or as text
///
/// Marketplace payloads mix `129.9`, `"129,90"`, `"R$ 1.299,90"` and
/// `"$1,299.90"`; the first number in the text is used and its right-most
/// separator is taken as the decimal point.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(text)) => parse_decimal_text(&text),
        None => None,
    })
}

/// Parses a count field that may arrive as a number or as text ("1.234 ratings")
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => u32::try_from(n).ok(),
        Some(Raw::Text(text)) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        None => None,
    })
}

fn parse_decimal_text(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let kept = kept.trim_end_matches([',', '.']);

    let Some(idx) = kept.rfind([',', '.']) else {
        return kept.parse().ok();
    };

    let (whole, rest) = kept.split_at(idx);
    let separator = if rest.starts_with(',') { ',' } else { '.' };
    let other = if separator == ',' { '.' } else { ',' };
    let fraction = &rest[1..];
    let whole_digits: String = whole.chars().filter(char::is_ascii_digit).collect();

    // Mixed separators: the last one is the decimal point ("1.299,90", "1,299.90").
    // A repeated separator, or a single one followed by exactly three digits,
    // groups thousands ("1.299", "12.345.678", "$1,299").
    let is_decimal = if whole.contains(other) {
        true
    } else if whole.contains(separator) {
        false
    } else {
        fraction.len() != 3 || whole_digits.chars().all(|c| c == '0')
    };

    let normalized = if is_decimal {
        format!("{}.{}", whole_digits, fraction)
    } else {
        format!("{}{}", whole_digits, fraction)
    };

    normalized.parse().ok()
}

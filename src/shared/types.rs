use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A reading as served by the API. Every field may be missing or carry the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReading {
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperatura: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub umidade: Option<f64>,
}

/// A fully-defaulted reading. Downstream code never needs to re-check fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
}

impl From<RawReading> for Reading {
    fn from(raw: RawReading) -> Self {
        let timestamp = raw
            .timestamp
            .filter(|t| !t.is_empty())
            .or(raw.created_at)
            .unwrap_or_default();
        Self {
            timestamp,
            temperature: measure(raw.temperatura),
            humidity: measure(raw.umidade),
        }
    }
}

impl Reading {
    /// Normalizes one element of an API response. Non-objects become an all-default reading.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value::<RawReading>(value)
            .unwrap_or_default()
            .into()
    }
}

// 0 and NaN count as absent
fn measure(v: Option<f64>) -> f64 {
    v.filter(|x| x.is_finite()).unwrap_or(0.0)
}

fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    })
}

/// Which history collection to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryQuery {
    All,
    Day(NaiveDate),
}

impl HistoryQuery {
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            HistoryQuery::All => None,
            HistoryQuery::Day(d) => Some(*d),
        }
    }
}

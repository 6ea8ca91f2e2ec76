use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Contents of `request.json`. Only the start and goal are required.
///
/// Keys the plot does not read are ignored, whatever their type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub sx: f64,
    pub sy: f64,
    pub gx: f64,
    pub gy: f64,
    #[serde(default, deserialize_with = "numbers_or_empty")]
    pub ox: Vec<f64>,
    #[serde(default, deserialize_with = "numbers_or_empty")]
    pub oy: Vec<f64>,
    // Headings in radians, 0 -> +x, pi/2 -> +y
    #[serde(default, deserialize_with = "number_or_none")]
    pub syaw: Option<f64>,
    #[serde(default, deserialize_with = "number_or_none")]
    pub gyaw: Option<f64>,
}

impl PlanRequest {
    pub fn start(&self) -> (f64, f64) {
        (self.sx, self.sy)
    }

    pub fn goal(&self) -> (f64, f64) {
        (self.gx, self.gy)
    }

    pub fn obstacles(&self) -> Vec<(f64, f64)> {
        self.ox.iter().copied().zip(self.oy.iter().copied()).collect()
    }
}

/// Contents of `response.json`. Every field is optional and `null` reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanResponse {
    #[serde(deserialize_with = "truthy")]
    pub ok: bool,
    #[serde(deserialize_with = "numbers_or_empty")]
    pub x: Vec<f64>,
    #[serde(deserialize_with = "numbers_or_empty")]
    pub y: Vec<f64>,
    #[serde(deserialize_with = "number_or_none")]
    pub cost: Option<f64>,
    #[serde(deserialize_with = "text_or_none")]
    pub error: Option<String>,
}

impl PlanResponse {
    /// A path is drawn only for a successful response with coordinates on both axes.
    pub fn has_path(&self) -> bool {
        self.ok && !self.x.is_empty() && !self.y.is_empty()
    }

    pub fn path(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

// Log writers are not strict about these fields, so anything that is not the
// expected shape degrades to "no data" instead of failing the whole file.

fn numbers_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items.iter().filter_map(Value::as_f64).collect(),
        _ => Vec::new(),
    })
}

fn number_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(d)?.as_f64())
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
}

fn text_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

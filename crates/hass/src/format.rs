//! Entity state snapshots and their one-line summaries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State of one entity as returned by `GET /api/states/{entity_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub entity_id: Option<String>,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Formatted view of a snapshot: the raw state and a descriptive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    pub state: String,
    pub attributes: String,
}

impl StateSnapshot {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            entity_id: None,
            state: state.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Render the known attributes, in a fixed order, after the state.
    pub fn summarize(&self) -> StateSummary {
        let mut parts = vec![format!("state: {}", self.state)];

        if let Some(title) = self.attribute("media_title") {
            parts.push(format!("playing: {}", display(title)));
        }
        if let Some(volume) = self.attribute("volume_level") {
            parts.push(format!("volume: {}", display(volume)));
        }
        if let Some(kelvin) = self.attribute("color_temp_kelvin") {
            parts.push(format!("color temperature: {}K", display(kelvin)));
        }
        if let Some(rgb) = self.attribute("rgb_color") {
            parts.push(format!("rgb color: {}", display(rgb)));
        }
        if let Some(brightness) = self.attribute("brightness") {
            match brightness.as_f64() {
                Some(raw) => parts.push(format!("brightness: {}%", brightness_pct(raw))),
                None => tracing::debug!(?brightness, "skipping non-numeric brightness"),
            }
        }

        StateSummary {
            state: self.state.clone(),
            attributes: parts.join(", "),
        }
    }

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }
}

/// Convert a 0-255 brightness to a rounded percentage.
pub fn brightness_pct(raw: f64) -> i64 {
    (raw / 255.0 * 100.0).round() as i64
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_only() {
        let summary = StateSnapshot::new("off").summarize();
        assert_eq!(summary.state, "off");
        assert_eq!(summary.attributes, "state: off");
    }

    #[test]
    fn brightness_is_rescaled_and_rounded() {
        let summary = StateSnapshot::new("on")
            .with_attribute("brightness", json!(128))
            .summarize();
        assert_eq!(summary.attributes, "state: on, brightness: 50%");
        assert_eq!(brightness_pct(255.0), 100);
        assert_eq!(brightness_pct(0.0), 0);
    }

    #[test]
    fn fixed_order_regardless_of_input_order() {
        let summary = StateSnapshot::new("playing")
            .with_attribute("brightness", json!(255))
            .with_attribute("rgb_color", json!([255, 0, 10]))
            .with_attribute("color_temp_kelvin", json!(4000))
            .with_attribute("volume_level", json!(0.35))
            .with_attribute("media_title", json!("Blue in Green"))
            .with_attribute("friendly_name", json!("Study"))
            .summarize();
        assert_eq!(
            summary.attributes,
            "state: playing, playing: Blue in Green, volume: 0.35, \
             color temperature: 4000K, rgb color: [255, 0, 10], brightness: 100%"
        );
    }

    #[test]
    fn null_values_are_skipped() {
        let summary = StateSnapshot::new("off")
            .with_attribute("brightness", Value::Null)
            .with_attribute("rgb_color", Value::Null)
            .summarize();
        assert_eq!(summary.attributes, "state: off");
    }

    #[test]
    fn volume_is_not_rescaled() {
        let summary = StateSnapshot::new("idle")
            .with_attribute("volume_level", json!(1.0))
            .summarize();
        assert_eq!(summary.attributes, "state: idle, volume: 1.0");
    }

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "entity_id": "light.bedroom",
            "state": "on",
            "attributes": {"brightness": 64, "friendly_name": "Bedroom"},
            "last_changed": "2024-01-01T00:00:00+00:00"
        }"#;
        let snapshot: StateSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.entity_id.as_deref(), Some("light.bedroom"));
        assert_eq!(snapshot.summarize().attributes, "state: on, brightness: 25%");
    }
}

//! Maps operations onto Home Assistant service calls.

use crate::entity::EntityId;
use crate::operation::Operation;
use serde_json::{Map, Value, json};

/// Relative brightness change applied by `brightness_up`/`brightness_down`.
pub const BRIGHTNESS_STEP_PCT: i64 = 10;

/// A fully resolved service invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: &'static str,
    pub entity_id: String,
    pub params: Map<String, Value>,
    /// Human-readable outcome reported back on success.
    pub description: String,
}

impl ServiceCall {
    /// Request path relative to the API base URL.
    pub fn path(&self) -> String {
        format!("/api/services/{}/{}", self.domain, self.service)
    }

    /// JSON body: `entity_id` followed by the operation parameters.
    pub fn body(&self) -> Value {
        let mut body = Map::with_capacity(self.params.len() + 1);
        body.insert("entity_id".into(), Value::String(self.entity_id.clone()));
        body.extend(self.params.clone());
        Value::Object(body)
    }
}

/// Resolve the service call for `operation` on `entity`.
pub fn resolve(entity: &EntityId, operation: Operation) -> ServiceCall {
    let domain = entity.domain();
    let (service, params, description) = match operation {
        Operation::TurnOn => (
            overridden(domain, "turn_on", Some("open_cover"), Some("start"), None),
            None,
            "device turned on".to_string(),
        ),
        Operation::TurnOff => (
            overridden(domain, "turn_off", Some("close_cover"), Some("stop"), None),
            None,
            "device turned off".to_string(),
        ),
        Operation::Pause => (
            overridden(
                domain,
                "pause",
                Some("stop_cover"),
                Some("pause"),
                Some("media_pause"),
            ),
            None,
            "device paused".to_string(),
        ),
        Operation::Continue => (
            overridden(domain, "continue", None, Some("start"), Some("media_play")),
            None,
            "device resumed".to_string(),
        ),
        Operation::BrightnessUp => (
            "turn_on",
            Some(json!({ "brightness_step_pct": BRIGHTNESS_STEP_PCT })),
            "brightness increased".to_string(),
        ),
        Operation::BrightnessDown => (
            "turn_on",
            Some(json!({ "brightness_step_pct": -BRIGHTNESS_STEP_PCT })),
            "brightness decreased".to_string(),
        ),
        Operation::BrightnessValue(pct) => (
            "turn_on",
            Some(json!({ "brightness_pct": pct })),
            format!("brightness set to {pct}%"),
        ),
        Operation::SetColor([r, g, b]) => (
            "turn_on",
            Some(json!({ "rgb_color": [r, g, b] })),
            format!("color set to [{r}, {g}, {b}]"),
        ),
        Operation::SetKelvin(kelvin) => (
            "turn_on",
            Some(json!({ "color_temp_kelvin": kelvin })),
            format!("color temperature set to {kelvin}K"),
        ),
        Operation::VolumeUp => ("volume_up", None, "volume increased".to_string()),
        Operation::VolumeDown => ("volume_down", None, "volume decreased".to_string()),
        Operation::VolumeSet(pct) => (
            "volume_set",
            Some(json!({ "volume_level": f64::from(pct) / 100.0 })),
            format!("volume set to {pct}%"),
        ),
        Operation::VolumeMute(muted) => (
            "volume_mute",
            Some(json!({ "is_volume_muted": muted })),
            (if muted { "muted" } else { "unmuted" }).to_string(),
        ),
        Operation::SetTemperature(degrees) => (
            "set_temperature",
            Some(json!({ "temperature": degrees })),
            format!("temperature set to {degrees}"),
        ),
    };

    let params = match params {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    ServiceCall {
        domain: domain.to_string(),
        service,
        entity_id: entity.to_string(),
        params,
        description,
    }
}

/// Pick the domain-specific service name, falling back to `default`.
fn overridden(
    domain: &str,
    default: &'static str,
    cover: Option<&'static str>,
    vacuum: Option<&'static str>,
    media_player: Option<&'static str>,
) -> &'static str {
    let special = match domain {
        "cover" => cover,
        "vacuum" => vacuum,
        "media_player" => media_player,
        _ => None,
    };
    special.unwrap_or(default)
}

//! End-to-end tool tests against a mocked Home Assistant.

mod common;

use common::{MockHass, TOKEN};
use hass::{TargetArgs, ToolOutcome};
use mcp::ToolHandler;
use serde_json::{Value, json};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn expect_no_requests(hass: &MockHass) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&hass.server)
        .await;
}

#[tokio::test]
async fn set_brightness_posts_service_call() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/light/turn_on"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({"entity_id": "light.bedroom", "brightness_pct": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass
        .tools
        .set_state("light.bedroom", &TargetArgs::new("brightness_value").with_input(50))
        .await;

    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.message, "brightness set to 50%");
}

#[tokio::test]
async fn brightness_up_steps_by_fixed_percent() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/light/turn_on"))
        .and(body_json(json!({
            "entity_id": "light.desk",
            "brightness_step_pct": hass::BRIGHTNESS_STEP_PCT
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass
        .tools
        .set_state("light.desk", &TargetArgs::new("brightness_up"))
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "brightness increased");
}

#[tokio::test]
async fn cover_turn_on_opens_cover() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/cover/open_cover"))
        .and(body_json(json!({"entity_id": "cover.garage"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass
        .tools
        .set_state("cover.garage", &TargetArgs::new("turn_on"))
        .await;
    assert!(outcome.success);
}

#[tokio::test]
async fn volume_set_sends_fraction() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/media_player/volume_set"))
        .and(body_json(json!({"entity_id": "media_player.study", "volume_level": 0.5})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass
        .tools
        .set_state("media_player.study", &TargetArgs::new("volume_set").with_input(50))
        .await;
    assert!(outcome.success);
}

#[tokio::test]
async fn service_error_is_reported_not_raised() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/climate/set_temperature"))
        .respond_with(ResponseTemplate::new(500).set_body_string("entity unavailable"))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass
        .tools
        .set_state("climate.ac", &TargetArgs::new("set_temperature").with_input(26))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.status, Some(500));
    assert_eq!(outcome.details.as_deref(), Some("entity unavailable"));
}

#[tokio::test]
async fn invalid_entity_id_fails_before_request() {
    let hass = MockHass::start().await;
    expect_no_requests(&hass).await;

    let outcome = hass
        .tools
        .set_state("bedroom", &TargetArgs::new("turn_on"))
        .await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("invalid entity id"));

    let outcome = hass.tools.get_state("bedroom").await;
    assert!(!outcome.success);
}

#[tokio::test]
async fn entity_id_cannot_rewrite_the_request_path() {
    let hass = MockHass::start().await;
    Mock::given(path("/api/services/lock/unlock"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&hass.server)
        .await;
    expect_no_requests(&hass).await;

    let outcome = hass
        .tools
        .set_state("lock/unlock#.front_door", &TargetArgs::new("turn_on"))
        .await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("invalid entity id"));

    let outcome = hass.tools.get_state("light.a?x=1").await;
    assert!(!outcome.success);

    let outcome = hass.tools.play_media("media_player.a/b", "random").await;
    assert!(!outcome.success);
}

#[tokio::test]
async fn rgb_out_of_range_fails_before_request() {
    let hass = MockHass::start().await;
    expect_no_requests(&hass).await;

    let outcome = hass
        .tools
        .set_state(
            "light.kitchen",
            &TargetArgs::new("set_color").with_rgb(vec![256, 0, 0]),
        )
        .await;
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("validation error"));
    assert_eq!(outcome.status, None);
}

#[tokio::test]
async fn unsupported_operation_fails_before_request() {
    let hass = MockHass::start().await;
    expect_no_requests(&hass).await;

    let outcome = hass
        .tools
        .set_state("light.kitchen", &TargetArgs::new("self_destruct"))
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "unsupported operation: self_destruct");
}

#[tokio::test]
async fn get_state_formats_attributes() {
    let hass = MockHass::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states/light.bedroom"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entity_id": "light.bedroom",
            "state": "on",
            "attributes": {
                "friendly_name": "Bedroom",
                "brightness": 128,
                "color_temp_kelvin": 3000,
                "rgb_color": [255, 167, 87]
            }
        })))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass.tools.get_state("light.bedroom").await;
    assert!(outcome.success);
    assert_eq!(outcome.state.as_deref(), Some("on"));
    assert_eq!(
        outcome.attributes.as_deref(),
        Some("state: on, color temperature: 3000K, rgb color: [255, 167, 87], brightness: 50%")
    );
}

#[tokio::test]
async fn get_state_unknown_entity() {
    let hass = MockHass::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states/light.ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Entity not found."))
        .mount(&hass.server)
        .await;

    let outcome = hass.tools.get_state("light.ghost").await;
    assert!(!outcome.success);
    assert_eq!(outcome.status, Some(404));
    assert_eq!(outcome.details.as_deref(), Some("Entity not found."));
}

#[tokio::test]
async fn get_state_rejects_malformed_body() {
    let hass = MockHass::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states/sensor.broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&hass.server)
        .await;

    let outcome = hass.tools.get_state("sensor.broken").await;
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("invalid response"));
}

#[tokio::test]
async fn play_media_uses_music_assistant() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/music_assistant/play_media"))
        .and(body_json(json!({"entity_id": "media_player.study", "media_id": "random"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass.tools.play_media("media_player.study", "random").await;
    assert!(outcome.success);
    assert_eq!(outcome.response, Some(json!([])));
}

#[tokio::test]
async fn play_media_uses_configured_domain() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/media_player/play_media"))
        .and(body_json(json!({"entity_id": "media_player.study", "media_id": "Abbey Road"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hass.server)
        .await;

    let tools = hass.tools.clone().with_media_domain("media_player");
    let outcome = tools.play_media("media_player.study", "Abbey Road").await;
    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.response, Some(Value::Null));
}

#[tokio::test]
async fn play_media_failure_is_reported() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/music_assistant/play_media"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider offline"))
        .expect(1)
        .mount(&hass.server)
        .await;

    let outcome = hass.tools.play_media("media_player.study", "random").await;
    assert!(!outcome.success);
    assert_eq!(outcome.status, Some(500));
    assert_eq!(outcome.details.as_deref(), Some("provider offline"));
    assert_eq!(outcome.response, None);
}

#[tokio::test]
async fn transport_failure_is_reported() {
    let client = hass::HassClient::builder("http://127.0.0.1:1", TOKEN)
        .build()
        .unwrap();
    let tools = hass::HassTools::new(client);

    let outcome = tools.get_state("light.bedroom").await;
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("transport error"));
}

#[tokio::test]
async fn mcp_call_returns_outcome_json() {
    let hass = MockHass::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/vacuum/pause"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hass.server)
        .await;

    let result = hass
        .tools
        .call(
            "set_state",
            json!({"entity_id": "vacuum.robot", "target": {"type": "pause"}}),
        )
        .await
        .unwrap();

    assert!(!result.is_error);
    let text = result.content[0].as_text().unwrap();
    let outcome: ToolOutcome = serde_json::from_str(text).unwrap();
    assert_eq!(outcome.message, "device paused");
}

#[tokio::test]
async fn mcp_call_with_bad_arguments_still_responds() {
    let hass = MockHass::start().await;
    expect_no_requests(&hass).await;

    let result = hass
        .tools
        .call("get_state", json!({"entity": "light.bedroom"}))
        .await
        .unwrap();

    assert!(result.is_error);
    let outcome: Value = serde_json::from_str(result.content[0].as_text().unwrap()).unwrap();
    assert_eq!(outcome["success"], false);
}

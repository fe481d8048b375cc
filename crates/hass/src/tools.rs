//! Tool entry points exposed to the calling agent.
//!
//! Every tool answers with a [`ToolOutcome`]. Errors are folded into a
//! failure outcome here and never escape to the caller.

use crate::client::HassClient;
use crate::dispatch;
use crate::entity::EntityId;
use crate::operation::{OPERATION_NAMES, Operation, TargetArgs};
use crate::{Error, Result};
use mcp::{CallToolResult, Tool, ToolHandler};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const PLAY_MEDIA: &str = "play_media";
pub const GET_STATE: &str = "get_state";
pub const SET_STATE: &str = "set_state";

/// Media id used when the agent does not name one.
pub const DEFAULT_MEDIA_CONTENT_ID: &str = "random";

/// Service domain providing `play_media` by default.
pub const DEFAULT_MEDIA_DOMAIN: &str = "music_assistant";

/// Structured result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            state: None,
            attributes: None,
            response: None,
            status: None,
            details: None,
        }
    }

    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            state: None,
            attributes: None,
            response: None,
            status: error.status(),
            details: error.details().map(str::to_string),
        }
    }

    fn from_result(result: Result<Self>) -> Self {
        result.unwrap_or_else(|e| Self::failure(&e))
    }
}

#[derive(Debug, Deserialize)]
struct PlayMediaArgs {
    entity_id: String,
    #[serde(default = "default_media_content_id")]
    media_content_id: String,
}

fn default_media_content_id() -> String {
    DEFAULT_MEDIA_CONTENT_ID.to_string()
}

#[derive(Debug, Deserialize)]
struct GetStateArgs {
    entity_id: String,
}

#[derive(Debug, Deserialize)]
struct SetStateArgs {
    entity_id: String,
    target: TargetArgs,
}

/// The Home Assistant tool set, bound to one client.
#[derive(Debug, Clone)]
pub struct HassTools {
    client: HassClient,
    media_domain: String,
}

impl HassTools {
    pub fn new(client: HassClient) -> Self {
        Self {
            client,
            media_domain: DEFAULT_MEDIA_DOMAIN.to_string(),
        }
    }

    /// Use another integration's `play_media` service.
    pub fn with_media_domain(mut self, domain: impl Into<String>) -> Self {
        self.media_domain = domain.into();
        self
    }

    pub fn client(&self) -> &HassClient {
        &self.client
    }

    /// Play music or an audiobook on a media player.
    pub async fn play_media(&self, entity_id: &str, media_content_id: &str) -> ToolOutcome {
        let outcome =
            ToolOutcome::from_result(self.try_play_media(entity_id, media_content_id).await);
        log_outcome(PLAY_MEDIA, entity_id, &outcome);
        outcome
    }

    /// Read an entity's state and summarize its known attributes.
    pub async fn get_state(&self, entity_id: &str) -> ToolOutcome {
        let outcome = ToolOutcome::from_result(self.try_get_state(entity_id).await);
        log_outcome(GET_STATE, entity_id, &outcome);
        outcome
    }

    /// Apply one operation to an entity.
    pub async fn set_state(&self, entity_id: &str, target: &TargetArgs) -> ToolOutcome {
        tracing::info!(entity_id, ?target, "set_state");
        let outcome = ToolOutcome::from_result(self.try_set_state(entity_id, target).await);
        log_outcome(SET_STATE, entity_id, &outcome);
        outcome
    }

    async fn try_play_media(&self, entity_id: &str, media_content_id: &str) -> Result<ToolOutcome> {
        let entity = EntityId::parse(entity_id)?;
        let body = json!({
            "entity_id": entity.as_str(),
            "media_id": media_content_id,
        });
        let response = self
            .client
            .post_service(&self.media_domain, "play_media", &body)
            .await?;

        let mut outcome = ToolOutcome::success(format!("playing {media_content_id} on {entity}"));
        outcome.response = Some(response);
        Ok(outcome)
    }

    async fn try_get_state(&self, entity_id: &str) -> Result<ToolOutcome> {
        let entity = EntityId::parse(entity_id)?;
        let summary = self.client.get_state(&entity).await?.summarize();

        let mut outcome = ToolOutcome::success(summary.attributes.clone());
        outcome.state = Some(summary.state);
        outcome.attributes = Some(summary.attributes);
        Ok(outcome)
    }

    async fn try_set_state(&self, entity_id: &str, target: &TargetArgs) -> Result<ToolOutcome> {
        let entity = EntityId::parse(entity_id)?;
        let operation = Operation::try_from(target)?;
        let call = dispatch::resolve(&entity, operation);
        self.client.call_service(&call).await?;
        Ok(ToolOutcome::success(call.description))
    }
}

fn log_outcome(tool: &str, entity_id: &str, outcome: &ToolOutcome) {
    if outcome.success {
        tracing::info!(tool, entity_id, message = %outcome.message, "tool succeeded");
    } else {
        tracing::error!(
            tool,
            entity_id,
            message = %outcome.message,
            status = ?outcome.status,
            "tool failed"
        );
    }
}

impl ToolHandler for HassTools {
    fn tools(&self) -> Vec<Tool> {
        tool_definitions()
    }

    async fn call(&self, name: &str, arguments: Value) -> mcp::Result<CallToolResult> {
        let outcome = match name {
            PLAY_MEDIA => match parse_args::<PlayMediaArgs>(arguments) {
                Ok(args) => self.play_media(&args.entity_id, &args.media_content_id).await,
                Err(e) => ToolOutcome::failure(&e),
            },
            GET_STATE => match parse_args::<GetStateArgs>(arguments) {
                Ok(args) => self.get_state(&args.entity_id).await,
                Err(e) => ToolOutcome::failure(&e),
            },
            SET_STATE => match parse_args::<SetStateArgs>(arguments) {
                Ok(args) => self.set_state(&args.entity_id, &args.target).await,
                Err(e) => ToolOutcome::failure(&e),
            },
            other => return Err(mcp::Error::ToolNotFound(other.to_string())),
        };

        let text = serde_json::to_string(&outcome)?;
        Ok(CallToolResult::text(text, !outcome.success))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::Validation(e.to_string()))
}

/// Definitions of the three tools with their JSON input schemas.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: PLAY_MEDIA.to_string(),
            description: Some(
                "Play music or an audiobook on a media player. media_content_id may be \
                 an album, track or artist name, or \"random\"."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "entity_id": {
                        "type": "string",
                        "description": "Media player entity id, e.g. media_player.living_room"
                    },
                    "media_content_id": {
                        "type": "string",
                        "description": "What to play",
                        "default": DEFAULT_MEDIA_CONTENT_ID
                    }
                },
                "required": ["entity_id"]
            }),
        },
        Tool {
            name: GET_STATE.to_string(),
            description: Some(
                "Query a device's state, including light brightness, color, color \
                 temperature and media player volume."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "entity_id": {
                        "type": "string",
                        "description": "Entity id, e.g. light.living_room"
                    }
                },
                "required": ["entity_id"]
            }),
        },
        Tool {
            name: SET_STATE.to_string(),
            description: Some(
                "Control a device: turn on/off, adjust brightness, volume, temperature, \
                 color temperature or color, pause or continue, mute or unmute."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "entity_id": {
                        "type": "string",
                        "description": "Entity id, e.g. light.bedroom or climate.ac"
                    },
                    "target": {
                        "type": "object",
                        "properties": {
                            "type": {
                                "type": "string",
                                "enum": OPERATION_NAMES
                            },
                            "input": {
                                "type": "integer",
                                "description": "0-100 for brightness_value/volume_set, \
                                    17-30 for set_temperature, 1000-10000 for set_kelvin"
                            },
                            "is_muted": {
                                "type": "boolean",
                                "description": "Only for volume_mute"
                            },
                            "rgb_color": {
                                "type": "array",
                                "items": {"type": "integer", "minimum": 0, "maximum": 255},
                                "minItems": 3,
                                "maxItems": 3,
                                "description": "Only for set_color"
                            }
                        },
                        "required": ["type"]
                    }
                },
                "required": ["entity_id", "target"]
            }),
        },
    ]
}

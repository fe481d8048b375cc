//! Home Assistant tools — intent to service-call adapter.
//!
//! This crate turns high-level smart-home intents into authenticated calls
//! against the Home Assistant REST API, and turns state responses back into
//! short human-readable summaries.
//!
//! # Overview
//!
//! - **EntityId**: a validated `<domain>.<name>` identifier.
//! - **Operation**: one of the fourteen supported device operations, parsed
//!   and range-checked from the agent's [`TargetArgs`].
//! - **dispatch**: resolves an operation on an entity to a [`ServiceCall`],
//!   applying per-domain service overrides (covers, vacuums, media players).
//! - **StateSnapshot**: an entity's state plus attributes, summarized into one line.
//! - **HassClient**: the bearer-authenticated HTTP client.
//! - **HassTools**: the `play_media`, `get_state` and `set_state` tools. Also
//!   an [`mcp::ToolHandler`], so it can be served directly over MCP.
//!
//! # Example
//!
//! ```no_run
//! use hass::{HassClient, HassTools, TargetArgs};
//!
//! # async fn example() -> hass::Result<()> {
//! let client = HassClient::builder("http://homeassistant.local:8123", "token").build()?;
//! let tools = HassTools::new(client);
//!
//! let outcome = tools
//!     .set_state("light.bedroom", &TargetArgs::new("brightness_value").with_input(50))
//!     .await;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

mod client;
mod dispatch;
mod entity;
mod error;
mod format;
mod operation;
mod tools;

pub use client::{DEFAULT_TIMEOUT, HassClient, HassClientBuilder};
pub use dispatch::{BRIGHTNESS_STEP_PCT, ServiceCall, resolve};
pub use entity::EntityId;
pub use error::{Error, Result};
pub use format::{StateSnapshot, StateSummary, brightness_pct};
pub use operation::{
    KELVIN_RANGE, OPERATION_NAMES, Operation, PERCENT_RANGE, RGB_CHANNEL_RANGE,
    TEMPERATURE_RANGE, TargetArgs,
};
pub use tools::{
    DEFAULT_MEDIA_CONTENT_ID, DEFAULT_MEDIA_DOMAIN, GET_STATE, HassTools, PLAY_MEDIA, SET_STATE,
    ToolOutcome, tool_definitions,
};

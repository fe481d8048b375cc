//! Operation descriptors accepted by `set_state`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Percentage range for `brightness_value` and `volume_set`.
pub const PERCENT_RANGE: RangeInclusive<i64> = 0..=100;

/// Target range for `set_temperature`, in degrees.
pub const TEMPERATURE_RANGE: RangeInclusive<i64> = 17..=30;

/// Color temperature range for `set_kelvin`.
pub const KELVIN_RANGE: RangeInclusive<i64> = 1000..=10000;

/// Valid range for each RGB channel.
pub const RGB_CHANNEL_RANGE: RangeInclusive<i64> = 0..=255;

/// Wire names of every supported operation, in schema order.
pub const OPERATION_NAMES: [&str; 14] = [
    "turn_on",
    "turn_off",
    "brightness_up",
    "brightness_down",
    "brightness_value",
    "volume_up",
    "volume_down",
    "volume_set",
    "set_temperature",
    "set_kelvin",
    "set_color",
    "pause",
    "continue",
    "volume_mute",
];

/// Raw `target` object as sent by the calling agent.
///
/// Values are kept wide here so range problems surface as
/// [`Error::Validation`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetArgs {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_muted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<Vec<i64>>,
}

impl TargetArgs {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, input: i64) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.is_muted = Some(muted);
        self
    }

    pub fn with_rgb(mut self, rgb: Vec<i64>) -> Self {
        self.rgb_color = Some(rgb);
        self
    }
}

/// A validated device operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TurnOn,
    TurnOff,
    BrightnessUp,
    BrightnessDown,
    /// Absolute brightness, 0-100 percent.
    BrightnessValue(u8),
    VolumeUp,
    VolumeDown,
    /// Absolute volume, 0-100 percent.
    VolumeSet(u8),
    VolumeMute(bool),
    /// Target temperature, 17-30 degrees.
    SetTemperature(u8),
    SetKelvin(u16),
    SetColor([u8; 3]),
    Pause,
    Continue,
}

impl Operation {
    /// Wire name of this operation kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::BrightnessUp => "brightness_up",
            Self::BrightnessDown => "brightness_down",
            Self::BrightnessValue(_) => "brightness_value",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::VolumeSet(_) => "volume_set",
            Self::VolumeMute(_) => "volume_mute",
            Self::SetTemperature(_) => "set_temperature",
            Self::SetKelvin(_) => "set_kelvin",
            Self::SetColor(_) => "set_color",
            Self::Pause => "pause",
            Self::Continue => "continue",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&TargetArgs> for Operation {
    type Error = Error;

    fn try_from(args: &TargetArgs) -> Result<Self> {
        let kind = args.kind.as_str();
        let op = match kind {
            "turn_on" => Self::TurnOn,
            "turn_off" => Self::TurnOff,
            "brightness_up" => Self::BrightnessUp,
            "brightness_down" => Self::BrightnessDown,
            "brightness_value" => Self::BrightnessValue(ranged(kind, args.input, PERCENT_RANGE)?),
            "volume_up" => Self::VolumeUp,
            "volume_down" => Self::VolumeDown,
            "volume_set" => Self::VolumeSet(ranged(kind, args.input, PERCENT_RANGE)?),
            "volume_mute" => Self::VolumeMute(args.is_muted.ok_or_else(|| {
                Error::Validation(format!("{kind} requires is_muted"))
            })?),
            "set_temperature" => Self::SetTemperature(ranged(kind, args.input, TEMPERATURE_RANGE)?),
            "set_kelvin" => Self::SetKelvin(ranged(kind, args.input, KELVIN_RANGE)?),
            "set_color" => Self::SetColor(rgb(kind, args.rgb_color.as_deref())?),
            "pause" => Self::Pause,
            "continue" => Self::Continue,
            other => return Err(Error::UnsupportedOperation(other.to_string())),
        };
        Ok(op)
    }
}

impl TryFrom<TargetArgs> for Operation {
    type Error = Error;

    fn try_from(args: TargetArgs) -> Result<Self> {
        Self::try_from(&args)
    }
}

fn ranged<T: TryFrom<i64>>(
    kind: &str,
    value: Option<i64>,
    range: RangeInclusive<i64>,
) -> Result<T> {
    let value = value.ok_or_else(|| Error::Validation(format!("{kind} requires input")))?;
    if !range.contains(&value) {
        return Err(Error::Validation(format!(
            "{kind} input {value} out of range {}-{}",
            range.start(),
            range.end()
        )));
    }
    T::try_from(value)
        .map_err(|_| Error::Validation(format!("{kind} input {value} does not fit")))
}

fn rgb(kind: &str, channels: Option<&[i64]>) -> Result<[u8; 3]> {
    let channels =
        channels.ok_or_else(|| Error::Validation(format!("{kind} requires rgb_color")))?;
    let [r, g, b] = channels else {
        return Err(Error::Validation(format!(
            "rgb_color must have exactly 3 channels, got {}",
            channels.len()
        )));
    };
    let channel = |c: i64| -> Result<u8> {
        if RGB_CHANNEL_RANGE.contains(&c) {
            u8::try_from(c).map_err(|_| Error::Validation(format!("rgb channel {c} invalid")))
        } else {
            Err(Error::Validation(format!("rgb channel {c} out of range 0-255")))
        }
    };
    Ok([channel(*r)?, channel(*g)?, channel(*b)?])
}

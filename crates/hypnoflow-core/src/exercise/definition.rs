use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::catalog::ExerciseKind;
use crate::error::ValidationError;

/// 8-bit RGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend towards `other`; `t` is clamped to 0..=1.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Presentational parameters of the animated element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub scale: f64,
    pub opacity: f64,
    /// Horizontal offset in points; non-zero only for bilateral sweeps.
    #[serde(default)]
    pub offset_x: f64,
    /// Fill color. `None` keeps whatever color the element already has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl VisualState {
    pub const fn new(scale: f64, opacity: f64) -> Self {
        Self {
            scale,
            opacity,
            offset_x: 0.0,
            color: None,
        }
    }

    pub const fn with_offset(mut self, offset_x: f64) -> Self {
        self.offset_x = offset_x;
        self
    }

    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// A named segment of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Stable identifier, e.g. `inhale`, `hold1`.
    pub label: String,
    /// Text shown to the user while the phase runs.
    pub prompt: String,
    pub duration_ms: u64,
    pub target: VisualState,
    /// Static phase: position/scale do not move while it runs.
    #[serde(default)]
    pub hold: bool,
    /// Pulse phases reach `target` halfway, then ease back to this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle: Option<VisualState>,
}

impl Phase {
    pub fn new(label: &str, prompt: &str, duration_ms: u64, target: VisualState) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
            duration_ms,
            target,
            hold: false,
            settle: None,
        }
    }

    pub fn held(mut self) -> Self {
        self.hold = true;
        self
    }

    pub fn settling_to(mut self, settle: VisualState) -> Self {
        self.settle = Some(settle);
        self
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// How a run ends on its own, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Termination {
    /// Cycles until explicitly stopped.
    Looping,
    /// Stops once `total_ms` of cumulative time has elapsed.
    Bounded { total_ms: u64 },
}

/// Immutable description of one exercise.
///
/// Construct through [`ExerciseDefinition::new`] so the invariants hold:
/// at least one phase, every duration positive, positive tick period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseDefinition {
    kind: ExerciseKind,
    title: String,
    subtitle: String,
    phases: Vec<Phase>,
    tick_ms: u64,
    termination: Termination,
    idle: VisualState,
    audio_asset: Option<String>,
}

impl ExerciseDefinition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ExerciseKind,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        phases: Vec<Phase>,
        tick_ms: u64,
        termination: Termination,
        idle: VisualState,
        audio_asset: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if phases.is_empty() {
            return Err(ValidationError::NoPhases(title));
        }
        if let Some(phase) = phases.iter().find(|p| p.duration_ms == 0) {
            return Err(ValidationError::ZeroDuration {
                label: phase.label.clone(),
            });
        }
        if tick_ms == 0 {
            return Err(ValidationError::ZeroTick);
        }
        if termination == (Termination::Bounded { total_ms: 0 }) {
            return Err(ValidationError::ZeroTotal);
        }
        Ok(Self {
            kind,
            title,
            subtitle: subtitle.into(),
            phases,
            tick_ms,
            termination,
            idle,
            audio_asset,
        })
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Never panics: the phase list is non-empty and indices wrap.
    pub fn phase(&self, index: usize) -> &Phase {
        &self.phases[index % self.phases.len()]
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn idle(&self) -> VisualState {
        self.idle
    }

    pub fn audio_asset(&self) -> Option<&str> {
        self.audio_asset.as_deref()
    }

    pub fn is_looping(&self) -> bool {
        self.termination == Termination::Looping
    }

    pub fn cycle_duration_ms(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }

    /// Copy with a different bounded total; looping exercises are unchanged.
    pub fn with_total_ms(mut self, total_ms: u64) -> Result<Self, ValidationError> {
        if let Termination::Bounded { .. } = self.termination {
            if total_ms == 0 {
                return Err(ValidationError::ZeroTotal);
            }
            self.termination = Termination::Bounded { total_ms };
        }
        Ok(self)
    }

    /// Copy with a different (or no) audio asset.
    pub fn with_audio_asset(mut self, asset: Option<String>) -> Self {
        self.audio_asset = asset;
        self
    }
}

//! Alpha ramps used for label show/hide transitions

use crate::LabelError;
use std::f32::consts::FRAC_PI_2;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Easing curve of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Interpolation {
    #[default]
    Linear,
    Pow,
    Sine,
}

impl FromStr for Interpolation {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "pow" => Ok(Self::Pow),
            "sine" => Ok(Self::Sine),
            other => Err(LabelError::UnknownInterpolation(other.to_string())),
        }
    }
}

/// Timing of one kind of transition (show, hide or select)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    pub ease: Interpolation,
    /// Duration in seconds
    pub time: f32,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            ease: Interpolation::Linear,
            time: 0.2,
        }
    }
}

/// Time-driven alpha ramp
///
/// A fade-in goes from 0 to 1, a fade-out from 1 to 0. The ramp can be started
/// part way through so that a reversed transition continues from the current
/// alpha instead of jumping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEffect {
    interpolation: Interpolation,
    duration: f32,
    step: f32,
    fade_in: bool,
}

impl Default for FadeEffect {
    fn default() -> Self {
        Self::new(true, Interpolation::Linear, 0.0)
    }
}

impl FadeEffect {
    pub fn new(fade_in: bool, interpolation: Interpolation, duration: f32) -> Self {
        Self {
            interpolation,
            duration: duration.max(0.0),
            step: 0.0,
            fade_in,
        }
    }

    /// Start a fade from the given transition settings
    pub fn from_transition(fade_in: bool, transition: Transition) -> Self {
        Self::new(fade_in, transition.ease, transition.time)
    }

    /// Start the ramp at the position matching `alpha`
    pub fn starting_at(mut self, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let progress = if self.fade_in { alpha } else { 1.0 - alpha };
        self.step = self.invert(progress) * self.duration;
        self
    }

    #[inline]
    pub fn is_fade_in(&self) -> bool {
        self.fade_in
    }

    /// Advance by `dt` seconds and return the new alpha in `[0, 1]`
    pub fn update(&mut self, dt: f32) -> f32 {
        self.step += dt.max(0.0);
        self.alpha()
    }

    /// Alpha at the current position of the ramp
    pub fn alpha(&self) -> f32 {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.step / self.duration).clamp(0.0, 1.0)
        };

        let alpha = match self.interpolation {
            Interpolation::Linear => {
                if self.fade_in {
                    t
                } else {
                    1.0 - t
                }
            }
            Interpolation::Pow => {
                if self.fade_in {
                    t * t
                } else {
                    1.0 - t * t
                }
            }
            Interpolation::Sine => {
                if self.fade_in {
                    (t * FRAC_PI_2).sin()
                } else {
                    (t * FRAC_PI_2).cos()
                }
            }
        };
        alpha.clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.step >= self.duration
    }

    /// Normalized time at which the curve reaches `progress` (0..1, fade-in sense)
    fn invert(&self, progress: f32) -> f32 {
        match self.interpolation {
            Interpolation::Linear => progress,
            // t^2 = progress for both directions
            Interpolation::Pow => progress.sqrt(),
            Interpolation::Sine => {
                if self.fade_in {
                    progress.asin() / FRAC_PI_2
                } else {
                    // cos(t * pi/2) = 1 - progress
                    (1.0 - progress).acos() / FRAC_PI_2
                }
            }
        }
    }
}

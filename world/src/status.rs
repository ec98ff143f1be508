//! Timed status effects carried by enemies.

use std::time::Duration;

use arcane_defenders_core::StatusKind;

/// Strength and remaining lifetime of an active effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEffect {
    /// Slow fraction or burn damage per second. Unused by freeze.
    pub magnitude: f32,
    /// Time left before the effect expires.
    pub remaining: Duration,
}

/// Fixed set of status slots, one per effect kind.
///
/// Re-applying a kind replaces its slot outright. Different kinds run
/// independent countdowns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatusEffects {
    slow: Option<TimedEffect>,
    freeze: Option<TimedEffect>,
    burn: Option<TimedEffect>,
}

impl StatusEffects {
    /// Creates an empty status set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an effect, replacing any active effect of the same kind.
    pub fn apply(&mut self, kind: StatusKind, magnitude: f32, duration: Duration) {
        *self.slot_mut(kind) = Some(TimedEffect {
            magnitude,
            remaining: duration,
        });
    }

    /// Retrieves the active effect of the provided kind.
    #[must_use]
    pub fn get(&self, kind: StatusKind) -> Option<TimedEffect> {
        match kind {
            StatusKind::Slow => self.slow,
            StatusKind::Freeze => self.freeze,
            StatusKind::Burn => self.burn,
        }
    }

    /// Reports whether an effect of the provided kind is active.
    #[must_use]
    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Counts every effect down by `delta`, reporting each kind that expired.
    pub fn tick(&mut self, delta: Duration, mut on_expire: impl FnMut(StatusKind)) {
        for kind in [StatusKind::Slow, StatusKind::Freeze, StatusKind::Burn] {
            let slot = self.slot_mut(kind);
            let Some(effect) = slot.as_mut() else {
                continue;
            };
            effect.remaining = effect.remaining.saturating_sub(delta);
            if effect.remaining.is_zero() {
                *slot = None;
                on_expire(kind);
            }
        }
    }

    /// Multiplier applied to base speed. Freeze overrides slow.
    #[must_use]
    pub fn speed_factor(&self) -> f32 {
        if self.freeze.is_some() {
            return 0.0;
        }
        match self.slow {
            Some(slow) => 1.0 - slow.magnitude,
            None => 1.0,
        }
    }

    /// Burn damage per second, if a burn is active.
    #[must_use]
    pub fn burn_dps(&self) -> Option<f32> {
        self.burn.map(|burn| burn.magnitude)
    }

    fn slot_mut(&mut self, kind: StatusKind) -> &mut Option<TimedEffect> {
        match kind {
            StatusKind::Slow => &mut self.slow,
            StatusKind::Freeze => &mut self.freeze,
            StatusKind::Burn => &mut self.burn,
        }
    }
}

// ==============================================================================
// gearbox.rs — AUTOMATIC GEAR SELECTION
// ==============================================================================
// - upshift   when rpm >= max_rpm        and not in top gear
// - downshift when rpm <  1.5 * idle_rpm and not in first gear
// - at most one shift per update
// - after a shift, further shifts wait `cooldown` seconds (0 = ungated)
// ==============================================================================

use crate::wheel::types::Real;

pub const DOWNSHIFT_IDLE_FACTOR: Real = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftEvent {
    Up { from: usize, to: usize },
    Down { from: usize, to: usize },
}

#[derive(Debug, Clone)]
pub struct Gearbox {
    ratios: Vec<Real>,
    gear: usize,
    cooldown: Real,
    since_shift: Real,
}

impl Gearbox {
    /// `ratios` must be non-empty; `initial_gear` is clamped into range.
    pub fn new(ratios: Vec<Real>, initial_gear: usize, cooldown: Real) -> Self {
        let gear = initial_gear.min(ratios.len().saturating_sub(1));
        Self {
            ratios,
            gear,
            cooldown,
            since_shift: cooldown,
        }
    }

    pub fn gear(&self) -> usize { self.gear }

    pub fn ratio(&self) -> Real { self.ratios[self.gear] }

    pub fn top_ratio(&self) -> Real { self.ratios[self.top_gear()] }

    pub fn top_gear(&self) -> usize { self.ratios.len() - 1 }

    pub fn update(&mut self, rpm: Real, idle_rpm: Real, max_rpm: Real, dt: Real) -> Option<ShiftEvent> {
        self.since_shift += dt;
        if self.since_shift < self.cooldown {
            return None;
        }

        let from = self.gear;
        let event = if rpm >= max_rpm && self.gear < self.top_gear() {
            self.gear += 1;
            ShiftEvent::Up { from, to: self.gear }
        } else if rpm < idle_rpm * DOWNSHIFT_IDLE_FACTOR && self.gear > 0 {
            self.gear -= 1;
            ShiftEvent::Down { from, to: self.gear }
        } else {
            return None;
        };

        self.since_shift = 0.0;
        Some(event)
    }
}

//! Fade transition for the results region.
//!
//! Content is only ever swapped while opacity sits at the fade-out floor, so
//! the old page never pops into the new one mid-fade.

use crate::browser::Refresh;
use crate::view::ResultsView;
use std::time::{Duration, Instant};

pub const FADE_DURATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    FadingOut { started: Instant, from_opacity: f32 },
    FadingIn { started: Instant },
}

#[derive(Debug, Clone)]
pub struct ResultsPanel {
    shown: ResultsView,
    pending: Option<ResultsView>,
    phase: Phase,
}

impl ResultsPanel {
    pub fn new(initial: ResultsView) -> Self {
        Self {
            shown: initial,
            pending: None,
            phase: Phase::Idle,
        }
    }

    /// What is on screen right now.
    pub fn shown(&self) -> &ResultsView {
        &self.shown
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Queues `view`. A direct refresh swaps immediately and cancels any fade;
    /// a fade refresh waits for the fade-out to bottom out. A second fade
    /// request during fade-out only replaces the pending content.
    pub fn present(&mut self, view: ResultsView, refresh: Refresh, now: Instant) {
        match refresh {
            Refresh::Direct => {
                self.shown = view;
                self.pending = None;
                self.phase = Phase::Idle;
            }
            Refresh::Fade => {
                if !matches!(self.phase, Phase::FadingOut { .. }) {
                    self.phase = Phase::FadingOut {
                        started: now,
                        from_opacity: self.opacity(now),
                    };
                }
                self.pending = Some(view);
            }
        }
    }

    /// Advances the fade clock.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::FadingOut { started, .. } = self.phase {
            let floor_at = started + FADE_DURATION;
            if now < floor_at {
                return;
            }
            if let Some(view) = self.pending.take() {
                self.shown = view;
            }
            self.phase = Phase::FadingIn { started: floor_at };
        }

        if let Phase::FadingIn { started } = self.phase {
            if now >= started + FADE_DURATION {
                self.phase = Phase::Idle;
            }
        }
    }

    /// Opacity in `[0, 1]` at `now`.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase {
            Phase::Idle => 1.0,
            Phase::FadingOut {
                started,
                from_opacity,
            } => from_opacity * (1.0 - progress(started, now)),
            Phase::FadingIn { started } => progress(started, now),
        }
    }
}

fn progress(started: Instant, now: Instant) -> f32 {
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f32() / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
}

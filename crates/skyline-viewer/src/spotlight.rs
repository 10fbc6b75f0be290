//! Pointer-tracked spotlight.
//!
//! The light sits a fixed height above the point under the pointer and aims
//! at it. On narrow touch screens it glides there over a short tween instead
//! of jumping. At most one tween exists per spotlight: starting a new one
//! cancels the old one outright.

use glam::Vec3;
use std::time::{Duration, Instant};

/// Height of the light above its aim point.
pub const SPOTLIGHT_HEIGHT: f32 = 50.0;

/// Below the ground plane, where the light has no visible effect.
pub const PARKED_POSITION: Vec3 = Vec3::new(0.0, -100.0, 0.0);

pub const TWEEN_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl LightPose {
    /// Light hovering above `ground_point`, aimed straight at it.
    pub fn above(ground_point: Vec3, height: f32) -> Self {
        Self {
            position: Vec3::new(ground_point.x, height, ground_point.z),
            target: ground_point,
        }
    }

    fn lerp(&self, to: &LightPose, t: f32) -> LightPose {
        LightPose {
            position: self.position.lerp(to.position, t),
            target: self.target.lerp(to.target, t),
        }
    }
}

impl Default for LightPose {
    fn default() -> Self {
        Self::above(Vec3::ZERO, SPOTLIGHT_HEIGHT)
    }
}

/// A running interpolation. Identified so a superseded tween can be told
/// apart from its replacement in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotlightTween {
    pub id: u64,
    from: LightPose,
    to: LightPose,
    started: Instant,
    duration: Duration,
}

impl SpotlightTween {
    /// Progress in `[0, 1]`, monotonically non-decreasing in `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Instant) -> LightPose {
        let t = self.progress(now);
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(&self.to, t)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotlightState {
    pose: LightPose,
    active: bool,
    tween: Option<SpotlightTween>,
    next_tween_id: u64,
}

impl Default for SpotlightState {
    fn default() -> Self {
        Self {
            pose: LightPose {
                position: PARKED_POSITION,
                target: Vec3::ZERO,
            },
            active: false,
            tween: None,
            next_tween_id: 1,
        }
    }
}

impl SpotlightState {
    pub fn pose(&self) -> LightPose {
        self.pose
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tween(&self) -> Option<&SpotlightTween> {
        self.tween.as_ref()
    }

    /// Pointer entered the viewport.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Pointer left the viewport: cancel any tween and park the light at
    /// `parked`, normally [`PARKED_POSITION`].
    pub fn deactivate(&mut self, parked: Vec3) {
        self.active = false;
        self.cancel();
        self.pose.position = parked;
    }

    /// Jump straight to `pose`.
    pub fn move_to(&mut self, pose: LightPose) {
        self.cancel();
        self.pose = pose;
    }

    /// Glide from wherever the light is now to `pose`, superseding any
    /// running tween.
    pub fn animate_to(&mut self, pose: LightPose, now: Instant, duration: Duration) -> u64 {
        self.cancel();
        let id = self.next_tween_id;
        self.next_tween_id += 1;
        self.tween = Some(SpotlightTween {
            id,
            from: self.pose,
            to: pose,
            started: now,
            duration,
        });
        id
    }

    /// Drops the running tween, leaving the light where it is.
    pub fn cancel(&mut self) {
        if let Some(old) = self.tween.take() {
            log::debug!("Spotlight tween {} superseded", old.id);
        }
    }

    /// One render tick.
    pub fn tick(&mut self, now: Instant) {
        let Some(tween) = self.tween else {
            return;
        };
        self.pose = tween.sample(now);
        if tween.progress(now) >= 1.0 {
            self.tween = None;
        }
    }
}

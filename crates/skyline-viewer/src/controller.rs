//! Viewport controller: orbit camera, gesture decoding and the pointer
//! spotlight.
//!
//! The controller is device-agnostic. It takes pointer positions in physical
//! pixels relative to the viewport and a render clock; `input` translates
//! winit events into these calls. The mobile breakpoint is compared in
//! logical pixels, so the controller also tracks the window scale factor.

use crate::camera::{CameraPose, CameraState, OrbitLimits, Projection};
use crate::picking::{pixel_to_ndc, Ray};
use crate::spotlight::{LightPose, SpotlightState, PARKED_POSITION, SPOTLIGHT_HEIGHT};
use glam::{Vec2, Vec3};
use listings::MOBILE_BREAKPOINT_PX;
use std::time::{Duration, Instant};

/// Gesture transfer constants.
///
/// Wheel and pinch zoom use different effective scales (0.005 per wheel
/// unit, 0.05 per pinch pixel); both are kept as tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlTuning {
    pub rotation_speed: f32,
    pub drag_rotate_scale: f32,
    pub drag_height_scale: f32,
    pub wheel_zoom_speed: f32,
    pub wheel_scale: f32,
    pub pinch_scale: f32,
    pub limits: OrbitLimits,
    pub mobile_breakpoint_px: u32,
    pub spotlight_height: f32,
    pub parked_position: Vec3,
    pub tween_duration: Duration,
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            rotation_speed: 0.5,
            drag_rotate_scale: 0.01,
            drag_height_scale: 0.1,
            wheel_zoom_speed: 0.5,
            wheel_scale: 0.01,
            pinch_scale: 0.05,
            limits: OrbitLimits::default(),
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            spotlight_height: SPOTLIGHT_HEIGHT,
            parked_position: PARKED_POSITION,
            tween_duration: crate::spotlight::TWEEN_DURATION,
        }
    }
}

/// Press/touch bookkeeping between events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerSession {
    pub dragging: bool,
    pub last_position: Option<Vec2>,
    /// Anchor of the single-finger orbit gesture.
    pub last_touch: Option<Vec2>,
    /// Only set while exactly two contacts are down.
    pub last_pinch_distance: Option<f32>,
}

#[derive(Debug)]
pub struct ViewportController {
    tuning: ControlTuning,
    camera: CameraState,
    pose: CameraPose,
    projection: Projection,
    session: PointerSession,
    spotlight: SpotlightState,
    hovering: bool,
    /// Physical pixels.
    viewport: (u32, u32),
    scale_factor: f64,
}

impl ViewportController {
    pub fn new(tuning: ControlTuning, width: u32, height: u32) -> Self {
        let mut camera = CameraState::default();
        let pose = camera.recompute(&tuning.limits);
        let mut projection = Projection::default();
        projection.set_viewport(width, height);

        let mut spotlight = SpotlightState::default();
        spotlight.deactivate(tuning.parked_position);

        Self {
            tuning,
            camera,
            pose,
            projection,
            session: PointerSession::default(),
            spotlight,
            hovering: false,
            viewport: (width, height),
            scale_factor: 1.0,
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn session(&self) -> &PointerSession {
        &self.session
    }

    pub fn spotlight(&self) -> &SpotlightState {
        &self.spotlight
    }

    pub fn light_pose(&self) -> LightPose {
        self.spotlight.pose()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Mutable access for callers that inject state directly; the next
    /// recompute clamps it back into range.
    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    /// Viewport width in logical pixels.
    pub fn logical_width(&self) -> u32 {
        (f64::from(self.viewport.0) / self.scale_factor).round() as u32
    }

    fn is_narrow(&self) -> bool {
        self.logical_width() <= self.tuning.mobile_breakpoint_px
    }

    /// Non-positive or non-finite factors are ignored.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Clamps and derives a fresh pose.
    pub fn recompute(&mut self) -> CameraPose {
        self.pose = self.camera.recompute(&self.tuning.limits);
        self.pose
    }

    fn orbit_by(&mut self, delta: Vec2) {
        let t = &self.tuning;
        self.camera.angle += delta.x * t.rotation_speed * t.drag_rotate_scale;
        self.camera.height = (self.camera.height - delta.y * t.drag_height_scale)
            .clamp(t.limits.min_height, t.limits.max_height);
        self.recompute();
    }

    pub fn on_pointer_enter(&mut self) {
        self.hovering = true;
        self.spotlight.activate();
    }

    /// Leaving ends any drag and parks the light.
    pub fn on_pointer_leave(&mut self) {
        self.hovering = false;
        self.session.dragging = false;
        self.spotlight.deactivate(self.tuning.parked_position);
    }

    pub fn on_drag_start(&mut self, point: Vec2) {
        if !self.hovering {
            return;
        }
        self.session.dragging = true;
        self.session.last_position = Some(point);
    }

    pub fn on_drag_move(&mut self, point: Vec2) {
        if !(self.session.dragging && self.hovering) {
            return;
        }
        if let Some(last) = self.session.last_position {
            self.orbit_by(point - last);
        }
        self.session.last_position = Some(point);
    }

    pub fn on_drag_end(&mut self) {
        self.session.dragging = false;
    }

    /// Returns whether the wheel event was consumed, in which case the host
    /// must not scroll.
    pub fn on_wheel(&mut self, delta_y: f32) -> bool {
        if !self.hovering {
            return false;
        }
        self.camera.distance += delta_y * self.tuning.wheel_zoom_speed * self.tuning.wheel_scale;
        self.recompute();
        true
    }

    /// First sample of a pinch only records the spread.
    pub fn on_pinch(&mut self, a: Vec2, b: Vec2) {
        if !self.hovering {
            return;
        }
        let spread = a.distance(b);
        if let Some(last) = self.session.last_pinch_distance {
            self.camera.distance -= (spread - last) * self.tuning.pinch_scale;
            self.recompute();
        }
        self.session.last_pinch_distance = Some(spread);
    }

    pub fn on_single_touch_move(&mut self, point: Vec2) {
        if !self.hovering {
            return;
        }
        let Some(last) = self.session.last_touch else {
            return;
        };
        self.orbit_by(point - last);
        self.session.last_touch = Some(point);
    }

    /// `contacts` are all touches down after the new one landed.
    pub fn on_touch_start(&mut self, contacts: &[Vec2], now: Instant) {
        // Touch is only delivered to the canvas, so it implies hover.
        if !self.hovering {
            self.on_pointer_enter();
        }
        match contacts {
            [only] => self.session.last_touch = Some(*only),
            [a, b] => self.session.last_pinch_distance = Some(a.distance(*b)),
            _ => {}
        }
        // The light follows the first finger down, whatever the count.
        if let Some(first) = contacts.first() {
            let ndc = self.to_ndc(*first);
            self.update_spotlight(ndc, true, now);
        }
    }

    pub fn on_touch_move(&mut self, contacts: &[Vec2]) {
        match contacts {
            [only] => self.on_single_touch_move(*only),
            [a, b] => self.on_pinch(*a, *b),
            _ => {}
        }
    }

    /// `remaining` are the touches still down after one lifted.
    pub fn on_touch_end(&mut self, remaining: &[Vec2]) {
        if remaining.len() < 2 {
            self.session.last_pinch_distance = None;
        }
        match remaining {
            [] => self.session.last_touch = None,
            [only] => self.session.last_touch = Some(*only),
            _ => {}
        }
    }

    /// Mouse movement drives both the orbit drag and the spotlight.
    pub fn on_pointer_move(&mut self, point: Vec2, now: Instant) {
        self.on_drag_move(point);
        let ndc = self.to_ndc(point);
        self.update_spotlight(ndc, false, now);
    }

    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        pixel_to_ndc(point, self.viewport.0 as f32, self.viewport.1 as f32)
    }

    /// Aims the light at the ground under `ndc`. Touch input on a narrow
    /// screen glides there; everything else jumps. A ray that misses the
    /// ground leaves the light where it is.
    pub fn update_spotlight(&mut self, ndc: Vec2, touch: bool, now: Instant) {
        if !self.hovering {
            return;
        }
        let ray = Ray::from_camera(&self.pose, &self.projection, ndc);
        let Some(hit) = ray.intersect_ground() else {
            log::trace!("Spotlight ray missed the ground at {ndc:?}");
            return;
        };
        let target = LightPose::above(hit, self.tuning.spotlight_height);
        if touch && self.is_narrow() {
            self.spotlight
                .animate_to(target, now, self.tuning.tween_duration);
        } else {
            self.spotlight.move_to(target);
        }
    }

    /// New viewport size. Camera state is kept; only the projection changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.projection.set_viewport(width, height);
        self.recompute();
    }

    /// One render tick.
    pub fn tick(&mut self, now: Instant) {
        self.spotlight.tick(now);
    }
}

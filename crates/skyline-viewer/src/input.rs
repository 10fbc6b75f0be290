//! Translates winit window events into controller gestures and shell
//! commands.

use crate::controller::ViewportController;
use glam::Vec2;
use listings::ViewMode;
use std::time::Instant;
use winit::event::{
    ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels per wheel notch, matching what browsers report for line scrolling.
const PIXELS_PER_LINE: f32 = 100.0;

/// Keyboard actions aimed at the listing browser or the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetViewMode(ViewMode),
    PreviousPage,
    NextPage,
    ApplyFilter,
    ClearFilter,
    Quit,
}

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::KeyG => Some(Command::SetViewMode(ViewMode::Grid)),
        KeyCode::KeyL => Some(Command::SetViewMode(ViewMode::List)),
        KeyCode::ArrowLeft => Some(Command::PreviousPage),
        KeyCode::ArrowRight => Some(Command::NextPage),
        KeyCode::KeyF => Some(Command::ApplyFilter),
        KeyCode::KeyC => Some(Command::ClearFilter),
        KeyCode::Escape => Some(Command::Quit),
        _ => None,
    }
}

/// Wheel delta in DOM convention: positive means scrolling down, which
/// pulls the camera back.
pub fn wheel_delta_y(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

/// Active touch contacts in the order they landed.
#[derive(Debug, Default, Clone)]
pub struct TouchTracker {
    contacts: Vec<(u64, Vec2)>,
}

impl TouchTracker {
    pub fn positions(&self) -> Vec<Vec2> {
        self.contacts.iter().map(|(_, p)| *p).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Applies one touch phase and returns the contacts still down.
    pub fn update(&mut self, id: u64, phase: TouchPhase, at: Vec2) -> Vec<Vec2> {
        match phase {
            TouchPhase::Started => {
                self.contacts.retain(|(other, _)| *other != id);
                self.contacts.push((id, at));
            }
            TouchPhase::Moved => {
                if let Some(slot) = self.contacts.iter_mut().find(|(other, _)| *other == id) {
                    slot.1 = at;
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.contacts.retain(|(other, _)| *other != id);
            }
        }
        self.positions()
    }
}

/// What happened to a routed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Ignored,
    /// The viewport used the event.
    Consumed,
    Command(Command),
}

#[derive(Debug, Default)]
pub struct InputRouter {
    touches: TouchTracker,
    /// winit reports button presses without a position.
    cursor: Option<Vec2>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(
        &mut self,
        event: &WindowEvent,
        controller: &mut ViewportController,
        now: Instant,
    ) -> Routed {
        match event {
            WindowEvent::CursorEntered { .. } => {
                controller.on_pointer_enter();
                Routed::Consumed
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                controller.on_pointer_leave();
                Routed::Consumed
            }
            WindowEvent::CursorMoved { position, .. } => {
                let point = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = Some(point);
                controller.on_pointer_move(point, now);
                Routed::Consumed
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        if let Some(point) = self.cursor {
                            controller.on_drag_start(point);
                        }
                    }
                    ElementState::Released => controller.on_drag_end(),
                }
                Routed::Consumed
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if controller.on_wheel(wheel_delta_y(delta)) {
                    Routed::Consumed
                } else {
                    Routed::Ignored
                }
            }
            WindowEvent::Touch(Touch {
                id, phase, location, ..
            }) => {
                let at = Vec2::new(location.x as f32, location.y as f32);
                let contacts = self.touches.update(*id, *phase, at);
                match phase {
                    TouchPhase::Started => controller.on_touch_start(&contacts, now),
                    TouchPhase::Moved => controller.on_touch_move(&contacts),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        controller.on_touch_end(&contacts)
                    }
                }
                Routed::Consumed
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(code) => {
                        command_for_key(code).map_or(Routed::Ignored, Routed::Command)
                    }
                    PhysicalKey::Unidentified(_) => Routed::Ignored,
                }
            }
            _ => Routed::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            command_for_key(KeyCode::KeyL),
            Some(Command::SetViewMode(ViewMode::List))
        );
        assert_eq!(command_for_key(KeyCode::ArrowRight), Some(Command::NextPage));
        assert_eq!(command_for_key(KeyCode::Escape), Some(Command::Quit));
        assert_eq!(command_for_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn wheel_follows_dom_sign() {
        // Scrolling up (towards the user) zooms in.
        assert_eq!(wheel_delta_y(&MouseScrollDelta::LineDelta(0.0, 1.0)), -100.0);
        assert_eq!(
            wheel_delta_y(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0))),
            40.0
        );
    }

    #[test]
    fn touch_tracker_keeps_landing_order() {
        let mut t = TouchTracker::default();
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(5.0, 5.0);
        t.update(7, TouchPhase::Started, a);
        assert_eq!(t.update(3, TouchPhase::Started, b), vec![a, b]);

        let a2 = Vec2::new(2.0, 2.0);
        assert_eq!(t.update(7, TouchPhase::Moved, a2), vec![a2, b]);

        assert_eq!(t.update(7, TouchPhase::Ended, a2), vec![b]);
        assert_eq!(t.update(3, TouchPhase::Cancelled, b), Vec::<Vec2>::new());
        assert!(t.is_empty());
    }

    #[test]
    fn unknown_touch_move_is_ignored() {
        let mut t = TouchTracker::default();
        assert!(t.update(1, TouchPhase::Moved, Vec2::ONE).is_empty());
    }
}

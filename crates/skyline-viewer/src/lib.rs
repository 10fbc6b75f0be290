// src/lib.rs
//! Skyline hero viewport and listing results.
//!
//! The viewport side is an orbit camera driven by mouse, wheel and touch
//! gestures, with a spotlight that follows the pointer onto the ground
//! plane. The results side wraps the `listings` browser. [`app::App`] owns
//! both and is fed by the winit loop in `main.rs`.

pub mod app;
pub mod camera;
pub mod config;
pub mod controller;
pub mod input;
pub mod net;
pub mod picking;
pub mod render;
pub mod spotlight;
pub mod ui;

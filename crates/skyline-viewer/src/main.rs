//! Entry point for the skyline viewer.

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use skyline_viewer::{app::App, config::Config, net::spawn_units_fetch};
use std::{sync::Arc, time::Instant};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::info!("Units endpoint: {}", config.units_url);

    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Skyline")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)
            .context("creating window")?,
    );

    // Fetched once; the browser shows a loading state until it lands.
    let (units_tx, units_rx) = bounded(1);
    let _fetch = spawn_units_fetch(config.units_url.clone(), units_tx);

    // Physical size for the projection; the app derives logical widths from
    // the scale factor for the mobile breakpoint.
    let size = window.inner_size();
    let mut app = App::new(&config, size.width, size.height, window.scale_factor(), units_rx);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                let now = Instant::now();
                if !app.handle_event(&event, now) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::RedrawRequested => {
                            app.frame(now);
                        }
                        _ => {}
                    }
                }
                if app.exit_requested() {
                    elwt.exit();
                }
            }
            Event::AboutToWait => {
                // Request a redraw each frame.
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

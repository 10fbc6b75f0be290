use crate::{
    config::Config,
    controller::{ControlTuning, ViewportController},
    input::{Command, InputRouter, Routed},
    net::FetchResult,
    render::{Frame, FrameLog},
    ui::ToastStack,
};
use crossbeam_channel::{Receiver, TryRecvError};
use listings::{
    BrowserUpdate, FetchError, FilterForm, ListingBrowser, LoadState, ResultsPanel,
};
use std::time::Instant;
use winit::event::WindowEvent;

/// Single owner of all viewport and listing state. Device events, the
/// fetch result and the render clock all come through here.
pub struct App {
    pub controller: ViewportController,
    pub browser: ListingBrowser,
    pub panel: ResultsPanel,
    pub toasts: ToastStack,
    input: InputRouter,
    units_rx: Receiver<FetchResult>,
    filter_form: FilterForm,
    frame_log: FrameLog,
    exit_requested: bool,
}

impl App {
    /// `width` and `height` are physical pixels.
    pub fn new(
        config: &Config,
        width: u32,
        height: u32,
        scale_factor: f64,
        units_rx: Receiver<FetchResult>,
    ) -> Self {
        let mut controller = ViewportController::new(ControlTuning::default(), width, height);
        controller.set_scale_factor(scale_factor);
        let mut browser = ListingBrowser::new(controller.logical_width());
        browser.begin_load();
        let panel = ResultsPanel::new(browser.render());

        Self {
            controller,
            browser,
            panel,
            toasts: ToastStack::default(),
            input: InputRouter::new(),
            units_rx,
            filter_form: config.filter_form(),
            frame_log: FrameLog::default(),
            exit_requested: false,
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Returns whether the event was used.
    pub fn handle_event(&mut self, event: &WindowEvent, now: Instant) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height, now);
                return true;
            }
            // winit follows this with a Resized carrying the new physical size.
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor, now);
                return true;
            }
            _ => {}
        }

        match self.input.handle(event, &mut self.controller, now) {
            Routed::Ignored => false,
            Routed::Consumed => true,
            Routed::Command(command) => {
                self.run_command(command, now);
                true
            }
        }
    }

    /// Physical size in; the page size follows the logical width.
    pub fn resize(&mut self, width: u32, height: u32, now: Instant) {
        if width == 0 || height == 0 {
            return;
        }
        self.controller.resize(width, height);
        let update = self.browser.set_viewport_width(self.controller.logical_width());
        self.publish(update, now);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64, now: Instant) {
        self.controller.set_scale_factor(scale_factor);
        let update = self.browser.set_viewport_width(self.controller.logical_width());
        self.publish(update, now);
    }

    pub fn run_command(&mut self, command: Command, now: Instant) {
        let update = match command {
            Command::SetViewMode(mode) => self.browser.set_view_mode(mode),
            Command::PreviousPage => self.browser.go_to_page(-1),
            Command::NextPage => self.browser.go_to_page(1),
            Command::ApplyFilter => match self.filter_form.parse() {
                Ok(criteria) => self.browser.apply_filter(criteria),
                Err(e) => {
                    log::warn!("Ignoring search form: {e}");
                    return;
                }
            },
            Command::ClearFilter => self.browser.clear_filter(),
            Command::Quit => {
                self.exit_requested = true;
                return;
            }
        };
        self.publish(update, now);
    }

    /// Picks up the fetch result if it has arrived.
    pub fn poll_units(&mut self, now: Instant) {
        match self.units_rx.try_recv() {
            Ok(result) => {
                let update = self.browser.finish_load(result);
                self.publish(update, now);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                if *self.browser.load_state() == LoadState::Loading {
                    let update = self.browser.finish_load(Err(FetchError::Network(
                        "fetch thread exited without a result".into(),
                    )));
                    self.publish(update, now);
                }
            }
        }
    }

    fn publish(&mut self, update: BrowserUpdate, now: Instant) {
        self.panel.present(self.browser.render(), update.refresh, now);
        if let Some(note) = update.notification {
            self.toasts.push(note, now);
        }
    }

    /// Advances every clock-driven piece of state and describes the frame.
    pub fn frame(&mut self, now: Instant) -> Frame {
        self.poll_units(now);
        self.controller.tick(now);
        self.panel.tick(now);
        self.toasts.expire(now);

        let pose = self.controller.pose();
        let frame = Frame {
            camera: pose,
            view_proj: pose.view_proj(self.controller.projection()),
            light: self.controller.light_pose(),
            light_active: self.controller.spotlight().is_active(),
            results: self.panel.shown().clone(),
            results_opacity: self.panel.opacity(now),
        };
        self.frame_log.record(&frame);
        frame
    }
}

use crate::camera::CameraPose;
use crate::spotlight::LightPose;
use glam::Mat4;
use listings::ResultsView;

/// Everything the presentation layer needs for one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub camera: CameraPose,
    pub view_proj: Mat4,
    pub light: LightPose,
    pub light_active: bool,
    pub results: ResultsView,
    pub results_opacity: f32,
}

/// Logs frames as they change instead of every redraw.
#[derive(Debug, Default)]
pub struct FrameLog {
    last_camera: Option<CameraPose>,
    last_light: Option<LightPose>,
    last_results: Option<ResultsView>,
}

impl FrameLog {
    pub fn record(&mut self, frame: &Frame) {
        if self.last_camera != Some(frame.camera) {
            log::debug!(
                "Camera at ({:.2}, {:.2}, {:.2})",
                frame.camera.position.x,
                frame.camera.position.y,
                frame.camera.position.z
            );
            self.last_camera = Some(frame.camera);
        }

        if self.last_light != Some(frame.light) {
            log::trace!(
                "Spotlight at {:?} aimed at {:?} (active: {})",
                frame.light.position,
                frame.light.target,
                frame.light_active
            );
            self.last_light = Some(frame.light);
        }

        if self.last_results.as_ref() != Some(&frame.results) {
            for line in crate::ui::describe_results(&frame.results) {
                log::info!("{line}");
            }
            self.last_results = Some(frame.results.clone());
        }
    }
}

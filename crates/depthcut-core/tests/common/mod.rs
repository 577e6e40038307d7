#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;

use depthcut_core::device::{DeviceProfile, Sensor, SensorKind, StreamKind, StreamProfile};
use depthcut_core::error::{DepthcutError, Result};
use depthcut_core::frame::{ColorFrame, DepthFrame};
use depthcut_core::io::{RecordingHeader, RecordingWriter};
use depthcut_core::source::{FrameSet, FrameSource};

/// Depth frame from row-major units.
pub fn depth_frame(width: u32, height: u32, units: &[u16]) -> DepthFrame {
    DepthFrame::new(width, height, units.to_vec()).unwrap()
}

/// Depth frame where every pixel has the same unit.
pub fn flat_depth(width: u32, height: u32, unit: u16) -> DepthFrame {
    DepthFrame::new(width, height, vec![unit; width as usize * height as usize]).unwrap()
}

/// Color frame where every pixel is `pixel`.
pub fn color_frame(width: u32, height: u32, pixel: &[u8]) -> ColorFrame {
    ColorFrame::filled(width, height, pixel).unwrap()
}

pub fn stream(unique_id: u32, kind: StreamKind, width: u32, height: u32) -> StreamProfile {
    StreamProfile {
        unique_id,
        stream: kind,
        width,
        height,
        fps: 30,
    }
}

/// A depth camera with one depth sensor and the given streams.
pub fn camera(name: &str, depth_scale: f32, streams: Vec<StreamProfile>) -> DeviceProfile {
    DeviceProfile {
        name: name.into(),
        sensors: vec![
            Sensor::new("Stereo Module", SensorKind::Depth { depth_scale }),
            Sensor::new("RGB Camera", SensorKind::Color),
        ],
        streams,
    }
}

/// Depth + color camera at 1 mm per unit.
pub fn default_camera(width: u32, height: u32) -> DeviceProfile {
    camera(
        "Test Camera",
        0.001,
        vec![
            stream(1, StreamKind::Depth, width, height),
            stream(2, StreamKind::Color, width, height),
        ],
    )
}

/// Frame set with a depth frame and one video frame of `kind`.
pub fn frame_set(depth: DepthFrame, kind: StreamKind, color: ColorFrame) -> FrameSet {
    FrameSet::new().with_depth(depth).with_frame(kind, color)
}

enum Step {
    Frames(Option<DeviceProfile>, FrameSet),
    Fail(DepthcutError),
}

/// Frame source that replays a fixed script. A step may switch the active
/// profile just before its frame set is delivered, or fail the wait.
pub struct ScriptedSource {
    profile: DeviceProfile,
    steps: VecDeque<Step>,
}

impl ScriptedSource {
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            steps: VecDeque::new(),
        }
    }

    pub fn then(mut self, frames: FrameSet) -> Self {
        self.steps.push_back(Step::Frames(None, frames));
        self
    }

    pub fn then_switch(mut self, profile: DeviceProfile, frames: FrameSet) -> Self {
        self.steps.push_back(Step::Frames(Some(profile), frames));
        self
    }

    pub fn then_fail(mut self, error: DepthcutError) -> Self {
        self.steps.push_back(Step::Fail(error));
        self
    }
}

impl FrameSource for ScriptedSource {
    fn wait_for_frames(&mut self) -> Result<Option<FrameSet>> {
        let (switch, frames) = match self.steps.pop_front() {
            None => return Ok(None),
            Some(Step::Fail(error)) => return Err(error),
            Some(Step::Frames(switch, frames)) => (switch, frames),
        };
        if let Some(profile) = switch {
            self.profile = profile;
        }
        Ok(Some(frames))
    }

    fn active_profile(&self) -> &DeviceProfile {
        &self.profile
    }

    fn frames_remaining(&self) -> Option<usize> {
        Some(self.steps.len())
    }
}

/// Write a recording of `frames` aligned to `kind`.
pub fn write_recording(
    path: &Path,
    kind: StreamKind,
    depth_scale: f32,
    frames: &[(DepthFrame, ColorFrame)],
) {
    let (first_depth, first_color) = &frames[0];
    let header = RecordingHeader::new(
        first_depth.width(),
        first_depth.height(),
        first_color.bytes_per_pixel() as u32,
        kind,
        depth_scale,
    )
    .with_device_name("Bench Camera");
    let mut writer = RecordingWriter::create(path, &header).unwrap();
    for (depth, color) in frames {
        writer.write_frame(depth, color).unwrap();
    }
    writer.finalize().unwrap();
}

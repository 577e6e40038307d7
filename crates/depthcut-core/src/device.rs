//! Device description: sensors, stream profiles and the choices derived from
//! them (depth scale, alignment target, profile change detection).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DepthcutError, Result};

/// Stream types a depth camera can expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Depth,
    Color,
    Infrared,
    Fisheye,
    Gyro,
    Accel,
    Pose,
}

impl StreamKind {
    /// True for streams that carry a pixel grid depth can be aligned to.
    pub fn is_video(self) -> bool {
        matches!(
            self,
            Self::Depth | Self::Color | Self::Infrared | Self::Fisheye
        )
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Depth => 1,
            Self::Color => 2,
            Self::Infrared => 3,
            Self::Fisheye => 4,
            Self::Gyro => 5,
            Self::Accel => 6,
            Self::Pose => 7,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Depth),
            2 => Some(Self::Color),
            3 => Some(Self::Infrared),
            4 => Some(Self::Fisheye),
            5 => Some(Self::Gyro),
            6 => Some(Self::Accel),
            7 => Some(Self::Pose),
            _ => None,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depth => write!(f, "Depth"),
            Self::Color => write!(f, "Color"),
            Self::Infrared => write!(f, "Infrared"),
            Self::Fisheye => write!(f, "Fisheye"),
            Self::Gyro => write!(f, "Gyro"),
            Self::Accel => write!(f, "Accel"),
            Self::Pose => write!(f, "Pose"),
        }
    }
}

/// Capabilities of a sensor. Only depth sensors carry a depth scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorKind {
    /// Meters per raw depth unit.
    Depth { depth_scale: f32 },
    Color,
    Motion,
    Pose,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    pub name: String,
    pub kind: SensorKind,
}

impl Sensor {
    pub fn new(name: impl Into<String>, kind: SensorKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_depth(&self) -> bool {
        matches!(self.kind, SensorKind::Depth { .. })
    }

    pub fn depth_scale(&self) -> Option<f32> {
        match self.kind {
            SensorKind::Depth { depth_scale } => Some(depth_scale),
            _ => None,
        }
    }
}

/// One configured stream of the active device.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamProfile {
    /// Identifies this stream configuration across profile queries.
    pub unique_id: u32,
    pub stream: StreamKind,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// The device and stream configuration a frame source is currently running.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceProfile {
    pub name: String,
    pub sensors: Vec<Sensor>,
    pub streams: Vec<StreamProfile>,
}

/// Meters per depth unit, taken from the device's first depth sensor.
pub fn depth_scale(profile: &DeviceProfile) -> Result<f32> {
    profile
        .sensors
        .iter()
        .find_map(Sensor::depth_scale)
        .ok_or(DepthcutError::NoDepthSensor)
}

/// Choose the stream depth frames should be aligned to.
///
/// Color is preferred; otherwise the last other video stream in profile order
/// is used.
pub fn find_stream_to_align(streams: &[StreamProfile]) -> Result<StreamKind> {
    let mut align_to = None;
    let mut depth_found = false;

    for sp in streams {
        match sp.stream {
            StreamKind::Depth => depth_found = true,
            StreamKind::Color => align_to = Some(StreamKind::Color),
            kind if kind.is_video() && align_to != Some(StreamKind::Color) => {
                align_to = Some(kind)
            }
            _ => {}
        }
    }

    if !depth_found {
        return Err(DepthcutError::NoDepthStream);
    }
    align_to.ok_or(DepthcutError::NoAlignTarget)
}

/// True when any previously active stream is missing from `current`.
/// Newly added streams alone do not count as a change.
pub fn profile_changed(current: &[StreamProfile], previous: &[StreamProfile]) -> bool {
    previous
        .iter()
        .any(|sp| !current.iter().any(|c| c.unique_id == sp.unique_id))
}

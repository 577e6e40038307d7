//! Per-frame metadata attributes reported by a depth camera.

use std::collections::BTreeMap;
use std::fmt;

/// Frame-level metadata attributes, in export order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataAttribute {
    FrameCounter,
    FrameTimestamp,
    SensorTimestamp,
    ActualExposure,
    GainLevel,
    AutoExposure,
    WhiteBalance,
    TimeOfArrival,
    Temperature,
    BackendTimestamp,
    ActualFps,
    FrameLaserPower,
    FrameLaserPowerMode,
    ExposurePriority,
}

impl MetadataAttribute {
    /// Every attribute, in export order.
    pub const ALL: [MetadataAttribute; 14] = [
        Self::FrameCounter,
        Self::FrameTimestamp,
        Self::SensorTimestamp,
        Self::ActualExposure,
        Self::GainLevel,
        Self::AutoExposure,
        Self::WhiteBalance,
        Self::TimeOfArrival,
        Self::Temperature,
        Self::BackendTimestamp,
        Self::ActualFps,
        Self::FrameLaserPower,
        Self::FrameLaserPowerMode,
        Self::ExposurePriority,
    ];

    /// Position of this attribute in [`MetadataAttribute::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for MetadataAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameCounter => write!(f, "Frame Counter"),
            Self::FrameTimestamp => write!(f, "Frame Timestamp"),
            Self::SensorTimestamp => write!(f, "Sensor Timestamp"),
            Self::ActualExposure => write!(f, "Actual Exposure"),
            Self::GainLevel => write!(f, "Gain Level"),
            Self::AutoExposure => write!(f, "Auto Exposure"),
            Self::WhiteBalance => write!(f, "White Balance"),
            Self::TimeOfArrival => write!(f, "Time Of Arrival"),
            Self::Temperature => write!(f, "Temperature"),
            Self::BackendTimestamp => write!(f, "Backend Timestamp"),
            Self::ActualFps => write!(f, "Actual Fps"),
            Self::FrameLaserPower => write!(f, "Frame Laser Power"),
            Self::FrameLaserPowerMode => write!(f, "Frame Laser Power Mode"),
            Self::ExposurePriority => write!(f, "Exposure Priority"),
        }
    }
}

/// Attribute values attached to a single frame. Attributes absent from the
/// map are not supported by the frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    values: BTreeMap<MetadataAttribute, i64>,
}

impl FrameMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supports(&self, attr: MetadataAttribute) -> bool {
        self.values.contains_key(&attr)
    }

    pub fn get(&self, attr: MetadataAttribute) -> Option<i64> {
        self.values.get(&attr).copied()
    }

    pub fn set(&mut self, attr: MetadataAttribute, value: i64) {
        self.values.insert(attr, value);
    }

    pub fn with(mut self, attr: MetadataAttribute, value: i64) -> Self {
        self.set(attr, value);
        self
    }

    /// Supported attributes and their values, in export order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataAttribute, i64)> + '_ {
        self.values.iter().map(|(&a, &v)| (a, v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

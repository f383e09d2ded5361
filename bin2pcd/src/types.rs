use crate::error::{Error, Result};
use clap::ValueEnum;
use pcd_rs::DataKind;

/// A single KITTI point as laid out in the .bin file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub intensity: f32,
}

impl BinPoint {
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Positions with an optional per-point color in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    positions: Vec<[f32; 3]>,
    colors: Option<Vec<[f32; 3]>>,
}

impl PointCloud {
    pub fn new(positions: Vec<[f32; 3]>, colors: Option<Vec<[f32; 3]>>) -> Result<Self> {
        if let Some(colors) = &colors {
            if colors.len() != positions.len() {
                return Err(Error::ColorCountMismatch {
                    expect: positions.len(),
                    actual: colors.len(),
                });
            }
        }

        Ok(Self { positions, colors })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Encoding {
    Ascii,
    #[default]
    Binary,
}

impl From<Encoding> for DataKind {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Ascii => DataKind::Ascii,
            Encoding::Binary => DataKind::Binary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    /// Map normalized intensity to a gray level.
    #[default]
    Gray,
    /// Write positions only.
    None,
}

/// What to do when every intensity in a scan is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum DegeneratePolicy {
    /// Color every point black.
    #[default]
    Zero,
    /// Drop the color field for this file.
    Uncolored,
    /// Fail the conversion.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    pub encoding: Encoding,
    pub color: ColorMode,
    pub degenerate: DegeneratePolicy,
}

//! Point record types stored in the generated PCD files.

use pcd_rs::{PcdDeserialize, PcdSerialize};

/// A position-only point, written when no color is attached.
#[derive(Debug, Clone, Copy, PartialEq, PcdSerialize, PcdDeserialize)]
pub struct XyzPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A point with a libpcl-style packed `rgb` field.
///
/// `rgb` is written as an unsigned integer field (`TYPE U`, `SIZE 4`).
/// Readers that expect the libpcl/Open3D float-typed `rgb` (`TYPE F`)
/// must reinterpret the bits rather than convert the value.
#[derive(Debug, Clone, Copy, PartialEq, PcdSerialize, PcdDeserialize)]
pub struct XyzRgbPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: u32,
}

impl XyzRgbPoint {
    pub fn new([x, y, z]: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            x,
            y,
            z,
            rgb: pack_rgb(color),
        }
    }
}

impl From<[f32; 3]> for XyzPoint {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Quantizes a `[0, 1]` channel to a byte. Out-of-range and NaN values
/// saturate.
pub fn channel_to_u8(value: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// Packs a `[0, 1]` color into the libpcl `0x00RRGGBB` layout. The result
/// is stored as a `U32` field, not as the bit-cast `F32` libpcl uses.
pub fn pack_rgb([r, g, b]: [f32; 3]) -> u32 {
    let r = channel_to_u8(r) as u32;
    let g = channel_to_u8(g) as u32;
    let b = channel_to_u8(b) as u32;
    (r << 16) | (g << 8) | b
}

pub fn unpack_rgb(rgb: u32) -> [f32; 3] {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    [r, g, b]
}

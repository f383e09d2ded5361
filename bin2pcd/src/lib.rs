//! Conversion of KITTI `.bin` LiDAR scans into PCD files.
//!
//! A scan is a headerless sequence of little-endian `f32` quadruples
//! `(x, y, z, intensity)`. The converted file stores the positions and,
//! unless disabled, a gray `rgb` color derived from the min-max normalized
//! intensity.

pub mod color;
pub mod convert;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;

pub use color::{intensity_range, intensity_to_gray};
pub use convert::{convert_dir, convert_file, BatchReport};
pub use error::{Error, Result};
pub use io::{decode_bin, load_bin, load_pcd, write_pcd, POINT_SIZE};
pub use types::{BinPoint, ColorMode, ConvertOptions, DegeneratePolicy, Encoding, PointCloud};

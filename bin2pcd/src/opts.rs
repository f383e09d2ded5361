use bin2pcd::{ColorMode, ConvertOptions, DegeneratePolicy, Encoding};
use clap::Parser;
use std::path::PathBuf;

/// Convert KITTI .bin point cloud files to .pcd format.
#[derive(Debug, Clone, Parser)]
#[clap(author, version, about)]
pub struct Opts {
    /// Input .bin file or directory.
    pub input: PathBuf,

    /// Output .pcd file or directory.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    #[clap(long, value_enum, default_value_t = Encoding::Binary)]
    pub encoding: Encoding,

    /// Write positions only, without the intensity color.
    #[clap(long)]
    pub no_color: bool,

    /// How to color a scan whose intensities are all equal.
    #[clap(long, value_enum, default_value_t = DegeneratePolicy::Zero)]
    pub on_flat_intensity: DegeneratePolicy,

    /// Number of files converted in parallel in directory mode.
    #[clap(short, long, default_value_t = 1)]
    pub jobs: usize,
}

impl Opts {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            encoding: self.encoding,
            color: if self.no_color {
                ColorMode::None
            } else {
                ColorMode::Gray
            },
            degenerate: self.on_flat_intensity,
        }
    }
}

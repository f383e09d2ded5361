use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("failed to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed KITTI bin data: {len} bytes is not a multiple of {point_size}")]
    MalformedInput { len: usize, point_size: usize },

    #[error("intensity range is degenerate (every finite value equals {value})")]
    DegenerateIntensity { value: f32 },

    #[error("intensity range is undefined: the scan has no finite intensity values")]
    NoFiniteIntensity,

    #[error("expect {expect} colors to match the point count, but get {actual}")]
    ColorCountMismatch { expect: usize, actual: usize },

    #[error("output directory '{}' does not exist", path.display())]
    OutputDirMissing { path: PathBuf },

    #[error("unable to create directory '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write the pcd file '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read the pcd file '{}'", path.display())]
    PcdRead {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to start the conversion thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to convert '{}'", file.display())]
    Batch {
        file: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

use std::path::{Path, PathBuf};

pub const BIN_EXTENSION: &str = "bin";
pub const PCD_EXTENSION: &str = "pcd";

/// Returns true for file names ending with `.bin`.
pub fn is_kitti_bin<P>(file: P) -> bool
where
    P: AsRef<Path>,
{
    file.as_ref()
        .extension()
        .map(|ext| ext == BIN_EXTENSION)
        .unwrap_or(false)
}

/// Replaces the extension of `file` with `.pcd`, keeping its directory.
pub fn with_pcd_extension<P>(file: P) -> PathBuf
where
    P: AsRef<Path>,
{
    file.as_ref().with_extension(PCD_EXTENSION)
}

/// The bare `<stem>.pcd` file name for `file`.
pub fn pcd_file_name<P>(file: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let file_name = file.as_ref().file_name().unwrap_or_default();
    Path::new(file_name).with_extension(PCD_EXTENSION)
}

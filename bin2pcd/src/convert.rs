use crate::{
    color::intensity_to_gray,
    error::{Error, Result},
    io::{load_bin, write_pcd},
    types::{ColorMode, ConvertOptions, PointCloud},
    utils::{is_kitti_bin, pcd_file_name, with_pcd_extension},
};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Files written by a directory conversion, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
}

/// Converts one .bin file and returns the path of the written PCD file.
///
/// Without `output_path` the PCD file is placed next to the input. An
/// existing directory as `output_path` receives `<stem>.pcd`.
pub fn convert_file<PI>(
    input_path: PI,
    output_path: Option<&Path>,
    opts: &ConvertOptions,
) -> Result<PathBuf>
where
    PI: AsRef<Path>,
{
    let input_path = input_path.as_ref();

    let output_path = match output_path {
        Some(dir) if dir.is_dir() => dir.join(pcd_file_name(input_path)),
        Some(path) => path.to_path_buf(),
        None => with_pcd_extension(input_path),
    };

    let points = load_bin(input_path)?;
    debug!(
        "decoded {} points from '{}'",
        points.len(),
        input_path.display()
    );

    let colors = match opts.color {
        ColorMode::Gray => intensity_to_gray(&points, opts.degenerate)?,
        ColorMode::None => None,
    };
    let positions = points.iter().map(|point| point.position()).collect();
    let cloud = PointCloud::new(positions, colors)?;

    write_pcd(&cloud, &output_path, opts.encoding)?;
    debug!("wrote '{}'", output_path.display());

    Ok(output_path)
}

/// Converts every .bin file directly inside `input_dir`.
///
/// The first failing file aborts the batch. With `jobs > 1` the files are
/// converted on a dedicated thread pool.
pub fn convert_dir<PI>(
    input_dir: PI,
    output_dir: Option<&Path>,
    opts: &ConvertOptions,
    jobs: usize,
) -> Result<BatchReport>
where
    PI: AsRef<Path>,
{
    let input_dir = input_dir.as_ref();

    if !input_dir.is_dir() {
        return Err(Error::InputNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    if let Some(output_dir) = output_dir {
        fs::create_dir_all(output_dir).map_err(|source| Error::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }

    let input_files = list_bin_files(input_dir)?;
    let tasks: Vec<(PathBuf, PathBuf)> = input_files
        .into_iter()
        .map(|input_file| {
            let output_file = match output_dir {
                Some(dir) => dir.join(pcd_file_name(&input_file)),
                None => with_pcd_extension(&input_file),
            };
            (input_file, output_file)
        })
        .collect();

    let convert_one = |(input_file, output_file): &(PathBuf, PathBuf)| -> Result<PathBuf> {
        let name = input_file.file_name().unwrap_or(input_file.as_os_str());
        info!("Converting {}...", name.to_string_lossy());

        convert_file(input_file, Some(output_file.as_path()), opts).map_err(|source| {
            Error::Batch {
                file: input_file.clone(),
                source: Box::new(source),
            }
        })
    };

    let converted = if jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(|| {
            tasks
                .par_iter()
                .map(convert_one)
                .collect::<Result<Vec<_>>>()
        })?
    } else {
        tasks.iter().map(convert_one).collect::<Result<Vec<_>>>()?
    };

    Ok(BatchReport { converted })
}

fn list_bin_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| Error::Read {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut files = vec![];
    for entry in fs::read_dir(input_dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && is_kitti_bin(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

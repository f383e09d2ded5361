use crate::{
    error::{Error, Result},
    types::{BinPoint, Encoding, PointCloud},
};
use anyhow::anyhow;
use byteorder::{ByteOrder, LittleEndian};
use pcd_format::{unpack_rgb, XyzPoint, XyzRgbPoint};
use pcd_rs::{DataKind, PcdSerialize};
use std::{fs, io, mem, path::Path};

/// Byte size of one (x, y, z, intensity) record.
pub const POINT_SIZE: usize = 4 * mem::size_of::<f32>();

/// Decodes a KITTI .bin buffer. Trailing bytes that do not form a whole
/// point are an error rather than being dropped.
pub fn decode_bin(bytes: &[u8]) -> Result<Vec<BinPoint>> {
    if bytes.len() % POINT_SIZE != 0 {
        return Err(Error::MalformedInput {
            len: bytes.len(),
            point_size: POINT_SIZE,
        });
    }

    let points = bytes
        .chunks_exact(POINT_SIZE)
        .map(|chunk| {
            let [x, y, z, intensity] =
                [0, 4, 8, 12].map(|offset| LittleEndian::read_f32(&chunk[offset..]));
            BinPoint { x, y, z, intensity }
        })
        .collect();

    Ok(points)
}

pub fn load_bin<P>(path: P) -> Result<Vec<BinPoint>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    decode_bin(&bytes)
}

/// Writes the cloud as an unorganized (height = 1) PCD file. A packed
/// `rgb` field is added when the cloud carries colors.
pub fn write_pcd<P>(cloud: &PointCloud, pcd_file: P, encoding: Encoding) -> Result<()>
where
    P: AsRef<Path>,
{
    let pcd_file = pcd_file.as_ref();

    if let Some(parent) = pcd_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(Error::OutputDirMissing {
                path: parent.to_path_buf(),
            });
        }
    }

    let data_kind = encoding.into();
    let positions = cloud.positions().iter().copied();

    let result = match cloud.colors() {
        Some(colors) => {
            let points = positions
                .zip(colors.iter().copied())
                .map(|(position, color)| XyzRgbPoint::new(position, color));
            save_pcd(points, cloud.len(), pcd_file, data_kind)
        }
        None => save_pcd(positions.map(XyzPoint::from), cloud.len(), pcd_file, data_kind),
    };

    result.map_err(|source| Error::Write {
        path: pcd_file.to_path_buf(),
        source,
    })
}

fn save_pcd<P, T, I>(points: I, len: usize, pcd_file: P, data_kind: DataKind) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: PcdSerialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = pcd_rs::WriterInit {
        width: len as u64,
        height: 1,
        viewpoint: Default::default(),
        data_kind,
        schema: None,
    }
    .create(pcd_file)?;

    points
        .into_iter()
        .try_for_each(|point| writer.push(&point))?;
    writer.finish()?;

    Ok(())
}

/// Reads back a PCD file with `x`, `y`, `z` and an optional packed `rgb`
/// field.
pub fn load_pcd<P>(pcd_file: P) -> Result<PointCloud>
where
    P: AsRef<Path>,
{
    let pcd_file = pcd_file.as_ref();

    if !pcd_file.exists() {
        return Err(Error::InputNotFound {
            path: pcd_file.to_path_buf(),
        });
    }

    let (positions, colors) = read_pcd_records(pcd_file).map_err(|source| Error::PcdRead {
        path: pcd_file.to_path_buf(),
        source,
    })?;

    PointCloud::new(positions, colors)
}

type Records = (Vec<[f32; 3]>, Option<Vec<[f32; 3]>>);

fn read_pcd_records(pcd_file: &Path) -> anyhow::Result<Records> {
    let reader = pcd_rs::DynReader::open(pcd_file)?;
    let rgb_index = reader
        .meta()
        .field_defs
        .iter()
        .position(|def| def.name == "rgb");

    let mut positions = vec![];
    let mut colors = rgb_index.map(|_| vec![]);

    // the reader expects a body even when POINTS is 0
    if reader.meta().num_points == 0 {
        return Ok((positions, colors));
    }

    for record in reader {
        let record = record?;
        let xyz: [f32; 3] = record
            .to_xyz()
            .ok_or_else(|| anyhow!("No x, y or z field found"))?;
        positions.push(xyz);

        if let (Some(index), Some(colors)) = (rgb_index, colors.as_mut()) {
            let rgb = match record.0.get(index) {
                Some(pcd_rs::Field::U32(values)) => values.first().copied(),
                // libpcl stores the packed bits in a float field
                Some(pcd_rs::Field::F32(values)) => values.first().map(|value| value.to_bits()),
                _ => None,
            }
            .ok_or_else(|| anyhow!("unsupported rgb field"))?;
            colors.push(unpack_rgb(rgb));
        }
    }

    Ok((positions, colors))
}

use approx::assert_abs_diff_eq;
use bin2pcd::{
    convert_dir, convert_file, load_pcd, ColorMode, ConvertOptions, DegeneratePolicy, Encoding,
    Error,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bin2pcd_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_bin(path: &Path, points: &[[f32; 4]]) {
    let bytes: Vec<u8> = points
        .iter()
        .flatten()
        .flat_map(|value| value.to_le_bytes())
        .collect();
    fs::write(path, bytes).unwrap();
}

const SCAN: [[f32; 4]; 3] = [
    [1.5, -2.25, 0.125, 0.0],
    [10.0, 20.0, -30.0, 5.0],
    [-0.5, 0.75, 3.0e-3, 10.0],
];

#[test]
fn convert_single_file_next_to_input() {
    let dir = scratch_dir("single");
    let input = dir.join("000000.bin");
    write_bin(&input, &SCAN);

    let output = convert_file(&input, None, &ConvertOptions::default()).unwrap();
    assert_eq!(output, dir.join("000000.pcd"));

    let cloud = load_pcd(&output).unwrap();
    let expect: Vec<[f32; 3]> = SCAN.iter().map(|&[x, y, z, _]| [x, y, z]).collect();
    assert_eq!(cloud.positions(), expect.as_slice());

    let colors = cloud.colors().unwrap();
    let grays = [0.0, 0.5, 1.0];
    assert_eq!(colors.len(), grays.len());
    colors.iter().zip(grays).for_each(|(color, gray)| {
        color.iter().for_each(|&channel| {
            assert_abs_diff_eq!(channel, gray, epsilon = 1.0 / 255.0);
        });
    });

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn convert_ascii_round_trip() {
    let dir = scratch_dir("ascii");
    let input = dir.join("scan.bin");
    let output = dir.join("custom_name.pcd");
    write_bin(&input, &SCAN);

    let opts = ConvertOptions {
        encoding: Encoding::Ascii,
        ..Default::default()
    };
    let written = convert_file(&input, Some(output.as_path()), &opts).unwrap();
    assert_eq!(written, output);

    let header = fs::read_to_string(&output).unwrap();
    assert!(header.contains("DATA ascii"));
    assert!(header.contains("FIELDS x y z rgb"));
    assert!(header.contains("TYPE F F F U"));

    let cloud = load_pcd(&output).unwrap();
    assert_eq!(cloud.len(), SCAN.len());
    cloud
        .positions()
        .iter()
        .zip(&SCAN)
        .for_each(|(position, point)| {
            for (actual, expect) in position.iter().zip(point) {
                assert_abs_diff_eq!(*actual, *expect, epsilon = 1e-5);
            }
        });

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn convert_without_color() {
    let dir = scratch_dir("no_color");
    let input = dir.join("scan.bin");
    write_bin(&input, &SCAN);

    let opts = ConvertOptions {
        color: ColorMode::None,
        ..Default::default()
    };
    let output = convert_file(&input, None, &opts).unwrap();
    let cloud = load_pcd(&output).unwrap();
    assert_eq!(cloud.len(), SCAN.len());
    assert!(cloud.colors().is_none());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn convert_into_existing_directory() {
    let dir = scratch_dir("into_dir");
    let out_dir = dir.join("out");
    fs::create_dir_all(&out_dir).unwrap();
    let input = dir.join("000007.bin");
    write_bin(&input, &SCAN);

    let opts = ConvertOptions::default();
    let output = convert_file(&input, Some(out_dir.as_path()), &opts).unwrap();
    assert_eq!(output, out_dir.join("000007.pcd"));
    assert!(output.is_file());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn flat_intensity_policies() {
    let dir = scratch_dir("flat");
    let input = dir.join("flat.bin");
    write_bin(
        &input,
        &[[0.0, 0.0, 0.0, 3.0], [1.0, 1.0, 1.0, 3.0], [2.0, 2.0, 2.0, 3.0]],
    );

    let zero = convert_file(&input, None, &ConvertOptions::default()).unwrap();
    let cloud = load_pcd(&zero).unwrap();
    assert_eq!(cloud.colors().unwrap(), &[[0.0; 3]; 3]);

    let opts = ConvertOptions {
        degenerate: DegeneratePolicy::Uncolored,
        ..Default::default()
    };
    let uncolored = convert_file(&input, None, &opts).unwrap();
    assert!(load_pcd(&uncolored).unwrap().colors().is_none());

    let opts = ConvertOptions {
        degenerate: DegeneratePolicy::Error,
        ..Default::default()
    };
    let error_path = dir.join("error.pcd");
    let err = convert_file(&input, Some(error_path.as_path()), &opts).unwrap_err();
    assert!(matches!(err, Error::DegenerateIntensity { .. }));
    assert!(!error_path.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_file() {
    let dir = scratch_dir("missing_input");
    let opts = ConvertOptions::default();
    let err = convert_file(dir.join("nope.bin"), None, &opts).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_output_directory() {
    let dir = scratch_dir("missing_output");
    let input = dir.join("scan.bin");
    write_bin(&input, &SCAN);

    let output = dir.join("absent").join("scan.pcd");
    let opts = ConvertOptions::default();
    let err = convert_file(&input, Some(output.as_path()), &opts).unwrap_err();
    assert!(matches!(err, Error::OutputDirMissing { .. }));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_input_file() {
    let dir = scratch_dir("malformed");
    let input = dir.join("broken.bin");
    fs::write(&input, [0u8; 15]).unwrap();

    let err = convert_file(&input, None, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { len: 15, .. }));
    assert!(!dir.join("broken.pcd").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn convert_empty_scan_round_trip() {
    let dir = scratch_dir("empty");
    let input = dir.join("empty.bin");
    fs::write(&input, [0u8; 0]).unwrap();

    let output = convert_file(&input, None, &ConvertOptions::default()).unwrap();
    assert_eq!(output, dir.join("empty.pcd"));

    let cloud = load_pcd(&output).unwrap();
    assert!(cloud.is_empty());
    assert_eq!(cloud.colors().map(|colors| colors.len()), Some(0));

    let _ = fs::remove_dir_all(&dir);
}

fn populate_batch(dir: &Path) {
    for (index, name) in ["000002", "000000", "000001"].iter().enumerate() {
        let offset = index as f32;
        let points = SCAN.map(|[x, y, z, i]| [x + offset, y, z, i]);
        write_bin(&dir.join(format!("{name}.bin")), &points);
    }
    fs::write(dir.join("calib.txt"), "not a scan").unwrap();
    fs::create_dir_all(dir.join("nested.bin")).unwrap();
}

#[test]
fn convert_directory_into_output_dir() {
    let dir = scratch_dir("batch");
    let input_dir = dir.join("velodyne");
    let output_dir = dir.join("pcd").join("velodyne");
    fs::create_dir_all(&input_dir).unwrap();
    populate_batch(&input_dir);

    let report = convert_dir(
        &input_dir,
        Some(output_dir.as_path()),
        &ConvertOptions::default(),
        1,
    )
    .unwrap();

    let expect: Vec<PathBuf> = ["000000.pcd", "000001.pcd", "000002.pcd"]
        .iter()
        .map(|name| output_dir.join(name))
        .collect();
    assert_eq!(report.converted, expect);

    let mut written: Vec<_> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["000000.pcd", "000001.pcd", "000002.pcd"]);

    for path in &expect {
        let cloud = load_pcd(path).unwrap();
        assert_eq!(cloud.len(), SCAN.len());
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn convert_directory_in_place_parallel() {
    let dir = scratch_dir("batch_parallel");
    populate_batch(&dir);

    let report = convert_dir(&dir, None, &ConvertOptions::default(), 3).unwrap();
    assert_eq!(report.converted.len(), 3);
    assert!(report.converted.windows(2).all(|pair| pair[0] < pair[1]));
    for path in &report.converted {
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path.is_file());
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn batch_aborts_on_malformed_file() {
    let dir = scratch_dir("batch_abort");
    populate_batch(&dir);
    fs::write(dir.join("000001.bin"), [0u8; 20]).unwrap();

    let err = convert_dir(&dir, None, &ConvertOptions::default(), 1).unwrap_err();
    match err {
        Error::Batch { file, source } => {
            assert_eq!(file, dir.join("000001.bin"));
            assert!(matches!(*source, Error::MalformedInput { len: 20, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.join("000002.pcd").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn batch_on_missing_directory() {
    let dir = scratch_dir("batch_missing");
    let opts = ConvertOptions::default();
    let err = convert_dir(dir.join("absent"), None, &opts, 1).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));

    let _ = fs::remove_dir_all(&dir);
}

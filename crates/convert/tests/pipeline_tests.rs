//! End-to-end conversion flows across the data directories.

use convert::{
    grib_to_zarr, load_lazy, netcdf_to_zarr, zarr_to_netcdf, CombineStrategy, ConvertError,
    ConvertOutcome, DataDirs, SkipReason,
};
use dataset::AttrValue;
use grib_source::KeyFilter;
use test_utils::{write_collision_file, write_simple_file, TILE_EDGE};
use zarr_store::StoreConfig;

fn fixture_dirs(tmp: &std::path::Path) -> DataDirs {
    let dirs = DataDirs::new(tmp.join("raw_data"), tmp.join("zarr_data"), tmp.join("nc_data"));
    dirs.ensure().unwrap();
    dirs
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_netcdf_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());
    write_simple_file(&dirs.raw_file("simple.nc"));

    let outcome =
        netcdf_to_zarr(&dirs, "simple.nc", "simple", &[], &StoreConfig::default()).unwrap();
    let report = match outcome {
        ConvertOutcome::Stored(report) => report,
        other => panic!("expected Stored, got {:?}", other),
    };
    assert_eq!(report.arrays, 3);

    let out = zarr_to_netcdf(&dirs, "simple", CombineStrategy::ByCoords).unwrap();
    assert_eq!(out, dirs.nc_file("simple"));

    let original = netcdf_source::open_dataset(&dirs.raw_file("simple.nc")).unwrap();
    let round_tripped = netcdf_source::open_dataset(&out).unwrap();

    assert_eq!(round_tripped.dims(), original.dims());
    for (name, var) in original.data_vars() {
        let rt = round_tripped
            .data_vars()
            .get(name)
            .unwrap_or_else(|| panic!("{} survived the round trip", name));
        assert_eq!(rt.dims(), var.dims());
        assert_eq!(rt.data(), var.data());
        assert_eq!(rt.attrs(), var.attrs());
    }
    assert_eq!(
        round_tripped.attrs().get("source"),
        Some(&AttrValue::from("gridzarr test fixture"))
    );
}

#[test]
fn test_collision_without_refactor_names_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());
    write_collision_file(&dirs.raw_file("tile.nc"));

    let outcome = netcdf_to_zarr(&dirs, "tile.nc", "tile", &[], &StoreConfig::default()).unwrap();
    match outcome {
        ConvertOutcome::Skipped(SkipReason::UnresolvedCollision { names }) => {
            assert_eq!(names, vec!["grid_xt".to_string(), "grid_yt".to_string()]);
        }
        other => panic!("expected skip, got {:?}", other),
    }
    // Nothing was written.
    assert!(!dirs.store_path("tile").exists());
}

#[test]
fn test_refactored_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());
    write_collision_file(&dirs.raw_file("tile.nc"));

    let outcome = netcdf_to_zarr(
        &dirs,
        "tile.nc",
        "tile",
        &names(&["grid_xt", "grid_yt"]),
        &StoreConfig::default(),
    )
    .unwrap();
    assert!(matches!(outcome, ConvertOutcome::Stored(_)));

    let out = zarr_to_netcdf(&dirs, "tile", CombineStrategy::ByCoords).unwrap();
    let round_tripped = netcdf_source::open_dataset(&out).unwrap();

    // The renaming is the only difference from the raw file.
    let xt = round_tripped
        .coords()
        .get("grid_xt_coord")
        .expect("renamed coordinate survived");
    assert_eq!(xt.dims(), &["grid_xt".to_string(), "node".to_string()]);
    assert_eq!(
        xt.attrs().get("long_name"),
        Some(&AttrValue::from("T-cell longitude"))
    );
    assert_eq!(round_tripped.dims().get("grid_xt"), Some(&TILE_EDGE));

    let tmp_var = round_tripped.data_vars().get("tmp").expect("tmp survived");
    assert_eq!(tmp_var.data()[0], 250.0);
}

#[test]
fn test_persist_twice_fails_second_time() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());
    write_simple_file(&dirs.raw_file("simple.nc"));

    netcdf_to_zarr(&dirs, "simple.nc", "simple", &[], &StoreConfig::default()).unwrap();
    let result = netcdf_to_zarr(&dirs, "simple.nc", "simple", &[], &StoreConfig::default());
    assert!(matches!(
        result,
        Err(ConvertError::Store(zarr_store::StoreError::AlreadyExists { .. }))
    ));
}

#[test]
fn test_missing_source_file() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());

    let result = netcdf_to_zarr(&dirs, "absent.nc", "absent", &[], &StoreConfig::default());
    assert!(matches!(result, Err(ConvertError::MissingSource { .. })));

    let result = grib_to_zarr(
        &dirs,
        "absent.grb",
        "absent",
        &KeyFilter::new(),
        &StoreConfig::default(),
    );
    assert!(matches!(result, Err(ConvertError::MissingSource { .. })));
}

#[test]
fn test_lazy_load_through_store() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());
    write_simple_file(&dirs.raw_file("simple.nc"));

    netcdf_to_zarr(&dirs, "simple.nc", "simple", &[], &StoreConfig::default()).unwrap();

    let mut lazy = load_lazy(&dirs, "simple", "t2m").unwrap();
    assert_eq!(lazy.shape(), &[4, 5]);
    assert_eq!(lazy.dims(), &["lat".to_string(), "lon".to_string()]);

    let chunk = lazy.read_chunk(&[0, 0]).unwrap();
    assert_eq!(chunk.len(), 20);
    assert_eq!(chunk[0], 270.0);
}

#[test]
fn test_export_missing_store_fails_loudly() {
    let tmp = tempfile::tempdir().unwrap();
    let dirs = fixture_dirs(tmp.path());

    let result = zarr_to_netcdf(&dirs, "ghost", CombineStrategy::Nested);
    assert!(matches!(
        result,
        Err(ConvertError::Store(zarr_store::StoreError::Open { .. }))
    ));
}

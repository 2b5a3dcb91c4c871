//! Store persist/open/lazy-read behavior.

use dataset::AttrValue;
use test_utils::sample_dataset;
use zarr_store::{open_dataset, persist, LazyArray, StoreConfig, StoreError};

#[test]
fn test_persist_writes_store() {
    let root = tempfile::tempdir().unwrap();
    let ds = sample_dataset();

    let report = persist(root.path(), "sample", &ds, &StoreConfig::default()).unwrap();

    assert_eq!(report.arrays, 4);
    assert!(report.path.ends_with("sample.zarr"));
    assert!(report.path.join("zarr.json").is_file());
    assert!(report.path.join("t2m").join("zarr.json").is_file());
    assert!(report.bytes_on_disk > 0);
}

#[test]
fn test_persist_refuses_existing_store() {
    let root = tempfile::tempdir().unwrap();
    let ds = sample_dataset();

    persist(root.path(), "sample", &ds, &StoreConfig::default()).unwrap();
    let first = open_dataset(&root.path().join("sample.zarr")).unwrap();

    match persist(root.path(), "sample", &ds, &StoreConfig::default()) {
        Err(StoreError::AlreadyExists { path }) => assert!(path.ends_with("sample.zarr")),
        other => panic!("expected AlreadyExists, got {:?}", other.map(|_| ())),
    }

    // The failed attempt left the first store untouched.
    let second = open_dataset(&root.path().join("sample.zarr")).unwrap();
    assert_eq!(
        first.data_vars()["t2m"].data(),
        second.data_vars()["t2m"].data()
    );
}

#[test]
fn test_round_trip_preserves_dataset() {
    let root = tempfile::tempdir().unwrap();
    let ds = sample_dataset();
    let report = persist(root.path(), "rt", &ds, &StoreConfig::default()).unwrap();

    let back = open_dataset(&report.path).unwrap();

    assert_eq!(back.dims(), ds.dims());
    assert_eq!(
        back.attrs().get("title"),
        Some(&AttrValue::from("sample forecast slice"))
    );

    let t2m = &back.data_vars()["t2m"];
    let orig = &ds.data_vars()["t2m"];
    assert_eq!(t2m.dims(), orig.dims());
    assert_eq!(t2m.shape(), orig.shape());
    assert_eq!(t2m.data(), orig.data());
    assert_eq!(t2m.attrs().get("units"), Some(&AttrValue::from("K")));
    match t2m.attrs().get("_FillValue") {
        Some(AttrValue::Float(v)) => assert!(v.is_nan()),
        other => panic!("expected NaN fill value, got {:?}", other),
    }

    assert_eq!(back.coords()["lat"].data(), &[30.0, 40.0, 50.0]);
}

#[test]
fn test_lazy_array_shape_and_chunks() {
    let root = tempfile::tempdir().unwrap();
    let ds = sample_dataset();
    let config = StoreConfig { chunk_edge: 2 };
    let report = persist(root.path(), "lazy", &ds, &config).unwrap();

    let mut lazy = LazyArray::open(&report.path, "t2m").unwrap();

    // Shape recorded at persist time: (lat=3, lon=4), chunked 2x2.
    assert_eq!(lazy.shape(), &[3, 4]);
    assert_eq!(lazy.dims(), &["lat".to_string(), "lon".to_string()]);
    assert_eq!(lazy.chunk_shape(), &[2, 2]);
    assert_eq!(lazy.chunk_grid_shape(), vec![2, 2]);
    assert_eq!(lazy.num_chunks(), 4);
    assert_eq!(lazy.num_elements(), 12);

    // First chunk covers rows 0-1, cols 0-1 of the 3x4 grid laid out
    // 260..272 row-major.
    let chunk = lazy.read_chunk(&[0, 0]).unwrap();
    assert_eq!(chunk, vec![260.0, 261.0, 264.0, 265.0]);

    // Cached read returns the same values.
    assert_eq!(lazy.read_chunk(&[0, 0]).unwrap(), chunk);

    // Arbitrary subset.
    let subset = lazy.read_subset(&[1, 1], &[2, 2]).unwrap();
    assert_eq!(subset, vec![265.0, 266.0, 269.0, 270.0]);
}

#[test]
fn test_lazy_array_missing_variable() {
    let root = tempfile::tempdir().unwrap();
    let ds = sample_dataset();
    let report = persist(root.path(), "missing", &ds, &StoreConfig::default()).unwrap();

    match LazyArray::open(&report.path, "nope") {
        Err(StoreError::MissingVariable { variable, .. }) => assert_eq!(variable, "nope"),
        other => panic!("expected MissingVariable, got {:?}", other.err()),
    }
}

#[test]
fn test_open_rejects_non_store() {
    let root = tempfile::tempdir().unwrap();
    match open_dataset(&root.path().join("absent.zarr")) {
        Err(StoreError::Open { .. }) => {}
        other => panic!("expected Open error, got {:?}", other.map(|_| ())),
    }
}

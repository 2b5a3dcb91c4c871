//! Dataset → NetCDF writing and read-back.

use dataset::AttrValue;
use netcdf_source::{open_dataset, write_dataset};
use test_utils::sample_dataset;

#[test]
fn test_write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.nc");

    let ds = sample_dataset();
    write_dataset(&path, &ds).unwrap();

    let back = open_dataset(&path).unwrap();

    assert_eq!(back.dims(), ds.dims());
    assert_eq!(
        back.attrs().get("title"),
        Some(&AttrValue::from("sample forecast slice"))
    );

    let t2m = back.data_vars().get("t2m").expect("t2m present");
    let orig = ds.data_vars().get("t2m").unwrap();
    assert_eq!(t2m.dims(), orig.dims());
    assert_eq!(t2m.data(), orig.data());
    assert_eq!(t2m.attrs().get("units"), Some(&AttrValue::from("K")));
    match t2m.attrs().get("_FillValue") {
        Some(AttrValue::Float(v)) => assert!(v.is_nan()),
        other => panic!("expected NaN fill value, got {:?}", other),
    }

    let lat = back.coords().get("lat").expect("lat coordinate");
    assert_eq!(lat.data(), &[30.0, 40.0, 50.0]);
}

#[test]
fn test_integer_attributes_keep_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attrs.nc");

    let mut ds = sample_dataset();
    ds.set_attr("small", AttrValue::Int(7));
    ds.set_attr("huge", AttrValue::Int(i64::MAX));
    write_dataset(&path, &ds).unwrap();

    let back = open_dataset(&path).unwrap();
    assert_eq!(back.attrs().get("small"), Some(&AttrValue::Int(7)));
    assert_eq!(back.attrs().get("huge"), Some(&AttrValue::Int(i64::MAX)));
}

//! Coordinate refactoring: the collision fix and its failure modes.

use dataset::{AttrValue, DatasetError};
use netcdf_source::{
    refactor_coordinates, NetcdfSourceError, DEFAULT_COORD_SUFFIX, DEFAULT_SECONDARY_AXIS,
};
use test_utils::{write_collision_file, TILE_EDGE};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_refactor_resolves_collision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    let ds = refactor_coordinates(
        &path,
        &names(&["grid_xt", "grid_yt"]),
        DEFAULT_COORD_SUFFIX,
        DEFAULT_SECONDARY_AXIS,
    )
    .unwrap();

    // The renamed coordinate carries the `(name, node)` axis pair.
    let xt = ds.coords().get("grid_xt_coord").expect("renamed coordinate");
    assert_eq!(
        xt.dims(),
        &["grid_xt".to_string(), DEFAULT_SECONDARY_AXIS.to_string()]
    );
    assert_eq!(xt.shape(), &[TILE_EDGE, TILE_EDGE]);

    // Metadata copied verbatim from the raw file.
    assert_eq!(
        xt.attrs().get("long_name"),
        Some(&AttrValue::from("T-cell longitude"))
    );
    assert_eq!(xt.attrs().get("units"), Some(&AttrValue::from("degrees_E")));

    // Values are the raw file's values.
    assert_eq!(xt.data()[1], 0.5);

    // The original axis survives at its original length; the colliding
    // *variable* is gone.
    assert_eq!(ds.dims().get("grid_xt"), Some(&TILE_EDGE));
    assert!(ds.variable("grid_xt").is_none());
    assert_eq!(ds.dims().get(DEFAULT_SECONDARY_AXIS), Some(&TILE_EDGE));

    // Everything not listed is untouched.
    let tmp = ds.data_vars().get("tmp").expect("tmp untouched");
    assert_eq!(tmp.shape(), &[2, TILE_EDGE, TILE_EDGE]);
    assert_eq!(tmp.data()[0], 250.0);
    assert!(ds.coords().contains_key("pfull"));

    ds.validate().unwrap();
}

#[test]
fn test_refactor_is_order_independent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    let forward = refactor_coordinates(
        &path,
        &names(&["grid_xt", "grid_yt"]),
        DEFAULT_COORD_SUFFIX,
        DEFAULT_SECONDARY_AXIS,
    )
    .unwrap();
    let reversed = refactor_coordinates(
        &path,
        &names(&["grid_yt", "grid_xt"]),
        DEFAULT_COORD_SUFFIX,
        DEFAULT_SECONDARY_AXIS,
    )
    .unwrap();

    assert_eq!(forward, reversed);
}

#[test]
fn test_refactor_missing_variable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    match refactor_coordinates(
        &path,
        &names(&["grid_xt", "grid_yt", "grid_zt"]),
        "coord",
        "node",
    ) {
        Err(NetcdfSourceError::MissingVariable { name }) => assert_eq!(name, "grid_zt"),
        other => panic!("expected MissingVariable, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_refactor_rejects_empty_and_duplicate_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    assert!(matches!(
        refactor_coordinates(&path, &[], "coord", "node"),
        Err(NetcdfSourceError::EmptyRefactorList)
    ));
    assert!(matches!(
        refactor_coordinates(&path, &names(&["grid_xt", "grid_xt"]), "coord", "node"),
        Err(NetcdfSourceError::DuplicateRefactorName(_))
    ));
}

#[test]
fn test_refactor_secondary_axis_length_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    // "pfull" already exists with length 2; the refactored coordinates
    // would pin it to the tile edge length.
    match refactor_coordinates(&path, &names(&["grid_xt", "grid_yt"]), "coord", "pfull") {
        Err(NetcdfSourceError::Dataset(DatasetError::DimLengthConflict { name, .. })) => {
            assert_eq!(name, "pfull");
        }
        other => panic!("expected DimLengthConflict, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_refactor_secondary_axis_variable_collision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    // Naming the fresh axis after an existing data variable recreates the
    // very collision the refactor exists to remove.
    match refactor_coordinates(&path, &names(&["grid_xt", "grid_yt"]), "coord", "tmp") {
        Err(NetcdfSourceError::Dataset(DatasetError::NameCollision { name, .. })) => {
            assert_eq!(name, "tmp");
        }
        other => panic!("expected NameCollision, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_refactor_does_not_modify_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tile.nc");
    write_collision_file(&path);

    let before = std::fs::metadata(&path).unwrap().len();
    let _ = refactor_coordinates(
        &path,
        &names(&["grid_xt", "grid_yt"]),
        DEFAULT_COORD_SUFFIX,
        DEFAULT_SECONDARY_AXIS,
    )
    .unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), before);
}

//! NetCDF file fixtures.

use std::path::Path;

/// Edge length of the square tile grids in the collision fixture.
pub const TILE_EDGE: usize = 6;

/// Write a small, well-formed NetCDF file: index coordinates `lat(lat)` and
/// `lon(lon)`, one data variable `t2m(lat, lon)`, attributes at both levels.
pub fn write_simple_file(path: &Path) {
    let mut file = netcdf::create(path).expect("create fixture file");

    file.add_dimension("lat", 4).unwrap();
    file.add_dimension("lon", 5).unwrap();
    file.add_attribute("source", "gridzarr test fixture").unwrap();

    let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
    lat.put_attribute("units", "degrees_north").unwrap();
    lat.put_values(&[10.0, 20.0, 30.0, 40.0], ..).unwrap();

    let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
    lon.put_attribute("units", "degrees_east").unwrap();
    lon.put_values(&[0.0, 1.0, 2.0, 3.0, 4.0], ..).unwrap();

    let mut t2m = file.add_variable::<f64>("t2m", &["lat", "lon"]).unwrap();
    t2m.put_attribute("units", "K").unwrap();
    t2m.put_attribute("long_name", "2 metre temperature").unwrap();
    let values: Vec<f64> = (0..20).map(|i| 270.0 + i as f64 * 0.5).collect();
    t2m.put_values(&values, ..).unwrap();
}

/// Write a UFS-tile-shaped file exhibiting the naming collision: 2-D grid
/// variables `grid_xt(grid_yt, grid_xt)` and `grid_yt(grid_yt, grid_xt)`
/// named after their own dimensions, plus an ordinary data variable and an
/// index coordinate. The tile is square so the refactored coordinate's
/// leading axis lines up with the dimension it is named after.
pub fn write_collision_file(path: &Path) {
    let mut file = netcdf::create(path).expect("create fixture file");
    let n = TILE_EDGE;

    file.add_dimension("grid_yt", n).unwrap();
    file.add_dimension("grid_xt", n).unwrap();
    file.add_dimension("pfull", 2).unwrap();
    file.add_attribute("grid", "cubed_sphere tile").unwrap();

    let cells = n * n;
    let lons: Vec<f64> = (0..cells).map(|i| (i % n) as f64 * 0.5).collect();
    let lats: Vec<f64> = (0..cells).map(|i| (i / n) as f64 * 0.5 - 10.0).collect();

    let mut xt = file
        .add_variable::<f64>("grid_xt", &["grid_yt", "grid_xt"])
        .unwrap();
    xt.put_attribute("long_name", "T-cell longitude").unwrap();
    xt.put_attribute("units", "degrees_E").unwrap();
    xt.put_values(&lons, ..).unwrap();

    let mut yt = file
        .add_variable::<f64>("grid_yt", &["grid_yt", "grid_xt"])
        .unwrap();
    yt.put_attribute("long_name", "T-cell latitude").unwrap();
    yt.put_attribute("units", "degrees_N").unwrap();
    yt.put_values(&lats, ..).unwrap();

    let mut pfull = file.add_variable::<f64>("pfull", &["pfull"]).unwrap();
    pfull.put_attribute("units", "mb").unwrap();
    pfull.put_values(&[500.0, 850.0], ..).unwrap();

    let mut tmp = file
        .add_variable::<f64>("tmp", &["pfull", "grid_yt", "grid_xt"])
        .unwrap();
    tmp.put_attribute("units", "K").unwrap();
    let values: Vec<f64> = (0..2 * cells).map(|i| 250.0 + i as f64 * 0.25).collect();
    tmp.put_values(&values, ..).unwrap();
}

//! In-memory dataset fixtures.

use std::collections::BTreeMap;

use dataset::{AttrValue, LabeledDataset, Variable};

/// Build a small labeled dataset: `lat`/`lon` index coordinates, two data
/// variables, dataset- and variable-level attributes.
pub fn sample_dataset() -> LabeledDataset {
    let mut ds = LabeledDataset::new();
    ds.set_attr("title", AttrValue::from("sample forecast slice"));

    let mut lat_attrs = BTreeMap::new();
    lat_attrs.insert("units".to_string(), AttrValue::from("degrees_north"));
    ds.insert_coord(
        "lat",
        Variable::new(
            vec!["lat".to_string()],
            vec![3],
            vec![30.0, 40.0, 50.0],
            lat_attrs,
        )
        .unwrap(),
    )
    .unwrap();

    let mut lon_attrs = BTreeMap::new();
    lon_attrs.insert("units".to_string(), AttrValue::from("degrees_east"));
    ds.insert_coord(
        "lon",
        Variable::new(
            vec!["lon".to_string()],
            vec![4],
            vec![0.0, 90.0, 180.0, 270.0],
            lon_attrs,
        )
        .unwrap(),
    )
    .unwrap();

    let mut t_attrs = BTreeMap::new();
    t_attrs.insert("units".to_string(), AttrValue::from("K"));
    t_attrs.insert("_FillValue".to_string(), AttrValue::Float(f64::NAN));
    let temps: Vec<f64> = (0..12).map(|i| 260.0 + i as f64).collect();
    ds.insert_data_var(
        "t2m",
        Variable::new(
            vec!["lat".to_string(), "lon".to_string()],
            vec![3, 4],
            temps,
            t_attrs,
        )
        .unwrap(),
    )
    .unwrap();

    let mut p_attrs = BTreeMap::new();
    p_attrs.insert("units".to_string(), AttrValue::from("Pa"));
    let pressures: Vec<f64> = (0..12).map(|i| 100_000.0 - i as f64 * 250.0).collect();
    ds.insert_data_var(
        "sp",
        Variable::new(
            vec!["lat".to_string(), "lon".to_string()],
            vec![3, 4],
            pressures,
            p_attrs,
        )
        .unwrap(),
    )
    .unwrap();

    ds
}

//! NetCDF file reading into labeled datasets.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use dataset::{AttrValue, LabeledDataset, Variable};

use crate::error::{NcResult, NetcdfSourceError};

/// Load a NetCDF file into a labeled dataset.
///
/// Fails with [`NetcdfSourceError::NameCollision`] when a variable shares a
/// name with one of its dimensions without being that dimension's 1-D index
/// coordinate; such files need [`crate::refactor_coordinates`] instead.
pub fn open_dataset(path: &Path) -> NcResult<LabeledDataset> {
    open_dataset_dropping(path, &[])
}

/// Load a NetCDF file, excluding the named variables entirely.
///
/// The excluded variables take no part in collision detection; this is the
/// first pass of the refactoring flow.
pub fn open_dataset_dropping(path: &Path, drop_variables: &[String]) -> NcResult<LabeledDataset> {
    crate::silence_hdf5_errors();

    let file = netcdf::open(path).map_err(|e| NetcdfSourceError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut ds = LabeledDataset::new();
    for dim in file.dimensions() {
        ds.add_dim(&dim.name(), dim.len())?;
    }
    for attr in file.attributes() {
        let name = attr.name().to_string();
        let value = attr.value().map_err(|e| NetcdfSourceError::Read {
            name: name.clone(),
            message: e.to_string(),
        })?;
        ds.set_attr(&name, attr_from_netcdf(value));
    }

    let mut collisions = Vec::new();
    for var in file.variables() {
        let name = var.name();
        if drop_variables.iter().any(|d| d == &name) {
            debug!(variable = %name, "dropping variable from labeled load");
            continue;
        }

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let is_index_coord = dims.len() == 1 && dims[0] == name;
        if !is_index_coord && ds.dims().contains_key(&name) {
            collisions.push(name);
            continue;
        }

        let variable = read_variable(&var)?;
        if is_index_coord {
            ds.insert_coord(&name, variable)?;
        } else {
            ds.insert_data_var(&name, variable)?;
        }
    }

    if !collisions.is_empty() {
        collisions.sort();
        return Err(NetcdfSourceError::NameCollision { names: collisions });
    }

    // Honor the CF-style coordinates marker: variables it names become
    // coordinates, and the marker itself is consumed.
    if let Some(AttrValue::Text(list)) = ds.attrs().get("coordinates").cloned() {
        for name in list.split_whitespace() {
            ds.promote_to_coord(name);
        }
        ds.remove_attr("coordinates");
    }

    debug!(
        file = %path.display(),
        dims = ds.dims().len(),
        vars = ds.num_vars(),
        "loaded NetCDF file"
    );
    Ok(ds)
}

/// Read one variable's values and attributes verbatim.
pub(crate) fn read_variable(var: &netcdf::Variable) -> NcResult<Variable> {
    let name = var.name();
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let data: Vec<f64> = var.get_values(..).map_err(|e| NetcdfSourceError::Read {
        name: name.clone(),
        message: e.to_string(),
    })?;

    let attrs = read_attrs(var)?;
    Ok(Variable::new(dims, shape, data, attrs)?)
}

/// Read a variable's full attribute set.
pub(crate) fn read_attrs(var: &netcdf::Variable) -> NcResult<BTreeMap<String, AttrValue>> {
    let mut attrs = BTreeMap::new();
    for attr in var.attributes() {
        let name = attr.name().to_string();
        let value = attr.value().map_err(|e| NetcdfSourceError::Read {
            name: format!("{}:{}", var.name(), name),
            message: e.to_string(),
        })?;
        attrs.insert(name, attr_from_netcdf(value));
    }
    Ok(attrs)
}

/// Map a NetCDF attribute payload into the shared attribute model.
pub(crate) fn attr_from_netcdf(value: netcdf::AttributeValue) -> AttrValue {
    use netcdf::AttributeValue as A;
    match value {
        A::Uchar(v) => AttrValue::Int(v as i64),
        A::Schar(v) => AttrValue::Int(v as i64),
        A::Ushort(v) => AttrValue::Int(v as i64),
        A::Short(v) => AttrValue::Int(v as i64),
        A::Uint(v) => AttrValue::Int(v as i64),
        A::Int(v) => AttrValue::Int(v as i64),
        A::Ulonglong(v) => AttrValue::Int(v as i64),
        A::Longlong(v) => AttrValue::Int(v),
        A::Float(v) => AttrValue::Float(v as f64),
        A::Double(v) => AttrValue::Float(v),
        A::Str(v) => AttrValue::Text(v),
        A::Uchars(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Schars(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Ushorts(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Shorts(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Uints(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Ints(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Ulonglongs(vs) => AttrValue::IntList(vs.into_iter().map(|v| v as i64).collect()),
        A::Longlongs(vs) => AttrValue::IntList(vs),
        A::Floats(vs) => AttrValue::FloatList(vs.into_iter().map(|v| v as f64).collect()),
        A::Doubles(vs) => AttrValue::FloatList(vs),
        A::Strs(vs) => AttrValue::TextList(vs),
        #[allow(unreachable_patterns)]
        other => AttrValue::Text(format!("{:?}", other)),
    }
}

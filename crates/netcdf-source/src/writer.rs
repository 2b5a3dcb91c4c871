//! Writing labeled datasets back out as NetCDF.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use dataset::{AttrValue, LabeledDataset, Variable};

use crate::error::{NcResult, NetcdfSourceError};

/// Write a dataset to a NetCDF-4 file at `path`.
///
/// Dimensions are created first, then coordinate and data variables as
/// 64-bit floats with their attribute sets. Attributes go in before values
/// so `_FillValue` and friends land while the variable is still fresh.
pub fn write_dataset(path: &Path, ds: &LabeledDataset) -> NcResult<()> {
    crate::silence_hdf5_errors();

    let mut file = netcdf::create(path).map_err(|e| NetcdfSourceError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    for (name, len) in ds.dims() {
        file.add_dimension(name, *len)
            .map_err(|e| NetcdfSourceError::Write {
                name: name.clone(),
                message: e.to_string(),
            })?;
    }

    for (name, value) in ds.attrs() {
        file.add_attribute(name, attr_to_netcdf(value))
            .map_err(|e| NetcdfSourceError::Write {
                name: name.clone(),
                message: e.to_string(),
            })?;
    }

    // CF-style marker so auxiliary coordinates (renamed grid variables and
    // the like) reload as coordinates rather than data variables.
    let aux_coords = ds.auxiliary_coord_names();
    if !aux_coords.is_empty() {
        file.add_attribute("coordinates", aux_coords.join(" ").as_str())
            .map_err(|e| NetcdfSourceError::Write {
                name: "coordinates".to_string(),
                message: e.to_string(),
            })?;
    }

    for (name, var) in ds.coords().iter().chain(ds.data_vars().iter()) {
        write_variable(&mut file, name, var)?;
    }

    info!(
        file = %path.display(),
        dims = ds.dims().len(),
        vars = ds.num_vars(),
        "wrote NetCDF file"
    );
    Ok(())
}

fn write_variable(file: &mut netcdf::FileMut, name: &str, var: &Variable) -> NcResult<()> {
    let dim_names: Vec<&str> = var.dims().iter().map(String::as_str).collect();
    let mut nc_var =
        file.add_variable::<f64>(name, &dim_names)
            .map_err(|e| NetcdfSourceError::Write {
                name: name.to_string(),
                message: e.to_string(),
            })?;

    write_attrs(&mut nc_var, name, var.attrs())?;

    nc_var
        .put_values(var.data(), ..)
        .map_err(|e| NetcdfSourceError::Write {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    debug!(variable = %name, shape = ?var.shape(), "wrote variable");
    Ok(())
}

fn write_attrs(
    nc_var: &mut netcdf::VariableMut,
    var_name: &str,
    attrs: &BTreeMap<String, AttrValue>,
) -> NcResult<()> {
    for (attr_name, value) in attrs {
        nc_var
            .put_attribute(attr_name, attr_to_netcdf(value))
            .map_err(|e| NetcdfSourceError::Write {
                name: format!("{}:{}", var_name, attr_name),
                message: e.to_string(),
            })?;
    }
    Ok(())
}

/// Map the shared attribute model onto NetCDF attribute payloads.
///
/// Integers keep 32-bit width when they fit, so files read back with the
/// types most tools expect.
fn attr_to_netcdf(value: &AttrValue) -> netcdf::AttributeValue {
    use netcdf::AttributeValue as A;
    match value {
        AttrValue::Text(s) => A::Str(s.clone()),
        AttrValue::Int(v) => {
            if let Ok(narrow) = i32::try_from(*v) {
                A::Int(narrow)
            } else {
                A::Longlong(*v)
            }
        }
        AttrValue::Float(v) => A::Double(*v),
        AttrValue::IntList(vs) => {
            if vs.iter().all(|v| i32::try_from(*v).is_ok()) {
                A::Ints(vs.iter().map(|v| *v as i32).collect())
            } else {
                A::Longlongs(vs.clone())
            }
        }
        AttrValue::FloatList(vs) => A::Doubles(vs.clone()),
        AttrValue::TextList(vs) => A::Strs(vs.clone()),
    }
}

//! Coordinate refactoring for variable/dimension name collisions.
//!
//! Some model output (notably UFS tile files) carries 2-D grid variables
//! named after one of their own dimensions, e.g. `grid_xt(grid_yt, grid_xt)`.
//! A labeled dataset cannot hold such a variable: the name would be claimed
//! by both the dimension and the variable. The fix mirrors what operators do
//! by hand: reload the file without the offending variables, then re-attach
//! each one as a renamed coordinate, `{name}_{suffix}` over the axis pair
//! `(name, secondary_axis)`, with values and attributes copied verbatim
//! from a second, raw pass over the file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info};

use dataset::{LabeledDataset, Variable};

use crate::error::{NcResult, NetcdfSourceError};
use crate::reader::{self, open_dataset_dropping};

/// Suffix appended to a conflicting variable's name.
pub const DEFAULT_COORD_SUFFIX: &str = "coord";

/// Name of the fresh axis taking the conflicting variable's second dimension.
pub const DEFAULT_SECONDARY_AXIS: &str = "node";

/// Load a NetCDF file whose `conflicting` variables collide with dimension
/// names, resolving the collision by renaming them into coordinates.
///
/// The result contains every other variable untouched, the original
/// dimensions (including the one each conflicting variable was named
/// after), and one coordinate `{name}_{coord_suffix}` with axes
/// `(name, secondary_axis)` per conflicting name. The merge is
/// order-independent: permuting `conflicting` yields an identical dataset.
///
/// No partial result is ever returned; any failure leaves the caller with
/// the error alone. The operation reads the file twice and writes nothing.
pub fn refactor_coordinates(
    path: &Path,
    conflicting: &[String],
    coord_suffix: &str,
    secondary_axis: &str,
) -> NcResult<LabeledDataset> {
    if conflicting.is_empty() {
        return Err(NetcdfSourceError::EmptyRefactorList);
    }
    let mut seen = BTreeSet::new();
    for name in conflicting {
        if !seen.insert(name.as_str()) {
            return Err(NetcdfSourceError::DuplicateRefactorName(name.clone()));
        }
    }

    // Pass 1: labeled load with the conflicting variables excluded.
    let mut ds = open_dataset_dropping(path, conflicting)?;

    // Pass 2: raw reader for verbatim values and attributes.
    let file = netcdf::open(path).map_err(|e| NetcdfSourceError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut coords: BTreeMap<String, Variable> = BTreeMap::new();
    for name in conflicting {
        let var = file
            .variable(name)
            .ok_or_else(|| NetcdfSourceError::MissingVariable { name: name.clone() })?;

        let raw = reader::read_variable(&var)?;
        if raw.ndim() != 2 {
            return Err(NetcdfSourceError::UnsupportedRank {
                name: name.clone(),
                ndim: raw.ndim(),
            });
        }

        let renamed = format!("{}_{}", name, coord_suffix);
        let shape = raw.shape().to_vec();
        let attrs = raw.attrs().clone();
        let coord = Variable::new(
            vec![name.clone(), secondary_axis.to_string()],
            shape,
            raw.data().to_vec(),
            attrs,
        )?;
        debug!(
            variable = %name,
            coordinate = %renamed,
            secondary_axis = %secondary_axis,
            "refactored conflicting variable"
        );
        coords.insert(renamed, coord);
    }

    // Merge; residual collisions (suffix reuse, secondary-axis length
    // conflicts, axis length mismatches) surface here and abort the whole
    // operation before the caller sees anything.
    ds.assign_coords(coords)?;
    ds.validate()?;

    info!(
        file = %path.display(),
        refactored = conflicting.len(),
        "loaded NetCDF file with refactored coordinates"
    );
    Ok(ds)
}

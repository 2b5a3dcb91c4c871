//! Labeled dataset and variable types.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::attrs::AttrValue;
use crate::error::{DatasetError, DatasetResult};

/// An N-dimensional variable: row-major values plus named axes and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Vec<String>,
    shape: Vec<usize>,
    data: Vec<f64>,
    attrs: BTreeMap<String, AttrValue>,
}

impl Variable {
    /// Create a variable, checking that rank and element count are consistent.
    pub fn new(
        dims: Vec<String>,
        shape: Vec<usize>,
        data: Vec<f64>,
        attrs: BTreeMap<String, AttrValue>,
    ) -> DatasetResult<Self> {
        if dims.len() != shape.len() {
            return Err(DatasetError::RankMismatch {
                dims: dims.len(),
                rank: shape.len(),
            });
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(DatasetError::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dims,
            shape,
            data,
            attrs,
        })
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A self-describing collection of labeled variables.
///
/// Dimensions, coordinate variables and data variables live in ordered maps,
/// so assembling the same contents in any order yields an identical dataset.
///
/// The naming invariant enforced throughout: a variable may only share a
/// dimension's name when it is that dimension's 1-D index coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    dims: BTreeMap<String, usize>,
    coords: BTreeMap<String, Variable>,
    data_vars: BTreeMap<String, Variable>,
    attrs: BTreeMap<String, AttrValue>,
}

impl LabeledDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dimension, or confirm its length if already present.
    pub fn add_dim(&mut self, name: &str, len: usize) -> DatasetResult<()> {
        match self.dims.get(name) {
            Some(&existing) if existing != len => Err(DatasetError::DimLengthConflict {
                name: name.to_string(),
                existing,
                requested: len,
            }),
            _ => {
                self.dims.insert(name.to_string(), len);
                Ok(())
            }
        }
    }

    /// Add a data variable, registering its dimensions.
    pub fn insert_data_var(&mut self, name: &str, var: Variable) -> DatasetResult<()> {
        self.check_name_free(name)?;
        if self.dims.contains_key(name) {
            return Err(DatasetError::NameCollision {
                name: name.to_string(),
                dim: name.to_string(),
            });
        }
        self.register_var_dims(&var)?;
        self.data_vars.insert(name.to_string(), var);
        Ok(())
    }

    /// Add a coordinate variable, registering its dimensions.
    ///
    /// The name may match a dimension only for the classic 1-D index
    /// coordinate (`lat(lat)` and friends).
    pub fn insert_coord(&mut self, name: &str, var: Variable) -> DatasetResult<()> {
        self.check_name_free(name)?;
        let is_index_coord = var.ndim() == 1 && var.dims()[0] == name;
        if self.dims.contains_key(name) && !is_index_coord {
            return Err(DatasetError::NameCollision {
                name: name.to_string(),
                dim: name.to_string(),
            });
        }
        self.register_var_dims(&var)?;
        self.coords.insert(name.to_string(), var);
        Ok(())
    }

    /// Merge a coordinate collection into this dataset.
    ///
    /// All-or-nothing: the dataset is untouched if any entry fails, so a
    /// caller never observes a half-merged result.
    pub fn assign_coords(&mut self, coords: BTreeMap<String, Variable>) -> DatasetResult<()> {
        let mut merged = self.clone();
        for (name, var) in coords {
            merged.insert_coord(&name, var)?;
        }
        *self = merged;
        Ok(())
    }

    /// Check the naming invariant over the whole dataset.
    pub fn validate(&self) -> DatasetResult<()> {
        for (name, var) in self.coords.iter().chain(self.data_vars.iter()) {
            if self.dims.contains_key(name) && !(var.ndim() == 1 && var.dims()[0] == *name) {
                return Err(DatasetError::NameCollision {
                    name: name.clone(),
                    dim: name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn dims(&self) -> &BTreeMap<String, usize> {
        &self.dims
    }

    pub fn coords(&self) -> &BTreeMap<String, Variable> {
        &self.coords
    }

    pub fn data_vars(&self) -> &BTreeMap<String, Variable> {
        &self.data_vars
    }

    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    pub fn set_attr(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_string(), value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove(name)
    }

    /// Reclassify a data variable as a coordinate. Returns `false` when no
    /// data variable of that name exists.
    pub fn promote_to_coord(&mut self, name: &str) -> bool {
        match self.data_vars.remove(name) {
            Some(var) => {
                self.coords.insert(name.to_string(), var);
                true
            }
            None => false,
        }
    }

    /// Coordinate names that are not plain 1-D index coordinates; these are
    /// the ones a NetCDF round trip has to record explicitly.
    pub fn auxiliary_coord_names(&self) -> Vec<String> {
        self.coords
            .iter()
            .filter(|(name, var)| !(var.ndim() == 1 && var.dims()[0] == **name))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Look up a variable by name, coordinates first.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.coords.get(name).or_else(|| self.data_vars.get(name))
    }

    /// Total number of variables (coordinates + data).
    pub fn num_vars(&self) -> usize {
        self.coords.len() + self.data_vars.len()
    }

    /// Human-readable summary: coordinates, dimensions and data variables
    /// with their axes.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== Coordinate variables ==");
        for (name, var) in &self.coords {
            let _ = writeln!(out, "- {}  {:?}", name, var.dims());
        }
        let _ = writeln!(out, "\n== Dimensions ==");
        for (name, len) in &self.dims {
            let _ = writeln!(out, "- {}: {}", name, len);
        }
        let _ = writeln!(out, "\n== Data variables ==");
        for (name, var) in &self.data_vars {
            let _ = writeln!(out, "- {}  {:?}", name, var.dims());
        }
        out
    }

    fn check_name_free(&self, name: &str) -> DatasetResult<()> {
        if self.coords.contains_key(name) || self.data_vars.contains_key(name) {
            return Err(DatasetError::NameInUse(name.to_string()));
        }
        Ok(())
    }

    fn register_var_dims(&mut self, var: &Variable) -> DatasetResult<()> {
        for (dim, &len) in var.dims().iter().zip(var.shape()) {
            self.add_dim(dim, len)?;
        }
        Ok(())
    }
}

//! GRIB2 file reading into labeled datasets.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use grib::codetables::{CodeTable4_2, CodeTable4_5, Lookup};
use tracing::{debug, info};

use dataset::{AttrValue, LabeledDataset, Variable};

use crate::error::{GribResult, GribSourceError};
use crate::filter::KeyFilter;

/// Metadata describing one GRIB2 message, the surface the key filter sees.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageMeta {
    /// Parameter name from code table 4.2, sanitized to an identifier.
    pub short_name: String,
    /// First fixed surface type from code table 4.5, sanitized.
    pub type_of_level: String,
    /// First fixed surface value.
    pub level: i64,
    /// Forecast time value, when the product definition carries one.
    pub forecast_time: Option<u32>,
}

impl MessageMeta {
    /// Value of one filterable key, rendered as text.
    pub fn key_value(&self, key: &str) -> Option<String> {
        match key {
            "shortName" => Some(self.short_name.clone()),
            "typeOfLevel" => Some(self.type_of_level.clone()),
            "level" => Some(self.level.to_string()),
            _ => None,
        }
    }
}

/// Load a GRIB2 file into a labeled dataset, keeping only messages that
/// satisfy `filter`.
///
/// Each surviving message becomes one data variable named after its
/// parameter, over a flat per-grid-size dimension (the uncombined
/// representation); grid geometry reconstruction is out of scope here. Two
/// surviving messages with the same name is the multiple-hypercube
/// condition and fails with [`GribSourceError::MultipleFields`]; a filter
/// that removes everything fails with
/// [`GribSourceError::FilterUnderSelection`].
pub fn load_dataset(path: &Path, filter: &KeyFilter) -> GribResult<LabeledDataset> {
    let file = File::open(path)?;
    let grib2 = grib::from_reader(BufReader::new(file)).map_err(|e| GribSourceError::Parse {
        path: path.display().to_string(),
        message: format!("{:?}", e),
    })?;

    let mut total = 0usize;
    let mut fields: BTreeMap<String, (MessageMeta, Vec<f64>)> = BTreeMap::new();
    for ((section, message), submsg) in grib2.iter() {
        total += 1;

        let discipline = submsg.indicator().discipline;
        let prod_def = submsg.prod_def();
        let short_name = match (prod_def.parameter_category(), prod_def.parameter_number()) {
            (Some(category), Some(number)) => sanitize(
                &CodeTable4_2::new(discipline, category)
                    .lookup(usize::from(number))
                    .to_string(),
            ),
            _ => format!("field_{}_{}", section, message),
        };
        let (type_of_level, level) = match prod_def.fixed_surfaces() {
            Some((first, _)) => (
                sanitize(
                    &CodeTable4_5
                        .lookup(usize::from(first.surface_type))
                        .to_string(),
                ),
                first.value() as i64,
            ),
            None => ("unknown".to_string(), 0),
        };
        let meta = MessageMeta {
            short_name,
            type_of_level,
            level,
            forecast_time: prod_def.forecast_time().map(|ft| ft.value),
        };

        if !filter.matches(&meta) {
            debug!(field = %meta.short_name, "message rejected by filter");
            continue;
        }

        let name = meta.short_name.clone();
        let decoder =
            grib::Grib2SubmessageDecoder::from(submsg).map_err(|e| GribSourceError::Decode {
                name: name.clone(),
                message: format!("{:?}", e),
            })?;
        let values: Vec<f64> = decoder
            .dispatch()
            .map_err(|e| GribSourceError::Decode {
                name: name.clone(),
                message: format!("{:?}", e),
            })?
            .map(f64::from)
            .collect();

        if fields.insert(name.clone(), (meta, values)).is_some() {
            return Err(GribSourceError::MultipleFields { name });
        }
    }

    if total == 0 {
        return Err(GribSourceError::NoMessages {
            path: path.display().to_string(),
        });
    }
    if fields.is_empty() {
        return Err(GribSourceError::FilterUnderSelection {
            filter: filter.describe(),
        });
    }

    let ds = assemble(fields)?;
    info!(
        file = %path.display(),
        messages = total,
        fields = ds.data_vars().len(),
        "loaded GRIB2 file"
    );
    Ok(ds)
}

/// Build the dataset: one flat dimension per distinct grid size, one data
/// variable per field.
fn assemble(fields: BTreeMap<String, (MessageMeta, Vec<f64>)>) -> GribResult<LabeledDataset> {
    let mut ds = LabeledDataset::new();

    let mut dim_names: BTreeMap<usize, String> = BTreeMap::new();
    for (_, values) in fields.values() {
        let next = dim_names.len();
        dim_names.entry(values.len()).or_insert_with(|| {
            if next == 0 {
                "values".to_string()
            } else {
                format!("values_{}", next)
            }
        });
    }

    for (name, (meta, values)) in fields {
        let dim = dim_names[&values.len()].clone();
        let len = values.len();

        let mut attrs = BTreeMap::new();
        attrs.insert("shortName".to_string(), AttrValue::Text(meta.short_name));
        attrs.insert(
            "typeOfLevel".to_string(),
            AttrValue::Text(meta.type_of_level),
        );
        attrs.insert("level".to_string(), AttrValue::Int(meta.level));
        if let Some(ft) = meta.forecast_time {
            attrs.insert("forecastTime".to_string(), AttrValue::Int(ft as i64));
        }

        let var = Variable::new(vec![dim], vec![len], values, attrs)?;
        ds.insert_data_var(&name, var)?;
    }
    Ok(ds)
}

/// Collapse a code-table description into a snake_case identifier.
pub(crate) fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_sep = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        "unknown".to_string()
    } else {
        out
    }
}

//! CLI command implementations
//!
//! All command functions return `CliResult<String>` instead of printing or calling
//! `process::exit`. Printing, error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::{Schema, SchemaDocument};
use crate::generators::dunders;
use crate::runtime::value::Value;
use crate::runtime::{Instance, protocol};

use super::{CliError, CliResult};

/// Load and define a schema document.
fn load(path: &Path) -> CliResult<Schema> {
    let document = SchemaDocument::load(path).map_err(CliError::diagnostic)?;
    let schema = document.define().map_err(CliError::diagnostic)?;
    tracing::info!(
        file = %path.display(),
        classes = schema.classes().len(),
        samples = schema.samples().len(),
        "schema loaded"
    );
    Ok(schema)
}

/// `cluegen clues`: one line per class, `Name: field: type, ...`.
pub fn clues(path: &Path, only: Option<&str>) -> CliResult<String> {
    let schema = load(path)?;
    let classes: Vec<_> = match only {
        Some(name) => {
            let class = schema
                .class(name)
                .ok_or_else(|| CliError::failure(format!("Error: no class named `{name}` in {}", path.display())))?;
            vec![class.clone()]
        }
        None => schema.classes().to_vec(),
    };

    let mut out = String::new();
    for class in classes {
        let _ = writeln!(out, "{}: {}", class.name(), class.clues());
    }
    Ok(out.trim_end().to_string())
}

/// `cluegen show`: representation and field values of every sample.
pub fn show(path: &Path, compare: bool) -> CliResult<String> {
    let schema = load(path)?;
    let mut out = String::new();

    for (i, sample) in schema.samples().iter().enumerate() {
        let repr = sample.repr().map_err(CliError::diagnostic)?;
        let _ = writeln!(out, "#{i} {repr}");
        if sample.class().is_pending(dunders::ITER).is_some() {
            let _ = writeln!(out, "   values: {}", field_values(sample)?);
        }
    }

    if compare {
        let samples = schema.samples();
        for (i, left) in samples.iter().enumerate() {
            for (j, right) in samples.iter().enumerate().skip(i + 1) {
                let equal = protocol::equals(&Value::from(left.clone()), &Value::from(right.clone()))
                    .map_err(CliError::diagnostic)?;
                let _ = writeln!(out, "#{i} == #{j}: {equal}");
            }
        }
    }
    Ok(out.trim_end().to_string())
}

fn field_values(sample: &Instance) -> CliResult<String> {
    let values = sample.iter().map_err(CliError::diagnostic)?;
    Ok(values.map(Value::repr).collect::<Vec<_>>().join(", "))
}

/// `cluegen slots`: each class's slots, marked `pending` or `installed`.
pub fn slots(path: &Path, with_samples: bool) -> CliResult<String> {
    let schema = load(path)?;
    if with_samples {
        for sample in schema.samples() {
            sample.repr().map_err(CliError::diagnostic)?;
        }
    }

    let mut out = String::new();
    for class in schema.classes() {
        let _ = writeln!(out, "{}", class.name());
        for slot in class.slot_names() {
            let state = match class.is_pending(&slot) {
                Some(true) => "pending",
                Some(false) => "installed",
                None => continue,
            };
            let _ = writeln!(out, "  {slot}: {state}");
        }
    }
    Ok(out.trim_end().to_string())
}

use std::path::PathBuf;

use tracing::{error, info};

use crate::config::{Config, DatasetSpec};
use crate::error::{ConvertError, Result};
use crate::export::to_geojson_string;
use crate::output::{ensure_dir, write_document};
use crate::reader::read_shapefile;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub feature_count: usize,
    pub fields: Vec<String>,
    pub bytes_written: usize,
}

#[derive(Debug)]
pub enum DatasetOutcome {
    Converted(ConversionSummary),
    Failed(ConvertError),
    /// Not attempted because an earlier step failed.
    Skipped,
}

#[derive(Debug)]
pub struct DatasetReport {
    pub name: String,
    pub outcome: DatasetOutcome,
}

#[derive(Debug)]
pub struct RunReport {
    /// Set when the output directory could not be created.
    pub setup_error: Option<ConvertError>,
    pub datasets: Vec<DatasetReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.setup_error.is_none()
            && self
                .datasets
                .iter()
                .all(|d| matches!(d.outcome, DatasetOutcome::Converted(_)))
    }

    pub fn first_error(&self) -> Option<&ConvertError> {
        self.setup_error.as_ref().or_else(|| {
            self.datasets.iter().find_map(|d| match &d.outcome {
                DatasetOutcome::Failed(err) => Some(err),
                _ => None,
            })
        })
    }

    pub fn converted(&self) -> impl Iterator<Item = &ConversionSummary> {
        self.datasets.iter().filter_map(|d| match &d.outcome {
            DatasetOutcome::Converted(summary) => Some(summary),
            _ => None,
        })
    }
}

/// Read one shapefile, serialize it and write the GeoJSON file.
pub fn convert_dataset(config: &Config, dataset: &DatasetSpec) -> Result<ConversionSummary> {
    let input = config.input_path(dataset);
    info!("Reading {} shapefile from: {}", dataset.name, input.display());
    let shapes = read_shapefile(&input)?;
    let feature_count = shapes.len();
    let fields = shapes.fields.clone();

    let text = to_geojson_string(shapes)?;
    let output = config.output_path(dataset);
    write_document(&output, &text)?;
    info!(
        "Successfully saved {} GeoJSON to: {}",
        dataset.name,
        output.display()
    );

    Ok(ConversionSummary {
        name: dataset.name.clone(),
        input,
        output,
        feature_count,
        fields,
        bytes_written: text.len(),
    })
}

/// Convert every configured dataset in order, stopping at the first failure.
///
/// Files written before the failure are left in place. The failure is logged
/// and recorded in the report; it is never returned as an error.
pub fn run(config: &Config) -> RunReport {
    let mut report = RunReport {
        setup_error: None,
        datasets: Vec::with_capacity(config.datasets.len()),
    };

    if let Err(err) = ensure_dir(config.output_dir()) {
        error!("Error occurred: {}", err);
        report.setup_error = Some(err);
    }

    let mut failed = report.setup_error.is_some();
    for dataset in &config.datasets {
        let outcome = if failed {
            DatasetOutcome::Skipped
        } else {
            match convert_dataset(config, dataset) {
                Ok(summary) => DatasetOutcome::Converted(summary),
                Err(err) => {
                    error!("Error occurred: {}", err);
                    failed = true;
                    DatasetOutcome::Failed(err)
                }
            }
        };
        report.datasets.push(DatasetReport {
            name: dataset.name.clone(),
            outcome,
        });
    }
    report
}

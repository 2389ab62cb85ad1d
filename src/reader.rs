use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat};
use dbase::encoding::LossyCodePage;
use dbase::yore::code_pages;
use dbase::{FieldValue, Record, UnicodeLossy};
use geojson::JsonObject;
use serde_json::{Number, Value as JsonValue};
use shapefile::{Reader, ShapeReader};
use tracing::{debug, warn};

use crate::dataset::{ShapeDataset, ShapeRecord};
use crate::error::{ConvertError, Result};
use crate::geometry::shape_to_geometry;

/// Load a shapefile and its `.dbf` attributes into memory.
///
/// The `.dbf` and `.shx` siblings must sit next to `path` with the same stem.
/// The `.prj` sibling is optional and is kept verbatim as [`ShapeDataset::crs`].
/// Attribute text is decoded with the code page named by the `.cpg` sibling,
/// or the one marked in the `.dbf` header when there is no usable `.cpg`.
pub fn read_shapefile(path: &Path) -> Result<ShapeDataset> {
    if !path.is_file() {
        return Err(ConvertError::MissingInput(path.to_path_buf()));
    }
    let dbf_path = find_sibling(path, "dbf").ok_or_else(|| missing(path, "dbf"))?;
    find_sibling(path, "shx").ok_or_else(|| missing(path, "shx"))?;
    let crs = read_projection(path)?;

    let shape_reader = ShapeReader::from_path(path)?;
    let dbf_reader = open_attributes(path, &dbf_path)?;
    let fields: Vec<String> = dbf_reader
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect();
    let shape_type = shape_reader.header().shape_type;

    let mut reader = Reader::new(shape_reader, dbf_reader);
    let mut records = Vec::new();
    for shape_and_record in reader.iter_shapes_and_records() {
        let (shape, record) = shape_and_record?;
        records.push(ShapeRecord {
            geometry: shape_to_geometry(shape)?,
            properties: record_to_properties(&record, &fields),
        });
    }
    debug!(
        "Read {} {} records with {} fields",
        records.len(),
        shape_type,
        fields.len()
    );

    Ok(ShapeDataset {
        shape_type,
        fields,
        crs,
        records,
    })
}

/// Sibling file with the same stem, accepting lower or upper case extensions.
fn find_sibling(path: &Path, extension: &str) -> Option<PathBuf> {
    [extension.to_lowercase(), extension.to_uppercase()]
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

fn missing(path: &Path, extension: &str) -> ConvertError {
    ConvertError::MissingSibling(path.with_extension(extension))
}

/// Text encodings a `.cpg` file can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodePage {
    Utf8,
    Cp437,
    Cp850,
    Cp1250,
    Cp1251,
    Cp1252,
}

impl CodePage {
    fn from_cpg(label: &str) -> Option<Self> {
        let label = label.trim().to_uppercase().replace(['-', '_', ' '], "");
        let label = label
            .strip_prefix("WINDOWS")
            .or_else(|| label.strip_prefix("ANSI"))
            .or_else(|| label.strip_prefix("CP"))
            .unwrap_or(&label);
        match label {
            "UTF8" | "65001" => Some(CodePage::Utf8),
            "437" | "OEM" => Some(CodePage::Cp437),
            "850" => Some(CodePage::Cp850),
            "1250" => Some(CodePage::Cp1250),
            "1251" => Some(CodePage::Cp1251),
            // Latin-1 only differs from 1252 in the C1 control range
            "1252" | "ISO88591" | "88591" | "28591" | "LATIN1" => Some(CodePage::Cp1252),
            _ => None,
        }
    }
}

fn open_attributes(path: &Path, dbf_path: &Path) -> Result<dbase::Reader<BufReader<File>>> {
    let code_page = match find_sibling(path, "cpg") {
        Some(cpg_path) => {
            let label = fs_err::read_to_string(&cpg_path)?;
            let code_page = CodePage::from_cpg(&label);
            if code_page.is_none() {
                warn!(
                    "Unknown code page {:?} in {}, using the .dbf header",
                    label.trim(),
                    cpg_path.display()
                );
            }
            code_page
        }
        None => None,
    };
    let reader = match code_page {
        Some(CodePage::Utf8) => dbase::Reader::from_path_with_encoding(dbf_path, UnicodeLossy),
        Some(CodePage::Cp437) => {
            dbase::Reader::from_path_with_encoding(dbf_path, LossyCodePage(code_pages::CP437))
        }
        Some(CodePage::Cp850) => {
            dbase::Reader::from_path_with_encoding(dbf_path, LossyCodePage(code_pages::CP850))
        }
        Some(CodePage::Cp1250) => {
            dbase::Reader::from_path_with_encoding(dbf_path, LossyCodePage(code_pages::CP1250))
        }
        Some(CodePage::Cp1251) => {
            dbase::Reader::from_path_with_encoding(dbf_path, LossyCodePage(code_pages::CP1251))
        }
        Some(CodePage::Cp1252) => {
            dbase::Reader::from_path_with_encoding(dbf_path, LossyCodePage(code_pages::CP1252))
        }
        None => dbase::Reader::from_path(dbf_path),
    }?;
    Ok(reader)
}

fn read_projection(path: &Path) -> Result<Option<String>> {
    match find_sibling(path, "prj") {
        Some(prj_path) => {
            let wkt = fs_err::read_to_string(prj_path)?;
            Ok(Some(wkt.trim().to_string()))
        }
        None => {
            warn!(
                "No .prj file next to {}, coordinate reference system unknown",
                path.display()
            );
            Ok(None)
        }
    }
}

fn record_to_properties(record: &Record, fields: &[String]) -> JsonObject {
    let mut properties = JsonObject::new();
    for name in fields {
        let value = record
            .get(name)
            .map(field_value_to_json)
            .unwrap_or(JsonValue::Null);
        properties.insert(name.clone(), value);
    }
    properties
}

fn field_value_to_json(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::Character(v) => v.clone().map_or(JsonValue::Null, JsonValue::String),
        FieldValue::Memo(v) if v.is_empty() => JsonValue::Null,
        FieldValue::Memo(v) => JsonValue::String(v.clone()),
        FieldValue::Numeric(v) => v.map_or(JsonValue::Null, numeric),
        FieldValue::Float(v) => v.map_or(JsonValue::Null, |f| number(f64::from(f))),
        FieldValue::Currency(v) | FieldValue::Double(v) => number(*v),
        FieldValue::Integer(v) => JsonValue::from(*v),
        FieldValue::Logical(v) => v.map_or(JsonValue::Null, JsonValue::Bool),
        FieldValue::Date(v) => v
            .as_ref()
            .and_then(|date| format_unix_days(i64::from(date.to_unix_days())))
            .map_or(JsonValue::Null, JsonValue::String),
        FieldValue::DateTime(v) => format_unix_seconds(v.to_unix_timestamp())
            .map_or(JsonValue::Null, JsonValue::String),
    }
}

// NaN and infinity have no JSON representation
fn number(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

// N(w,0) columns hold whole numbers, keep them integers in the output
fn numeric(v: f64) -> JsonValue {
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        JsonValue::from(v as i64)
    } else {
        number(v)
    }
}

fn format_unix_days(days: i64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let date = epoch.checked_add_signed(Duration::try_days(days)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn format_unix_seconds(seconds: i64) -> Option<String> {
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

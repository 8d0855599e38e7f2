use std::{
    collections::HashMap,
    fs::{self, File},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use tracing::debug;
use tracker_core::{CoreError, CoreResult, LoadReport};

use crate::csv_error;

const TMP_SUFFIX: &str = "tmp";

/// Header-name lookup for one CSV file. Column order in the file is irrelevant.
pub(crate) struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    pub(crate) fn from_headers(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(position, name)| (name.trim().to_string(), position))
            .collect();
        Self { index }
    }

    pub(crate) fn require(&self, names: &[&str]) -> CoreResult<()> {
        match names.iter().find(|name| !self.index.contains_key(**name)) {
            Some(missing) => Err(CoreError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Trimmed field value, or `""` when the column or the cell is absent.
    pub(crate) fn field<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&position| record.get(position))
            .map(str::trim)
            .unwrap_or("")
    }

    pub(crate) fn field_or<'r>(
        &self,
        record: &'r StringRecord,
        name: &str,
        fallback: &'r str,
    ) -> &'r str {
        match self.field(record, name) {
            "" => fallback,
            value => value,
        }
    }
}

pub(crate) type RowParser<T> = fn(&Columns, &StringRecord) -> Result<T, String>;

/// Reads every row of `path`, skipping malformed rows with a warning.
///
/// A missing or empty file yields an empty report. A header lacking one of
/// `required` fails the whole read.
pub(crate) fn read_rows<T>(
    path: &Path,
    required: &[&str],
    parse: RowParser<T>,
) -> CoreResult<LoadReport<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file; starting empty");
            return Ok(LoadReport::default());
        }
        Err(err) => return Err(err.into()),
    };
    read_from(file, path, required, parse)
}

pub(crate) fn read_from<T>(
    file: File,
    path: &Path,
    required: &[&str],
    parse: RowParser<T>,
) -> CoreResult<LoadReport<T>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);
    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Ok(LoadReport::default());
    }
    let columns = Columns::from_headers(&headers);
    columns.require(required)?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let parsed = result
            .map_err(|err| err.to_string())
            .and_then(|record| parse(&columns, &record));
        match parsed {
            Ok(record) => records.push(record),
            Err(reason) => warnings.push(format!(
                "{} line {}: skipping malformed record: {}",
                path.display(),
                line,
                reason
            )),
        }
    }
    Ok(LoadReport::with_warnings(records, warnings))
}

/// Writes `header` and `rows` to a sibling temporary file, then renames it over `path`.
pub(crate) fn write_rows<I>(path: &Path, header: &[&str], rows: I) -> CoreResult<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut writer = Writer::from_path(&tmp).map_err(csv_error)?;
    writer.write_record(header).map_err(csv_error)?;
    let mut count = 0usize;
    for row in rows {
        writer.write_record(&row).map_err(csv_error)?;
        count += 1;
    }
    writer.flush()?;
    drop(writer);
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), count, "collection saved");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

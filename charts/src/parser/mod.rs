//! CSV loader with encoding and delimiter auto-detection.
//!
//! Produces a raw [`RecordSet`]: header names trimmed, every cell kept
//! verbatim as text. Sentinel handling and coercion belong to the
//! normalizer, not here.

use std::path::{Path, PathBuf};

use crate::error::{LoadError, ReportResult, ShapeError};
use crate::models::{Cell, Record, RecordSet, Schema};

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Raw records, header trimmed
    pub records: RecordSet,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// Where the rows came from
    pub source: PathBuf,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Falls back to `,` when the header holds a single column.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load a CSV file with auto-detection of encoding and delimiter.
///
/// A missing or unreadable file is [`LoadError::DataUnavailable`].
pub fn load_csv(path: impl AsRef<Path>) -> ReportResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&bytes, path)
}

/// Parse CSV bytes with auto-detection; `source` is used in diagnostics.
pub fn parse_bytes(bytes: &[u8], source: &Path) -> ReportResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let records = parse_str(&content, delimiter, source)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        source: source.to_path_buf(),
    })
}

/// Parse CSV text with an explicit delimiter.
///
/// Short rows are padded with empty cells, extra cells are ignored and
/// blank lines are skipped.
pub fn parse_str(content: &str, delimiter: char, source: &Path) -> ReportResult<RecordSet> {
    let csv_error = |message: String| LoadError::Csv {
        path: source.to_path_buf(),
        message,
    };

    let delimiter = u8::try_from(delimiter)
        .map_err(|_| csv_error(format!("delimiter '{}' is not ASCII", delimiter)))?;

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(ShapeError::EmptyInput(source.display().to_string()).into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| csv_error(e.to_string()))?
        .clone();
    let schema = Schema::new(headers.iter())?;
    let width = schema.len();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(e.to_string()))?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);

        let cells = (0..width)
            .map(|i| Cell::text(row.get(i).unwrap_or("")))
            .collect();
        records.push(Record::new(line, cells));
    }

    Ok(RecordSet::new(schema, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    fn parse(csv: &str, delimiter: char) -> RecordSet {
        parse_str(csv, delimiter, Path::new("test.csv")).unwrap()
    }

    #[test]
    fn test_header_names_trimmed() {
        let set = parse(" SALES_MONTH , calender week ,COUNT\nmarch,,100", ',');
        assert_eq!(
            set.schema().columns(),
            &["SALES_MONTH", "calender week", "COUNT"]
        );
    }

    #[test]
    fn test_values_kept_verbatim() {
        let set = parse("a,b\n[NULL], x \n", ',');
        let row = &set.records()[0];
        assert_eq!(row.cells[0], Cell::text("[NULL]"));
        assert_eq!(row.cells[1], Cell::text(" x "));
    }

    #[test]
    fn test_quoted_values() {
        let set = parse("name,value\n\"Smith, J\",\"Hello\"", ',');
        assert_eq!(set.records()[0].cells[0], Cell::text("Smith, J"));
    }

    #[test]
    fn test_short_rows_padded() {
        let set = parse("a;b;c\n1;;3\n4", ';');
        assert_eq!(set.records()[0].cells[1], Cell::text(""));
        assert_eq!(set.records()[1].cells[2], Cell::text(""));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let set = parse("a,b\n1,2,3,4", ',');
        assert_eq!(set.records()[0].cells.len(), 2);
    }

    #[test]
    fn test_line_numbers() {
        let set = parse("a\n1\n2", ',');
        assert_eq!(set.records()[0].line, 2);
        assert_eq!(set.records()[1].line, 3);
    }

    #[test]
    fn test_empty_input_is_shape_error() {
        let err = parse_str("  \n", ',', Path::new("empty.csv")).unwrap_err();
        assert!(matches!(err, ReportError::Shape(ShapeError::EmptyInput(_))));
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = load_csv("/definitely/not/here.csv").unwrap_err();
        match err {
            ReportError::Load(load) => assert!(load.is_data_unavailable()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_parse_bytes_auto() {
        let result = parse_bytes(b"CATEGORY;hour\nNews;3", Path::new("q2.csv")).unwrap();
        assert_eq!(result.delimiter, ';');
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_latin1_decoding() {
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert!(decode_content(bytes, "iso-8859-1").starts_with("Soci"));
    }
}

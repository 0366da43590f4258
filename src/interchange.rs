//! Plain-text interchange formats.
//!
//! Two serializations share this module:
//!
//! - The record format, `name;basePay;bonusPercent`, one record per line.
//!   It is written by [`PayrollDepartment::save_to_file`] and read by both
//!   [`PayrollDepartment::load_from_file`] and [`Storage::import_from_file`].
//! - The export format, `"name",basePay,bonusPercent`, preceded by a UTF-8
//!   byte-order mark. It is written by [`Storage::export_to_file`] for
//!   spreadsheet tools and is not read back.
//!
//! Names are emitted verbatim in both formats. A name containing `;`, `"`
//! or `,` is not escaped.
//!
//! [`PayrollDepartment::save_to_file`]: crate::department::PayrollDepartment::save_to_file
//! [`PayrollDepartment::load_from_file`]: crate::department::PayrollDepartment::load_from_file
//! [`Storage::import_from_file`]: crate::storage::Storage::import_from_file
//! [`Storage::export_to_file`]: crate::storage::Storage::export_to_file

/// The UTF-8 byte-order mark written at the start of an export.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Field separator of the record format.
pub const RECORD_SEPARATOR: char = ';';

/// A successfully parsed record line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// The trimmed name field.
    pub name: String,
    /// The parsed base pay.
    pub base_pay: f64,
    /// The parsed bonus percentage.
    pub bonus_percent: f64,
}

/// Why a non-blank line could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The line did not split into exactly three fields.
    Malformed,
    /// A numeric field did not parse as a number.
    InvalidNumber {
        /// `"base pay"` or `"bonus percent"`.
        field: &'static str,
        /// The trimmed field text.
        value: String,
    },
}

/// Parses one line of the record format.
///
/// Returns `None` for a blank line. Each field is trimmed of surrounding
/// whitespace before use. An empty last field (`name;basePay;`) counts as a
/// missing field, not as an invalid number.
///
/// # Examples
///
/// ```
/// use payroll_engine::interchange::{parse_record, RecordError};
///
/// let record = parse_record(" Welding ; 1000 ; 10 ").unwrap().unwrap();
/// assert_eq!(record.name, "Welding");
/// assert_eq!(record.base_pay, 1000.0);
///
/// assert!(parse_record("   ").is_none());
/// assert_eq!(parse_record("Welding;1000").unwrap(), Err(RecordError::Malformed));
/// ```
pub fn parse_record(line: &str) -> Option<Result<ParsedRecord, RecordError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split(RECORD_SEPARATOR).map(str::trim).collect();
    let [name, base_pay, bonus_percent] = fields.as_slice() else {
        return Some(Err(RecordError::Malformed));
    };
    // A trailing separator with nothing after it leaves the record one field short.
    if bonus_percent.is_empty() {
        return Some(Err(RecordError::Malformed));
    }

    Some(parse_fields(name, base_pay, bonus_percent))
}

fn parse_fields(
    name: &str,
    base_pay: &str,
    bonus_percent: &str,
) -> Result<ParsedRecord, RecordError> {
    Ok(ParsedRecord {
        name: name.to_string(),
        base_pay: parse_number("base pay", base_pay)?,
        bonus_percent: parse_number("bonus percent", bonus_percent)?,
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Strips a leading UTF-8 byte-order mark, if present.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Formats one line of the record format, without the trailing newline.
pub fn format_record(name: &str, base_pay: f64, bonus_percent: f64) -> String {
    format!("{name};{base_pay};{bonus_percent}")
}

/// Formats one line of the export format, without the trailing newline.
///
/// ```
/// use payroll_engine::interchange::format_export_row;
///
/// assert_eq!(format_export_row("Welding", 1000.0, 12.5), "\"Welding\",1000,12.5");
/// ```
pub fn format_export_row(name: &str, base_pay: f64, bonus_percent: f64) -> String {
    format!("\"{name}\",{base_pay},{bonus_percent}")
}

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::domain::Recipient;

/// Columns an upload must provide; everything else is discarded
pub const REQUIRED_COLUMNS: [&str; 3] = ["first_name", "last_name", "phone_number"];

/// Upload parsing error type
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("unsupported file format for `{0}`: expected a .csv or .xls/.xlsx upload")]
    UnsupportedFormat(String),
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("there was an error processing this file: {0}")]
    Malformed(String),
}

/// Decode an uploaded contact table into recipient records
///
/// The format is inferred from the filename: `csv` anywhere in the name
/// selects the CSV decoder, `xls` the workbook decoder. The upload must
/// carry a header row naming all of [`REQUIRED_COLUMNS`]; rows with an
/// empty required cell are dropped, the rest keep their file order. A
/// file with a valid header and no data rows decodes to an empty list.
pub fn parse_recipients(bytes: &[u8], filename: &str) -> Result<Vec<Recipient>, ParseError> {
    if filename.contains("csv") {
        parse_csv(bytes)
    } else if filename.contains("xls") {
        parse_workbook(bytes)
    } else {
        Err(ParseError::UnsupportedFormat(filename.to_string()))
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<Recipient>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| ParseError::Malformed(e.to_string()))?
        .clone();
    let columns = column_indices(headers.iter().map(|h| Some(h.to_string())))?;

    let mut recipients = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Malformed(e.to_string()))?;
        let cells = columns.map(|i| record.get(i).map(ToString::to_string));
        if let Some(recipient) = project_row(cells) {
            recipients.push(recipient);
        }
    }
    Ok(recipients)
}

fn parse_workbook(bytes: &[u8]) -> Result<Vec<Recipient>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ParseError::Malformed(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParseError::Malformed("workbook contains no worksheets".into()))?
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        // An empty sheet has no header either
        return Err(ParseError::MissingColumns(
            REQUIRED_COLUMNS.map(String::from).to_vec(),
        ));
    };
    let columns = column_indices(header_row.iter().map(cell_text))?;

    let mut recipients = Vec::new();
    for row in rows {
        let cells = columns.map(|i| row.get(i).and_then(cell_text));
        if let Some(recipient) = project_row(cells) {
            recipients.push(recipient);
        }
    }
    Ok(recipients)
}

/// Locate each required column in the header row
fn column_indices<I>(headers: I) -> Result<[usize; 3], ParseError>
where
    I: Iterator<Item = Option<String>>,
{
    let headers: Vec<String> = headers
        .map(|h| h.unwrap_or_default().trim().to_string())
        .collect();
    let mut indices = [0_usize; 3];
    let mut missing = Vec::new();
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == name) {
            Some(i) => indices[slot] = i,
            None => missing.push((*name).to_string()),
        }
    }
    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(ParseError::MissingColumns(missing))
    }
}

/// Build a recipient from the projected cells, or drop the row if any
/// required value is missing or blank
fn project_row(cells: [Option<String>; 3]) -> Option<Recipient> {
    let [first_name, last_name, phone_number] = cells.map(non_blank);
    Some(Recipient {
        first_name: first_name?,
        last_name: last_name?,
        phone_number: phone_number?,
    })
}

fn non_blank(cell: Option<String>) -> Option<String> {
    let cell = cell?.trim().to_string();
    (!cell.is_empty()).then_some(cell)
}

/// Stringify a workbook cell
///
/// Excel commonly stores phone numbers as floats; whole floats are
/// rendered without a decimal point so `5551234567.0` round-trips as
/// `5551234567`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(f) if f.fract().abs() < f64::EPSILON => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

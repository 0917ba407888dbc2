use crate::error::ParseError;
use crate::schema::Role;
use csv::{ByteRecord, ReaderBuilder};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// One CSV row: column label -> raw value. Columns a short row lacks are absent.
pub type Record = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    role: Role,
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(role: Role, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { role, headers, records }
    }

    /// Build a dataset from literal rows; headers are the union of keys in first-seen order.
    pub fn from_rows(role: Role, rows: &[&[(&str, &str)]]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut rec = Record::new();
            for (k, v) in row.iter() {
                if !headers.iter().any(|h| h == k) {
                    headers.push(k.to_string());
                }
                rec.insert(k.to_string(), v.to_string());
            }
            records.push(rec);
        }
        Self { role, headers, records }
    }

    pub fn role(&self) -> Role { self.role }
    pub fn headers(&self) -> &[String] { &self.headers }
    pub fn records(&self) -> &[Record] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Expected columns for this dataset's role that the header does not carry.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        self.role
            .expected_columns()
            .iter()
            .copied()
            .filter(|c| !self.headers.iter().any(|h| h == c))
            .collect()
    }
}

pub fn parse_csv_str(role: Role, text: &str) -> Result<Dataset, ParseError> {
    parse_csv_reader(role, text.as_bytes())
}

pub fn parse_csv_reader<R: Read>(role: Role, reader: R) -> Result<Dataset, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while rdr.read_byte_record(&mut row)? {
        records.push(to_record(&headers, &row));
    }
    tracing::debug!(%role, rows = records.len(), columns = headers.len(), "parsed csv");
    Ok(Dataset { role, headers, records })
}

pub fn load_csv_file(role: Role, path: &Path) -> Result<Dataset, ParseError> {
    let f = std::fs::File::open(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv_reader(role, std::io::BufReader::new(f))
}

fn to_record(headers: &[String], row: &ByteRecord) -> Record {
    // zip stops at the shorter side: missing trailing fields stay absent, extras are dropped
    headers
        .iter()
        .zip(row.iter())
        .map(|(h, v)| (h.clone(), String::from_utf8_lossy(v).into_owned()))
        .collect()
}

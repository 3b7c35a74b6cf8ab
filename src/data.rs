use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Columns every input file must carry. Others are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Warehouse_block",
    "Mode_of_Shipment",
    "Customer_rating",
    "Weight_in_gms",
];

/// One shipment row, restricted to the fields the dashboard reads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShipmentRecord {
    #[serde(rename = "Warehouse_block")]
    pub warehouse_block: String,
    #[serde(rename = "Mode_of_Shipment")]
    pub mode_of_shipment: String,
    #[serde(rename = "Customer_rating")]
    pub customer_rating: u32,
    #[serde(rename = "Weight_in_gms")]
    pub weight_in_gms: f64,
}

impl ShipmentRecord {
    pub fn new(warehouse_block: &str, mode_of_shipment: &str, customer_rating: u32, weight_in_gms: f64) -> Self {
        Self {
            warehouse_block: warehouse_block.to_string(),
            mode_of_shipment: mode_of_shipment.to_string(),
            customer_rating,
            weight_in_gms,
        }
    }
}

/// Read-only table of shipment records in file order.
#[derive(Debug, Clone, Default)]
pub struct ShipmentTable {
    pub records: Vec<ShipmentRecord>,
}

impl ShipmentTable {
    pub fn new(records: Vec<ShipmentRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.weight_in_gms).collect()
    }
}

/// Load the shipment table from a CSV file with a header row.
pub fn load_csv(path: &Path) -> Result<ShipmentTable, DashboardError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| classify_open_error(path, e))?;

    read_table(reader).map_err(|e| match e {
        ReadFailure::Io(source) => DashboardError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        },
        ReadFailure::Dashboard(err) => err,
    })
}

/// Load the shipment table from any reader (stdin, in-memory buffers).
pub fn load_csv_from_reader<R: Read>(rdr: R) -> Result<ShipmentTable, DashboardError> {
    let reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    read_table(reader).map_err(|e| match e {
        ReadFailure::Io(source) => DashboardError::InputUnreadable {
            path: "<reader>".into(),
            source,
        },
        ReadFailure::Dashboard(err) => err,
    })
}

enum ReadFailure {
    Io(csv::Error),
    Dashboard(DashboardError),
}

fn read_table<R: Read>(mut reader: csv::Reader<R>) -> Result<ShipmentTable, ReadFailure> {
    let headers = reader.headers().map_err(ReadFailure::Io)?.clone();
    validate_headers(&headers).map_err(ReadFailure::Dashboard)?;

    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();
    loop {
        match reader.read_record(&mut raw) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(ReadFailure::Io(e)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(records.len() as u64 + 2);
                return Err(ReadFailure::Dashboard(DashboardError::MalformedRow {
                    line,
                    message: e.to_string(),
                }));
            }
        }
        // Header is line 1, so the first data row is line 2
        let line = raw
            .position()
            .map(|p| p.line())
            .unwrap_or(records.len() as u64 + 2);

        let record: ShipmentRecord = raw.deserialize(Some(&headers)).map_err(|e| {
            ReadFailure::Dashboard(DashboardError::MalformedRow {
                line,
                message: e.to_string(),
            })
        })?;
        if !record.weight_in_gms.is_finite() {
            return Err(ReadFailure::Dashboard(DashboardError::MalformedRow {
                line,
                message: format!(
                    "Weight_in_gms must be a finite number, got '{}'",
                    record.weight_in_gms
                ),
            }));
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(ReadFailure::Dashboard(DashboardError::Empty));
    }

    Ok(ShipmentTable::new(records))
}

fn validate_headers(headers: &csv::StringRecord) -> Result<(), DashboardError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn classify_open_error(path: &Path, err: csv::Error) -> DashboardError {
    if let csv::ErrorKind::Io(io_err) = err.kind() {
        if io_err.kind() == std::io::ErrorKind::NotFound {
            return DashboardError::InputNotFound {
                path: path.to_path_buf(),
            };
        }
    }
    DashboardError::InputUnreadable {
        path: path.to_path_buf(),
        source: err,
    }
}

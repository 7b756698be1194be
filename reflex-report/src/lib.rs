pub mod csv;
pub mod json;

pub use csv::{default_csv_path, export_csv, write_csv};
pub use json::{export_json, write_json, Report, ReportTrial};

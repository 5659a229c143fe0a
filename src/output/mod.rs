pub mod export;
pub mod formatter;

pub use export::{csv_header, export_csv, export_json, write_csv, write_json, ExportDocument};
pub use formatter::{
    format_failures, format_gain, format_report, format_reports, format_score, should_use_colors,
};

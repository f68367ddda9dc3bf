pub mod report_loader;
pub mod table_reader;

pub use report_loader::ReportLoader;
pub use table_reader::TableReader;

pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod record;
pub mod results;

pub use config::AnalysisConfig;
pub use engine::analyze;
pub use error::JtlensError;
pub use record::RequestRecord;
pub use results::AnalysisReport;

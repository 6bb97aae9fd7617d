use std::path::Path;

use crate::error::JtlensError;
use crate::ingest::{parse_jtl, IngestOptions};
use crate::record::RequestRecord;

/// Read a `.jtl` / `.csv` result log from disk.
pub async fn read_jtl(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> Result<Vec<RequestRecord>, JtlensError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    parse_jtl(&content, options)
}

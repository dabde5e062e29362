use std::path::Path;

use anyhow::Result;

use crate::document::DocumentKind;
use crate::model::SourceInfo;
use crate::util::{now_utc_string, sha256_file};

pub mod extract;
pub mod generate;
pub mod process;
pub mod status;
pub mod write;


fn source_info(path: &Path, kind: DocumentKind) -> Result<SourceInfo> {
    Ok(SourceInfo {
        path: path.display().to_string(),
        kind: kind.as_str().to_string(),
        sha256: sha256_file(path)?,
        extracted_at: now_utc_string(),
    })
}

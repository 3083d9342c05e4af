use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult, CodecError, PipelineError};
use crate::metrics::{Decoded, FixtureCatalog, MetricRecord, decode_line};

pub(super) async fn read_text(path: &Path) -> AppResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|source| {
        AppError::pipeline(PipelineError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
    })
}

/// Creates (or truncates) `path`, creating missing parent directories.
pub(super) async fn write_text(path: &Path, content: &str) -> AppResult<()> {
    let create_error = |source| {
        AppError::pipeline(PipelineError::CreateFile {
            path: path.to_path_buf(),
            source,
        })
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(create_error)?;
    }
    let mut file = tokio::fs::File::create(path).await.map_err(create_error)?;
    let write_error = |source| {
        AppError::pipeline(PipelineError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    };
    file.write_all(content.as_bytes()).await.map_err(write_error)?;
    file.flush().await.map_err(write_error)
}

/// Decodes every non-empty line of the generated file. Unknown metric types
/// are dropped (the decoder logs them); anything else malformed is fatal.
pub(super) async fn read_records(
    path: &Path,
    catalog: &FixtureCatalog,
) -> AppResult<(Vec<MetricRecord>, usize)> {
    let content = read_text(path).await?;
    decode_records(&content, path, catalog)
}

pub(super) fn decode_records(
    content: &str,
    path: &Path,
    catalog: &FixtureCatalog,
) -> AppResult<(Vec<MetricRecord>, usize)> {
    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line, catalog).map_err(|source| decode_error(path, index, source))? {
            Decoded::Record(record) => records.push(record),
            Decoded::Skipped { .. } => skipped = skipped.saturating_add(1),
        }
    }
    Ok((records, skipped))
}

fn decode_error(path: &Path, index: usize, source: CodecError) -> AppError {
    AppError::pipeline(PipelineError::Decode {
        path: path.to_path_buf(),
        line_number: index.saturating_add(1),
        source,
    })
}

//! Streaming downloads and local copies
//!
//! Bytes are written to a `.part` sibling and renamed into place once the
//! body is complete, so a file that exists at its final path is whole.

use camino::{Utf8Path, Utf8PathBuf};
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use importmap_core::error::ImportmapError;
use importmap_registry::HttpClient;

use crate::CacheResult;

fn part_path(target: &Utf8Path) -> Utf8PathBuf {
    let mut part = target.as_str().to_string();
    part.push_str(".part");
    Utf8PathBuf::from(part)
}

async fn ensure_parent(target: &Utf8Path) -> CacheResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ImportmapError::io(format!("Failed to create directory {}", parent), e))?;
    }
    Ok(())
}

/// Stream `url` into `target`
pub async fn download_to(http: &HttpClient, url: &str, target: &Utf8Path) -> CacheResult<u64> {
    ensure_parent(target).await?;

    let part = part_path(target);
    let result = stream_into(http, url, &part).await;

    match result {
        Ok(written) => {
            fs::rename(&part, target)
                .await
                .map_err(|e| ImportmapError::io(format!("Failed to move download into {}", target), e))?;
            Ok(written)
        },
        Err(e) => {
            // Best effort; the original error is what matters
            let _ = fs::remove_file(&part).await;
            Err(e)
        },
    }
}

async fn stream_into(http: &HttpClient, url: &str, part: &Utf8Path) -> CacheResult<u64> {
    let response = http.get(url).await?;

    let mut file = fs::File::create(part)
        .await
        .map_err(|e| ImportmapError::io(format!("Failed to create {}", part), e))?;

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ImportmapError::network(format!("Failed to read {}: {}", url, e), e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| ImportmapError::io(format!("Failed to write {}", part), e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| ImportmapError::io(format!("Failed to flush {}", part), e))?;

    Ok(written)
}

/// Copy `source` verbatim to `target`
pub async fn copy_to(source: &Utf8Path, target: &Utf8Path) -> CacheResult<u64> {
    ensure_parent(target).await?;

    let part = part_path(target);
    let copied = fs::copy(source, &part)
        .await
        .map_err(|e| ImportmapError::io(format!("Failed to copy {} to {}", source, target), e))?;

    fs::rename(&part, target)
        .await
        .map_err(|e| ImportmapError::io(format!("Failed to move copy into {}", target), e))?;

    Ok(copied)
}

use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::store;

const MANIFEST_ENTRY: &str = "manifest.json";
const BLOB_DIR: &str = "blobs";
pub const BUNDLE_FORMAT_V1: &str = "absend-workspace-v1";

/// Keys a workspace bundle may carry. The session blob travels too, so a
/// restored workspace keeps its signed-in user.
const BUNDLE_KEYS: [&str; 5] = [
    store::CLASSES_KEY,
    store::STUDENTS_KEY,
    store::TEACHERS_KEY,
    store::ATTENDANCE_KEY,
    store::SESSION_KEY,
];

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub restored_count: usize,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn export_workspace_bundle(
    workspace_path: &Path,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let mut blobs: Vec<(String, Vec<u8>)> = Vec::new();
    for key in BUNDLE_KEYS {
        let path = workspace_path.join(format!("{}.json", key));
        if !path.is_file() {
            continue;
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read blob {}", path.to_string_lossy()))?;
        blobs.push((key.to_string(), bytes));
    }
    if blobs.is_empty() {
        return Err(anyhow!(
            "no workspace blobs found under {}",
            workspace_path.to_string_lossy()
        ));
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let entries: Vec<serde_json::Value> = blobs
        .iter()
        .map(|(key, bytes)| {
            json!({
                "key": key,
                "sha256": sha256_hex(bytes),
            })
        })
        .collect();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "entries": entries,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (key, bytes) in &blobs {
        zip.start_file(format!("{}/{}.json", BLOB_DIR, key), opts)
            .with_context(|| format!("failed to start blob entry {}", key))?;
        zip.write_all(bytes)
            .with_context(|| format!("failed to write blob entry {}", key))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: blobs.len() + 1,
    })
}

pub fn import_workspace_bundle(
    in_path: &Path,
    workspace_path: &Path,
) -> anyhow::Result<ImportSummary> {
    std::fs::create_dir_all(workspace_path).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace_path.to_string_lossy()
        )
    })?;

    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }

    let mut expected: Vec<(String, String)> = Vec::new();
    if let Some(entries) = manifest.get("entries").and_then(|v| v.as_array()) {
        for entry in entries {
            let key = entry.get("key").and_then(|v| v.as_str()).unwrap_or("");
            let sha = entry.get("sha256").and_then(|v| v.as_str()).unwrap_or("");
            if !key.is_empty() {
                expected.push((key.to_string(), sha.to_string()));
            }
        }
    }
    if expected.is_empty() {
        return Err(anyhow!("bundle manifest lists no entries"));
    }

    // Stage every blob before renaming any of them into place, so a truncated
    // or corrupt bundle can't leave the workspace half-restored.
    let mut staged: Vec<(String, std::path::PathBuf)> = Vec::new();
    for (key, sha) in &expected {
        let mut bytes = Vec::new();
        archive
            .by_name(&format!("{}/{}.json", BLOB_DIR, key))
            .with_context(|| format!("bundle missing blob entry {}", key))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read blob entry {}", key))?;
        if !sha.is_empty() && sha256_hex(&bytes) != *sha {
            return Err(anyhow!("checksum mismatch for bundle entry {}", key));
        }

        let tmp = workspace_path.join(format!("{}.json.importing", key));
        std::fs::write(&tmp, &bytes)
            .with_context(|| format!("failed to stage blob {}", tmp.to_string_lossy()))?;
        staged.push((key.clone(), tmp));
    }

    let restored_count = staged.len();
    for (key, tmp) in staged {
        let dst = workspace_path.join(format!("{}.json", key));
        std::fs::rename(&tmp, &dst).with_context(|| {
            format!("failed to move restored blob to {}", dst.to_string_lossy())
        })?;
    }

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        restored_count,
    })
}

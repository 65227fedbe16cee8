use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::store::{Store, ALL_KEYS};

const MANIFEST_ENTRY: &str = "manifest.json";
const COLLECTION_DIR: &str = "collections";
pub const BUNDLE_FORMAT_V1: &str = "examd-workspace-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub restored_keys: Vec<String>,
    pub ignored_keys: Vec<String>,
}

fn entry_name(key: &str) -> String {
    format!("{}/{}.json", COLLECTION_DIR, key)
}

fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Writes every persisted collection into a zip bundle next to a manifest
/// carrying the sha256 of each entry.
pub fn export_workspace_bundle(store: &Store, out_path: &Path) -> anyhow::Result<ExportSummary> {
    let backend = store.backend();
    let mut entries: Vec<(String, String)> = Vec::new();
    for key in backend.keys().context("failed to list stored collections")? {
        let value = backend
            .get(&key)
            .with_context(|| format!("failed to read collection {}", key))?
            .unwrap_or_else(|| "[]".to_string());
        entries.push((key, value));
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

    let digests: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(k, v)| (k.clone(), json!(sha256_hex(v.as_bytes()))))
        .collect();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "entries": digests,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (key, value) in &entries {
        zip.start_file(entry_name(key), opts)
            .with_context(|| format!("failed to start entry for {}", key))?;
        zip.write_all(value.as_bytes())
            .with_context(|| format!("failed to write entry for {}", key))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;

    tracing::info!(
        path = %out_path.to_string_lossy(),
        collections = entries.len(),
        "workspace bundle exported"
    );
    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: entries.len() + 1,
    })
}

/// Verifies the bundle completely before touching the store, then writes
/// each known collection and reloads. Keys the store does not know are
/// reported and left out.
pub fn import_workspace_bundle(in_path: &Path, store: &mut Store) -> anyhow::Result<ImportSummary> {
    if !is_zip_file(in_path)? {
        return Err(anyhow!(
            "not a workspace bundle: {}",
            in_path.to_string_lossy()
        ));
    }

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
    let digests = manifest
        .get("entries")
        .and_then(|v| v.as_object())
        .ok_or_else(|| anyhow!("manifest.json has no entries"))?;

    let mut verified: Vec<(String, String)> = Vec::new();
    let mut ignored_keys = Vec::new();
    for (key, expected) in digests {
        if !ALL_KEYS.contains(&key.as_str()) {
            ignored_keys.push(key.clone());
            continue;
        }
        let mut text = String::new();
        archive
            .by_name(&entry_name(key))
            .with_context(|| format!("bundle missing entry for {}", key))?
            .read_to_string(&mut text)
            .with_context(|| format!("failed to read entry for {}", key))?;
        if Some(sha256_hex(text.as_bytes()).as_str()) != expected.as_str() {
            return Err(anyhow!("checksum mismatch for {}", key));
        }
        let parsed: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("entry for {} is invalid JSON", key))?;
        if !parsed.is_array() {
            return Err(anyhow!("entry for {} is not a collection", key));
        }
        verified.push((key.clone(), text));
    }

    for (key, text) in &verified {
        store
            .write_raw(key, text)
            .with_context(|| format!("failed to restore {}", key))?;
    }
    for key in ALL_KEYS {
        if !verified.iter().any(|(k, _)| k == key) {
            store
                .write_raw(key, "[]")
                .with_context(|| format!("failed to reset {}", key))?;
        }
    }
    store.reload();

    tracing::info!(
        path = %in_path.to_string_lossy(),
        restored = verified.len(),
        ignored = ignored_keys.len(),
        "workspace bundle imported"
    );
    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        restored_keys: verified.into_iter().map(|(k, _)| k).collect(),
        ignored_keys,
    })
}

fn is_zip_file(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    if read < 4 {
        return Ok(false);
    }
    Ok(sig == [0x50, 0x4B, 0x03, 0x04])
}

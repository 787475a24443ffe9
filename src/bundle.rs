//! Proxy and shared-flow bundle handling.
//!
//! A bundle on disk is either a directory (archived on the fly before
//! upload) or a prebuilt `.zip` (uploaded as-is, which is also what export
//! writes).

use anyhow::{Context, Result};
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone)]
pub struct Bundle {
    /// Entity name on the remote side, taken from the directory or file stem.
    pub name: String,
    source: BundleSource,
}

#[derive(Debug, Clone)]
enum BundleSource {
    Dir(PathBuf),
    Zip(PathBuf),
}

impl Bundle {
    /// Produce the archive bytes to upload.
    pub fn read_archive(&self) -> Result<Vec<u8>> {
        match &self.source {
            BundleSource::Dir(dir) => zip_directory(dir),
            BundleSource::Zip(file) => {
                fs::read(file).with_context(|| format!("reading bundle {}", file.display()))
            }
        }
    }
}

/// Enumerate the bundles in a snapshot subfolder, in name order.
pub fn discover_bundles(dir: &Path) -> Result<Vec<Bundle>> {
    let mut bundles = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading bundle folder {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                bundles.push(Bundle {
                    name: name.to_string(),
                    source: BundleSource::Dir(path.clone()),
                });
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("zip") {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                bundles.push(Bundle {
                    name: name.to_string(),
                    source: BundleSource::Zip(path.clone()),
                });
            }
        }
    }
    bundles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(bundles)
}

/// Archive a bundle directory into an in-memory zip, preserving relative
/// paths.
pub fn zip_directory(dir: &Path) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        add_entries(&mut zip, dir, "")?;
        zip.finish()?;
    }
    Ok(buffer)
}

fn add_entries<W: Write + Seek>(
    zip: &mut zip::ZipWriter<W>,
    dir: &Path,
    prefix: &str,
) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .map(|e| e.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        let rel = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };
        if path.is_dir() {
            add_entries(zip, &path, &rel)?;
        } else {
            let data =
                fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            zip.start_file(rel, options)?;
            zip.write_all(&data)?;
        }
    }
    Ok(())
}

//! Export delivery
//!
//! An [`ExportSession`] runs one export at a time and exposes whether one is
//! running. Each file is written to a temporary file in the target directory
//! and then persisted under its final name, so a failed export never leaves a
//! partial file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

use assetsprint_ast::AssetPackage;
use assetsprint_core::{text, ExportFormat, Settings};
use assetsprint_ooxml::export_docx;
use assetsprint_pdf::{export_pdf, PageGeometry};

/// Serializes exports and tracks the in-progress flag
#[derive(Debug, Default)]
pub struct ExportSession {
    in_progress: AtomicBool,
}

/// Clears the in-progress flag when dropped
struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export is currently running
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InProgress<'_>> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            bail!("An export is already in progress");
        }
        Ok(InProgress(&self.in_progress))
    }

    /// Export one format into `dir`, returning the written path
    pub fn export(
        &self,
        asset: &AssetPackage,
        settings: &Settings,
        format: ExportFormat,
        dir: &Path,
    ) -> Result<PathBuf> {
        let _guard = self.begin()?;
        deliver(asset, settings, format, dir)
    }

    /// Export several formats into `dir`, stopping at the first failure
    pub fn export_all(
        &self,
        asset: &AssetPackage,
        settings: &Settings,
        formats: &[ExportFormat],
        dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let _guard = self.begin()?;
        formats
            .iter()
            .map(|format| deliver(asset, settings, *format, dir))
            .collect()
    }
}

/// Produce the bytes of one export format
pub fn render_format(
    asset: &AssetPackage,
    settings: &Settings,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Pdf => {
            let geometry = PageGeometry::from_settings(&settings.pdf)
                .context("Invalid page geometry in settings")?;
            export_pdf(asset, &geometry).context("Failed to generate PDF")?
        }
        ExportFormat::Docx => {
            export_docx(asset, &settings.docx).context("Failed to generate DOCX")?
        }
        ExportFormat::Txt => text::render(asset).into_bytes(),
    };
    Ok(bytes)
}

fn deliver(
    asset: &AssetPackage,
    settings: &Settings,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let bytes = render_format(asset, settings, format)?;
    let path = dir.join(format.file_name(&asset.keyword));
    write_atomic(&path, &bytes)?;
    tracing::info!("Exported {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Write `bytes` to `path` through a temporary file in the same directory
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move export into place: {}", path.display()))?;
    Ok(())
}

/// Create the output directory if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

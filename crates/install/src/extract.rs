//! Blocking ZIP extraction

use mosdeps_errors::InstallStage;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o664;

/// Counts of what an extraction created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub directories: usize,
}

/// Failure of one extraction step
#[derive(Debug)]
pub(crate) struct ExtractFailure {
    pub stage: InstallStage,
    pub message: String,
}

impl ExtractFailure {
    fn new(stage: InstallStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Extract every entry of `archive` below `dest`
///
/// Entries are processed strictly in archive order, one at a time. Names
/// ending in `/` become directories; everything else is streamed into a new
/// file whose parent directories are created on demand.
pub(crate) fn extract_zip(archive: File, dest: &Path) -> Result<ExtractStats, ExtractFailure> {
    let mut archive = zip::ZipArchive::new(archive)
        .map_err(|e| ExtractFailure::new(InstallStage::OpenArchive, e.to_string()))?;

    create_dir_all(dest).map_err(|e| {
        ExtractFailure::new(
            InstallStage::CreateInstallDir,
            format!("{}: {e}", dest.display()),
        )
    })?;

    let mut stats = ExtractStats::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ExtractFailure::new(InstallStage::ReadEntry, e.to_string()))?;

        let name = entry.name().to_string();
        let relative = entry.enclosed_name().ok_or_else(|| {
            ExtractFailure::new(
                InstallStage::ReadEntry,
                format!("entry `{name}` escapes the install directory"),
            )
        })?;
        let out_path = dest.join(relative);

        if name.ends_with('/') {
            create_dir_all(&out_path).map_err(|e| {
                ExtractFailure::new(
                    InstallStage::CreateDirectory,
                    format!("{}: {}", out_path.display(), error_code(&e)),
                )
            })?;
            stats.directories += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            if !parent.exists() {
                create_dir_all(parent).map_err(|e| {
                    ExtractFailure::new(
                        InstallStage::CreateDirectory,
                        format!("{}: {}", parent.display(), error_code(&e)),
                    )
                })?;
            }
        }

        let mut out = create_file(&out_path).map_err(|e| {
            ExtractFailure::new(
                InstallStage::WriteFile,
                format!("{}: {e}", out_path.display()),
            )
        })?;
        copy_entry(&mut entry, &mut out, &name, &out_path)?;
        stats.files += 1;
    }

    Ok(stats)
}

/// Stream one entry into `out`
///
/// Read errors (decompression, checksum) belong to the entry, write errors
/// to the output file.
fn copy_entry<R: Read, W: Write>(
    entry: &mut R,
    out: &mut W,
    name: &str,
    out_path: &Path,
) -> Result<u64, ExtractFailure> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;
    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => return Ok(copied),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ExtractFailure::new(
                    InstallStage::ReadEntry,
                    format!("{name}: {e}"),
                ))
            }
        };
        out.write_all(&buf[..n]).map_err(|e| {
            ExtractFailure::new(
                InstallStage::WriteFile,
                format!("{}: {e}", out_path.display()),
            )
        })?;
        copied += n as u64;
    }
}

fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path)
}

fn create_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options.open(path)
}

fn error_code(err: &io::Error) -> String {
    format!("{:?}", err.kind())
}

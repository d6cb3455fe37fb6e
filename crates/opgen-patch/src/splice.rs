//! Single-region replacement.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{PatchError, Result};
use crate::{PatchMode, PatchOutcome};

/// Replace the region `start`..`end` of `source` with `replacement`.
///
/// `replacement` must begin with `start` and its first `end` must be its
/// last bytes, otherwise a rerun would locate a shorter region.
/// `file` labels errors. The result is `source` up to the start sentinel,
/// then `replacement`, then `source` after the end sentinel.
pub fn splice(
    file: &str,
    source: &str,
    start: &str,
    end: &str,
    replacement: &str,
) -> Result<String> {
    let not_found = |sentinel: &str| PatchError::SentinelNotFound {
        file: file.to_string(),
        sentinel: sentinel.to_string(),
    };
    let (region_start, region_end) = locate(source, start, end).map_err(not_found)?;

    let missing = |sentinel: &str| PatchError::ReplacementMissingSentinel {
        file: file.to_string(),
        sentinel: sentinel.to_string(),
    };
    if locate(replacement, start, end).map_err(missing)? != (0, replacement.len()) {
        return Err(PatchError::UnframedReplacement {
            file: file.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let mut out = String::with_capacity(source.len() - (region_end - region_start) + replacement.len());
    out.push_str(&source[..region_start]);
    out.push_str(replacement);
    out.push_str(&source[region_end..]);
    Ok(out)
}

/// Byte range of the region, end sentinel included. On failure, the
/// sentinel that could not be found.
fn locate<'s>(text: &str, start: &'s str, end: &'s str) -> std::result::Result<(usize, usize), &'s str> {
    let region_start = text.find(start).ok_or(start)?;
    let body = region_start + start.len();
    let end_at = text[body..].find(end).ok_or(end)?;
    Ok((region_start, body + end_at + end.len()))
}

/// Patch one region of one file.
pub fn patch_file(
    path: &Path,
    start: &str,
    end: &str,
    replacement: &str,
    mode: PatchMode,
) -> Result<PatchOutcome> {
    let source = read_target(path)?;
    let patched = splice(&path.display().to_string(), &source, start, end, replacement)?;
    commit(path, &source, &patched, mode)
}

pub(crate) fn read_target(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PatchError::Io {
        action: "reading",
        path: path.to_path_buf(),
        source,
    })
}

/// Write `patched` over `path` if it differs from `original`.
pub(crate) fn commit(
    path: &Path,
    original: &str,
    patched: &str,
    mode: PatchMode,
) -> Result<PatchOutcome> {
    let outcome = if patched == original {
        PatchOutcome::Unchanged
    } else if mode == PatchMode::DryRun {
        PatchOutcome::WouldPatch
    } else {
        write_replacing(path, patched)?;
        PatchOutcome::Patched
    };
    tracing::info!(path = %path.display(), %outcome, "patch");
    Ok(outcome)
}

/// Write through a temp file in the same directory, then move it over `path`.
fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    let io_err = |action: &'static str| {
        move |source: std::io::Error| PatchError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path)
        .map_err(io_err("reading metadata of"))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err("creating temp file for"))?;
    tmp.write_all(contents.as_bytes())
        .map_err(io_err("writing"))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(io_err("setting permissions of"))?;
    tmp.persist(path)
        .map_err(|e| io_err("replacing")(e.error))?;
    Ok(())
}

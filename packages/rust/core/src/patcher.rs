//! Document patcher.
//!
//! Locates the marked region (`const <name> = [ ... ];`) in a text document
//! and splices in a freshly rendered block. Everything outside the region is
//! left byte-identical.

use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use advisorboard_shared::{AdvisorBoardError, AdvisorRecord, RenderConfig, Result};

use crate::render::render_block;

/// What happened to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The region was replaced and the file rewritten.
    Patched,
    /// The region already held exactly this content; nothing was written.
    Unchanged,
    /// No marked region was found; nothing was written.
    RegionMissing,
}

/// Result of splicing records into document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Splice {
    Replaced(String),
    RegionMissing,
}

// ---------------------------------------------------------------------------
// Region matching
// ---------------------------------------------------------------------------

/// Compiled matcher for the marked region of one constant.
///
/// Matches from `const <name> = [` up to and including the first `];`
/// after it, across lines. When the declaration opens its line, the leading
/// whitespace belongs to the region and becomes the block's indent. Only the
/// first occurrence in a document is ever used.
#[derive(Debug, Clone)]
pub struct RegionPattern {
    re: Regex,
}

impl RegionPattern {
    pub fn new(constant: &str) -> Result<Self> {
        let pattern = format!(
            r"(?s)([ \t]*)\bconst\s+{}\s*=\s*\[.*?\];",
            regex::escape(constant)
        );
        let re = Regex::new(&pattern)
            .map_err(|e| AdvisorBoardError::config(format!("bad region pattern: {e}")))?;
        Ok(Self { re })
    }

    /// Byte range of the region and the indentation in front of `const`.
    pub fn find<'a>(&self, document: &'a str) -> Option<(std::ops::Range<usize>, &'a str)> {
        let caps = self.re.captures(document)?;
        let whole = caps.get(0)?;
        let indent = caps.get(1).map_or("", |m| m.as_str());

        let at_line_start = whole.start() == 0 || document.as_bytes()[whole.start() - 1] == b'\n';
        if at_line_start {
            Some((whole.range(), indent))
        } else {
            // Mid-line whitespace stays where it is.
            Some((whole.start() + indent.len()..whole.end(), ""))
        }
    }
}

/// Splice a rendered block over the first marked region in `document`.
pub fn patch_text(
    document: &str,
    records: &[AdvisorRecord],
    render: &RenderConfig,
) -> Result<Splice> {
    let pattern = RegionPattern::new(&render.constant)?;

    let Some((range, indent)) = pattern.find(document) else {
        return Ok(Splice::RegionMissing);
    };

    debug!(start = range.start, end = range.end, "found marked region");

    let block = render_block(records, render, indent);
    let mut out = String::with_capacity(document.len() - range.len() + block.len());
    out.push_str(&document[..range.start]);
    out.push_str(&block);
    out.push_str(&document[range.end..]);

    Ok(Splice::Replaced(out))
}

/// Rewrite the document at `path` with the given records.
#[instrument(skip_all, fields(path = %path.display(), records = records.len()))]
pub fn patch_document(
    path: &Path,
    records: &[AdvisorRecord],
    render: &RenderConfig,
) -> Result<PatchOutcome> {
    let original = std::fs::read_to_string(path).map_err(|e| AdvisorBoardError::read(path, e))?;

    match patch_text(&original, records, render)? {
        Splice::RegionMissing => {
            warn!(constant = %render.constant, "marked region not found, document left unchanged");
            Ok(PatchOutcome::RegionMissing)
        }
        Splice::Replaced(updated) if updated == original => {
            info!("document already up to date");
            Ok(PatchOutcome::Unchanged)
        }
        Splice::Replaced(updated) => {
            write_atomic(path, &updated)?;
            info!(bytes = updated.len(), "document updated");
            Ok(PatchOutcome::Patched)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write to a hidden sibling temp file, then rename over the target.
///
/// Symlinks are resolved first so the linked file is replaced, not the link,
/// and the target's permissions carry over to the new file.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let target = std::fs::canonicalize(path).map_err(|e| AdvisorBoardError::write(path, e))?;
    let permissions = std::fs::metadata(&target)
        .map_err(|e| AdvisorBoardError::write(&target, e))?
        .permissions();
    let temp = temp_path(&target)?;

    std::fs::write(&temp, content).map_err(|e| AdvisorBoardError::write(&temp, e))?;

    let renamed = std::fs::set_permissions(&temp, permissions)
        .and_then(|()| std::fs::rename(&temp, &target));
    if let Err(e) = renamed {
        let _ = std::fs::remove_file(&temp);
        return Err(AdvisorBoardError::write(&target, e));
    }

    debug!(temp = %temp.display(), "renamed temp file over document");
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        AdvisorBoardError::write(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "document path has no file name"),
        )
    })?;
    Ok(path.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}

use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rustc_hash::FxHasher;

use crate::error::CompileError;

/// On-disk artifact store addressed by a path-derived key. Last writer wins:
/// artifacts are deterministic for a given source, so concurrent recompiles
/// overwriting each other's entries is tolerated.
pub struct CompileCache {
    dir: PathBuf,
}

impl CompileCache {
    /// Open the directory, creating it if needed, and probe it for
    /// writability.
    pub fn open(dir: &Path) -> Result<Self, CompileError> {
        let not_writable = || CompileError::CacheDirNotWritable {
            dir: dir.to_path_buf(),
        };
        fs::create_dir_all(dir).map_err(|_| not_writable())?;
        let probe = dir.join(".sable-write-probe");
        fs::write(&probe, b"").map_err(|_| not_writable())?;
        let _ = fs::remove_file(&probe);
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Cache filename: the last 30 characters of the extension-less path
    /// with separators and spaces mapped to `-` and anything outside
    /// `[0-9a-zA-Z_\-.]` stripped, followed by a stable fingerprint of the
    /// full path and the original extension.
    pub fn key(source: &Path) -> String {
        let full = source.to_string_lossy();
        let ext = source.extension().and_then(|e| e.to_str()).map(str::to_string);
        let base = source.with_extension("");
        let base = base.to_string_lossy();
        let tail_start = base
            .char_indices()
            .rev()
            .nth(29)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut cleaned = String::new();
        for c in base[tail_start..].chars() {
            let c = if c == '/' || c == '\\' || c == ' ' { '-' } else { c };
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                cleaned.push(c);
            }
        }
        let mut hasher = FxHasher::default();
        hasher.write(full.as_bytes());
        match ext {
            Some(ext) => format!("{}-{:x}.{}", cleaned, hasher.finish(), ext),
            None => format!("{}-{:x}", cleaned, hasher.finish()),
        }
    }

    pub fn entry_path(&self, source: &Path) -> PathBuf {
        self.dir.join(Self::key(source))
    }

    /// Returns the artifact and the entry's stored timestamp (its write
    /// time); the caller compares it against the source mtime.
    pub fn get(&self, source: &Path) -> Option<(String, SystemTime)> {
        let path = self.entry_path(source);
        let stored = fs::metadata(&path).ok()?.modified().ok()?;
        let artifact = fs::read_to_string(&path).ok()?;
        Some((artifact, stored))
    }

    pub fn put(&self, source: &Path, artifact: &str) -> std::io::Result<PathBuf> {
        let path = self.entry_path(source);
        fs::write(&path, artifact)?;
        Ok(path)
    }
}

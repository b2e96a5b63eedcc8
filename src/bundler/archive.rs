//! Zip archive output.
//!
//! [`ZipSink`] accepts an ordered stream of `(source file, entry name)` pairs
//! and streams each file into a deflate-compressed zip on disk. The archive is
//! only complete once [`ZipSink::finish`] has returned; a sink dropped before
//! that leaves a truncated file behind, which [`ZipSink::abort`] removes.

use crate::bundler::error::{ConfigError, ErrorExt, Result};
use crate::bundler::mapping::escapes_root;
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// An open zip archive being written.
pub struct ZipSink {
    path: PathBuf,
    writer: ZipFileWriter<File>,
    entries: HashSet<String>,
}

impl std::fmt::Debug for ZipSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSink")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl ZipSink {
    /// Create (or truncate) the archive at `path`, creating parent directories.
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating archive directory", parent)?;
        }
        let file = File::create(path)
            .await
            .fs_context("creating archive", path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: ZipFileWriter::with_tokio(file),
            entries: HashSet::new(),
        })
    }

    /// Path of the archive on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stream `source` into the archive as `name`.
    ///
    /// Returns `false` without writing when `name` is already present; the
    /// first file mapped to a name wins. Names containing `..` segments are
    /// rejected with [`ConfigError::UnsafeEntryName`].
    pub async fn append_file(&mut self, source: &Path, name: &str) -> Result<bool> {
        let name = name.trim_start_matches('/');
        if escapes_root(name) {
            return Err(ConfigError::UnsafeEntryName {
                name: name.to_string(),
            }
            .into());
        }
        if self.entries.contains(name) {
            log::warn!(
                "Skipping {}: entry '{}' already exists in {}",
                source.display(),
                name,
                self.path.display()
            );
            return Ok(false);
        }

        let file = File::open(source)
            .await
            .fs_context("opening source file", source)?;
        let mut reader = file.compat();

        let builder = ZipEntryBuilder::new(name.to_string().into(), Compression::Deflate);
        let mut entry = self.writer.write_entry_stream(builder).await?;
        futures_lite::io::copy(&mut reader, &mut entry)
            .await
            .fs_context("streaming source file", source)?;
        entry.close().await?;

        self.entries.insert(name.to_string());
        Ok(true)
    }

    /// Write the central directory and flush the archive to disk.
    pub async fn finish(self) -> Result<PathBuf> {
        use tokio::io::AsyncWriteExt;

        let mut file = self.writer.close().await?.into_inner();
        file.flush()
            .await
            .fs_context("flushing archive", &self.path)?;
        file.sync_all()
            .await
            .fs_context("syncing archive", &self.path)?;
        Ok(self.path)
    }

    /// Drop the writer and remove the partially written archive.
    pub async fn abort(self) {
        let path = self.path;
        drop(self.writer);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            log::warn!("Failed to remove partial archive {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Error;

    #[tokio::test]
    async fn test_append_rejects_parent_segments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("d.js");
        std::fs::write(&source, "d").expect("write");

        let mut sink = ZipSink::create(&dir.path().join("dist/app.zip"))
            .await
            .expect("create");
        for name in ["../../etc/d.js", "lib/../../d.js", ".."] {
            let err = sink.append_file(&source, name).await.unwrap_err();
            assert!(
                matches!(err, Error::Config(ConfigError::UnsafeEntryName { .. })),
                "{name}: {err:?}"
            );
        }
        assert!(sink.is_empty());

        assert!(sink.append_file(&source, "/lib/d.js").await.expect("append"));
        assert!(!sink.append_file(&source, "lib/d.js").await.expect("append"));
        assert_eq!(sink.len(), 1);

        let path = sink.finish().await.expect("finish");
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_abort_removes_archive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ZipSink::create(&dir.path().join("app.zip"))
            .await
            .expect("create");
        let path = sink.path().to_path_buf();
        assert!(path.exists());

        sink.abort().await;
        assert!(!path.exists());
    }
}

//! Project and version storage.
//!
//! The store maps uploaded documentation archives onto a directory
//! hierarchy (`<projects>/<project>/<version>/...`) and resolves lookups
//! against that tree. All I/O is synchronous; callers on an async
//! runtime bridge through `spawn_blocking`.

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Prefix for staging files in the temp directory.
const STAGING_PREFIX: &str = "upfile_";

/// Filesystem-backed store of documentation projects and versions.
///
/// Construction records the two directories the store owns and performs
/// no I/O; call [`ProjectStore::ensure_layout`] once at startup to create
/// them.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    project_dir: PathBuf,
    temp_dir: PathBuf,
}

impl ProjectStore {
    /// Create a store over the given projects root and temp directory.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(project_dir: P, temp_dir: Q) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            temp_dir: temp_dir.as_ref().to_path_buf(),
        }
    }

    /// Create the projects root and temp directory if they do not exist.
    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.project_dir)?;
        fs::create_dir_all(&self.temp_dir)?;
        Ok(())
    }

    /// List known project names.
    ///
    /// Returns the names of the direct subdirectories of the projects
    /// root in filesystem enumeration order; non-directory entries are
    /// skipped. Order is not guaranteed to be sorted.
    pub fn projects(&self) -> Result<Vec<String>, StoreError> {
        dir_names(&self.project_dir)
    }

    /// List the version names of a project.
    ///
    /// A missing project directory surfaces as the underlying I/O error,
    /// not as a distinct not-found condition.
    pub fn versions(&self, project: &str) -> Result<Vec<String>, StoreError> {
        dir_names(&self.project_dir(project))
    }

    /// Build the full project -> versions mapping.
    ///
    /// Aborts on the first enumeration failure; no partial result is
    /// returned.
    pub fn project_version_map(&self) -> Result<BTreeMap<String, Vec<String>>, StoreError> {
        let mut map = BTreeMap::new();
        for project in self.projects()? {
            let versions = self.versions(&project)?;
            map.insert(project, versions);
        }
        Ok(map)
    }

    /// Path of a project's directory. Pure path composition, no I/O.
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.project_dir.join(project)
    }

    /// Path of a version's content directory. Pure path composition, no
    /// existence check; callers treat a missing or non-directory result
    /// as not-found.
    pub fn version_dir(&self, project: &str, version: &str) -> PathBuf {
        self.project_dir.join(project).join(version)
    }

    /// Ingest an uploaded archive as the new contents of a version.
    ///
    /// The stream is staged to a uniquely named temp file, the previous
    /// version directory (if any) is removed, and the archive entries
    /// are extracted in archive order under the version directory. The
    /// staging file is removed on every exit path. Extraction aborts on
    /// the first error and performs no rollback, so a failed ingest can
    /// leave a partially written version directory.
    pub fn ingest_archive<R: Read>(
        &self,
        project: &str,
        version: &str,
        mut content: R,
    ) -> Result<(), StoreError> {
        // Removed by drop on failure paths, explicitly on success.
        let mut staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.temp_dir)?;
        io::copy(&mut content, staging.as_file_mut())?;

        let dest = self.version_dir(project, version);
        remove_dir_all_if_present(&dest)?;

        let mut archive = ZipArchive::new(staging.reopen()?)?;
        let entries = archive.len();
        for index in 0..entries {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_owned();
            validate_entry_path(&name)?;

            // Entry paths map verbatim onto the version directory; a
            // later entry overwrites an earlier one at the same path.
            let entry_path = dest.join(&name);
            if entry.is_dir() {
                fs::create_dir_all(&entry_path)?;
            } else {
                if let Some(parent) = entry_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut out = fs::File::create(&entry_path)?;
                io::copy(&mut entry, &mut out)?;
            }
        }

        if let Err(err) = staging.close() {
            tracing::warn!(error = %err, "failed to remove staging file");
        }
        tracing::debug!(project, version, entries, "extracted archive");
        Ok(())
    }

    /// Remove a version's directory tree.
    ///
    /// Removing an absent version is a success (idempotent).
    pub fn delete_version(&self, project: &str, version: &str) -> Result<(), StoreError> {
        remove_dir_all_if_present(&self.version_dir(project, version))
    }
}

/// Names of the direct subdirectories of `dir`, in enumeration order.
fn dir_names(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Recursively remove `path` if it exists; an absent path is a success.
fn remove_dir_all_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Reject archive entry paths that would escape the version directory
/// via absolute paths or `..` components. Paths that stay inside the
/// directory are used verbatim.
fn validate_entry_path(name: &str) -> Result<(), StoreError> {
    let path = Path::new(name);
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        return Err(StoreError::UnsafeEntryPath {
            path: name.to_owned(),
        });
    }
    Ok(())
}

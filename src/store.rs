// src/store.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use validator::Validate;

use crate::{
    error::StoreError,
    models::student::{PersonalInfo, StudentRecord, TestResult},
};

/// File-backed collection of student submissions.
///
/// The whole collection lives in one pretty-printed JSON array. Every
/// mutation runs read-modify-write under a single async mutex, and the new
/// array replaces the old file with a rename, so readers see either the
/// previous or the next version and never a partial one.
///
/// Cloning is cheap and all clones share the same lock. Open exactly one
/// store per file and pass it around instead of touching the file directly.
#[derive(Clone, Debug)]
pub struct RecordStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    tmp_path: PathBuf,
    writer: Mutex<()>,
}

impl RecordStore {
    /// Prepares a store backed by `path`. The parent directory is created if
    /// needed; the file itself is only written on the first mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Persistence {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                tmp_path: PathBuf::from(tmp_name),
                writer: Mutex::new(()),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Path of the scratch file used for atomic replacement.
    pub fn tmp_path(&self) -> &Path {
        &self.inner.tmp_path
    }

    /// All records in insertion order.
    ///
    /// Best effort: a missing, empty, unreadable or corrupt file yields an
    /// empty list and a warning, so the dashboard stays usable.
    pub async fn list(&self) -> Vec<StudentRecord> {
        match self.read_collection().await {
            Ok(students) => students,
            Err(e) => {
                tracing::warn!("Reading students failed, returning empty list: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn find(&self, id: &str) -> Option<StudentRecord> {
        self.list().await.into_iter().find(|s| s.id == id)
    }

    /// Sanitizes and validates the input, assigns `id` and `submittedAt`,
    /// and durably appends the record.
    ///
    /// Nothing is stored unless this returns `Ok`.
    pub async fn append(
        &self,
        personal_info: PersonalInfo,
        test_result: TestResult,
    ) -> Result<StudentRecord, StoreError> {
        let personal_info = personal_info.sanitized();
        personal_info.validate()?;
        test_result.validate()?;

        let _guard = self.inner.writer.lock().await;

        let mut students = self.read_collection().await?;
        let record = StudentRecord {
            id: generate_id(&students),
            personal_info,
            test_result,
            submitted_at: Utc::now(),
        };
        students.push(record.clone());

        self.write_collection(&students).await?;

        tracing::info!(
            id = %record.id,
            total = students.len(),
            "Student record appended"
        );
        Ok(record)
    }

    /// Removes the first record with `id` and returns it.
    ///
    /// A miss is reported as `StoreError::NotFound` and leaves the file alone,
    /// so repeating a delete has no further effect.
    pub async fn delete_by_id(&self, id: &str) -> Result<StudentRecord, StoreError> {
        let _guard = self.inner.writer.lock().await;

        let mut students = self.read_collection().await?;
        let position = students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = students.remove(position);

        self.write_collection(&students).await?;

        tracing::info!(id = %removed.id, total = students.len(), "Student record deleted");
        Ok(removed)
    }

    /// Replaces the collection with an empty array.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.inner.writer.lock().await;

        let previous = self.list().await.len();
        self.write_collection(&[]).await?;

        tracing::warn!(removed = previous, "All student records cleared");
        Ok(())
    }

    /// Strict read used by mutations: a corrupt file is an error so it never
    /// gets silently replaced by a shorter array.
    async fn read_collection(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let content = match fs::read_to_string(&self.inner.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Persistence {
                    path: self.inner.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::Persistence {
            path: self.inner.path.clone(),
            source: std::io::Error::new(ErrorKind::InvalidData, e),
        })
    }

    async fn write_collection(&self, students: &[StudentRecord]) -> Result<(), StoreError> {
        let mut bytes = serde_json::to_vec_pretty(students)?;
        bytes.push(b'\n');

        if let Err(source) = self.replace_file(&bytes).await {
            if let Err(e) = fs::remove_file(&self.inner.tmp_path).await {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!("Could not remove {:?}: {}", self.inner.tmp_path, e);
                }
            }
            return Err(StoreError::Persistence {
                path: self.inner.path.clone(),
                source,
            });
        }
        Ok(())
    }

    async fn replace_file(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(&self.inner.tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&self.inner.tmp_path, &self.inner.path).await
    }
}

/// `<unix millis><4 random digits>`, retried until it is unused. Mutations are
/// serialized, so checking against the loaded collection is enough.
fn generate_id(existing: &[StudentRecord]) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let candidate = format!(
            "{}{:04}",
            Utc::now().timestamp_millis(),
            rng.gen_range(0..10_000)
        );
        if !existing.iter().any(|s| s.id == candidate) {
            return candidate;
        }
    }
}

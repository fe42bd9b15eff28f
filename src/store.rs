//! Persistence for the two services that own application state.
//!
//! A workspace is a directory of string-keyed JSON blobs, one file per key,
//! matching the storage keys of the browser build this replaces. The record
//! store owns the four entity collections and rewrites all of them wholesale
//! on any mutation; the session store owns the signed-in user blob.
//!
//! There is no cross-process locking: two daemons on the same workspace can
//! silently overwrite each other. Single active instance is assumed.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::model::{AttendanceRecord, Class, Student, Teacher, User};
use crate::seed;

pub const SESSION_KEY: &str = "absen_school_user";
pub const CLASSES_KEY: &str = "absen_school_classes";
pub const STUDENTS_KEY: &str = "absen_school_students";
pub const TEACHERS_KEY: &str = "absen_school_teachers";
pub const ATTENDANCE_KEY: &str = "absen_school_attendance";

/// The one accepted password. Credential checking never hashes or expires
/// anything; this mirrors the system being replaced.
pub const SIGN_IN_PASSWORD: &str = "password123";

fn blob_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", key))
}

/// Read a collection blob, seeding the default when the file is missing and
/// falling back to the default (with a warning) when it fails to parse. Parse
/// failures are never surfaced to the caller.
fn load_or_seed<T, F>(root: &Path, key: &str, default: F) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let path = blob_path(root, key);
    match std::fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "unreadable blob, falling back to defaults");
                Ok(default())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default()),
        Err(e) => {
            Err(e).with_context(|| format!("failed to read blob {}", path.to_string_lossy()))
        }
    }
}

fn write_blob<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.to_string_lossy()))?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write blob {}", path.to_string_lossy()))?;
    Ok(())
}

/// Owns the four entity collections. Mutations rebuild the in-memory
/// collection and rewrite every blob.
pub struct RecordStore {
    root: PathBuf,
    pub classes: Vec<Class>,
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub attendance: Vec<AttendanceRecord>,
}

impl RecordStore {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create workspace {}", root.to_string_lossy()))?;

        let classes = load_or_seed(root, CLASSES_KEY, seed::seed_classes)?;
        let students = load_or_seed(root, STUDENTS_KEY, seed::seed_students)?;
        let teachers = load_or_seed(root, TEACHERS_KEY, seed::seed_teachers)?;
        let today = Local::now().date_naive();
        let attendance = load_or_seed(root, ATTENDANCE_KEY, || {
            seed::seed_attendance(&classes, today)
        })?;

        let store = RecordStore {
            root: root.to_path_buf(),
            classes,
            students,
            teachers,
            attendance,
        };
        // Write back immediately so a freshly seeded workspace is on disk.
        store.save()?;
        Ok(store)
    }

    /// Rewrite all four collection blobs. The write is two-phase: every blob
    /// is staged to a `.json.new` sibling first, and only once all four are
    /// staged are they renamed into place. A failure while serializing or
    /// staging leaves the previous on-disk state untouched.
    pub fn save(&self) -> anyhow::Result<()> {
        let staged: [(&str, serde_json::Value); 4] = [
            (CLASSES_KEY, serde_json::to_value(&self.classes)?),
            (STUDENTS_KEY, serde_json::to_value(&self.students)?),
            (TEACHERS_KEY, serde_json::to_value(&self.teachers)?),
            (ATTENDANCE_KEY, serde_json::to_value(&self.attendance)?),
        ];

        for (key, value) in &staged {
            let tmp = self.root.join(format!("{}.json.new", key));
            write_blob(&tmp, value)?;
        }
        for (key, _) in &staged {
            let tmp = self.root.join(format!("{}.json.new", key));
            std::fs::rename(&tmp, blob_path(&self.root, key)).with_context(|| {
                format!("failed to commit blob {}", key)
            })?;
        }
        Ok(())
    }

    /// Replace the record with the same id, or append. One record per
    /// (class, date); the id encodes the pair.
    pub fn upsert_attendance(&mut self, record: AttendanceRecord) -> anyhow::Result<()> {
        match self.attendance.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => self.attendance.push(record),
        }
        self.save()
    }

    /// All sign-in candidates, teachers first (the order the original
    /// credential list was built in).
    pub fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .teachers
            .iter()
            .cloned()
            .map(User::Teacher)
            .collect();
        users.extend(self.students.iter().cloned().map(User::Student));
        users
    }
}

/// Owns the persisted signed-in user. No token, no expiry; signing out just
/// deletes the blob.
pub struct SessionStore {
    root: PathBuf,
    current: Option<User>,
}

impl SessionStore {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create workspace {}", root.to_string_lossy()))?;

        let path = blob_path(root, SESSION_KEY);
        let current = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(user) => Some(user),
                Err(e) => {
                    // A stale or corrupt session blob is cleared, not kept.
                    warn!(error = %e, "discarding unreadable session blob");
                    let _ = std::fs::remove_file(&path);
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read blob {}", path.to_string_lossy()))
            }
        };

        Ok(SessionStore {
            root: root.to_path_buf(),
            current,
        })
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Match email against the candidate list and the password against the
    /// global constant. On success the matched profile is persisted and
    /// returned; `None` means invalid credentials.
    pub fn sign_in(
        &mut self,
        users: &[User],
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        if password != SIGN_IN_PASSWORD {
            return Ok(None);
        }
        let Some(user) = users.iter().find(|u| u.email() == email) else {
            return Ok(None);
        };

        write_blob(&blob_path(&self.root, SESSION_KEY), user)?;
        self.current = Some(user.clone());
        Ok(self.current.clone())
    }

    pub fn sign_out(&mut self) -> anyhow::Result<()> {
        let path = blob_path(&self.root, SESSION_KEY);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove blob {}", path.to_string_lossy()))?;
        }
        self.current = None;
        Ok(())
    }
}

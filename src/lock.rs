//! File-based locking for single-writer safety.
//!
//! Cross-platform (fs2) advisory lock taken directly on the data file:
//! - Exclusive: the cabinet owning the file; a second process fails fast.
//! - Shared: read-only inspection (stat/export) alongside other readers.
//!
//! Lock is released on Drop.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// Открытый и заблокированный файл данных.
/// Снимает блокировку в Drop; сам хэндл отдаётся в SlotStore через try_clone.
pub struct LockedFile {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Второй дескриптор того же файла (блокировка остаётся на этом).
    pub fn handle(&self) -> Result<File> {
        Ok(self.file.try_clone()?)
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        // unlock errors on drop are ignored
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_data_file(path: &Path, create: bool, write: bool) -> Result<File> {
    let f = OpenOptions::new()
        .read(true)
        .write(write)
        .create(create)
        .open(path)?;
    Ok(f)
}

/// Try to open+lock the data file. Returns Err if already locked by someone else.
pub fn try_lock_data_file(path: &Path, mode: LockMode, create: bool) -> Result<LockedFile> {
    let write = mode == LockMode::Exclusive;
    let file = open_data_file(path, create && write, write)?;
    let res = match mode {
        LockMode::Shared => FileExt::try_lock_shared(&file),
        LockMode::Exclusive => FileExt::try_lock_exclusive(&file),
    };
    if let Err(e) = res {
        if e.kind() == fs2::lock_contended_error().kind() {
            return Err(StoreError::Locked {
                path: path.to_path_buf(),
            });
        }
        return Err(e.into());
    }
    Ok(LockedFile {
        file,
        path: path.to_path_buf(),
        mode,
    })
}

//! cabinet/open - открытие картотеки по пути с advisory-блокировкой файла.

use std::fs::File;
use std::path::Path;

use log::info;

use crate::config::CabinetConfig;
use crate::error::Result;
use crate::lock::{try_lock_data_file, LockMode};
use crate::validate::Validator;

use super::core::Cabinet;

impl<V: Validator> Cabinet<File, V> {
    /// Открыть (или создать) файл данных на запись с эксклюзивной блокировкой.
    pub fn open_path(path: &Path, validator: V, cfg: CabinetConfig) -> Result<Self> {
        let lock = try_lock_data_file(path, LockMode::Exclusive, true)?;
        let mut cab = Self::new(lock.handle()?, validator, cfg)?;
        cab._lock = Some(lock);
        info!("opened {} (exclusive)", path.display());
        Ok(cab)
    }

    /// Открыть существующий файл только на чтение (shared lock).
    /// Мутации вернут StoreError::Io.
    pub fn open_path_shared(path: &Path, validator: V, cfg: CabinetConfig) -> Result<Self> {
        let lock = try_lock_data_file(path, LockMode::Shared, false)?;
        let mut cab = Self::new(lock.handle()?, validator, cfg)?;
        cab._lock = Some(lock);
        info!("opened {} (shared)", path.display());
        Ok(cab)
    }

    /// Открыть по пути с конфигурацией из окружения.
    pub fn open(path: &Path, validator: V) -> Result<Self> {
        Self::open_path(path, validator, CabinetConfig::from_env())
    }
}

//! cabinet/core - структура Cabinet, конструктор поверх открытого хэндла,
//! статистика и доступ к внутренностям.

use std::io::Cursor;

use log::info;
use serde::Serialize;

use crate::config::CabinetConfig;
use crate::error::Result;
use crate::index::IndexManager;
use crate::lock::LockedFile;
use crate::store::{SlotFile, SlotStore};
use crate::validate::Validator;

/// Картотека: единственная точка доступа к файлу данных и индексам.
///
/// Все операции берут `&mut self`, итераторы держат заимствование хранилища,
/// поэтому чередование операций над общим файловым указателем невозможно.
pub struct Cabinet<F: SlotFile, V: Validator> {
    pub(crate) store: SlotStore<F>,
    pub(crate) index: IndexManager,
    pub(crate) validator: V,
    pub(crate) cfg: CabinetConfig,
    // держим advisory lock, если картотека открыта по пути
    pub(crate) _lock: Option<LockedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub live: u64,
    pub tombstoned: u64,
    pub slots: u64,
    pub file_len: u64,
}

impl<F: SlotFile, V: Validator> Cabinet<F, V> {
    /// Построить картотеку поверх уже открытого хэндла. Индексы строятся полным сканом.
    pub fn new(file: F, validator: V, cfg: CabinetConfig) -> Result<Self> {
        let mut store = SlotStore::new(file, cfg.name_policy)?;
        store.set_data_fsync(cfg.data_fsync);
        let index = IndexManager::build(&mut store)?;
        info!(
            "cabinet ready: {} slot(s), {} live record(s)",
            store.record_count(),
            index.len()
        );
        Ok(Self {
            store,
            index,
            validator,
            cfg,
            _lock: None,
        })
    }

    pub fn config(&self) -> &CabinetConfig {
        &self.cfg
    }

    pub fn index(&self) -> &IndexManager {
        &self.index
    }

    pub fn store(&self) -> &SlotStore<F> {
        &self.store
    }

    /// Количество живых записей.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    /// Количество слотов в файле (живые + tombstone).
    #[inline]
    pub fn record_count(&self) -> u64 {
        self.store.record_count()
    }

    #[inline]
    pub fn contains(&self, id: i32) -> bool {
        self.index.contains(id)
    }

    pub fn stat(&self) -> Stat {
        let live = self.index.len() as u64;
        let slots = self.store.record_count();
        Stat {
            live,
            tombstoned: slots.saturating_sub(live),
            slots,
            file_len: self.store.file_len(),
        }
    }

    /// Полная перестройка индексов (например, после внешней правки файла).
    pub fn rebuild_index(&mut self) -> Result<()> {
        self.index.rebuild(&mut self.store)
    }

    /// Сбросить данные на диск.
    pub fn sync(&mut self) -> Result<()> {
        self.store.sync()
    }

    /// Отдать файл обратно вызывающему.
    pub fn into_inner(self) -> F {
        self.store.into_inner()
    }
}

impl<V: Validator> Cabinet<Cursor<Vec<u8>>, V> {
    /// Пустая картотека в памяти.
    pub fn in_memory(validator: V, cfg: CabinetConfig) -> Result<Self> {
        Self::new(Cursor::new(Vec::new()), validator, cfg)
    }
}

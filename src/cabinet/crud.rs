//! cabinet/crud - одиночные операции: create / insert / edit / remove / get.
//!
//! Контракт edit: по id. Позиция берётся из индекса, перед перезаписью
//! проверяется, что в слоте лежит живая запись с тем же id.

use log::debug;

use crate::codec;
use crate::error::{Result, StoreError};
use crate::record::{Record, RecordData, SlotState};
use crate::store::SlotFile;
use crate::validate::Validator;

use super::core::Cabinet;

impl<F: SlotFile, V: Validator> Cabinet<F, V> {
    /// Создать запись с новым id (max живого id + 1, либо 1).
    pub fn create(&mut self, data: RecordData) -> Result<i32> {
        let id = self.next_id()?;
        self.insert(data.with_id(id))?;
        Ok(id)
    }

    /// Вставить запись с id, заданным вызывающим.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.index.contains(record.id) {
            return Err(StoreError::DuplicateId { id: record.id });
        }
        self.check_valid(&record)?;
        // индексируем имя в том виде, в каком оно легло в слот
        let stored = codec::normalize(&record, self.store.name_policy())?;
        let slot = self.store.append(&stored)?;
        self.index.on_insert(&stored, slot);
        debug!("insert id={} slot={}", record.id, slot);
        Ok(())
    }

    /// Переписать запись с тем же id на месте (tombstone не меняется).
    pub fn edit(&mut self, record: Record) -> Result<()> {
        let slot = self.slot_of(record.id)?;
        self.check_valid(&record)?;
        let stored = codec::normalize(&record, self.store.name_policy())?;
        let old = self.read_live(slot, record.id)?;

        self.store.write_at(slot, &stored, SlotState::Live)?;
        if self.cfg.rebuild_after_mutation {
            self.index.rebuild(&mut self.store)?;
        } else {
            self.index.on_update(&old, &stored, slot);
        }
        debug!("edit id={} slot={}", record.id, slot);
        Ok(())
    }

    /// Мягкое удаление: tombstone в слоте, длина файла не меняется.
    pub fn remove(&mut self, id: i32) -> Result<()> {
        let slot = self.slot_of(id)?;
        let old = self.read_live(slot, id)?;

        self.store.set_state(slot, SlotState::Tombstoned)?;
        if self.cfg.rebuild_after_mutation {
            self.index.rebuild(&mut self.store)?;
        } else {
            self.index.on_remove(&old);
        }
        debug!("remove id={} slot={}", id, slot);
        Ok(())
    }

    pub fn get(&mut self, id: i32) -> Result<Record> {
        let slot = self.slot_of(id)?;
        self.read_live(slot, id)
    }

    // ---------- helpers ----------

    pub(crate) fn next_id(&self) -> Result<i32> {
        match self.index.max_id() {
            None => Ok(1),
            Some(max) => max
                .max(0)
                .checked_add(1)
                .ok_or(StoreError::DuplicateId { id: i32::MAX }),
        }
    }

    fn check_valid(&self, record: &Record) -> Result<()> {
        if !self.validator.validate(record) {
            return Err(StoreError::ValidationFailed { id: record.id });
        }
        Ok(())
    }

    fn slot_of(&self, id: i32) -> Result<u64> {
        self.index
            .position_of(id)
            .ok_or(StoreError::RecordNotFound { id })
    }

    /// Прочитать слот и убедиться, что он живой и принадлежит id.
    fn read_live(&mut self, slot: u64, id: i32) -> Result<Record> {
        let (record, state) = self.store.read_at(slot)?;
        if !state.is_live() || record.id != id {
            return Err(StoreError::CorruptSlot {
                slot,
                reason: format!(
                    "index maps id {} here, slot holds id {} ({:?})",
                    id, record.id, state
                ),
            });
        }
        Ok(record)
    }
}

//! cabinet/snapshot - выгрузка всех живых записей и слияние набора записей обратно.
//!
//! restore(): для каждой записи - если id уже жив, слот перезаписывается на месте,
//! иначе запись дописывается в конец. Записи, не прошедшие валидацию или
//! кодирование, пропускаются и попадают в отчёт. В конце - полная перестройка индексов.

use log::{error, info, warn};
use serde::Serialize;

use crate::codec;
use crate::error::{Result, StoreError};
use crate::record::{Record, SlotState};
use crate::store::SlotFile;
use crate::validate::Validator;

use super::core::Cabinet;

#[derive(Debug, Default, Clone, Serialize)]
pub struct RestoreReport {
    pub appended: u64,
    pub overwritten: u64,
    /// (id, причина)
    pub rejected: Vec<(i32, String)>,
}

impl RestoreReport {
    pub fn imported(&self) -> u64 {
        self.appended + self.overwritten
    }
}

impl<F: SlotFile, V: Validator> Cabinet<F, V> {
    /// Все живые записи в порядке слотов.
    pub fn snapshot(&mut self) -> Result<Vec<Record>> {
        self.all().collect_all()
    }

    pub fn restore<I>(&mut self, records: I) -> Result<RestoreReport>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut rep = RestoreReport::default();

        for record in records {
            let id = record.id;
            match self.restore_one(&record) {
                Ok(true) => rep.overwritten += 1,
                Ok(false) => rep.appended += 1,
                Err(e) if e.is_record_error() => {
                    warn!("import: record #{} skipped: {}", id, e);
                    rep.rejected.push((id, e.to_string()));
                }
                Err(e) => {
                    // индекс мог разойтись с файлом - восстановим перед выходом
                    if let Err(re) = self.index.rebuild(&mut self.store) {
                        error!("import: index rebuild after '{}' failed: {}", e, re);
                        return Err(StoreError::StaleIndex {
                            cause: e.to_string(),
                            rebuild: re.to_string(),
                        });
                    }
                    return Err(e);
                }
            }
        }

        self.index.rebuild(&mut self.store)?;
        info!(
            "import: {} appended, {} overwritten, {} rejected",
            rep.appended,
            rep.overwritten,
            rep.rejected.len()
        );
        Ok(rep)
    }

    /// Ok(true) - перезапись на месте, Ok(false) - добавление.
    fn restore_one(&mut self, record: &Record) -> Result<bool> {
        if !self.validator.validate(record) {
            return Err(StoreError::ValidationFailed { id: record.id });
        }
        let stored = codec::normalize(record, self.store.name_policy())?;
        match self.index.position_of(record.id) {
            Some(slot) => {
                self.store.write_at(slot, &stored, SlotState::Live)?;
                Ok(true)
            }
            None => {
                let slot = self.store.append(&stored)?;
                // by_id нужен сразу: повтор id в том же наборе должен перезаписать
                self.index.on_insert(&stored, slot);
                Ok(false)
            }
        }
    }
}

use log::info;
use serde::Serialize;

use crate::codec;
use crate::error::Result;
use crate::metrics::record_purge_run;
use crate::record::SlotState;
use crate::store::SlotFile;
use crate::validate::Validator;

use super::core::Cabinet;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub slots_before: u64,
    pub slots_after: u64,
    /// Удалено tombstone-слотов (= slots_before - slots_after).
    pub reclaimed: u64,
    /// Сколько живых слотов перенесено на новую позицию.
    pub moved: u64,
}

impl<F: SlotFile, V: Validator> Cabinet<F, V> {
    /// Компактация файла:
    /// - Проход 0..record_count, write_cursor - следующая свободная позиция,
    ///   pending_dead - число встреченных, ещё не "закрытых" tombstone-слотов.
    /// - Живой слот со сдвигом декодируется и перезаписывается в write_cursor.
    /// - В конце: truncate(write_cursor) и полная перестройка индексов.
    ///
    /// Порядок живых записей и их id сохраняются. Повторный вызов без новых
    /// удалений ничего не пишет. При ошибке I/O посреди прохода частичная
    /// перезапись не откатывается.
    pub fn purge(&mut self) -> Result<PurgeReport> {
        let total = self.store.record_count();
        let mut write_cursor: u64 = 0;
        let mut pending_dead: u64 = 0;
        let mut moved: u64 = 0;

        for slot in 0..total {
            let buf = self.store.read_raw(slot)?;
            let state = codec::read_state(&buf).map_err(|e| e.at_slot(slot))?;

            if state == SlotState::Tombstoned {
                pending_dead += 1;
                continue;
            }

            if pending_dead > 0 || slot != write_cursor {
                let (record, _) = codec::decode(&buf).map_err(|e| e.at_slot(slot))?;
                self.store.write_at(write_cursor, &record, SlotState::Live)?;
                pending_dead = pending_dead.saturating_sub(1);
                moved += 1;
            }
            write_cursor += 1;
        }

        self.store.truncate(write_cursor)?;
        self.index.rebuild(&mut self.store)?;

        let rep = PurgeReport {
            slots_before: total,
            slots_after: write_cursor,
            reclaimed: total - write_cursor,
            moved,
        };
        record_purge_run(rep.moved, rep.reclaimed);
        info!(
            "purge: {} -> {} slot(s), reclaimed {}, moved {}",
            rep.slots_before, rep.slots_after, rep.reclaimed, rep.moved
        );
        Ok(rep)
    }
}

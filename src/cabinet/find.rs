//! cabinet/find - выборки через индексы: find / all / delete_where.

use crate::error::Result;
use crate::iter::RecordIter;
use crate::record::FieldQuery;
use crate::store::SlotFile;
use crate::validate::Validator;

use super::core::Cabinet;

impl<F: SlotFile, V: Validator> Cabinet<F, V> {
    /// Записи с заданным значением поля, в порядке вставки в бакет.
    pub fn find(&mut self, query: &FieldQuery) -> RecordIter<'_, F> {
        let positions = self.index.lookup_positions(query);
        RecordIter::new(&mut self.store, positions)
    }

    /// Все живые записи в порядке слотов.
    pub fn all(&mut self) -> RecordIter<'_, F> {
        let positions = self.index.live_positions();
        RecordIter::new(&mut self.store, positions)
    }

    /// Удалить все записи, подходящие под запрос. Возвращает удалённые id.
    pub fn delete_where(&mut self, query: &FieldQuery) -> Result<Vec<i32>> {
        let ids = self.index.bucket_ids(query);
        for id in &ids {
            self.remove(*id)?;
        }
        Ok(ids)
    }
}

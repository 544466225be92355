//! iter - ленивый итератор записей по заранее выбранному списку позиций.
//!
//! Итератор держит `&mut SlotStore`, поэтому пока он жив, никакая другая
//! операция не может сдвинуть файловый указатель. Не перезапускается:
//! для повторного прохода нужен новый итератор.

use crate::error::Result;
use crate::record::Record;
use crate::store::{SlotFile, SlotStore};

pub struct RecordIter<'a, F: SlotFile> {
    store: &'a mut SlotStore<F>,
    positions: std::vec::IntoIter<u64>,
}

impl<'a, F: SlotFile> RecordIter<'a, F> {
    pub fn new(store: &'a mut SlotStore<F>, positions: Vec<u64>) -> Self {
        Self {
            store,
            positions: positions.into_iter(),
        }
    }

    /// Следующая запись или None, если позиции закончились.
    pub fn advance(&mut self) -> Result<Option<Record>> {
        match self.positions.next() {
            Some(slot) => {
                let (record, _state) = self.store.read_at(slot)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Сколько позиций осталось.
    pub fn remaining(&self) -> usize {
        self.positions.len()
    }

    /// Дочитать всё в вектор.
    pub fn collect_all(mut self) -> Result<Vec<Record>> {
        let mut out = Vec::with_capacity(self.remaining());
        while let Some(r) = self.advance()? {
            out.push(r);
        }
        Ok(out)
    }
}

impl<'a, F: SlotFile> Iterator for RecordIter<'a, F> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

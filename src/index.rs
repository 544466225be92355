//! index - in-memory вторичные индексы картотеки.
//!
//! - by_id:       id -> slot index (только живые слоты)
//! - first_name:  lowercase(first_name) -> [id, ...] (порядок вставки)
//! - last_name:   lowercase(last_name)  -> [id, ...]
//! - dob:         date_of_birth         -> [id, ...]
//!
//! Индекс производный: rebuild() восстанавливает его полным проходом по файлу.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::error::Result;
use crate::metrics::record_index_rebuild;
use crate::record::{FieldQuery, Record, SearchField};
use crate::store::{SlotFile, SlotStore};

#[derive(Debug, Default, Clone)]
pub struct IndexManager {
    by_id: HashMap<i32, u64>,
    first_name: HashMap<String, Vec<i32>>,
    last_name: HashMap<String, Vec<i32>>,
    dob: HashMap<NaiveDate, Vec<i32>>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Построить индекс полным сканом.
    pub fn build<F: SlotFile>(store: &mut SlotStore<F>) -> Result<Self> {
        let mut idx = Self::new();
        idx.rebuild(store)?;
        Ok(idx)
    }

    pub fn on_insert(&mut self, record: &Record, slot: u64) {
        self.by_id.insert(record.id, slot);
        bucket_push(&mut self.first_name, name_key(&record.first_name), record.id);
        bucket_push(&mut self.last_name, name_key(&record.last_name), record.id);
        bucket_push(&mut self.dob, record.date_of_birth, record.id);
    }

    pub fn on_update(&mut self, old: &Record, new: &Record, slot: u64) {
        self.unlink_fields(old);
        self.by_id.remove(&old.id);
        self.on_insert(new, slot);
    }

    pub fn on_remove(&mut self, record: &Record) {
        self.by_id.remove(&record.id);
        self.unlink_fields(record);
    }

    /// Полная перестройка: проход 0..record_count, tombstone-слоты пропускаются.
    /// Новый индекс собирается отдельно и подменяет текущий только при успехе;
    /// при ошибке I/O старый (возможно устаревший) индекс остаётся, ошибка
    /// возвращается вызывающему.
    pub fn rebuild<F: SlotFile>(&mut self, store: &mut SlotStore<F>) -> Result<()> {
        let mut fresh = Self::new();
        // Последняя живая версия id (для разрешения дублей в повреждённых файлах)
        let mut last: HashMap<i32, Record> = HashMap::new();

        for slot in 0..store.record_count() {
            let (record, state) = store.read_at(slot)?;
            if !state.is_live() {
                continue;
            }
            if let Some(prev) = last.remove(&record.id) {
                warn!(
                    "duplicate live id {} at slot {} (previous slot {}), later slot wins",
                    record.id,
                    slot,
                    fresh.by_id.get(&record.id).copied().unwrap_or_default()
                );
                fresh.on_remove(&prev);
            }
            fresh.on_insert(&record, slot);
            last.insert(record.id, record);
        }

        *self = fresh;
        record_index_rebuild();
        debug!("index rebuilt: {} live record(s)", self.by_id.len());
        Ok(())
    }

    /// Позиции слотов для значения поля, в порядке вставки id в бакет.
    pub fn lookup_positions(&self, query: &FieldQuery) -> Vec<u64> {
        let ids: &[i32] = match query {
            FieldQuery::FirstName(v) => bucket_get(&self.first_name, &name_key(v)),
            FieldQuery::LastName(v) => bucket_get(&self.last_name, &name_key(v)),
            FieldQuery::DateOfBirth(d) => bucket_get(&self.dob, d),
        };
        ids.iter()
            .filter_map(|id| self.by_id.get(id).copied())
            .collect()
    }

    /// id в бакете поля (для тестов/диагностики).
    pub fn bucket_ids(&self, query: &FieldQuery) -> Vec<i32> {
        match query {
            FieldQuery::FirstName(v) => bucket_get(&self.first_name, &name_key(v)).to_vec(),
            FieldQuery::LastName(v) => bucket_get(&self.last_name, &name_key(v)).to_vec(),
            FieldQuery::DateOfBirth(d) => bucket_get(&self.dob, d).to_vec(),
        }
    }

    /// Число различных значений в индексе поля.
    pub fn bucket_count(&self, field: SearchField) -> usize {
        match field {
            SearchField::FirstName => self.first_name.len(),
            SearchField::LastName => self.last_name.len(),
            SearchField::DateOfBirth => self.dob.len(),
        }
    }

    #[inline]
    pub fn position_of(&self, id: i32) -> Option<u64> {
        self.by_id.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: i32) -> bool {
        self.by_id.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn max_id(&self) -> Option<i32> {
        self.by_id.keys().copied().max()
    }

    /// Все живые позиции по возрастанию (порядок слотов в файле).
    pub fn live_positions(&self) -> Vec<u64> {
        let mut v: Vec<u64> = self.by_id.values().copied().collect();
        v.sort_unstable();
        v
    }

    fn unlink_fields(&mut self, record: &Record) {
        bucket_remove(&mut self.first_name, &name_key(&record.first_name), record.id);
        bucket_remove(&mut self.last_name, &name_key(&record.last_name), record.id);
        bucket_remove(&mut self.dob, &record.date_of_birth, record.id);
    }
}

#[inline]
fn name_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn bucket_push<K: Hash + Eq>(map: &mut HashMap<K, Vec<i32>>, key: K, id: i32) {
    map.entry(key).or_default().push(id);
}

fn bucket_get<'a, K: Hash + Eq>(map: &'a HashMap<K, Vec<i32>>, key: &K) -> &'a [i32] {
    map.get(key).map(|v| v.as_slice()).unwrap_or(&[])
}

/// Убрать id из бакета; пустой бакет удаляется.
fn bucket_remove<K: Hash + Eq>(map: &mut HashMap<K, Vec<i32>>, key: &K, id: i32) {
    if let Some(ids) = map.get_mut(key) {
        ids.retain(|x| *x != id);
        if ids.is_empty() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NamePolicy;
    use crate::record::SlotState;
    use std::io::Cursor;

    fn rec(id: i32, first: &str, last: &str, y: i32) -> Record {
        Record {
            id,
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: NaiveDate::from_ymd_opt(y, 1, 15).unwrap(),
            personal_rating: 1,
            salary: "10".parse().unwrap(),
            gender: 'M',
        }
    }

    #[test]
    fn insert_lookup_in_insertion_order() {
        let mut idx = IndexManager::new();
        idx.on_insert(&rec(5, "Ann", "Lee", 1990), 0);
        idx.on_insert(&rec(2, "ann", "Kim", 1991), 1);
        idx.on_insert(&rec(9, "Bob", "Lee", 1990), 2);

        assert_eq!(idx.lookup_positions(&FieldQuery::FirstName("ANN".into())), vec![0, 1]);
        assert_eq!(idx.bucket_ids(&FieldQuery::LastName("lee".into())), vec![5, 9]);
        let d = NaiveDate::from_ymd_opt(1990, 1, 15).unwrap();
        assert_eq!(idx.lookup_positions(&FieldQuery::DateOfBirth(d)), vec![0, 2]);
        assert_eq!(idx.max_id(), Some(9));
    }

    #[test]
    fn update_moves_between_buckets() {
        let mut idx = IndexManager::new();
        let old = rec(1, "Ann", "Lee", 1990);
        idx.on_insert(&old, 0);
        let new = rec(1, "Zoe", "Lee", 1990);
        idx.on_update(&old, &new, 0);

        assert!(idx.lookup_positions(&FieldQuery::FirstName("Ann".into())).is_empty());
        assert_eq!(idx.bucket_count(SearchField::FirstName), 1);
        assert_eq!(idx.lookup_positions(&FieldQuery::FirstName("zoe".into())), vec![0]);
        assert_eq!(idx.position_of(1), Some(0));
    }

    #[test]
    fn remove_drops_empty_buckets() {
        let mut idx = IndexManager::new();
        let r = rec(1, "Ann", "Lee", 1990);
        idx.on_insert(&r, 0);
        idx.on_remove(&r);
        assert!(idx.is_empty());
        for f in SearchField::ALL {
            assert_eq!(idx.bucket_count(f), 0);
        }
    }

    #[test]
    fn rebuild_skips_tombstones() {
        let mut store = SlotStore::new(Cursor::new(Vec::new()), NamePolicy::Reject).unwrap();
        store.append(&rec(1, "Ann", "Lee", 1990)).unwrap();
        store.append(&rec(2, "Bob", "Kim", 1980)).unwrap();
        store.append(&rec(3, "Cid", "Lee", 1970)).unwrap();
        store.set_state(1, SlotState::Tombstoned).unwrap();

        let idx = IndexManager::build(&mut store).unwrap();
        assert_eq!(idx.len(), 2);
        assert!(!idx.contains(2));
        assert_eq!(idx.position_of(3), Some(2));
        assert_eq!(idx.live_positions(), vec![0, 2]);
        assert!(idx.bucket_ids(&FieldQuery::FirstName("bob".into())).is_empty());
    }

    #[test]
    fn rebuild_resolves_duplicate_ids_to_later_slot() {
        let mut store = SlotStore::new(Cursor::new(Vec::new()), NamePolicy::Reject).unwrap();
        store.append(&rec(1, "Ann", "Lee", 1990)).unwrap();
        store.append(&rec(1, "Bea", "Lee", 1990)).unwrap();

        let idx = IndexManager::build(&mut store).unwrap();
        assert_eq!(idx.position_of(1), Some(1));
        assert!(idx.bucket_ids(&FieldQuery::FirstName("ann".into())).is_empty());
        assert_eq!(idx.bucket_ids(&FieldQuery::LastName("lee".into())), vec![1]);
    }
}

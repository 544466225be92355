//! cabinet - high-level API картотеки
//!
//! Разделение по подмодулям:
//! - core.rs        - структура Cabinet, new()/in_memory(), stat, доступ к внутренностям
//! - open.rs        - открытие по пути (exclusive/shared lock через fs2)
//! - crud.rs        - create / insert / edit / remove / get
//! - find.rs        - find по индексам, all(), delete_where
//! - compaction.rs  - purge: удаление tombstone-слотов и усечение файла
//! - snapshot.rs    - snapshot()/restore() для экспорта и импорта

pub mod compaction;
pub mod core;
pub mod crud;
pub mod find;
pub mod open;
pub mod snapshot;

pub use compaction::PurgeReport;
pub use self::core::{Cabinet, Stat};
pub use snapshot::RestoreReport;

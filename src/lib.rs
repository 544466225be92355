// Формат и кодек
pub mod consts;
pub mod error;
pub mod record;
pub mod codec;

// Хранилище слотов и индексы
pub mod store;  // src/store/{mod,file,slots}.rs
pub mod index;
pub mod iter;

// High-level API
pub mod cabinet; // src/cabinet/{mod,core,open,crud,find,compaction,snapshot}.rs
pub mod validate;
pub mod config;
pub mod lock;
pub mod metrics;

// Удобные реэкспорты
pub use cabinet::{Cabinet, PurgeReport, RestoreReport, Stat};
pub use codec::NamePolicy;
pub use config::{CabinetBuilder, CabinetConfig};
pub use error::{NameField, Result, StoreError};
pub use index::IndexManager;
pub use iter::RecordIter;
pub use record::{FieldQuery, Record, RecordData, Salary, SearchField, SlotState};
pub use store::{SlotFile, SlotStore};
pub use validate::{AcceptAll, DefaultValidator, Validator};

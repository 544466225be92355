//! store - файловое хранилище слотов фиксированного размера.
//!
//! - file.rs  - трейт SlotFile (File / Cursor<Vec<u8>>)
//! - slots.rs - SlotStore: append / write_at / set_state / read_at / truncate

pub mod file;
pub mod slots;

pub use file::SlotFile;
pub use slots::SlotStore;

use std::io::SeekFrom;

use log::{debug, error};

use crate::codec::{self, NamePolicy, SlotBuf};
use crate::consts::{OFF_STATE, SLOT_SIZE};
use crate::error::{Result, StoreError};
use crate::metrics::{
    record_slot_appended, record_slot_read, record_slot_rewritten, record_tombstone_written,
};
use crate::record::{Record, SlotState};

use super::file::SlotFile;

/// Хранилище слотов: единственный владелец файлового хэндла.
///
/// Каждая пара seek+read / seek+write выполняется внутри одного `&mut self`
/// метода, поэтому файловый указатель никогда не "делится" между операциями.
/// Слот пишется одним write_all целиком.
pub struct SlotStore<F: SlotFile> {
    file: F,
    count: u64,
    policy: NamePolicy,
    data_fsync: bool,
}

impl<F: SlotFile> SlotStore<F> {
    /// Принять уже открытый файл. Длина должна быть кратна SLOT_SIZE.
    pub fn new(mut file: F, policy: NamePolicy) -> Result<Self> {
        let len = file.byte_len()?;
        if len % SLOT_SIZE as u64 != 0 {
            return Err(StoreError::CorruptFile(format!(
                "length {} is not a multiple of slot size {}",
                len, SLOT_SIZE
            )));
        }
        let count = len / SLOT_SIZE as u64;
        debug!("slot store: {} slot(s), {} bytes", count, len);
        Ok(Self {
            file,
            count,
            policy,
            data_fsync: false,
        })
    }

    pub fn set_data_fsync(&mut self, on: bool) {
        self.data_fsync = on;
    }

    #[inline]
    pub fn name_policy(&self) -> NamePolicy {
        self.policy
    }

    /// Число слотов (живых и tombstone).
    #[inline]
    pub fn record_count(&self) -> u64 {
        self.count
    }

    /// Ожидаемая длина файла: record_count * SLOT_SIZE.
    #[inline]
    pub fn file_len(&self) -> u64 {
        self.count * SLOT_SIZE as u64
    }

    /// Фактическая длина файла (спрашивает у ОС / курсора).
    pub fn physical_len(&mut self) -> Result<u64> {
        Ok(self.file.byte_len()?)
    }

    /// Дописать запись в конец файла (state = Live). Возвращает индекс слота.
    pub fn append(&mut self, record: &Record) -> Result<u64> {
        let buf = codec::encode(record, self.policy)?;
        let end = self.file.seek(SeekFrom::End(0))?;
        if end != self.file_len() {
            return Err(StoreError::CorruptFile(format!(
                "file length {} does not match {} slot(s)",
                end, self.count
            )));
        }
        let written = match self.file.write_all(&buf) {
            Ok(()) => self.sync(),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = written {
            // откатываем хвост, чтобы длина файла снова была count * SLOT_SIZE
            if let Err(re) = self.file.set_len(end) {
                error!("append rollback to {} bytes failed: {}", end, re);
            }
            return Err(e);
        }

        let idx = self.count;
        self.count += 1;
        record_slot_appended();
        debug!("append id={} -> slot {}", record.id, idx);
        Ok(idx)
    }

    /// Перезаписать слот целиком (запись + состояние).
    pub fn write_at(&mut self, slot: u64, record: &Record, state: SlotState) -> Result<()> {
        self.check_slot(slot)?;
        let mut buf = codec::encode(record, self.policy)?;
        buf[OFF_STATE..OFF_STATE + 2].copy_from_slice(&codec::encode_state(state));
        self.write_raw(slot, &buf)?;
        record_slot_rewritten();
        debug!("write id={} at slot {} ({:?})", record.id, slot, state);
        Ok(())
    }

    /// Переписать только флаг состояния (2 байта).
    pub fn set_state(&mut self, slot: u64, state: SlotState) -> Result<()> {
        self.check_slot(slot)?;
        self.file.seek(SeekFrom::Start(slot_offset(slot) + OFF_STATE as u64))?;
        self.file.write_all(&codec::encode_state(state))?;
        self.sync()?;
        if state == SlotState::Tombstoned {
            record_tombstone_written();
        }
        debug!("slot {} -> {:?}", slot, state);
        Ok(())
    }

    /// Прочитать и декодировать слот.
    pub fn read_at(&mut self, slot: u64) -> Result<(Record, SlotState)> {
        let buf = self.read_raw(slot)?;
        codec::decode(&buf).map_err(|e| e.at_slot(slot))
    }

    /// Прочитать только состояние слота.
    pub fn read_state_at(&mut self, slot: u64) -> Result<SlotState> {
        self.check_slot(slot)?;
        let mut st = [0u8; 2];
        self.file.seek(SeekFrom::Start(slot_offset(slot) + OFF_STATE as u64))?;
        self.file.read_exact(&mut st)?;
        record_slot_read();
        codec::read_state(&st).map_err(|e| e.at_slot(slot))
    }

    /// Сырые байты слота.
    pub fn read_raw(&mut self, slot: u64) -> Result<SlotBuf> {
        self.check_slot(slot)?;
        let mut buf = [0u8; SLOT_SIZE];
        self.file.seek(SeekFrom::Start(slot_offset(slot)))?;
        self.file.read_exact(&mut buf)?;
        record_slot_read();
        Ok(buf)
    }

    /// Записать сырые байты слота (используется компактацией при переносе).
    pub(crate) fn write_raw(&mut self, slot: u64, buf: &SlotBuf) -> Result<()> {
        self.check_slot(slot)?;
        self.file.seek(SeekFrom::Start(slot_offset(slot)))?;
        self.file.write_all(buf)?;
        self.sync()
    }

    /// Установить длину файла = new_count * SLOT_SIZE.
    pub fn truncate(&mut self, new_count: u64) -> Result<()> {
        if new_count > self.count {
            return Err(StoreError::SlotOutOfRange {
                slot: new_count,
                count: self.count,
            });
        }
        self.file.set_len(new_count * SLOT_SIZE as u64)?;
        self.file.sync_data()?;
        debug!("truncate {} -> {} slot(s)", self.count, new_count);
        self.count = new_count;
        Ok(())
    }

    /// Сбросить данные, если включён data_fsync.
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        if self.data_fsync {
            self.file.sync_data()?;
        }
        Ok(())
    }

    pub fn get_ref(&self) -> &F {
        &self.file
    }

    pub fn into_inner(self) -> F {
        self.file
    }

    #[inline]
    fn check_slot(&self, slot: u64) -> Result<()> {
        if slot >= self.count {
            return Err(StoreError::SlotOutOfRange {
                slot,
                count: self.count,
            });
        }
        Ok(())
    }
}

#[inline]
fn slot_offset(slot: u64) -> u64 {
    slot * SLOT_SIZE as u64
}

//! SlotFile - минимальный контракт к файлу данных: Read + Write + Seek + set_len.
//!
//! Реализации: std::fs::File (рабочий режим) и Cursor<Vec<u8>> (in-memory, тесты).

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

pub trait SlotFile: Read + Write + Seek {
    /// Установить длину файла в байтах (усечение/расширение нулями).
    fn set_len(&mut self, len: u64) -> io::Result<()>;

    /// Сбросить данные на устройство. По умолчанию - no-op.
    fn sync_data(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Текущая длина в байтах. Сдвигает файловый указатель в конец.
    fn byte_len(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::End(0))
    }
}

impl SlotFile for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        File::sync_data(self)
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl SlotFile for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds usize"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }
}

impl<T: SlotFile + ?Sized> SlotFile for &mut T {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_len(len)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        (**self).sync_data()
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        (**self).byte_len()
    }
}

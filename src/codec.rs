//! codec - сериализация Record в слот фиксированного размера и обратно.
//!
//! Формат слота см. в consts.rs. encode() всегда пишет state=0 (Live);
//! tombstone выставляется отдельно (SlotStore::set_state).

use byteorder::{ByteOrder, LittleEndian};
use chrono::{Datelike, NaiveDate};

use crate::consts::{
    NAME_WIDTH, OFF_DAY, OFF_FIRST_NAME, OFF_GENDER, OFF_ID, OFF_LAST_NAME, OFF_MONTH, OFF_RATING,
    OFF_SALARY, OFF_STATE, OFF_YEAR, SALARY_LEN, SLOT_SIZE, STATE_LIVE,
};
use crate::error::{NameField, Result, StoreError};
use crate::record::{Record, Salary, SlotState};

pub type SlotBuf = [u8; SLOT_SIZE];

/// Что делать с именем длиннее NAME_WIDTH байт.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Молча обрезать до NAME_WIDTH (совместимость со старыми файлами/клиентами).
    Truncate,
    /// Вернуть StoreError::FieldTooLong.
    #[default]
    Reject,
}

impl NamePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Some(NamePolicy::Truncate),
            "reject" | "strict" => Some(NamePolicy::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamePolicy::Truncate => "truncate",
            NamePolicy::Reject => "reject",
        }
    }
}

/// Запись в том виде, в каком её вернёт decode() после encode(): имена
/// обрезаны по политике, хвостовые NUL сняты. Индексы строятся по этой форме.
pub fn normalize(record: &Record, policy: NamePolicy) -> Result<Record> {
    gender_unit(record.gender)?;
    let first = fit_name(&record.first_name, NameField::FirstName, policy)?;
    let last = fit_name(&record.last_name, NameField::LastName, policy)?;
    Ok(Record {
        first_name: first.trim_end_matches('\0').to_string(),
        last_name: last.trim_end_matches('\0').to_string(),
        ..record.clone()
    })
}

/// Закодировать запись в слот (state = Live).
pub fn encode(record: &Record, policy: NamePolicy) -> Result<SlotBuf> {
    let mut buf = [0u8; SLOT_SIZE];
    encode_into(record, policy, &mut buf)?;
    Ok(buf)
}

/// То же, что encode(), но в готовый буфер. Буфер целиком перезаписывается.
pub fn encode_into(record: &Record, policy: NamePolicy, buf: &mut SlotBuf) -> Result<()> {
    let gender = gender_unit(record.gender)?;

    buf.fill(0);
    LittleEndian::write_i16(&mut buf[OFF_STATE..OFF_STATE + 2], STATE_LIVE);
    LittleEndian::write_i32(&mut buf[OFF_ID..OFF_ID + 4], record.id);
    write_name(
        &mut buf[OFF_FIRST_NAME..OFF_FIRST_NAME + NAME_WIDTH],
        &record.first_name,
        NameField::FirstName,
        policy,
    )?;
    write_name(
        &mut buf[OFF_LAST_NAME..OFF_LAST_NAME + NAME_WIDTH],
        &record.last_name,
        NameField::LastName,
        policy,
    )?;

    let dob = record.date_of_birth;
    LittleEndian::write_i32(&mut buf[OFF_YEAR..OFF_YEAR + 4], dob.year());
    LittleEndian::write_i32(&mut buf[OFF_MONTH..OFF_MONTH + 4], dob.month() as i32);
    LittleEndian::write_i32(&mut buf[OFF_DAY..OFF_DAY + 4], dob.day() as i32);

    LittleEndian::write_i16(&mut buf[OFF_RATING..OFF_RATING + 2], record.personal_rating);
    record
        .salary
        .encode_into(&mut buf[OFF_SALARY..OFF_SALARY + SALARY_LEN]);
    LittleEndian::write_u16(&mut buf[OFF_GENDER..OFF_GENDER + 2], gender);
    Ok(())
}

/// Декодировать слот. Слот-индекс в ошибке CorruptSlot = 0 - вызывающий
/// уточняет его через StoreError::at_slot.
pub fn decode(buf: &SlotBuf) -> Result<(Record, SlotState)> {
    let state = read_state(buf)?;
    let id = LittleEndian::read_i32(&buf[OFF_ID..OFF_ID + 4]);

    let first_name = read_name(&buf[OFF_FIRST_NAME..OFF_FIRST_NAME + NAME_WIDTH], "first_name")?;
    let last_name = read_name(&buf[OFF_LAST_NAME..OFF_LAST_NAME + NAME_WIDTH], "last_name")?;

    let year = LittleEndian::read_i32(&buf[OFF_YEAR..OFF_YEAR + 4]);
    let month = LittleEndian::read_i32(&buf[OFF_MONTH..OFF_MONTH + 4]);
    let day = LittleEndian::read_i32(&buf[OFF_DAY..OFF_DAY + 4]);
    let date_of_birth = ymd(year, month, day)
        .ok_or_else(|| corrupt(format!("invalid date {}-{}-{}", year, month, day)))?;

    let personal_rating = LittleEndian::read_i16(&buf[OFF_RATING..OFF_RATING + 2]);
    let salary: Salary =
        Salary::decode_from(&buf[OFF_SALARY..OFF_SALARY + SALARY_LEN]).map_err(corrupt)?;

    let unit = LittleEndian::read_u16(&buf[OFF_GENDER..OFF_GENDER + 2]);
    let gender = char::from_u32(unit as u32)
        .ok_or_else(|| corrupt(format!("gender unit 0x{:04x} is a lone surrogate", unit)))?;

    Ok((
        Record {
            id,
            first_name,
            last_name,
            date_of_birth,
            personal_rating,
            salary,
            gender,
        },
        state,
    ))
}

/// Прочитать только флаг состояния (для компактации и подсчётов).
pub fn read_state(buf: &[u8]) -> Result<SlotState> {
    let raw = LittleEndian::read_i16(&buf[OFF_STATE..OFF_STATE + 2]);
    SlotState::from_raw(raw).ok_or_else(|| corrupt(format!("unknown state flag {}", raw)))
}

/// Прочитать только id (без полного декодирования).
#[inline]
pub fn read_id(buf: &[u8]) -> i32 {
    LittleEndian::read_i32(&buf[OFF_ID..OFF_ID + 4])
}

/// Закодировать флаг состояния (2 байта).
#[inline]
pub fn encode_state(state: SlotState) -> [u8; 2] {
    let mut out = [0u8; 2];
    LittleEndian::write_i16(&mut out, state.to_raw());
    out
}

// ---------- helpers ----------

fn write_name(dst: &mut [u8], name: &str, field: NameField, policy: NamePolicy) -> Result<()> {
    let fitted = fit_name(name, field, policy)?;
    dst[..fitted.len()].copy_from_slice(fitted.as_bytes());
    Ok(())
}

/// Имя в том виде, в каком оно ляжет в слот: ASCII, не длиннее NAME_WIDTH.
fn fit_name(name: &str, field: NameField, policy: NamePolicy) -> Result<&str> {
    if !name.is_ascii() {
        return Err(StoreError::NonAscii { field });
    }
    if name.len() <= NAME_WIDTH {
        return Ok(name);
    }
    match policy {
        NamePolicy::Truncate => {
            log::warn!(
                "{} truncated from {} to {} bytes",
                field,
                name.len(),
                NAME_WIDTH
            );
            // ASCII: любая граница байта - граница символа
            Ok(&name[..NAME_WIDTH])
        }
        NamePolicy::Reject => Err(StoreError::FieldTooLong {
            field,
            len: name.len(),
            max: NAME_WIDTH,
        }),
    }
}

fn read_name(src: &[u8], what: &str) -> Result<String> {
    let end = src.iter().rposition(|&b| b != 0).map(|p| p + 1).unwrap_or(0);
    let raw = &src[..end];
    if !raw.is_ascii() {
        return Err(corrupt(format!("{} holds non-ASCII bytes", what)));
    }
    // ASCII гарантирует валидный UTF-8
    Ok(raw.iter().map(|&b| b as char).collect())
}

fn gender_unit(c: char) -> Result<u16> {
    let mut units = [0u16; 2];
    match c.encode_utf16(&mut units) {
        [u] => Ok(*u),
        _ => Err(StoreError::InvalidGender(c)),
    }
}

fn ymd(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn corrupt(reason: String) -> StoreError {
    StoreError::CorruptSlot { slot: 0, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(first: &str) -> Record {
        Record {
            id: 17,
            first_name: first.to_string(),
            last_name: "Hopper".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1976, 2, 29).unwrap(),
            personal_rating: -3,
            salary: "4200.75".parse().unwrap(),
            gender: 'F',
        }
    }

    #[test]
    fn roundtrip_is_live() {
        let r = rec("Grace");
        let buf = encode(&r, NamePolicy::Reject).unwrap();
        let (back, state) = decode(&buf).unwrap();
        assert_eq!(back, r);
        assert_eq!(state, SlotState::Live);
    }

    #[test]
    fn layout_offsets() {
        let r = rec("Grace");
        let buf = encode(&r, NamePolicy::Reject).unwrap();
        assert_eq!(SLOT_SIZE, 278);
        assert_eq!(&buf[0..2], &[0, 0]);
        assert_eq!(LittleEndian::read_i32(&buf[2..6]), 17);
        assert_eq!(&buf[6..11], b"Grace");
        assert!(buf[11..126].iter().all(|&b| b == 0));
        assert_eq!(&buf[126..132], b"Hopper");
        assert_eq!(LittleEndian::read_i32(&buf[246..250]), 1976);
        assert_eq!(LittleEndian::read_i32(&buf[250..254]), 2);
        assert_eq!(LittleEndian::read_i32(&buf[254..258]), 29);
        assert_eq!(LittleEndian::read_i16(&buf[258..260]), -3);
        assert_eq!(LittleEndian::read_u32(&buf[260..264]), 420075);
        assert_eq!(LittleEndian::read_u16(&buf[276..278]), 'F' as u16);
    }

    #[test]
    fn long_name_truncated_under_truncate_policy() {
        let long = "A".repeat(NAME_WIDTH + 15);
        let buf = encode(&rec(&long), NamePolicy::Truncate).unwrap();
        let (back, _) = decode(&buf).unwrap();
        assert_eq!(back.first_name.len(), NAME_WIDTH);
        assert_eq!(back.first_name, "A".repeat(NAME_WIDTH));
    }

    #[test]
    fn long_name_rejected_under_reject_policy() {
        let long = "B".repeat(NAME_WIDTH + 1);
        let err = encode(&rec(&long), NamePolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            StoreError::FieldTooLong {
                field: NameField::FirstName,
                len: 121,
                max: NAME_WIDTH
            }
        ));
    }

    #[test]
    fn normalize_matches_stored_form() {
        let mut r = rec(&"D".repeat(NAME_WIDTH + 30));
        r.last_name = "Hopper\0\0".into();
        let norm = normalize(&r, NamePolicy::Truncate).unwrap();
        let (back, _) = decode(&encode(&r, NamePolicy::Truncate).unwrap()).unwrap();
        assert_eq!(norm, back);
        assert_eq!(norm.first_name.len(), NAME_WIDTH);
        assert_eq!(norm.last_name, "Hopper");

        assert!(matches!(
            normalize(&r, NamePolicy::Reject),
            Err(StoreError::FieldTooLong { .. })
        ));
    }

    #[test]
    fn exact_width_name_fits() {
        let full = "C".repeat(NAME_WIDTH);
        let buf = encode(&rec(&full), NamePolicy::Reject).unwrap();
        assert_eq!(decode(&buf).unwrap().0.first_name, full);
    }

    #[test]
    fn non_ascii_rejected() {
        let err = encode(&rec("Jürgen"), NamePolicy::Truncate).unwrap_err();
        assert!(matches!(err, StoreError::NonAscii { .. }));
    }

    #[test]
    fn astral_gender_rejected() {
        let mut r = rec("Grace");
        r.gender = '\u{1F600}';
        assert!(matches!(
            encode(&r, NamePolicy::Reject),
            Err(StoreError::InvalidGender(_))
        ));
    }

    #[test]
    fn state_and_id_peek() {
        let mut buf = encode(&rec("Grace"), NamePolicy::Reject).unwrap();
        assert_eq!(read_id(&buf), 17);
        buf[..2].copy_from_slice(&encode_state(SlotState::Tombstoned));
        assert_eq!(read_state(&buf).unwrap(), SlotState::Tombstoned);
        let (_, st) = decode(&buf).unwrap();
        assert_eq!(st, SlotState::Tombstoned);
    }

    #[test]
    fn corrupted_date_detected() {
        let mut buf = encode(&rec("Grace"), NamePolicy::Reject).unwrap();
        LittleEndian::write_i32(&mut buf[OFF_MONTH..OFF_MONTH + 4], 13);
        assert!(matches!(decode(&buf), Err(StoreError::CorruptSlot { .. })));

        let mut buf = encode(&rec("Grace"), NamePolicy::Reject).unwrap();
        LittleEndian::write_i16(&mut buf[0..2], 7);
        assert!(matches!(read_state(&buf), Err(StoreError::CorruptSlot { .. })));
    }
}

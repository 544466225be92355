//! Общие константы формата файла картотеки (slot layout).
//!
//! Слот фиксированного размера, little-endian:
//! [state i16][id i32][first_name 120][last_name 120][year i32][month i32][day i32]
//! [rating i16][salary 16][gender u16]

// -------- Ширины полей --------
pub const STATE_LEN: usize = 2;
pub const ID_LEN: usize = 4;
/// Максимальная ширина имени в байтах (W).
pub const NAME_WIDTH: usize = 120;
pub const DATE_PART_LEN: usize = 4;
pub const RATING_LEN: usize = 2;
pub const SALARY_LEN: usize = 16;
pub const GENDER_LEN: usize = 2;

// -------- Смещения внутри слота --------
pub const OFF_STATE: usize = 0;
pub const OFF_ID: usize = OFF_STATE + STATE_LEN;
pub const OFF_FIRST_NAME: usize = OFF_ID + ID_LEN;
pub const OFF_LAST_NAME: usize = OFF_FIRST_NAME + NAME_WIDTH;
pub const OFF_YEAR: usize = OFF_LAST_NAME + NAME_WIDTH;
pub const OFF_MONTH: usize = OFF_YEAR + DATE_PART_LEN;
pub const OFF_DAY: usize = OFF_MONTH + DATE_PART_LEN;
pub const OFF_RATING: usize = OFF_DAY + DATE_PART_LEN;
pub const OFF_SALARY: usize = OFF_RATING + RATING_LEN;
pub const OFF_GENDER: usize = OFF_SALARY + SALARY_LEN;

/// Размер слота (SlotSize) = 278 байт.
pub const SLOT_SIZE: usize = OFF_GENDER + GENDER_LEN;

// -------- Значения флага состояния --------
pub const STATE_LIVE: i16 = 0;
pub const STATE_TOMBSTONED: i16 = 1;

// -------- Salary (128-bit decimal) --------
/// Максимальный масштаб (число знаков после запятой).
pub const SALARY_MAX_SCALE: u8 = 28;
/// Мантисса занимает 96 бит.
pub const SALARY_MANTISSA_BITS: u32 = 96;
pub const SALARY_SIGN_MASK: u32 = 0x8000_0000;
pub const SALARY_SCALE_SHIFT: u32 = 16;
pub const SALARY_SCALE_MASK: u32 = 0x00FF_0000;

const _: () = assert!(SLOT_SIZE == 278);

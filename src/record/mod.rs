//! record - доменная сущность картотеки (Record) и её части.

pub mod salary;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use salary::Salary;

use crate::consts::{STATE_LIVE, STATE_TOMBSTONED};

/// Запись о человеке.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub personal_rating: i16,
    pub salary: Salary,
    pub gender: char,
}

/// Поля записи без идентификатора (create назначает id сам).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub personal_rating: i16,
    pub salary: Salary,
    pub gender: char,
}

impl RecordData {
    pub fn with_id(self, id: i32) -> Record {
        Record {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            personal_rating: self.personal_rating,
            salary: self.salary,
            gender: self.gender,
        }
    }
}

impl Record {
    pub fn data(&self) -> RecordData {
        RecordData {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            personal_rating: self.personal_rating,
            salary: self.salary,
            gender: self.gender,
        }
    }
}

/// Состояние слота: живой или помеченный tombstone.
/// Физически "отсутствующим" слот становится только после purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Live,
    Tombstoned,
}

impl SlotState {
    #[inline]
    pub fn to_raw(self) -> i16 {
        match self {
            SlotState::Live => STATE_LIVE,
            SlotState::Tombstoned => STATE_TOMBSTONED,
        }
    }

    #[inline]
    pub fn from_raw(v: i16) -> Option<Self> {
        match v {
            STATE_LIVE => Some(SlotState::Live),
            STATE_TOMBSTONED => Some(SlotState::Tombstoned),
            _ => None,
        }
    }

    #[inline]
    pub fn is_live(self) -> bool {
        self == SlotState::Live
    }
}

/// Поля, по которым строятся вторичные индексы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    FirstName,
    LastName,
    DateOfBirth,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [
        SearchField::FirstName,
        SearchField::LastName,
        SearchField::DateOfBirth,
    ];
}

/// Значение для поиска по полю.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldQuery {
    FirstName(String),
    LastName(String),
    DateOfBirth(NaiveDate),
}

impl FieldQuery {
    pub fn field(&self) -> SearchField {
        match self {
            FieldQuery::FirstName(_) => SearchField::FirstName,
            FieldQuery::LastName(_) => SearchField::LastName,
            FieldQuery::DateOfBirth(_) => SearchField::DateOfBirth,
        }
    }

    pub fn matches(&self, r: &Record) -> bool {
        match self {
            FieldQuery::FirstName(v) => r.first_name.eq_ignore_ascii_case(v),
            FieldQuery::LastName(v) => r.last_name.eq_ignore_ascii_case(v),
            FieldQuery::DateOfBirth(d) => r.date_of_birth == *d,
        }
    }
}

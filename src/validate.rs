//! validate - предикат корректности записи перед insert/edit.
//!
//! Cabinet вызывает validate() до любого изменения файла; false => ValidationFailed.

use chrono::{Local, NaiveDate};

use crate::record::Record;

pub trait Validator {
    fn validate(&self, record: &Record) -> bool;
}

impl<T: Fn(&Record) -> bool> Validator for T {
    fn validate(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Пропускает всё.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _record: &Record) -> bool {
        true
    }
}

/// Стандартный набор правил.
#[derive(Debug, Clone)]
pub struct DefaultValidator {
    pub name_len: std::ops::RangeInclusive<usize>,
    pub min_birth: NaiveDate,
    /// None => сегодняшняя дата на момент проверки.
    pub max_birth: Option<NaiveDate>,
    pub rating: std::ops::RangeInclusive<i16>,
    pub max_salary_units: i128,
    pub genders: Vec<char>,
}

impl Default for DefaultValidator {
    fn default() -> Self {
        Self {
            name_len: 2..=60,
            min_birth: NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or_default(),
            max_birth: None,
            rating: 0..=10,
            max_salary_units: 1_000_000,
            genders: vec!['M', 'F'],
        }
    }
}

impl DefaultValidator {
    fn name_ok(&self, name: &str) -> bool {
        self.name_len.contains(&name.len())
            && name
                .bytes()
                .all(|b| b.is_ascii_alphabetic() || b == b'-' || b == b' ' || b == b'\'')
    }
}

impl Validator for DefaultValidator {
    fn validate(&self, r: &Record) -> bool {
        if r.id <= 0 {
            return false;
        }
        if !self.name_ok(&r.first_name) || !self.name_ok(&r.last_name) {
            return false;
        }
        let max_birth = self.max_birth.unwrap_or_else(|| Local::now().date_naive());
        if r.date_of_birth < self.min_birth || r.date_of_birth > max_birth {
            return false;
        }
        if !self.rating.contains(&r.personal_rating) {
            return false;
        }
        let units = r.salary.trunc();
        if r.salary.is_negative()
            || units > self.max_salary_units
            || (units == self.max_salary_units && r.salary.has_fraction())
        {
            return false;
        }
        self.genders.contains(&r.gender.to_ascii_uppercase())
    }
}

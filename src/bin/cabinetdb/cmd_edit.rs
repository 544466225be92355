use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use cabinetdb::Salary;

use super::cli::Rules;
use super::util::open_rw;

/// Поля, заданные в командной строке; None - оставить как есть.
pub struct Patch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub rating: Option<i16>,
    pub salary: Option<Salary>,
    pub gender: Option<char>,
}

pub fn exec(path: PathBuf, rules: Rules, id: i32, patch: Patch) -> Result<()> {
    let mut cab = open_rw(&path, rules)?;
    let mut r = cab.get(id).with_context(|| format!("edit #{}", id))?;

    if let Some(v) = patch.first_name {
        r.first_name = v;
    }
    if let Some(v) = patch.last_name {
        r.last_name = v;
    }
    if let Some(v) = patch.dob {
        r.date_of_birth = v;
    }
    if let Some(v) = patch.rating {
        r.personal_rating = v;
    }
    if let Some(v) = patch.salary {
        r.salary = v;
    }
    if let Some(v) = patch.gender {
        r.gender = v;
    }

    cab.edit(r).with_context(|| format!("edit #{}", id))?;
    cab.sync()?;
    println!("UPDATED #{}", id);
    Ok(())
}

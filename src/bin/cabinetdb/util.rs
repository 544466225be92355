use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

use cabinetdb::{
    AcceptAll, Cabinet, CabinetConfig, DefaultValidator, FieldQuery, Record, RecordData,
    Validator,
};

use super::cli::{QueryArgs, RecordArgs, Rules};

/// Набор правил, выбранный флагом --rules.
pub enum CliValidator {
    Default(DefaultValidator),
    Off(AcceptAll),
}

impl CliValidator {
    pub fn from_rules(rules: Rules) -> Self {
        match rules {
            Rules::Default => CliValidator::Default(DefaultValidator::default()),
            Rules::Off => CliValidator::Off(AcceptAll),
        }
    }
}

impl Validator for CliValidator {
    fn validate(&self, r: &Record) -> bool {
        match self {
            CliValidator::Default(v) => v.validate(r),
            CliValidator::Off(v) => v.validate(r),
        }
    }
}

pub type CliCabinet = Cabinet<File, CliValidator>;

/// Открыть на запись (exclusive lock, файл создаётся при отсутствии).
pub fn open_rw(path: &Path, rules: Rules) -> Result<CliCabinet> {
    Cabinet::open_path(path, CliValidator::from_rules(rules), CabinetConfig::from_env())
        .with_context(|| format!("open {}", path.display()))
}

/// Открыть только на чтение (shared lock).
pub fn open_ro(path: &Path) -> Result<CliCabinet> {
    Cabinet::open_path_shared(
        path,
        CliValidator::Off(AcceptAll),
        CabinetConfig::from_env(),
    )
    .with_context(|| format!("open {} (read-only)", path.display()))
}

pub fn data_from_args(rec: RecordArgs) -> RecordData {
    RecordData {
        first_name: rec.first_name,
        last_name: rec.last_name,
        date_of_birth: rec.dob,
        personal_rating: rec.rating,
        salary: rec.salary,
        gender: rec.gender,
    }
}

pub fn query_from_args(q: QueryArgs) -> Result<FieldQuery> {
    if let Some(v) = q.first_name {
        return Ok(FieldQuery::FirstName(v));
    }
    if let Some(v) = q.last_name {
        return Ok(FieldQuery::LastName(v));
    }
    if let Some(d) = q.dob {
        return Ok(FieldQuery::DateOfBirth(d));
    }
    anyhow::bail!("one of --first-name, --last-name, --dob is required")
}

pub fn print_header() {
    println!(
        "{:>6}  {:<20} {:<20} {:<10} {:>6} {:>14} {}",
        "id", "first_name", "last_name", "born", "rating", "salary", "g"
    );
}

pub fn print_row(r: &Record) {
    println!(
        "{:>6}  {:<20} {:<20} {:<10} {:>6} {:>14} {}",
        r.id,
        r.first_name,
        r.last_name,
        r.date_of_birth.format("%Y-%m-%d"),
        r.personal_rating,
        r.salary.to_string(),
        r.gender
    );
}

/// Печать набора записей: таблица либо JSON-массив.
pub fn print_records(records: &[Record], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    print_header();
    for r in records {
        print_row(r);
    }
    println!("({} record(s))", records.len());
    Ok(())
}

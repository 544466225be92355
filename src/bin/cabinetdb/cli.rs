use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cabinetdb::Salary;

/// CLI картотеки записей
#[derive(Parser, Debug)]
#[command(name = "cabinetdb", version, about = "File-backed person record cabinet")]
pub struct Cli {
    /// Validation rules applied before create/insert/edit/import
    #[arg(long, value_enum, global = true, default_value_t = Rules::Default)]
    pub rules: Rules,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rules {
    /// Names 2..60 letters, born 1950..today, rating 0..10, salary 0..1e6, gender M/F
    Default,
    /// Accept any record the binary format can hold
    Off,
}

/// Поля записи для create/insert.
#[derive(Args, Debug)]
pub struct RecordArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: NaiveDate,
    #[arg(long, default_value_t = 0)]
    pub rating: i16,
    /// Fixed-point decimal, e.g. 1250.50
    #[arg(long)]
    pub salary: Salary,
    #[arg(long)]
    pub gender: char,
}

/// Поиск по одному из индексированных полей.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct QueryArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Create a record with a generated id
    Create {
        #[arg(long)]
        path: PathBuf,
        #[command(flatten)]
        rec: RecordArgs,
    },
    /// Insert a record with an explicit id
    Insert {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: i32,
        #[command(flatten)]
        rec: RecordArgs,
    },
    /// Print one record by id
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: i32,
        #[arg(long)]
        json: bool,
    },
    /// Find records by first name, last name or date of birth
    Find {
        #[arg(long)]
        path: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long)]
        json: bool,
    },
    /// List all live records in file order
    List {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Edit a record in place; omitted fields keep their values
    Edit {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: i32,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(long)]
        rating: Option<i16>,
        #[arg(long)]
        salary: Option<Salary>,
        #[arg(long)]
        gender: Option<char>,
    },
    /// Soft-delete a record (tombstone)
    Remove {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: i32,
    },
    /// Soft-delete every record matching a field value
    DeleteWhere {
        #[arg(long)]
        path: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Drop tombstoned slots and shrink the file
    Purge {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Slot/record counters
    Stat {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Export live records as a JSON array
    Export {
        #[arg(long)]
        path: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge records from a JSON array (overwrite by id, append otherwise)
    Import {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        from: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

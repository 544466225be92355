use anyhow::Result;
use std::path::PathBuf;

use super::cli::QueryArgs;
use super::util::{open_ro, print_records, query_from_args};

pub fn exec(path: PathBuf, query: QueryArgs, json: bool) -> Result<()> {
    let query = query_from_args(query)?;
    let mut cab = open_ro(&path)?;
    let found = cab.find(&query).collect_all()?;
    print_records(&found, json)
}

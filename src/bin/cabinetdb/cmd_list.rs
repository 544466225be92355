use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_ro, print_records};

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let mut cab = open_ro(&path)?;
    let all = cab.all().collect_all()?;
    print_records(&all, json)
}

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::cli::{RecordArgs, Rules};
use super::util::{data_from_args, open_rw};

pub fn exec(path: PathBuf, rules: Rules, rec: RecordArgs) -> Result<()> {
    let mut cab = open_rw(&path, rules)?;
    let id = cab.create(data_from_args(rec)).context("create")?;
    cab.sync()?;
    println!("CREATED #{}", id);
    Ok(())
}

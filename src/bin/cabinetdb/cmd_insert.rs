use anyhow::{Context, Result};
use std::path::PathBuf;

use super::cli::{RecordArgs, Rules};
use super::util::{data_from_args, open_rw};

pub fn exec(path: PathBuf, rules: Rules, id: i32, rec: RecordArgs) -> Result<()> {
    let mut cab = open_rw(&path, rules)?;
    cab.insert(data_from_args(rec).with_id(id))
        .with_context(|| format!("insert #{}", id))?;
    cab.sync()?;
    println!("INSERTED #{}", id);
    Ok(())
}

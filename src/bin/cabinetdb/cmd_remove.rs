use anyhow::{Context, Result};
use std::path::PathBuf;

use super::cli::Rules;
use super::util::open_rw;

pub fn exec(path: PathBuf, id: i32) -> Result<()> {
    // удаление не валидирует запись
    let mut cab = open_rw(&path, Rules::Off)?;
    cab.remove(id).with_context(|| format!("remove #{}", id))?;
    cab.sync()?;
    println!("REMOVED #{}", id);
    Ok(())
}

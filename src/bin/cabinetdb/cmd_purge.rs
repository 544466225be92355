use anyhow::Result;
use std::path::PathBuf;

use super::cli::Rules;
use super::util::open_rw;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let mut cab = open_rw(&path, Rules::Off)?;
    let rep = cab.purge()?;

    if json {
        println!("{}", serde_json::to_string(&rep)?);
        return Ok(());
    }
    println!("Purge:");
    println!("  slots before = {}", rep.slots_before);
    println!("  slots after  = {}", rep.slots_after);
    println!("  reclaimed    = {}", rep.reclaimed);
    println!("  moved        = {}", rep.moved);
    Ok(())
}

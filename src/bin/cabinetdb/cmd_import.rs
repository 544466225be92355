use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use cabinetdb::Record;

use super::cli::Rules;
use super::util::open_rw;

pub fn exec(path: PathBuf, rules: Rules, from: PathBuf, json: bool) -> Result<()> {
    let f = File::open(&from).with_context(|| format!("open {}", from.display()))?;
    let records: Vec<Record> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {}", from.display()))?;

    let mut cab = open_rw(&path, rules)?;
    let rep = cab.restore(records)?;
    cab.sync()?;

    if json {
        println!("{}", serde_json::to_string(&rep)?);
        return Ok(());
    }
    println!(
        "IMPORTED {} (appended {}, overwritten {})",
        rep.imported(),
        rep.appended,
        rep.overwritten
    );
    for (id, why) in &rep.rejected {
        println!("  rejected #{}: {}", id, why);
    }
    Ok(())
}

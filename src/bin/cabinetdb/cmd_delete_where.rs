use anyhow::Result;
use std::path::PathBuf;

use super::cli::{QueryArgs, Rules};
use super::util::{open_rw, query_from_args};

pub fn exec(path: PathBuf, query: QueryArgs) -> Result<()> {
    let query = query_from_args(query)?;
    let mut cab = open_rw(&path, Rules::Off)?;
    let ids = cab.delete_where(&query)?;
    cab.sync()?;
    if ids.is_empty() {
        println!("NOTHING TO DELETE");
    } else {
        let list: Vec<String> = ids.iter().map(|id| format!("#{}", id)).collect();
        println!("REMOVED {}: {}", ids.len(), list.join(", "));
    }
    Ok(())
}

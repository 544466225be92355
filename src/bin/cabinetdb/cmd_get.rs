use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_ro, print_header, print_row};

pub fn exec(path: PathBuf, id: i32, json: bool) -> Result<()> {
    let mut cab = open_ro(&path)?;
    match cab.get(id) {
        Ok(r) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&r)?);
            } else {
                print_header();
                print_row(&r);
            }
        }
        Err(e) if e.is_not_found() => println!("NOT FOUND #{}", id),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

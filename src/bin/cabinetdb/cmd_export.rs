use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::util::open_ro;

pub fn exec(path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let mut cab = open_ro(&path)?;
    let records = cab.snapshot()?;

    match out {
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let f = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&out_path)
                .with_context(|| format!("open {}", out_path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &records)?;
            w.write_all(b"\n")?;
            w.flush()?;
            println!(
                "EXPORTED {} record(s) -> {}",
                records.len(),
                out_path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use cabinetdb::consts::SLOT_SIZE;
use cabinetdb::metrics;

use super::util::open_ro;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let cab = open_ro(&path)?;
    let st = cab.stat();
    let idx = cab.index();

    if json {
        let ms = metrics::snapshot();
        let obj = json!({
            "path": path.display().to_string(),
            "slot_size": SLOT_SIZE,
            "stat": st,
            "config": {
                "name_policy": cab.config().name_policy.as_str(),
                "data_fsync": cab.config().data_fsync,
                "rebuild_after_mutation": cab.config().rebuild_after_mutation,
            },
            "index": {
                "ids": idx.len(),
                "first_name_buckets": idx.bucket_count(cabinetdb::SearchField::FirstName),
                "last_name_buckets": idx.bucket_count(cabinetdb::SearchField::LastName),
                "dob_buckets": idx.bucket_count(cabinetdb::SearchField::DateOfBirth),
            },
            "metrics": ms,
        });
        println!("{}", serde_json::to_string(&obj)?);
        return Ok(());
    }

    println!("Cabinet at {}", path.display());
    println!("  slot_size   = {} B", SLOT_SIZE);
    println!("  slots       = {}", st.slots);
    println!("  live        = {}", st.live);
    println!("  tombstoned  = {}", st.tombstoned);
    println!("  file_len    = {} B", st.file_len);
    println!("  config      = {}", cab.config());
    Ok(())
}

use anyhow::Result;
use chrono::NaiveDate;
use oorandom::Rand64;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cabinetdb::consts::SLOT_SIZE;
use cabinetdb::{
    Cabinet, CabinetBuilder, DefaultValidator, FieldQuery, NamePolicy, Record, RecordData, Salary,
    SlotFile, Validator,
};

fn unique_path(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("cabinet-churn-{}-{}-{}.dat", prefix, pid, t))
}

const FIRST: [&str; 5] = ["Anna", "Boris", "Clara", "Dmitri", "Elena"];
const LAST: [&str; 4] = ["Ivanova", "Petrov", "Smirnov", "Kuznetsova"];

fn random_data(rng: &mut Rand64) -> RecordData {
    let y = 1950 + rng.rand_range(0..60) as i32;
    let m = 1 + rng.rand_range(0..12) as u32;
    let d = 1 + rng.rand_range(0..28) as u32;
    RecordData {
        first_name: FIRST[rng.rand_range(0..FIRST.len() as u64) as usize].into(),
        last_name: LAST[rng.rand_range(0..LAST.len() as u64) as usize].into(),
        date_of_birth: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        personal_rating: rng.rand_range(0..11) as i16,
        salary: Salary::new(rng.rand_range(0..100_000_000) as i128, 2).unwrap(),
        gender: if rng.rand_u64() % 2 == 0 { 'M' } else { 'F' },
    }
}

/// Сравнить картотеку с моделью: состав, порядок слотов, индексы, длина файла.
fn check_against_model(
    cab: &mut Cabinet<fs::File, DefaultValidator>,
    path: &PathBuf,
    model: &HashMap<i32, Record>,
    order: &[i32],
) -> Result<()> {
    assert_eq!(cab.live_count(), model.len());
    assert_eq!(
        cab.record_count() * SLOT_SIZE as u64,
        fs::metadata(path)?.len()
    );

    let all = cab.all().collect_all()?;
    let ids: Vec<i32> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, order, "live records must keep slot order");
    for r in &all {
        assert_eq!(Some(r), model.get(&r.id));
    }

    for name in FIRST {
        let mut got: Vec<i32> = cab
            .find(&FieldQuery::FirstName(name.to_string()))
            .collect_all()?
            .iter()
            .map(|r| r.id)
            .collect();
        got.sort();
        let mut want: Vec<i32> = model
            .values()
            .filter(|r| r.first_name == name)
            .map(|r| r.id)
            .collect();
        want.sort();
        assert_eq!(got, want, "first_name bucket {}", name);
    }
    Ok(())
}

#[test]
fn random_churn_matches_model() -> Result<()> {
    let path = unique_path("model");
    let cfg = CabinetBuilder::from_default().build();
    let mut cab = Cabinet::open_path(&path, DefaultValidator::default(), cfg.clone())?;

    let mut rng = Rand64::new(0x5EED_CAB1_0000_0001);
    let mut model: HashMap<i32, Record> = HashMap::new();
    // живые id в порядке слотов
    let mut order: Vec<i32> = Vec::new();

    for step in 0..600u32 {
        let roll = rng.rand_range(0..100);
        if roll < 45 || order.is_empty() {
            let data = random_data(&mut rng);
            let id = cab.create(data.clone())?;
            assert!(!model.contains_key(&id));
            model.insert(id, data.with_id(id));
            order.push(id);
        } else if roll < 70 {
            let id = order[rng.rand_range(0..order.len() as u64) as usize];
            let rec = random_data(&mut rng).with_id(id);
            cab.edit(rec.clone())?;
            model.insert(id, rec);
        } else if roll < 95 {
            let pos = rng.rand_range(0..order.len() as u64) as usize;
            let id = order.remove(pos);
            cab.remove(id)?;
            model.remove(&id);
        } else {
            let before = cab.record_count();
            let rep = cab.purge()?;
            assert_eq!(rep.slots_after as usize, model.len());
            assert_eq!(rep.reclaimed, before - rep.slots_after);
            for (slot, id) in order.iter().enumerate() {
                assert_eq!(cab.index().position_of(*id), Some(slot as u64));
            }
        }

        if step % 50 == 0 {
            check_against_model(&mut cab, &path, &model, &order)?;
        }
    }

    check_against_model(&mut cab, &path, &model, &order)?;

    // После переоткрытия индексы строятся заново и совпадают с моделью
    drop(cab);
    let mut cab = Cabinet::open_path(&path, DefaultValidator::default(), cfg)?;
    check_against_model(&mut cab, &path, &model, &order)?;

    cab.purge()?;
    check_against_model(&mut cab, &path, &model, &order)?;
    assert_eq!(cab.record_count() as usize, model.len());

    drop(cab);
    let _ = fs::remove_file(&path);
    Ok(())
}

/// Результаты find по всем значениям из пула имён.
fn lookups<F: SlotFile, V: Validator>(
    cab: &mut Cabinet<F, V>,
    names: &[String],
) -> Result<Vec<Vec<i32>>> {
    let mut out = Vec::new();
    for name in names {
        for q in [
            FieldQuery::FirstName(name.clone()),
            FieldQuery::LastName(name.clone()),
        ] {
            let mut ids: Vec<i32> = cab.find(&q).collect_all()?.iter().map(|r| r.id).collect();
            ids.sort();
            out.push(ids);
        }
    }
    Ok(out)
}

#[test]
fn truncated_names_keep_incremental_index_in_sync() -> Result<()> {
    let cfg = CabinetBuilder::from_default()
        .name_policy(NamePolicy::Truncate)
        .build();
    let mut cab = Cabinet::in_memory(|_: &Record| true, cfg)?;
    let mut rng = Rand64::new(0x7A11_0000_CAFE_0042);

    // длинные и короткие имена; у длинных общий 120-байтный префикс
    let mut pool: Vec<String> = Vec::new();
    for (i, base) in ["Q", "R", "S"].iter().enumerate() {
        pool.push(base.repeat(120));
        pool.push(format!("{}{}", base.repeat(120), "x".repeat(i + 1)));
        pool.push(base.repeat(10));
    }
    let pick = |rng: &mut Rand64| pool[rng.rand_range(0..pool.len() as u64) as usize].clone();

    let mut live: Vec<i32> = Vec::new();
    for _ in 0..300 {
        let roll = rng.rand_range(0..100);
        if roll < 50 || live.is_empty() {
            let mut data = random_data(&mut rng);
            data.first_name = pick(&mut rng);
            data.last_name = pick(&mut rng);
            live.push(cab.create(data)?);
        } else if roll < 85 {
            let id = live[rng.rand_range(0..live.len() as u64) as usize];
            let mut r = cab.get(id)?;
            r.first_name = pick(&mut rng);
            r.last_name = pick(&mut rng);
            cab.edit(r)?;
        } else {
            let pos = rng.rand_range(0..live.len() as u64) as usize;
            cab.remove(live.remove(pos))?;
        }
    }

    let incremental = lookups(&mut cab, &pool)?;
    cab.rebuild_index()?;
    let rebuilt = lookups(&mut cab, &pool)?;
    assert_eq!(incremental, rebuilt, "incremental index must match a full scan");

    // длинные варианты никогда не попадают в индекс
    for name in pool.iter().filter(|n| n.len() > 120) {
        assert!(cab
            .find(&FieldQuery::FirstName(name.clone()))
            .collect_all()?
            .is_empty());
    }
    Ok(())
}

use anyhow::Result;
use chrono::NaiveDate;

use cabinetdb::{Cabinet, DefaultValidator, FieldQuery, Record, RecordData};

fn person(first: &str, last: &str, year: i32, salary: &str) -> RecordData {
    RecordData {
        first_name: first.into(),
        last_name: last.into(),
        date_of_birth: NaiveDate::from_ymd_opt(year, 2, 14).unwrap(),
        personal_rating: 7,
        salary: salary.parse().unwrap(),
        gender: 'F',
    }
}

#[test]
fn snapshot_lists_live_records_in_slot_order() -> Result<()> {
    let mut cab = Cabinet::in_memory(DefaultValidator::default(), Default::default())?;
    cab.create(person("Ada", "Moore", 1960, "100"))?;
    cab.create(person("Bea", "Moore", 1961, "200"))?;
    cab.create(person("Cid", "Moore", 1962, "300"))?;
    cab.remove(2)?;

    let snap = cab.snapshot()?;
    assert_eq!(snap.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
    Ok(())
}

#[test]
fn restore_overwrites_known_ids_and_appends_new() -> Result<()> {
    let mut cab = Cabinet::in_memory(DefaultValidator::default(), Default::default())?;
    cab.create(person("Dora", "Nye", 1970, "1000"))?;
    cab.create(person("Emil", "Nye", 1971, "2000"))?;

    let incoming: Vec<Record> = vec![
        person("Dora", "Orr", 1970, "1500.50").with_id(1),
        person("Gail", "Orr", 1972, "900").with_id(5),
    ];
    let rep = cab.restore(incoming)?;

    assert_eq!(rep.overwritten, 1);
    assert_eq!(rep.appended, 1);
    assert!(rep.rejected.is_empty());
    assert_eq!(rep.imported(), 2);

    // перезапись на месте, новая запись в конце
    assert_eq!(cab.record_count(), 3);
    assert_eq!(cab.index().position_of(1), Some(0));
    assert_eq!(cab.index().position_of(5), Some(2));

    let dora = cab.get(1)?;
    assert_eq!(dora.last_name, "Orr");
    assert_eq!(dora.salary.to_string(), "1500.50");

    // индексы перестроены
    assert!(cab.find(&FieldQuery::LastName("Nye".into())).collect_all()?.len() == 1);
    assert_eq!(cab.find(&FieldQuery::LastName("Orr".into())).collect_all()?.len(), 2);

    assert_eq!(cab.create(person("Hugo", "Orr", 1973, "1"))?, 6);
    Ok(())
}

#[test]
fn restore_skips_invalid_records() -> Result<()> {
    let mut cab = Cabinet::in_memory(DefaultValidator::default(), Default::default())?;
    cab.create(person("Ines", "Park", 1980, "10"))?;

    let mut bad = person("Jax", "Park", 1981, "10").with_id(2);
    bad.gender = 'X';
    let incoming = vec![
        bad,
        person("Kira", "Park", 1982, "10").with_id(3),
        // повтор id в наборе: второй экземпляр перезаписывает первый
        person("Kira", "Quinn", 1982, "20").with_id(3),
    ];
    let rep = cab.restore(incoming)?;

    assert_eq!(rep.rejected.len(), 1);
    assert_eq!(rep.rejected[0].0, 2);
    assert_eq!(rep.appended, 1);
    assert_eq!(rep.overwritten, 1);

    assert!(!cab.contains(2));
    assert_eq!(cab.get(3)?.last_name, "Quinn");
    assert_eq!(cab.record_count(), 2);
    Ok(())
}

#[test]
fn export_json_roundtrips_through_restore() -> Result<()> {
    let mut src = Cabinet::in_memory(DefaultValidator::default(), Default::default())?;
    src.create(person("Lola", "Reyes", 1985, "4200.75"))?;
    src.create(person("Milo", "Reyes", 1986, "0.5"))?;

    let json = serde_json::to_string(&src.snapshot()?)?;
    assert!(json.contains("\"salary\":\"4200.75\""));
    assert!(json.contains("\"date_of_birth\":\"1985-02-14\""));

    let parsed: Vec<Record> = serde_json::from_str(&json)?;
    let mut dst = Cabinet::in_memory(DefaultValidator::default(), Default::default())?;
    let rep = dst.restore(parsed)?;
    assert_eq!(rep.appended, 2);
    assert_eq!(dst.snapshot()?, src.snapshot()?);
    Ok(())
}

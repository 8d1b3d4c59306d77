use super::*;
use csv::StringRecord;
use registry_catalog::{car_owners, owners};

use crate::mapper::HeaderIndex;

fn owner_headers() -> StringRecord {
    StringRecord::from(vec!["name", "country", "state", "city"])
}

fn next(ids: &mut dyn IdGenerator, fields: Vec<&str>) -> Result<String, RecordErrorCause> {
    let schema = owners();
    let headers = owner_headers();
    let index = HeaderIndex::resolve(&headers, &schema).unwrap();
    let record = StringRecord::from(fields);
    ids.next_id(&SourceRecord::new(2, &record, &index), &schema)
}

fn is_uuid_text(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok() && s == s.to_lowercase()
}

#[test]
fn random_ids_are_hyphenated_v4() {
    let mut ids = RandomIds::default();
    let id = next(&mut ids, vec!["John Doe", "US", "CA", "Los Angeles"]).unwrap();
    assert!(is_uuid_text(&id));
    assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
}

#[test]
fn random_ids_differ_for_identical_rows() {
    let mut ids = RandomIds::default();
    let a = next(&mut ids, vec!["John Doe", "US", "CA", "Los Angeles"]).unwrap();
    let b = next(&mut ids, vec!["John Doe", "US", "CA", "Los Angeles"]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn stable_ids_repeat_across_runs() {
    let row = vec!["John Doe", "US", "CA", "Los Angeles"];
    let first = next(&mut StableIds::default(), row.clone()).unwrap();
    let second = next(&mut StableIds::default(), row).unwrap();
    assert_eq!(first, second);
    assert!(is_uuid_text(&first));
    assert_eq!(Uuid::parse_str(&first).unwrap().get_version_num(), 5);
}

#[test]
fn stable_ids_flag_duplicate_rows() {
    let mut ids = StableIds::default();
    let row = vec!["John Doe", "US", "CA", "Los Angeles"];
    let first = next(&mut ids, row.clone()).unwrap();
    assert_eq!(
        next(&mut ids, row),
        Err(RecordErrorCause::DuplicateId(first))
    );
}

#[test]
fn stable_ids_separate_key_parts() {
    assert_ne!(
        StableIds::derive("owners", &["ab", "c"]),
        StableIds::derive("owners", &["a", "bc"])
    );
    assert_ne!(
        StableIds::derive("owners", &["x"]),
        StableIds::derive("dealers", &["x"])
    );
}

#[test]
fn stable_ids_need_some_key_value() {
    let mut ids = StableIds::default();
    let err = next(&mut ids, vec!["", "", "", ""]).unwrap_err();
    assert!(matches!(err, RecordErrorCause::EmptyNaturalKey { .. }));
}

#[test]
fn stable_mode_requires_natural_key() {
    let mut schema = owners();
    schema.natural_key.clear();
    assert!(matches!(
        IdMode::Stable.generator(&schema),
        Err(ImportError::Config(_))
    ));
    // Schemas without generated ids never ask for one
    assert!(IdMode::Stable.generator(&car_owners()).is_ok());
}

#[test]
fn id_mode_parses() {
    assert_eq!("stable".parse(), Ok(IdMode::Stable));
    assert_eq!("Random".parse(), Ok(IdMode::Random));
    assert!("hash".parse::<IdMode>().is_err());
}

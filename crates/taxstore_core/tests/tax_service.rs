use rust_decimal::Decimal;
use std::fs;
use taxstore_core::{RepoError, StoreConfig, TaxService, TaxStore};

fn service(dir: &std::path::Path) -> TaxService<TaxStore> {
    let config = StoreConfig::new(dir.join("taxes.txt"));
    TaxService::new(TaxStore::open_or_create(config).unwrap())
}

#[test]
fn change_rate_keeps_name_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service(dir.path());
    service
        .add_rate("CA", "California", Decimal::new(725, 2))
        .unwrap();

    let changed = service.change_rate("CA", Decimal::new(800, 2)).unwrap();

    assert_eq!(changed.region_name, "California");
    let content = fs::read_to_string(dir.path().join("taxes.txt")).unwrap();
    assert!(content.contains("CA,California,8.00"));
}

#[test]
fn change_rate_of_unknown_region_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service(dir.path());

    let err = service.change_rate("ZZ", Decimal::ONE).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref key) if key == "ZZ"));
}

#[test]
fn all_rates_are_sorted_by_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service(dir.path());
    for (key, name) in [("WA", "Washington"), ("AZ", "Arizona"), ("MI", "Michigan")] {
        service.add_rate(key, name, Decimal::new(5, 0)).unwrap();
    }

    let keys: Vec<String> = service
        .all_rates()
        .unwrap()
        .into_iter()
        .map(|record| record.region_key)
        .collect();
    assert_eq!(keys, vec!["AZ", "MI", "WA"]);

    assert!(service.remove_rate("MI").unwrap());
    assert!(service.rate_for("MI").unwrap().is_none());
    assert_eq!(service.into_inner().len(), 2);
}

use rust_decimal::Decimal;
use taxstore_core::{TaxRecord, TaxValidationError};

#[test]
fn record_serialization_keeps_rate_as_exact_string() {
    let record = TaxRecord::new("NY", "New York", Decimal::new(400, 2));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["region_key"], "NY");
    assert_eq!(json["region_name"], "New York");
    assert_eq!(json["rate"], "4.00");

    let decoded: TaxRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
    assert_eq!(decoded.rate.scale(), 2);
}

#[test]
fn validation_error_messages_name_the_field() {
    assert!(TaxValidationError::EmptyRegionKey
        .to_string()
        .contains("region key"));
    assert!(TaxValidationError::EmptyRegionName
        .to_string()
        .contains("region name"));
}

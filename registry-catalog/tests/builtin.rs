use registry_catalog::*;

#[test]
fn builtin_schemas_are_valid() {
    for entity in BuiltinEntity::all() {
        entity.schema().validate().unwrap();
    }
}

#[test]
fn owners_column_order() {
    assert_eq!(
        owners().output_columns(),
        vec!["id", "name", "country", "state", "city"]
    );
}

#[test]
fn cars_column_order() {
    assert_eq!(
        cars().output_columns(),
        vec![
            "id",
            "vin",
            "color",
            "edition_id",
            "sequence",
            "destroyed",
            "manufacture_date",
            "shipping_date",
            "shipping_location",
            "shipping_vessel",
            "sale_date",
            "sale_location",
            "sale_dealer",
            "sale_msrp",
            "current_owner_id",
        ]
    );
}

#[test]
fn car_owners_has_no_generated_id() {
    let schema = car_owners();
    assert!(!schema.generate_id);
    assert_eq!(
        schema.output_columns(),
        vec!["car_id", "owner_id", "date_start", "date_end"]
    );
}

#[test]
fn entity_names_parse_back() {
    for entity in BuiltinEntity::all() {
        assert_eq!(entity.name().parse::<BuiltinEntity>(), Ok(*entity));
    }
    assert_eq!("car_owners".parse(), Ok(BuiltinEntity::CarOwners));
    assert!("boats".parse::<BuiltinEntity>().is_err());
}

//! Integration tests for mirroring collections into key-value slots.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use autoshop_catalog::{
    Applied, Car, CarDraft, CarField, Catalog, CatalogConfig, FileKeyValueStore, FormController,
    IdStrategy, InMemoryKeyValueStore, KeyValueStore, KvError, LoadOutcome, RecordId,
    RecordStore, ReviewDraft, SharedKeyValueStore, StoreError,
};
use support::{fill_car, fill_review, FaultyKv, COROLLA};
use tempfile::TempDir;

fn add_car(cars: &mut RecordStore<Car, impl KeyValueStore>, model: &str) -> RecordId {
    let mut form = FormController::<CarDraft>::new();
    form.open_add();
    fill_car(&mut form, &COROLLA);
    form.set_field(CarField::Model, model).unwrap();
    match cars.apply(form.submit().unwrap()).unwrap() {
        Applied::Created(id) => id,
        other => panic!("expected Created, got {other:?}"),
    }
}

#[test]
fn reload_yields_identical_collection() {
    let kv = InMemoryKeyValueStore::new();
    let mut cars = RecordStore::<Car, _>::load(kv.clone(), IdStrategy::Sequential).unwrap();
    add_car(&mut cars, "Corolla");
    let yaris = add_car(&mut cars, "Yaris");
    add_car(&mut cars, "Hilux");
    cars.remove(yaris).unwrap();

    let reloaded = RecordStore::<Car, _>::load(kv, IdStrategy::Sequential).unwrap();
    assert_eq!(reloaded.load_outcome(), &LoadOutcome::Loaded(2));
    assert_eq!(reloaded.records(), cars.records());
}

#[test]
fn catalog_survives_restart_on_disk() {
    let dir = TempDir::new().unwrap();
    let config = CatalogConfig::new().with_storage_dir(dir.path());

    let (corolla, civic) = {
        let mut catalog = Catalog::open(&config).unwrap();
        let corolla = add_car(&mut catalog.cars, "Corolla");

        let mut form = FormController::<ReviewDraft>::new();
        form.open_add();
        fill_review(&mut form, "Civic", "Ana");
        let Applied::Created(civic) = catalog.reviews.apply(form.submit().unwrap()).unwrap()
        else {
            panic!("expected Created");
        };
        (corolla, civic)
    };

    assert!(dir.path().join("CarApp_cars.json").exists());
    assert!(dir.path().join("CarApp_reviews.json").exists());

    let mut catalog = Catalog::open(&config).unwrap();
    assert_eq!(catalog.cars.len(), 1);
    assert_eq!(catalog.cars.get(corolla).unwrap().model, "Corolla");
    assert_eq!(catalog.reviews.get(civic).unwrap().owner_car, "Ana");

    // Identifiers keep counting after a restart
    let next = add_car(&mut catalog.cars, "Etios");
    assert!(next > corolla);
}

#[test]
fn stored_json_keeps_wire_field_names() {
    let kv = InMemoryKeyValueStore::new();
    let mut cars = RecordStore::<Car, _>::load(kv.clone(), IdStrategy::Sequential).unwrap();
    add_car(&mut cars, "Corolla");

    let raw = kv.get_item("@CarApp:cars").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json[0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["brandCar"], "Toyota");
    assert_eq!(first["year"], 2020);
    assert_eq!(first["value"], 95000.0);
    assert_eq!(first["imageCar"], "https://example.com/corolla.png");
}

#[test]
fn legacy_collection_without_ids_loads() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item(
        "@CarApp:cars",
        r#"[{"typeCar":"Hatch","brandCar":"Fiat","model":"Uno","year":2010,"condition":"Used",
             "color":"White","value":15000,"fuelType":"Flex","imageCar":"uno.png"},
            {"typeCar":"Hatch","brandCar":"VW","model":"Gol","year":2012,"condition":"Used",
             "color":"Black","value":18000.5,"fuelType":"Flex","imageCar":"gol.png"}]"#,
    )
    .unwrap();

    let cars = RecordStore::<Car, _>::load(kv, IdStrategy::Sequential).unwrap();
    let ids: Vec<_> = cars.iter().map(|c| c.id).collect();
    assert_eq!(ids, [RecordId::new(1), RecordId::new(2)]);
    assert_eq!(cars.records()[1].formatted_value(), "18000.50");
}

#[test]
fn corrupt_slot_is_reported_then_overwritten() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item("@CarApp:cars", r#"{"cars": "not an array"}"#).unwrap();

    let mut cars = RecordStore::<Car, _>::load(kv.clone(), IdStrategy::Sequential).unwrap();
    assert!(cars.is_empty());
    assert!(matches!(cars.load_outcome(), LoadOutcome::Corrupt(_)));

    add_car(&mut cars, "Corolla");
    let stored: Vec<Car> =
        serde_json::from_str(&kv.get_item("@CarApp:cars").unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn unreadable_backend_is_an_error_unless_defaulted() {
    let kv = FaultyKv::new();
    kv.set_fail_reads(true);

    let err = RecordStore::<Car, _>::load(kv.clone(), IdStrategy::Sequential).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(KvError::Io(_))));

    let cars = RecordStore::<Car, _>::load_or_default(kv, IdStrategy::Sequential);
    assert!(cars.is_empty());
    assert!(matches!(cars.load_outcome(), LoadOutcome::Unreadable(_)));
}

#[test]
fn write_failure_surfaces_and_keeps_memory_in_sync() {
    let kv = FaultyKv::new();
    let mut cars = RecordStore::<Car, _>::load(kv.clone(), IdStrategy::Sequential).unwrap();
    let kept = add_car(&mut cars, "Corolla");
    let before = kv.get_item("@CarApp:cars").unwrap();

    kv.set_fail_writes(true);
    let mut form = FormController::<CarDraft>::new();
    form.open_add();
    fill_car(&mut form, &COROLLA);
    let rejected = cars.apply(form.submit().unwrap()).unwrap_err();
    assert!(matches!(rejected.error, StoreError::Persistence(_)));
    assert!(matches!(cars.remove(kept), Err(StoreError::Persistence(_))));

    assert_eq!(cars.len(), 1);
    assert_eq!(kv.get_item("@CarApp:cars").unwrap(), before);

    // The refused input goes back into the form, ready to retry.
    assert!(form.restore(rejected.intent));
    assert!(form.is_open());
    for (field, value) in COROLLA {
        if field != CarField::Value {
            assert_eq!(form.value(field), value, "lost {field}");
        }
    }
    assert_eq!(form.value(CarField::Value), "95000");

    kv.set_fail_writes(false);
    let Applied::Created(retried) = cars.apply(form.submit().unwrap()).unwrap() else {
        panic!("expected Created");
    };
    assert_eq!(cars.get(retried).unwrap().brand_car, "Toyota");
    cars.remove(kept).unwrap();
    cars.remove(retried).unwrap();
    assert_eq!(kv.get_item("@CarApp:cars").unwrap().as_deref(), Some("[]"));
}

#[test]
fn shared_backend_keeps_collections_apart() {
    let kv = InMemoryKeyValueStore::new();
    let backend: SharedKeyValueStore = Arc::new(kv.clone());
    let mut catalog = Catalog::with_backend(backend, &CatalogConfig::default()).unwrap();

    add_car(&mut catalog.cars, "Corolla");
    let mut form = FormController::<ReviewDraft>::new();
    form.open_add();
    fill_review(&mut form, "Civic", "Ana");
    catalog.reviews.apply(form.submit().unwrap()).unwrap();

    let cars = kv.get_item("@CarApp:cars").unwrap().unwrap();
    let reviews = kv.get_item("@CarApp:reviews").unwrap().unwrap();
    assert!(cars.contains("Corolla") && !cars.contains("Civic"));
    assert!(reviews.contains("Civic") && !reviews.contains("Corolla"));
}

#[test]
fn file_store_rejects_path_escapes() {
    let dir = TempDir::new().unwrap();
    let store = FileKeyValueStore::new(dir.path());
    for key in ["@../outside", "../outside", "@CarApp:cars_2"] {
        let err = store.set_item(key, "[]").unwrap_err();
        assert!(matches!(err, KvError::InvalidKey(_)), "accepted {key:?}");
    }
    assert!(!dir.path().parent().unwrap().join("outside.json").exists());
}

#[test]
fn non_text_slot_file_is_corrupt_not_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("CarApp_cars.json"),
        [0xff, 0xfe, b'[', b']'],
    )
    .unwrap();

    let config = CatalogConfig::new().with_storage_dir(dir.path());
    let mut catalog = Catalog::open(&config).unwrap();
    assert!(catalog.cars.is_empty());
    assert!(matches!(catalog.cars.load_outcome(), LoadOutcome::Corrupt(_)));
    assert_eq!(catalog.reviews.load_outcome(), &LoadOutcome::Empty);

    add_car(&mut catalog.cars, "Corolla");
    let reopened = Catalog::open(&config).unwrap();
    assert_eq!(reopened.cars.load_outcome(), &LoadOutcome::Loaded(1));
}

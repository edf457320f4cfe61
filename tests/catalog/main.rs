//! Integration tests for the form → intent → store flow.

#[path = "../support/mod.rs"]
mod support;

use autoshop_catalog::{
    render_list, Applied, Car, CarCard, CarDraft, CarField, ChangeKind, FormController,
    FormError, IdStrategy, Intent, ModalState, RecordStore, Review, ReviewDraft, RowView,
    StoreError, EMPTY_REVIEWS, INVALID_FORM_MESSAGE,
};
use support::{fill_car, fill_review, COROLLA};
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn add_edit_delete_scenario() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let mut form = FormController::<CarDraft>::new();

    // Add
    form.open_add();
    fill_car(&mut form, &COROLLA);
    let intent = form.submit().unwrap();
    assert_eq!(form.state(), ModalState::Closed);
    let Applied::Created(id) = cars.apply(intent).unwrap() else {
        panic!("expected Created");
    };

    assert_eq!(cars.len(), 1);
    let stored = cars.get(id).unwrap().clone();
    assert_eq!(stored.brand_car, "Toyota");
    assert_eq!(stored.model, "Corolla");
    assert_eq!(stored.formatted_value(), "95000.00");

    // Edit color only
    form.open_edit(&stored);
    form.set_field(CarField::Color, "Red").unwrap();
    assert_eq!(cars.apply(form.submit().unwrap()).unwrap(), Applied::Updated(id));

    assert_eq!(cars.len(), 1);
    let edited = cars.get(id).unwrap();
    assert_eq!(edited.color, "Red");
    assert_eq!(
        Car {
            color: stored.color.clone(),
            ..edited.clone()
        },
        stored
    );

    // Delete
    form.open_edit(edited);
    let intent = form.delete().unwrap();
    assert_eq!(intent, Intent::Delete(id));
    cars.apply(intent).unwrap();
    assert!(cars.is_empty());
}

#[test]
fn invalid_year_blocks_submission() {
    let cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let mut form = FormController::<CarDraft>::new();

    form.open_add();
    fill_car(&mut form, &COROLLA);
    form.set_field(CarField::Year, "abc").unwrap();

    assert!(matches!(form.submit(), Err(FormError::Invalid { .. })));
    assert!(form.is_open());
    assert_eq!(form.error(), Some(INVALID_FORM_MESSAGE));
    assert!(cars.is_empty());

    // Correcting the field clears the way
    form.set_field(CarField::Year, "2021").unwrap();
    assert!(matches!(form.submit(), Ok(Intent::Create(_))));
    assert!(form.error().is_none());
}

#[test]
fn update_and_remove_leave_neighbours_alone() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let mut form = FormController::<CarDraft>::new();
    let mut ids = Vec::new();

    for model in ["Corolla", "Yaris", "Hilux"] {
        form.open_add();
        fill_car(&mut form, &COROLLA);
        form.set_field(CarField::Model, model).unwrap();
        let Applied::Created(id) = cars.apply(form.submit().unwrap()).unwrap() else {
            panic!("expected Created");
        };
        ids.push(id);
    }
    let before: Vec<Car> = cars.records().to_vec();

    let yaris = cars.get(ids[1]).unwrap().clone();
    form.open_edit(&yaris);
    form.set_field(CarField::Value, "80000").unwrap();
    cars.apply(form.submit().unwrap()).unwrap();

    assert_eq!(cars.records()[0], before[0]);
    assert_eq!(cars.records()[2], before[2]);
    assert_eq!(cars.records()[1].value, 80000.0);

    cars.remove(ids[0]).unwrap();
    let remaining: Vec<_> = cars.iter().map(|c| (c.id, c.model.as_str())).collect();
    assert_eq!(remaining, [(ids[1], "Yaris"), (ids[2], "Hilux")]);
}

#[test]
fn deleting_unknown_record_changes_nothing() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let mut form = FormController::<CarDraft>::new();
    form.open_add();
    fill_car(&mut form, &COROLLA);
    let Applied::Created(id) = cars.apply(form.submit().unwrap()).unwrap() else {
        panic!("expected Created");
    };
    cars.remove(id).unwrap();

    let rejected = cars.apply(Intent::Delete(id)).unwrap_err();
    assert!(matches!(rejected.error, StoreError::NotFound { .. }));
    assert_eq!(rejected.intent, Intent::Delete(id));
    assert!(cars.is_empty());
}

#[test]
fn timestamp_ids_are_unique_and_increasing() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Timestamp);
    let mut form = FormController::<CarDraft>::new();
    let mut ids = Vec::new();
    for _ in 0..20 {
        form.open_add();
        fill_car(&mut form, &COROLLA);
        let Applied::Created(id) = cars.apply(form.submit().unwrap()).unwrap() else {
            panic!("expected Created");
        };
        ids.push(id);
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn review_list_removes_by_position() {
    let mut reviews: RecordStore<Review> = RecordStore::new(IdStrategy::Sequential);
    let mut form = FormController::<ReviewDraft>::new();

    assert_eq!(render_list(&reviews, EMPTY_REVIEWS), EMPTY_REVIEWS);

    for (car, owner) in [("Civic", "Ana"), ("Gol", "Bruno"), ("Onix", "Carla")] {
        form.open_add();
        fill_review(&mut form, car, owner);
        reviews.apply(form.submit().unwrap()).unwrap();
    }

    let removed = reviews.remove_at(1).unwrap();
    assert_eq!(removed.owner_car, "Bruno");

    let text = render_list(&reviews, EMPTY_REVIEWS);
    assert!(text.contains("Owner: Ana"));
    assert!(!text.contains("Owner: Bruno"));
    assert!(text.contains("Owner: Carla"));
}

#[test]
fn car_rows_and_cards() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let mut form = FormController::<CarDraft>::new();
    form.open_add();
    fill_car(&mut form, &COROLLA);
    cars.apply(form.submit().unwrap()).unwrap();

    let car = &cars.records()[0];
    assert_eq!(
        car.lines(),
        [
            "Brand: Toyota",
            "Model: Corolla",
            "Color: Silver",
            "Year: 2020",
            "Condition: Used"
        ]
    );
    assert!(CarCard(car)
        .lines()
        .contains(&"Value: R$ 95000.00".to_string()));
}

#[test]
fn list_view_hears_every_change() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let (tx, rx) = mpsc::channel();
    cars.on_change(move |event| {
        tx.send(event).unwrap();
    });

    let mut form = FormController::<CarDraft>::new();
    form.open_add();
    fill_car(&mut form, &COROLLA);
    let Applied::Created(id) = cars.apply(form.submit().unwrap()).unwrap() else {
        panic!("expected Created");
    };
    cars.remove(id).unwrap();

    let mut events = vec![
        rx.recv_timeout(Duration::from_secs(1)).unwrap(),
        rx.recv_timeout(Duration::from_secs(1)).unwrap(),
    ];
    // Listeners run on emitter threads; `seq` restores commit order.
    events.sort_by_key(|event| event.seq);
    assert_eq!(events[0].seq, 1);
    assert_eq!(events[0].kind, ChangeKind::Added);
    assert_eq!(events[0].id, id);
    assert_eq!(events[1].seq, 2);
    assert_eq!(events[1].kind, ChangeKind::Removed);
    assert_eq!(events[1].len, 0);
}

#[test]
fn list_view_can_drop_stale_events() {
    let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
    let (tx, rx) = mpsc::channel();
    cars.on_change(move |event| {
        tx.send(event).unwrap();
    });

    let mut form = FormController::<CarDraft>::new();
    for _ in 0..5 {
        form.open_add();
        fill_car(&mut form, &COROLLA);
        cars.apply(form.submit().unwrap()).unwrap();
    }

    // Render only what is newer than the last rendered event.
    let mut rendered_seq = 0;
    let mut rendered_len = 0;
    for _ in 0..5 {
        let event = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        if event.seq > rendered_seq {
            rendered_seq = event.seq;
            rendered_len = event.len;
        }
    }
    assert_eq!(rendered_seq, 5);
    assert_eq!(rendered_len, cars.len());
}

//! Walks the showroom flow end to end: open the catalog, add a car through
//! the form, fix a typo through the edit form, list, delete.
//!
//! ```text
//! AUTOSHOP_STORAGE_DIR=/tmp/autoshop RUST_LOG=debug cargo run --example catalog
//! ```

use std::error::Error;

use autoshop_catalog::{
    render_list, Applied, CarCard, CarDraft, CarField, Catalog, CatalogConfig, Coords,
    FixedLocation, FormController, LocationStatus, Position, ReviewDraft, ReviewField, RowView,
    EMPTY_CARS, EMPTY_REVIEWS,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CatalogConfig::from_env();
    let mut catalog = Catalog::open(&config)?;
    catalog.cars.on_change(|event| info!(?event, "car list changed"));

    let mut location = FixedLocation::granted(Position {
        coords: Coords {
            latitude: -23.5505,
            longitude: -46.6333,
            altitude: None,
            accuracy: Some(10.0),
        },
        timestamp: 1_700_000_000_000,
    });
    println!("{}", LocationStatus::resolve(&mut location).text());

    let mut car_form = FormController::<CarDraft>::new();
    car_form.open_add();
    for (field, value) in [
        (CarField::TypeCar, "Sedan"),
        (CarField::BrandCar, "Toyota"),
        (CarField::Model, "Corolla"),
        (CarField::Year, "20x0"),
        (CarField::Condition, "Used"),
        (CarField::Color, "Silvr"),
        (CarField::Value, "95000"),
        (CarField::FuelType, "Flex"),
        (CarField::ImageCar, "https://example.com/corolla.png"),
    ] {
        car_form.set_field(field, value)?;
    }

    if let Err(err) = car_form.submit() {
        println!("form says: {err}");
        car_form.set_field(CarField::Year, "2020")?;
    }
    let Applied::Created(id) = catalog.cars.apply(car_form.submit()?)? else {
        return Err("add flow did not create a record".into());
    };

    if let Some(car) = catalog.cars.get(id) {
        car_form.open_edit(car);
        car_form.set_field(CarField::Color, "Silver")?;
        catalog.cars.apply(car_form.submit()?)?;
    }

    println!("{}", render_list(&catalog.cars, EMPTY_CARS));
    if let Some(car) = catalog.cars.get(id) {
        for line in CarCard(car).lines() {
            println!("  {line}");
        }
    }

    let mut review_form = FormController::<ReviewDraft>::new();
    review_form.open_add();
    review_form.set_field(ReviewField::Car, "Corolla 2020")?;
    review_form.set_field(ReviewField::OwnerCar, "Ana")?;
    review_form.set_field(ReviewField::ReceivedDate, "01/10")?;
    review_form.set_field(ReviewField::DeliveryDate, "05/10")?;
    review_form.set_field(ReviewField::ImageCar, "https://example.com/corolla.png")?;
    catalog.reviews.apply(review_form.submit()?)?;
    println!("{}", render_list(&catalog.reviews, EMPTY_REVIEWS));

    if let Some(car) = catalog.cars.get(id) {
        car_form.open_edit(car);
        catalog.cars.apply(car_form.delete()?)?;
    }
    println!("{}", render_list(&catalog.cars, EMPTY_CARS));

    Ok(())
}

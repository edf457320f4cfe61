//! Car listing and service-review catalog.
//!
//! A [`RecordStore`] owns the ordered collection for one record kind and
//! mirrors it into a [`KeyValueStore`] slot after every mutation. A
//! [`FormController`] stages edits for the record open in a modal, validates
//! them on submit and hands the store exactly one [`Intent`].
//!
//! ```ignore
//! use autoshop_catalog::{Car, CarDraft, CarField, FormController, IdStrategy, RecordStore};
//!
//! let mut cars: RecordStore<Car> = RecordStore::new(IdStrategy::Sequential);
//! let mut form = FormController::<CarDraft>::new();
//!
//! form.open_add();
//! form.set_field(CarField::BrandCar, "Toyota")?;
//! // ... remaining fields ...
//! let intent = form.submit()?;
//! cars.apply(intent)?;
//! ```

// Lets `#[derive(Record)]` expand to `::autoshop_catalog::Record` inside this crate too.
extern crate self as autoshop_catalog;

mod config;
mod form;
mod kv;
mod location;
mod record;
mod store;
mod view;

pub use config::{
    Catalog, CatalogConfig, SharedKeyValueStore, ENV_ID_STRATEGY, ENV_PERSIST_REVIEWS,
    ENV_STORAGE_DIR,
};
pub use form::{
    CarDraft, CarField, Draft, FieldError, FieldProblem, FormController, FormError, FormMode,
    Intent, ModalState, ReviewDraft, ReviewField, INVALID_FORM_MESSAGE, SAVE_FAILED_MESSAGE,
};
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, KvError};
pub use location::{
    Coords, FixedLocation, LocationError, LocationProvider, LocationStatus, Permission, Position,
    DENIED_TEXT, WAITING_TEXT,
};
pub use record::{Car, Record, RecordId, Review};
pub use store::{
    Applied, ChangeEvent, ChangeKind, IdAllocator, IdStrategy, LoadOutcome, RecordStore,
    Rejected, StoreError,
};
pub use view::{format_value, render_list, CarCard, RowView, EMPTY_CARS, EMPTY_REVIEWS};

pub use autoshop_catalog_macros::Record;

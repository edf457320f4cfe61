use autoshop_catalog_macros::Record;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A car checked into the workshop for service.
///
/// Dates are free text as typed into the form; their format is not checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "reviews", key = "@CarApp:reviews")]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: RecordId,
    pub car: String,
    pub owner_car: String,
    pub received_date: String,
    pub delivery_date: String,
    pub image_car: String,
}

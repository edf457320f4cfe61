use autoshop_catalog_macros::Record;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A vehicle listed in the showroom.
///
/// Field names on the wire stay camelCase (`typeCar`, `brandCar`, ...) so
/// collections written by earlier app builds still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "cars", key = "@CarApp:cars")]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[record(id)]
    #[serde(default)]
    pub id: RecordId,
    pub type_car: String,
    pub brand_car: String,
    pub model: String,
    pub year: i32,
    pub condition: String,
    pub color: String,
    pub value: f64,
    pub fuel_type: String,
    pub image_car: String,
}

impl Car {
    /// Price with two decimals, e.g. `95000.00`.
    pub fn formatted_value(&self) -> String {
        crate::view::format_value(self.value)
    }
}

//! Row presentation for list screens.
//!
//! Rendering is plain text; the UI layer decides layout and styling.

use std::fmt::Write as _;

use crate::record::{Car, Review};

pub const EMPTY_CARS: &str = "No cars registered.";
pub const EMPTY_REVIEWS: &str = "No reviews registered.";

/// Two-decimal money formatting: `95000.0` becomes `95000.00`.
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// One list row.
pub trait RowView {
    /// Image reference shown beside the row.
    fn image(&self) -> &str;

    /// Text lines shown in the row, top to bottom.
    fn lines(&self) -> Vec<String>;
}

impl RowView for Car {
    fn image(&self) -> &str {
        &self.image_car
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("Brand: {}", self.brand_car),
            format!("Model: {}", self.model),
            format!("Color: {}", self.color),
            format!("Year: {}", self.year),
            format!("Condition: {}", self.condition),
        ]
    }
}

impl RowView for Review {
    fn image(&self) -> &str {
        &self.image_car
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("Car: {}", self.car),
            format!("Owner: {}", self.owner_car),
            format!("Received: {}", self.received_date),
            format!("Deliver by: {}", self.delivery_date),
        ]
    }
}

/// Full detail card for one car, price included.
#[derive(Debug, Clone, Copy)]
pub struct CarCard<'a>(pub &'a Car);

impl RowView for CarCard<'_> {
    fn image(&self) -> &str {
        &self.0.image_car
    }

    fn lines(&self) -> Vec<String> {
        let car = self.0;
        vec![
            car.model.clone(),
            format!("Type: {}", car.type_car),
            format!("Brand: {}", car.brand_car),
            format!("Year: {}", car.year),
            format!("Condition: {}", car.condition),
            format!("Color: {}", car.color),
            format!("Value: R$ {}", car.formatted_value()),
            format!("Fuel: {}", car.fuel_type),
        ]
    }
}

/// Render rows separated by blank lines, or `empty` when there are none.
pub fn render_list<'a, R, I>(rows: I, empty: &str) -> String
where
    R: RowView + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut out = String::new();
    for (index, row) in rows.into_iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}]", row.image());
        for line in row.lines() {
            let _ = writeln!(out, "{line}");
        }
    }
    if out.is_empty() {
        out.push_str(empty);
    }
    out
}

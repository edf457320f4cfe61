use std::fmt;
use std::str::FromStr;

use super::{parse_decimal, parse_integer, required, Draft, FieldError};
use crate::record::{Car, RecordId};

/// Fields of the car form, in the order the form shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarField {
    TypeCar,
    BrandCar,
    Model,
    Year,
    Condition,
    Color,
    Value,
    FuelType,
    ImageCar,
}

impl CarField {
    /// Wire name, matching the serialized record.
    pub fn name(self) -> &'static str {
        match self {
            CarField::TypeCar => "typeCar",
            CarField::BrandCar => "brandCar",
            CarField::Model => "model",
            CarField::Year => "year",
            CarField::Condition => "condition",
            CarField::Color => "color",
            CarField::Value => "value",
            CarField::FuelType => "fuelType",
            CarField::ImageCar => "imageCar",
        }
    }

    /// Input placeholder.
    pub fn label(self) -> &'static str {
        match self {
            CarField::TypeCar => "Vehicle type",
            CarField::BrandCar => "Brand",
            CarField::Model => "Model",
            CarField::Year => "Year",
            CarField::Condition => "Condition",
            CarField::Color => "Color",
            CarField::Value => "Price",
            CarField::FuelType => "Fuel type",
            CarField::ImageCar => "Vehicle image URL",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, CarField::Year | CarField::Value)
    }
}

impl fmt::Display for CarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CarField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarDraft::FIELDS
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("unknown car field: {s}"))
    }
}

/// Staged text for every car field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarDraft {
    pub type_car: String,
    pub brand_car: String,
    pub model: String,
    pub year: String,
    pub condition: String,
    pub color: String,
    pub value: String,
    pub fuel_type: String,
    pub image_car: String,
}

impl CarDraft {
    fn slot(&mut self, field: CarField) -> &mut String {
        match field {
            CarField::TypeCar => &mut self.type_car,
            CarField::BrandCar => &mut self.brand_car,
            CarField::Model => &mut self.model,
            CarField::Year => &mut self.year,
            CarField::Condition => &mut self.condition,
            CarField::Color => &mut self.color,
            CarField::Value => &mut self.value,
            CarField::FuelType => &mut self.fuel_type,
            CarField::ImageCar => &mut self.image_car,
        }
    }
}

impl Draft for CarDraft {
    type Record = Car;
    type Field = CarField;

    const FIELDS: &'static [CarField] = &[
        CarField::TypeCar,
        CarField::BrandCar,
        CarField::Model,
        CarField::Year,
        CarField::Condition,
        CarField::Color,
        CarField::Value,
        CarField::FuelType,
        CarField::ImageCar,
    ];

    fn from_record(car: &Car) -> Self {
        Self {
            type_car: car.type_car.clone(),
            brand_car: car.brand_car.clone(),
            model: car.model.clone(),
            year: car.year.to_string(),
            condition: car.condition.clone(),
            color: car.color.clone(),
            value: car.value.to_string(),
            fuel_type: car.fuel_type.clone(),
            image_car: car.image_car.clone(),
        }
    }

    fn value(&self, field: CarField) -> &str {
        match field {
            CarField::TypeCar => &self.type_car,
            CarField::BrandCar => &self.brand_car,
            CarField::Model => &self.model,
            CarField::Year => &self.year,
            CarField::Condition => &self.condition,
            CarField::Color => &self.color,
            CarField::Value => &self.value,
            CarField::FuelType => &self.fuel_type,
            CarField::ImageCar => &self.image_car,
        }
    }

    fn set_value(&mut self, field: CarField, value: String) {
        *self.slot(field) = value;
    }

    fn build(&self) -> Result<Car, FieldError> {
        Ok(Car {
            id: RecordId::UNASSIGNED,
            type_car: required("typeCar", &self.type_car)?,
            brand_car: required("brandCar", &self.brand_car)?,
            model: required("model", &self.model)?,
            year: parse_integer("year", &self.year)?,
            condition: required("condition", &self.condition)?,
            color: required("color", &self.color)?,
            value: parse_decimal("value", &self.value)?,
            fuel_type: required("fuelType", &self.fuel_type)?,
            image_car: required("imageCar", &self.image_car)?,
        })
    }
}

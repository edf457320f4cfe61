use std::fmt;
use std::str::FromStr;

use super::{required, Draft, FieldError};
use crate::record::{RecordId, Review};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewField {
    Car,
    OwnerCar,
    ReceivedDate,
    DeliveryDate,
    ImageCar,
}

impl ReviewField {
    pub fn name(self) -> &'static str {
        match self {
            ReviewField::Car => "car",
            ReviewField::OwnerCar => "ownerCar",
            ReviewField::ReceivedDate => "receivedDate",
            ReviewField::DeliveryDate => "deliveryDate",
            ReviewField::ImageCar => "imageCar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewField::Car => "Car",
            ReviewField::OwnerCar => "Car owner",
            ReviewField::ReceivedDate => "Received",
            ReviewField::DeliveryDate => "Delivery deadline",
            ReviewField::ImageCar => "Vehicle image URL",
        }
    }
}

impl fmt::Display for ReviewField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReviewField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReviewDraft::FIELDS
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("unknown review field: {s}"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub car: String,
    pub owner_car: String,
    pub received_date: String,
    pub delivery_date: String,
    pub image_car: String,
}

impl Draft for ReviewDraft {
    type Record = Review;
    type Field = ReviewField;

    const FIELDS: &'static [ReviewField] = &[
        ReviewField::Car,
        ReviewField::OwnerCar,
        ReviewField::ReceivedDate,
        ReviewField::DeliveryDate,
        ReviewField::ImageCar,
    ];

    fn from_record(review: &Review) -> Self {
        Self {
            car: review.car.clone(),
            owner_car: review.owner_car.clone(),
            received_date: review.received_date.clone(),
            delivery_date: review.delivery_date.clone(),
            image_car: review.image_car.clone(),
        }
    }

    fn value(&self, field: ReviewField) -> &str {
        match field {
            ReviewField::Car => &self.car,
            ReviewField::OwnerCar => &self.owner_car,
            ReviewField::ReceivedDate => &self.received_date,
            ReviewField::DeliveryDate => &self.delivery_date,
            ReviewField::ImageCar => &self.image_car,
        }
    }

    fn set_value(&mut self, field: ReviewField, value: String) {
        match field {
            ReviewField::Car => self.car = value,
            ReviewField::OwnerCar => self.owner_car = value,
            ReviewField::ReceivedDate => self.received_date = value,
            ReviewField::DeliveryDate => self.delivery_date = value,
            ReviewField::ImageCar => self.image_car = value,
        }
    }

    fn build(&self) -> Result<Review, FieldError> {
        Ok(Review {
            id: RecordId::UNASSIGNED,
            car: required("car", &self.car)?,
            owner_car: required("ownerCar", &self.owner_car)?,
            received_date: required("receivedDate", &self.received_date)?,
            delivery_date: required("deliveryDate", &self.delivery_date)?,
            image_car: required("imageCar", &self.image_car)?,
        })
    }
}

//! Device-location status line for the inventory screen.
//!
//! Ask for permission once, read the position once, show it as raw JSON.
//! None of this touches record data.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const WAITING_TEXT: &str = "Waiting...";
pub const DENIED_TEXT: &str = "Permission to access location was denied";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// A position fix as the platform reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coords: Coords,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Platform location service.
pub trait LocationProvider {
    fn request_permission(&mut self) -> Permission;

    fn current_position(&mut self) -> Result<Position, LocationError>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationStatus {
    #[default]
    Waiting,
    Denied,
    Located(Position),
}

impl LocationStatus {
    /// Run the permission-then-read flow once.
    ///
    /// A failed read after permission was granted is logged and leaves the
    /// status at `Waiting`.
    pub fn resolve<P: LocationProvider + ?Sized>(provider: &mut P) -> Self {
        if provider.request_permission() == Permission::Denied {
            return LocationStatus::Denied;
        }
        match provider.current_position() {
            Ok(position) => LocationStatus::Located(position),
            Err(err) => {
                debug!(error = %err, "ignoring location read failure");
                LocationStatus::Waiting
            }
        }
    }

    /// Text shown on screen.
    pub fn text(&self) -> String {
        match self {
            LocationStatus::Waiting => WAITING_TEXT.to_string(),
            LocationStatus::Denied => DENIED_TEXT.to_string(),
            LocationStatus::Located(position) => {
                serde_json::to_string(position).unwrap_or_else(|_| WAITING_TEXT.to_string())
            }
        }
    }
}

/// Provider with a canned answer, for demos and tests.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    permission: Permission,
    position: Result<Position, LocationError>,
}

impl FixedLocation {
    pub fn granted(position: Position) -> Self {
        Self {
            permission: Permission::Granted,
            position: Ok(position),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            position: Err(LocationError::Unavailable("permission denied".into())),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            permission: Permission::Granted,
            position: Err(LocationError::Unavailable(reason.into())),
        }
    }
}

impl LocationProvider for FixedLocation {
    fn request_permission(&mut self) -> Permission {
        self.permission
    }

    fn current_position(&mut self) -> Result<Position, LocationError> {
        self.position.clone()
    }
}

//! Form controllers - staged edits for the record open in a modal.
//!
//! A [`FormController`] moves between `Closed` and `Open(mode)`. While open it
//! owns a [`Draft`]: every field as the text the user typed. Submitting
//! validates the draft; on success the controller emits one [`Intent`],
//! clears the draft and closes, on failure it stays open with an error
//! message and the draft untouched.

mod car;
mod review;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::record::{Record, RecordId};

pub use car::{CarDraft, CarField};
pub use review::{ReviewDraft, ReviewField};

/// Message shown while a submitted form fails validation.
pub const INVALID_FORM_MESSAGE: &str = "Please fill in all fields correctly!";

/// Message shown when a form is reopened after the store refused its intent.
pub const SAVE_FAILED_MESSAGE: &str = "Could not save your changes, please try again.";

/// The only ways a form may affect a record store.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent<R> {
    Create(R),
    Update(R),
    Delete(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Empty,
    NotANumber,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Empty => write!(f, "is empty"),
            FieldProblem::NotANumber => write!(f, "is not a valid number"),
        }
    }
}

/// The first field a draft failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("field `{field}` {problem}")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

/// Error type for form controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Validation failed; the form stays open with its staged values.
    #[error("{message}")]
    Invalid {
        message: &'static str,
        #[source]
        cause: FieldError,
    },

    #[error("form is not open")]
    NotOpen,

    #[error("nothing to delete: form is open for a new record")]
    NothingToDelete,

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Staged, unvalidated copy of one record's fields.
pub trait Draft: Default + Clone + fmt::Debug {
    type Record: Record;
    type Field: Copy + Eq + fmt::Debug + fmt::Display + FromStr + 'static;

    /// Every field, in form order.
    const FIELDS: &'static [Self::Field];

    /// Prefill from a committed record (edit flow).
    fn from_record(record: &Self::Record) -> Self;

    fn value(&self, field: Self::Field) -> &str;

    fn set_value(&mut self, field: Self::Field, value: String);

    /// Validate every field and build the record. The identifier of the
    /// returned record is left for the controller to fill in.
    fn build(&self) -> Result<Self::Record, FieldError>;
}

/// Which flow opened the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(FormMode),
}

/// Modal-scoped controller for one draft type.
#[derive(Debug, Clone, Default)]
pub struct FormController<D: Draft> {
    state: ModalState,
    draft: D,
    error: Option<String>,
}

impl<D: Draft> FormController<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open empty, for a new record.
    pub fn open_add(&mut self) {
        self.draft = D::default();
        self.error = None;
        self.state = ModalState::Open(FormMode::Add);
        debug!(collection = D::Record::COLLECTION, "form opened for add");
    }

    /// Open prefilled with `record`, for editing it.
    pub fn open_edit(&mut self, record: &D::Record) {
        let id = record.id();
        self.draft = D::from_record(record);
        self.error = None;
        self.state = ModalState::Open(FormMode::Edit(id));
        debug!(collection = D::Record::COLLECTION, %id, "form opened for edit");
    }

    pub fn set_field(&mut self, field: D::Field, value: impl Into<String>) -> Result<(), FormError> {
        self.mode()?;
        self.draft.set_value(field, value.into());
        Ok(())
    }

    /// Set a field by its wire name, e.g. `"brandCar"`.
    pub fn set_named(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = name
            .parse::<D::Field>()
            .map_err(|_| FormError::UnknownField(name.to_string()))?;
        self.set_field(field, value)
    }

    /// Close without emitting anything; staged values are discarded.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!(collection = D::Record::COLLECTION, "form cancelled");
        }
        self.reset();
    }

    /// Validate the draft and emit `Create` (add flow) or `Update` (edit flow).
    pub fn submit(&mut self) -> Result<Intent<D::Record>, FormError> {
        let mode = self.mode()?;

        let mut record = match self.draft.build() {
            Ok(record) => record,
            Err(cause) => {
                debug!(
                    collection = D::Record::COLLECTION,
                    field = cause.field,
                    problem = ?cause.problem,
                    "form validation failed"
                );
                self.error = Some(INVALID_FORM_MESSAGE.to_string());
                return Err(FormError::Invalid {
                    message: INVALID_FORM_MESSAGE,
                    cause,
                });
            }
        };

        let intent = match mode {
            FormMode::Add => {
                record.set_id(RecordId::UNASSIGNED);
                Intent::Create(record)
            }
            FormMode::Edit(id) => {
                record.set_id(id);
                Intent::Update(record)
            }
        };
        self.reset();
        Ok(intent)
    }

    /// Emit `Delete` for the record being edited.
    pub fn delete(&mut self) -> Result<Intent<D::Record>, FormError> {
        match self.mode()? {
            FormMode::Edit(id) => {
                self.reset();
                Ok(Intent::Delete(id))
            }
            FormMode::Add => Err(FormError::NothingToDelete),
        }
    }

    /// Reopen the form with the values of an intent the store refused, so
    /// nothing typed is lost. Returns false for a refused delete, which has
    /// no staged values; the record is still in the store.
    pub fn restore(&mut self, intent: Intent<D::Record>) -> bool {
        let mode = match &intent {
            Intent::Create(_) => FormMode::Add,
            Intent::Update(record) => FormMode::Edit(record.id()),
            Intent::Delete(_) => return false,
        };
        if let Intent::Create(record) | Intent::Update(record) = &intent {
            self.draft = D::from_record(record);
        }
        self.error = Some(SAVE_FAILED_MESSAGE.to_string());
        self.state = ModalState::Open(mode);
        debug!(collection = D::Record::COLLECTION, ?mode, "form restored after refused save");
        true
    }

    fn reset(&mut self) {
        self.draft = D::default();
        self.error = None;
        self.state = ModalState::Closed;
    }

    fn mode(&self) -> Result<FormMode, FormError> {
        match self.state {
            ModalState::Open(mode) => Ok(mode),
            ModalState::Closed => Err(FormError::NotOpen),
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn value(&self, field: D::Field) -> &str {
        self.draft.value(field)
    }

    /// The validation message from the last failed submit, if still open.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Emptiness check only; whitespace counts as content.
fn required(field: &'static str, value: &str) -> Result<String, FieldError> {
    if value.is_empty() {
        Err(FieldError {
            field,
            problem: FieldProblem::Empty,
        })
    } else {
        Ok(value.to_string())
    }
}

/// Integer field. Zero is rejected along with unparsable text.
fn parse_integer(field: &'static str, value: &str) -> Result<i32, FieldError> {
    required(field, value)?;
    value
        .parse::<i32>()
        .ok()
        .filter(|n| *n != 0)
        .ok_or(FieldError {
            field,
            problem: FieldProblem::NotANumber,
        })
}

/// Decimal field. Zero, NaN and infinities are rejected along with
/// unparsable text.
fn parse_decimal(field: &'static str, value: &str) -> Result<f64, FieldError> {
    required(field, value)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n != 0.0)
        .ok_or(FieldError {
            field,
            problem: FieldProblem::NotANumber,
        })
}

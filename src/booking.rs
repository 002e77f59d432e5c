//! Booking form validation.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog;

pub const CONFIRMATION_TITLE: &str = "Voyage confirmé ! Préparez vos valises.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub email: String,
}

/// Per-field validation flags; `true` marks an invalid field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingErrors {
    pub name: bool,
    pub destination: bool,
    pub email: bool,
}

impl BookingErrors {
    pub fn any(&self) -> bool {
        self.name || self.destination || self.email
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub title: String,
    pub description: String,
    pub destination: String,
}

impl BookingForm {
    pub fn validate(&self) -> BookingErrors {
        let email = self.email.trim();
        BookingErrors {
            name: self.name.trim().is_empty(),
            destination: catalog::find(&self.destination).is_none(),
            email: email.is_empty() || !email.contains('@'),
        }
    }

    pub fn submit(&self) -> Result<BookingConfirmation, BookingErrors> {
        let errors = self.validate();
        if errors.any() {
            return Err(errors);
        }
        let label = catalog::label(&self.destination).unwrap_or_default();
        info!("Booking confirmed for {label}");
        Ok(BookingConfirmation {
            title: CONFIRMATION_TITLE.to_string(),
            description: format!("Destination : {label}"),
            destination: self.destination.clone(),
        })
    }
}

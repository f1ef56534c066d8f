use crate::domain::booking::BookingId;
use crate::domain::money::Amount;
use crate::error::{BookingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Completed and Failed are final; nothing transitions out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Externally-visible correlation key tying a local payment to the gateway's
/// transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRef(String);

impl TransactionRef {
    /// Derives a reference from the booking identity and the current time,
    /// `booking_<id>_<unixMicros>`, so retries get practically unique
    /// references without coordination. The timestamp carries microsecond
    /// precision so two checkouts in the same second still mint distinct
    /// references; the payment store enforces uniqueness regardless.
    pub fn generate(booking_id: BookingId, at: DateTime<Utc>) -> Self {
        Self(format!("booking_{}_{}", booking_id, at.timestamp_micros()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TransactionRef {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A monetary transaction record tracking settlement of a booking's cost
/// through the external gateway.
///
/// Created only after a successful gateway initiation; mutated only through
/// [`Payment::transition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub amount: Amount,
    pub transaction_ref: TransactionRef,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Moves the payment to a terminal status. Only Pending payments may
    /// transition, and only to a terminal status; everything else is a
    /// domain violation.
    pub fn transition(&mut self, next: PaymentStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(BookingError::ValidationError(format!(
                "payment {} is already {}",
                self.transaction_ref, self.status
            )));
        }
        if !next.is_terminal() {
            return Err(BookingError::ValidationError(
                "payment can only transition to completed or failed".to_string(),
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Payment fields before the store assigns an id and timestamps.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: BookingId,
    pub amount: Amount,
    pub transaction_ref: TransactionRef,
    pub status: PaymentStatus,
}

//! Application layer containing the core business logic orchestration.
//!
//! `BookingService` owns the booking ledger, `PaymentService` drives the
//! checkout flow against the gateway, and `PaymentReconciler` settles
//! pending payments. Services are wired with store and gateway ports so the
//! same logic runs against any backend.

pub mod bookings;
pub mod locks;
pub mod payments;
pub mod reconciler;
pub mod seed;

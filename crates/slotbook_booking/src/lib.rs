// crates/slotbook_booking/src/lib.rs
//! Booking core: slot generation, the access-code-gated workflow, and the
//! HTTP surface that exposes them.

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod slots;
pub mod workflow;

#[cfg(test)]
mod handlers_test;
#[cfg(test)]
mod slots_proptest;
#[cfg(test)]
mod testutil;

pub use routes::routes;
pub use slots::{generate_slots, SlotGrid, SlotGridError};
pub use workflow::{BookingRequest, BookingWorkflow, SessionContext, SlotQuery, WorkflowError};

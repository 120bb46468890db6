//! Access code ledger
//!
//! One-time-use codes gating entry to the booking flow. Codes are created in
//! bulk out-of-band (see the `generate_access_codes` binary), flipped to used
//! at most once, and never deleted or reset.

use crate::error::DbError;

/// Ledger of one-time access codes.
///
/// `verify` deliberately cannot distinguish an unknown code from an already
/// used one: both answer `false`. Absence of a row is "invalid", not an
/// error.
pub trait AccessCodeLedger: Send + Sync {
    /// Create the access_codes table if it does not exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Insert a fresh, unused code. Returns `false` when the code already
    /// exists (duplicates are skipped, not overwritten).
    fn insert_code(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// `true` iff the code exists and has not been used. Does not mutate.
    fn verify(&self, code: &str) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Mark the code as used. Idempotent: consuming an already-used or
    /// unknown code is a no-op.
    fn consume(&self, code: &str) -> impl std::future::Future<Output = Result<(), DbError>> + Send;
}

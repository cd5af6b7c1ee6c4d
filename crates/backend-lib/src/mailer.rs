// ============================
// sabha-backend-lib/src/mailer.rs
// ============================
//! Outbound mail seam.
//!
//! Booking confirmation mail is a collaborator the appointment handler calls
//! into; the default implementation only logs, real deployments plug in an
//! SMTP-backed one.

use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a booking confirmation with the generated account password.
    async fn send_booking_confirmation(
        &self,
        to: &str,
        first_name: &str,
        date_and_time: &str,
        business_name: &str,
        generated_password: &str,
    ) -> Result<(), AppError>;
}

/// Mailer that records the mail in the log instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_booking_confirmation(
        &self,
        to: &str,
        first_name: &str,
        date_and_time: &str,
        business_name: &str,
        _generated_password: &str,
    ) -> Result<(), AppError> {
        tracing::info!(
            to,
            first_name,
            date_and_time,
            business_name,
            "booking confirmation mail (log-only mailer)"
        );
        Ok(())
    }
}

//! Route contributions from riders.
//!
//! A rider submits a route they know (endpoints, price, optional stops and
//! photos). Photos go to an image host, and a summary is emailed to the
//! administrator for review. Nothing is written to the store.

mod cloudinary;
mod desk;
mod error;
mod form;
mod resend;

use std::future::Future;

pub use cloudinary::{CloudinaryClient, CloudinaryConfig};
pub use desk::{ContributionDesk, ContributionEmail, ImageLink};
pub use error::ContributionError;
pub use form::{ContributionForm, ContributionFormBuilder, ImageSlot, ImageUpload};
pub use resend::{Email, ResendClient, ResendConfig};

/// Stores an uploaded image and returns its public URL.
pub trait ImageHost: Send + Sync {
    fn upload(
        &self,
        image: &ImageUpload,
    ) -> impl Future<Output = Result<String, ContributionError>> + Send;
}

/// Delivers an email.
pub trait Notifier: Send + Sync {
    fn send(&self, email: &Email) -> impl Future<Output = Result<(), ContributionError>> + Send;
}

//! Contact form submissions.
//!
//! A [`ContactForm`] is the request body as received. The only way to obtain
//! a [`Submission`] is `Submission::try_from(form)`, which runs every field
//! rule and reports all violations together.

pub mod form;
pub mod submission;
pub mod validation;

pub use form::ContactForm;
pub use submission::{Agreement, Budget, Submission};
pub use validation::{field_rank, FIELDS};

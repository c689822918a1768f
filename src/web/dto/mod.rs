//! Data Transfer Objects for the Web API.

pub mod response;
pub mod validation;

pub use response::*;
pub use validation::*;

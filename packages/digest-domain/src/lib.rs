pub mod calendar;
pub mod card;
pub mod duplicate;
pub mod insight;
pub mod profile;
pub mod ranking;
pub mod vector;

mod error;

pub use error::ValidationError;

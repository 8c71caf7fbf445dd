pub mod filter;
mod queries;
mod types;

pub use self::filter::{BookingFilter, SortDir, sort_by_schedule};
pub use self::queries::*;
pub use self::types::*;

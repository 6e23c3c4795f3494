//! Domain value types: the user entity and its search filter

mod filter;
mod user;

pub use filter::UserFilter;
pub use user::{is_unset, normalize_email, User, UNSET_TIMESTAMP};

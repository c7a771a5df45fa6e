//! `/user` transformation: decode a JSON array of user records, validate
//! them, and render weekday of birth and creation time.

pub mod domain;
pub mod service;

pub use self::domain::{UserInput, UserOutput};
pub use self::service::{
    encode_outputs, fingerprint, offset_from_secs, parse_user_inputs, transform_user_inputs,
    UsersOutcome, UsersService,
};

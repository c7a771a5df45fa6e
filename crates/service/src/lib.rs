//! Service layer for the takehome server.
//! - `storage`: the concurrent key-value map shared by handlers and workers.
//! - `users`: `/user` request transformation, cached by request fingerprint.
//! - `images`: `/image` JPEG decoding, bounded resizing and PNG encoding.
//! - `extra_credit`: worker and conversion exercises run by the `extra_credit` binary.

pub mod errors;
pub mod storage;
pub mod users;
pub mod extra_credit;
pub mod images;

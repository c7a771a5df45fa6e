use std::sync::Arc;

use chrono::FixedOffset;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::ConcurrentMap;
use crate::users::domain::{UserInput, UserOutput};

/// Transformed outputs keyed by request fingerprint.
pub type UsersCache = ConcurrentMap<Arc<Vec<UserOutput>>>;

/// Decode a request body into user inputs.
///
/// The body is read as a stream of JSON values, each an array of user
/// objects or `null`; the last value decoded wins. An empty or
/// whitespace-only body, or one ending in `null`, yields `Ok(None)`. Every
/// decoded record must pass validation.
pub fn parse_user_inputs(body: &[u8]) -> Result<Option<Vec<UserInput>>, ServiceError> {
    let mut parsed: Option<Vec<UserInput>> = None;
    let stream = serde_json::Deserializer::from_slice(body).into_iter::<Option<Vec<UserInput>>>();
    for next in stream {
        let inputs = next.map_err(|e| {
            warn!(error = %e, "failed to parse user input");
            ServiceError::Parse(e.to_string())
        })?;
        parsed = inputs;
    }

    if let Some(inputs) = &parsed {
        for input in inputs {
            input.validate()?;
        }
    }
    Ok(parsed)
}

/// Transform every input; the first failure aborts the whole batch.
pub fn transform_user_inputs(
    inputs: &[UserInput],
    offset: FixedOffset,
) -> Result<Vec<UserOutput>, ServiceError> {
    inputs.iter().map(|input| input.to_output(offset)).collect()
}

pub fn encode_outputs(outputs: &[UserOutput]) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(outputs).map_err(|e| ServiceError::Encoding(e.to_string()))
}

/// Hex SHA-256 of the raw body, used as the cache key.
pub fn fingerprint(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

pub fn offset_from_secs(secs: i32) -> Result<FixedOffset, ServiceError> {
    FixedOffset::east_opt(secs)
        .ok_or_else(|| ServiceError::Validation(format!("utc offset {secs}s is out of range")))
}

/// Result of handling one `/user` body.
#[derive(Debug, Clone, PartialEq)]
pub enum UsersOutcome {
    /// The body held no JSON value, or its last value was `null`.
    Empty,
    Transformed { outputs: Arc<Vec<UserOutput>>, cached: bool },
}

/// Parse, transform and cache `/user` request bodies.
///
/// The cache holds at most `capacity` bodies; once full, new bodies are
/// still transformed but no longer remembered.
#[derive(Clone)]
pub struct UsersService {
    cache: Arc<UsersCache>,
    offset: FixedOffset,
    capacity: usize,
}

impl UsersService {
    pub fn new(cache: Arc<UsersCache>, offset: FixedOffset, capacity: usize) -> Self {
        Self { cache, offset, capacity }
    }

    pub fn cache(&self) -> &Arc<UsersCache> {
        &self.cache
    }

    /// Serve a body from the cache when it was already transformed,
    /// otherwise parse and transform it and remember the result.
    #[instrument(skip_all, fields(body_len = body.len()))]
    pub fn handle(&self, body: &[u8]) -> Result<UsersOutcome, ServiceError> {
        let key = fingerprint(body);
        if let Some(outputs) = self.cache.read(&key) {
            debug!(%key, records = outputs.len(), "user cache hit");
            return Ok(UsersOutcome::Transformed { outputs, cached: true });
        }

        let Some(inputs) = parse_user_inputs(body)? else {
            return Ok(UsersOutcome::Empty);
        };
        let outputs = Arc::new(transform_user_inputs(&inputs, self.offset)?);
        if !self.cache.write_within(key, Arc::clone(&outputs), self.capacity) {
            debug!(capacity = self.capacity, "user cache full; result not cached");
        }
        info!(records = outputs.len(), cached_bodies = self.cache.len(), "transformed user inputs");
        Ok(UsersOutcome::Transformed { outputs, cached: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est() -> FixedOffset {
        offset_from_secs(-18_000).unwrap()
    }

    #[test]
    fn parse_handles_empty_and_blank_bodies() {
        assert_eq!(parse_user_inputs(b"").unwrap(), None);
        assert_eq!(parse_user_inputs(b"  \n\t").unwrap(), None);
        assert_eq!(parse_user_inputs(b"[]").unwrap(), Some(vec![]));
    }

    #[test]
    fn parse_treats_null_as_no_records() {
        assert_eq!(parse_user_inputs(b"null").unwrap(), None);
        assert_eq!(parse_user_inputs(b"[] null").unwrap(), None);
        assert_eq!(parse_user_inputs(b"null []").unwrap(), Some(vec![]));
    }

    #[test]
    fn parse_rejects_bad_documents() {
        for body in ["this is not json", "{}", "[{}]", r#"[{"date_of_birth": "1983-05-12", "created_on": 1642612034 }]"#] {
            assert!(parse_user_inputs(body.as_bytes()).is_err(), "{body} should be rejected");
        }
        assert!(matches!(parse_user_inputs(b"{}"), Err(ServiceError::Parse(_))));
        assert!(matches!(parse_user_inputs(b"[{}]"), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn parse_accepts_complete_records() {
        let body = r#"[
            {"user_id": 1, "name": "Joe Smith", "date_of_birth": "1983-05-12", "created_on": 1642612034 },
            {"user_id": 2, "name": "Jane Smith", "date_of_birth": "1984-05-12", "created_on": 1642612035 }
        ]"#;
        let parsed = parse_user_inputs(body.as_bytes()).unwrap().unwrap();
        assert_eq!(
            parsed,
            vec![
                UserInput::new(1, "Joe Smith", "1983-05-12", 1642612034),
                UserInput::new(2, "Jane Smith", "1984-05-12", 1642612035),
            ]
        );
    }

    #[test]
    fn parse_keeps_last_array_of_a_stream() {
        let body = r#"[{"user_id": 1, "name": "A", "date_of_birth": "1983-05-12", "created_on": 1}]
                      [{"user_id": 2, "name": "B", "date_of_birth": "1984-05-12", "created_on": 2}]"#;
        let parsed = parse_user_inputs(body.as_bytes()).unwrap().unwrap();
        assert_eq!(parsed, vec![UserInput::new(2, "B", "1984-05-12", 2)]);
    }

    #[test]
    fn transform_maps_each_record() {
        let inputs = vec![
            UserInput::new(1, "Solomon Grundy", "1983-05-09", 1642612034),
            UserInput::new(2, "Jane Smith", "1984-05-10", 1642612035),
            UserInput::new(3, "Doe Smith", "1985-05-11", 1642612036),
        ];
        let outputs = transform_user_inputs(&inputs, est()).unwrap();
        let weekdays: Vec<_> = outputs.iter().map(|o| o.weekday_of_birth.as_str()).collect();
        assert_eq!(weekdays, ["Monday", "Thursday", "Saturday"]);
        assert_eq!(outputs[2].created_on, "2022-01-19T12:07:16-05:00");
        assert!(transform_user_inputs(&[], est()).unwrap().is_empty());
    }

    #[test]
    fn transform_fails_whole_batch_on_bad_date() {
        let inputs = vec![
            UserInput::new(1, "Joe Smith", "1983-05-12", 1642612034),
            UserInput::new(2, "Joe Smith", "1983-05-124", 1642612034),
        ];
        assert!(matches!(transform_user_inputs(&inputs, est()), Err(ServiceError::Processing(_))));
    }

    #[test]
    fn fingerprint_is_stable_hex_sha256() {
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint(b"[]"), fingerprint(b"[]"));
        assert_ne!(fingerprint(b"[]"), fingerprint(b"[ ]"));
    }

    #[test]
    fn offset_bounds_are_checked() {
        assert!(offset_from_secs(0).is_ok());
        assert!(offset_from_secs(86_400).is_err());
    }

    #[test]
    fn service_caches_successful_transformations() {
        let svc = UsersService::new(Arc::new(UsersCache::new()), est(), 16);
        let body = br#"[{"user_id": 1, "name": "Joe Smith", "date_of_birth": "1983-05-12", "created_on": 1642612034 }]"#;

        let first = svc.handle(body).unwrap();
        let UsersOutcome::Transformed { outputs, cached } = first else { panic!("expected outputs") };
        assert!(!cached);
        assert_eq!(outputs[0].weekday_of_birth, "Thursday");

        let second = svc.handle(body).unwrap();
        assert_eq!(second, UsersOutcome::Transformed { outputs, cached: true });
        assert_eq!(svc.cache().len(), 1);
    }

    #[test]
    fn service_does_not_cache_failures_or_empty_bodies() {
        let svc = UsersService::new(Arc::new(UsersCache::new()), est(), 16);
        assert_eq!(svc.handle(b"").unwrap(), UsersOutcome::Empty);
        assert_eq!(svc.handle(b"null").unwrap(), UsersOutcome::Empty);
        assert!(svc.handle(b"not json").is_err());
        let bad_date = br#"[{"user_id": 1, "name": "Joe", "date_of_birth": "1983-05-124", "created_on": 1}]"#;
        assert!(svc.handle(bad_date).is_err());
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn full_cache_still_serves_but_does_not_grow() {
        let svc = UsersService::new(Arc::new(UsersCache::new()), est(), 1);
        let first = br#"[{"user_id": 1, "name": "A", "date_of_birth": "1983-05-12", "created_on": 1}]"#;
        let second = br#"[{"user_id": 2, "name": "B", "date_of_birth": "1984-05-12", "created_on": 2}]"#;

        assert!(matches!(svc.handle(first).unwrap(), UsersOutcome::Transformed { cached: false, .. }));
        for _ in 0..2 {
            let UsersOutcome::Transformed { outputs, cached } = svc.handle(second).unwrap() else {
                panic!("expected outputs")
            };
            assert!(!cached);
            assert_eq!(outputs[0].user_id, 2);
        }
        assert_eq!(svc.cache().len(), 1);
        assert!(matches!(svc.handle(first).unwrap(), UsersOutcome::Transformed { cached: true, .. }));
    }

    #[test]
    fn encode_outputs_writes_json_array() {
        assert_eq!(encode_outputs(&[]).unwrap(), b"[]");
    }
}

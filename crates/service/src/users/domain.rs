use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, SecondsFormat, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ServiceError;

/// One record of a `/user` request body. Every field is optional at decode
/// time so a partial object can be reported as invalid rather than as a
/// malformed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub created_on: Option<i64>,
}

/// Transformed record returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOutput {
    pub user_id: i64,
    pub name: String,
    pub weekday_of_birth: String,
    pub created_on: String,
}

impl UserInput {
    pub fn new(user_id: i64, name: &str, date_of_birth: &str, created_on: i64) -> Self {
        Self {
            user_id: Some(user_id),
            name: Some(name.to_string()),
            date_of_birth: Some(date_of_birth.to_string()),
            created_on: Some(created_on),
        }
    }

    /// All four fields must be present.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.user_id.is_none()
            || self.name.is_none()
            || self.date_of_birth.is_none()
            || self.created_on.is_none()
        {
            return Err(ServiceError::missing_fields("UserInput"));
        }
        Ok(())
    }

    /// Build the output record, rendering `created_on` in `offset`.
    pub fn to_output(&self, offset: FixedOffset) -> Result<UserOutput, ServiceError> {
        let (Some(user_id), Some(name), Some(dob), Some(created_on)) =
            (self.user_id, &self.name, &self.date_of_birth, self.created_on)
        else {
            return Err(ServiceError::missing_fields("UserInput"));
        };

        let weekday = weekday_name(parse_date_of_birth(dob)?);
        let created = DateTime::from_timestamp(created_on, 0).ok_or_else(|| {
            warn!(user_id, created_on, "created_on outside the representable range");
            ServiceError::Processing(format!("created_on {created_on} is out of range"))
        })?;

        Ok(UserOutput {
            user_id,
            name: name.clone(),
            weekday_of_birth: weekday.to_string(),
            created_on: created
                .with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

/// Strict `YYYY-MM-DD`: two-digit month and day, no trailing input.
fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, ServiceError> {
    let bytes = raw.as_bytes();
    let digits = |r: std::ops::Range<usize>| bytes[r].iter().all(u8::is_ascii_digit);
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && digits(0..4)
        && digits(5..7)
        && digits(8..10);
    if !shaped {
        warn!(date_of_birth = raw, "date_of_birth is not YYYY-MM-DD");
        return Err(ServiceError::Processing(format!("invalid date_of_birth {raw:?}")));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        warn!(date_of_birth = raw, error = %e, "failed to parse date_of_birth");
        ServiceError::Processing(format!("invalid date_of_birth {raw:?}: {e}"))
    })
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

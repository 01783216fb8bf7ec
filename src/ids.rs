use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Correlation id of one remote call.
///
/// Every log line emitted while binding, invoking and mapping a call carries it as `call_id`.
/// The id is a ULID, so it also records when the call was issued: socket clients that send
/// their own ULID get queueing time measured from their clock.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallId(ulid::Ulid);

impl CallId {
    #[must_use]
    pub fn new() -> Self {
        CallId(ulid::Ulid::new())
    }

    /// Id supplied by the caller, or a fresh one when it is missing or not a ULID
    #[must_use]
    pub fn parse_or_new(supplied: Option<&str>) -> Self {
        supplied
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.0.datetime())
    }

    /// Time since the id was issued; zero for ids from a clock ahead of ours
    #[must_use]
    pub fn age(&self) -> Duration {
        self.0.datetime().elapsed().unwrap_or_default()
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CallId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(CallId)
    }
}

impl TryFrom<String> for CallId {
    type Error = ulid::DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CallId> for String {
    fn from(id: CallId) -> Self {
        id.to_string()
    }
}

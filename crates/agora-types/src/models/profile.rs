//! Profile model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account identifier assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user's profile (`GET profile/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    /// Date of birth
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    /// Media reference of the profile picture
    #[serde(default, rename = "profile_pic")]
    pub avatar: Option<String>,
}

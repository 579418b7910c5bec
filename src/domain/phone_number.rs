use std::fmt;

use phonenumber::country;
use phonenumber::Mode;

/// A destination phone number in E.164 format
///
/// Free-form input is parsed against a default region, checked against
/// that region's numbering plan, and canonicalized to `+` followed by
/// country code and subscriber number with no separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

/// Phone number validation error type
#[derive(thiserror::Error, Debug)]
pub enum InvalidPhone {
    #[error("`{raw}` could not be parsed as a phone number: {cause}")]
    Unparseable { raw: String, cause: String },
    #[error("`{0}` is not a valid number for its region")]
    OutOfPlan(String),
}

impl PhoneNumber {
    /// Parse a free-form phone number, assuming `default_region` when no
    /// explicit country code is present
    pub fn parse(raw: &str, default_region: country::Id) -> Result<Self, InvalidPhone> {
        let parsed = phonenumber::parse(Some(default_region), raw).map_err(|e| {
            InvalidPhone::Unparseable {
                raw: raw.to_string(),
                cause: e.to_string(),
            }
        })?;
        if !phonenumber::is_valid(&parsed) {
            return Err(InvalidPhone::OutOfPlan(raw.to_string()));
        }
        Ok(Self(parsed.format().mode(Mode::E164).to_string()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

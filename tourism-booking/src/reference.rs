use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "TRP";

/// Human readable booking id, `TRP-<year>-<seq>`.
///
/// The original text is kept verbatim so references issued elsewhere survive
/// a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingReference(String);

impl BookingReference {
    /// New reference with the sequence zero-padded to four digits
    pub fn generate(year: i32, sequence: u32) -> Self {
        Self(format!("{}-{:04}-{:04}", PREFIX, year, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.parts().map(|(y, _)| y).unwrap_or_default()
    }

    pub fn sequence(&self) -> u32 {
        self.parts().map(|(_, s)| s).unwrap_or_default()
    }

    fn parts(&self) -> Option<(i32, u32)> {
        let mut it = self.0.splitn(3, '-');
        let _prefix = it.next()?;
        let year = it.next()?.parse().ok()?;
        let seq = it.next()?.parse().ok()?;
        Some((year, seq))
    }
}

impl FromStr for BookingReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid booking reference: {}", s);
        let mut it = s.splitn(3, '-');

        if it.next() != Some(PREFIX) {
            return Err(invalid());
        }
        let year = it.next().ok_or_else(invalid)?;
        let seq = it.next().ok_or_else(invalid)?;

        let digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
        if year.len() != 4 || !digits(year) || !digits(seq) {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for BookingReference {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BookingReference> for String {
    fn from(reference: BookingReference) -> Self {
        reference.0
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

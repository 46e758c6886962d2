use std::fmt;
use std::str::FromStr;

/// Taxi zone identifier (TLC `LocationID`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(pub u32);

impl ZoneId {
    pub fn new(n: u32) -> Self {
        ZoneId(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Label used whenever a zone has no display name.
    pub fn fallback_name(self) -> String {
        format!("Zone {}", self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ZoneId {
    fn from(n: u32) -> Self {
        ZoneId(n)
    }
}

impl FromStr for ZoneId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(ZoneId)
    }
}

#[cfg(test)]
mod tests {
    use super::ZoneId;

    #[test]
    fn fallback_name_uses_numeric_id() {
        assert_eq!(ZoneId(132).fallback_name(), "Zone 132");
    }

    #[test]
    fn parses_padded_strings() {
        assert_eq!(" 7 ".parse::<ZoneId>().unwrap(), ZoneId(7));
        assert!("abc".parse::<ZoneId>().is_err());
    }
}

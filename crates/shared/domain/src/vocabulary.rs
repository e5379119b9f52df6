//! Enumerations whose UI labels differ from the backend vocabulary.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    #[must_use]
    pub const fn upstream(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    #[must_use]
    pub const fn upstream(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Married => "MARRIED",
            Self::Divorced => "DIVORCED",
            Self::Widowed => "WIDOWED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn ui_labels_parse_case_insensitively() {
        assert_eq!(Sex::from_str("Male").unwrap(), Sex::Male);
        assert_eq!(Sex::from_str("female").unwrap(), Sex::Female);
        assert!(Sex::from_str("").is_err());
        assert_eq!(MaritalStatus::from_str("WIDOWED").unwrap(), MaritalStatus::Widowed);
    }

    #[test]
    fn upstream_is_upper_case_label() {
        for status in MaritalStatus::iter() {
            assert_eq!(status.upstream(), status.as_ref().to_uppercase());
        }
        for sex in Sex::iter() {
            assert_eq!(sex.upstream(), sex.to_string().to_uppercase());
        }
    }
}

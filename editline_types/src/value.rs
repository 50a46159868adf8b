//! Domain values carried by edit line fields

use chrono::NaiveDate;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Signed fixed-point money amount in minor units (hundredths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount(pub i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole and fractional minor units
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Self(major * 100 - minor)
        } else {
            Self(major * 100 + minor)
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Calendar date of a transaction
///
/// "No date" is expressed as `Option<Date>::None` wherever a date may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a date, or `None` if the components are not a real date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d/%m/%Y"))
    }
}

/// Identifier of an account in the host's account list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account {}", self.0)
    }
}

/// Account side of a transaction: which account, and whether it is reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccountValue {
    pub account: Option<AccountId>,
    pub reconciled: bool,
}

impl AccountValue {
    pub const EMPTY: Self = Self {
        account: None,
        reconciled: false,
    };

    pub fn new(account: AccountId, reconciled: bool) -> Self {
        Self {
            account: Some(account),
            reconciled,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

//! Value conversions
//!
//! How amounts, dates and accounts look on screen is the host's business. The
//! engine converts through [`Converters`]; [`SimpleConverters`] is a small
//! self-contained set for tests and simple hosts.

use crate::toolkit::Toolkit;
use chrono::{Datelike, Local};
use editline_types::{AccountId, AccountValue, Amount, Date, KeyEvent, SurfaceId, WidgetHandle};

/// Which side of a transaction an account field edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountDirection {
    In,
    Out,
}

/// An account field being edited, as handed to [`Converters::lookup_account`]
#[derive(Debug, Clone)]
pub struct AccountLookup<'a> {
    pub surface: SurfaceId,
    pub direction: AccountDirection,
    pub ident: WidgetHandle,
    pub reconciled: WidgetHandle,
    pub name: WidgetHandle,
    /// Icon holding the caret
    pub caret: WidgetHandle,
    pub key: &'a KeyEvent,
    /// Value before the keystroke
    pub current: AccountValue,
}

/// Conversions between values and widget text
pub trait Converters {
    fn parse_amount(&self, text: &str) -> Amount;

    fn format_amount(&self, amount: Amount) -> String;

    /// Parses a date, completing missing parts from `context`
    fn parse_date(&self, text: &str, context: Option<Date>) -> Option<Date>;

    fn format_date(&self, date: Option<Date>) -> String;

    fn today(&self) -> Date;

    fn account_ident(&self, account: Option<AccountId>) -> String;

    fn account_name(&self, account: Option<AccountId>) -> String;

    fn reconcile_mark(&self, reconciled: bool) -> String;

    /// Resolves the account typed into an account field
    ///
    /// May update the field's name and reconciliation widgets in place.
    fn lookup_account(
        &mut self,
        toolkit: &mut dyn Toolkit,
        lookup: &AccountLookup<'_>,
    ) -> AccountValue;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AccountEntry {
    id: AccountId,
    ident: String,
    name: String,
}

/// Two-decimal amounts, day/month/year dates and an in-memory account table
#[derive(Debug, Clone, Default)]
pub struct SimpleConverters {
    accounts: Vec<AccountEntry>,
    today: Option<Date>,
}

impl SimpleConverters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account to the lookup table
    pub fn with_account(
        mut self,
        id: AccountId,
        ident: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.accounts.push(AccountEntry {
            id,
            ident: ident.into(),
            name: name.into(),
        });
        self
    }

    /// Pins "today" to a fixed date
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    fn entry(&self, account: Option<AccountId>) -> Option<&AccountEntry> {
        let account = account?;
        self.accounts.iter().find(|entry| entry.id == account)
    }

    fn find_ident(&self, ident: &str) -> Option<AccountId> {
        if ident.is_empty() {
            return None;
        }
        self.accounts
            .iter()
            .find(|entry| entry.ident.eq_ignore_ascii_case(ident))
            .map(|entry| entry.id)
    }
}

impl Converters for SimpleConverters {
    fn parse_amount(&self, text: &str) -> Amount {
        let cleaned: String = text
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != ',')
            .collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Amount::ZERO;
        }

        let major = if whole.is_empty() {
            Some(0)
        } else {
            whole.parse::<i64>().ok()
        };
        let minor = fraction
            .chars()
            .chain(core::iter::repeat('0'))
            .take(2)
            .filter_map(|ch| ch.to_digit(10))
            .fold(0i64, |minor, digit| minor * 10 + i64::from(digit));
        let value = major
            .and_then(|major| major.checked_mul(100))
            .and_then(|value| value.checked_add(minor))
            .unwrap_or(0);

        Amount(if negative { -value } else { value })
    }

    fn format_amount(&self, amount: Amount) -> String {
        amount.to_string()
    }

    fn parse_date(&self, text: &str, context: Option<Date>) -> Option<Date> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let base = context.unwrap_or_else(|| self.today()).as_naive();
        let parts: Vec<&str> = text
            .split(|ch| ch == '/' || ch == '.' || ch == '-')
            .map(str::trim)
            .collect();
        let number = |part: &str| part.parse::<u32>().ok();

        let (day, month, year) = match parts.as_slice() {
            &[day] => (number(day)?, base.month(), base.year()),
            &[day, month] => (number(day)?, number(month)?, base.year()),
            &[day, month, year] => {
                let short = year.len() <= 2;
                let year = year.parse::<i32>().ok()?;
                let year = if short {
                    base.year() - base.year().rem_euclid(100) + year
                } else {
                    year
                };
                (number(day)?, number(month)?, year)
            }
            _ => return None,
        };
        Date::from_ymd(year, month, day)
    }

    fn format_date(&self, date: Option<Date>) -> String {
        date.map(|date| date.to_string()).unwrap_or_default()
    }

    fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| Date::from_naive(Local::now().date_naive()))
    }

    fn account_ident(&self, account: Option<AccountId>) -> String {
        self.entry(account)
            .map(|entry| entry.ident.clone())
            .unwrap_or_default()
    }

    fn account_name(&self, account: Option<AccountId>) -> String {
        self.entry(account)
            .map(|entry| entry.name.clone())
            .unwrap_or_default()
    }

    fn reconcile_mark(&self, reconciled: bool) -> String {
        let mark = if reconciled { "*" } else { "" };
        mark.to_string()
    }

    fn lookup_account(
        &mut self,
        toolkit: &mut dyn Toolkit,
        lookup: &AccountLookup<'_>,
    ) -> AccountValue {
        let ident = match toolkit.widget_text(lookup.surface, lookup.ident) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("account lookup could not read {}: {}", lookup.ident, err);
                return lookup.current;
            }
        };
        let account = self.find_ident(ident.trim());
        // Changing the account drops its reconciliation.
        let reconciled =
            account.is_some() && account == lookup.current.account && lookup.current.reconciled;

        let updates = [
            (lookup.name, self.account_name(account)),
            (lookup.reconciled, self.reconcile_mark(reconciled)),
        ];
        for (handle, text) in updates {
            if let Err(err) = toolkit.set_widget_text(lookup.surface, handle, &text) {
                log::warn!("account lookup could not update {}: {}", handle, err);
            }
        }

        AccountValue { account, reconciled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converters() -> SimpleConverters {
        SimpleConverters::new().with_today(Date::from_ymd(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_parse_amount() {
        let c = converters();
        assert_eq!(c.parse_amount("12.34"), Amount(1234));
        assert_eq!(c.parse_amount("12.3"), Amount(1230));
        assert_eq!(c.parse_amount("1,000"), Amount(100000));
        assert_eq!(c.parse_amount("-0.05"), Amount(-5));
        assert_eq!(c.parse_amount(".5"), Amount(50));
        assert_eq!(c.parse_amount("12.345"), Amount(1234));
    }

    #[test]
    fn test_parse_amount_rejects_junk() {
        let c = converters();
        assert_eq!(c.parse_amount("abc"), Amount::ZERO);
        assert_eq!(c.parse_amount(""), Amount::ZERO);
        assert_eq!(c.parse_amount("1.2.3"), Amount::ZERO);
    }

    #[test]
    fn test_parse_date_completes_from_context() {
        let c = converters();
        let context = Date::from_ymd(2023, 11, 2);
        assert_eq!(c.parse_date("5", context), Date::from_ymd(2023, 11, 5));
        assert_eq!(c.parse_date("5/6", context), Date::from_ymd(2023, 6, 5));
        assert_eq!(c.parse_date("5/6/21", context), Date::from_ymd(2021, 6, 5));
        assert_eq!(c.parse_date("5.6.1999", context), Date::from_ymd(1999, 6, 5));
    }

    #[test]
    fn test_parse_date_without_context_uses_today() {
        let c = converters();
        assert_eq!(c.parse_date("20", None), Date::from_ymd(2024, 3, 20));
    }

    #[test]
    fn test_parse_date_invalid() {
        let c = converters();
        assert_eq!(c.parse_date("", None), None);
        assert_eq!(c.parse_date("31/2", None), None);
        assert_eq!(c.parse_date("x", None), None);
        assert_eq!(c.parse_date("1/2/3/4", None), None);
    }

    #[test]
    fn test_format_date() {
        let c = converters();
        assert_eq!(c.format_date(None), "");
        assert_eq!(c.format_date(Date::from_ymd(2024, 3, 5)), "05/03/2024");
    }

    #[test]
    fn test_account_formatting() {
        let c = converters().with_account(AccountId(1), "BNK", "Bank");
        assert_eq!(c.account_ident(Some(AccountId(1))), "BNK");
        assert_eq!(c.account_name(Some(AccountId(1))), "Bank");
        assert_eq!(c.account_name(None), "");
        assert_eq!(c.account_name(Some(AccountId(9))), "");
        assert_eq!(c.reconcile_mark(true), "*");
        assert_eq!(c.reconcile_mark(false), "");
    }
}

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// The year monthly queries are evaluated in, and the month currently selected.
///
/// Monthly aggregation only ever looks at `year`; a purchase from the same
/// calendar month of another year is not part of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub year: i32,
    pub current_month: Month,
}

impl Calendar {
    pub fn new(year: i32, current_month: Month) -> Self {
        Self {
            year,
            current_month,
        }
    }

    /// A calendar positioned on the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        // `month()` is always 1..=12, so the conversion cannot fail.
        let month = Month::try_from(date.month() as u8).unwrap_or(Month::January);
        Self::new(date.year(), month)
    }

    /// Whether `date` lies inside `month` of this calendar's year.
    pub fn contains(&self, month: Month, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == month.number_from_month()
    }

    /// All twelve months in calendar order.
    pub fn months() -> impl Iterator<Item = Month> {
        (1u8..=12).filter_map(|m| Month::try_from(m).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_only_matches_the_calendar_year() {
        let calendar = Calendar::new(2025, Month::January);
        let in_year = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let other_year = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert!(calendar.contains(Month::January, in_year));
        assert!(!calendar.contains(Month::January, other_year));
        assert!(!calendar.contains(Month::February, in_year));
    }

    #[test]
    fn months_yields_twelve_in_order() {
        let months: Vec<_> = Calendar::months().collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Month::January);
        assert_eq!(months[11], Month::December);
    }
}

//! Calendar helpers for yearly projections.
//!
//! The engine works on whole years; dates only matter to prorate the year in
//! which an event (retirement, pension liquidation, layoff) happens. These
//! helpers do direct calendar arithmetic without going through `jiff::Span`.

use jiff::civil::Date;

#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Add whole years and months, clamping the day to the end of the month
pub fn add_years_months(d: Date, years: i32, months: i32) -> Date {
    let total = i32::from(d.year()) * 12 + i32::from(d.month()) - 1 + years * 12 + months;
    let year = total.div_euclid(12).clamp(-9999, 9999) as i16;
    let month = (total.rem_euclid(12) + 1) as i8;
    let day = d.day().min(days_in_month(year, month));
    jiff::civil::date(year, month, day)
}

/// Whole years elapsed from `from` to `to` (an age when `from` is a birth date)
pub fn whole_years_between(from: Date, to: Date) -> i32 {
    let mut years = i32::from(to.year()) - i32::from(from.year());
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

/// Share of its year elapsed before `d` (0 on January 1st)
pub fn fraction_of_year_before(d: Date) -> f64 {
    f64::from(d.day_of_year() - 1) / f64::from(d.days_in_year())
}

/// Share of `year` covered by `[from, to)`
pub fn fraction_of_year_between(year: i32, from: Date, to: Date) -> f64 {
    let start = match i32::from(from.year()).cmp(&year) {
        std::cmp::Ordering::Less => 0.0,
        std::cmp::Ordering::Equal => fraction_of_year_before(from),
        std::cmp::Ordering::Greater => return 0.0,
    };
    let end = match i32::from(to.year()).cmp(&year) {
        std::cmp::Ordering::Less => return 0.0,
        std::cmp::Ordering::Equal => fraction_of_year_before(to),
        std::cmp::Ordering::Greater => 1.0,
    };
    (end - start).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_add_years_months() {
        assert_eq!(add_years_months(date(1965, 4, 15), 62, 0), date(2027, 4, 15));
        assert_eq!(add_years_months(date(1965, 4, 15), 62, 9), date(2028, 1, 15));
        assert_eq!(add_years_months(date(1964, 1, 31), 0, 1), date(1964, 2, 29));
        assert_eq!(add_years_months(date(1965, 1, 31), 0, 1), date(1965, 2, 28));
    }

    #[test]
    fn test_whole_years_between() {
        assert_eq!(whole_years_between(date(1980, 6, 15), date(2025, 6, 14)), 44);
        assert_eq!(whole_years_between(date(1980, 6, 15), date(2025, 6, 15)), 45);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(fraction_of_year_before(date(2025, 1, 1)), 0.0);
        assert!((fraction_of_year_before(date(2025, 7, 2)) - 182.0 / 365.0).abs() < 1e-12);

        let from = date(2025, 7, 2);
        let to = date(2027, 7, 2);
        assert_eq!(fraction_of_year_between(2024, from, to), 0.0);
        assert!((fraction_of_year_between(2025, from, to) - 183.0 / 365.0).abs() < 1e-12);
        assert_eq!(fraction_of_year_between(2026, from, to), 1.0);
        assert_eq!(fraction_of_year_between(2028, from, to), 0.0);
    }
}

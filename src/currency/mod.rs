use chrono::{Datelike, NaiveDate};

/// Currency glyph used everywhere amounts are rendered.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Rounds to two decimal places, half away from zero.
///
/// All stored monetary fields pass through this at the point of storage so
/// that document math stays consistent with what is displayed.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders an amount with the currency glyph, two decimals, and thousands
/// grouping, e.g. `₹1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let body = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (body.as_str(), "00"),
    };
    let grouped = group_digits(int_part, ',');
    if negative {
        format!("-{}{}.{}", CURRENCY_SYMBOL, grouped, frac_part)
    } else {
        format!("{}{}.{}", CURRENCY_SYMBOL, grouped, frac_part)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

/// Renders a business date in medium style, e.g. `05 Jan 2026`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        month_label(date.month()),
        date.year()
    )
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

/// Inclusive-both-ends date range containment, date-only comparison.
pub fn within_range(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    date >= from && date <= to
}

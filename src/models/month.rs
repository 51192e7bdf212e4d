use chrono::{Month, NaiveDate};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Bills fall due on this day of the month after the billed one.
const DUE_DAY: u32 = 10;

/// Full English month name (any case) to 1..=12. Abbreviations are rejected.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim();
    MONTHS
        .iter()
        .find(|m| m.name().eq_ignore_ascii_case(name))
        .map(|m| m.number_from_month())
}

pub fn month_label(number: u32) -> Option<&'static str> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    MONTHS.get(index).map(|m| m.name())
}

/// A month as the user typed it, resolved for display and arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMonth {
    pub number: Option<u32>,
    pub label: String,
}

pub fn resolve_month(raw: Option<&str>) -> ResolvedMonth {
    let raw = raw.unwrap_or_default();
    let number = month_from_name(raw).or_else(|| raw.trim().parse().ok());
    let label = number
        .and_then(month_label)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string());
    ResolvedMonth { number, label }
}

/// Due date of the bill for `month`/`year`, e.g. `April 10, 2024` for March.
pub fn due_date(month: Option<u32>, year: Option<&str>) -> String {
    let year = year.and_then(|y| y.trim().parse::<i32>().ok());
    let (Some(month), Some(year)) = (month, year) else {
        return "N/A".to_string();
    };

    let next = month.checked_add(1).and_then(|next| {
        if next > 12 {
            year.checked_add(1).map(|y| (1, y))
        } else {
            Some((next, year))
        }
    });

    next.and_then(|(next_month, next_year)| {
        NaiveDate::from_ymd_opt(next_year, next_month, DUE_DAY)
    })
    .map(|d| d.format("%B %d, %Y").to_string())
    .unwrap_or_else(|| "N/A".to_string())
}

//! Human-readable strings derived from raw listing fields.

use chrono::{DateTime, Utc};

/// "Today", "3 days ago", "2 weeks ago", "5 months ago"; "Recently" when the
/// posting date is unknown.
pub fn format_posted_age(posted: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(posted) = posted else {
        return "Recently".to_string();
    };

    let days = (now - posted).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 30 => plural(d / 7, "week"),
        d => plural(d / 30, "month"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// "$80K - $120K/yr", "From $80K/yr", "Up to $45/hr", or
/// "Salary not disclosed".
pub fn format_salary(
    min: Option<f64>,
    max: Option<f64>,
    currency: Option<&str>,
    period: Option<&str>,
) -> String {
    let min = min.filter(|v| v.is_finite() && *v > 0.0);
    let max = max.filter(|v| v.is_finite() && *v > 0.0);

    let symbol = currency_symbol(currency);
    let suffix = period_suffix(period);
    let amount = |v: f64| format!("{symbol}{}", compact_amount(v));

    match (min, max) {
        (Some(lo), Some(hi)) if (lo - hi).abs() < f64::EPSILON => {
            format!("{}{suffix}", amount(lo))
        }
        (Some(lo), Some(hi)) => format!("{} - {}{suffix}", amount(lo), amount(hi)),
        (Some(lo), None) => format!("From {}{suffix}", amount(lo)),
        (None, Some(hi)) => format!("Up to {}{suffix}", amount(hi)),
        (None, None) => "Salary not disclosed".to_string(),
    }
}

fn compact_amount(value: f64) -> String {
    let whole = value.round();
    if whole >= 1_000.0 {
        format!("{:.0}K", (whole / 1_000.0).round())
    } else {
        format!("{whole:.0}")
    }
}

fn currency_symbol(currency: Option<&str>) -> String {
    match currency.map(|c| c.trim().to_uppercase()).as_deref() {
        None | Some("") | Some("USD") => "$".to_string(),
        Some("EUR") => "€".to_string(),
        Some("GBP") => "£".to_string(),
        Some("INR") => "₹".to_string(),
        Some("CAD") => "CA$".to_string(),
        Some(other) => format!("{other} "),
    }
}

fn period_suffix(period: Option<&str>) -> &'static str {
    match period.map(|p| p.trim().to_uppercase()).as_deref() {
        Some("YEAR") => "/yr",
        Some("MONTH") => "/mo",
        Some("WEEK") => "/wk",
        Some("HOUR") => "/hr",
        _ => "",
    }
}

/// JSearch employment types ("FULLTIME", "CONTRACTOR", ...) to display labels.
pub fn format_employment_type(raw: Option<&str>) -> String {
    match raw.map(|t| t.trim().to_uppercase()).as_deref() {
        None | Some("") | Some("FULLTIME") => "Full-time".to_string(),
        Some("PARTTIME") => "Part-time".to_string(),
        Some("CONTRACTOR") => "Contract".to_string(),
        Some("INTERN") => "Internship".to_string(),
        Some(other) => {
            let lower = other.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

/// Joins the non-empty location parts; remote listings without a place read
/// "Remote".
pub fn format_location(parts: &[Option<&str>], is_remote: bool) -> String {
    let joined = parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    match (joined.is_empty(), is_remote) {
        (true, true) => "Remote".to_string(),
        (true, false) => "Location not specified".to_string(),
        (false, true) => format!("{joined} (Remote)"),
        (false, false) => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_posted_age_buckets() {
        let now = Utc::now();
        let age = |days: i64| format_posted_age(Some(now - Duration::days(days)), now);
        assert_eq!(age(0), "Today");
        assert_eq!(age(1), "1 day ago");
        assert_eq!(age(4), "4 days ago");
        assert_eq!(age(7), "1 week ago");
        assert_eq!(age(20), "2 weeks ago");
        assert_eq!(age(30), "1 month ago");
        assert_eq!(age(95), "3 months ago");
        assert_eq!(format_posted_age(None, now), "Recently");
    }

    #[test]
    fn test_future_dates_read_today() {
        let now = Utc::now();
        assert_eq!(
            format_posted_age(Some(now + Duration::hours(5)), now),
            "Today"
        );
    }

    #[test]
    fn test_salary_range() {
        assert_eq!(
            format_salary(Some(80_000.0), Some(120_000.0), Some("USD"), Some("YEAR")),
            "$80K - $120K/yr"
        );
        assert_eq!(
            format_salary(Some(45.0), None, None, Some("HOUR")),
            "From $45/hr"
        );
        assert_eq!(
            format_salary(None, Some(60_000.0), Some("EUR"), None),
            "Up to €60K"
        );
        assert_eq!(
            format_salary(Some(90_000.0), Some(90_000.0), Some("GBP"), Some("YEAR")),
            "£90K/yr"
        );
    }

    #[test]
    fn test_amounts_rounding_up_to_a_thousand_use_k() {
        assert_eq!(format_salary(Some(999.6), None, None, None), "From $1K");
        assert_eq!(format_salary(Some(999.4), None, None, None), "From $999");
        assert_eq!(compact_amount(1_499.0), "1K");
        assert_eq!(compact_amount(1_500.0), "2K");
    }

    #[test]
    fn test_salary_missing_or_zero() {
        assert_eq!(format_salary(None, None, None, None), "Salary not disclosed");
        assert_eq!(
            format_salary(Some(0.0), None, Some("USD"), None),
            "Salary not disclosed"
        );
    }

    #[test]
    fn test_salary_unknown_currency_uses_code() {
        assert_eq!(
            format_salary(Some(5_000.0), None, Some("sgd"), Some("MONTH")),
            "From SGD 5K/mo"
        );
    }

    #[test]
    fn test_employment_type_labels() {
        assert_eq!(format_employment_type(Some("FULLTIME")), "Full-time");
        assert_eq!(format_employment_type(Some("CONTRACTOR")), "Contract");
        assert_eq!(format_employment_type(Some("TEMPORARY")), "Temporary");
        assert_eq!(format_employment_type(None), "Full-time");
    }

    #[test]
    fn test_location_formatting() {
        assert_eq!(
            format_location(&[Some("Austin"), Some("TX"), Some("US")], false),
            "Austin, TX, US"
        );
        assert_eq!(format_location(&[None, Some(" ")], true), "Remote");
        assert_eq!(
            format_location(&[Some("Berlin"), None], true),
            "Berlin (Remote)"
        );
        assert_eq!(format_location(&[], false), "Location not specified");
    }
}

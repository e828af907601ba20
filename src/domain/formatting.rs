use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::errors::{ChartError, ChartResult};

/// Index of the value with minimal absolute difference to `target`.
/// Ties resolve to the lowest index.
pub fn find_closest_index(target: f64, values: &[f64]) -> usize {
    let mut closest_index = 0;
    let mut smallest_diff = f64::INFINITY;
    for (index, value) in values.iter().enumerate() {
        let diff = (value - target).abs();
        if diff < smallest_diff {
            closest_index = index;
            smallest_diff = diff;
        }
    }
    closest_index
}

/// Axis label set that marks only the extremes of a series.
///
/// Returns one label per candidate tick value: the tick closest to the
/// series minimum renders the minimum, the tick closest to the maximum
/// renders the maximum, every other index renders empty. Tick positions
/// are not guaranteed to land exactly on data values, which is why the
/// nearest candidate is labeled instead of an exact match.
pub fn sparse_extreme_labels<F>(series: &[f64], ticks: &[f64], render: F) -> Vec<String>
where
    F: Fn(f64) -> String,
{
    let mut labels = vec![String::new(); ticks.len()];
    if series.is_empty() || ticks.is_empty() {
        return labels;
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    labels[find_closest_index(min, ticks)] = render(min);
    labels[find_closest_index(max, ticks)] = render(max);
    labels
}

/// Axis label set that keeps only the first, middle and last entry of an
/// ordered label list; dense time axes stay readable this way.
///
/// The middle index is `floor((n - 1) / 2)`. For short lists the chosen
/// indices may coincide; the output never duplicates a label.
pub fn sparse_temporal_labels<F>(labels: &[String], render: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let mut out = vec![String::new(); labels.len()];
    if labels.is_empty() {
        return out;
    }

    let last = labels.len() - 1;
    let middle = last / 2;
    for index in [0, middle, last] {
        if out[index].is_empty() {
            out[index] = render(&labels[index]);
        }
    }
    out
}

/// Descending unit table for coarse age rendering, in seconds.
const AGE_UNITS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Coarse "N units ago" rendering of a past timestamp.
///
/// The first unit whose count reaches 1 wins, pluralized above 1.
/// Sub-second ages (and timestamps not in the past) render "just now".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_seconds = (now - then).num_seconds();

    for (label, unit_seconds) in AGE_UNITS {
        let count = elapsed_seconds / unit_seconds;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{} {}{} ago", count, label, plural);
        }
    }

    "just now".to_string()
}

/// Parses an ISO-8601 timestamp and renders it through [`relative_age`].
/// Timestamps without an explicit offset are interpreted as UTC.
pub fn relative_age_from_iso(iso: &str, now: DateTime<Utc>) -> ChartResult<String> {
    let then = parse_iso_utc(iso)?;
    Ok(relative_age(then, now))
}

fn parse_iso_utc(iso: &str) -> ChartResult<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(iso) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ChartError::Deserialization(format!("invalid timestamp `{}`: {}", iso, e)))
}

/// Abbreviates a hex identifier to `0xabcd...1234` form for tooltip bodies.
/// Short identifiers pass through unchanged.
pub fn shorten_hash(hash: &str) -> String {
    if hash.len() <= 10 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
}

/// Number rendering for tick and tooltip text; whole values drop the
/// fractional part the way the embedded JSON wrote them.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Fills a tooltip body template, replacing the `{{value}}` and
/// `{{label}}` placeholders.
pub fn render_body_template(template: &str, value: &str, label: &str) -> String {
    template.replace("{{value}}", value).replace("{{label}}", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    #[test]
    fn closest_index_prefers_first_on_ties() {
        // 5.0 is equidistant from 4.0 and 6.0
        assert_eq!(find_closest_index(5.0, &[4.0, 6.0]), 0);
        assert_eq!(find_closest_index(5.0, &[0.0, 4.9, 10.0]), 1);
    }

    #[test]
    fn extremes_label_only_nearest_ticks() {
        let series = [3.0, 9.5, 4.2, 7.1];
        let ticks = [3.0, 5.0, 7.0, 9.0, 11.0];
        let labels = sparse_extreme_labels(&series, &ticks, |v| format!("{} USD", v));

        assert_eq!(labels[0], "3 USD");
        assert_eq!(labels[3], "9.5 USD");
        assert!(labels[1].is_empty());
        assert!(labels[2].is_empty());
        assert!(labels[4].is_empty());
    }

    #[test]
    fn temporal_labels_keep_first_middle_last() {
        let labels: Vec<String> = (0..7).map(|i| format!("t{}", i)).collect();
        let out = sparse_temporal_labels(&labels, |s| s.to_string());

        assert_eq!(out[0], "t0");
        assert_eq!(out[3], "t3");
        assert_eq!(out[6], "t6");
        assert_eq!(out.iter().filter(|l| !l.is_empty()).count(), 3);
    }

    #[test]
    fn temporal_labels_do_not_duplicate_on_short_lists() {
        let two: Vec<String> = vec!["a".into(), "b".into()];
        let out = sparse_temporal_labels(&two, |s| s.to_string());
        assert_eq!(out, vec!["a".to_string(), "b".to_string()]);

        let one: Vec<String> = vec!["only".into()];
        assert_eq!(sparse_temporal_labels(&one, |s| s.to_string()), vec!["only".to_string()]);
    }

    #[test]
    fn ninety_seconds_is_one_minute() {
        let now = at(1_000_000);
        assert_eq!(relative_age(now - TimeDelta::seconds(90), now), "1 minute ago");
    }

    #[test]
    fn sub_second_is_just_now() {
        let now = at(1_000_000);
        assert_eq!(relative_age(now, now), "just now");
    }

    #[test]
    fn four_hundred_days_is_one_year() {
        let now = at(100_000_000);
        assert_eq!(relative_age(now - TimeDelta::days(400), now), "1 year ago");
    }

    #[test]
    fn counts_pluralize() {
        let now = at(1_000_000);
        assert_eq!(relative_age(now - TimeDelta::hours(2), now), "2 hours ago");
        assert_eq!(relative_age(now - TimeDelta::days(13), now), "1 week ago");
    }

    #[test]
    fn iso_parse_accepts_offset_and_naive_forms() {
        let now = at(90);
        assert_eq!(relative_age_from_iso("1970-01-01T00:00:00Z", now).unwrap(), "1 minute ago");
        assert_eq!(relative_age_from_iso("1970-01-01T00:00:00", now).unwrap(), "1 minute ago");
        assert!(relative_age_from_iso("not-a-date", now).is_err());
    }

    #[test]
    fn hash_shortening() {
        assert_eq!(shorten_hash("0x123456789abcdef0"), "0x1234...def0");
        assert_eq!(shorten_hash("0xabc"), "0xabc");
    }

    #[test]
    fn body_template_substitution() {
        assert_eq!(
            render_body_template("{{value}} proofs at {{label}}", "42", "block 7"),
            "42 proofs at block 7"
        );
    }
}

use chrono::NaiveDateTime;

use crate::recur::{ExpansionOptions, TemplateEvent, expand_with};

pub struct OccurrenceCase {
    pub name: &'static str,
    /// JSON form of the template, as stored by the service.
    pub template: &'static str,
    pub reference: &'static str,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
    pub lookahead_years: Option<u32>,
}

#[expect(clippy::too_many_lines)]
pub fn occurrence_cases() -> Vec<OccurrenceCase> {
    vec![
        OccurrenceCase {
            name: "daily_count",
            template: r#"{
                "start": "2024-01-01T00:00:00",
                "end": "2024-01-01T00:30:00",
                "rule": {
                    "frequency": { "kind": "daily" },
                    "termination": { "kind": "after_count", "value": 3 }
                }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: Some(&[
                "2024-01-01T00:00:00",
                "2024-01-02T00:00:00",
                "2024-01-03T00:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "non_recurring",
            template: r#"{
                "start": "2024-06-01T10:00:00",
                "end": "2024-06-01T12:00:00"
            }"#,
            reference: "2000-01-01T00:00:00",
            expected: Some(&["2024-06-01T10:00:00"]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "weekly_until_inclusive",
            template: r#"{
                "start": "2024-03-04T10:00:00",
                "end": "2024-03-04T11:00:00",
                "rule": {
                    "frequency": { "kind": "weekly" },
                    "termination": { "kind": "until_date", "value": "2024-03-25" }
                }
            }"#,
            reference: "2024-03-01T00:00:00",
            expected: Some(&[
                "2024-03-04T10:00:00",
                "2024-03-11T10:00:00",
                "2024-03-18T10:00:00",
                "2024-03-25T10:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "monthly_clamps_day_31",
            template: r#"{
                "start": "2023-01-31T18:00:00",
                "end": "2023-01-31T19:00:00",
                "rule": {
                    "frequency": { "kind": "monthly" },
                    "termination": { "kind": "after_count", "value": 5 }
                }
            }"#,
            reference: "2023-01-01T00:00:00",
            expected: Some(&[
                "2023-01-31T18:00:00",
                "2023-02-28T18:00:00",
                "2023-03-31T18:00:00",
                "2023-04-30T18:00:00",
                "2023-05-31T18:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "yearly_leap_day",
            template: r#"{
                "start": "2024-02-29T08:00:00",
                "end": "2024-02-29T09:00:00",
                "rule": {
                    "frequency": { "kind": "yearly" },
                    "termination": { "kind": "after_count", "value": 5 }
                }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: Some(&[
                "2024-02-29T08:00:00",
                "2025-02-28T08:00:00",
                "2026-02-28T08:00:00",
                "2027-02-28T08:00:00",
                "2028-02-29T08:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "monthly_third_thursday",
            template: r#"{
                "start": "2024-01-18T19:00:00",
                "end": "2024-01-18T21:00:00",
                "rule": {
                    "frequency": { "kind": "monthly_by_weekday" },
                    "termination": { "kind": "after_count", "value": 4 }
                }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: Some(&[
                "2024-01-18T19:00:00",
                "2024-02-15T19:00:00",
                "2024-03-21T19:00:00",
                "2024-04-18T19:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "daily_ferial_skips_weekend",
            template: r#"{
                "start": "2024-02-01T09:00:00",
                "end": "2024-02-01T09:15:00",
                "rule": {
                    "frequency": { "kind": "daily_ferial" },
                    "termination": { "kind": "after_count", "value": 5 }
                }
            }"#,
            reference: "2024-02-01T00:00:00",
            expected: Some(&[
                "2024-02-01T09:00:00",
                "2024-02-02T09:00:00",
                "2024-02-05T09:00:00",
                "2024-02-06T09:00:00",
                "2024-02-07T09:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "custom_every_other_week_mon_fri",
            template: r#"{
                "start": "2024-01-03T07:00:00",
                "end": "2024-01-03T08:00:00",
                "rule": {
                    "frequency": {
                        "kind": "custom",
                        "unit": "weekly",
                        "interval": 2,
                        "days_of_week": [0, 4]
                    },
                    "termination": { "kind": "after_count", "value": 6 }
                }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: Some(&[
                "2024-01-03T07:00:00",
                "2024-01-05T07:00:00",
                "2024-01-15T07:00:00",
                "2024-01-17T07:00:00",
                "2024-01-19T07:00:00",
                "2024-01-29T07:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "custom_monthly_first_and_fifteenth",
            template: r#"{
                "start": "2024-01-15T12:00:00",
                "end": "2024-01-15T13:00:00",
                "rule": {
                    "frequency": {
                        "kind": "custom",
                        "unit": "monthly",
                        "days_of_month": [1]
                    },
                    "termination": { "kind": "after_count", "value": 4 }
                }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: Some(&[
                "2024-01-15T12:00:00",
                "2024-02-01T12:00:00",
                "2024-02-15T12:00:00",
                "2024-03-01T12:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "custom_yearly_march_and_september",
            template: r#"{
                "start": "2024-03-10T10:00:00",
                "end": "2024-03-10T11:00:00",
                "rule": {
                    "frequency": {
                        "kind": "custom",
                        "unit": "yearly",
                        "months_of_year": [8]
                    },
                    "termination": { "kind": "until_date", "value": "2025-12-31" }
                }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: Some(&[
                "2024-03-10T10:00:00",
                "2024-09-10T10:00:00",
                "2025-03-10T10:00:00",
                "2025-09-10T10:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "daily_forever_default_horizon",
            template: r#"{
                "start": "2024-01-01T00:00:00",
                "end": "2024-01-01T01:00:00",
                "rule": { "frequency": { "kind": "daily" } }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: None,
            // 2024-01-01 through 2034-01-01 inclusive
            expected_len: Some(3654),
            lookahead_years: None,
        },
        OccurrenceCase {
            name: "weekly_forever_short_horizon",
            template: r#"{
                "start": "2024-01-01T09:00:00",
                "end": "2024-01-01T10:00:00",
                "rule": { "frequency": { "kind": "weekly" } }
            }"#,
            reference: "2024-01-01T00:00:00",
            expected: None,
            // 52 weeks after the anchor still start before 2025-01-01
            expected_len: Some(53),
            lookahead_years: Some(1),
        },
        OccurrenceCase {
            name: "all_day_until_keeps_last_day_whole",
            template: r#"{
                "start": "2024-05-01T00:00:00",
                "end": "2024-05-01T00:00:00",
                "all_day": true,
                "rule": {
                    "frequency": { "kind": "weekly" },
                    "termination": { "kind": "until_date", "value": "2024-05-15" }
                }
            }"#,
            reference: "2024-05-01T00:00:00",
            expected: Some(&[
                "2024-05-01T00:00:00",
                "2024-05-08T00:00:00",
                "2024-05-15T00:00:00",
            ]),
            expected_len: None,
            lookahead_years: None,
        },
    ]
}

pub fn assert_case(case: &OccurrenceCase) {
    let template: TemplateEvent = serde_json::from_str(case.template)
        .unwrap_or_else(|err| panic!("Failed to parse template {}: {}", case.name, err));
    let reference = parse_datetime(case.reference);
    let options = case
        .lookahead_years
        .map_or_else(ExpansionOptions::default, |years| {
            ExpansionOptions::default().with_lookahead_years(years)
        });

    let occurrences = expand_with(&template, reference, &options)
        .unwrap_or_else(|err| panic!("Failed to expand {}: {}", case.name, err));
    let (start, end) = template.span().expect("valid template");
    let duration = end - start;

    for occurrence in &occurrences {
        assert_eq!(
            occurrence.duration(),
            duration,
            "Case {} changed the duration of cycle {}",
            case.name,
            occurrence.cycle_index
        );
    }

    if let Some(expected) = case.expected {
        let actual: Vec<NaiveDateTime> = occurrences.iter().map(|o| o.start).collect();
        let expected: Vec<NaiveDateTime> =
            expected.iter().map(|value| parse_datetime(value)).collect();
        assert_eq!(actual, expected, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            occurrences.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}

fn parse_datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .unwrap_or_else(|err| panic!("Failed to parse datetime value {value}: {err}"))
}

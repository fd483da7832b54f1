//! Human-readable summaries of recurrence rules, as shown next to agenda entries.

use std::fmt;

use chrono::Weekday;

use super::rule::{
    CustomSpec, CustomUnit, Frequency, NthWeek, RecurrenceRule, Termination, WeekOfMonth,
};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    name: impl FnMut(T) -> Option<String>,
) -> fmt::Result {
    let names: Vec<String> = items.into_iter().filter_map(name).collect();
    write!(f, "{}", names.join(", "))
}

impl fmt::Display for NthWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal() {
            Some(n) => write!(f, "{n}{}", ordinal_suffix(n)),
            None => f.write_str("last"),
        }
    }
}

impl fmt::Display for WeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.nth, weekday_name(self.weekday))
    }
}

impl fmt::Display for CustomSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self.unit {
            CustomUnit::Daily => "day",
            CustomUnit::Weekly => "week",
            CustomUnit::Monthly | CustomUnit::MonthlyByWeekday => "month",
            CustomUnit::Yearly => "year",
        };
        if self.interval == 1 {
            write!(f, "every {noun}")?;
        } else {
            write!(f, "every {} {noun}s", self.interval)?;
        }

        match self.unit {
            CustomUnit::Daily => Ok(()),
            CustomUnit::Weekly => {
                f.write_str(" on: ")?;
                write_list(f, &self.days_of_week, |day| {
                    Weekday::try_from(*day).ok().map(|weekday| weekday_name(weekday).to_string())
                })
            }
            CustomUnit::Monthly => {
                f.write_str(" on: ")?;
                write_list(f, &self.days_of_month, |day| {
                    Some(format!("{day}{}", ordinal_suffix(*day)))
                })
            }
            CustomUnit::MonthlyByWeekday => match &self.week_of_month {
                Some(week_of_month) => write!(f, " on: {week_of_month}"),
                None => Ok(()),
            },
            CustomUnit::Yearly => {
                f.write_str(" on: ")?;
                write_list(f, &self.months_of_year, |month| {
                    usize::try_from(*month)
                        .ok()
                        .and_then(|index| MONTHS.get(index))
                        .map(ToString::to_string)
                })
            }
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("does not repeat"),
            Self::Daily => f.write_str("every day"),
            Self::DailyFerial => f.write_str("every weekday"),
            Self::Weekly => f.write_str("every week"),
            Self::Monthly => f.write_str("every month"),
            Self::MonthlyByWeekday => f.write_str("every month on the same weekday"),
            Self::Yearly => f.write_str("every year"),
            Self::Custom(spec) => fmt::Display::fmt(spec, f),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("forever"),
            Self::UntilDate(day) => write!(f, "until {}", day.format("%Y-%m-%d")),
            Self::AfterCount(1) => f.write_str("once"),
            Self::AfterCount(count) => write!(f, "{count} times"),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frequency == Frequency::None {
            return fmt::Display::fmt(&self.frequency, f);
        }
        match self.termination {
            Termination::Never => fmt::Display::fmt(&self.frequency, f),
            termination => write!(f, "{}, {termination}", self.frequency),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_plain_frequencies() {
        assert_eq!(Frequency::None.to_string(), "does not repeat");
        assert_eq!(Frequency::Daily.to_string(), "every day");
        assert_eq!(Frequency::DailyFerial.to_string(), "every weekday");
        assert_eq!(Frequency::Yearly.to_string(), "every year");
    }

    #[test]
    fn test_custom_weekly() {
        let spec = CustomSpec::new(CustomUnit::Weekly)
            .with_interval(2)
            .with_days_of_week([2, 0]);
        assert_eq!(
            Frequency::Custom(spec).to_string(),
            "every 2 weeks on: mon, wed"
        );
    }

    #[test]
    fn test_weekday_names_match_between_selectors() {
        for (index, weekday) in [(0, Weekday::Mon), (3, Weekday::Thu), (6, Weekday::Sun)] {
            let weekly = CustomSpec::new(CustomUnit::Weekly).with_days_of_week([index]);
            let by_weekday = CustomSpec::new(CustomUnit::MonthlyByWeekday).with_week_of_month(
                WeekOfMonth {
                    nth: NthWeek::First,
                    weekday,
                },
            );

            let name = weekday_name(weekday);
            assert_eq!(weekly.to_string(), format!("every week on: {name}"));
            assert_eq!(by_weekday.to_string(), format!("every month on: 1st {name}"));
        }
    }

    #[test]
    fn test_custom_monthly_days() {
        let spec = CustomSpec::new(CustomUnit::Monthly).with_days_of_month([1, 2, 3, 11, 22, 31]);
        assert_eq!(
            spec.to_string(),
            "every month on: 1st, 2nd, 3rd, 11th, 22nd, 31st"
        );
    }

    #[test]
    fn test_custom_monthly_by_weekday() {
        let third_thursday = CustomSpec::new(CustomUnit::MonthlyByWeekday).with_week_of_month(
            WeekOfMonth {
                nth: NthWeek::Third,
                weekday: Weekday::Thu,
            },
        );
        let last_friday = CustomSpec::new(CustomUnit::MonthlyByWeekday)
            .with_interval(3)
            .with_week_of_month(WeekOfMonth {
                nth: NthWeek::Last,
                weekday: Weekday::Fri,
            });

        assert_eq!(third_thursday.to_string(), "every month on: 3rd thu");
        assert_eq!(last_friday.to_string(), "every 3 months on: last fri");
    }

    #[test]
    fn test_custom_yearly() {
        let spec = CustomSpec::new(CustomUnit::Yearly).with_months_of_year([6, 0]);
        assert_eq!(spec.to_string(), "every year on: jan, jul");
    }

    #[test]
    fn test_custom_daily_interval() {
        let spec = CustomSpec::new(CustomUnit::Daily).with_interval(10);
        assert_eq!(spec.to_string(), "every 10 days");
    }

    #[test]
    fn test_rule_with_termination() {
        let until = RecurrenceRule::new(Frequency::Weekly)
            .until(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"));
        let count = RecurrenceRule::new(Frequency::Monthly).count(3);
        let once = RecurrenceRule::new(Frequency::Daily).count(1);

        assert_eq!(until.to_string(), "every week, until 2024-03-01");
        assert_eq!(count.to_string(), "every month, 3 times");
        assert_eq!(once.to_string(), "every day, once");
        assert_eq!(RecurrenceRule::new(Frequency::Daily).to_string(), "every day");
    }

    #[test]
    fn test_non_recurring_ignores_termination() {
        let rule = RecurrenceRule::default().count(5);
        assert_eq!(rule.to_string(), "does not repeat");
    }
}

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;

use crate::model::{attendance::AttendanceRecord, role::Role, user::UserAccount};

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SalaryError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("salary of {0} does not fit in a decimal")]
    Overflow(String),
}

/// Hours and pay for one user over an inclusive date range. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "username": "barista1",
    "role": "staff",
    "start_date": "2026-01-01",
    "end_date": "2026-01-31",
    "total_hours": 8.0,
    "hourly_rate": 30000,
    "total_salary": 240000
}))]
pub struct SalaryReport {
    pub username: String,
    pub role: Role,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rounded half-up to 2 decimal places.
    #[schema(value_type = f64)]
    pub total_hours: Decimal,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
    /// Rounded half-up to a whole currency unit.
    #[schema(value_type = f64)]
    pub total_salary: Decimal,
}

/// Sums completed shifts whose check-in date lies in `[start, end]`.
///
/// Open shifts and shifts with `check_out <= check_in` contribute nothing.
/// Records with unparseable timestamps are skipped with a warning.
pub fn worked_seconds(
    records: &[AttendanceRecord],
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    let mut total = 0i64;

    for record in records.iter().filter(|r| r.username == username) {
        let Some(check_in) = record.check_in_at() else {
            warn!(record_id = %record.id, check_in = %record.check_in, "Skipping record with malformed check-in");
            continue;
        };
        let check_out = match record.check_out_at() {
            None => continue,
            Some(Some(ts)) => ts,
            Some(None) => {
                warn!(record_id = %record.id, check_out = ?record.check_out, "Skipping record with malformed check-out");
                continue;
            }
        };

        let day = check_in.date();
        if day < start || day > end {
            continue;
        }

        let seconds = (check_out - check_in).num_seconds();
        if seconds > 0 {
            total += seconds;
        }
    }

    total
}

/// Computes the salary report for `username`.
///
/// The account's current hourly rate is applied to the whole range.
pub fn calculate_salary(
    users: &[UserAccount],
    records: &[AttendanceRecord],
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SalaryReport, SalaryError> {
    let user = users
        .iter()
        .find(|u| u.username == username)
        .ok_or_else(|| SalaryError::UserNotFound(username.to_string()))?;

    report_for(user, records, start, end)
}

/// Reports for every hourly-paid account, sorted by username.
pub fn salary_reports(
    users: &[UserAccount],
    records: &[AttendanceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SalaryReport>, SalaryError> {
    let mut reports = users
        .iter()
        .filter(|u| u.role.is_hourly())
        .map(|u| report_for(u, records, start, end))
        .collect::<Result<Vec<_>, _>>()?;
    reports.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(reports)
}

fn report_for(
    user: &UserAccount,
    records: &[AttendanceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SalaryReport, SalaryError> {
    let (hours, salary) = if user.role.is_hourly() {
        let seconds = Decimal::from(worked_seconds(records, &user.username, start, end));
        let exact_hours = seconds / Decimal::from(SECONDS_PER_HOUR);
        let pay = exact_hours
            .checked_mul(user.hourly_rate)
            .ok_or_else(|| SalaryError::Overflow(user.username.clone()))?;
        (
            exact_hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            pay.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    Ok(SalaryReport {
        username: user.username.clone(),
        role: user.role,
        start_date: start,
        end_date: end,
        total_hours: hours,
        hourly_rate: user.hourly_rate,
        total_salary: salary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn user(name: &str, role: Role, rate: i64) -> UserAccount {
        UserAccount {
            username: name.to_string(),
            password: String::new(),
            role,
            hourly_rate: Decimal::from(rate),
        }
    }

    fn shift(name: &str, check_in: &str, check_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("{name}-{check_in}"),
            username: name.to_string(),
            check_in: check_in.to_string(),
            check_out: check_out.map(str::to_string),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    #[test]
    fn eight_hour_shift_at_thirty_thousand() {
        let users = vec![user("an", Role::Staff, 30_000)];
        let records = vec![shift("an", "2026-01-05T09:00:00", Some("2026-01-05T17:00:00"))];

        let report =
            calculate_salary(&users, &records, "an", date("2026-01-01"), date("2026-01-31")).unwrap();

        assert_eq!(report.total_hours, Decimal::from_str("8.00").unwrap());
        assert_eq!(report.total_salary, Decimal::from(240_000));
    }

    #[test]
    fn admin_is_never_paid() {
        let users = vec![user("boss", Role::Admin, 50_000)];
        let records = vec![shift("boss", "2026-01-05T09:00:00", Some("2026-01-05T17:00:00"))];

        let report =
            calculate_salary(&users, &records, "boss", date("2026-01-01"), date("2026-01-31")).unwrap();

        assert_eq!(report.total_hours, Decimal::ZERO);
        assert_eq!(report.total_salary, Decimal::ZERO);
    }

    #[test]
    fn oversized_rate_is_an_error_not_a_panic() {
        let mut an = user("an", Role::Staff, 0);
        an.hourly_rate = Decimal::MAX;
        let records = vec![shift("an", "2026-01-05T09:00:00", Some("2026-01-05T17:00:00"))];

        let err = calculate_salary(&[an], &records, "an", date("2026-01-01"), date("2026-01-31"))
            .unwrap_err();
        assert_eq!(err, SalaryError::Overflow("an".into()));
    }

    #[test]
    fn unknown_user_is_an_error() {
        let err = calculate_salary(&[], &[], "ghost", date("2026-01-01"), date("2026-01-31"))
            .unwrap_err();
        assert_eq!(err, SalaryError::UserNotFound("ghost".into()));
    }

    #[test]
    fn no_records_in_range_is_zero() {
        let users = vec![user("an", Role::Parttime, 25_000)];
        let records = vec![shift("an", "2025-12-30T09:00:00", Some("2025-12-30T12:00:00"))];

        let report =
            calculate_salary(&users, &records, "an", date("2026-01-01"), date("2026-01-31")).unwrap();

        assert_eq!(report.total_hours, Decimal::ZERO);
        assert_eq!(report.total_salary, Decimal::ZERO);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let records = vec![
            shift("an", "2026-01-01T08:00:00", Some("2026-01-01T09:00:00")),
            shift("an", "2026-01-31T23:00:00", Some("2026-02-01T01:00:00")),
            shift("an", "2026-02-01T08:00:00", Some("2026-02-01T09:00:00")),
        ];
        let seconds = worked_seconds(&records, "an", date("2026-01-01"), date("2026-01-31"));
        assert_eq!(seconds, 3 * 3600);
    }

    #[test]
    fn skips_open_negative_and_malformed_records() {
        let records = vec![
            shift("an", "2026-01-05T09:00:00", Some("2026-01-05T10:30:00")),
            shift("an", "2026-01-06T09:00:00", None),
            shift("an", "2026-01-07T12:00:00", Some("2026-01-07T11:00:00")),
            shift("an", "2026-01-08T12:00:00", Some("2026-01-08T12:00:00")),
            shift("an", "garbage", Some("2026-01-09T12:00:00")),
            shift("an", "2026-01-10T09:00:00", Some("not a time")),
            shift("other", "2026-01-05T09:00:00", Some("2026-01-05T17:00:00")),
        ];
        let seconds = worked_seconds(&records, "an", date("2026-01-01"), date("2026-01-31"));
        assert_eq!(seconds, 90 * 60);
    }

    #[test]
    fn pay_rounds_half_up_to_whole_units() {
        // 20 minutes at 10 001 per hour = 3333.666..., rounds to 3334
        let users = vec![user("an", Role::Staff, 10_001)];
        let records = vec![shift("an", "2026-01-05T09:00:00", Some("2026-01-05T09:20:00"))];

        let report =
            calculate_salary(&users, &records, "an", date("2026-01-01"), date("2026-01-31")).unwrap();

        assert_eq!(report.total_hours, Decimal::from_str("0.33").unwrap());
        assert_eq!(report.total_salary, Decimal::from(3334));
    }

    #[test]
    fn half_unit_rounds_away_from_zero() {
        // 30 minutes at 3 per hour = 1.5
        let users = vec![user("an", Role::Staff, 3)];
        let records = vec![shift("an", "2026-01-05T09:00:00", Some("2026-01-05T09:30:00"))];

        let report =
            calculate_salary(&users, &records, "an", date("2026-01-05"), date("2026-01-05")).unwrap();

        assert_eq!(report.total_salary, Decimal::from(2));
    }

    #[test]
    fn reversed_range_matches_nothing() {
        let users = vec![user("an", Role::Staff, 30_000)];
        let records = vec![shift("an", "2026-01-05T09:00:00", Some("2026-01-05T17:00:00"))];

        let report =
            calculate_salary(&users, &records, "an", date("2026-01-31"), date("2026-01-01")).unwrap();
        assert_eq!(report.total_salary, Decimal::ZERO);
    }

    #[test]
    fn bulk_reports_skip_admins_and_sort() {
        let users = vec![
            user("zed", Role::Staff, 20_000),
            user("boss", Role::Admin, 0),
            user("amy", Role::Parttime, 25_000),
        ];
        let records = vec![shift("amy", "2026-01-05T09:00:00", Some("2026-01-05T11:00:00"))];

        let reports =
            salary_reports(&users, &records, date("2026-01-01"), date("2026-01-31")).unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
        assert_eq!(reports[0].total_salary, Decimal::from(50_000));
        assert_eq!(reports[1].total_salary, Decimal::ZERO);
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::model::attendance::{AttendanceRecord, format_timestamp};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("already checked in")]
    AlreadyCheckedIn,

    #[error("no check-in found")]
    NoCheckInFound,

    #[error("already checked out")]
    AlreadyCheckedOut,
}

/// The user's record with the greatest check-in timestamp.
pub fn last_record<'a>(
    records: &'a [AttendanceRecord],
    username: &str,
) -> Option<&'a AttendanceRecord> {
    last_index(records, username).map(|i| &records[i])
}

fn last_index(records: &[AttendanceRecord], username: &str) -> Option<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.username == username)
        .filter_map(|(i, r)| match r.check_in_at() {
            Some(ts) => Some((i, ts)),
            None => {
                warn!(record_id = %r.id, check_in = %r.check_in, "Ignoring record with malformed check-in");
                None
            }
        })
        .max_by_key(|(_, ts)| *ts)
        .map(|(i, _)| i)
}

/// Opens a shift at `now`.
///
/// Fails if the user already has an open shift that started on the same
/// calendar day. An unclosed shift from an earlier day does not block.
pub fn check_in(
    records: &mut Vec<AttendanceRecord>,
    username: &str,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, AttendanceError> {
    let today = now.date();
    let open_today = records.iter().any(|r| {
        r.username == username && r.check_out.is_none() && r.check_in_date() == Some(today)
    });
    if open_today {
        return Err(AttendanceError::AlreadyCheckedIn);
    }

    let record = AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        check_in: format_timestamp(now),
        check_out: None,
    };
    records.push(record.clone());
    Ok(record)
}

/// Closes the user's last shift at `now`. The shift must have started today.
pub fn check_out(
    records: &mut [AttendanceRecord],
    username: &str,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, AttendanceError> {
    let idx = last_index(records, username).ok_or(AttendanceError::NoCheckInFound)?;
    let record = &mut records[idx];

    if record.check_in_date() != Some(now.date()) {
        return Err(AttendanceError::NoCheckInFound);
    }
    if record.check_out.is_some() {
        return Err(AttendanceError::AlreadyCheckedOut);
    }

    record.check_out = Some(format_timestamp(now));
    Ok(record.clone())
}

/// Records filtered by user and by check-in date, newest first.
/// Records whose check-in cannot be parsed are kept only when no date bound is given.
pub fn filter_records(
    records: &[AttendanceRecord],
    username: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<AttendanceRecord> {
    let mut out: Vec<_> = records
        .iter()
        .filter(|r| username.is_none_or(|u| r.username == u))
        .filter(|r| {
            if start.is_none() && end.is_none() {
                return true;
            }
            match r.check_in_date() {
                Some(day) => start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e),
                None => false,
            }
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| b.check_in_at().cmp(&a.check_in_at()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn check_in_then_out() {
        let mut records = Vec::new();
        let opened = check_in(&mut records, "an", at("2026-01-05T09:00:00")).unwrap();
        assert!(opened.check_out.is_none());

        let closed = check_out(&mut records, "an", at("2026-01-05T17:00:00")).unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.check_out.as_deref(), Some("2026-01-05T17:00:00.000000"));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn double_check_in_same_day_fails() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-05T09:00:00")).unwrap();
        let err = check_in(&mut records, "an", at("2026-01-05T10:00:00")).unwrap_err();
        assert_eq!(err, AttendanceError::AlreadyCheckedIn);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn check_in_again_after_check_out() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-05T07:00:00")).unwrap();
        check_out(&mut records, "an", at("2026-01-05T11:00:00")).unwrap();
        check_in(&mut records, "an", at("2026-01-05T15:00:00")).unwrap();

        let last = last_record(&records, "an").unwrap();
        assert_eq!(last.check_in, "2026-01-05T15:00:00.000000");
    }

    #[test]
    fn yesterdays_open_shift_does_not_block() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-04T09:00:00")).unwrap();
        assert!(check_in(&mut records, "an", at("2026-01-05T09:00:00")).is_ok());
    }

    #[test]
    fn other_users_do_not_interfere() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-05T09:00:00")).unwrap();
        assert!(check_in(&mut records, "binh", at("2026-01-05T09:05:00")).is_ok());
        let err = check_out(&mut records, "chi", at("2026-01-05T10:00:00")).unwrap_err();
        assert_eq!(err, AttendanceError::NoCheckInFound);
    }

    #[test]
    fn check_out_without_check_in_fails() {
        let mut records = Vec::new();
        let err = check_out(&mut records, "an", at("2026-01-05T17:00:00")).unwrap_err();
        assert_eq!(err, AttendanceError::NoCheckInFound);
    }

    #[test]
    fn check_out_of_previous_day_shift_fails() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-04T22:00:00")).unwrap();
        let err = check_out(&mut records, "an", at("2026-01-05T02:00:00")).unwrap_err();
        assert_eq!(err, AttendanceError::NoCheckInFound);
    }

    #[test]
    fn double_check_out_fails() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-05T09:00:00")).unwrap();
        check_out(&mut records, "an", at("2026-01-05T12:00:00")).unwrap();
        let err = check_out(&mut records, "an", at("2026-01-05T13:00:00")).unwrap_err();
        assert_eq!(err, AttendanceError::AlreadyCheckedOut);
    }

    #[test]
    fn last_record_skips_malformed_check_in() {
        let records = vec![
            AttendanceRecord {
                id: "1".into(),
                username: "an".into(),
                check_in: "2026-01-05T09:00:00".into(),
                check_out: None,
            },
            AttendanceRecord {
                id: "2".into(),
                username: "an".into(),
                check_in: "??".into(),
                check_out: None,
            },
        ];
        assert_eq!(last_record(&records, "an").unwrap().id, "1");
    }

    #[test]
    fn filter_by_user_and_range_newest_first() {
        let mut records = Vec::new();
        check_in(&mut records, "an", at("2026-01-03T09:00:00")).unwrap();
        check_in(&mut records, "an", at("2026-01-05T09:00:00")).unwrap();
        check_in(&mut records, "binh", at("2026-01-05T09:00:00")).unwrap();
        check_in(&mut records, "an", at("2026-01-09T09:00:00")).unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 1, 3);
        let end = NaiveDate::from_ymd_opt(2026, 1, 5);
        let found = filter_records(&records, Some("an"), start, end);
        let days: Vec<_> = found.iter().map(|r| r.check_in.as_str()).collect();
        assert_eq!(
            days,
            vec!["2026-01-05T09:00:00.000000", "2026-01-03T09:00:00.000000"]
        );
        assert_eq!(filter_records(&records, None, None, None).len(), 4);
    }
}

//! Submitting a completed worklog.

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use super::{WorklogParams, WorklogResult};
use crate::api::WorklogApi;
use crate::issue;

/// What was sent, for display after a successful submission.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Submission {
    /// Issue the worklog was added to.
    pub issue_key: String,
    /// Duration sent.
    pub time_spent: String,
    /// Start timestamp sent.
    pub started: String,
    /// Issue URL in the web UI.
    pub browse_url: String,
}

/// UTC offset of `tz` at the wall-clock start `date` + `time`.
///
/// A time repeated by a daylight-saving change takes the earlier offset.
/// When the pair doesn't parse as `YYYY-MM-DD` + `HH:MM`, or names a time
/// skipped by a change, the offset in effect now is used instead; the server
/// is left to reject malformed values.
pub fn offset_at<Tz: TimeZone>(tz: &Tz, date: &str, time: &str) -> FixedOffset {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M")
        .ok()
        .and_then(|start| tz.from_local_datetime(&start).earliest())
        .map_or_else(
            || tz.from_utc_datetime(&Utc::now().naive_utc()).offset().fix(),
            |start| start.offset().fix(),
        )
}

/// Join a date and a time into Jira's timestamp format:
/// `2023-01-01` + `09:00` → `2023-01-01T09:00:00.000+0100`.
///
/// Neither part is validated; the server rejects malformed values.
pub fn started_timestamp(date: &str, time: &str, offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.unsigned_abs();
    format!(
        "{date}T{time}:00.000{sign}{:02}{:02}",
        secs / 3600,
        (secs % 3600) / 60
    )
}

/// Create the worklog through `api`.
///
/// The start is interpreted as wall-clock time in `tz` (normally
/// [`chrono::Local`]). No retry: any API error is returned as-is.
#[instrument(skip_all, fields(issue_key = %params.issue_key))]
pub fn submit<A, Tz>(
    params: &WorklogParams,
    api: &A,
    server: &str,
    tz: &Tz,
) -> WorklogResult<Submission>
where
    A: WorklogApi + ?Sized,
    Tz: TimeZone,
{
    let offset = offset_at(tz, &params.started_date, &params.started_time);
    let started = started_timestamp(&params.started_date, &params.started_time, offset);

    api.add_issue_worklog(
        &params.issue_key,
        &params.comment,
        &started,
        &params.time_spent,
    )?;
    info!(%started, time_spent = %params.time_spent, "worklog added");

    Ok(Submission {
        issue_key: params.issue_key.clone(),
        time_spent: params.time_spent.clone(),
        started,
        browse_url: issue::browse_url(server, &params.issue_key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiResult};
    use crate::worklog::{AddFlags, WorklogError};
    use std::cell::RefCell;

    #[derive(Debug, PartialEq, Eq)]
    struct Call {
        issue_key: String,
        comment: String,
        started: String,
        time_spent: String,
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        fail: bool,
    }

    impl WorklogApi for Recorder {
        fn add_issue_worklog(
            &self,
            issue_key: &str,
            comment: &str,
            started: &str,
            time_spent: &str,
        ) -> ApiResult<()> {
            self.calls.borrow_mut().push(Call {
                issue_key: issue_key.to_string(),
                comment: comment.to_string(),
                started: started.to_string(),
                time_spent: time_spent.to_string(),
            });
            if self.fail {
                Err(ApiError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn plus_one() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn timestamp_format() {
        assert_eq!(
            started_timestamp("2023-01-01", "09:00", plus_one()),
            "2023-01-01T09:00:00.000+0100"
        );
    }

    #[test]
    fn timestamp_negative_and_half_hour_offsets() {
        let minus = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            started_timestamp("2023-06-30", "23:59", minus),
            "2023-06-30T23:59:00.000-0500"
        );
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(
            started_timestamp("2023-06-30", "08:15", india),
            "2023-06-30T08:15:00.000+0530"
        );
    }

    #[test]
    fn offset_comes_from_the_zone() {
        assert_eq!(offset_at(&plus_one(), "2026-01-15", "09:00"), plus_one());
        assert_eq!(offset_at(&Utc, "2026-07-15", "09:00").local_minus_utc(), 0);
    }

    #[test]
    fn unparsable_start_uses_current_offset() {
        assert_eq!(offset_at(&plus_one(), "yesterday", "9am"), plus_one());
        assert_eq!(offset_at(&plus_one(), "", ""), plus_one());
    }

    #[test]
    fn submission_passes_arguments_through() {
        let params = WorklogParams::resolve(
            &["PROJ-1", "2h", "Did work", "2023-01-01", "09:00"],
            AddFlags::default(),
            Some("PROJ"),
        )
        .unwrap();
        let api = Recorder::default();

        let submission = submit(&params, &api, "https://jira.example.com/", &plus_one()).unwrap();

        assert_eq!(
            *api.calls.borrow(),
            [Call {
                issue_key: "PROJ-1".to_string(),
                comment: "Did work".to_string(),
                started: "2023-01-01T09:00:00.000+0100".to_string(),
                time_spent: "2h".to_string(),
            }]
        );
        assert_eq!(submission.browse_url, "https://jira.example.com/browse/PROJ-1");
        assert_eq!(submission.started, "2023-01-01T09:00:00.000+0100");
    }

    #[test]
    fn api_error_is_returned_without_retry() {
        let params = WorklogParams {
            issue_key: "PROJ-1".to_string(),
            time_spent: "1h".to_string(),
            ..WorklogParams::default()
        };
        let api = Recorder {
            fail: true,
            ..Recorder::default()
        };

        let err = submit(&params, &api, "https://jira.example.com", &plus_one()).unwrap_err();

        assert!(matches!(err, WorklogError::Api(ApiError::Network(_))));
        assert_eq!(api.calls.borrow().len(), 1);
    }
}

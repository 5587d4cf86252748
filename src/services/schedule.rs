use crate::domain::constants::DEFAULT_EVENT_HOUR_UTC;
use crate::domain::models::{GroupId, ScheduledEvent};
use crate::error::SantaError;
use crate::platform::Calendar;
use chrono::{DateTime, NaiveDate, Utc};

/// Accepts `YYYY-MM-DD` (evening UTC) or RFC 3339; the result must lie after `now`.
pub fn parse_event_start(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, SantaError> {
    let raw = raw.trim();
    let start = if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        ts.with_timezone(&Utc)
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(DEFAULT_EVENT_HOUR_UTC, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| {
                SantaError::InvalidDate(format!(
                    "`{}` is neither YYYY-MM-DD nor an RFC 3339 timestamp",
                    raw
                ))
            })?
    };
    if start <= now {
        return Err(SantaError::InvalidDate(format!(
            "{} is not in the future",
            start.format("%Y-%m-%d %H:%M UTC")
        )));
    }
    Ok(start)
}

pub fn schedule_reply(event: &ScheduledEvent) -> String {
    format!(
        "{} is scheduled for {} at {}.",
        event.name,
        event.start.format("%Y-%m-%d %H:%M UTC"),
        event.location
    )
}

pub async fn schedule_event<C: Calendar + ?Sized>(
    calendar: &C,
    group: &GroupId,
    name: &str,
    start: DateTime<Utc>,
    location: &str,
) -> Result<ScheduledEvent, SantaError> {
    let event = ScheduledEvent {
        name: name.to_string(),
        start,
        location: location.trim().to_string(),
    };
    calendar.create_scheduled_event(group, event.clone()).await?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn bare_dates_land_in_the_evening() {
        let start = parse_event_start("2026-12-24", now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 12, 24, 18, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_keeps_its_offset() {
        let start = parse_event_start("2026-12-24T20:30:00+01:00", now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 12, 24, 19, 30, 0).unwrap());
    }

    #[test]
    fn past_and_garbage_dates_are_refused() {
        assert!(matches!(
            parse_event_start("2025-12-24", now()),
            Err(SantaError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_event_start("christmas", now()),
            Err(SantaError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_event_start("2026-02-30", now()),
            Err(SantaError::InvalidDate(_))
        ));
    }

    #[test]
    fn reply_mentions_date_and_place() {
        let event = ScheduledEvent {
            name: "Secret Santa".to_string(),
            start: Utc.with_ymd_and_hms(2026, 12, 24, 18, 0, 0).unwrap(),
            location: "Town Hall".to_string(),
        };
        assert_eq!(
            schedule_reply(&event),
            "Secret Santa is scheduled for 2026-12-24 18:00 UTC at Town Hall."
        );
    }
}

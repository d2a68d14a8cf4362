// One-off and repeating scheduled messages
// Timers live only in this process; nothing survives a restart

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use poise::serenity_prelude as serenity;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{error, info};

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid date/time `{0}`, expected YYYY-MM-DD HH:MM")]
    InvalidDateTime(String),
    #[error("invalid timezone `{0}`, expected UTC, UTC+N or UTC-N")]
    InvalidTimezone(String),
    #[error("the scheduled time is in the past")]
    InPast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum RepeatMode {
    #[name = "None"]
    Once,
    Daily,
    Weekly,
}

impl RepeatMode {
    pub fn period(self) -> Option<Duration> {
        match self {
            Self::Once => None,
            Self::Daily => Some(DAY),
            Self::Weekly => Some(DAY * 7),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Once => "No",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// `UTC`, `UTC+N` or `UTC-N` (whole hours)
pub fn parse_utc_offset(timezone: &str) -> Result<FixedOffset, ScheduleError> {
    let invalid = || ScheduleError::InvalidTimezone(timezone.to_string());
    let tz = timezone.trim();

    let rest = tz.strip_prefix("UTC").ok_or_else(invalid)?;
    if rest.is_empty() {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, digits) = if let Some(digits) = rest.strip_prefix('+') {
        (1, digits)
    } else if let Some(digits) = rest.strip_prefix('-') {
        (-1, digits)
    } else {
        return Err(invalid());
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits.parse().map_err(|_| invalid())?;

    hours
        .checked_mul(3600)
        .and_then(|secs| FixedOffset::east_opt(sign * secs))
        .ok_or_else(invalid)
}

/// Resolve a local `YYYY-MM-DD HH:MM` in the given offset to a future UTC instant
pub fn parse_schedule(
    date_time: &str,
    timezone: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let offset = parse_utc_offset(timezone)?;
    let naive = NaiveDateTime::parse_from_str(date_time.trim(), DATE_TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidDateTime(date_time.to_string()))?;

    let at = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ScheduleError::InvalidDateTime(date_time.to_string()))?
        .with_timezone(&Utc);

    if at <= now {
        return Err(ScheduleError::InPast);
    }
    Ok(at)
}

/// Wait `delay`, send once, then keep sending every period of `repeat`.
/// Repeats only start after the first send succeeded.
pub async fn run_schedule<F, Fut>(delay: Duration, repeat: RepeatMode, mut send: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    sleep(delay).await;
    if let Err(e) = send().await {
        error!("Failed to send scheduled message: {:?}", e);
        return;
    }

    let Some(period) = repeat.period() else {
        return;
    };
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;
        if let Err(e) = send().await {
            error!("Failed to send repeated message: {:?}", e);
        }
    }
}

/// Arm the timer for a scheduled message in `channel_id`
pub fn schedule_message(
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    content: String,
    at: DateTime<Utc>,
    repeat: RepeatMode,
) -> JoinHandle<()> {
    let delay = (at - Utc::now()).to_std().unwrap_or_default();
    info!(
        "Scheduled message for channel {} at {} (repeat: {:?})",
        channel_id, at, repeat
    );

    tokio::spawn(async move {
        run_schedule(delay, repeat, || {
            let http = Arc::clone(&http);
            let content = content.clone();
            async move {
                channel_id.say(&*http, content).await?;
                Ok(())
            }
        })
        .await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("UTC+3").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_utc_offset("UTC-5").unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(parse_utc_offset(" UTC+12 ").unwrap().local_minus_utc(), 12 * 3600);
    }

    #[test]
    fn test_reject_bad_offsets() {
        for tz in ["GMT", "UTC+", "UTC3", "UTC+3:30", "UTC+99", "utc+1", "UTC++1"] {
            assert_eq!(
                parse_utc_offset(tz),
                Err(ScheduleError::InvalidTimezone(tz.to_string())),
                "{tz}"
            );
        }
    }

    #[test]
    fn test_offset_is_applied() {
        let at = parse_schedule("2099-01-01 10:00", "UTC+2", now()).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2099, 1, 1, 8, 0, 0).unwrap());

        let at = parse_schedule("2099-01-01 22:30", "UTC-3", now()).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2099, 1, 2, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_reject_bad_dates() {
        assert!(matches!(
            parse_schedule("2099-13-01 10:00", "UTC", now()),
            Err(ScheduleError::InvalidDateTime(_))
        ));
        assert!(matches!(
            parse_schedule("tomorrow", "UTC", now()),
            Err(ScheduleError::InvalidDateTime(_))
        ));
        assert_eq!(
            parse_schedule("2020-01-01 10:00", "UTC", now()),
            Err(ScheduleError::InPast)
        );
        assert_eq!(
            parse_schedule("2026-10-18 12:00", "UTC", now()),
            Err(ScheduleError::InPast)
        );
    }

    fn counting_sender(count: &Arc<AtomicUsize>) -> impl FnMut() -> futures::future::Ready<anyhow::Result<()>> {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_sends_once() {
        let count = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_schedule(
            Duration::from_secs(3600),
            RepeatMode::Once,
            counting_sender(&count),
        ));

        sleep(Duration::from_secs(3599)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(DAY * 14).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_daily_repeats() {
        let count = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_schedule(
            Duration::from_secs(60),
            RepeatMode::Daily,
            counting_sender(&count),
        ));

        sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(DAY * 2).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_first_send_stops_repeats() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        tokio::spawn(run_schedule(Duration::from_secs(1), RepeatMode::Weekly, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Err(anyhow::anyhow!("channel gone")))
        }));

        sleep(DAY * 30).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}

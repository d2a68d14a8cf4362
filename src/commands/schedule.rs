// Schedule command - send a message later, optionally repeating

use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

use crate::commands::reply_ephemeral;
use crate::features::scheduler::{parse_schedule, schedule_message as arm_timer, RepeatMode, ScheduleError};
use crate::{Context, Error};

fn error_message(err: &ScheduleError) -> String {
    match err {
        ScheduleError::InvalidTimezone(tz) => format!(
            "Invalid timezone `{}`. Use UTC, UTC+N or UTC-N (e.g., UTC+3).",
            tz
        ),
        ScheduleError::InvalidDateTime(_) | ScheduleError::InPast => {
            "Invalid date/time format or the time is in the past. Please use the format YYYY-MM-DD HH:MM and select a future time.".to_string()
        }
    }
}

fn confirmation(
    channel_id: serenity::ChannelId,
    at: DateTime<Utc>,
    timezone: &str,
    message: &str,
    repeat: RepeatMode,
) -> String {
    format!(
        "Your message has been scheduled to send in <#{}> on <t:{}:F> ({}).\nMessage: \"{}\"\nRepeat: {}",
        channel_id,
        at.timestamp(),
        timezone,
        message,
        repeat.label()
    )
}

/// Schedule a message to be sent at a specific date and time
#[poise::command(slash_command, rename = "schedule-message", guild_only)]
pub async fn schedule_message(
    ctx: Context<'_>,
    #[description = "The message to send"] message: String,
    #[rename = "date-time"]
    #[description = "The date and time to send the message (format: YYYY-MM-DD HH:MM)"]
    date_time: String,
    #[description = "The channel where the message will be sent"] channel: serenity::Channel,
    #[description = "The time zone to use for the scheduled time (e.g., UTC, UTC+3, UTC-5)"]
    timezone: Option<String>,
    #[description = "Should this message repeat? (Daily, Weekly)"] repeat: Option<RepeatMode>,
) -> Result<(), Error> {
    let timezone = timezone.unwrap_or_else(|| "UTC".to_string());
    let repeat = repeat.unwrap_or(RepeatMode::Once);

    let at = match parse_schedule(&date_time, &timezone, Utc::now()) {
        Ok(at) => at,
        Err(e) => return reply_ephemeral(ctx, error_message(&e)).await,
    };

    let channel_id = channel.id();
    reply_ephemeral(ctx, confirmation(channel_id, at, &timezone, &message, repeat)).await?;

    arm_timer(
        ctx.serenity_context().http.clone(),
        channel_id,
        message,
        at,
        repeat,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_confirmation() {
        let at = Utc.with_ymd_and_hms(2099, 1, 1, 8, 0, 0).unwrap();
        let text = confirmation(serenity::ChannelId::new(42), at, "UTC+2", "hi", RepeatMode::Once);
        assert!(text.contains("<#42>"));
        assert!(text.contains(&format!("<t:{}:F>", at.timestamp())));
        assert!(text.contains("(UTC+2)"));
        assert!(text.ends_with("Repeat: No"));
    }

    #[test]
    fn test_timezone_error_is_distinct() {
        let tz = error_message(&ScheduleError::InvalidTimezone("GMT".into()));
        let past = error_message(&ScheduleError::InPast);
        assert!(tz.contains("GMT"));
        assert_ne!(tz, past);
    }
}

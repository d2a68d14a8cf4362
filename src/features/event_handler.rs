// Gateway event dispatch
// Every workflow error is logged here and never reaches the framework

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::features::{reactions, translation};
use crate::{Data, Error};

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    let http: &serenity::Http = &ctx.http;

    let result = match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.tag());
            Ok(())
        }
        serenity::FullEvent::Message { new_message } => {
            reactions::handle_new_message(http, data, new_message).await
        }
        serenity::FullEvent::MessageUpdate { event, .. } => {
            reactions::handle_message_update(http, data, event).await
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            translation::handle_reaction_add(http, data, framework.bot_id, add_reaction).await
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            translation::handle_reaction_remove(http, data, framework.bot_id, removed_reaction).await
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        error!("Error handling {} event: {:?}", event.snake_case_name(), e);
    }
    Ok(())
}

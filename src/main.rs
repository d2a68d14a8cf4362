// Flag Translator Bot
// Reacts to messages with flag emojis and translates them on demand

mod api;
mod commands;
mod features;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::translate::TranslateClient;
use crate::features::chat_store::ChatConfigStore;
use crate::features::language_store::LanguageStore;
use crate::features::translation::TranslatedMessages;
use crate::utils::config::Settings;

/// Shared state handed to every command and event handler
#[derive(Clone)]
pub struct Data {
    pub settings: Arc<Settings>,
    pub translator: TranslateClient,
    pub chat_config: Arc<ChatConfigStore>,
    pub languages: Arc<LanguageStore>,
    pub translated: Arc<TranslatedMessages>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::language::add_language(),
        commands::language::remove_language(),
        commands::language::list_languages(),
        commands::chat::add_chat(),
        commands::chat::remove_chat(),
        commands::chat::chat_list(),
        commands::server_info::server_info(),
        commands::moderation::clear_bot_messages(),
        commands::moderation::clear_bot_reactions(),
        commands::schedule::schedule_message(),
        commands::help::help(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = commands::reply_ephemeral(
                ctx,
                "An error occurred while processing the command.",
            )
            .await
            {
                error!("Failed to send error message: {:?}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            // Guilds outside the allow-list get no answer at all
            debug!(
                "Ignoring `{}` from unauthorized guild {:?}",
                ctx.command().name,
                ctx.guild_id()
            );
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            // Permissions are checked before the guild allow-list
            if !ctx.data().settings.should_reply(ctx.guild_id()) {
                debug!(
                    "Ignoring `{}` from unauthorized guild {:?}",
                    ctx.command().name,
                    ctx.guild_id()
                );
                return;
            }
            let reply = commands::moderation::permission_denied_message(&ctx.command().name);
            if let Err(e) = commands::reply_ephemeral(ctx, reply).await {
                error!("Failed to send permission denial: {:?}", e);
            }
        }
        poise::FrameworkError::UnknownInteraction {
            ctx,
            framework,
            interaction,
            ..
        } => {
            if !framework.user_data.settings.should_reply(interaction.guild_id) {
                debug!(
                    "Ignoring unknown command `{}` from unauthorized guild {:?}",
                    interaction.data.name, interaction.guild_id
                );
                return;
            }
            warn!("Unknown command: {}", interaction.data.name);
            let response = serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content("Unknown command.")
                    .ephemeral(true),
            );
            if let Err(e) = interaction.create_response(ctx, response).await {
                error!("Failed to answer unknown command: {:?}", e);
            }
        }
        err => {
            if let Err(e) = poise::builtins::on_error(err).await {
                error!("Error while handling error: {:?}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "flag_translator=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Arc::new(Settings::from_env()?);
    info!(
        "Starting Flag Translator for {} allowed guild(s)...",
        settings.allowed_guilds.len()
    );

    let http_client = reqwest::Client::builder()
        .user_agent("Flag-Translator/1.0")
        .build()?;

    let data = Data {
        settings: Arc::clone(&settings),
        translator: TranslateClient::new(http_client, settings.translate_api_url.clone()),
        chat_config: Arc::new(ChatConfigStore::load(&settings.chat_config_path).await?),
        languages: Arc::new(LanguageStore::load(&settings.language_config_path).await?),
        translated: Arc::new(TranslatedMessages::new()),
    };
    let languages = Arc::clone(&data.languages);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Executing command: {}, from user: {}, guild: {:?}, channel: {}",
                        ctx.command().name,
                        ctx.author().tag(),
                        ctx.guild_id(),
                        ctx.channel_id()
                    );
                })
            },
            command_check: Some(|ctx| {
                Box::pin(async move { Ok(ctx.data().settings.should_reply(ctx.guild_id())) })
            }),
            event_handler: |ctx, event, framework, data| {
                Box::pin(features::event_handler::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                for &guild_id in &data.settings.allowed_guilds {
                    match poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        guild_id,
                    )
                    .await
                    {
                        Ok(()) => info!("Commands registered on server {}", guild_id),
                        Err(e) => warn!(
                            "Skipping command registration on server {}: {:?}",
                            guild_id, e
                        ),
                    }
                }

                // Catch up on messages posted while the bot was offline
                let http = ctx.http.clone();
                let backfill_data = data.clone();
                tokio::spawn(async move {
                    for &guild_id in &backfill_data.settings.allowed_guilds {
                        features::reactions::backfill_guild(&http, &backfill_data, guild_id).await;
                    }
                });

                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut client = serenity::ClientBuilder::new(&settings.token, intents)
        .framework(framework)
        .await?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutting down...");
                shard_manager.shutdown_all().await;
            }
            Err(e) => error!("Failed to register Ctrl+C handler: {:?}", e),
        }
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    // Language changes are only kept in memory until here
    if let Err(e) = languages.save().await {
        error!("Failed to save server languages: {:?}", e);
    }

    info!("Goodbye!");
    Ok(())
}

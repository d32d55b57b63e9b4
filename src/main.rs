use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jukebox::commands::music::{
    audio_sources::YtDlpResolver,
    join::*,
    leave::*,
    nowplaying::*,
    pause::*,
    play::*,
    queue::*,
    resume::*,
    skip::*,
    stop::*,
    utils::{messages, music_manager::MusicManager, voice::SongbirdTransport},
};
use jukebox::config::BotConfig;
use jukebox::{CommandResult, Context, Data, Error, HTTP_CLIENT};

#[poise::command(prefix_command, slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, owners_only, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Turn framework errors into the replies users see
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::UnknownCommand { ctx, msg, .. } => {
            if let Err(e) = msg.channel_id.say(ctx, messages::UNKNOWN_COMMAND).await {
                warn!("Failed to reply to unknown command: {}", e);
            }
        }
        poise::FrameworkError::ArgumentParse { ctx, error, .. } => {
            warn!("Bad arguments for '{}': {}", ctx.command().name, error);
            if let Err(e) = ctx.say(messages::missing_argument(&ctx.command().name)).await {
                warn!("Failed to reply to argument error: {}", e);
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {}", ctx.command().name, error);
            if let Err(e) = ctx.say(messages::command_failed(&error)).await {
                warn!("Failed to report command error: {}", e);
            }
        }
        other => {
            error!("Unhandled framework error: {}", other);
            if let Some(ctx) = other.ctx() {
                if let Err(e) = ctx.say(messages::UNEXPECTED_ERROR).await {
                    warn!("Failed to report framework error: {}", e);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jukebox=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;
    info!(
        "Starting with prefix '{}', {} resolver workers",
        config.command_prefix, config.resolver_workers
    );

    let songbird = Songbird::serenity();
    let transport = Arc::new(SongbirdTransport::new(
        Arc::clone(&songbird),
        HTTP_CLIENT.clone(),
        config.default_volume,
    ));
    let resolver = Arc::new(YtDlpResolver::new(config.ytdlp_path.clone()));
    let music = Arc::new(MusicManager::from_config(&config, resolver, transport));

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let commands = vec![
        // Default commands
        register(),
        help(),
        // Music commands
        join(),
        play(),
        skip(),
        queue(),
        nowplaying(),
        pause(),
        resume(),
        stop(),
        leave(),
    ];

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data { music })
            })
        })
        .build();

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .register_songbird_with(songbird)
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.map_err(Into::into)
}

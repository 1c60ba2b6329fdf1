use clap::Parser;
use eyre::Context;
use std::io::{BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tokio_stream::StreamExt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use yt_dashboard::api::{EventFilters, NoteFilters, VideoUpdate};
use yt_dashboard::callback::{AuthCallback, CallbackParams, CallbackState};
use yt_dashboard::notifications::{Notifier, TerminalNotifier};
use yt_dashboard::redirect::RedirectListener;
use yt_dashboard::routes::{History, Route};
use yt_dashboard::storage::FileStorage;
use yt_dashboard::views::comments::CommentsPanel;
use yt_dashboard::views::dashboard::{self, Dashboard};
use yt_dashboard::views::events::{self, EventLog};
use yt_dashboard::views::notes::{NoteDraft, NotesPanel};
use yt_dashboard::views::video::VideoPanel;
use yt_dashboard::views::{auth, header};
use yt_dashboard::{ApiClient, Config, SessionStore};

mod cli;

use cli::{Cli, CommentCommands, Commands, NoteCommands, VideoArg, VideoCommands};

type Store = SessionStore<FileStorage>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    tracing::debug!(?config, "starting");

    let api = ApiClient::new(&config.api_base_url).context("set up API client")?;
    let mut store = SessionStore::initialize(FileStorage::new(config.storage_path()));
    let mut notifier = TerminalNotifier;

    let ok = match cli.command {
        Commands::Status => {
            println!("{}", header::render(store.session(), Route::Dashboard));
            true
        }
        Commands::Login { no_browser } => {
            login(&api, &config, &mut store, &mut notifier, no_browser).await?
        }
        Commands::Callback { url } => {
            let params = CallbackParams::from_url(&url)?;
            complete_sign_in(&api, params, &mut store, &mut notifier).await
        }
        Commands::Logout => {
            let ok = header::disconnect(&mut store, &mut notifier);
            println!("{}", header::render(store.session(), Route::Dashboard));
            ok
        }
        Commands::Dashboard { video } => {
            let dashboard =
                Dashboard::load(&api, store.session(), video.video_id.as_deref(), &mut notifier)
                    .await;
            println!("{}", header::render(store.session(), Route::Dashboard));
            print!("\n{}", dashboard.render());
            true
        }
        Commands::Video { command } => video(&api, &store, command, &mut notifier).await,
        Commands::Comments { command } => comments(&api, &store, command, &mut notifier).await?,
        Commands::Notes { command } => notes(&api, command, &mut notifier).await?,
        Commands::Events {
            action,
            video_id,
            page,
            limit,
            all,
        } => {
            let mut filters = EventFilters::default().with_limit(limit);
            if let Some(action) = action {
                filters = filters.with_action(action);
            }
            if let Some(video_id) = video_id {
                filters = filters.with_video_id(video_id);
            }
            let filters = filters.with_page(page);

            if all {
                let mut stream = std::pin::pin!(api.all_events(filters));
                let mut ok = true;
                while let Some(event) = stream.next().await {
                    match event {
                        Ok(event) => print!("{}", events::render_event(&event)),
                        Err(e) => {
                            tracing::warn!(error = %e, "could not fetch events");
                            notifier.error(events::FETCH_FAILED_MESSAGE);
                            ok = false;
                        }
                    }
                }
                ok
            } else {
                let log = EventLog::load(&api, filters, &mut notifier).await;
                println!("{}", header::render(store.session(), Route::Events));
                print!("\n{}", log.render());
                true
            }
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn login(
    api: &ApiClient,
    config: &Config,
    store: &mut Store,
    notifier: &mut TerminalNotifier,
    no_browser: bool,
) -> eyre::Result<bool> {
    if store.is_authenticated() {
        eprintln!("Already connected. Run `yt-dashboard logout` first to switch accounts.");
        return Ok(true);
    }

    let Some(auth_url) = auth::request_auth_url(api, notifier).await else {
        return Ok(false);
    };

    let listener = RedirectListener::bind(config.callback_addr)
        .await
        .context("the backend redirects here after consent; use `yt-dashboard callback <url>` if it cannot be bound")?;
    tracing::info!(redirect = %listener.redirect_url(), "waiting for OAuth redirect");

    eprintln!("Open this URL to connect your YouTube account:\n\n  {auth_url}\n");
    if !no_browser {
        if let Err(e) = webbrowser::open(&auth_url) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    let query = listener
        .wait_for_redirect()
        .await
        .context("await OAuth redirect")?;
    Ok(complete_sign_in(api, CallbackParams::from_query(&query), store, notifier).await)
}

async fn complete_sign_in(
    api: &ApiClient,
    params: CallbackParams,
    store: &mut Store,
    notifier: &mut TerminalNotifier,
) -> bool {
    let mut history = History::default();
    let mut callback = AuthCallback::mount(params);
    let state = callback.run(api, store, &mut history, notifier).await.clone();

    if let CallbackState::Failed { message } = &state {
        eprintln!("Authentication Failed: {message}");
        state.return_to_dashboard(&mut history);
    }

    if history.current() == Some(Route::Dashboard) {
        let dashboard = Dashboard::load(api, store.session(), None, notifier).await;
        println!("{}", header::render(store.session(), Route::Dashboard));
        print!("\n{}", dashboard.render());
    }
    state == CallbackState::Success
}

async fn video(
    api: &ApiClient,
    store: &Store,
    command: VideoCommands,
    notifier: &mut TerminalNotifier,
) -> bool {
    match command {
        VideoCommands::Show { video } => {
            let panel = VideoPanel::load(api, video_id(&video), notifier).await;
            print!("{}", panel.render());
            panel.video().is_some()
        }
        VideoCommands::Edit {
            video,
            title,
            description,
        } => {
            let mut panel = VideoPanel::load(api, video_id(&video), notifier).await;
            let Some(current) = panel.video() else {
                return false;
            };
            let mut update = VideoUpdate::from_video(current);
            if let Some(title) = title {
                update.title = title;
            }
            if let Some(description) = description {
                update.description = description;
            }
            let ok = panel.update(api, store.session(), &update, notifier).await;
            print!("{}", panel.render());
            ok
        }
    }
}

async fn comments(
    api: &ApiClient,
    store: &Store,
    command: CommentCommands,
    notifier: &mut TerminalNotifier,
) -> eyre::Result<bool> {
    let session = store.session();
    let ok = match command {
        CommentCommands::List { video } => {
            let panel = CommentsPanel::load(api, video_id(&video), notifier).await;
            print!("{}", panel.render());
            true
        }
        CommentCommands::Add { video, text } => {
            let mut panel = CommentsPanel::load(api, video_id(&video), notifier).await;
            let ok = panel.add_comment(api, session, &text, notifier).await;
            print!("{}", panel.render());
            ok
        }
        CommentCommands::Reply {
            video,
            parent_id,
            text,
        } => {
            let mut panel = CommentsPanel::load(api, video_id(&video), notifier).await;
            let ok = panel.reply(api, session, &parent_id, &text, notifier).await;
            print!("{}", panel.render());
            ok
        }
        CommentCommands::Delete {
            video,
            comment_id,
            yes,
        } => {
            if !yes && !confirm("Are you sure you want to delete this comment?")? {
                return Ok(true);
            }
            let mut panel = CommentsPanel::load(api, video_id(&video), notifier).await;
            let ok = panel.delete(api, session, &comment_id, notifier).await;
            print!("{}", panel.render());
            ok
        }
    };
    Ok(ok)
}

async fn notes(
    api: &ApiClient,
    command: NoteCommands,
    notifier: &mut TerminalNotifier,
) -> eyre::Result<bool> {
    let ok = match command {
        NoteCommands::List { video, search, tag } => {
            let filters = NoteFilters {
                search,
                tags: tag,
                ..NoteFilters::for_video(video_id(&video))
            };
            let panel = NotesPanel::load(api, filters, notifier).await;
            print!("{}", panel.render());
            let tags = panel.known_tags();
            if !tags.is_empty() {
                println!("\nTags: {}", tags.join(", "));
            }
            true
        }
        NoteCommands::Add {
            video,
            title,
            content,
            tags,
        } => {
            let filters = NoteFilters::for_video(video_id(&video));
            let mut panel = NotesPanel::load(api, filters, notifier).await;
            let draft = NoteDraft {
                title,
                content,
                tags,
            };
            let ok = panel.save(api, &draft, None, notifier).await;
            print!("{}", panel.render());
            ok
        }
        NoteCommands::Edit {
            video,
            note_id,
            title,
            content,
            tags,
        } => {
            let filters = NoteFilters::for_video(video_id(&video));
            let mut panel = NotesPanel::load(api, filters, notifier).await;
            let mut draft = panel
                .note(&note_id)
                .map(NoteDraft::from_note)
                .unwrap_or_default();
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(content) = content {
                draft.content = content;
            }
            if let Some(tags) = tags {
                draft.tags = tags;
            }
            let ok = panel.save(api, &draft, Some(&note_id), notifier).await;
            print!("{}", panel.render());
            ok
        }
        NoteCommands::Delete {
            video,
            note_id,
            yes,
        } => {
            if !yes && !confirm("Are you sure you want to delete this note?")? {
                return Ok(true);
            }
            let filters = NoteFilters::for_video(video_id(&video));
            let mut panel = NotesPanel::load(api, filters, notifier).await;
            let ok = panel.delete(api, &note_id, notifier).await;
            print!("{}", panel.render());
            ok
        }
    };
    Ok(ok)
}

fn video_id(arg: &VideoArg) -> &str {
    dashboard::resolve_video_id(arg.video_id.as_deref())
}

fn confirm(question: &str) -> eyre::Result<bool> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush().context("flush prompt")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

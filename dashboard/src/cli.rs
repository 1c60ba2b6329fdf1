use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use yt_dashboard::api::DEFAULT_BASE_URL;
use yt_dashboard::api::events::{DEFAULT_PAGE_SIZE, PAGE_SIZES};
use yt_dashboard::config::{self, Config, DEFAULT_CALLBACK_ADDR};

#[derive(Parser, Debug)]
#[command(
    name = "yt-dashboard",
    version,
    about = "Manage a YouTube video, its comments and your notes from the terminal"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "YT_DASHBOARD_API_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Root URL of the dashboard backend's API"
    )]
    pub api_url: String,
    #[arg(
        long,
        global = true,
        env = "YT_DASHBOARD_CALLBACK_ADDR",
        default_value_t = DEFAULT_CALLBACK_ADDR,
        help = "Local address the OAuth redirect comes back to"
    )]
    pub callback_addr: SocketAddr,
    #[arg(
        long,
        global = true,
        env = "YT_DASHBOARD_DATA_DIR",
        help = "Where the session is kept [default: platform data directory]"
    )]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.api_url.clone(),
            callback_addr: self.callback_addr,
            data_dir: self.data_dir.clone().unwrap_or_else(config::default_data_dir),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct VideoArg {
    #[arg(long, env = "YT_DASHBOARD_VIDEO_ID", help = "YouTube video ID")]
    pub video_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show whether a YouTube account is connected.
    Status,
    /// Connect a YouTube account.
    Login {
        #[arg(long, default_value_t = false, help = "Print the consent URL instead of opening it")]
        no_browser: bool,
    },
    /// Finish signing in with the URL the browser was redirected to.
    Callback { url: String },
    /// Disconnect the YouTube account.
    Logout,
    /// Show the video, its comments and your notes.
    Dashboard {
        #[command(flatten)]
        video: VideoArg,
    },
    Video {
        #[command(subcommand)]
        command: VideoCommands,
    },
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },
    Notes {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Browse the audit log.
    Events {
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        video_id: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
        limit: u32,
        #[arg(long, default_value_t = false, help = "Print every page from --page on")]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum VideoCommands {
    Show {
        #[command(flatten)]
        video: VideoArg,
    },
    /// Change the title and/or description; unset fields keep their current value.
    Edit {
        #[command(flatten)]
        video: VideoArg,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    List {
        #[command(flatten)]
        video: VideoArg,
    },
    Add {
        #[command(flatten)]
        video: VideoArg,
        text: String,
    },
    Reply {
        #[command(flatten)]
        video: VideoArg,
        parent_id: String,
        text: String,
    },
    Delete {
        #[command(flatten)]
        video: VideoArg,
        comment_id: String,
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    List {
        #[command(flatten)]
        video: VideoArg,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    Add {
        #[command(flatten)]
        video: VideoArg,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "", help = "Comma-separated tags")]
        tags: String,
    },
    /// Change a note; unset fields keep their current value.
    Edit {
        #[command(flatten)]
        video: VideoArg,
        note_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, help = "Comma-separated tags")]
        tags: Option<String>,
    },
    Delete {
        #[command(flatten)]
        video: VideoArg,
        note_id: String,
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
}

fn parse_page_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|e| format!("{e}"))?;
    if PAGE_SIZES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("must be one of {PAGE_SIZES:?}"))
    }
}

mod wizard;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use herald_compose::{
    estimate_sms_parts,
    media::MimeSizeValidator,
    placeholder::validate_placeholders,
    preview::{build_preview, build_wa_preview},
    render_with_samples,
};
use herald_core::{
    compose::ComposePayload,
    config::{self, HeraldConfig},
    message::Channel,
};
use herald_sim::{Inbox, PreviewChat};
use herald_store::MemoryStore;
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "Herald: compose, preview, and simulate SMS and WhatsApp communications"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, global = true, default_value = "herald.toml", env = "HERALD_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Count SMS characters and segments.
    Count {
        /// Treat the message as having media attached.
        #[arg(long)]
        media: bool,
        /// The message text.
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// Render `{{placeholders}}` with catalog sample values.
    Render {
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// Show the preview for a draft file.
    Preview {
        /// TOML draft file.
        draft: String,
    },
    /// Run a WhatsApp draft's preview conversation.
    Chat {
        draft: String,
        /// Tap a quick-reply button.
        #[arg(long = "reply")]
        replies: Vec<String>,
        /// Type a keyword.
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Feed inbound messages and button taps through the inbox simulator.
    Inbox {
        draft: String,
        /// Typed text as CHANNEL:TEXT, e.g. WHATSAPP:POINTS
        #[arg(
            long = "inbound",
            value_parser = parse_inbound,
            required_unless_present = "taps"
        )]
        inbound: Vec<(Channel, String)>,
        /// Button tap as CHANNEL:LABEL, e.g. WHATSAPP:MORE
        #[arg(long = "tap", value_parser = parse_inbound)]
        taps: Vec<(Channel, String)>,
    },
    /// Validate a draft and store the resulting communication.
    Confirm { draft: String },
    /// Print the catalog in use.
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let cfg = config::load(&cli.config)?;
    let _guard = init_logging(&cfg.herald)?;
    info!("{} starting with config {}", cfg.herald.name, cli.config);

    let catalog = cfg.catalog()?;

    match cli.command {
        Commands::Count { media, text } => {
            print_json(&estimate_sms_parts(&text.join(" "), media))?;
        }
        Commands::Render { text } => {
            let text = text.join(" ");
            let check = validate_placeholders(&text, &catalog);
            if !check.is_valid() {
                warn!("unknown placeholders: {}", check.invalid.join(", "));
            }
            println!("{}", render_with_samples(&text, &catalog.sample_map()));
        }
        Commands::Preview { draft } => {
            let state = wizard::load_state(&draft, &cfg, &catalog)?;
            let payload = wizard::payload(&state)?;
            print_json(&build_preview(&payload, &catalog, &cfg.otp.brand))?;
        }
        Commands::Chat { draft, .. } => {
            let state = wizard::load_state(&draft, &cfg, &catalog)?;
            let ComposePayload::Whatsapp(wa) = wizard::payload(&state)? else {
                anyhow::bail!("chat needs a WhatsApp draft (channel = \"WHATSAPP\")");
            };
            let mut chat = PreviewChat::open(&build_wa_preview(&wa, &catalog));
            for input in chat_inputs(&matches) {
                match input {
                    ChatInput::Reply(label) => chat.quick_reply(&label),
                    ChatInput::Keyword(text) => chat.keyword(&text),
                };
            }
            print_json(chat.log())?;
        }
        Commands::Inbox { draft, .. } => {
            let state = wizard::load_state(&draft, &cfg, &catalog)?;
            let mut inbox = Inbox::demo(state.drafts.whatsapp.flow.clone());
            for input in inbox_inputs(&matches) {
                match input {
                    InboxInput::Text(channel, text) => inbox.simulate_inbound(channel, &text),
                    InboxInput::Tap(channel, label) => inbox.simulate_button_click(channel, &label),
                };
            }
            print_json(inbox.threads())?;
        }
        Commands::Confirm { draft } => {
            let state = wizard::load_state(&draft, &cfg, &catalog)?;
            let store = MemoryStore::new();
            let media = MimeSizeValidator::from_config(&cfg.media);
            let communication = wizard::confirm(&state, &catalog, &media, &store).await?;
            print_json(&communication)?;
        }
        Commands::Catalog => {
            print_json(&catalog)?;
        }
    }

    Ok(())
}

/// Stderr logging, plus a log file when `log_dir` is set. `RUST_LOG`
/// overrides the configured level.
fn init_logging(cfg: &HeraldConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    let (file_layer, guard) = if cfg.log_dir.is_empty() {
        (None, None)
    } else {
        let dir = config::shellexpand(&cfg.log_dir);
        std::fs::create_dir_all(&dir)?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "herald.log"));
        (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(guard)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_inbound(value: &str) -> Result<(Channel, String), String> {
    let (channel, text) = value
        .split_once(':')
        .ok_or_else(|| format!("expected CHANNEL:TEXT, got '{value}'"))?;
    let channel = Channel::parse(channel).ok_or_else(|| format!("unknown channel '{channel}'"))?;
    Ok((channel, text.to_string()))
}

#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    Reply(String),
    Keyword(String),
}

/// `--reply` and `--keyword` values in command-line order.
fn chat_inputs(matches: &ArgMatches) -> Vec<ChatInput> {
    let Some(chat) = matches.subcommand_matches("chat") else {
        return Vec::new();
    };
    let mut inputs: Vec<(usize, ChatInput)> = Vec::new();
    if let (Some(values), Some(indices)) =
        (chat.get_many::<String>("replies"), chat.indices_of("replies"))
    {
        inputs.extend(indices.zip(values.map(|v| ChatInput::Reply(v.clone()))));
    }
    if let (Some(values), Some(indices)) =
        (chat.get_many::<String>("keywords"), chat.indices_of("keywords"))
    {
        inputs.extend(indices.zip(values.map(|v| ChatInput::Keyword(v.clone()))));
    }
    inputs.sort_by_key(|(index, _)| *index);
    inputs.into_iter().map(|(_, input)| input).collect()
}

#[derive(Debug, PartialEq, Eq)]
enum InboxInput {
    Text(Channel, String),
    Tap(Channel, String),
}

/// `--inbound` and `--tap` values in command-line order.
fn inbox_inputs(matches: &ArgMatches) -> Vec<InboxInput> {
    let Some(inbox) = matches.subcommand_matches("inbox") else {
        return Vec::new();
    };
    let mut inputs: Vec<(usize, InboxInput)> = Vec::new();
    if let (Some(values), Some(indices)) = (
        inbox.get_many::<(Channel, String)>("inbound"),
        inbox.indices_of("inbound"),
    ) {
        inputs.extend(indices.zip(values.map(|(c, t)| InboxInput::Text(*c, t.clone()))));
    }
    if let (Some(values), Some(indices)) = (
        inbox.get_many::<(Channel, String)>("taps"),
        inbox.indices_of("taps"),
    ) {
        inputs.extend(indices.zip(values.map(|(c, l)| InboxInput::Tap(*c, l.clone()))));
    }
    inputs.sort_by_key(|(index, _)| *index);
    inputs.into_iter().map(|(_, input)| input).collect()
}

use clap::{Args, Parser, Subcommand};
use relay_cwt::keys::DEFAULT_KEY_LEN;
use relay_cwt::FileMetadata;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::token::IssueOptions;

#[derive(Parser, Debug)]
#[command(name = "relay", version, about = "Relay control plane CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue access tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// HMAC key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a document token and print the grant as JSON
    Doc(IssueArgs),

    /// Issue a file token and print the grant as JSON
    File {
        #[command(flatten)]
        issue: IssueArgs,

        /// Content hash of the file
        #[arg(long)]
        hash: String,

        /// MIME type echoed back in the grant
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,

        /// Size in bytes echoed back in the grant
        #[arg(long, default_value_t = 0)]
        content_length: i64,
    },
}

#[derive(Args, Debug)]
struct IssueArgs {
    /// Path to relay.yaml
    #[arg(long, short = 'c', default_value = "relay.yaml")]
    config: PathBuf,

    /// HMAC key: base64 text or a path to a file containing it.
    /// Defaults to the signing configuration (RELAY_HMAC_KEY).
    #[arg(long)]
    key: Option<String>,

    /// Document id
    #[arg(long)]
    doc_id: String,

    /// User id written into the subject claim
    #[arg(long)]
    user: String,

    /// Provider base URL written into the audience claim
    #[arg(long)]
    audience: String,

    /// Authorization level: "full" grants rw, anything else r
    #[arg(long, default_value = "read-only")]
    authorization: String,

    /// Token lifetime, e.g. "1h", "30m", "3600" (defaults to token.ttl_seconds)
    #[arg(long)]
    ttl: Option<String>,
}

impl From<IssueArgs> for IssueOptions {
    fn from(args: IssueArgs) -> Self {
        Self {
            config: args.config,
            key: args.key,
            doc_id: args.doc_id,
            user: args.user,
            audience: args.audience,
            authorization: args.authorization,
            ttl: args.ttl,
        }
    }
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new random HMAC key (base64)
    Generate {
        /// Key length in bytes
        #[arg(long, default_value_t = DEFAULT_KEY_LEN)]
        bytes: usize,

        /// Write the key to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Token { cmd } => match cmd {
            TokenCommand::Doc(args) => commands::token::doc(args.into())?,
            TokenCommand::File {
                issue,
                hash,
                content_type,
                content_length,
            } => commands::token::file(
                issue.into(),
                FileMetadata {
                    file_hash: hash,
                    content_type,
                    content_length,
                },
            )?,
        },

        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { bytes, output } => commands::keys::generate(bytes, output)?,
        },
    }

    Ok(())
}

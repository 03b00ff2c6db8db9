mod shell;

use std::fmt;
use std::sync::Arc;

use practice_core::model::{PracticeMode, TopicId};
use services::{
    ApiConfig, CredentialStore, HttpExerciseApi, InMemoryCredentials, PracticeLoopService,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTopicId { raw: String },
    ConflictingMode,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopicId { raw } => write!(f, "invalid --topic value: {raw}"),
            ArgsError::ConflictingMode => write!(f, "--topic and --random cannot be combined"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <url>] [--topic <id> | --random] [--token <token>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://localhost:8080");
    eprintln!("  random practice when no topic is given");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_API_URL, PRACTICE_API_TIMEOUT_SECS, PRACTICE_TOPIC_ID, PRACTICE_API_TOKEN");
    eprintln!("  RUST_LOG (log filter, logs go to stderr)");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    api_url: Option<String>,
    mode: PracticeMode,
    token: Option<String>,
    help: bool,
}

impl Args {
    /// Parse flags, falling back to `env` for anything not given on the command line.
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut api_url = None;
        let mut topic: Option<TopicId> = None;
        let mut random = false;
        let mut token = None;
        let mut help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => api_url = Some(require_value(&mut args, "--api")?),
                "--topic" => {
                    let value = require_value(&mut args, "--topic")?;
                    topic = Some(parse_topic(&value)?);
                }
                "--random" => random = true,
                "--token" => token = Some(require_value(&mut args, "--token")?),
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let mode = match (topic, random) {
            (Some(_), true) => return Err(ArgsError::ConflictingMode),
            (Some(id), false) => PracticeMode::Topic(id),
            (None, true) => PracticeMode::Random,
            (None, false) => match env("PRACTICE_TOPIC_ID").filter(|raw| !raw.trim().is_empty()) {
                Some(raw) => PracticeMode::Topic(parse_topic(&raw)?),
                None => PracticeMode::Random,
            },
        };
        let token = token.or_else(|| env("PRACTICE_API_TOKEN"));

        Ok(Self {
            api_url,
            mode,
            token,
            help,
        })
    }
}

fn parse_topic(raw: &str) -> Result<TopicId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidTopicId {
        raw: raw.to_string(),
    })
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "services=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_tracing();

    let config = match &args.api_url {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    let credentials = Arc::new(InMemoryCredentials::new(args.token));
    if credentials.token().is_none() {
        warn!("no api token configured; the backend will likely reject requests");
    }
    info!(api = %config.base_url(), mode = ?args.mode, "starting practice");

    let api = HttpExerciseApi::new(&config, credentials.clone())?;
    let service = PracticeLoopService::new(Arc::new(api), credentials);
    let session = service.mount(args.mode).await;

    shell::run(&service, session).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // Binary glue: print once and exit.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_to_random_practice() {
        let parsed = Args::parse(Vec::new(), no_env).unwrap();
        assert_eq!(parsed.mode, PracticeMode::Random);
        assert_eq!(parsed.api_url, None);
        assert_eq!(parsed.token, None);
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            "PRACTICE_TOPIC_ID" => Some("2".to_string()),
            "PRACTICE_API_TOKEN" => Some("from-env".to_string()),
            _ => None,
        };
        let parsed = Args::parse(args(&["--topic", "5", "--token", "cli"]), env).unwrap();
        assert_eq!(parsed.mode, PracticeMode::Topic(TopicId::new(5)));
        assert_eq!(parsed.token.as_deref(), Some("cli"));

        let parsed = Args::parse(Vec::new(), env).unwrap();
        assert_eq!(parsed.mode, PracticeMode::Topic(TopicId::new(2)));
        assert_eq!(parsed.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Args::parse(args(&["--topic"]), no_env),
            Err(ArgsError::MissingValue { flag: "--topic" })
        );
        assert_eq!(
            Args::parse(args(&["--topic", "abc"]), no_env),
            Err(ArgsError::InvalidTopicId {
                raw: "abc".to_string()
            })
        );
        assert_eq!(
            Args::parse(args(&["--topic", "1", "--random"]), no_env),
            Err(ArgsError::ConflictingMode)
        );
        assert_eq!(
            Args::parse(args(&["--deck"]), no_env),
            Err(ArgsError::UnknownArg("--deck".to_string()))
        );
    }
}

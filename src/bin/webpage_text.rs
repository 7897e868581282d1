use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use time::format_description::well_known::Rfc3339;
use tracing::error;
use tracing_subscriber::fmt::time::UtcTime;
use webpage_text::config::{Config, DEFAULT_TIMEOUT_SECS};
use webpage_text::Pipeline;

/// Extracts the readable article text of a webpage
/// and writes it, whitespace-collapsed, to a text file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the webpage to extract
    url: String,

    /// Output file
    /// if not given, text.txt two levels above the executable's directory
    #[arg(short, long, env = "WEBPAGE_TEXT_OUTPUT")]
    output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "WEBPAGE_TEXT_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Trim leading and trailing whitespace from the output
    #[arg(long)]
    trim: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_timer(UtcTime::new(Rfc3339))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {

    init_tracing();

    let args = Args::parse();

    let mut config = Config::default()
        .with_timeout(args.timeout)
        .with_trim(args.trim);

    if let Some(output) = args.output {
        config = config.with_output_path(output);
    }

    let result = match Pipeline::new(config) {
        Ok(pipeline) => pipeline.run(&args.url).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(url = %args.url, "{e}");
            ExitCode::from(e.exit_code())
        }
    }

}

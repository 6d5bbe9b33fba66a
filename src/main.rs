use anyhow::Result;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kili::{cli::Cli, printer::ResultPrinter, Config, GraphQlClient, KiliAuth};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let printer = ResultPrinter::for_terminal();

    match run(args).await {
        Ok(value) => printer.print(&value),
        Err(err) => {
            printer.print_error(&err);
            std::process::exit(1);
        }
    }
}

async fn run(args: Cli) -> Result<Value> {
    let mut cfg = Config::load();
    // CLI overrides config
    if let Some(endpoint) = args.endpoint {
        cfg.set("KILI_API_ENDPOINT", endpoint);
    }
    if let Some(api_key) = args.api_key {
        cfg.set("KILI_API_KEY", api_key);
    }

    let client = if args.command.needs_auth() {
        KiliAuth::new(&cfg).await?.client
    } else {
        GraphQlClient::from_config(&cfg)?
    };
    args.command.run(&client).await
}

use std::{
    io::{self, Read},
    time::Duration,
};

use chat_expr::{
    Engine, EngineConfig,
    cli::{self, CheckResult, CliError, EvalOptions},
};
use clap::{Parser as ClapParser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "chatexpr")]
#[command(about = "Evaluate chat-bot expressions and response templates")]
#[command(version)]
struct Cli {
    /// Log evaluation details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// User agent for the fetch built-ins
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Timeout in seconds for the fetch built-ins
    #[arg(long, global = true, default_value_t = 10)]
    fetch_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression
    Eval {
        /// The expression, without the surrounding ${}
        expression: String,

        /// JSON invocation context (reads from stdin if not provided)
        #[arg(short, long)]
        context: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate expression syntax without evaluating it
    Check {
        /// The expression to validate
        expression: String,
    },

    /// List the tokens of an expression
    Tokens {
        /// The expression to tokenize
        expression: String,
    },

    /// Render a response template containing ${...} spans
    Render {
        /// The template text
        template: String,

        /// JSON invocation context (reads from stdin if not provided)
        #[arg(short, long)]
        context: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_context(context: Option<String>) -> Result<Option<String>, CliError> {
    match context {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = EngineConfig {
        fetch_timeout: Duration::from_secs(cli.fetch_timeout),
        ..EngineConfig::default()
    };
    if let Some(user_agent) = cli.user_agent {
        config.user_agent = user_agent;
    }
    let engine = Engine::new(config);

    if let Err(e) = run(&engine, cli.command).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(engine: &Engine, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Eval {
            expression,
            context,
            json,
            pretty,
        } => {
            let options = EvalOptions {
                expression,
                context: read_context(context)?,
                json,
                pretty,
            };
            println!("{}", cli::execute_eval(engine, &options).await?);
        }
        Commands::Check { expression } => match cli::execute_check(&expression)? {
            CheckResult::SyntaxValid => println!("Syntax is valid"),
        },
        Commands::Tokens { expression } => {
            for line in cli::list_tokens(&expression)? {
                println!("{}", line);
            }
        }
        Commands::Render { template, context } => {
            let context = read_context(context)?;
            println!(
                "{}",
                cli::execute_render(engine, &template, context.as_deref()).await?
            );
        }
    }
    Ok(())
}

use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_portal::auth::{Authenticator, Identity, Role};
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::ids::UserId;

#[derive(Parser, Debug)]
#[command(
    name = "Job Portal",
    about = "Run the job portal API or exercise the application lifecycle from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Mint a bearer token signed with the configured secret
    Token(TokenArgs),
    /// Walk one application from submission to a decision against an in-memory store
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct TokenArgs {
    /// Role carried by the token (employer or jobseeker)
    #[arg(long)]
    pub(crate) role: Role,
    /// User id to embed; a fresh one is generated when omitted
    #[arg(long)]
    pub(crate) user_id: Option<UserId>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Token(args) => issue_token(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn issue_token(args: TokenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let authenticator = Authenticator::new(&config.auth);
    let identity = Identity {
        user_id: args.user_id.unwrap_or_default(),
        role: args.role,
    };
    let token = authenticator.issue(identity)?;

    println!("user_id: {}", identity.user_id);
    println!("role:    {}", identity.role);
    println!("token:   {token}");
    Ok(())
}

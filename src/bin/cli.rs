use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use uuid::Uuid;

use rolegate::routes::RouteTable;
use rolegate_auth::create_access_token;
use rolegate_config::JwtConfig;
use rolegate_core::Permission;

#[derive(Parser)]
#[command(name = "rolegate-cli")]
#[command(about = "Rolegate CLI - Administrative tools for the rolegate API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table and any unguarded mutating routes
    Routes,
    /// Issue a signed access token using JWT_SECRET
    Token {
        /// Subject (user id); a random one is used if omitted
        #[arg(short = 's', long)]
        subject: Option<Uuid>,

        /// Email address carried in the token
        #[arg(short = 'e', long, default_value = "admin@example.com")]
        email: String,

        /// Permission to grant, e.g. VIEW_USERS (repeatable)
        #[arg(short = 'p', long = "permission")]
        permissions: Vec<String>,

        /// Grant every registered permission
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Routes => handle_routes(),
        Commands::Token {
            subject,
            email,
            permissions,
            all,
        } => handle_token(subject, &email, permissions, all),
    };

    if let Err(e) = result {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

fn handle_routes() -> anyhow::Result<()> {
    let table = RouteTable::standard()?;

    for route in table.routes() {
        let guards = if route.guards.is_empty() {
            "none".to_string()
        } else {
            route
                .guards
                .iter()
                .map(|step| step.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:<7} {:<24} {:<48} {}",
            route.method.as_str(),
            route.path,
            guards,
            route.operation.name()
        );
    }

    let findings = table.audit();
    if !findings.is_empty() {
        println!("\n⚠️  {} unguarded mutating route(s):", findings.len());
        for finding in findings {
            println!("   {}", finding);
        }
    }

    Ok(())
}

fn handle_token(
    subject: Option<Uuid>,
    email: &str,
    permissions: Vec<String>,
    all: bool,
) -> anyhow::Result<()> {
    let granted: Vec<Permission> = if all {
        Permission::ALL.to_vec()
    } else {
        permissions
            .iter()
            .map(|name| name.parse::<Permission>())
            .collect::<Result<_, _>>()?
    };

    let jwt_config = JwtConfig::from_env();
    let token = create_access_token(
        subject.unwrap_or_else(Uuid::new_v4),
        email,
        granted.iter().map(|p| p.as_str().to_string()).collect(),
        &jwt_config,
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", token);
    Ok(())
}

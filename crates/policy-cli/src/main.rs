//! interceptctl - Inspect and validate interception rule files

use anyhow::Context;
use clap::Parser;
use policy_core::RuleTable;

#[derive(Parser)]
#[command(name = "interceptctl")]
#[command(about = "Rule file tooling for the interception policy engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Validate a rule file without loading it anywhere
    Check {
        /// Rule file path
        #[arg(short, long, default_value = "config/rules.json")]
        rules: String,
    },
    /// List the rules in a file, in dispatch order
    Show {
        /// Rule file path
        #[arg(short, long, default_value = "config/rules.json")]
        rules: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Some(Commands::Check { rules }) => {
            let table = load(&rules)?;
            println!("{}: OK ({} rules)", rules, table.len());
        }
        Some(Commands::Show { rules }) => {
            let table = load(&rules)?;
            for rule in table.rules() {
                let mutations: Vec<&str> =
                    rule.mutations.iter().map(|m| m.kind()).collect();
                println!(
                    "{:<40} {:<8} [{}] -> {}",
                    rule.id,
                    rule.event,
                    rule.host.hosts().join(", "),
                    mutations.join(", ")
                );
            }
        }
        None => {
            println!("interceptctl v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}

fn load(path: &str) -> anyhow::Result<RuleTable> {
    let set = policy_core::RuleSet::from_path(path)
        .with_context(|| format!("failed to load rule file {path}"))?;
    RuleTable::build(set).with_context(|| format!("rule file {path} failed validation"))
}

//! TWQ ledger CLI
//!
//! Command-line driver for the reward ledger. Each subcommand maps to one
//! ledger operation; state lives in a JSON snapshot under the data
//! directory.

use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use twq_ledger::{LedgerConfig, LedgerError, MiningProgress, RewardLedger};
use twq_storage::FileStore;

#[derive(Parser)]
#[command(name = "twq")]
#[command(version = "0.1.0")]
#[command(about = "TWQ tap-to-earn reward ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory holding the account snapshot
    #[arg(short, long, global = true, default_value = "~/.twq")]
    data_dir: PathBuf,

    /// Ledger configuration file (TOML); defaults apply when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account overview
    Status,

    /// Add tap points to the running total
    Tap {
        /// Points per tap batch
        #[arg(default_value = "1")]
        amount: i64,
    },

    /// Claim the daily login reward
    Login {
        /// Claim date override (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Mining cycle operations
    Mine {
        #[command(subcommand)]
        mine: MineCommands,
    },

    /// Count a referred player and credit the bonus
    Refer {
        /// Opaque id of the referred player
        id: String,
    },

    /// Record the inviter this installation joined through
    Referrer {
        /// Referrer's player id
        id: String,
    },

    /// Redeem a one-shot task reward
    Task {
        /// Task identifier
        id: String,
    },

    /// Promo-code TON reward
    Code {
        #[command(subcommand)]
        code: CodeCommands,
    },

    /// Withdraw the full TON balance
    Withdraw,

    /// Reset streak and referral progress (balances are kept)
    Reset,
}

#[derive(Subcommand)]
enum MineCommands {
    /// Start a new cycle
    Start {
        /// Clock override (Unix seconds), defaults to now
        #[arg(long)]
        at: Option<i64>,
    },
    /// Show progress of the active cycle
    Progress {
        #[arg(long)]
        at: Option<i64>,
    },
    /// Claim a matured cycle
    Claim {
        #[arg(long)]
        at: Option<i64>,
    },
}

#[derive(Subcommand)]
enum CodeCommands {
    /// Verify the promo code and stage its reward
    Verify {
        /// Code to check
        input: String,
    },
    /// Move the staged reward into the balance
    Claim,
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false),
        )
        .init();
}

fn expand_path(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(LedgerConfig::default()),
    }
}

fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn print_progress(progress: &MiningProgress, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(progress)?);
    } else if progress.matured {
        println!("Matured, reward ready to claim");
    } else {
        println!(
            "Mining: {:.7}  ({} remaining)",
            progress.fraction,
            format_hms(progress.remaining_secs)
        );
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let data_dir = expand_path(&cli.data_dir);
    tracing::debug!(data_dir = %data_dir.display(), "opening ledger");
    let store = FileStore::new(data_dir.join("account.json"));
    let mut ledger = RewardLedger::open(config, store)?;

    match cli.command {
        Commands::Status => {
            let account = ledger.account();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(account)?);
            } else {
                println!("Player:    {}", account.player_id);
                println!("Points:    {}", account.total_points);
                println!("TON:       {}", account.ton_balance);
                println!("Streak:    {} day(s)", account.login_streak);
                println!("Referrals: {}", account.referral_count());
                match ledger.mining_progress(Utc::now().timestamp()) {
                    Some(progress) if progress.matured => println!("Mining:    ready to claim"),
                    Some(progress) => {
                        println!("Mining:    {}", format_hms(progress.remaining_secs))
                    }
                    None => println!("Mining:    idle"),
                }
            }
        }
        Commands::Tap { amount } => {
            let total = ledger.add_points(amount)?;
            if cli.json {
                println!("{}", serde_json::json!({ "total_points": total }));
            } else {
                println!("Points: {total}");
            }
        }
        Commands::Login { date } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let receipt = ledger.claim_daily_login(today)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!(
                    "Day {} claimed: +{} points",
                    receipt.streak_day, receipt.points_awarded
                );
            }
        }
        Commands::Mine { mine } => {
            let now = Utc::now().timestamp();
            match mine {
                MineCommands::Start { at } => {
                    let cycle = ledger.start_mining(at.unwrap_or(now))?;
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&cycle)?);
                    } else {
                        println!("Mining started, claim in {}", format_hms(cycle.duration_secs));
                    }
                }
                MineCommands::Progress { at } => {
                    match ledger.mining_progress(at.unwrap_or(now)) {
                        Some(progress) => print_progress(&progress, cli.json)?,
                        None if cli.json => println!("null"),
                        None => println!("No active cycle"),
                    }
                }
                MineCommands::Claim { at } => {
                    let reward = ledger.claim_mining(at.unwrap_or(now))?;
                    if cli.json {
                        println!(
                            "{}",
                            serde_json::json!({
                                "points_awarded": reward,
                                "total_points": ledger.total_points(),
                            })
                        );
                    } else {
                        println!("Claimed +{} points (total {})", reward, ledger.total_points());
                    }
                }
            }
        }
        Commands::Refer { id } => {
            let receipt = ledger.register_referral(&id)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else if receipt.accepted {
                println!(
                    "Referral counted: +{} points ({} total referrals)",
                    receipt.bonus_points,
                    ledger.account().referral_count()
                );
            } else {
                println!("Already counted");
            }
        }
        Commands::Referrer { id } => {
            if ledger.set_referrer(&id)? {
                println!("Referrer recorded");
            } else {
                println!("Referrer was already set");
            }
        }
        Commands::Task { id } => {
            let receipt = ledger.complete_task(&id)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else if receipt.accepted {
                println!("Task rewarded: +{} points", receipt.points_awarded);
            } else {
                println!("Task already rewarded");
            }
        }
        Commands::Code { code } => match code {
            CodeCommands::Verify { input } => {
                let staged = ledger.verify_code(&input)?;
                println!("Code accepted: {staged} TON ready to claim");
            }
            CodeCommands::Claim => {
                let amount = ledger.claim_code_reward()?;
                println!("Claimed {amount} TON (balance {})", ledger.ton_balance());
            }
        },
        Commands::Withdraw => {
            let amount = ledger.withdraw_ton()?;
            println!("Withdrew {amount} TON");
        }
        Commands::Reset => {
            ledger.reset_progress()?;
            println!("Progress reset; points and TON balance kept");
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            // typed ledger rejections carry a stable code for UI layers
            if let Some(ledger_err) = err.downcast_ref::<LedgerError>() {
                eprintln!("error[{}]: {}", ledger_err.code(), ledger_err);
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(21_600), "06:00:00");
    }

    #[test]
    fn test_expand_path_passthrough() {
        let plain = PathBuf::from("/tmp/twq-data");
        assert_eq!(expand_path(&plain), plain);
    }

    #[test]
    fn test_default_config_when_unset() {
        let config = load_config(None).unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_config_parses_toml() {
        let dir = std::env::temp_dir().join("twq-cli-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ledger.toml");
        std::fs::write(&path, "[mining]\nduration_secs = 60\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.mining.duration_secs, 60);
        assert_eq!(config.mining.reward_points, 5);
    }
}

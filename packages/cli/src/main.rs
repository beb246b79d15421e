use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use instafarm::{
    AccountId, AssetId, FarmEngine, FarmError, LedgerStore, ManualClock, MemoryStore,
    MemoryToken, PoolId, PoolKind, StakeReceipt, StaticAdmin, TokenInterface, REWARD_PRECISION,
};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

mod state_file;

use state_file::FarmState;

type Farm = FarmEngine<MemoryStore, MemoryToken, ManualClock, StaticAdmin>;

/// Print the InstaFarm banner to stdout.
fn print_banner() {
    let ver = env!("CARGO_PKG_VERSION");
    println!();
    println!("  InstaFarm  v{ver}  ·  multi-pool staking ledger");
    println!("  {}", "─".repeat(62));
    println!("  Emission  fixed reward per time unit, split by pool weight");
    println!("  Accrual   stake-proportional within a pool, O(1) per operation");
    println!("  State     JSON ledger file (see --state)");
    println!();
}

// ─── CLI definition ───────────────────────────────────────────────────────────

/// InstaFarm — deposit, withdraw and harvest against a weighted reward schedule.
///
/// Every command supports --json for machine-readable output.
/// Global options can also be set via environment variables:
///   INSTAFARM_STATE   — path to the ledger state file
///   INSTAFARM_CALLER  — identity the command acts as
///   INSTAFARM_AT      — time unit to run at (default: Unix seconds)
#[derive(Parser)]
#[command(
    name    = "instafarm",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Multi-pool staking ledger — weighted reward emission with O(1) farmer accounting.",
    after_help = "\
ENVIRONMENT:
  INSTAFARM_STATE    Ledger state file  [default: instafarm-state.json]
  INSTAFARM_CALLER   Acting identity
  INSTAFARM_AT       Time unit to run at  [default: seconds since Unix epoch]

QUICK START:
  instafarm --caller ops init --rate 100 --treasury treasury --reward-asset IST
  instafarm --caller ops create-pool --stake-asset IST-LP --weight 10
  instafarm --caller alice deposit --pool 1 --amount 20
  instafarm --caller alice farmer --pool 1
  instafarm --caller alice harvest --pool 1"
)]
struct Cli {
    /// Path to the ledger state file
    #[arg(
        long,
        global        = true,
        value_name    = "PATH",
        default_value = "instafarm-state.json",
        env           = "INSTAFARM_STATE"
    )]
    state: String,

    /// Identity the command acts as (farmer, admin or treasury)
    #[arg(long, global = true, value_name = "ID", default_value = "", env = "INSTAFARM_CALLER")]
    caller: String,

    /// Run at this time unit instead of the wall clock
    #[arg(long, global = true, value_name = "TIME", env = "INSTAFARM_AT")]
    at: Option<u64>,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log engine activity at debug level
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    SingleAsset,
    Liquidity,
}

impl From<KindArg> for PoolKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::SingleAsset => PoolKind::SingleAsset,
            KindArg::Liquidity => PoolKind::Liquidity,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the reward schedule; the caller becomes admin
    Init {
        /// Reward units emitted per time unit across all pools
        #[arg(long, value_name = "AMOUNT")]
        rate: u64,

        /// Identity holding the reward supply
        #[arg(long, value_name = "ID")]
        treasury: String,

        /// Asset rewards are paid in
        #[arg(long, value_name = "ASSET")]
        reward_asset: String,
    },

    /// Admin: add a weighted pool for a stake asset
    CreatePool {
        #[arg(long, value_name = "ASSET")]
        stake_asset: String,

        /// Share of emission relative to the sum of all weights
        #[arg(long, value_name = "WEIGHT")]
        weight: u64,

        #[arg(long, value_enum, default_value_t = KindArg::SingleAsset)]
        kind: KindArg,
    },

    /// Admin: change the global reward rate
    SetRate {
        #[arg(long, value_name = "AMOUNT")]
        rate: u64,
    },

    /// Admin: reweight a pool (0 pauses it)
    SetWeight {
        #[arg(long, value_name = "ID")]
        pool: PoolId,

        #[arg(long, value_name = "WEIGHT")]
        weight: u64,
    },

    /// Refresh every pool's accumulator
    UpdatePools,

    /// Credit tokens to an identity (local ledger only)
    Mint {
        #[arg(long, value_name = "ASSET")]
        asset: String,

        #[arg(long, value_name = "ID")]
        to: String,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Allow the farm's custody account to pull the caller's tokens
    Approve {
        #[arg(long, value_name = "ASSET")]
        asset: String,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Stake into a pool (harvests pending reward first)
    Deposit {
        #[arg(long, value_name = "ID")]
        pool: PoolId,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Unstake from a pool (harvests pending reward first)
    Withdraw {
        #[arg(long, value_name = "ID")]
        pool: PoolId,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Claim pending reward from a pool
    Harvest {
        #[arg(long, value_name = "ID")]
        pool: PoolId,
    },

    /// List every pool
    Pools,

    /// Show a farmer's stake and pending reward
    Farmer {
        #[arg(long, value_name = "ID")]
        pool: PoolId,

        /// Farmer to inspect (defaults to --caller)
        #[arg(long, value_name = "ID")]
        farmer: Option<String>,
    },

    /// Show a token balance
    Balance {
        #[arg(long, value_name = "ASSET")]
        asset: String,

        /// Holder to inspect (defaults to --caller)
        #[arg(long, value_name = "ID")]
        holder: Option<String>,
    },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // When invoked with no arguments, show banner + full help and exit cleanly.
    if std::env::args().len() == 1 {
        print_banner();
        Cli::command().print_long_help().ok();
        println!();
        return Ok(());
    }

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = state_file::expand_home(&cli.state);
    let state = state_file::load(&path).await?;
    let now = match cli.at {
        Some(at) => at,
        None => wall_clock()?,
    };
    let caller = AccountId::new(cli.caller.clone());
    let mut farm = open_farm(state, &caller, now);

    let outcome = run(&cli, &mut farm, &caller);
    let dirty = match &outcome {
        Ok(dirty) => *dirty,
        // A refused harvest still committed the pool refresh.
        Err(err) => matches!(
            err.downcast_ref::<FarmError>(),
            Some(FarmError::TreasuryInsufficient { .. })
        ),
    };
    if dirty {
        let (ledger, token) = farm.into_parts();
        state_file::save(&path, &FarmState { ledger, token }).await?;
    }
    outcome.map(|_| ())
}

fn wall_clock() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?
        .as_secs())
}

/// Build the engine over a loaded state. The recorded admin authorizes admin
/// commands; before `init` the caller is the prospective admin.
fn open_farm(state: FarmState, caller: &AccountId, now: u64) -> Farm {
    let admin = state
        .ledger
        .schedule()
        .map(|schedule| schedule.admin)
        .unwrap_or_else(|| caller.clone());
    FarmEngine::new(state.ledger, state.token, ManualClock::at(now), StaticAdmin(admin))
}

fn require_caller(caller: &AccountId) -> Result<()> {
    if caller.as_str().is_empty() {
        return Err(anyhow!(
            "No caller identity. Pass --caller <ID> or set INSTAFARM_CALLER."
        ));
    }
    Ok(())
}

/// Dispatch one command. Returns whether the state file must be rewritten.
fn run(cli: &Cli, farm: &mut Farm, caller: &AccountId) -> Result<bool> {
    let json_output = cli.json;
    match &cli.command {
        Commands::Init { rate, treasury, reward_asset } => {
            require_caller(caller)?;
            let schedule = farm
                .initialize(caller, *rate, AccountId::from(treasury.as_str()), AssetId::from(reward_asset.as_str()))
                .context("Initialization failed")?;
            if json_output {
                println!("{}", json!({ "status": "ok", "command": "init", "schedule": schedule }));
            } else {
                println!("─── Farm initialized ─────────────────────────────────────────────");
                println!("  Admin            {}", schedule.admin);
                println!("  Reward rate      {:>20}  per time unit", schedule.reward_per_time_unit);
                println!("  Treasury         {}", schedule.treasury);
                println!("  Reward asset     {}", schedule.reward_asset);
                println!("  Custody          {}", farm.token().custody());
                println!();
                println!("  Treasury must approve custody before harvests can pay out:");
                println!("    instafarm --caller {} approve --asset {} --amount <AMT>",
                         schedule.treasury, schedule.reward_asset);
            }
            Ok(true)
        }
        Commands::CreatePool { stake_asset, weight, kind } => {
            let kind = PoolKind::from(*kind);
            let id = farm
                .create_pool(caller, AssetId::from(stake_asset.as_str()), *weight, kind)
                .context("Pool creation failed")?;
            if json_output {
                println!("{}", json!({
                    "status": "ok", "command": "create-pool",
                    "pool": id, "stake_asset": stake_asset, "weight": weight, "kind": kind,
                }));
            } else {
                println!("  Pool {id} created: {stake_asset} ({kind}), weight {weight}");
            }
            Ok(true)
        }
        Commands::SetRate { rate } => {
            farm.set_reward_rate(caller, *rate).context("Rate change failed")?;
            print_ok(json_output, "set-rate", json!({ "rate": rate }), format!("Reward rate set to {rate}"));
            Ok(true)
        }
        Commands::SetWeight { pool, weight } => {
            farm.set_pool_weight(caller, *pool, *weight).context("Reweight failed")?;
            print_ok(
                json_output,
                "set-weight",
                json!({ "pool": pool, "weight": weight }),
                format!("Pool {pool} weight set to {weight}"),
            );
            Ok(true)
        }
        Commands::UpdatePools => {
            farm.mass_update_pools().context("Pool refresh failed")?;
            let count = farm.list_pools().len();
            print_ok(json_output, "update-pools", json!({ "pools": count }), format!("Refreshed {count} pool(s)"));
            Ok(true)
        }
        Commands::Mint { asset, to, amount } => {
            let (asset, to) = (AssetId::from(asset.as_str()), AccountId::from(to.as_str()));
            farm.token_mut()
                .mint(&asset, &to, *amount)
                .map_err(|e| anyhow!("Mint failed: {e}"))?;
            print_ok(
                json_output,
                "mint",
                json!({ "asset": asset, "to": to, "amount": amount }),
                format!("Minted {amount} {asset} to {to}"),
            );
            Ok(true)
        }
        Commands::Approve { asset, amount } => {
            require_caller(caller)?;
            let asset = AssetId::from(asset.as_str());
            let custody = farm.token().custody().clone();
            farm.token_mut().approve(&asset, caller, &custody, *amount);
            print_ok(
                json_output,
                "approve",
                json!({ "asset": asset, "owner": caller, "spender": custody, "amount": amount }),
                format!("{caller} approved {custody} for {amount} {asset}"),
            );
            Ok(true)
        }
        Commands::Deposit { pool, amount } => {
            require_caller(caller)?;
            let receipt = farm
                .deposit(caller, *pool, *amount)
                .with_context(|| format!("Deposit into pool {pool} failed"))?;
            print_receipt(json_output, "deposit", *pool, caller, &receipt);
            Ok(true)
        }
        Commands::Withdraw { pool, amount } => {
            require_caller(caller)?;
            let receipt = farm
                .withdraw(caller, *pool, *amount)
                .with_context(|| format!("Withdraw from pool {pool} failed"))?;
            print_receipt(json_output, "withdraw", *pool, caller, &receipt);
            Ok(true)
        }
        Commands::Harvest { pool } => {
            require_caller(caller)?;
            let reward = farm
                .harvest(caller, *pool)
                .with_context(|| format!("Harvest from pool {pool} failed"))?;
            print_ok(
                json_output,
                "harvest",
                json!({ "pool": pool, "farmer": caller, "reward": reward }),
                format!("Harvested {reward} reward from pool {pool}"),
            );
            Ok(true)
        }
        Commands::Pools => {
            cmd_pools(farm, json_output)?;
            Ok(false)
        }
        Commands::Farmer { pool, farmer } => {
            let farmer = farmer.as_deref().map(AccountId::from).unwrap_or_else(|| caller.clone());
            require_caller(&farmer)?;
            let info = farm.query_farmer_info(*pool, &farmer)?;
            if json_output {
                println!("{}", json!({
                    "status": "ok", "command": "farmer",
                    "pool": pool, "farmer": farmer,
                    "amount": info.amount, "pending_reward": info.pending_reward,
                }));
            } else {
                println!("─── Farmer {farmer} · pool {pool} ────────────────────────────────");
                println!("  Staked           {:>20}", info.amount);
                println!("  Pending reward   {:>20}", info.pending_reward);
            }
            Ok(false)
        }
        Commands::Balance { asset, holder } => {
            let holder = holder.as_deref().map(AccountId::from).unwrap_or_else(|| caller.clone());
            require_caller(&holder)?;
            let asset = AssetId::from(asset.as_str());
            let balance = farm.token().balance_of(&asset, &holder);
            print_ok(
                json_output,
                "balance",
                json!({ "asset": asset, "holder": holder, "balance": balance }),
                format!("{holder} holds {balance} {asset}"),
            );
            Ok(false)
        }
    }
}

fn print_ok(json_output: bool, command: &str, fields: serde_json::Value, text: String) {
    if json_output {
        let mut out = json!({ "status": "ok", "command": command });
        if let (Some(out), Some(fields)) = (out.as_object_mut(), fields.as_object()) {
            out.extend(fields.clone());
        }
        println!("{out}");
    } else {
        println!("  {text}");
    }
}

fn print_receipt(
    json_output: bool,
    command: &str,
    pool: PoolId,
    farmer: &AccountId,
    receipt: &StakeReceipt,
) {
    if json_output {
        println!("{}", json!({
            "status": "ok", "command": command,
            "pool": pool, "farmer": farmer, "receipt": receipt,
        }));
    } else {
        println!("─── {command} · pool {pool} ──────────────────────────────────────────");
        println!("  Farmer           {farmer}");
        println!("  Amount           {:>20}", receipt.amount);
        println!("  Staked now       {:>20}", receipt.staked);
        println!("  Reward paid      {:>20}", receipt.reward_paid);
        if receipt.reward_owed > 0 {
            println!("  Reward owed      {:>20}  (treasury short — run `harvest` later)", receipt.reward_owed);
        }
    }
}

// ─── pools ────────────────────────────────────────────────────────────────────

fn cmd_pools(farm: &Farm, json_output: bool) -> Result<()> {
    let schedule = farm.schedule().context("Farm is not initialized. Run `instafarm init` first.")?;
    let pools = farm.query_all_pools();

    if json_output {
        println!("{}", json!({
            "status": "ok", "command": "pools",
            "schedule": schedule, "pools": pools,
        }));
        return Ok(());
    }

    println!("─── Pools ────────────────────────────────────────────────────────");
    println!("  Reward rate      {:>20}  per time unit", schedule.reward_per_time_unit);
    println!("  Total weight     {:>20}", schedule.total_weight);
    println!();
    if pools.is_empty() {
        println!("  No pools yet — run `instafarm create-pool` as admin.");
        return Ok(());
    }
    for pool in &pools {
        let share = if schedule.total_weight > 0 {
            pool.weight as f64 / schedule.total_weight as f64 * 100.0
        } else {
            0.0
        };
        println!("  [{:>2}]  Stake asset  {}  ({})", pool.id, pool.stake_asset, pool.kind);
        println!("        Weight       {:>20}  ({share:.2}% of emission)", pool.weight);
        println!("        Staked       {:>20}", pool.total_staked);
        println!("        Acc/share    {:>20.6}", pool.acc_reward_per_share as f64 / REWARD_PRECISION as f64);
        println!("        Updated at   {:>20}", pool.last_update);
        println!();
    }
    Ok(())
}

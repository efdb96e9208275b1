//! Command line interface for the liquidity position manager.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use lpm_domain::{Amount, Percent, Price, Project, Token};
use lpm_execution::config::RunnerConfig;
use lpm_execution::managers::{NewProject, NewWallet};
use lpm_simulation::prelude::*;
use prettytable::{Table, row};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "lpm")]
#[command(about = "Concentrated-liquidity position manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one project against a paper ETH/USDC pool
    Simulate(SimulateArgs),
    /// Print the wallet address a private key maps to on the paper market
    DeriveAddress {
        /// Network the wallet lives on
        #[arg(short, long, default_value = PAPER_NETWORK)]
        network: String,

        /// Private key
        #[arg(short, long)]
        key: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InvestIn {
    Weth,
    Usdc,
}

#[derive(clap::Args)]
struct SimulateArgs {
    /// Starting WETH price in USDC
    #[arg(long, default_value = "2000")]
    price: Decimal,

    /// Total investment, in the token chosen by --invest-in
    #[arg(long, default_value = "2")]
    investment: Decimal,

    /// Token the investment is measured in
    #[arg(long, value_enum, default_value_t = InvestIn::Weth)]
    invest_in: InvestIn,

    /// Starting ETH balance (gas)
    #[arg(long, default_value = "1")]
    eth: Decimal,

    /// Starting WETH balance
    #[arg(long, default_value = "2")]
    weth: Decimal,

    /// Starting USDC balance
    #[arg(long, default_value = "0")]
    usdc: Decimal,

    /// Evaluation cycles to run
    #[arg(short, long, default_value_t = 100)]
    steps: u64,

    /// Range half-width as a fraction of the price
    #[arg(long, default_value = "0.1")]
    range_volatility: Decimal,

    /// Take-profit fraction
    #[arg(long, default_value = "0.2")]
    take_profit: Decimal,

    /// Stop-loss fraction
    #[arg(long, default_value = "0.1")]
    stop_loss: Decimal,

    /// Swap slippage tolerance
    #[arg(long, default_value = "0.01")]
    slippage: Decimal,

    /// Pool fee in basis points
    #[arg(long, default_value_t = 30)]
    fee_bps: u32,

    /// Annualised drift of the price path
    #[arg(long, default_value_t = 0.0)]
    drift: f64,

    /// Annualised volatility of the price path
    #[arg(long, default_value_t = 0.6)]
    volatility: f64,

    /// Hours of market time per step
    #[arg(long, default_value_t = 1.0)]
    step_hours: f64,

    /// Seed for a reproducible price path
    #[arg(long)]
    seed: Option<u64>,

    /// Quote volume traded per step
    #[arg(long, default_value = "250000")]
    volume: Decimal,

    /// Liquidity of the other providers in the pool
    #[arg(long, default_value = "10000")]
    external_liquidity: Decimal,

    /// Private key of the paper wallet
    #[arg(long, default_value = "paper-wallet")]
    key: String,

    /// Print one JSON object per step
    #[arg(long)]
    jsonl: bool,
}

#[derive(Serialize)]
struct StepLine<'a> {
    step: u64,
    ticks: &'a [PoolTick],
    outcomes: Vec<OutcomeLine>,
    blocked: usize,
    in_flight: usize,
}

#[derive(Serialize)]
struct OutcomeLine {
    project: String,
    outcome: Option<&'static str>,
    error: Option<String>,
}

impl<'a> StepLine<'a> {
    fn new(report: &'a StepReport) -> Self {
        let outcomes = report
            .cycle
            .reports
            .iter()
            .map(|r| match &r.result {
                Ok(outcome) => OutcomeLine {
                    project: r.project.to_string(),
                    outcome: Some(outcome.label()),
                    error: None,
                },
                Err(e) => OutcomeLine {
                    project: r.project.to_string(),
                    outcome: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        Self {
            step: report.step,
            ticks: &report.ticks,
            outcomes,
            blocked: report.cycle.blocked,
            in_flight: report.cycle.in_flight,
        }
    }
}

fn human(token: &Arc<Token>, value: Decimal) -> Result<Amount> {
    Amount::from_human(Arc::clone(token), value)
        .with_context(|| format!("invalid {} amount {value}", token.ticker))
}

async fn setup(
    args: &SimulateArgs,
    session: &PaperSession,
    scenario: &EthUsdc,
) -> Result<Project> {
    let wallet = session
        .wallets
        .new_wallet(NewWallet {
            name: "paper".to_string(),
            network: PAPER_NETWORK.to_string(),
            private_key: args.key.clone(),
            native_token: Arc::clone(&scenario.eth),
        })
        .await?;
    for (token, value) in [
        (&scenario.eth, args.eth),
        (&scenario.weth, args.weth),
        (&scenario.usdc, args.usdc),
    ] {
        session
            .market
            .deposit(&wallet.address, &human(token, value)?)
            .await?;
    }

    let investment_token = match args.invest_in {
        InvestIn::Weth => &scenario.weth,
        InvestIn::Usdc => &scenario.usdc,
    };
    let project = session
        .projects
        .new_project(NewProject {
            wallet,
            pool: scenario.pool.clone(),
            name: format!("paper {}", scenario.pool.name()),
            investments: human(investment_token, args.investment)?,
            take_profit: Percent::new(args.take_profit),
            stop_loss: Percent::new(args.stop_loss),
            range_volatility: Percent::new(args.range_volatility),
            slippage: Percent::new(args.slippage),
            active_positions: 1,
        })
        .await
        .context("create project")?;
    Ok(project)
}

async fn simulate(args: SimulateArgs, config: RunnerConfig) -> Result<()> {
    let market = Arc::new(PaperMarket::default());
    let scenario = EthUsdc::new(args.price, Percent::from_bps(args.fee_bps));
    let path = GeometricBrownianMotion::new(
        args.drift,
        args.volatility,
        args.step_hours / (365.0 * 24.0),
        args.seed,
    )?;
    scenario
        .install(&market, Box::new(path), args.external_liquidity, args.volume)
        .await;

    let mut session = PaperSession::new(Arc::clone(&market), config)?;
    let project = setup(&args, &session, &scenario).await?;
    info!(project = %project.id, wallet = %project.wallet.address, "Simulation started");

    for _ in 0..args.steps {
        let report = session.step().await?;
        if args.jsonl {
            println!("{}", serde_json::to_string(&StepLine::new(&report))?);
        }
        if !session.projects.get(project.id).await?.is_active() {
            info!(step = report.step, "Project deactivated, stopping");
            break;
        }
    }

    let project = session.projects.get(project.id).await?;
    let summary = session.runner.tracker().get_summary(&project.id).await;
    let last_price = market
        .pool(&scenario.pool.network, &scenario.pool.address)
        .await
        .map(|p| p.last_price)
        .unwrap_or(Price::new(args.price));
    let address = &project.wallet.address;

    let mut table = Table::new();
    table.add_row(row!["Project", project.name]);
    table.add_row(row!["Steps", session.totals().steps]);
    table.add_row(row!["Final price", last_price]);
    if let Some(summary) = &summary {
        table.add_row(row!["Opens", summary.opens]);
        table.add_row(row!["Swaps", summary.swaps]);
        table.add_row(row!["Closes", summary.closes]);
        table.add_row(row!["Failures", summary.failures]);
    }
    let open_positions = market.open_positions().await;
    table.add_row(row!["Open positions", open_positions]);
    table.add_row(row!["Investment", project.investments]);
    table.add_row(row!["Worth", project.current_value()]);
    let status = match project.inactive_reason() {
        Some(reason) => format!("inactive ({reason:?})"),
        None => "active".to_string(),
    };
    table.add_row(row!["Status", status]);
    for token in [&scenario.eth, &scenario.weth, &scenario.usdc] {
        let balance = market.balance_of(address, token).await;
        table.add_row(row![format!("{} balance", token.ticker), balance]);
    }

    if args.jsonl {
        eprintln!("{table}");
    } else {
        table.printstd();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => {
            let config = RunnerConfig::from_env()?;
            simulate(args, config).await?;
        }
        Commands::DeriveAddress { network, key } => {
            println!("{}", derive_address(&network, &key));
        }
    }

    Ok(())
}

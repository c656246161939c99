//! Plan and record one rebalance of a sample portfolio.
//!
//! ```text
//! cargo run --example rebalance_demo [config.toml]
//! ```
//!
//! Without a config file the demo uses the defaults: the permanent portfolio
//! strategy and history under `./data/rebalance_history.json`.

use std::path::Path;

use anyhow::Context;
use smartfolio::{AssetClass, Config, ConfirmOptions, Error, Holding, Rebalancer};

fn sample_holdings() -> Vec<Holding> {
    vec![
        Holding::new("1", "Global Tech ETF", "513100", 35_000.0, AssetClass::Stock)
            .with_profit(6_300.0, 18.0)
            .with_recent_changes(Some(1.2), Some(6.4)),
        Holding::new("2", "CSI 300 ETF", "510300", 12_000.0, AssetClass::Stock)
            .with_profit(-400.0, -3.2),
        Holding::new("3", "Treasury Bond ETF", "511010", 18_000.0, AssetClass::Bond)
            .with_profit(540.0, 3.1),
        Holding::new("4", "Gold ETF", "518880", 9_000.0, AssetClass::Gold)
            .with_profit(900.0, 11.1)
            .with_recent_changes(Some(2.1), Some(3.5)),
        Holding::new("5", "Money Market Fund", "511990", 6_000.0, AssetClass::Cash),
    ]
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    let strategy = config
        .active_strategy()
        .context("resolving active strategy")?;

    let mut rebalancer = Rebalancer::from_config(&config);
    let plan = rebalancer.plan(&sample_holdings(), &strategy)?;
    println!("{plan}");

    match rebalancer.confirm(&plan, ConfirmOptions::default()) {
        Ok(record) => println!(
            "Recorded rebalance {} to {}",
            record.id,
            config.history_path().display()
        ),
        Err(Error::NothingToRebalance) => println!("Portfolio already on target."),
        Err(Error::DisciplineBlocked(n)) => {
            println!("Not recorded: {n} blocking discipline rule(s).")
        }
        Err(e) => return Err(e.into()),
    }

    let summary = rebalancer.ledger().summarize();
    println!(
        "History: {} rebalance(s), {:.2} points of deviation removed",
        summary.total_count, summary.total_deviation_saved
    );
    Ok(())
}

#![forbid(unsafe_code)]
//! Replay a scripted call sequence against a fresh ledger and print the result.

use clap::Parser;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tokenledger::call::CallOutcome;
use tokenledger::config::{load_config_from, DEFAULT_CONFIG_PATH};
use tokenledger::crypto::{address_to_hex, resolve_address, Address};
use tokenledger::scenario::Scenario;
use tokenledger::Ledger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON scenario file
    scenario: PathBuf,

    /// Config file (defaults apply when it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print only the final tables
    #[arg(long)]
    quiet: bool,
}

/// Maps addresses back to the labels the scenario used for them.
struct Labels(HashMap<Address, String>);

impl Labels {
    fn collect(scenario: &Scenario) -> Self {
        let mut labels = HashMap::new();
        let mut add = |s: &str| {
            labels.entry(resolve_address(s)).or_insert_with(|| s.to_string());
        };
        for step in &scenario.calls {
            add(&step.caller);
            if let Value::Object(args) = &step.args {
                for value in args.values() {
                    if let Value::String(s) = value {
                        add(s);
                    }
                }
            }
        }
        Labels(labels)
    }

    fn name(&self, address: &Address) -> String {
        match self.0.get(address) {
            Some(label) if label.len() != 64 => label.clone(),
            _ => {
                let hex = address_to_hex(address);
                format!("{}...{}", &hex[..8], &hex[hex.len() - 8..])
            }
        }
    }
}

fn describe(outcome: &CallOutcome, labels: &Labels) -> String {
    match outcome {
        CallOutcome::Unit => "ok".to_string(),
        CallOutcome::Amount(v) => v.to_string(),
        CallOutcome::Count(n) => n.to_string(),
        CallOutcome::Address(a) => labels.name(a),
        CallOutcome::OptionalAddress(Some(a)) => labels.name(a),
        CallOutcome::OptionalAddress(None) => "none".to_string(),
        CallOutcome::Bool(b) => b.to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config_from(&cli.config)?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();

    let scenario = Scenario::load(&cli.scenario)
        .map_err(|e| format!("Failed to load {}: {}", cli.scenario.display(), e))?;
    let labels = Labels::collect(&scenario);

    let mut ledger = Ledger::from_config(&config);
    println!(
        "{}",
        format!(
            "▶ Replaying {} calls against {} ({})",
            scenario.calls.len(),
            ledger.metadata().name,
            ledger.metadata().symbol
        )
        .bright_cyan()
        .bold()
    );
    println!();

    let results = scenario.run(&mut ledger);
    let rejected = results.iter().filter(|r| r.result.is_err()).count();

    if !cli.quiet {
        for step in &results {
            let prefix = format!("{:>4}. {:<10} {:<22}", step.index + 1, labels.name(&step.caller), step.op);
            match &step.result {
                Ok(outcome) => println!(
                    "{} {} {}",
                    "✔".green().bold(),
                    prefix,
                    describe(outcome, &labels).bright_white()
                ),
                Err(e) => println!(
                    "{} {} {}",
                    "✘".red().bold(),
                    prefix,
                    format!("{:?}: {}", e.kind(), e).red()
                ),
            }
        }
        println!();
    }

    let state = ledger.state();

    let mut balances = Table::new();
    balances
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Account")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Balance")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Items")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
        ]);
    let mut holders: Vec<Address> = state.holders().map(|(a, _)| *a).collect();
    for (_, owner) in state.items() {
        if !holders.contains(owner) {
            holders.push(*owner);
        }
    }
    holders.sort_by_key(|a| labels.name(a));
    for account in &holders {
        balances.add_row(vec![
            Cell::new(labels.name(account)).fg(TableColor::Yellow),
            Cell::new(state.balance_of(account)).fg(TableColor::Green),
            Cell::new(state.item_balance_of(account)).fg(TableColor::Magenta),
        ]);
    }
    println!("{}", balances);

    let mut items = Table::new();
    items
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Item")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Owner")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Approved")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
        ]);
    let mut ids: Vec<(u64, Address)> = state.items().map(|(id, owner)| (*id, *owner)).collect();
    ids.sort_unstable_by_key(|(id, _)| *id);
    for (id, owner) in ids {
        let approved = state
            .item_approval(id)
            .map(|a| labels.name(a))
            .unwrap_or_else(|| "-".to_string());
        items.add_row(vec![
            Cell::new(id).fg(TableColor::Yellow),
            Cell::new(labels.name(&owner)).fg(TableColor::Green),
            Cell::new(approved),
        ]);
    }
    println!("{}", items);

    println!();
    println!(
        "{} {}  {} {}  {} {}",
        "Supply:".bright_blue().bold(),
        state.total_supply().to_string().bright_white(),
        "Items:".bright_blue().bold(),
        state.item_supply().to_string().bright_white(),
        "Rejected:".bright_blue().bold(),
        if rejected == 0 {
            rejected.to_string().green()
        } else {
            rejected.to_string().yellow()
        }
    );

    state
        .check_invariants()
        .map_err(|e| format!("Ledger invariants broken after replay: {}", e))?;

    Ok(())
}

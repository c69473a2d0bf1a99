//! stakedash - command-line staking dashboard for Polkadot networks.

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use stakedash::{
    AccountSnapshot, ReconcilePolicy, StakingFacade, StoreConfig, StoreEvent, TxOutcome,
};
use stakedash_chain::{AccountSigner, ChainClient, KeypairSigner, RpcEndpoints};
use stakedash_core::config::{load_config, save_config};
use stakedash_core::{
    AppConfig, EraIndex, Network, NetworkConfig, SortDirection, SortField, Validator,
    dot_to_planck, format_balance, format_commission,
};
use tokio::sync::mpsc;

/// Staking dashboard - validators, nominations and bags-list status.
#[derive(Parser, Debug)]
#[command(name = "stakedash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network to connect to (defaults to the configured network)
    #[arg(short, long)]
    network: Option<Network>,

    /// Custom Asset Hub RPC endpoint URL (for staking data and transactions)
    #[arg(long = "asset-hub-url")]
    asset_hub_url: Option<String>,

    /// Custom relay chain RPC endpoint URL (for the active validator set)
    #[arg(long = "relay-url")]
    relay_url: Option<String>,

    /// Custom People chain RPC endpoint URL (for identity data)
    #[arg(long = "people-url")]
    people_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List validators for an era
    Validators {
        /// Era to show (defaults to the active era)
        #[arg(long)]
        era: Option<EraIndex>,

        #[arg(long, value_enum, default_value = "reward")]
        sort: SortArg,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Show at most this many validators
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show nominator, eligibility and bags-list status for an account
    Account {
        /// SS58 address (defaults to the last inspected account)
        address: Option<String>,
    },
    /// Bond additional tokens
    BondMore {
        /// Secret URI of the signing account
        #[arg(long)]
        suri: String,

        /// Amount in whole tokens
        #[arg(long)]
        amount: f64,
    },
    /// Unbond tokens
    Unbond {
        #[arg(long)]
        suri: String,

        #[arg(long)]
        amount: f64,
    },
    /// Nominate validators
    Nominate {
        #[arg(long)]
        suri: String,

        /// Validator addresses
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Move the account to its correct bag
    Rebag {
        #[arg(long)]
        suri: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Reward,
    Commission,
    Points,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Reward => SortField::Reward,
            SortArg::Commission => SortField::Commission,
            SortArg::Points => SortField::RewardPoints,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    stakedash::log::init_logging()?;

    let mut config = load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    if let Some(network) = args.network {
        config.network = NetworkConfig::from(network);
    }
    let network = config.network.to_network();
    let endpoints = RpcEndpoints {
        asset_hub: args.asset_hub_url.or_else(|| config.asset_hub_rpc.clone()),
        relay: args.relay_url.or_else(|| config.relay_rpc.clone()),
        people: args.people_url.or_else(|| config.people_rpc.clone()),
    };

    tracing::info!("Connecting to {}", network);
    let client = ChainClient::connect(network, &endpoints).await?;

    let (facade, events) = StakingFacade::new(
        Arc::new(client),
        StoreConfig::from(&config),
        ReconcilePolicy::from_config(&config),
    );
    let printer = tokio::spawn(print_events(events));

    match args.command {
        Command::Validators {
            era,
            sort,
            asc,
            limit,
        } => {
            facade.initialize(None).await?;
            let state = facade.store().snapshot();
            if let Some(era) = era.filter(|era| Some(*era) != state.current_era) {
                facade.load_validators_for_era(era).await?;
            }
            facade.store().set_sort_field(sort.into());
            facade.store().set_sort_direction(if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            });
            let state = facade.store().snapshot();
            println!(
                "Era {} ({} validators, minimum bond {}), sorted by {}",
                state.selected_era.unwrap_or_default(),
                state.validators.len(),
                format_balance(state.min_stake, network.token_symbol()),
                state.sort.field.label()
            );
            let shown = limit.unwrap_or(state.validators.len());
            for (rank, validator) in state.validators.iter().take(shown).enumerate() {
                print_validator(rank + 1, validator);
            }
        }
        Command::Account { address } => {
            let address = address
                .or_else(|| config.last_account.clone())
                .ok_or_else(|| eyre!("No address given and no previous account configured"))?;
            facade.initialize(None).await?;
            let account = facade.load_account_data(&address).await;
            print_account(&address, &account, network);
            config.last_account = Some(address);
            if let Err(e) = save_config(&config) {
                tracing::warn!("Failed to save config: {}", e);
            }
        }
        Command::BondMore { suri, amount } => {
            let signer = KeypairSigner::from_suri(&suri, network)?;
            let amount = dot_to_planck(amount)?;
            facade.initialize(Some(&signer.address())).await?;
            let outcome = facade.bond_more(Some(&signer), amount).await?;
            finish_transaction(&facade, &signer, outcome, network).await;
        }
        Command::Unbond { suri, amount } => {
            let signer = KeypairSigner::from_suri(&suri, network)?;
            let amount = dot_to_planck(amount)?;
            facade.initialize(Some(&signer.address())).await?;
            let outcome = facade.unbond(Some(&signer), amount).await?;
            finish_transaction(&facade, &signer, outcome, network).await;
        }
        Command::Nominate { suri, targets } => {
            let signer = KeypairSigner::from_suri(&suri, network)?;
            facade.initialize(Some(&signer.address())).await?;
            for target in &targets {
                facade.store().toggle_validator_address(target)?;
            }
            let outcome = facade.nominate(Some(&signer)).await?;
            finish_transaction(&facade, &signer, outcome, network).await;
        }
        Command::Rebag { suri } => {
            let signer = KeypairSigner::from_suri(&suri, network)?;
            facade.initialize(Some(&signer.address())).await?;
            let outcome = facade.rebag(Some(&signer)).await?;
            finish_transaction(&facade, &signer, outcome, network).await;
        }
    }

    drop(facade);
    let _ = printer.await;
    Ok(())
}

async fn print_events(mut events: mpsc::UnboundedReceiver<StoreEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            StoreEvent::Notice(notification) => println!("{}", notification),
            StoreEvent::Transaction { tx_type, status } => {
                let marker = if status.is_pending() { "..." } else { "" };
                println!("{}: {}{}", tx_type.label(), status.label(), marker);
            }
        }
    }
}

async fn finish_transaction(
    facade: &StakingFacade<ChainClient>,
    signer: &KeypairSigner,
    outcome: TxOutcome,
    network: Network,
) {
    if let TxOutcome::Skipped { reason } = &outcome {
        println!("Nothing submitted: {}", reason);
        return;
    }
    println!("Waiting for account state to update...");
    outcome.reconciled().await;
    let state = facade.store().snapshot();
    let account = AccountSnapshot {
        nominator_status: state.nominator_status.unwrap_or_default(),
        can_nominate: state.can_nominate.unwrap_or(false),
        bag_list_info: state.bag_list_info.unwrap_or_default(),
    };
    print_account(&signer.address(), &account, network);
}

fn print_validator(rank: usize, validator: &Validator) {
    let flags = match (validator.blocked, validator.identity) {
        (true, _) => " [blocked]",
        (false, false) => " [no identity]",
        (false, true) => "",
    };
    println!(
        "{:>4}. {:<32} {:>8} {:>8} pts {:>10.1} reward  {}{}",
        rank,
        validator.display_name,
        format_commission(validator.commission),
        validator.reward_points,
        validator.reward,
        validator.address,
        flags
    );
}

fn print_account(address: &str, account: &AccountSnapshot, network: Network) {
    let symbol = network.token_symbol();
    let status = &account.nominator_status;
    println!("Account {}", address);
    if status.error {
        println!("  Nominator status: unavailable");
    } else if status.is_nominating {
        println!("  Bonded: {}", format_balance(status.bonded_amount, symbol));
        let targets = status.nominations.as_deref().unwrap_or_default();
        println!("  Nominating {} validators", targets.len());
        for target in targets {
            println!("    {}", target);
        }
        match status.is_earning_rewards {
            Some(true) => println!("  Earning rewards: yes"),
            Some(false) => println!("  Earning rewards: no (no nominee is active)"),
            None => {}
        }
    } else {
        println!("  Not nominating");
    }
    println!(
        "  Eligible to nominate: {}",
        if account.can_nominate { "yes" } else { "no" }
    );

    let bags = &account.bag_list_info;
    if bags.error {
        println!("  Bags list: unavailable");
    } else if let Some(correct) = bags.correct_bag {
        println!(
            "  Bag: {} (correct: {})",
            format_balance(bags.current_bag, symbol),
            format_balance(Some(correct), symbol)
        );
        if bags.is_misplaced == Some(true) {
            println!("  Account is in the wrong bag; run `stakedash rebag` to fix");
        }
    }
}

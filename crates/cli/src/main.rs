//! Command line interface for the Woosh client engine.
//!
//! Runs the quoting and liquidity machinery against an in-memory demo
//! chain seeded with a handful of pools, so every command works offline.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use primitive_types::U256;
use std::sync::Arc;
use tracing::info;
use woosh_chain::client::CallValue;
use woosh_chain::contracts::{self, DexContracts};
use woosh_chain::directory::PoolDirectory;
use woosh_chain::mock::MockChain;
use woosh_chain::reader::PairReader;
use woosh_domain::registry::TokenRegistry;
use woosh_domain::value_objects::units::to_decimal_string;
use woosh_domain::{Address, BasisPoints, Token};
use woosh_execution::prelude::*;

/// The demo wallet every command acts as.
const DEMO_ACCOUNT: &str = "0x5A52E96BAcdaBb82fd05763E25335261B270Efcb";

#[derive(Parser)]
#[command(name = "woosh")]
#[command(about = "Woosh AMM client engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the curated token registry
    Tokens,
    /// Quote a swap against the demo pools
    Quote {
        /// Input token symbol (e.g., USDC)
        #[arg(short, long, default_value = "USDC")]
        from: String,

        /// Output token symbol (e.g., EURC)
        #[arg(short, long, default_value = "EURC")]
        to: String,

        /// Input amount in whole tokens (decimal string)
        #[arg(short, long, default_value = "1000")]
        amount: String,

        /// Slippage tolerance in basis points
        #[arg(short, long, default_value_t = 50)]
        slippage_bps: u32,
    },
    /// Preview a proportional liquidity withdrawal
    RemovePreview {
        /// Token A symbol
        #[arg(long, default_value = "USDC")]
        token_a: String,

        /// Token B symbol
        #[arg(long, default_value = "EURC")]
        token_b: String,

        /// Share of the LP balance to withdraw (0-100)
        #[arg(short, long, default_value_t = 50)]
        percent: u8,
    },
    /// Resolve symbol and decimals for an arbitrary token contract
    Inspect {
        /// Token contract address (0x...)
        address: String,
    },
    /// Browse the factory's pool directory
    Pools {
        /// Page number (5 pools per page)
        #[arg(short, long, default_value_t = 0)]
        page: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let registry = TokenRegistry::default();

    match &cli.command {
        Commands::Tokens => {
            println!("🪙 Registered tokens:");
            println!("{:<8} | {:<26} | {:<42} | dec", "symbol", "name", "address");
            for token in registry.tokens() {
                println!(
                    "{:<8} | {:<26} | {:<42} | {}",
                    token.symbol, token.name, token.address, token.decimals
                );
            }
        }
        Commands::Quote {
            from,
            to,
            amount,
            slippage_bps,
        } => {
            let token_in = lookup(&registry, from)?;
            let token_out = lookup(&registry, to)?;
            quote(token_in, token_out, amount, *slippage_bps).await?;
        }
        Commands::RemovePreview {
            token_a,
            token_b,
            percent,
        } => {
            let token_a = lookup(&registry, token_a)?;
            let token_b = lookup(&registry, token_b)?;
            remove_preview(token_a, token_b, *percent).await?;
        }
        Commands::Inspect { address } => inspect(&registry, address).await?,
        Commands::Pools { page } => pools(*page).await?,
    }

    Ok(())
}

fn lookup(registry: &TokenRegistry, symbol: &str) -> Result<Token> {
    registry
        .by_symbol(symbol)
        .cloned()
        .ok_or_else(|| anyhow!("unknown token symbol: {symbol}"))
}

async fn quote(token_in: Token, token_out: Token, amount: &str, slippage_bps: u32) -> Result<()> {
    let (chain, contracts) = demo_chain()?;
    let reader = Arc::new(PairReader::new(chain.clone(), contracts.clone()));
    let gate = Arc::new(AllowanceGate::new(reader.clone()));

    let mut session = SwapSession::new(chain, gate, contracts);
    session.set_account(Some(DEMO_ACCOUNT.parse()?));
    session.select_input(token_in.clone());
    session.select_output(token_out.clone());
    session.set_slippage(BasisPoints(slippage_bps));

    let Some((a, b)) = session.pair_tokens() else {
        bail!("the native token has no pair of its own; pick two ERC-20 tokens");
    };

    let mut poller = ReservePoller::new(reader, SWAP_POLL_INTERVAL);
    let mut updates = poller
        .take_receiver()
        .ok_or_else(|| anyhow!("poller receiver already taken"))?;
    session.track(poller.watch(a, b));

    println!("🔍 Fetching {}/{} reserves...", token_in.symbol, token_out.symbol);
    let update = updates
        .recv()
        .await
        .ok_or_else(|| anyhow!("reserve poller stopped unexpectedly"))?;
    session.apply_update(update);
    poller.stop();

    session.set_amount(amount);
    session.refresh_allowance().await?;
    let view = session.view().await;

    let Some(swap_quote) = &view.quote else {
        bail!(
            "no quote available ({})",
            view.submit.reason().unwrap_or("unknown reason")
        );
    };
    println!("✅ Quote for {} {} -> {}:", amount, token_in.symbol, token_out.symbol);
    println!(
        "   estimated out : {} {}",
        view.amount_out.as_deref().unwrap_or("-"),
        token_out.symbol
    );
    if let Some(price) = view.spot_price {
        println!("   spot price    : {price:.6} {}/{}", token_out.symbol, token_in.symbol);
    }
    println!(
        "   price impact  : {}% ({:?})",
        swap_quote.impact_percent(),
        swap_quote.severity()
    );
    if view.il_advisory {
        println!("   ⚠️  large trades shift the pool price against LPs");
    }
    if view.high_slippage {
        println!("   ⚠️  slippage above 5% invites front-running");
    }
    println!("   approval      : {:?}", view.approval);
    match view.submit {
        SubmitAvailability::Ready => println!("   submit        : ready"),
        SubmitAvailability::Disabled(reason) => println!("   submit        : disabled ({reason})"),
    }
    Ok(())
}

async fn remove_preview(token_a: Token, token_b: Token, percent: u8) -> Result<()> {
    let (chain, contracts) = demo_chain()?;
    let reader = Arc::new(PairReader::new(chain.clone(), contracts.clone()));
    let gate = Arc::new(AllowanceGate::new(reader.clone()));

    let mut session = LiquiditySession::new(chain, reader.clone(), gate, contracts);
    session.set_account(Some(DEMO_ACCOUNT.parse()?));
    session.select_token_a(token_a.clone());
    session.select_token_b(token_b.clone());
    session.set_remove_percent(percent);

    let Some((a, b)) = session.pair_tokens() else {
        bail!("the native token has no pair of its own; pick two ERC-20 tokens");
    };

    let mut poller = ReservePoller::new(reader, LIQUIDITY_POLL_INTERVAL);
    let mut updates = poller
        .take_receiver()
        .ok_or_else(|| anyhow!("poller receiver already taken"))?;
    session.track(poller.watch(a, b));

    println!("🔍 Fetching {}/{} position...", token_a.symbol, token_b.symbol);
    let update = updates
        .recv()
        .await
        .ok_or_else(|| anyhow!("reserve poller stopped unexpectedly"))?;
    session.apply_update(update);
    poller.stop();

    session.refresh_position().await?;
    session.refresh_allowances().await?;
    let view = session.remove_view().await;

    let Some(preview) = &view.preview else {
        bail!(
            "no withdrawal possible ({})",
            view.submit.reason().unwrap_or("unknown reason")
        );
    };
    println!("✅ Withdrawing {percent}% of the position returns:");
    println!(
        "   {} {}",
        view.amount_a.as_deref().unwrap_or("-"),
        token_a.symbol
    );
    println!(
        "   {} {}",
        view.amount_b.as_deref().unwrap_or("-"),
        token_b.symbol
    );
    println!("   LP burned     : {}", to_decimal_string(preview.liquidity.0, 18));
    if let Some(share) = view.share_percent {
        println!("   pool share    : {share:.4}%");
    }
    println!("   LP approval   : {:?}", view.lp_approval);
    Ok(())
}

/// Reads symbol and decimals off the contract itself, the same lookup a
/// custom-address token import performs for contracts outside the registry.
async fn inspect(registry: &TokenRegistry, address: &str) -> Result<()> {
    let (chain, contracts) = demo_chain()?;
    let reader = PairReader::new(chain, contracts);
    let address: Address = address.parse()?;

    let (symbol, decimals) = reader.token_metadata(&address).await?;
    println!("🔎 Token at {address}:");
    println!("   symbol   : {symbol}");
    println!("   decimals : {decimals}");
    match registry.by_address(&address) {
        Some(token) => println!("   registry : listed as {}", token.name),
        None => println!("   registry : unlisted; selectable by address only"),
    }
    Ok(())
}

async fn pools(page: u64) -> Result<()> {
    let (chain, contracts) = demo_chain()?;
    let directory = PoolDirectory::new(chain, contracts);

    let pages = directory.page_count().await?;
    let rows = directory.page(page).await?;
    if rows.is_empty() {
        bail!("page {page} is empty ({pages} page(s) total)");
    }

    println!("🏊 Pools, page {} of {}:", page + 1, pages);
    println!("{:<4} | {:<12} | {:<24} | reserves", "#", "pair", "tokens");
    for row in rows {
        let pair_short = &row.pair.as_str()[..10.min(row.pair.as_str().len())];
        println!(
            "{:<4} | {:<12} | {:<24} | {} / {}",
            row.index,
            pair_short,
            format!("{}/{}", row.symbol0, row.symbol1),
            to_decimal_string(row.reserve0.0, 18),
            to_decimal_string(row.reserve1.0, 18),
        );
    }
    Ok(())
}

/// Seeds the in-memory chain with three pools, a demo LP position and
/// unlimited allowances for the demo wallet.
fn demo_chain() -> Result<(Arc<MockChain>, DexContracts)> {
    let chain = Arc::new(MockChain::new());
    let contracts = DexContracts::arc_testnet();
    let registry = TokenRegistry::default();
    let account: Address = DEMO_ACCOUNT.parse()?;

    let token = |symbol: &str| -> Result<Address> {
        Ok(registry
            .by_symbol(symbol)
            .ok_or_else(|| anyhow!("unknown token symbol: {symbol}"))?
            .address
            .clone())
    };
    let usdc = token("USDC")?;
    let eurc = token("EURC")?;
    let usyc = token("USYC")?;
    let syn = token("SYN")?;

    let whole = U256::exp10(18);
    let pools = [
        (
            usdc.clone(),
            eurc.clone(),
            "0x33d3c9DC1D84613FCc9356353435c35C3c08ea63",
            whole * U256::from(1_000_000u64),
            whole * U256::from(2_000_000u64),
        ),
        (
            usdc.clone(),
            usyc.clone(),
            "0x7065C3dd0a430E542330702C8541FD9bAFd25dC8",
            whole * U256::from(750_000u64),
            whole * U256::from(500_000u64),
        ),
        (
            eurc.clone(),
            syn.clone(),
            "0x52C84043CD9c865236f11d9Fc9F56aa003c1f922",
            whole * U256::from(250_000u64),
            whole * U256::from(5_000_000u64),
        ),
    ];

    for (token0, token1, pair, reserve0, reserve1) in &pools {
        let pair: Address = pair.parse()?;
        chain.seed_pair(
            &contracts,
            token0,
            token1,
            &pair,
            *reserve0,
            *reserve1,
            whole * U256::from(1_000u64),
        );
        chain.set_allowance(&contracts, &pair, &account, U256::MAX);
        // Demo wallet holds 10% of every pool.
        chain.set_balance(&pair, &account, whole * U256::from(100u64));
    }

    chain.set_read(
        &contracts.factory,
        contracts::FACTORY_ALL_PAIRS_LENGTH,
        &[],
        vec![U256::from(pools.len() as u64).into()],
    );
    for (index, (_, _, pair, _, _)) in pools.iter().enumerate() {
        let pair: Address = pair.parse()?;
        chain.set_read(
            &contracts.factory,
            contracts::FACTORY_ALL_PAIRS,
            &[U256::from(index as u64).into()],
            vec![pair.into()],
        );
    }

    for tok in registry.tokens() {
        if tok.is_native() {
            continue;
        }
        chain.set_read(
            &tok.address,
            contracts::ERC20_SYMBOL,
            &[],
            vec![CallValue::Str(tok.symbol.clone())],
        );
        chain.set_read(
            &tok.address,
            contracts::ERC20_DECIMALS,
            &[],
            vec![U256::from(u64::from(tok.decimals)).into()],
        );
        chain.set_allowance(&contracts, &tok.address, &account, U256::MAX);
    }

    info!(pools = pools.len(), account = DEMO_ACCOUNT, "seeded demo chain");
    Ok((chain, contracts))
}

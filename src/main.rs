//! Property Analytics CLI
//!
//! Financing schedules, rental investment metrics and batch catalog analysis

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use property_analytics::analysis::PropertyAnalyzer;
use property_analytics::financing::{AmortizationPolicy, FinancingSimulation};
use property_analytics::investment::{
    analyze_investment, payback_period, project_cash_flow, solve_irr, InvestmentInputs,
};
use property_analytics::property::load_properties;
use property_analytics::{EngineError, Preferences};

#[derive(Parser)]
#[command(name = "property-analytics")]
#[command(author, version, about = "Financing and investment analysis for residential real estate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare SAC and PRICE schedules for one loan
    Finance(FinanceArgs),
    /// Investment metrics, projection and IRR for one rental
    Invest(InvestArgs),
    /// Analyze a property catalog in parallel
    Batch(BatchArgs),
}

#[derive(clap::Args)]
struct FinanceArgs {
    /// Total property price
    #[arg(long)]
    price: f64,
    #[arg(long)]
    down_payment: f64,
    /// Annual nominal rate, percent
    #[arg(long, default_value_t = 10.5)]
    rate: f64,
    #[arg(long, default_value_t = 30)]
    years: u32,
    /// Write both monthly schedules to this CSV file
    #[arg(long)]
    schedule_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
struct InvestArgs {
    #[arg(long)]
    price: f64,
    #[arg(long)]
    rent: f64,
    #[arg(long, default_value_t = 0.0)]
    condo_fee: f64,
    #[arg(long, default_value_t = 0.0)]
    property_tax: f64,
    #[arg(long, default_value_t = 5.0)]
    maintenance: f64,
    #[arg(long, default_value_t = 5.0)]
    vacancy: f64,
    #[arg(long, default_value_t = 5.0)]
    appreciation: f64,
    #[arg(long, default_value_t = 0.0)]
    rent_increase: f64,
    /// Own capital invested; defaults to the full price
    #[arg(long)]
    cash: Option<f64>,
    #[arg(long, default_value_t = 10)]
    horizon: u32,
}

#[derive(clap::Args)]
struct BatchArgs {
    /// Property catalog CSV
    #[arg(long)]
    properties: PathBuf,
    /// Preferences JSON; defaults apply when omitted
    #[arg(long)]
    preferences: Option<PathBuf>,
    #[arg(long, default_value = "property_report.csv")]
    output: PathBuf,
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Finance(args) => run_finance(&args),
        Command::Invest(args) => run_invest(&args),
        Command::Batch(args) => run_batch(&args),
    }
}

fn run_finance(args: &FinanceArgs) -> Result<()> {
    let simulations = AmortizationPolicy::ALL
        .iter()
        .map(|&policy| {
            FinancingSimulation::simulate(policy, args.price, args.down_payment, args.rate, args.years)
                .with_context(|| format!("{} simulation failed", policy))
        })
        .collect::<Result<Vec<_>>>()?;

    println!(
        "Loan: price {:.2}, down payment {:.2}, {:.2}% a year over {} years\n",
        args.price, args.down_payment, args.rate, args.years
    );
    for sim in &simulations {
        println!("{}", sim.policy());
        println!("  Financed:       {:>14.2}", sim.financed_amount());
        println!("  First payment:  {:>14.2}", sim.first_payment());
        println!("  Last payment:   {:>14.2}", sim.last_payment());
        println!("  Total interest: {:>14.2}", sim.total_interest());
        println!("  Total paid:     {:>14.2}", sim.total_paid());
        println!();

        println!("  {:>4} {:>14} {:>14} {:>14} {:>14}", "Year", "Payments", "Principal", "Interest", "Balance");
        for year in sim.yearly_summary() {
            println!(
                "  {:>4} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                year.year, year.payments, year.principal, year.interest, year.closing_balance
            );
        }
        println!();
    }

    if let Some(path) = &args.schedule_csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        writer.write_record(["policy", "month", "payment", "principal", "interest", "balance", "cumulative_paid"])?;
        for sim in &simulations {
            for row in sim.schedule() {
                writer.write_record([
                    sim.policy().label().to_string(),
                    row.month.to_string(),
                    format!("{:.2}", row.payment),
                    format!("{:.2}", row.principal),
                    format!("{:.2}", row.interest),
                    format!("{:.2}", row.balance),
                    format!("{:.2}", row.cumulative_paid),
                ])?;
            }
        }
        writer.flush()?;
        println!("Schedules written to {}", path.display());
    }

    Ok(())
}

fn run_invest(args: &InvestArgs) -> Result<()> {
    let cash = args.cash.unwrap_or(args.price);
    let inputs = InvestmentInputs {
        property_price: args.price,
        monthly_rent: args.rent,
        condo_fee: args.condo_fee,
        annual_property_tax: args.property_tax,
        maintenance_percent: args.maintenance,
        vacancy_rate_percent: args.vacancy,
        appreciation_rate_percent: args.appreciation,
        initial_cash_invested: cash,
    };

    let analysis = analyze_investment(&inputs).context("investment analysis failed")?;
    println!("Investment metrics");
    println!("  Annual rent:          {:>12.2}", analysis.annual_rent);
    println!("  Operating expenses:   {:>12.2}", analysis.operating_expenses);
    println!("  NOI:                  {:>12.2}", analysis.net_operating_income);
    println!("  Cap rate:             {:>11.2}%", analysis.cap_rate);
    println!("  Gross yield:          {:>11.2}%", analysis.gross_yield);
    println!("  Net yield:            {:>11.2}%", analysis.net_yield);
    println!("  Break-even occupancy: {:>11.2}%", analysis.break_even_occupancy);
    println!("  Cash-on-cash:         {:>11.2}%", analysis.cash_on_cash_return);
    println!();

    let projection = project_cash_flow(
        args.price,
        args.rent,
        inputs.monthly_expenses(),
        args.appreciation,
        args.rent_increase,
        args.horizon,
    )
    .context("cash-flow projection failed")?;

    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Year", "Rent", "Expenses", "Net income", "Apprec.", "Total", "Cumulative"
    );
    for year in &projection.years {
        println!(
            "{:>4} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            year.year, year.rent, year.expenses, year.net_income, year.appreciation, year.total_return, year.cumulative_return
        );
    }
    println!("Final property value: {:.2}\n", projection.final_property_value);

    match payback_period(cash, analysis.net_operating_income)? {
        Some(years) => println!("Payback: {:.1} years", years),
        None => println!("Payback: never (non-positive NOI)"),
    }
    match solve_irr(cash, &projection.total_returns()) {
        Ok(irr) => println!("IRR: {:.2}%", irr),
        Err(e @ EngineError::NoConvergence { .. }) => println!("IRR: n/a ({})", e),
        Err(e) => return Err(e).context("IRR failed"),
    }

    Ok(())
}

fn run_batch(args: &BatchArgs) -> Result<()> {
    let start = Instant::now();

    let preferences = match &args.preferences {
        Some(path) => Preferences::from_json_path(path)
            .with_context(|| format!("cannot load preferences from {}", path.display()))?,
        None => Preferences::default(),
    };
    let analyzer = PropertyAnalyzer::new(preferences).context("invalid preferences")?;

    let properties = load_properties(&args.properties)
        .with_context(|| format!("cannot load properties from {}", args.properties.display()))?;
    println!("Loaded {} properties in {:?}", properties.len(), start.elapsed());

    let results = analyzer.analyze_batch(&properties);
    let reports: Vec<_> = results.into_iter().filter_map(|(_, r)| r.ok()).collect();

    match args.format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_path(&args.output)
                .with_context(|| format!("cannot create {}", args.output.display()))?;
            for report in &reports {
                writer.serialize(report.summary_row())?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let mut file = File::create(&args.output)
                .with_context(|| format!("cannot create {}", args.output.display()))?;
            serde_json::to_writer_pretty(&mut file, &reports)?;
            writeln!(file)?;
        }
    }

    info!("Batch finished in {:?}", start.elapsed());
    println!(
        "{} of {} properties written to {}",
        reports.len(),
        properties.len(),
        args.output.display()
    );

    Ok(())
}

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use txgraph_data::prices::read_price_rows;
use txgraph_data::timesteps::read_time_step_rows;
use txgraph_data::transactions::{read_transfer_records, EdgeGenerator};
use txgraph_sample::graph::TemporalMultigraph;
use txgraph_sample::pipeline::{self, PipelineConfig};
use txgraph_sample::price::PriceSeries;
use txgraph_sample::sampler::SampleParams;
use txgraph_sample::snapshots::TimeSeriesGraphs;
use txgraph_sample::time_index::TimeStepIndex;

#[derive(Parser, Debug)]
#[command(name = "txgraph")]
#[command(about = "Temporal transaction-graph ego sampling toolkit")]
#[command(version)]
struct Cli {
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the full transfer graph and print its shape.
    Build(BuildArgs),
    /// Run the sampling pipeline and emit labeled ego-graph samples.
    Sample(SampleArgs),
    /// Resolve the price for a single time bucket.
    PriceAt(PriceAtArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Transfer file: `from,to,amount,time_step` with a header line.
    #[arg(long)]
    transactions: PathBuf,

    /// Also print a per-bucket snapshot breakdown.
    #[arg(long)]
    per_bucket: bool,

    /// Limit the per-bucket breakdown to the first N buckets.
    #[arg(long)]
    max_buckets: Option<usize>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Transfer file: `from,to,amount,time_step` with a header line.
    #[arg(long)]
    transactions: PathBuf,

    /// Price file: `timestamp,price` with a header line.
    #[arg(long)]
    prices: PathBuf,

    /// Time-conversion file: `time_step,min_timestamp,max_timestamp`.
    #[arg(long)]
    time_steps: PathBuf,

    /// Expansion depth around each anchor.
    #[arg(long, default_value_t = 5)]
    k_hop: u32,

    /// Window width in buckets; edges older than `anchor - window` are cut.
    #[arg(long, default_value_t = 168)]
    window: i64,

    /// Buckets between the anchor and the label price.
    #[arg(long, default_value_t = 24)]
    horizon: i64,

    /// Maximum incoming edges kept per expanded node.
    #[arg(long, default_value_t = 5)]
    in_cap: usize,

    /// Maximum outgoing edges kept per expanded node.
    #[arg(long, default_value_t = 5)]
    out_cap: usize,

    /// Seed for the run's random generator.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Output format: table (default) or json.
    #[arg(long, default_value = "table")]
    output: String,

    /// Write emitted samples as JSON lines to this path.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PriceAtArgs {
    /// Price file: `timestamp,price` with a header line.
    #[arg(long)]
    prices: PathBuf,

    /// Time-conversion file: `time_step,min_timestamp,max_timestamp`.
    #[arg(long)]
    time_steps: PathBuf,

    /// Bucket to resolve.
    #[arg(long)]
    time_step: i64,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Build(args) => handle_build(args),
        Commands::Sample(args) => handle_sample(args),
        Commands::PriceAt(args) => handle_price_at(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .wrap_err("failed to initialize tracing filter")?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn handle_build(args: BuildArgs) -> Result<()> {
    let records = read_transfer_records(&args.transactions)
        .wrap_err("failed to load transfer file")?;

    let mut generator = EdgeGenerator::new();
    let graph =
        TemporalMultigraph::from_edges(generator.generate_edges(&records, |_, _, _, _| false));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Transfer rows", &format!("{}", records.len())]);
    table.add_row(vec![
        "Addresses",
        &format!("{}", generator.interner().len()),
    ]);
    table.add_row(vec!["Nodes", &format!("{}", graph.node_count())]);
    table.add_row(vec!["Edges", &format!("{}", graph.edge_count())]);
    let range = match (graph.min_time_step(), graph.max_time_step()) {
        (Some(min), Some(max)) => format!("{} - {}", min, max),
        _ => "empty graph".to_string(),
    };
    table.add_row(vec!["Time-step range", &range]);
    println!("\n{table}\n");

    if args.per_bucket {
        let snapshots = TimeSeriesGraphs::build(&mut generator, &records, args.max_buckets);

        let mut bucket_table = Table::new();
        bucket_table.load_preset(UTF8_BORDERS_ONLY);
        bucket_table.set_header(vec!["Bucket", "Nodes", "Edges"]);
        for (bucket, snapshot) in snapshots.iter() {
            bucket_table.add_row(vec![
                format!("{bucket}"),
                format!("{}", snapshot.node_count()),
                format!("{}", snapshot.edge_count()),
            ]);
        }
        println!("{bucket_table}\n");
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "build command completed"
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<()> {
    let records = read_transfer_records(&args.transactions)
        .wrap_err("failed to load transfer file")?;
    let price_rows = read_price_rows(&args.prices).wrap_err("failed to load price file")?;
    let time_step_rows =
        read_time_step_rows(&args.time_steps).wrap_err("failed to load time-conversion file")?;

    let mut generator = EdgeGenerator::new();
    let graph =
        TemporalMultigraph::from_edges(generator.generate_edges(&records, |_, _, _, _| false));
    let time_index = TimeStepIndex::from_rows(time_step_rows);
    let prices = PriceSeries::new(price_rows);

    let config = PipelineConfig {
        params: SampleParams {
            k_hop: args.k_hop,
            time_window: args.window,
            in_cap: args.in_cap,
            out_cap: args.out_cap,
        },
        prediction_horizon: args.horizon,
        seed: args.seed,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .wrap_err("failed to create progress style")?,
    );
    pb.set_message(format!(
        "sampling {} nodes (k={}, window={})",
        graph.node_count(),
        args.k_hop,
        args.window
    ));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let (samples, summary) = pipeline::run(&graph, &time_index, &prices, &config);

    pb.finish_with_message("sampling completed");

    if let Some(out_path) = &args.out {
        let file = std::fs::File::create(out_path)
            .wrap_err_with(|| format!("failed to create {}", out_path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        for sample in &samples {
            let line =
                serde_json::to_string(sample).wrap_err("failed to serialize sample to JSON")?;
            writeln!(writer, "{line}").wrap_err("failed to write sample")?;
        }
        writer.flush().wrap_err("failed to flush sample output")?;
        info!(samples = samples.len(), path = %out_path.display(), "samples written");
    }

    match args.output.to_lowercase().as_str() {
        "table" => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Metric", "Value"]);
            table.add_row(vec!["Nodes", &format!("{}", summary.nodes_total)]);
            table.add_row(vec![
                "  without predecessors",
                &format!("{}", summary.nodes_without_predecessors),
            ]);
            table.add_row(vec!["Ego graphs", &format!("{}", summary.ego_graphs)]);
            table.add_row(vec!["Samples emitted", &format!("{}", summary.emitted)]);
            table.add_row(vec![
                "Discarded: horizon beyond data",
                &format!("{}", summary.discarded_beyond_horizon),
            ]);
            table.add_row(vec![
                "Discarded: bucket not in table",
                &format!("{}", summary.discarded_missing_time_step),
            ]);
            table.add_row(vec![
                "Discarded: price unavailable",
                &format!("{}", summary.discarded_price_unavailable),
            ]);
            println!("\n{table}\n");
        }
        "json" => {
            let json = serde_json::to_string_pretty(&summary)
                .wrap_err("failed to serialize summary to JSON")?;
            println!("{json}");
        }
        other => return Err(eyre!("unknown output format '{}'; use 'table' or 'json'", other)),
    }

    info!(
        emitted = summary.emitted,
        ego_graphs = summary.ego_graphs,
        seed = args.seed,
        "sample command completed"
    );
    Ok(())
}

fn handle_price_at(args: PriceAtArgs) -> Result<()> {
    let price_rows = read_price_rows(&args.prices).wrap_err("failed to load price file")?;
    let time_step_rows =
        read_time_step_rows(&args.time_steps).wrap_err("failed to load time-conversion file")?;

    let time_index = TimeStepIndex::from_rows(time_step_rows);
    let prices = PriceSeries::new(price_rows);

    let interval = time_index
        .interval_for(args.time_step)
        .wrap_err("bucket cannot be resolved")?;
    let price = prices
        .price_at(&time_index, args.time_step)
        .wrap_err("price cannot be resolved")?;

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Time step", &format!("{}", args.time_step)]);
    table.add_row(vec![
        "Interval",
        &format!("[{}, {})", interval.min_timestamp, interval.max_timestamp),
    ]);
    table.add_row(vec!["Price", &format!("{price}")]);
    println!("\n{table}\n");

    info!(
        time_step = args.time_step,
        price, "price-at command completed"
    );
    Ok(())
}

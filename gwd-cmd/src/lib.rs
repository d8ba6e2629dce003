//! Command implementations for GWD CLI.
//!
//! Each subcommand reads its input files, runs one analysis from
//! `gwd-data`, and prints the result as JSON on stdout (or, for `yearly`,
//! writes a CSV).

use anyhow::Context;
use clap::Subcommand;
use serde::Serialize;

pub mod depth_change;
pub mod dropoff;
pub mod history;
pub mod rank;
pub mod select;
pub mod yearly;

#[derive(Subcommand)]
pub enum Command {
    /// Mean per-decade water table dropoff for each region
    Dropoff {
        /// Station-year well records CSV
        #[arg(short = 'r', long)]
        records: String,

        /// Region boundaries as a GeoJSON FeatureCollection
        #[arg(short = 'g', long)]
        regions: String,

        /// Decade to hide from the emitted decade list (repeatable)
        #[arg(long = "exclude-decade")]
        exclude_decade: Vec<i32>,
    },

    /// Mean and histogram of a point attribute inside a projected box
    Select {
        /// Points CSV with latitude/longitude columns
        #[arg(short = 'p', long)]
        points: String,

        /// Column holding the attribute to summarize
        #[arg(short = 'c', long)]
        value_column: String,

        #[arg(long, requires_all = ["y0", "x1", "y1"])]
        x0: Option<f64>,
        #[arg(long, requires_all = ["x0", "x1", "y1"])]
        y0: Option<f64>,
        #[arg(long, requires_all = ["x0", "y0", "y1"])]
        x1: Option<f64>,
        #[arg(long, requires_all = ["x0", "y0", "x1"])]
        y1: Option<f64>,

        #[arg(long, default_value_t = -30.0, allow_hyphen_values = true)]
        hist_min: f64,
        #[arg(long, default_value_t = 30.0, allow_hyphen_values = true)]
        hist_max: f64,
        #[arg(long, default_value_t = 10.0)]
        bin_width: f64,

        /// Projection scale
        #[arg(long, default_value_t = 1200.0)]
        scale: f64,
        #[arg(long, default_value_t = 480.0, allow_hyphen_values = true)]
        translate_x: f64,
        #[arg(long, default_value_t = 300.0, allow_hyphen_values = true)]
        translate_y: f64,
    },

    /// Rank wells by a principal component's scaled score
    Rank {
        /// Per-well component scores CSV (PC1..PCn, lat, lon)
        #[arg(short = 's', long)]
        scores: String,

        /// Component loadings CSV (PC1..PCn)
        #[arg(short = 'l', long)]
        loadings: String,

        /// Component number, starting at 1
        #[arg(short = 'c', long, default_value_t = 1)]
        component: usize,
    },

    /// Average raw measurements into one record per station and year
    Yearly {
        /// Raw observations CSV or TSV
        #[arg(short = 'i', long)]
        observations: String,

        /// Output path for the station-year CSV
        #[arg(short = 'o', long)]
        output: String,
    },

    /// Stations with the largest depth change between two years
    DepthChange {
        /// Station-year well records CSV
        #[arg(short = 'r', long)]
        records: String,

        #[arg(long, default_value_t = 2000)]
        from: i32,

        #[arg(long, default_value_t = 2023)]
        to: i32,

        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Depth over time for one well
    History {
        /// Station-year well records CSV
        #[arg(short = 'r', long)]
        records: String,

        /// Station id; defaults to the first station in sorted order
        #[arg(long)]
        station: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dropoff {
            records,
            regions,
            exclude_decade,
        } => dropoff::run_dropoff(&records, &regions, &exclude_decade),
        Command::Select {
            points,
            value_column,
            x0,
            y0,
            x1,
            y1,
            hist_min,
            hist_max,
            bin_width,
            scale,
            translate_x,
            translate_y,
        } => {
            let bounds = match (x0, y0, x1, y1) {
                (Some(x0), Some(y0), Some(x1), Some(y1)) => Some((x0, y0, x1, y1)),
                _ => None,
            };
            let options = select::SelectOptions {
                bounds,
                histogram: (hist_min, hist_max, bin_width),
                scale,
                translate: (translate_x, translate_y),
            };
            select::run_select(&points, &value_column, &options)
        }
        Command::Rank {
            scores,
            loadings,
            component,
        } => rank::run_rank(&scores, &loadings, component),
        Command::Yearly {
            observations,
            output,
        } => yearly::run_yearly(&observations, &output),
        Command::DepthChange {
            records,
            from,
            to,
            top,
        } => depth_change::run_depth_change(&records, from, to, top),
        Command::History { records, station } => history::run_history(&records, station.as_deref()),
    }
}

/// Read a whole input file, naming the path on failure.
pub(crate) fn read_input(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

/// Pretty-print a result to stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

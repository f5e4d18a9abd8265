use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sift",
    about = "Filter, sort and paginate the demo product catalog",
    version
)]
pub struct Cli {
    /// Filter string, e.g. 'Category==(Food|Electronics),Price>=2.00'
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort string, e.g. '-Price,Name' (leading '-' sorts descending)
    #[arg(long)]
    pub sort: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Page size; 0 returns everything
    #[arg(long, default_value_t = 0)]
    pub page_size: i64,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

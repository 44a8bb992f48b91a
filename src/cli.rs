use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "atrium-wallet")]
#[command(version)]
#[command(about = "A TUI front-end for the Atrium wallet daemon")]
pub struct Args {
    /// Tick rate in ticks per second
    #[arg(short, long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short, long, default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Network to connect to (testnet, mainnet)
    #[arg(short, long)]
    pub network: Option<String>,

    /// Custom daemon RPC URL (overrides network default)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Data directory path
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Browse history with incremental scrolling instead of fixed pages
    #[arg(long)]
    pub scroll: bool,

    /// Rows per history page
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

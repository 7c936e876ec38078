use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use fizzbuzz_server::configuration::ServerConfig;
use fizzbuzz_server::server::Server;
use fizzbuzz_server::stats::MemoryStats;

#[derive(Parser, Debug)]
#[command(name = "fizzbuzz-server", about = "Fizzbuzz over HTTP with request statistics")]
struct Opt {
    /// Path to the YAML config file
    #[arg(short, long)]
    conf: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Enable basic logging; set RUST_LOG=info for visibility.
    env_logger::init();

    let opt = Opt::parse();

    let config = match opt.conf {
        Some(path) => ServerConfig::load(&path).expect("Failed to load server config"),
        None => ServerConfig::default(),
    };

    let server =
        Server::new(config, Arc::new(MemoryStats::new())).expect("Failed to create server");

    server.run_forever().await.expect("Server failed");
}

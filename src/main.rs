use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = fingate::cli::Cli::parse();
    if let Err(e) = fingate::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

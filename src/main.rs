use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = storefront_edge::cli::Cli::parse();
    if let Err(e) = storefront_edge::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = gmail_send::cli::Cli::parse();

    if let Err(err) = gmail_send::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

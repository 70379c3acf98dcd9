use clap::{Parser, Subcommand};
use subdomain_proxy::admin::RegisterMapping;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the subdomain proxy", long_about = None)]
struct Cli {
    /// Base URL of a running proxy.
    #[arg(short, long, default_value = "http://localhost:9093")]
    url: String,

    /// Admin path configured on the proxy.
    #[arg(long, default_value = "/set")]
    admin_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route <name>.<domain> to a backend URL
    Register {
        /// Routing key (subdomain label), case-insensitive
        #[arg(short, long)]
        name: String,
        /// Backend URL requests are forwarded to
        #[arg(short, long)]
        service_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Register { name, service_url } => {
            let mapping = RegisterMapping { name, service_url };
            let res = client
                .post(format!("{}{}", cli.url.trim_end_matches('/'), cli.admin_path))
                .json(&mapping)
                .send()
                .await?;

            let status = res.status();
            if status.is_success() {
                println!("registered {} -> {}", mapping.name.to_lowercase(), mapping.service_url);
            } else {
                eprintln!("Error: admin endpoint returned status {}", status);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

use clap::Parser;
use std::env;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = rentbuy::api::run_http_server(port).await {
                log::error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Some("project") => {
            let cli = rentbuy::api::Cli::parse_from(
                std::iter::once(raw_args[0].clone()).chain(raw_args.iter().skip(2).cloned()),
            );
            match rentbuy::api::run_cli(cli) {
                Ok(output) => print!("{output}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
            }
        }
        _ => {
            eprintln!("Usage: rentbuy serve [port] | rentbuy project [--flags]");
            std::process::exit(1);
        }
    }
}

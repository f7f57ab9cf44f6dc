use std::env;
use std::net::SocketAddr;

use relife_api::{serve, GameService, JsonStore};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("relife-cli <command>");
    println!("commands:");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8000");
    println!("  simulate [months] [data_dir]");
    println!("    drives a scripted run to completion and prints the outcome");
    println!("  meta [data_dir]");
    println!("    prints the persisted meta-progression record");
}

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::as_str).unwrap_or("127.0.0.1:8000");
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn default_data_dir() -> String {
    env::var("RELIFE_DATA_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "data".to_string())
}

fn parse_data_dir(value: Option<&String>) -> String {
    value
        .map(String::to_string)
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(default_data_dir)
}

fn open_service(data_dir: &str) -> Result<GameService, String> {
    let store =
        JsonStore::open(data_dir).map_err(|err| format!("failed to open store: {err}"))?;
    Ok(GameService::new(store))
}

fn run_simulation(args: &[String]) -> Result<(), String> {
    let months = args
        .get(2)
        .map(|value| {
            value
                .parse::<u32>()
                .map_err(|_| format!("invalid months: {value}"))
        })
        .transpose()?
        .unwrap_or(60);
    let data_dir = parse_data_dir(args.get(3));

    let service = open_service(&data_dir)?;
    let snapshot = service
        .start_run()
        .map_err(|err| format!("failed to start run: {err}"))?;
    let run_id = snapshot.run.run_id.clone();

    for _ in 0..months {
        // Spend the month on the bread-and-butter loop, then resolve it.
        for action_id in ["work", "study_dev", "rest"] {
            let result = service
                .apply_action(&run_id, action_id)
                .map_err(|err| format!("failed to apply action: {err}"))?
                .ok_or_else(|| format!("run disappeared mid-simulation: {run_id}"))?;
            if result.run.finished {
                break;
            }
        }

        let resolution = service
            .resolve_month(&run_id)
            .map_err(|err| format!("failed to resolve month: {err}"))?
            .ok_or_else(|| format!("run disappeared mid-simulation: {run_id}"))?;
        if resolution.run.finished {
            break;
        }
    }

    let snapshot = service
        .get_run(&run_id)
        .map_err(|err| format!("failed to reload run: {err}"))?
        .ok_or_else(|| format!("run disappeared after simulation: {run_id}"))?;

    println!("simulated {}", snapshot.run);
    if let Some(reason) = snapshot.run.finish_reason {
        println!("finish_reason={reason}");
    }
    println!("soul_points={}", snapshot.meta.soul_points);
    Ok(())
}

fn print_meta(args: &[String]) -> Result<(), String> {
    let data_dir = parse_data_dir(args.get(2));
    let service = open_service(&data_dir)?;
    let meta = service
        .get_meta()
        .map_err(|err| format!("failed to load meta: {err}"))?;
    let rendered = serde_json::to_string_pretty(&meta)
        .map_err(|err| format!("failed to render meta: {err}"))?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("serve") => match parse_socket_addr(args.get(2)) {
            Ok(addr) => {
                let service = match open_service(&default_data_dir()) {
                    Ok(service) => service,
                    Err(err) => {
                        eprintln!("error: {err}");
                        std::process::exit(1);
                    }
                };
                println!("serving api on http://{addr}");
                if let Err(err) = serve(addr, service).await {
                    eprintln!("server error: {err}");
                    std::process::exit(1);
                }
            }
            Err(err) => {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        },
        Some("simulate") => {
            if let Err(err) = run_simulation(&args) {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        }
        Some("meta") => {
            if let Err(err) = print_meta(&args) {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        }
        _ => {
            print_usage();
        }
    }
}

use std::env;
use std::net::SocketAddr;

use contracts::{PolicyArea, SessionConfig};
use session_api::{serve, SessionApi};
use session_core::catalog;
use session_core::ledger::AllocationLedger;

fn print_usage() {
    println!("session-cli <command>");
    println!("commands:");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8080");
    println!("  simulate <session_id> <seed> [sqlite_path]");
    println!("    runs a scripted deliberation end to end; persists when a path is given");
    println!("  catalog");
    println!("    prints the policy areas and option texts");
    println!("  analyze <o1,o2,o3,o4,o5,o6,o7>");
    println!("    scores a complete allocation in catalog order");
}

/// Decision script used by `simulate`: costs sum to the default budget.
const SIMULATION_SCRIPT: [u8; 7] = [3, 1, 3, 2, 2, 1, 2];

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::as_str).unwrap_or("127.0.0.1:8080");
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn parse_seed(value: Option<&String>) -> Result<u64, String> {
    let raw = value.ok_or_else(|| "missing seed".to_string())?;
    raw.parse::<u64>()
        .map_err(|_| format!("invalid seed: {raw}"))
}

fn default_sqlite_path() -> Option<String> {
    env::var("DELIBERATION_SQLITE_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn run_simulation(args: &[String]) -> Result<(), String> {
    let session_id = args
        .get(2)
        .cloned()
        .ok_or_else(|| "missing session_id".to_string())?;
    let seed = parse_seed(args.get(3))?;
    let sqlite_path = args
        .get(4)
        .cloned()
        .filter(|path| !path.trim().is_empty())
        .or_else(default_sqlite_path);

    let config = SessionConfig {
        session_id: session_id.clone(),
        seed,
        ..SessionConfig::default()
    };

    let mut api = SessionApi::from_config(config);
    if let Some(path) = &sqlite_path {
        api.attach_sqlite_store(path)
            .map_err(|err| format!("failed to attach sqlite store: {err}"))?;
        api.initialize_session_storage(true)
            .map_err(|err| format!("failed to initialize session storage: {err}"))?;
    }

    api.start().map_err(|err| err.to_string())?;
    for (area, option) in PolicyArea::ALL.into_iter().zip(SIMULATION_SCRIPT) {
        api.set_preference(area, option)
            .map_err(|err| err.to_string())?;
    }
    api.start_group_discussion().map_err(|err| err.to_string())?;
    for option in SIMULATION_SCRIPT {
        api.submit_argument("I believe this level serves the group best.", option)
            .map_err(|err| err.to_string())?;
        api.finalize_topic(option).map_err(|err| err.to_string())?;
    }
    api.start_reflection().map_err(|err| err.to_string())?;
    let report = api.final_report().map_err(|err| err.to_string())?;

    if let Some(error) = api.last_persistence_error() {
        return Err(format!("persistence error after simulation: {error}"));
    }

    let status = api.status();
    println!(
        "simulated {} equity={:.3} justice={:.3} coherence={:.3} sqlite={}",
        status,
        report.policy_analysis.equity.score,
        report.policy_analysis.justice.score,
        report.policy_analysis.coherence.score,
        sqlite_path.as_deref().unwrap_or("(memory only)")
    );
    Ok(())
}

fn print_catalog() {
    for area in PolicyArea::ALL {
        println!("{} ({})", area.label(), area.as_str());
        for (index, text) in catalog::option_texts(area).iter().enumerate() {
            println!("  Option {}: {}", index + 1, text);
        }
    }
}

fn run_analysis(args: &[String]) -> Result<(), String> {
    let raw = args
        .get(2)
        .ok_or_else(|| "missing allocation (expected 7 comma-separated options)".to_string())?;
    let options = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid option: {part}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if options.len() != PolicyArea::ALL.len() {
        return Err(format!(
            "expected {} options, got {}",
            PolicyArea::ALL.len(),
            options.len()
        ));
    }

    // A staging budget large enough for any combination; the scores do not
    // depend on it.
    let mut ledger = AllocationLedger::new(21);
    for (area, option) in PolicyArea::ALL.into_iter().zip(options) {
        ledger
            .set_option(area, option)
            .map_err(|err| err.to_string())?;
    }

    let analysis = session_core::analyzer::analyze(&ledger).map_err(|err| err.to_string())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&analysis).map_err(|err| err.to_string())?
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("serve") => match parse_socket_addr(args.get(2)) {
            Ok(addr) => {
                println!("serving deliberation api on http://{addr}");
                if let Err(err) = serve(addr).await {
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
        Some("catalog") => {
            print_catalog();
        }
        Some("analyze") => {
            if let Err(err) = run_analysis(&args) {
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

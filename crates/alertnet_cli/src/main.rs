//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load a data file and run a couple of dispatch queries against it.
//! - Keep output deterministic for quick local sanity checks.

use alertnet_core::DispatchService;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let data_path = args.next().unwrap_or_else(|| "data.json".to_string());
    let station: Option<u32> = args.next().and_then(|raw| raw.parse().ok());

    if let Err(err) = alertnet_core::init_logging(alertnet_core::default_log_level(), "logs") {
        eprintln!("alertnet: logging disabled: {err}");
    }

    let store = match alertnet_core::load_store_from_path(Path::new(&data_path)) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("alertnet: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("alertnet version={}", alertnet_core::core_version());
    println!(
        "loaded persons={} medical_records={} coverage_entries={}",
        store.persons().len(),
        store.medical_records().len(),
        store.fire_stations().len()
    );

    let service = DispatchService::new(Arc::new(store));
    if let Some(station) = station {
        match service.people_concerned_by_station(station) {
            Ok(coverage) => match serde_json::to_string_pretty(&coverage) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => {
                    eprintln!("alertnet: cannot render coverage: {err}");
                    return ExitCode::FAILURE;
                }
            },
            Err(err) => {
                eprintln!("alertnet: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # AXLE CLI
//!
//! Entry point for the `axle` binary. Parses CLI arguments, initializes
//! logging, opens the sled-backed world state, and runs exactly one ledger
//! operation per invocation. Results are printed as JSON on stdout so the
//! binary composes with shell pipelines; logs go to stderr.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;

use axle_ledger::SledStore;
use axle_registry::seed::demo_fleet;
use axle_registry::{AssetLedger, MalfunctionOutcome, Owner, RepairOutcome};

use cli::{AxleCli, Commands};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = AxleCli::parse();
    logging::init_logging(
        "axle=info,axle_registry=info,axle_ledger=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    let db_path = cli.data_dir.join("db");
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create data directory: {}", db_path.display()))?;

    let store = SledStore::open(&db_path)
        .with_context(|| format!("failed to open world state at {}", db_path.display()))?;
    let ledger = AssetLedger::new(&store);

    match cli.command {
        Commands::Init { demo } => {
            if demo {
                let (cars, owners) = demo_fleet();
                ledger.init_ledger(&cars, &owners)?;
                emit(&json!({
                    "initialized": db_path.display().to_string(),
                    "cars": cars.len(),
                    "owners": owners.len(),
                }))?;
            } else {
                emit(&json!({ "initialized": db_path.display().to_string() }))?;
            }
        }

        Commands::CreateCar {
            id,
            make,
            model,
            color,
            owner,
        } => {
            let car = ledger.create_car(id, &make, &model, &color, owner)?;
            emit(&car)?;
        }

        Commands::CreateOwner {
            id,
            name,
            surname,
            email,
            money,
        } => {
            let owner = Owner {
                id,
                name,
                surname,
                email,
                money,
            };
            ledger.create_owner(&owner)?;
            emit(&owner)?;
        }

        Commands::GetCar { id } => emit(&ledger.get_car(id)?)?,

        Commands::GetOwner { id } => emit(&ledger.get_owner(id)?)?,

        Commands::ListCars { color, owner } => {
            let cars = match (color, owner) {
                (Some(color), Some(owner)) => {
                    ledger.get_cars_by_color_and_owner(&color, owner)?
                }
                (Some(color), None) => ledger.get_cars_by_color(&color)?,
                (None, None) => ledger.get_all_cars()?,
                (None, Some(_)) => bail!("--owner requires --color"),
            };
            emit(&cars)?;
        }

        Commands::Recolor { id, color } => emit(&ledger.change_car_color(id, &color)?)?,

        Commands::AddMalfunction {
            id,
            description,
            price,
        } => match ledger.add_malfunction(id, &description, price)? {
            MalfunctionOutcome::Recorded { outstanding } => {
                emit(&json!({ "status": "recorded", "outstanding": outstanding }))?;
            }
            MalfunctionOutcome::WrittenOff => {
                emit(&json!({ "status": "written_off", "car": id }))?;
            }
        },

        Commands::Repair { id } => match ledger.repair_car(id)? {
            RepairOutcome::Repaired { total } => {
                emit(&json!({ "status": "repaired", "total": total }))?;
            }
            RepairOutcome::InsufficientFunds {
                available,
                required,
            } => {
                emit(&json!({
                    "status": "insufficient_funds",
                    "available": available,
                    "required": required,
                }))?;
            }
        },

        Commands::Transfer {
            car_id,
            new_owner,
            accept_malfunctions,
        } => emit(&ledger.transfer_ownership(car_id, new_owner, accept_malfunctions)?)?,

        Commands::DeleteCar { id } => {
            ledger.delete_car(id)?;
            emit(&json!({ "deleted": id }))?;
        }

        Commands::RebuildIndex => {
            let entries = ledger.rebuild_index()?;
            emit(&json!({ "rebuilt_entries": entries }))?;
        }
    }

    store.flush().context("failed to flush world state")?;
    Ok(())
}

/// Print a result value as pretty JSON on stdout.
fn emit<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

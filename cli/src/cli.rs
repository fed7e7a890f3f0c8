//! # CLI Interface
//!
//! Defines the command-line argument structure for the `axle` binary using
//! `clap` derive: one subcommand per ledger operation, plus store
//! initialization and index maintenance.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AXLE vehicle-registry ledger.
///
/// Runs queries and transaction workflows against a local sled-backed
/// world state. Results are printed as JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "axle",
    about = "AXLE vehicle-registry ledger",
    version,
    propagate_version = true
)]
pub struct AxleCli {
    /// Path to the data directory holding the world state.
    ///
    /// Created on first use if it does not exist.
    #[arg(
        long,
        short = 'd',
        env = "AXLE_DATA_DIR",
        default_value = "./axle_data",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "AXLE_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `axle` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the data directory, optionally seeding the demo fleet.
    Init {
        /// Seed the store with the built-in demo cars and owners.
        #[arg(long)]
        demo: bool,
    },

    /// Register a new car (empty malfunction list, zero price).
    CreateCar {
        /// Car id.
        id: u64,
        /// Manufacturer.
        make: String,
        /// Model name.
        model: String,
        /// Paint color.
        color: String,
        /// Id of the owning owner.
        owner: u64,
    },

    /// Register a new owner.
    CreateOwner {
        /// Owner id.
        id: u64,
        /// Given name.
        name: String,
        /// Family name.
        surname: String,
        /// Contact address.
        email: String,
        /// Starting balance in whole currency units.
        money: u64,
    },

    /// Look up one car by id.
    GetCar {
        /// Car id.
        id: u64,
    },

    /// Look up one owner by id.
    GetOwner {
        /// Owner id.
        id: u64,
    },

    /// List cars: all of them, by color, or by color and owner.
    ListCars {
        /// Only cars with exactly this color.
        #[arg(long)]
        color: Option<String>,

        /// Only cars owned by this owner. Requires --color.
        #[arg(long)]
        owner: Option<u64>,
    },

    /// Repaint a car.
    Recolor {
        /// Car id.
        id: u64,
        /// The new color.
        color: String,
    },

    /// Record a malfunction against a car. A car whose accumulated damage
    /// exceeds its value is written off.
    AddMalfunction {
        /// Car id.
        id: u64,
        /// What is broken.
        description: String,
        /// Repair cost in whole currency units.
        price: u64,
    },

    /// Settle all malfunctions on a car against its owner's balance.
    Repair {
        /// Car id.
        id: u64,
    },

    /// Sell a car to another registered owner.
    Transfer {
        /// Car id.
        car_id: u64,
        /// Buyer's owner id.
        new_owner: u64,
        /// Accept the car's outstanding malfunctions (discounts the price).
        #[arg(long)]
        accept_malfunctions: bool,
    },

    /// Remove a car and its index entry.
    DeleteCar {
        /// Car id.
        id: u64,
    },

    /// Rebuild the color~owner~id index from the stored car records.
    RebuildIndex,
}

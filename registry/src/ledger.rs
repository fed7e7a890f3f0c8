//! # Asset Ledger Service
//!
//! Every query and mutation the vehicle registry exposes, implemented over
//! an injected [`StateStore`] handle. One `AssetLedger` is a per-invocation
//! view: construct it around a store reference, run one operation, drop it.
//! There is no process-wide registry state.
//!
//! ## Atomicity
//!
//! Each mutation stages all of its writes — primary record, index entries,
//! balance updates — into a single [`WriteBatch`] and applies it once, so
//! the `color~owner~id` index can never point at a triple a stored car no
//! longer has, and no transfer is ever observable half-settled.
//!
//! ## Car lifecycle
//!
//! ```text
//! Active ──repair_car──────────▶ Repaired (malfunctions cleared)
//!   │ ▲                            │
//!   │ └──add_malfunction───────────┘
//!   ├──add_malfunction (total > price)──▶ written off (record + index gone)
//!   └──transfer_ownership──▶ owner changes, index entry swaps
//! ```

use tracing::{debug, info, warn};

use axle_ledger::{
    CompositeIndex, LedgerError, Result, StateStore, WriteBatch,
};

use crate::records::{
    car_key, is_car_key, owner_key, owner_key_for, Car, Malfunction, Owner,
};

/// Object type of the car composite index.
pub const CAR_INDEX: &str = "color~owner~id";

/// Result of [`AssetLedger::add_malfunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalfunctionOutcome {
    /// The malfunction was appended; the car remains on the ledger.
    Recorded {
        /// New total of all outstanding malfunction prices.
        outstanding: u64,
    },
    /// Accumulated malfunction cost exceeded the car's value: the car was
    /// deleted from the ledger, index entry included.
    WrittenOff,
}

/// Result of [`AssetLedger::repair_car`].
///
/// Insufficient funds is deliberately not an error here: the legacy
/// behavior is a quiet no-op, preserved as a reported outcome rather than
/// extended into a silent success. New operations must not copy this
/// pattern — see [`LedgerError::InsufficientFunds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Malfunctions cleared and the owner's balance debited.
    Repaired {
        /// Amount debited from the owner.
        total: u64,
    },
    /// The owner could not cover the repair; nothing changed.
    InsufficientFunds {
        /// The owner's current balance.
        available: u64,
        /// The repair total that was needed.
        required: u64,
    },
}

/// The registry service: entity CRUD, indexed queries, and the financial
/// workflows, over any [`StateStore`] backend.
pub struct AssetLedger<'a, S: StateStore> {
    store: &'a S,
    index: CompositeIndex,
}

impl<'a, S: StateStore> AssetLedger<'a, S> {
    /// Create a per-invocation view over a store handle.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            index: CompositeIndex::new(CAR_INDEX, 3),
        }
    }

    // -- Initialization -----------------------------------------------------

    /// Seed the world state with the given records, one index entry per
    /// car, in a single batch. Intended for bootstrapping a fresh store;
    /// existing records under the same keys are overwritten.
    pub fn init_ledger(&self, cars: &[Car], owners: &[Owner]) -> Result<()> {
        let mut batch = WriteBatch::new();

        for car in cars {
            batch.put(car.key(), car.to_bytes()?);
            self.stage_index_insert(&mut batch, car)?;
        }
        for owner in owners {
            batch.put(owner.key(), owner.to_bytes()?);
        }

        self.store.apply(batch)?;
        info!(cars = cars.len(), owners = owners.len(), "ledger initialized");
        Ok(())
    }

    // -- Creation -----------------------------------------------------------

    /// Register a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyExists`] if the owner key is taken.
    pub fn create_owner(&self, owner: &Owner) -> Result<()> {
        let key = owner.key();
        if self.store.get(key.as_bytes())?.is_some() {
            return Err(LedgerError::AlreadyExists { key });
        }
        self.store.put(key.as_bytes(), &owner.to_bytes()?)
    }

    /// Register a new car with an empty malfunction list and zero price,
    /// and index it under its `(color, owner, id)` triple.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyExists`] if a car with this id is
    /// already registered.
    pub fn create_car(
        &self,
        id: u64,
        make: &str,
        model: &str,
        color: &str,
        owner_id: u64,
    ) -> Result<Car> {
        let key = car_key(id);
        if self.store.get(key.as_bytes())?.is_some() {
            return Err(LedgerError::AlreadyExists { key });
        }

        let car = Car {
            id,
            make: make.to_string(),
            model: model.to_string(),
            color: color.to_string(),
            owner: owner_id.to_string(),
            malfunctions: Vec::new(),
            price: 0,
        };

        let mut batch = WriteBatch::new();
        batch.put(car.key(), car.to_bytes()?);
        self.stage_index_insert(&mut batch, &car)?;
        self.store.apply(batch)?;

        Ok(car)
    }

    fn stage_index_insert(&self, batch: &mut WriteBatch, car: &Car) -> Result<()> {
        let [color, owner, id] = car.index_fields();
        self.index.stage_insert(batch, &[&color, &owner, &id])
    }

    fn stage_index_remove(&self, batch: &mut WriteBatch, car: &Car) -> Result<()> {
        let [color, owner, id] = car.index_fields();
        self.index.stage_remove(batch, &[&color, &owner, &id])
    }

    // -- Point lookups ------------------------------------------------------

    /// Load the car with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when absent and
    /// [`LedgerError::Corrupt`] when the stored bytes do not decode.
    pub fn get_car(&self, id: u64) -> Result<Car> {
        self.get_car_by_key(&car_key(id))
    }

    /// Load the owner with the given id.
    pub fn get_owner(&self, id: u64) -> Result<Owner> {
        self.get_owner_by_key(&owner_key(id))
    }

    fn get_car_by_key(&self, key: &str) -> Result<Car> {
        let bytes = self
            .store
            .get(key.as_bytes())?
            .ok_or_else(|| LedgerError::NotFound {
                key: key.to_string(),
            })?;
        Car::from_bytes(key, &bytes)
    }

    fn get_owner_by_key(&self, key: &str) -> Result<Owner> {
        let bytes = self
            .store
            .get(key.as_bytes())?
            .ok_or_else(|| LedgerError::NotFound {
                key: key.to_string(),
            })?;
        Owner::from_bytes(key, &bytes)
    }

    // -- Queries ------------------------------------------------------------

    /// Every registered car, in the store's byte-lexicographic key order.
    ///
    /// Note that decimal-string keys order lexicographically, so car 10
    /// sorts before car 2. Callers wanting numeric order must sort.
    pub fn get_all_cars(&self) -> Result<Vec<Car>> {
        let mut cars = Vec::new();
        for entry in self.store.scan_prefix(&[]) {
            let (raw_key, bytes) = entry?;
            if !is_car_key(&raw_key) {
                continue;
            }
            // is_car_key guarantees ASCII digits.
            let key = String::from_utf8_lossy(&raw_key).into_owned();
            cars.push(Car::from_bytes(&key, &bytes)?);
        }
        Ok(cars)
    }

    /// Cars whose color equals `color` exactly, resolved through the
    /// composite index.
    ///
    /// # Errors
    ///
    /// An index entry pointing at a missing car aborts the query with
    /// [`LedgerError::NotFound`] — divergence is surfaced, never skipped.
    pub fn get_cars_by_color(&self, color: &str) -> Result<Vec<Car>> {
        self.collect_indexed(&[color])
    }

    /// Cars whose color and owner both match, resolved through the
    /// composite index.
    pub fn get_cars_by_color_and_owner(&self, color: &str, owner_id: u64) -> Result<Vec<Car>> {
        self.collect_indexed(&[color, &owner_id.to_string()])
    }

    fn collect_indexed(&self, partial: &[&str]) -> Result<Vec<Car>> {
        let triples: Vec<Vec<String>> = self
            .index
            .scan(self.store, partial)?
            .collect::<Result<_>>()?;

        triples
            .iter()
            .map(|fields| self.get_car_by_key(&fields[2]))
            .collect()
    }

    // -- Mutations ----------------------------------------------------------

    /// Repaint a car, swapping its index entry in the same batch as the
    /// record write.
    pub fn change_car_color(&self, id: u64, new_color: &str) -> Result<Car> {
        let mut car = self.get_car(id)?;

        let mut batch = WriteBatch::new();
        self.stage_index_remove(&mut batch, &car)?;
        car.color = new_color.to_string();
        self.stage_index_insert(&mut batch, &car)?;
        batch.put(car.key(), car.to_bytes()?);
        self.store.apply(batch)?;

        Ok(car)
    }

    /// Record a defect against a car.
    ///
    /// If the accumulated malfunction cost (existing plus new) stays within
    /// the car's declared value, the malfunction is appended. If it exceeds
    /// the value, the car is written off: record and index entry are both
    /// removed. The threshold is inclusive — damage exactly equal to the
    /// car's value is still recorded.
    pub fn add_malfunction(
        &self,
        id: u64,
        description: &str,
        price: u64,
    ) -> Result<MalfunctionOutcome> {
        let mut car = self.get_car(id)?;

        let total = car
            .malfunction_total()?
            .checked_add(price)
            .ok_or_else(|| {
                LedgerError::AmountOverflow(format!(
                    "adding malfunction priced {price} to car {id}",
                ))
            })?;

        if total <= car.price {
            car.malfunctions.push(Malfunction {
                description: description.to_string(),
                price,
            });
            self.store.put(car.key().as_bytes(), &car.to_bytes()?)?;
            return Ok(MalfunctionOutcome::Recorded { outstanding: total });
        }

        // Damage is worth more than the car: write it off entirely.
        info!(
            car = id,
            damage = total,
            value = car.price,
            "malfunction cost exceeds car value, writing car off"
        );
        let mut batch = WriteBatch::new();
        batch.delete(car.key());
        self.stage_index_remove(&mut batch, &car)?;
        self.store.apply(batch)?;

        Ok(MalfunctionOutcome::WrittenOff)
    }

    /// Settle all outstanding malfunctions on a car against its owner's
    /// balance.
    ///
    /// When the owner can cover the total, the malfunction list is cleared
    /// and the balance debited in one batch. When the owner cannot, nothing
    /// changes and the shortfall is reported as a
    /// [`RepairOutcome::InsufficientFunds`] value (legacy quiet-skip
    /// policy, surfaced instead of swallowed).
    pub fn repair_car(&self, id: u64) -> Result<RepairOutcome> {
        let mut car = self.get_car(id)?;
        let mut owner = self.get_owner_by_key(&owner_key_for(&car.owner))?;

        let total = car.malfunction_total()?;
        if owner.money < total {
            warn!(
                car = id,
                owner = %car.owner,
                available = owner.money,
                required = total,
                "owner cannot afford repair, leaving car unchanged"
            );
            return Ok(RepairOutcome::InsufficientFunds {
                available: owner.money,
                required: total,
            });
        }

        car.malfunctions.clear();
        owner.debit(total)?;

        let mut batch = WriteBatch::new();
        batch.put(car.key(), car.to_bytes()?);
        batch.put(owner.key(), owner.to_bytes()?);
        self.store.apply(batch)?;

        Ok(RepairOutcome::Repaired { total })
    }

    /// Sell a car to another registered owner.
    ///
    /// Pricing: a car without malfunctions sells at its full value; a car
    /// with malfunctions sells at value minus the outstanding malfunction
    /// total, and only to a buyer who accepts the defects. The buyer is
    /// debited, the seller credited, the car re-owned, and the index entry
    /// swapped — all in one batch.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the car, the buyer, or the seller
    ///   record is missing (checked before any write).
    /// - [`LedgerError::MalfunctionsRejected`] if the car has malfunctions
    ///   and `accepts_malfunctions` is false.
    /// - [`LedgerError::InsufficientFunds`] if the buyer cannot cover the
    ///   price.
    pub fn transfer_ownership(
        &self,
        car_id: u64,
        new_owner_id: u64,
        accepts_malfunctions: bool,
    ) -> Result<Car> {
        let mut car = self.get_car(car_id)?;
        let mut buyer = self.get_owner(new_owner_id)?;

        let price = if car.malfunctions.is_empty() {
            car.price
        } else if accepts_malfunctions {
            let damage = car.malfunction_total()?;
            car.price.checked_sub(damage).ok_or_else(|| {
                LedgerError::AmountOverflow(format!(
                    "malfunction total {damage} exceeds value of car {car_id}",
                ))
            })?
        } else {
            return Err(LedgerError::MalfunctionsRejected);
        };

        if buyer.money < price {
            return Err(LedgerError::InsufficientFunds {
                available: buyer.money,
                required: price,
            });
        }

        let seller_ref = car.owner.clone();

        let mut batch = WriteBatch::new();
        self.stage_index_remove(&mut batch, &car)?;
        car.owner = new_owner_id.to_string();
        self.stage_index_insert(&mut batch, &car)?;
        batch.put(car.key(), car.to_bytes()?);

        if seller_ref == car.owner {
            // Selling to yourself: debit and credit cancel out, so only
            // the record rewrite lands.
            debug!(car = car_id, owner = new_owner_id, "self-transfer, no settlement");
        } else {
            // The seller must exist before any of this commits.
            let mut seller = self.get_owner_by_key(&owner_key_for(&seller_ref))?;
            buyer.debit(price)?;
            seller.credit(price)?;
            batch.put(buyer.key(), buyer.to_bytes()?);
            batch.put(seller.key(), seller.to_bytes()?);
        }

        self.store.apply(batch)?;
        debug!(
            car = car_id,
            from = %seller_ref,
            to = new_owner_id,
            price,
            "ownership transferred"
        );

        Ok(car)
    }

    /// Remove a car and its index entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no such car is registered.
    pub fn delete_car(&self, id: u64) -> Result<()> {
        let car = self.get_car(id)?;

        let mut batch = WriteBatch::new();
        batch.delete(car.key());
        self.stage_index_remove(&mut batch, &car)?;
        self.store.apply(batch)
    }

    // -- Maintenance --------------------------------------------------------

    /// Rebuild the composite index from the authoritative car records.
    ///
    /// Drops every existing index entry and re-derives one per stored car,
    /// in a single batch. An operational repair tool: after it runs, the
    /// index is exactly `{(color, owner, id) : car in world state}`.
    ///
    /// Returns the number of entries in the rebuilt index.
    pub fn rebuild_index(&self) -> Result<usize> {
        let mut batch = WriteBatch::new();

        // Stage removal of everything currently under the index prefix,
        // well-formed or not.
        let prefix = axle_ledger::key::encode_prefix(CAR_INDEX, &[])?;
        for entry in self.store.scan_prefix(&prefix) {
            let (raw_key, _) = entry?;
            batch.delete(raw_key);
        }

        // Re-derive entries from the authoritative records. Staging order
        // makes the inserts win over any deletes of the same key.
        let cars = self.get_all_cars()?;
        for car in &cars {
            self.stage_index_insert(&mut batch, car)?;
        }

        self.store.apply(batch)?;
        info!(entries = cars.len(), "composite index rebuilt");
        Ok(cars.len())
    }
}

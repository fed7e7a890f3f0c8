//! Demo fleet used to bootstrap fresh stores.
//!
//! Three owners, six cars, a couple of outstanding malfunctions — enough
//! variety to exercise every query and workflow from the CLI or a test
//! without inventing data by hand.

use crate::records::{Car, Malfunction, Owner};

/// The demo records: `(cars, owners)`.
pub fn demo_fleet() -> (Vec<Car>, Vec<Owner>) {
    let cars = vec![
        Car {
            id: 1,
            make: "Toyota".into(),
            model: "Corolla".into(),
            color: "blue".into(),
            owner: "1".into(),
            malfunctions: vec![Malfunction {
                description: "worn brake pads".into(),
                price: 200,
            }],
            price: 4500,
        },
        Car {
            id: 2,
            make: "Ford".into(),
            model: "Focus".into(),
            color: "blue".into(),
            owner: "3".into(),
            malfunctions: Vec::new(),
            price: 3200,
        },
        Car {
            id: 3,
            make: "Hyundai".into(),
            model: "i30".into(),
            color: "green".into(),
            owner: "2".into(),
            malfunctions: vec![Malfunction {
                description: "cracked windshield".into(),
                price: 900,
            }],
            price: 2600,
        },
        Car {
            id: 4,
            make: "Volkswagen".into(),
            model: "Golf".into(),
            color: "blue".into(),
            owner: "2".into(),
            malfunctions: Vec::new(),
            price: 6800,
        },
        Car {
            id: 5,
            make: "Tesla".into(),
            model: "Model 3".into(),
            color: "blue".into(),
            owner: "3".into(),
            malfunctions: Vec::new(),
            price: 21000,
        },
        Car {
            id: 6,
            make: "Peugeot".into(),
            model: "208".into(),
            color: "black".into(),
            owner: "3".into(),
            malfunctions: Vec::new(),
            price: 2100,
        },
    ];

    let owners = vec![
        Owner {
            id: 1,
            name: "Lena".into(),
            surname: "Brandt".into(),
            email: "lena.brandt@example.com".into(),
            money: 10000,
        },
        Owner {
            id: 2,
            name: "Marco".into(),
            surname: "Oliveira".into(),
            email: "marco.oliveira@example.com".into(),
            money: 5000,
        },
        Owner {
            id: 3,
            name: "Petra".into(),
            surname: "Novak".into(),
            email: "petra.novak@example.com".into(),
            money: 5000,
        },
    ];

    (cars, owners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_fleet_references_are_resolvable() {
        let (cars, owners) = demo_fleet();
        assert_eq!(cars.len(), 6);
        assert_eq!(owners.len(), 3);

        for c in &cars {
            assert!(
                owners.iter().any(|o| o.id.to_string() == c.owner),
                "car {} references unknown owner {}",
                c.id,
                c.owner,
            );
        }
    }

    #[test]
    fn demo_malfunctions_stay_within_car_value() {
        let (cars, _) = demo_fleet();
        for c in &cars {
            assert!(c.malfunction_total().unwrap() <= c.price);
        }
    }
}

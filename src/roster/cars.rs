use super::types::{Car, CarId, SlotTarget};

fn find_car_mut<'a>(cars: &'a mut [Car], car_id: &str) -> Option<&'a mut Car> {
    cars.iter_mut().find(|car| car.id == car_id)
}

/// Clears every slot the member holds, in any car
fn vacate(cars: &mut [Car], member_id: &str) {
    for car in cars.iter_mut() {
        if car.driver.as_deref() == Some(member_id) {
            car.driver = None;
        }
        for slot in car.passengers.iter_mut() {
            if slot.as_deref() == Some(member_id) {
                *slot = None;
            }
        }
    }
}

fn target_exists(cars: &[Car], target: &SlotTarget) -> bool {
    match target {
        SlotTarget::Driver { car_id } => cars.iter().any(|car| car.id == *car_id),
        SlotTarget::Passenger { car_id, index } => cars
            .iter()
            .any(|car| car.id == *car_id && *index < car.passengers.len()),
        SlotTarget::Unassigned => true,
    }
}

pub fn add_car(cars: &mut Vec<Car>, car_id: CarId) {
    cars.push(Car::new(car_id));
}

/// Removes the car; its occupants fall back to the available pool
pub fn remove_car(cars: &mut Vec<Car>, car_id: &str) -> bool {
    let before = cars.len();
    cars.retain(|car| car.id != car_id);
    cars.len() != before
}

pub fn add_passenger_slot(cars: &mut [Car], car_id: &str) -> bool {
    match find_car_mut(cars, car_id) {
        Some(car) => {
            car.passengers.push(None);
            true
        }
        None => false,
    }
}

/// Drops one passenger slot. A car never ends up with zero slots:
/// removing the last one leaves a single empty slot behind.
pub fn remove_passenger_slot(cars: &mut [Car], car_id: &str, index: usize) -> bool {
    let Some(car) = find_car_mut(cars, car_id) else {
        return false;
    };
    if index >= car.passengers.len() {
        return false;
    }

    car.passengers.remove(index);
    if car.passengers.is_empty() {
        car.passengers.push(None);
    }
    true
}

/// Puts a member into a slot, or back into the available pool.
///
/// The member first leaves every slot it holds anywhere, then takes the
/// target slot. Whoever sat in that slot before is released. The whole
/// move is computed on a copy and committed in one step; returns false
/// when the target does not exist or nothing changed.
pub fn place_member(cars: &mut Vec<Car>, member_id: &str, target: &SlotTarget) -> bool {
    if !target_exists(cars, target) {
        return false;
    }

    let mut next = cars.clone();
    vacate(&mut next, member_id);

    match target {
        SlotTarget::Driver { car_id } => {
            if let Some(car) = find_car_mut(&mut next, car_id) {
                car.driver = Some(member_id.to_string());
            }
        }
        SlotTarget::Passenger { car_id, index } => {
            if let Some(slot) = find_car_mut(&mut next, car_id).and_then(|car| car.passengers.get_mut(*index)) {
                *slot = Some(member_id.to_string());
            }
        }
        SlotTarget::Unassigned => {}
    }

    if next == *cars {
        return false;
    }
    *cars = next;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::assignment::AssignmentIndex;
    use std::collections::HashMap;

    fn driver(car_id: &str) -> SlotTarget {
        SlotTarget::Driver { car_id: car_id.into() }
    }

    fn passenger(car_id: &str, index: usize) -> SlotTarget {
        SlotTarget::Passenger { car_id: car_id.into(), index }
    }

    fn two_cars() -> Vec<Car> {
        let mut cars = Vec::new();
        add_car(&mut cars, "c1".into());
        add_car(&mut cars, "c2".into());
        cars
    }

    fn assert_single_occupancy(cars: &[Car]) {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for car in cars {
            for id in car.occupants() {
                *seen.entry(id.as_str()).or_insert(0) += 1;
            }
        }
        for (id, count) in seen {
            assert_eq!(count, 1, "member {} holds {} slots", id, count);
        }
    }

    #[test]
    fn new_driver_displaces_old_one() {
        let mut cars = two_cars();
        assert!(place_member(&mut cars, "a", &driver("c1")));
        assert!(place_member(&mut cars, "b", &driver("c1")));

        assert_eq!(cars[0].driver.as_deref(), Some("b"));
        let index = AssignmentIndex::from_cars(&cars);
        assert!(!index.contains("a"));
        assert!(index.contains("b"));
    }

    #[test]
    fn moving_between_cars_vacates_old_slot() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &passenger("c1", 0));
        assert!(place_member(&mut cars, "a", &driver("c2")));

        assert_eq!(cars[0].passengers, vec![None]);
        assert_eq!(cars[1].driver.as_deref(), Some("a"));
        assert_single_occupancy(&cars);
        assert_eq!(AssignmentIndex::from_cars(&cars).len(), 1);
    }

    #[test]
    fn same_slot_is_idempotent() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &passenger("c1", 0));
        let before = cars.clone();
        assert!(!place_member(&mut cars, "a", &passenger("c1", 0)));
        assert_eq!(cars, before);
    }

    #[test]
    fn moving_within_one_car() {
        let mut cars = two_cars();
        add_passenger_slot(&mut cars, "c1");
        place_member(&mut cars, "a", &driver("c1"));
        place_member(&mut cars, "a", &passenger("c1", 1));
        assert_eq!(cars[0].driver, None);
        assert_eq!(cars[0].passengers, vec![None, Some("a".to_string())]);
    }

    #[test]
    fn displaced_passenger_is_released() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &passenger("c1", 0));
        place_member(&mut cars, "b", &passenger("c1", 0));
        let index = AssignmentIndex::from_cars(&cars);
        assert!(!index.contains("a"));
        assert!(index.contains("b"));
    }

    #[test]
    fn unassigned_target_only_vacates() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &driver("c2"));
        assert!(place_member(&mut cars, "a", &SlotTarget::Unassigned));
        assert!(AssignmentIndex::from_cars(&cars).is_empty());
        assert!(!place_member(&mut cars, "a", &SlotTarget::Unassigned));
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &driver("c1"));
        let before = cars.clone();

        assert!(!place_member(&mut cars, "a", &driver("nope")));
        assert!(!place_member(&mut cars, "a", &passenger("c2", 5)));
        assert!(!remove_car(&mut cars, "nope"));
        assert!(!add_passenger_slot(&mut cars, "nope"));
        assert!(!remove_passenger_slot(&mut cars, "c1", 9));
        assert_eq!(cars, before);
    }

    #[test]
    fn removing_last_slot_leaves_one_empty() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &passenger("c1", 0));
        assert!(remove_passenger_slot(&mut cars, "c1", 0));
        assert_eq!(cars[0].passengers, vec![None]);
        assert!(AssignmentIndex::from_cars(&cars).is_empty());
    }

    #[test]
    fn removing_middle_slot_shifts_the_rest() {
        let mut cars = two_cars();
        add_passenger_slot(&mut cars, "c1");
        add_passenger_slot(&mut cars, "c1");
        place_member(&mut cars, "a", &passenger("c1", 1));
        place_member(&mut cars, "b", &passenger("c1", 2));
        assert!(remove_passenger_slot(&mut cars, "c1", 1));
        assert_eq!(cars[0].passengers, vec![None, Some("b".to_string())]);
    }

    #[test]
    fn remove_car_releases_everyone() {
        let mut cars = two_cars();
        place_member(&mut cars, "a", &driver("c1"));
        place_member(&mut cars, "b", &passenger("c1", 0));
        place_member(&mut cars, "c", &driver("c2"));
        assert!(remove_car(&mut cars, "c1"));

        let index = AssignmentIndex::from_cars(&cars);
        assert_eq!(cars.len(), 1);
        assert_eq!(index.to_sorted_vec(), vec!["c"]);
    }

    #[test]
    fn many_moves_keep_single_occupancy() {
        let mut cars = two_cars();
        add_passenger_slot(&mut cars, "c1");
        add_passenger_slot(&mut cars, "c2");
        let members = ["a", "b", "c", "d"];
        let targets = [
            driver("c1"),
            passenger("c1", 0),
            passenger("c1", 1),
            driver("c2"),
            passenger("c2", 0),
            passenger("c2", 1),
            SlotTarget::Unassigned,
        ];
        for step in 0..60 {
            let member = members[step % members.len()];
            let target = &targets[(step * 5 + step / 3) % targets.len()];
            place_member(&mut cars, member, target);
            assert_single_occupancy(&cars);
        }
    }
}

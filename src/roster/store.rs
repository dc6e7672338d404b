use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::persistence::SnapshotGateway;
use super::assignment::AssignmentIndex;
use super::cars;
use super::splitter::split_teams;
use super::teams::move_to_team;
use super::types::{Car, CarId, CarSnapshot, Member, MemberId, RosterSnapshot, SlotTarget, Team};

/// Head counts shown next to the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub total: usize,
    pub red: usize,
    pub green: usize,
    pub unassigned: usize,
    pub in_cars: usize,
    pub available: usize,
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new().to_string().to_lowercase())
}

/// Collapses runs of whitespace and control characters into single spaces,
/// so a name always renders on one line.
fn clean_name(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Owns the roster: every member once, team lists and car slots by id.
///
/// Each operation that changes something writes a full snapshot through
/// the gateway. Operations naming unknown ids change nothing and return
/// `false`.
pub struct RosterStore {
    members: Vec<Member>,
    member_index: HashMap<MemberId, usize>,
    red_team: Vec<MemberId>,
    green_team: Vec<MemberId>,
    cars: Vec<Car>,
    assigned: AssignmentIndex,
    gateway: Box<dyn SnapshotGateway>,
}

impl RosterStore {
    /// Loads the saved roster, or starts empty when there is none or it
    /// cannot be read. Nothing is written until the first mutation.
    pub fn open(gateway: Box<dyn SnapshotGateway>) -> Self {
        let mut store = RosterStore {
            members: Vec::new(),
            member_index: HashMap::new(),
            red_team: Vec::new(),
            green_team: Vec::new(),
            cars: Vec::new(),
            assigned: AssignmentIndex::default(),
            gateway,
        };

        match store.gateway.load() {
            Ok(Some(snapshot)) => {
                store.hydrate(snapshot);
                info!(
                    members = store.members.len(),
                    cars = store.cars.len(),
                    "Loaded saved roster"
                );
            }
            Ok(None) => debug!("No saved roster, starting empty"),
            Err(e) => warn!("Ignoring unreadable saved roster: {}", e),
        }
        store
    }

    fn hydrate(&mut self, snapshot: RosterSnapshot) {
        let RosterSnapshot { all_members, red_team, green_team, cars, .. } = snapshot;

        for member in all_members {
            self.insert_member(member);
        }

        // A member sits on one team at most; red wins on conflict
        let mut on_team = HashSet::new();
        for (team, list) in [(Team::Red, red_team), (Team::Green, green_team)] {
            for member in list {
                let id = member.id.clone();
                self.insert_member(member);
                if on_team.insert(id.clone()) {
                    self.team_list_mut(team).push(id);
                }
            }
        }

        // First slot in scan order keeps the member
        let mut seated = HashSet::new();
        for car in cars {
            let CarSnapshot { id, driver, passengers } = car;
            let driver = driver.and_then(|m| self.seat(m, &mut seated));
            let mut passengers: Vec<Option<MemberId>> = passengers
                .into_iter()
                .map(|slot| slot.and_then(|m| self.seat(m, &mut seated)))
                .collect();
            if passengers.is_empty() {
                passengers.push(None);
            }
            self.cars.push(Car { id, driver, passengers });
        }

        self.assigned = AssignmentIndex::from_cars(&self.cars);
    }

    fn seat(&mut self, member: Member, seated: &mut HashSet<MemberId>) -> Option<MemberId> {
        let id = member.id.clone();
        self.insert_member(member);
        seated.insert(id.clone()).then_some(id)
    }

    fn insert_member(&mut self, member: Member) -> bool {
        if self.member_index.contains_key(&member.id) {
            return false;
        }
        self.member_index.insert(member.id.clone(), self.members.len());
        self.members.push(member);
        true
    }

    fn team_list_mut(&mut self, team: Team) -> &mut Vec<MemberId> {
        match team {
            Team::Red => &mut self.red_team,
            Team::Green => &mut self.green_team,
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.gateway.save(&snapshot) {
            warn!("Failed to save roster, keeping in-memory state: {}", e);
        }
    }

    fn cars_changed(&mut self) {
        self.assigned = AssignmentIndex::from_cars(&self.cars);
        self.persist();
    }

    // ---- members ----

    /// Appends one member per non-blank name. Returns the new ids.
    /// Names are cleaned the same way as in `rename_member`.
    pub fn add_members<I, S>(&mut self, names: I) -> Vec<MemberId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = Vec::new();
        for name in names {
            let name = clean_name(name.as_ref());
            if name.is_empty() {
                continue;
            }
            let member = Member {
                id: new_id("member"),
                name,
            };
            added.push(member.id.clone());
            self.insert_member(member);
        }

        if !added.is_empty() {
            info!(count = added.len(), "Added members");
            self.persist();
        }
        added
    }

    /// Renames a member. Line breaks and other control characters become
    /// single spaces. Blank or unchanged names are ignored.
    pub fn rename_member(&mut self, member_id: &str, new_name: &str) -> bool {
        let name = clean_name(new_name);
        if name.is_empty() {
            return false;
        }
        let Some(&pos) = self.member_index.get(member_id) else {
            return false;
        };

        let member = &mut self.members[pos];
        if member.name == name {
            return false;
        }
        debug!(member_id, from = %member.name, to = %name, "Renamed member");
        member.name = name;
        self.persist();
        true
    }

    /// Drops everything, including the saved snapshot
    pub fn reset(&mut self) {
        self.members.clear();
        self.member_index.clear();
        self.red_team.clear();
        self.green_team.clear();
        self.cars.clear();
        self.assigned = AssignmentIndex::default();

        if let Err(e) = self.gateway.clear() {
            warn!("Failed to clear saved roster: {}", e);
        }
        info!("Roster reset");
    }

    // ---- teams ----

    pub fn split_teams(&mut self) {
        self.split_teams_with(&mut rand::thread_rng());
    }

    /// Replaces both teams with a fresh random split of the whole roster.
    /// Car seats are left alone.
    pub fn split_teams_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let ids: Vec<MemberId> = self.members.iter().map(|m| m.id.clone()).collect();
        let (red, green) = split_teams(&ids, rng);
        info!(red = red.len(), green = green.len(), "Split teams");
        self.red_team = red;
        self.green_team = green;
        self.persist();
    }

    pub fn move_to_team(&mut self, member_id: &str, target: Team) -> bool {
        let moved = move_to_team(&mut self.red_team, &mut self.green_team, member_id, target);
        if moved {
            self.persist();
        }
        moved
    }

    // ---- cars ----

    pub fn add_car(&mut self) -> CarId {
        let car_id = new_id("car");
        cars::add_car(&mut self.cars, car_id.clone());
        self.cars_changed();
        car_id
    }

    pub fn remove_car(&mut self, car_id: &str) -> bool {
        let removed = cars::remove_car(&mut self.cars, car_id);
        if removed {
            self.cars_changed();
        }
        removed
    }

    pub fn add_passenger_slot(&mut self, car_id: &str) -> bool {
        let added = cars::add_passenger_slot(&mut self.cars, car_id);
        if added {
            self.cars_changed();
        }
        added
    }

    pub fn remove_passenger_slot(&mut self, car_id: &str, index: usize) -> bool {
        let removed = cars::remove_passenger_slot(&mut self.cars, car_id, index);
        if removed {
            self.cars_changed();
        }
        removed
    }

    pub fn place_member(&mut self, member_id: &str, target: &SlotTarget) -> bool {
        if !self.member_index.contains_key(member_id) {
            return false;
        }
        let placed = cars::place_member(&mut self.cars, member_id, target);
        if placed {
            self.cars_changed();
        }
        placed
    }

    // ---- reads ----

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.member_index.get(member_id).map(|&pos| &self.members[pos])
    }

    pub fn name_of(&self, member_id: &str) -> Option<&str> {
        self.member(member_id).map(|m| m.name.as_str())
    }

    pub fn team(&self, team: Team) -> &[MemberId] {
        match team {
            Team::Red => &self.red_team,
            Team::Green => &self.green_team,
        }
    }

    pub fn team_members(&self, team: Team) -> Vec<&Member> {
        self.team(team).iter().filter_map(|id| self.member(id)).collect()
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn assignment_index(&self) -> &AssignmentIndex {
        &self.assigned
    }

    /// Roster order, minus anyone sitting in a car
    pub fn available_for_cars(&self) -> Vec<&Member> {
        let index = self.assignment_index();
        self.members
            .iter()
            .filter(|m| !index.contains(&m.id))
            .collect()
    }

    pub fn stats(&self) -> RosterStats {
        let total = self.members.len();
        let red = self.red_team.len();
        let green = self.green_team.len();
        let in_cars = self.assigned.len();
        RosterStats {
            total,
            red,
            green,
            unassigned: total.saturating_sub(red + green),
            in_cars,
            available: total.saturating_sub(in_cars),
        }
    }

    /// Denormalized view, the shape written to storage
    pub fn snapshot(&self) -> RosterSnapshot {
        let resolve = |id: &MemberId| self.member(id).cloned();
        RosterSnapshot {
            all_members: self.members.clone(),
            red_team: self.red_team.iter().filter_map(resolve).collect(),
            green_team: self.green_team.iter().filter_map(resolve).collect(),
            cars: self
                .cars
                .iter()
                .map(|car| CarSnapshot {
                    id: car.id.clone(),
                    driver: car.driver.as_ref().and_then(resolve),
                    passengers: car
                        .passengers
                        .iter()
                        .map(|slot| slot.as_ref().and_then(resolve))
                        .collect(),
                })
                .collect(),
            assigned_to_car_ids: self.assigned.to_sorted_vec(),
        }
    }
}

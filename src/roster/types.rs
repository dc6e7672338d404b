use serde::{Serialize, Deserialize};

pub type MemberId = String;
pub type CarId = String;

/// A participant on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Green,
}

impl Team {
    pub fn label(self) -> &'static str {
        match self {
            Team::Red => "Red",
            Team::Green => "Green",
        }
    }
}

/// A car holds member ids only; names are resolved through the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: CarId,
    pub driver: Option<MemberId>,
    pub passengers: Vec<Option<MemberId>>, // always at least one slot
}

impl Car {
    pub fn new(id: CarId) -> Self {
        Car {
            id,
            driver: None,
            passengers: vec![None],
        }
    }

    /// Every occupied slot, driver first
    pub fn occupants(&self) -> impl Iterator<Item = &MemberId> {
        self.driver.iter().chain(self.passengers.iter().flatten())
    }
}

/// Where a member gets dropped in the car board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlotTarget {
    #[serde(rename_all = "camelCase")]
    Driver { car_id: CarId },
    #[serde(rename_all = "camelCase")]
    Passenger { car_id: CarId, index: usize },
    Unassigned,
}

/// Car as written to storage, with member copies in its slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSnapshot {
    pub id: CarId,
    #[serde(default)]
    pub driver: Option<Member>,
    #[serde(default)]
    pub passengers: Vec<Option<Member>>,
}

/// Full persisted state. Missing fields load as empty collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RosterSnapshot {
    pub all_members: Vec<Member>,
    pub red_team: Vec<Member>,
    pub green_team: Vec<Member>,
    pub cars: Vec<CarSnapshot>,
    pub assigned_to_car_ids: Vec<MemberId>,
}

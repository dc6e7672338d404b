use std::collections::HashSet;
use super::types::{Car, MemberId};

/// Ids of every member sitting in any car slot.
/// Always rebuilt from the car list, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentIndex {
    ids: HashSet<MemberId>,
}

impl AssignmentIndex {
    pub fn from_cars(cars: &[Car]) -> Self {
        let ids = cars
            .iter()
            .flat_map(|car| car.occupants().cloned())
            .collect();
        AssignmentIndex { ids }
    }

    pub fn contains(&self, member_id: &str) -> bool {
        self.ids.contains(member_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sorted for stable output
    pub fn to_sorted_vec(&self) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

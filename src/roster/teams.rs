use super::types::{MemberId, Team};

/// Moves a member already on a team to the end of the other team's list.
/// Returns false when the member is on neither team or already on the target.
pub fn move_to_team(
    red_team: &mut Vec<MemberId>,
    green_team: &mut Vec<MemberId>,
    member_id: &str,
    target: Team,
) -> bool {
    let (from, to) = match target {
        Team::Red => (green_team, red_team),
        Team::Green => (red_team, green_team),
    };

    match from.iter().position(|id| id == member_id) {
        Some(pos) => {
            let id = from.remove(pos);
            to.push(id);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<MemberId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn moves_member_to_end_of_target() {
        let mut red = ids(&["a", "b"]);
        let mut green = ids(&["c", "d"]);
        assert!(move_to_team(&mut red, &mut green, "a", Team::Green));
        assert_eq!(red, ids(&["b"]));
        assert_eq!(green, ids(&["c", "d", "a"]));
    }

    #[test]
    fn already_on_target_is_noop() {
        let mut red = ids(&["a", "b"]);
        let mut green = ids(&["c"]);
        assert!(!move_to_team(&mut red, &mut green, "b", Team::Red));
        assert_eq!(red, ids(&["a", "b"]));
        assert_eq!(green, ids(&["c"]));
    }

    #[test]
    fn unassigned_member_is_not_promoted() {
        let mut red = ids(&["a"]);
        let mut green = ids(&["c"]);
        assert!(!move_to_team(&mut red, &mut green, "zz", Team::Green));
        assert_eq!(green, ids(&["c"]));
    }
}

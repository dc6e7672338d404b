use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffles the members uniformly and cuts at ceil(n/2).
/// The first half is the red team, the rest green.
pub fn split_teams<T, R>(members: &[T], rng: &mut R) -> (Vec<T>, Vec<T>)
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut shuffled = members.to_vec();
    shuffled.shuffle(rng);

    let midpoint = (shuffled.len() + 1) / 2;
    let second = shuffled.split_off(midpoint);
    (shuffled, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn split_sizes_follow_ceiling_rule() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..12 {
            let members: Vec<u32> = (0..n).collect();
            let (a, b) = split_teams(&members, &mut rng);
            assert_eq!(a.len(), (n as usize + 1) / 2);
            assert_eq!(b.len(), n as usize / 2);
        }
    }

    #[test]
    fn split_is_a_partition() {
        let mut rng = StdRng::seed_from_u64(42);
        let members: Vec<String> = (0..9).map(|i| format!("member-{}", i)).collect();
        let (a, b) = split_teams(&members, &mut rng);

        let set_a: HashSet<_> = a.iter().collect();
        let set_b: HashSet<_> = b.iter().collect();
        assert!(set_a.is_disjoint(&set_b));
        let union: HashSet<_> = set_a.union(&set_b).copied().collect();
        assert_eq!(union, members.iter().collect());
    }

    #[test]
    fn same_seed_gives_same_split() {
        let members: Vec<u32> = (0..20).collect();
        let first = split_teams(&members, &mut StdRng::seed_from_u64(3));
        let second = split_teams(&members, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }
}

use crate::domain::models::{Assignment, EnrollmentSnapshot, Pairing};
use crate::error::SantaError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffles the snapshot and links every participant to the next one.
///
/// Index `i` of the shuffled order gives to index `(i + 1) % n`, so the result
/// is always one cycle through everybody: nobody draws themselves and every
/// participant gives and receives exactly once. Only single-cycle outcomes are
/// produced (for four people, two separate swaps never happen).
pub fn draw_assignment<R: Rng + ?Sized>(
    snapshot: &EnrollmentSnapshot,
    rng: &mut R,
) -> Result<Assignment, SantaError> {
    let n = snapshot.len();
    if n < 2 {
        return Err(SantaError::NotEnoughParticipants { enrolled: n });
    }

    let mut order = snapshot.participants().to_vec();
    order.shuffle(rng);

    let pairs = (0..n)
        .map(|i| Pairing {
            giver: order[i].clone(),
            recipient: order[(i + 1) % n].clone(),
        })
        .collect();
    Ok(Assignment::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::draw_assignment;
    use crate::domain::models::{Assignment, EnrollmentSnapshot, Participant};
    use crate::error::SantaError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn snapshot(n: usize) -> EnrollmentSnapshot {
        EnrollmentSnapshot::new(
            (0..n)
                .map(|i| Participant {
                    id: format!("id-{}", i),
                    display_name: format!("Member {}", i),
                    handle: format!("member{}", i),
                })
                .collect(),
        )
    }

    fn cycle_length(assignment: &Assignment) -> usize {
        let next: HashMap<&str, &str> = assignment
            .pairs()
            .iter()
            .map(|p| (p.giver.id.as_str(), p.recipient.id.as_str()))
            .collect();
        let start = assignment.pairs()[0].giver.id.as_str();
        let mut current = next[start];
        let mut steps = 1;
        while current != start {
            current = next[current];
            steps += 1;
        }
        steps
    }

    #[test]
    fn assignment_is_a_derangement_forming_one_cycle() {
        for n in 2..12 {
            for seed in 0..25u64 {
                let mut rng = StdRng::seed_from_u64(seed);
                let snap = snapshot(n);
                let a = draw_assignment(&snap, &mut rng).expect("assignment");
                assert_eq!(a.len(), n);

                let givers: HashSet<_> = a.pairs().iter().map(|p| &p.giver.id).collect();
                let recipients: HashSet<_> = a.pairs().iter().map(|p| &p.recipient.id).collect();
                assert_eq!(givers.len(), n);
                assert_eq!(recipients.len(), n);
                assert!(a.pairs().iter().all(|p| p.giver != p.recipient));
                assert_eq!(cycle_length(&a), n);
            }
        }
    }

    #[test]
    fn fewer_than_two_participants_is_refused() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..2 {
            match draw_assignment(&snapshot(n), &mut rng) {
                Err(SantaError::NotEnoughParticipants { enrolled }) => assert_eq!(enrolled, n),
                other => panic!("unexpected result: {:?}", other.map(|a| a.len())),
            }
        }
    }

    #[test]
    fn shuffling_varies_the_pairs() {
        let snap = snapshot(6);
        let outcomes: HashSet<Vec<String>> = (0..20u64)
            .map(|seed| {
                let a = draw_assignment(&snap, &mut StdRng::seed_from_u64(seed)).unwrap();
                let mut pairs: Vec<String> = a
                    .pairs()
                    .iter()
                    .map(|p| format!("{}>{}", p.giver.id, p.recipient.id))
                    .collect();
                pairs.sort();
                pairs
            })
            .collect();
        assert!(outcomes.len() > 1);
    }
}

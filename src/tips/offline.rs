//! Built-in tip collection used when the remote service is unavailable.

use rand::seq::SliceRandom;
use rand::Rng;

/// Tips shown without a network round trip.
pub const OFFLINE_TIPS: [&str; 20] = [
    "Design for systemic change, not just screens. Map how your UI affects behavior across the entire ecosystem.",
    "State transitions matter more than static states. Design how things change, not just what they look like.",
    "Every design is a policy. Ask: what behaviors does this interface reward or discourage?",
    "Favor recognition over recall, but teach recall when mastery matters (e.g. in expert tools).",
    "Use progressive disclosure not just for hierarchy, but to time cognitive load effectively.",
    "Add intentional friction where it increases engagement, reflection, or safety.",
    "Design with temporal gradients. Think about how expectations shift over time, not just in flow.",
    "Use elevation and shadow to express intent and focus, not just visual depth.",
    "Color is a functional language. Use it to communicate urgency, system state, or emotion.",
    "Motion is grammar: timing and easing convey relationship and hierarchy.",
    "Design the apology state. Empty, error, and fail states are moments for trust repair.",
    "Make exits as clear as entries. Great UX supports graceful opt-out or undo paths.",
    "Don't just reduce clicks. Maximize clarity per click.",
    "Microcopy isn't decoration. Write interface text with tone, pacing, and clarity in mind.",
    "Prototype to test beliefs, not just flows. What's the riskiest assumption you can invalidate?",
    "Design version 1 with version 3 in mind. Leave room for scale, change, and evolution.",
    "Watch what users do, not just what they say. Behavior reveals truth.",
    "Think in systems, not screens. UI is only one surface in the experience.",
    "Visual hierarchy isn't just about size. It's about flow, contrast, rhythm, and repetition.",
    "Create interfaces that earn user attention, not demand it.",
];

/// Picks one offline tip uniformly at random.
pub fn pick_offline_tip<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    OFFLINE_TIPS
        .choose(rng)
        .copied()
        .unwrap_or(OFFLINE_TIPS[0])
}

/// Picks one offline tip using the thread-local generator.
pub fn random_offline_tip() -> &'static str {
    pick_offline_tip(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_collection_is_non_empty() {
        assert!(OFFLINE_TIPS.iter().all(|tip| !tip.trim().is_empty()));
    }

    #[test]
    fn test_pick_is_from_collection() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(OFFLINE_TIPS.contains(&pick_offline_tip(&mut rng)));
        }
    }

    #[test]
    fn test_pick_is_deterministic_per_seed() {
        let a = pick_offline_tip(&mut StdRng::seed_from_u64(42));
        let b = pick_offline_tip(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_covers_several_tips() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_offline_tip(&mut rng));
        }
        assert!(seen.len() > 10);
    }

    #[test]
    fn test_random_offline_tip() {
        assert!(OFFLINE_TIPS.contains(&random_offline_tip()));
    }
}

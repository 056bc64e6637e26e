//! Quota-balanced bucket selection.
//!
//! Each category first fills its quota of `ceil(target / n)` from its own
//! Gold, then Silver, then Bronze bucket (each shuffled). Shortfalls are topped
//! up from the remaining candidates in rank order, round-robin across
//! categories. Words are deduplicated case-insensitively as they are picked.

use rand::seq::SliceRandom;
use rand::Rng;
use spellkit_core::{CategoryId, Rank, RankedCandidate};
use std::collections::{HashSet, VecDeque};

/// Per-category queues, one per rank.
struct Buckets {
    category: CategoryId,
    ranks: [VecDeque<RankedCandidate>; 3],
}

impl Buckets {
    fn build<R: Rng + ?Sized>(
        category: CategoryId,
        ranked: &[RankedCandidate],
        rng: &mut R,
    ) -> Self {
        let ranks = Rank::ALL.map(|rank| {
            let mut bucket: Vec<RankedCandidate> = ranked
                .iter()
                .filter(|r| r.candidate.category_id == category && r.rank == rank)
                .cloned()
                .collect();
            bucket.shuffle(rng);
            VecDeque::from(bucket)
        });
        Self { category, ranks }
    }

    /// Next unseen candidate of exactly `rank`.
    fn next_of(&mut self, rank: Rank, seen: &mut HashSet<String>) -> Option<RankedCandidate> {
        let queue = &mut self.ranks[rank as usize];
        while let Some(candidate) = queue.pop_front() {
            if seen.insert(candidate.candidate.word.to_lowercase()) {
                return Some(candidate);
            }
        }
        None
    }

    /// Best unseen candidate of any rank.
    fn next_best(&mut self, seen: &mut HashSet<String>) -> Option<RankedCandidate> {
        Rank::ALL
            .into_iter()
            .find_map(|rank| self.next_of(rank, seen))
    }
}

/// Pick at most `target` distinct words across `categories`.
///
/// The result is shorter than `target` only when the pool ran dry; the
/// caller decides whether that is fatal.
pub fn select_words<R: Rng + ?Sized>(
    ranked: &[RankedCandidate],
    categories: &[CategoryId],
    target: usize,
    rng: &mut R,
) -> Vec<RankedCandidate> {
    if categories.is_empty() || target == 0 {
        return Vec::new();
    }

    let quota = target.div_ceil(categories.len());
    let mut seen = HashSet::new();
    let mut buckets: Vec<Buckets> = categories
        .iter()
        .map(|c| Buckets::build(*c, ranked, rng))
        .collect();
    let mut picks: Vec<Vec<RankedCandidate>> = vec![Vec::new(); categories.len()];

    // Quota pass, in category input order.
    for (bucket, picked) in buckets.iter_mut().zip(picks.iter_mut()) {
        while picked.len() < quota {
            match bucket.next_best(&mut seen) {
                Some(candidate) => picked.push(candidate),
                None => break,
            }
        }
        if picked.len() < quota {
            tracing::debug!(
                category = bucket.category,
                picked = picked.len(),
                quota,
                "Category short of quota"
            );
        }
    }

    // Top-up pass: remaining Gold across categories first, then Silver, then Bronze.
    let mut total: usize = picks.iter().map(Vec::len).sum();
    for rank in Rank::ALL {
        let mut progressed = true;
        while total < target && progressed {
            progressed = false;
            for (bucket, picked) in buckets.iter_mut().zip(picks.iter_mut()) {
                if total >= target {
                    break;
                }
                if let Some(candidate) = bucket.next_of(rank, &mut seen) {
                    picked.push(candidate);
                    total += 1;
                    progressed = true;
                }
            }
        }
    }

    // Overshoot from quota rounding: drop the worst pick of the fullest category.
    while total > target {
        let Some(fullest) = picks
            .iter_mut()
            .enumerate()
            .max_by_key(|(i, p)| (p.len(), std::cmp::Reverse(*i)))
            .map(|(_, p)| p)
        else {
            break;
        };
        let Some(worst) = fullest
            .iter()
            .enumerate()
            .max_by_key(|(_, r)| r.rank)
            .map(|(i, _)| i)
        else {
            break;
        };
        fullest.remove(worst);
        total -= 1;
    }

    let mut selected: Vec<RankedCandidate> = picks.into_iter().flatten().collect();
    selected.shuffle(rng);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spellkit_core::WordCandidate;

    fn ranked(word: &str, category: CategoryId, rank: Rank) -> RankedCandidate {
        RankedCandidate {
            candidate: WordCandidate::new(word, category),
            rank,
        }
    }

    fn pool(category: CategoryId, rank: Rank, n: usize) -> Vec<RankedCandidate> {
        (0..n)
            .map(|i| ranked(&format!("w{}-{}-{}", category, rank.as_str(), i), category, rank))
            .collect()
    }

    fn count_for(selected: &[RankedCandidate], category: CategoryId) -> usize {
        selected
            .iter()
            .filter(|r| r.candidate.category_id == category)
            .count()
    }

    #[test]
    fn test_three_categories_split_evenly() {
        let mut all = Vec::new();
        for c in [2, 3, 8] {
            all.extend(pool(c, Rank::Gold, 10));
        }
        let mut rng = StdRng::seed_from_u64(7);
        let selected = select_words(&all, &[2, 3, 8], 15, &mut rng);
        assert_eq!(selected.len(), 15);
        for c in [2, 3, 8] {
            assert_eq!(count_for(&selected, c), 5);
        }
    }

    #[test]
    fn test_gold_drained_before_silver_and_bronze() {
        let mut all = pool(2, Rank::Bronze, 10);
        all.extend(pool(2, Rank::Silver, 10));
        all.extend(pool(2, Rank::Gold, 3));
        let mut rng = StdRng::seed_from_u64(1);
        let selected = select_words(&all, &[2], 8, &mut rng);

        let gold = selected.iter().filter(|r| r.rank == Rank::Gold).count();
        let silver = selected.iter().filter(|r| r.rank == Rank::Silver).count();
        assert_eq!(gold, 3);
        assert_eq!(silver, 5);
    }

    #[test]
    fn test_short_category_topped_up_from_others() {
        let mut all = pool(2, Rank::Gold, 2);
        all.extend(pool(3, Rank::Gold, 20));
        let mut rng = StdRng::seed_from_u64(3);
        let selected = select_words(&all, &[2, 3], 15, &mut rng);
        assert_eq!(selected.len(), 15);
        assert_eq!(count_for(&selected, 2), 2);
        assert_eq!(count_for(&selected, 3), 13);
    }

    #[test]
    fn test_rounding_overshoot_is_trimmed() {
        let mut all = Vec::new();
        for c in [2, 3, 4, 5] {
            all.extend(pool(c, Rank::Gold, 6));
        }
        let mut rng = StdRng::seed_from_u64(11);
        let selected = select_words(&all, &[2, 3, 4, 5], 15, &mut rng);
        assert_eq!(selected.len(), 15);
        for c in [2, 3, 4, 5] {
            let n = count_for(&selected, c);
            assert!((3..=4).contains(&n), "category {} got {}", c, n);
        }
    }

    #[test]
    fn test_duplicates_across_categories_picked_once() {
        let all = vec![
            ranked("bank", 2, Rank::Gold),
            ranked("Bank", 4, Rank::Gold),
            ranked("slang", 2, Rank::Gold),
            ranked("denk", 4, Rank::Gold),
        ];
        let mut rng = StdRng::seed_from_u64(5);
        let selected = select_words(&all, &[2, 4], 4, &mut rng);
        assert_eq!(selected.len(), 3);
        let mut words: Vec<String> = selected
            .iter()
            .map(|r| r.candidate.word.to_lowercase())
            .collect();
        words.sort();
        words.dedup();
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select_words(&[], &[2], 15, &mut rng).is_empty());
        assert!(select_words(&pool(2, Rank::Gold, 3), &[], 15, &mut rng).is_empty());
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spellkit_core::WordCandidate;

    fn arb_pool() -> impl Strategy<Value = Vec<RankedCandidate>> {
        prop::collection::vec(
            ("[a-d]{2,3}", 1u32..=4, 0usize..3).prop_map(|(word, category, rank)| {
                RankedCandidate {
                    candidate: WordCandidate::new(word, category),
                    rank: Rank::ALL[rank],
                }
            }),
            0..60,
        )
    }

    proptest! {
        #[test]
        fn prop_selection_is_unique_and_bounded(
            pool in arb_pool(),
            target in 1usize..20,
            seed in any::<u64>(),
        ) {
            let categories = [1, 2, 3, 4];
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select_words(&pool, &categories, target, &mut rng);

            prop_assert!(selected.len() <= target);
            let mut seen = HashSet::new();
            for r in &selected {
                prop_assert!(seen.insert(r.candidate.word.to_lowercase()));
            }

            let distinct: HashSet<String> =
                pool.iter().map(|r| r.candidate.word.to_lowercase()).collect();
            prop_assert_eq!(selected.len(), target.min(distinct.len()));
        }
    }
}

//! Recency-weighted candidate selection.
//!
//! Engagement is biased toward fresh content: each candidate post gets
//! weight `1 / (1 + age_hours)`, strictly positive and monotonically
//! decreasing in age, so every post keeps a non-zero chance while new
//! posts dominate. Selection draws from an injected RNG so seeded runs
//! are reproducible.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{Result, SimError};
use crate::store::Post;

/// Pick one post from `candidates`, favoring recent ones.
///
/// Fails with [`SimError::EmptyCandidateSet`] on empty input. If the
/// weight sum degenerates (defensive branch; the formula cannot produce
/// it), selection falls back to a uniform draw.
pub fn select_by_recency<'a>(
    candidates: &'a [Post],
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<&'a Post> {
    if candidates.is_empty() {
        return Err(SimError::EmptyCandidateSet);
    }

    let weights: Vec<f64> = candidates
        .iter()
        .map(|post| 1.0 / (1.0 + post.age_hours(now)))
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        let index = rng.gen_range(0..candidates.len());
        return Ok(&candidates[index]);
    }

    let mut threshold = rng.gen::<f64>() * total;
    for (post, weight) in candidates.iter().zip(&weights) {
        threshold -= weight;
        if threshold <= 0.0 {
            return Ok(post);
        }
    }

    // Float accumulation can leave a sliver past the last weight
    Ok(&candidates[candidates.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AgentId;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn post_aged(hours: i64, now: DateTime<Utc>) -> Post {
        Post::new(
            AgentId::random(),
            format!("post aged {hours}h"),
            now - Duration::hours(hours),
        )
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = select_by_recency(&[], Utc::now(), &mut rng);
        assert!(matches!(result, Err(SimError::EmptyCandidateSet)));
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let now = Utc::now();
        let posts = vec![post_aged(10, now)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let picked = select_by_recency(&posts, now, &mut rng).unwrap();
        assert_eq!(picked.id, posts[0].id);
    }

    #[test]
    fn test_selection_is_member_of_input() {
        let now = Utc::now();
        let posts: Vec<Post> = (0..10).map(|h| post_aged(h, now)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..500 {
            let picked = select_by_recency(&posts, now, &mut rng).unwrap();
            assert!(posts.iter().any(|p| p.id == picked.id));
        }
    }

    #[test]
    fn test_fresh_post_dominates_ancient_ones() {
        let now = Utc::now();
        // One brand-new post among posts aged ~10 years
        let mut posts: Vec<Post> = (0..9).map(|_| post_aged(24 * 365 * 10, now)).collect();
        posts.push(post_aged(0, now));
        let fresh_id = posts[9].id.clone();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draws = 2000;
        let fresh_hits = (0..draws)
            .filter(|_| {
                select_by_recency(&posts, now, &mut rng)
                    .map(|p| p.id == fresh_id)
                    .unwrap_or(false)
            })
            .count();

        // weight(fresh) = 1.0 vs nine candidates near 1/87601 each:
        // the fresh post should win essentially every draw
        assert!(
            fresh_hits as f64 / draws as f64 > 0.98,
            "fresh post selected only {fresh_hits}/{draws} times"
        );
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let now = Utc::now();
        let posts: Vec<Post> = (0..5).map(|h| post_aged(h * 3, now)).collect();

        let mut a = ChaCha8Rng::seed_from_u64(123);
        let mut b = ChaCha8Rng::seed_from_u64(123);

        for _ in 0..50 {
            let pa = select_by_recency(&posts, now, &mut a).unwrap();
            let pb = select_by_recency(&posts, now, &mut b).unwrap();
            assert_eq!(pa.id, pb.id);
        }
    }

    #[test]
    fn test_equal_ages_spread_selections() {
        let now = Utc::now();
        let posts: Vec<Post> = (0..4).map(|_| post_aged(5, now)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let picked = select_by_recency(&posts, now, &mut rng).unwrap();
            seen.insert(picked.id.clone());
        }
        // With equal weights every candidate should appear over 200 draws
        assert_eq!(seen.len(), posts.len());
    }
}

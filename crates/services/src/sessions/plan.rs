use rand::Rng;
use std::collections::{HashSet, VecDeque};

use flagquiz_core::model::Entity;

use crate::error::SessionError;

/// Ordered, duplicate-free queue of prompts for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionPlan {
    queue: VecDeque<Entity>,
}

impl SessionPlan {
    /// Prompts still waiting to be asked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn front(&self) -> Option<&Entity> {
        self.queue.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.queue.iter()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Entity> {
        self.queue.pop_front()
    }
}

/// Draws a fixed-size random sample without repetition from a filtered view.
#[derive(Debug, Clone, Copy)]
pub struct SessionSelector {
    size: usize,
}

impl SessionSelector {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Build a session plan by rejection sampling: draw uniform indices into `pool`
    /// and keep each entity the first time it is drawn.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientPool` if `pool` holds fewer distinct
    /// entities than the session size; sampling would never terminate.
    pub fn select<R: Rng + ?Sized>(
        &self,
        pool: &[Entity],
        rng: &mut R,
    ) -> Result<SessionPlan, SessionError> {
        let distinct = pool.iter().collect::<HashSet<_>>().len();
        if distinct < self.size {
            return Err(SessionError::InsufficientPool {
                available: distinct,
                required: self.size,
            });
        }

        let mut queue = VecDeque::with_capacity(self.size);
        let mut draws = 0_usize;
        while queue.len() < self.size {
            draws += 1;
            let candidate = &pool[rng.random_range(0..pool.len())];
            if !queue.contains(candidate) {
                queue.push_back(candidate.clone());
            }
        }

        log::debug!(
            "selected {} of {} entities in {draws} draws",
            queue.len(),
            pool.len()
        );

        Ok(SessionPlan { queue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagquiz_core::model::{Catalog, Region};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(n: usize) -> Vec<Entity> {
        (0..n)
            .map(|i| Entity::new(format!("Country {i}"), "Region"))
            .collect()
    }

    #[test]
    fn selects_distinct_entities() {
        let pool = pool(40);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let plan = SessionSelector::new(10).select(&pool, &mut rng).unwrap();
            assert_eq!(plan.len(), 10);
            let unique: HashSet<_> = plan.iter().collect();
            assert_eq!(unique.len(), 10);
        }
    }

    #[test]
    fn terminates_when_pool_equals_size() {
        let pool = pool(10);
        let mut rng = StdRng::seed_from_u64(11);
        let plan = SessionSelector::new(10).select(&pool, &mut rng).unwrap();
        let selected: HashSet<_> = plan.iter().collect();
        let expected: HashSet<_> = pool.iter().collect();
        assert_eq!(selected, expected);
    }

    #[test]
    fn two_of_two_yields_both() {
        let catalog = Catalog::from_records([("A", "R1"), ("B", "R1"), ("C", "R2")]).unwrap();
        let view = catalog.filter(&Region::named("R1")).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let plan = SessionSelector::new(2)
            .select(view.as_slice(), &mut rng)
            .unwrap();

        let mut names: Vec<_> = plan.iter().map(Entity::name).collect();
        names.sort_unstable();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn small_pool_is_rejected() {
        let pool = pool(9);
        let mut rng = StdRng::seed_from_u64(1);
        let err = SessionSelector::new(10).select(&pool, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientPool {
                available: 9,
                required: 10
            }
        ));
    }

    #[test]
    fn duplicates_in_pool_do_not_count_toward_size() {
        let mut pool = pool(3);
        pool.push(pool[0].clone());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SessionSelector::new(4).select(&pool, &mut rng).is_err());
    }
}

use rand::Rng;
use rand::seq::SliceRandom;

use flagquiz_core::model::{ChoiceCount, Entity, FilteredView};

use super::plan::SessionPlan;
use crate::error::SessionError;

/// One answer button: the label shown, the entity behind it, and whether it still
/// accepts guesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSlot {
    label: String,
    entity: Entity,
    enabled: bool,
}

impl ChoiceSlot {
    fn new(entity: Entity) -> Self {
        Self {
            label: entity.name().to_owned(),
            entity,
            enabled: true,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Prompt and choices for a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    correct: Entity,
    slots: Vec<ChoiceSlot>,
    correct_slot: usize,
    question_number: usize,
}

impl RoundState {
    #[must_use]
    pub fn correct(&self) -> &Entity {
        &self.correct
    }

    #[must_use]
    pub fn slots(&self) -> &[ChoiceSlot] {
        &self.slots
    }

    #[must_use]
    pub fn correct_slot(&self) -> usize {
        self.correct_slot
    }

    /// 1-based position of this prompt within the session.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.question_number
    }

    /// Guess matching is by label, not by entity.
    #[must_use]
    pub fn is_correct_label(&self, label: &str) -> bool {
        label == self.correct.name()
    }

    pub(crate) fn disable(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.enabled = false;
        }
    }

    pub(crate) fn disable_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
        }
    }
}

/// Entities in `view` that can serve as distractors for `correct`.
fn usable_distractors(view: &[Entity], correct: &Entity) -> usize {
    view.iter()
        .filter(|entity| entity.name() != correct.name())
        .count()
}

/// Check that `view` can fill a round of `choices` slots around `correct`.
///
/// # Errors
///
/// Returns `SessionError::InsufficientPool` if fewer than `choices` entities carry a
/// label different from the correct one.
pub(crate) fn ensure_round_pool(
    view: &[Entity],
    correct: &Entity,
    choices: ChoiceCount,
) -> Result<(), SessionError> {
    let distractors = usable_distractors(view, correct);
    if distractors < choices.get() {
        return Err(SessionError::InsufficientPool {
            available: distractors + 1,
            required: choices.get() + 1,
        });
    }
    Ok(())
}

/// Pop the next prompt and build its choice slots.
///
/// The view is reshuffled until none of its first `choices` entities shares the
/// correct label; those entities fill the slots and one slot, chosen uniformly,
/// is then overwritten with the correct entity.
///
/// # Errors
///
/// Returns `SessionError::EmptySession` if the plan is exhausted and
/// `SessionError::InsufficientPool` if the view is too small for `choices`.
/// Neither the plan nor the view is modified on error.
pub fn build_round<R: Rng + ?Sized>(
    plan: &mut SessionPlan,
    view: &mut FilteredView,
    choices: ChoiceCount,
    question_number: usize,
    rng: &mut R,
) -> Result<RoundState, SessionError> {
    let correct = plan.front().ok_or(SessionError::EmptySession)?;
    ensure_round_pool(view.as_slice(), correct, choices)?;
    let correct = plan.pop_front().ok_or(SessionError::EmptySession)?;

    let n = choices.get();
    let mut shuffles = 0_usize;
    loop {
        shuffles += 1;
        view.as_mut_slice().shuffle(rng);
        if !view.as_slice()[..n]
            .iter()
            .any(|entity| entity.name() == correct.name())
        {
            break;
        }
    }

    let mut slots: Vec<ChoiceSlot> = view.as_slice()[..n]
        .iter()
        .cloned()
        .map(ChoiceSlot::new)
        .collect();
    let correct_slot = rng.random_range(0..n);
    slots[correct_slot] = ChoiceSlot::new(correct.clone());

    log::debug!(
        "round {question_number}: {} in slot {correct_slot} after {shuffles} shuffles",
        correct.asset_id()
    );

    Ok(RoundState {
        correct,
        slots,
        correct_slot,
        question_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::plan::SessionSelector;
    use flagquiz_core::model::{Catalog, Region};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog(n: usize) -> Catalog {
        Catalog::from_records((0..n).map(|i| (format!("Country {i}"), "Region"))).unwrap()
    }

    fn plan_and_view(n: usize, size: usize, rng: &mut StdRng) -> (SessionPlan, FilteredView) {
        let view = catalog(n).filter(&Region::All).unwrap();
        let plan = SessionSelector::new(size).select(view.as_slice(), rng).unwrap();
        (plan, view)
    }

    #[test]
    fn exactly_one_slot_carries_the_correct_label() {
        let mut rng = StdRng::seed_from_u64(5);
        for choices in ChoiceCount::ALL {
            let (mut plan, mut view) = plan_and_view(20, 10, &mut rng);
            while !plan.is_empty() {
                let round = build_round(&mut plan, &mut view, choices, 1, &mut rng).unwrap();
                assert_eq!(round.slots().len(), choices.get());
                let matching = round
                    .slots()
                    .iter()
                    .filter(|slot| round.is_correct_label(slot.label()))
                    .count();
                assert_eq!(matching, 1);
                assert_eq!(
                    round.slots()[round.correct_slot()].entity(),
                    round.correct()
                );
                assert!(round.slots().iter().all(ChoiceSlot::is_enabled));
            }
        }
    }

    #[test]
    fn correct_slot_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(99);
        let view_catalog = catalog(30);
        let mut view = view_catalog.filter(&Region::All).unwrap();
        let mut counts = [0_usize; 4];
        let rounds = 4000;

        for _ in 0..rounds / 10 {
            let mut plan = SessionSelector::new(10)
                .select(view.as_slice(), &mut rng)
                .unwrap();
            while !plan.is_empty() {
                let round =
                    build_round(&mut plan, &mut view, ChoiceCount::Four, 1, &mut rng).unwrap();
                counts[round.correct_slot()] += 1;
            }
        }

        let expected = rounds / 4;
        for count in counts {
            assert!(
                count.abs_diff(expected) < expected / 5,
                "slot counts too skewed: {counts:?}"
            );
        }
    }

    #[test]
    fn view_equal_to_choices_fails_fast() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut plan, mut view) = plan_and_view(4, 4, &mut rng);

        let err = build_round(&mut plan, &mut view, ChoiceCount::Four, 1, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientPool {
                available: 4,
                required: 5
            }
        ));
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn exhausted_plan_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let (_, mut view) = plan_and_view(6, 1, &mut rng);
        let mut plan = SessionPlan::default();
        let err = build_round(&mut plan, &mut view, ChoiceCount::Two, 1, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::EmptySession));
    }

    #[test]
    fn same_named_entities_never_share_the_round() {
        let catalog = Catalog::from_records([
            ("Georgia", "Asia"),
            ("Georgia", "North America"),
            ("Chile", "South America"),
            ("Peru", "South America"),
            ("Laos", "Asia"),
        ])
        .unwrap();
        let mut view = catalog.filter(&Region::All).unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..200 {
            let mut plan = SessionSelector::new(5)
                .select(view.as_slice(), &mut rng)
                .unwrap();
            while plan.front().is_some_and(|e| e.name() != "Georgia") {
                plan.pop_front();
            }
            let round =
                build_round(&mut plan, &mut view, ChoiceCount::Two, 1, &mut rng).unwrap();
            let georgias = round
                .slots()
                .iter()
                .filter(|slot| slot.label() == "Georgia")
                .count();
            assert_eq!(georgias, 1);
        }
    }
}

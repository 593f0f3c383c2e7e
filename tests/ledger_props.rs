//! Property-based tests for the freebie ledger
//!
//! Tests invariants:
//! - No trait ever exceeds its ceiling
//! - No trait ever drops below its base
//! - A capped budget is never overspent
//! - The running spend always matches the records

use proptest::prelude::*;

use vtm_progression::{Category, Character};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Improve(Category, &'static str, u8),
    Remove(Category, &'static str),
}

/// A trait the ledger knows how to rate, with a name it can be stored under
fn arb_trait() -> impl Strategy<Value = (Category, &'static str)> {
    prop_oneof![
        Just((Category::Attribute, "Strength")),
        Just((Category::Attribute, "Wits")),
        Just((Category::Ability, "Brawl")),
        Just((Category::Ability, "Occult")),
        Just((Category::Discipline, "Fortitude")),
        Just((Category::Discipline, "Auspex")),
        Just((Category::Background, "Herd")),
        Just((Category::Virtue, "Courage")),
        Just((Category::Humanity, "Humanity")),
        Just((Category::Willpower, "Willpower")),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_trait(), 0u8..=11).prop_map(|((category, name), target)| Op::Improve(category, name, target)),
        1 => arb_trait().prop_map(|(category, name)| Op::Remove(category, name)),
    ]
}

/// A character with a few starting values already in place
fn arb_character() -> impl Strategy<Value = Character> {
    (0u32..6000, 2u8..=16, any::<bool>(), 1u8..=4, 0u8..=3).prop_map(
        |(age, generation, free_mode, attribute, ability)| {
            let mut character = Character::new("Test", "Gangrel", age, generation, free_mode);
            character.set_initial_trait(Category::Attribute, "Strength", attribute);
            character.set_initial_trait(Category::Attribute, "Wits", attribute);
            character.set_initial_trait(Category::Ability, "Brawl", ability);
            character.set_initial_trait(Category::Virtue, "Courage", attribute);
            character.set_initial_value(Category::Humanity, 5);
            character.set_initial_value(Category::Willpower, attribute);
            character
        },
    )
}

fn apply(character: &mut Character, op: &Op) {
    // Rejections are expected; the invariants are what matter.
    match *op {
        Op::Improve(category, name, target) => {
            let _ = character.improve_trait(category, name, target);
        }
        Op::Remove(category, name) => {
            let _ = character.remove_trait(category, name);
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: current never exceeds the category ceiling and never falls below base
    #[test]
    fn prop_ratings_stay_between_base_and_ceiling(
        mut character in arb_character(),
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        for op in &ops {
            apply(&mut character, op);
            for (category, name) in [
                (Category::Attribute, "Strength"),
                (Category::Attribute, "Wits"),
                (Category::Ability, "Brawl"),
                (Category::Discipline, "Fortitude"),
                (Category::Virtue, "Courage"),
                (Category::Humanity, "Humanity"),
                (Category::Willpower, "Willpower"),
            ] {
                let record = character.trait_data(category, name);
                prop_assert!(record.current >= record.base);
                prop_assert!(record.current <= character.ceiling(category));
            }
        }
    }

    /// Property: a capped budget is never overspent
    #[test]
    fn prop_capped_budget_is_never_exceeded(
        mut character in arb_character(),
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        for op in &ops {
            apply(&mut character, op);
            if let Some(remaining) = character.remaining_freebies() {
                prop_assert!(remaining >= 0);
            }
        }
    }

    /// Property: the running total always equals the spend derived from the records
    #[test]
    fn prop_spend_matches_records(
        mut character in arb_character(),
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        for op in &ops {
            apply(&mut character, op);
            prop_assert_eq!(character.spent_freebies(), character.recomputed_spend());
        }
    }

    /// Property: raising to any legal value and lowering back leaves the spend unchanged
    #[test]
    fn prop_raise_then_lower_is_symmetric(
        mut character in arb_character(),
        (category, name) in arb_trait(),
        target in 0u8..=10,
    ) {
        let base = character.trait_data(category, name).current;
        let spent = character.spent_freebies();
        if character.improve_trait(category, name, target).is_ok() {
            character
                .improve_trait(category, name, base)
                .expect("lowering back to base is always legal");
            prop_assert_eq!(character.spent_freebies(), spent);
        }
    }
}

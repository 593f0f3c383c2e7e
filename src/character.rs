// The freebie-point ledger for a single character.
use derive_more::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::LedgerError;
use crate::rules::{FreebieCosts, RuleTables, SINGLETON_MAX, V20_RULES, ordinal};

/// Trait name -> record. Insertion order is kept for display only.
pub type TraitPool = IndexMap<String, TraitRecord>;

// Every rateable trait belongs to exactly one of these categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    EnumIter,
)]
pub enum Category {
    Attribute,
    Ability,
    Discipline,
    Background,
    Virtue,
    Humanity,
    Willpower,
}

impl Category {
    /// Humanity and Willpower are single records rather than named pools.
    pub fn is_singleton(self) -> bool {
        matches!(self, Category::Humanity | Category::Willpower)
    }

    /// Only disciplines and backgrounds can be added or removed by name.
    pub fn is_extensible(self) -> bool {
        matches!(self, Category::Discipline | Category::Background)
    }

    pub fn section_title(self) -> &'static str {
        match self {
            Category::Attribute => "ATTRIBUTES",
            Category::Ability => "ABILITIES",
            Category::Discipline => "DISCIPLINES",
            Category::Background => "BACKGROUNDS",
            Category::Virtue => "VIRTUES",
            Category::Humanity | Category::Willpower => "PATH/WILLPOWER",
        }
    }

    pub const POOLED: [Category; 5] = [
        Category::Attribute,
        Category::Ability,
        Category::Discipline,
        Category::Background,
        Category::Virtue,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRecord {
    pub base: u8,
    pub current: u8,
}

impl TraitRecord {
    pub fn new(value: u8) -> Self {
        TraitRecord {
            base: value,
            current: value,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.base != self.current
    }

    /// Dots bought above the starting value.
    pub fn bought(&self) -> i32 {
        self.current as i32 - self.base as i32
    }

    /// `[3]` when untouched, `[2->3]` once improved.
    pub fn rating_label(&self) -> String {
        if self.is_modified() {
            format!("[{}->{}]", self.base, self.current)
        } else {
            format!("[{}]", self.current)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Budget {
    #[display("{_0}")]
    Capped(u32),
    #[display("Unlimited")]
    Unlimited,
}

/// A committed `improve_trait` call. `points` is negative for a refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitChange {
    pub category: Category,
    pub name: String,
    pub from: u8,
    pub to: u8,
    pub points: i32,
}

impl fmt::Display for TraitChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.to > self.from {
            write!(
                f,
                "'{}' raised to {}. Cost: {} points",
                self.name,
                self.to,
                self.points.abs()
            )
        } else {
            write!(
                f,
                "'{}' lowered to {}. Refund: {} points",
                self.name,
                self.to,
                self.points.abs()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Removed '{name}'. Refunded {refund} Freebie Points.")]
pub struct TraitRemoval {
    pub category: Category,
    pub name: String,
    pub refund: i32,
}

#[derive(Debug, Clone)]
pub struct Character {
    name: String,
    clan: String,
    age: u32,
    generation: u8,

    max_trait_rating: u8,
    budget: Budget,
    spent_freebies: i32,
    costs: FreebieCosts,

    attributes: TraitPool,
    abilities: TraitPool,
    disciplines: TraitPool,
    backgrounds: TraitPool,
    virtues: TraitPool,
    humanity: TraitRecord,
    willpower: TraitRecord,
}

impl Character {
    /// Builds a character against the built-in V20 tables.
    pub fn new(
        name: impl Into<String>,
        clan: impl Into<String>,
        age: u32,
        generation: u8,
        free_mode: bool,
    ) -> Self {
        Self::with_rules(name, clan, age, generation, free_mode, &V20_RULES)
    }

    pub fn with_rules(
        name: impl Into<String>,
        clan: impl Into<String>,
        age: u32,
        generation: u8,
        free_mode: bool,
        rules: &RuleTables,
    ) -> Self {
        let clan = clan.into();
        let budget = if free_mode {
            Budget::Unlimited
        } else {
            Budget::Capped(rules.freebies_for_age(age))
        };

        // In-clan disciplines start on the sheet at zero dots.
        let disciplines: TraitPool = rules
            .clan_disciplines(&clan)
            .iter()
            .map(|discipline| (discipline.clone(), TraitRecord::default()))
            .collect();

        let character = Character {
            name: name.into(),
            clan,
            age,
            generation,
            max_trait_rating: rules.max_trait_rating(generation),
            budget,
            spent_freebies: 0,
            costs: rules.costs,
            attributes: TraitPool::new(),
            abilities: TraitPool::new(),
            disciplines,
            backgrounds: TraitPool::new(),
            virtues: TraitPool::new(),
            humanity: TraitRecord::default(),
            willpower: TraitRecord::default(),
        };
        log::info!(
            "Created {} ({}), age {}, {} generation: max trait {}, budget {}",
            character.name,
            character.clan,
            character.age,
            ordinal(character.generation),
            character.max_trait_rating,
            character.budget,
        );
        character
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clan(&self) -> &str {
        &self.clan
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    pub fn max_trait_rating(&self) -> u8 {
        self.max_trait_rating
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn is_free_mode(&self) -> bool {
        self.budget == Budget::Unlimited
    }

    pub fn spent_freebies(&self) -> i32 {
        self.spent_freebies
    }

    /// `None` when the budget is unlimited.
    pub fn remaining_freebies(&self) -> Option<i32> {
        match self.budget {
            Budget::Capped(total) => Some(
                i32::try_from(total)
                    .unwrap_or(i32::MAX)
                    .saturating_sub(self.spent_freebies),
            ),
            Budget::Unlimited => None,
        }
    }

    pub fn cost_per_dot(&self, category: Category) -> i32 {
        self.costs.per_dot(category)
    }

    pub fn attributes(&self) -> &TraitPool {
        &self.attributes
    }

    pub fn abilities(&self) -> &TraitPool {
        &self.abilities
    }

    pub fn disciplines(&self) -> &TraitPool {
        &self.disciplines
    }

    pub fn backgrounds(&self) -> &TraitPool {
        &self.backgrounds
    }

    pub fn virtues(&self) -> &TraitPool {
        &self.virtues
    }

    pub fn humanity(&self) -> TraitRecord {
        self.humanity
    }

    pub fn willpower(&self) -> TraitRecord {
        self.willpower
    }

    /// The named pool for a category; `None` for Humanity and Willpower.
    pub fn pool(&self, category: Category) -> Option<&TraitPool> {
        match category {
            Category::Attribute => Some(&self.attributes),
            Category::Ability => Some(&self.abilities),
            Category::Discipline => Some(&self.disciplines),
            Category::Background => Some(&self.backgrounds),
            Category::Virtue => Some(&self.virtues),
            Category::Humanity | Category::Willpower => None,
        }
    }

    fn pool_mut(&mut self, category: Category) -> Option<&mut TraitPool> {
        match category {
            Category::Attribute => Some(&mut self.attributes),
            Category::Ability => Some(&mut self.abilities),
            Category::Discipline => Some(&mut self.disciplines),
            Category::Background => Some(&mut self.backgrounds),
            Category::Virtue => Some(&mut self.virtues),
            Category::Humanity | Category::Willpower => None,
        }
    }

    fn singleton_mut(&mut self, category: Category) -> Option<&mut TraitRecord> {
        match category {
            Category::Humanity => Some(&mut self.humanity),
            Category::Willpower => Some(&mut self.willpower),
            _ => None,
        }
    }

    // Pooled traits are created on first write.
    fn record_mut(&mut self, category: Category, name: &str) -> &mut TraitRecord {
        match category {
            Category::Humanity => &mut self.humanity,
            Category::Willpower => &mut self.willpower,
            Category::Attribute => self.attributes.entry(name.to_string()).or_default(),
            Category::Ability => self.abilities.entry(name.to_string()).or_default(),
            Category::Discipline => self.disciplines.entry(name.to_string()).or_default(),
            Category::Background => self.backgrounds.entry(name.to_string()).or_default(),
            Category::Virtue => self.virtues.entry(name.to_string()).or_default(),
        }
    }

    /// Sets base and current of a named trait during setup. No points change hands.
    pub fn set_initial_trait(&mut self, category: Category, name: &str, value: u8) {
        if category.is_singleton() {
            self.set_initial_value(category, value);
            return;
        }
        *self.record_mut(category, name) = TraitRecord::new(value);
    }

    /// Sets base and current of Humanity or Willpower during setup.
    pub fn set_initial_value(&mut self, category: Category, value: u8) {
        match self.singleton_mut(category) {
            Some(record) => *record = TraitRecord::new(value),
            None => log::warn!("{category} is not a single-value trait, ignoring {value}"),
        }
    }

    /// Read-only lookup. Traits not on the sheet read as zero without being added.
    pub fn trait_data(&self, category: Category, name: &str) -> TraitRecord {
        match category {
            Category::Humanity => self.humanity,
            Category::Willpower => self.willpower,
            _ => self
                .pool(category)
                .and_then(|pool| pool.get(name))
                .copied()
                .unwrap_or_default(),
        }
    }

    pub fn ceiling(&self, category: Category) -> u8 {
        if category.is_singleton() {
            SINGLETON_MAX
        } else {
            self.max_trait_rating
        }
    }

    /// Moves a trait to `target`, charging or refunding freebie points.
    ///
    /// Rejections are checked in a fixed order: unchanged value, below the
    /// starting value, above the ceiling, then (only when raising on a capped
    /// budget) insufficient points. A rejected call changes nothing.
    pub fn improve_trait(
        &mut self,
        category: Category,
        name: &str,
        target: u8,
    ) -> Result<TraitChange, LedgerError> {
        let record = self.trait_data(category, name);

        if target == record.current {
            log::debug!("Rejected {category} '{name}': already {target}");
            return Err(LedgerError::ValueUnchanged {
                name: name.to_string(),
                current: record.current,
            });
        }
        if target < record.base {
            log::debug!("Rejected {category} '{name}': {target} is below {}", record.base);
            return Err(LedgerError::BelowFloor {
                name: name.to_string(),
                base: record.base,
            });
        }
        let ceiling = self.ceiling(category);
        if target > ceiling {
            log::debug!("Rejected {category} '{name}': {target} is above {ceiling}");
            return Err(LedgerError::AboveCeiling {
                name: name.to_string(),
                category,
                ceiling,
            });
        }

        let delta = target as i32 - record.current as i32;
        // Widened so hand-edited cost tables cannot overflow the comparison.
        let wide_cost = i64::from(delta) * i64::from(self.costs.per_dot(category));
        let cost = i32::try_from(wide_cost).unwrap_or(if wide_cost < 0 {
            i32::MIN
        } else {
            i32::MAX
        });

        if delta > 0 {
            if let Some(available) = self.remaining_freebies() {
                if i64::from(available) < wide_cost {
                    log::debug!("Rejected {category} '{name}': costs {wide_cost}, {available} left");
                    return Err(LedgerError::InsufficientPoints { cost, available });
                }
            }
        }

        self.record_mut(category, name).current = target;
        // Unlimited budgets never block but still keep a running total.
        self.spent_freebies = self.spent_freebies.saturating_add(cost);
        log::debug!(
            "{category} '{name}': {} -> {target} ({cost:+} points, {} spent)",
            record.current,
            self.spent_freebies
        );

        Ok(TraitChange {
            category,
            name: name.to_string(),
            from: record.current,
            to: target,
            points: cost,
        })
    }

    /// Adds a discipline or background at zero dots.
    pub fn add_trait(&mut self, category: Category, name: &str) -> Result<(), LedgerError> {
        if !category.is_extensible() {
            return Err(LedgerError::NotExtensible(category));
        }
        let pool = self
            .pool_mut(category)
            .ok_or(LedgerError::NotExtensible(category))?;
        if pool.contains_key(name) {
            return Err(LedgerError::AlreadyPresent(name.to_string()));
        }
        pool.insert(name.to_string(), TraitRecord::default());
        log::info!("Added {category} '{name}'");
        Ok(())
    }

    /// Deletes a discipline or background, refunding only the dots bought above its base.
    pub fn remove_trait(
        &mut self,
        category: Category,
        name: &str,
    ) -> Result<TraitRemoval, LedgerError> {
        if !category.is_extensible() {
            return Err(LedgerError::NotDeletable(category));
        }
        let per_dot = self.costs.per_dot(category);
        let record = self
            .pool_mut(category)
            .ok_or(LedgerError::NotDeletable(category))?
            .shift_remove(name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))?;

        let refund = record.bought().saturating_mul(per_dot);
        self.spent_freebies = self.spent_freebies.saturating_sub(refund);
        log::info!(
            "Removed {category} '{name}', refunded {refund} ({} spent)",
            self.spent_freebies
        );

        Ok(TraitRemoval {
            category,
            name: name.to_string(),
            refund,
        })
    }

    /// Spend derived from the records alone. Always equal to `spent_freebies`.
    pub fn recomputed_spend(&self) -> i32 {
        Category::iter()
            .map(|category| {
                let bought: i32 = match self.pool(category) {
                    Some(pool) => pool.values().map(TraitRecord::bought).sum(),
                    None => self.trait_data(category, "").bought(),
                };
                bought.saturating_mul(self.costs.per_dot(category))
            })
            .sum()
    }

    pub fn freebie_summary(&self) -> String {
        match self.budget {
            Budget::Unlimited => {
                format!("Total Freebie Points Spent: {}", self.spent_freebies)
            }
            Budget::Capped(total) => {
                let remaining = self.remaining_freebies().unwrap_or_default();
                let mut summary =
                    format!("Freebie Points: {}/{} spent", self.spent_freebies, total);
                if remaining > 0 {
                    summary.push_str(&format!(" ({remaining} remaining)"));
                }
                summary
            }
        }
    }

    /// Plain-text character sheet, as written by the export.
    pub fn export_summary(&self) -> String {
        let mut lines = vec![
            format!("{} ({})", self.name, self.clan),
            format!(
                "Age: {} | Generation: {} | Max Trait Rating: {}",
                self.age,
                ordinal(self.generation),
                self.max_trait_rating
            ),
            self.freebie_summary(),
        ];

        for category in Category::POOLED {
            let Some(pool) = self.pool(category).filter(|pool| !pool.is_empty()) else {
                continue;
            };
            lines.push(String::new());
            lines.push(format!("=== {} ===", category.section_title()));
            lines.extend(
                pool.iter()
                    .map(|(name, record)| format!("{name} {}", record.rating_label())),
            );
        }

        lines.push(String::new());
        lines.push(format!("=== {} ===", Category::Humanity.section_title()));
        lines.push(format!("Humanity {}", self.humanity.rating_label()));
        lines.push(format!("Willpower {}", self.willpower.rating_label()));

        let mut summary = lines.join("\n");
        summary.push('\n');
        summary
    }
}

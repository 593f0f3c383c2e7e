// Reference tables for V20 freebie-point progression.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use strum::IntoEnumIterator;

use crate::character::Category;
use crate::error::{AppError, Result};

pub const DEFAULT_MAX_TRAIT: u8 = 5;
/// Humanity/Path and Willpower ignore generation.
pub const SINGLETON_MAX: u8 = 10;
/// Largest per-dot cost a rules file may set.
pub const MAX_COST_PER_DOT: i32 = 1_000;
/// Largest freebie total a rules file may give an age bracket.
pub const MAX_FREEBIES: u32 = 1_000_000;

pub const ATTRIBUTES: [&str; 9] = [
    "Strength",
    "Dexterity",
    "Stamina", // Physical
    "Charisma",
    "Manipulation",
    "Appearance", // Social
    "Perception",
    "Intelligence",
    "Wits", // Mental
];

pub const ABILITIES: [&str; 30] = [
    // Talents
    "Alertness",
    "Athletics",
    "Awareness",
    "Brawl",
    "Empathy",
    "Expression",
    "Intimidation",
    "Leadership",
    "Streetwise",
    "Subterfuge",
    // Skills
    "Animal Ken",
    "Crafts",
    "Drive",
    "Etiquette",
    "Firearms",
    "Larceny",
    "Melee",
    "Performance",
    "Stealth",
    "Survival",
    // Knowledges
    "Academics",
    "Computer",
    "Finance",
    "Investigation",
    "Law",
    "Medicine",
    "Occult",
    "Politics",
    "Science",
    "Technology",
];

pub const VIRTUES: [&str; 3] = ["Conscience", "Self-Control", "Courage"];

pub const BACKGROUNDS: [&str; 11] = [
    "Allies",
    "Arsenal",
    "Contacts",
    "Fame",
    "Generation",
    "Herd",
    "Influence",
    "Mentor",
    "Resources",
    "Retainers",
    "Status",
];

pub const DISCIPLINES: [&str; 33] = [
    "Abombwe",
    "Animalism",
    "Auspex",
    "Bardo",
    "Celerity",
    "Chimerstry",
    "Daimonion",
    "Deimos",
    "Dementation",
    "Dominate",
    "Fortitude",
    "Koldunic Sorcery",
    "Melpominee",
    "Mortis",
    "Mytherceria",
    "Necromancy",
    "Obeah",
    "Obfuscate",
    "Obtenebration",
    "Ogham",
    "Potence",
    "Presence",
    "Protean",
    "Quietus",
    "Sanguinus",
    "Serpentis",
    "Spiritus",
    "Temporis",
    "Thaumaturgy",
    "Thanatosis",
    "Valeren",
    "Vicissitude",
    "Visceratika",
];

const V20_CLANS: [(&str, &[&str]); 34] = [
    ("Assamite", &["Celerity", "Obfuscate", "Quietus"]),
    ("Brujah", &["Celerity", "Potence", "Presence"]),
    ("Followers Of Set", &["Obfuscate", "Presence", "Serpentis"]),
    ("Gangrel", &["Animalism", "Fortitude", "Protean"]),
    ("Giovanni", &["Dominate", "Necromancy", "Potence"]),
    ("Lasombra", &["Dominate", "Obtenebration", "Potence"]),
    ("Malkavian", &["Auspex", "Dementation", "Obfuscate"]),
    ("Nosferatu", &["Animalism", "Obfuscate", "Potence"]),
    ("Ravnos", &["Animalism", "Chimerstry", "Fortitude"]),
    ("Toreador", &["Auspex", "Celerity", "Presence"]),
    ("Tremere", &["Auspex", "Dominate", "Thaumaturgy"]),
    ("Tzimisce", &["Animalism", "Auspex", "Vicissitude"]),
    ("Ventrue", &["Dominate", "Fortitude", "Presence"]),
    ("Cappadocian", &["Auspex", "Fortitude", "Mortis"]),
    ("Ahrimanes", &["Animalism", "Protean", "Spiritus"]),
    ("Akunanse", &["Abombwe", "Animalism", "Fortitude"]),
    ("Baali", &["Daimonion", "Obfuscate", "Presence"]),
    ("Blood Brothers", &["Fortitude", "Potence", "Sanguinus"]),
    ("Children Of Osiris", &["Bardo", "Dominate", "Potence"]),
    ("City Gangrel", &["Celerity", "Obfuscate", "Protean"]),
    ("Daughters Of Cacophony", &["Fortitude", "Melpominee", "Presence"]),
    ("Gargoyles", &["Fortitude", "Potence", "Visceratika"]),
    ("Harbingers Of Skulls", &["Auspex", "Fortitude", "Necromancy"]),
    ("Kiasyd", &["Dominate", "Mytherceria", "Obtenebration"]),
    ("Lamia", &["Fortitude", "Mortis", "Potence"]),
    ("Lhiannan", &["Animalism", "Ogham", "Presence"]),
    ("Maeghar", &["Mytherceria", "Necromancy"]),
    ("Nagaraja", &["Auspex", "Dominate", "Necromancy"]),
    ("Salubri", &["Auspex", "Fortitude", "Valeren"]),
    ("Samedi", &["Fortitude", "Obfuscate", "Thanatosis"]),
    ("True Brujah", &["Fortitude", "Potence", "Temporis"]),
    ("Caitiff", &[]),
    ("Pander", &[]),
    ("Thin Blood", &[]),
];

/// Built-in V20 tables, shared by every character built with [`crate::Character::new`].
pub static V20_RULES: Lazy<RuleTables> = Lazy::new(RuleTables::default);

/// Freebie cost of a single dot, per trait category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreebieCosts {
    pub attribute: i32,
    pub ability: i32,
    pub discipline: i32,
    pub background: i32,
    pub virtue: i32,
    pub humanity: i32,
    pub willpower: i32,
}

impl Default for FreebieCosts {
    fn default() -> Self {
        FreebieCosts {
            attribute: 5,
            ability: 2,
            discipline: 7,
            background: 1,
            virtue: 2,
            humanity: 1,
            willpower: 1,
        }
    }
}

impl FreebieCosts {
    pub fn per_dot(&self, category: Category) -> i32 {
        match category {
            Category::Attribute => self.attribute,
            Category::Ability => self.ability,
            Category::Discipline => self.discipline,
            Category::Background => self.background,
            Category::Virtue => self.virtue,
            Category::Humanity => self.humanity,
            Category::Willpower => self.willpower,
        }
    }
}

/// The read-only tables a character is built against.
///
/// `Default` yields the V20 tables. A JSON file with the same shape can
/// replace them, see [`RuleTables::load_from_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTables {
    /// Generation -> highest rating any standard trait may reach.
    pub generation_ceilings: BTreeMap<u8, u8>,
    #[serde(default = "default_max_trait")]
    pub default_ceiling: u8,
    /// Ordered `(upper age bound, total freebie points)` pairs.
    pub age_brackets: Vec<(u32, u32)>,
    #[serde(default)]
    pub costs: FreebieCosts,
    /// Clan -> in-clan disciplines.
    pub clans: BTreeMap<String, Vec<String>>,
}

fn default_max_trait() -> u8 {
    DEFAULT_MAX_TRAIT
}

impl Default for RuleTables {
    fn default() -> Self {
        let generation_ceilings: BTreeMap<u8, u8> = [
            (2, 10),
            (3, 10),
            (4, 9),
            (5, 8),
            (6, 7),
            (7, 6),
            (8, 5),
            (9, 5),
            (10, 5),
            (11, 5),
            (12, 5),
            (13, 5),
            (14, 5),
            (15, 5),
            (16, 5),
        ]
        .into_iter()
        .collect();

        let age_brackets = vec![
            (50, 45),
            (100, 90),
            (200, 150),
            (350, 225),
            (550, 315),
            (800, 390),
            (1100, 465),
            (1450, 525),
            (1850, 585),
            (2300, 630),
            (2800, 675),
            (3350, 705),
            (3950, 735),
            (5600, 750),
        ];

        let clans: BTreeMap<String, Vec<String>> = V20_CLANS
            .iter()
            .map(|(clan, disciplines)| {
                (
                    clan.to_string(),
                    disciplines.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect();

        RuleTables {
            generation_ceilings,
            default_ceiling: DEFAULT_MAX_TRAIT,
            age_brackets,
            costs: FreebieCosts::default(),
            clans,
        }
    }
}

impl RuleTables {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let tables: RuleTables = serde_json::from_str(&data)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Rejects costs and freebie totals the ledger's `i32` arithmetic cannot hold.
    pub fn validate(&self) -> Result<()> {
        if let Some((age, points)) = self
            .age_brackets
            .iter()
            .find(|(_, points)| *points > MAX_FREEBIES)
        {
            return Err(AppError::InvalidRules(format!(
                "bracket up to age {age} grants {points} points, the limit is {MAX_FREEBIES}"
            )));
        }
        for category in Category::iter() {
            let cost = self.costs.per_dot(category);
            if !(0..=MAX_COST_PER_DOT).contains(&cost) {
                return Err(AppError::InvalidRules(format!(
                    "{category} costs {cost} per dot, expected 0 to {MAX_COST_PER_DOT}"
                )));
            }
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn max_trait_rating(&self, generation: u8) -> u8 {
        self.generation_ceilings
            .get(&generation)
            .copied()
            .unwrap_or(self.default_ceiling)
    }

    /// First bracket whose bound covers `age`; ages past the table get the last bracket.
    pub fn freebies_for_age(&self, age: u32) -> u32 {
        self.age_brackets
            .iter()
            .find(|(upper_age, _)| age <= *upper_age)
            .or(self.age_brackets.last())
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }

    /// In-clan disciplines; the clan name is matched case-insensitively.
    pub fn clan_disciplines(&self, clan: &str) -> &[String] {
        let wanted = clan.trim();
        self.clans
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, disciplines)| disciplines.as_slice())
            .unwrap_or(&[])
    }

    pub fn clan_names(&self) -> Vec<String> {
        self.clans.keys().cloned().collect()
    }
}

/// `2nd`, `3rd`, `8th`, `13th`...
pub fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

// ../tests/tests.rs
use std::fs;

use vtm_progression::export::export_character;
use vtm_progression::*;

fn marcus() -> Character {
    Character::new("Marcus Vitel", "Gangrel", 100, 8, false)
}

#[test]
fn test_construction_applies_rule_tables() {
    let character = marcus();

    assert_eq!(character.budget(), Budget::Capped(90));
    assert_eq!(character.max_trait_rating(), 5);
    assert_eq!(character.spent_freebies(), 0);
    assert_eq!(character.remaining_freebies(), Some(90));

    let disciplines: Vec<&str> = character.disciplines().keys().map(String::as_str).collect();
    assert_eq!(disciplines, ["Animalism", "Fortitude", "Protean"]);
    assert!(
        character
            .disciplines()
            .values()
            .all(|record| *record == TraitRecord::default())
    );
}

#[test]
fn test_gangrel_progression_scenario() {
    let mut character = marcus();

    let change = character
        .improve_trait(Category::Ability, "Firearms", 1)
        .expect("Firearms 0 -> 1 is affordable");
    assert_eq!(change.points, 2);
    assert_eq!(change.to_string(), "'Firearms' raised to 1. Cost: 2 points");
    assert_eq!(character.spent_freebies(), 2);

    assert_eq!(
        character.improve_trait(Category::Ability, "Firearms", 1),
        Err(LedgerError::ValueUnchanged {
            name: "Firearms".into(),
            current: 1
        })
    );
    assert_eq!(character.spent_freebies(), 2);

    let err = character
        .improve_trait(Category::Attribute, "Strength", 6)
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::AboveCeiling {
            name: "Strength".into(),
            category: Category::Attribute,
            ceiling: 5
        }
    );
    assert_eq!(err.to_string(), "Cannot raise 'Strength' above generation limit (5)");
    assert_eq!(character.spent_freebies(), 2);
}

#[test]
fn test_discipline_raise_and_removal_refund() {
    // 4th generation: ceiling 9, so eight dots are legal.
    let mut character = Character::new("Helena", "Gangrel", 100, 4, false);
    character
        .improve_trait(Category::Ability, "Firearms", 1)
        .expect("Firearms 0 -> 1 is affordable");

    let change = character
        .improve_trait(Category::Discipline, "Fortitude", 8)
        .expect("56 of 88 remaining points");
    assert_eq!(change.points, 56);
    assert_eq!(character.spent_freebies(), 58);

    let removal = character
        .remove_trait(Category::Discipline, "Fortitude")
        .expect("Fortitude is on the sheet");
    assert_eq!(removal.refund, 56);
    assert_eq!(
        removal.to_string(),
        "Removed 'Fortitude'. Refunded 56 Freebie Points."
    );
    assert_eq!(character.spent_freebies(), 2);
    assert!(!character.disciplines().contains_key("Fortitude"));
    assert_eq!(
        character.trait_data(Category::Discipline, "Fortitude"),
        TraitRecord::default()
    );
}

#[test]
fn test_removal_refunds_only_bought_dots() {
    let mut character = marcus();
    character.set_initial_trait(Category::Discipline, "Auspex", 1);
    character
        .improve_trait(Category::Discipline, "Auspex", 4)
        .expect("21 points are available");
    assert_eq!(character.spent_freebies(), 21);

    let removal = character
        .remove_trait(Category::Discipline, "Auspex")
        .expect("Auspex is on the sheet");
    assert_eq!(removal.refund, 21);
    assert_eq!(character.spent_freebies(), 0);
}

#[test]
fn test_removal_rejections() {
    let mut character = marcus();
    character.set_initial_trait(Category::Attribute, "Strength", 2);

    assert_eq!(
        character.remove_trait(Category::Attribute, "Strength"),
        Err(LedgerError::NotDeletable(Category::Attribute))
    );
    assert_eq!(
        character.remove_trait(Category::Background, "Herd"),
        Err(LedgerError::NotFound("Herd".into()))
    );
    assert_eq!(
        character.trait_data(Category::Attribute, "Strength"),
        TraitRecord::new(2)
    );
}

#[test]
fn test_floor_and_insufficient_points() {
    let mut character = Character::new("Fledgling", "Brujah", 30, 13, false);
    assert_eq!(character.budget(), Budget::Capped(45));
    character.set_initial_trait(Category::Attribute, "Strength", 3);

    assert_eq!(
        character.improve_trait(Category::Attribute, "Strength", 2),
        Err(LedgerError::BelowFloor {
            name: "Strength".into(),
            base: 3
        })
    );

    character.set_initial_trait(Category::Attribute, "Dexterity", 1);
    character
        .improve_trait(Category::Attribute, "Dexterity", 5)
        .expect("20 of 45 points");
    character
        .improve_trait(Category::Attribute, "Strength", 5)
        .expect("10 of 25 points");
    assert_eq!(character.remaining_freebies(), Some(15));

    let err = character
        .improve_trait(Category::Discipline, "Potence", 3)
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientPoints {
            cost: 21,
            available: 15
        }
    );
    assert_eq!(err.to_string(), "Not enough points! Cost: 21, Available: 15");
    assert_eq!(character.spent_freebies(), 30);
    assert_eq!(
        character.trait_data(Category::Discipline, "Potence"),
        TraitRecord::default()
    );

    // Lowering is always allowed and refunds.
    let change = character
        .improve_trait(Category::Attribute, "Dexterity", 4)
        .expect("refund");
    assert_eq!(change.points, -5);
    assert_eq!(change.to_string(), "'Dexterity' lowered to 4. Refund: 5 points");
    assert_eq!(character.spent_freebies(), 25);
}

#[test]
fn test_free_mode_tracks_spend_without_limit() {
    let mut character = Character::new("Elder", "Ventrue", 3000, 4, true);
    assert!(character.is_free_mode());
    assert_eq!(character.remaining_freebies(), None);

    for name in ["Strength", "Dexterity", "Stamina"] {
        character.set_initial_trait(Category::Attribute, name, 1);
        character
            .improve_trait(Category::Attribute, name, 9)
            .expect("free mode never runs out");
    }
    character
        .improve_trait(Category::Discipline, "Dominate", 9)
        .expect("free mode never runs out");

    assert_eq!(character.spent_freebies(), 3 * 8 * 5 + 9 * 7);
    assert_eq!(
        character.freebie_summary(),
        "Total Freebie Points Spent: 183"
    );
}

#[test]
fn test_singletons_use_fixed_ceiling() {
    let mut character = marcus();
    character.set_initial_value(Category::Humanity, 7);
    character.set_initial_value(Category::Willpower, 4);

    character
        .improve_trait(Category::Humanity, "Humanity", 10)
        .expect("humanity goes to 10 regardless of generation");
    assert_eq!(character.humanity(), TraitRecord { base: 7, current: 10 });
    assert_eq!(
        character.improve_trait(Category::Willpower, "Willpower", 11),
        Err(LedgerError::AboveCeiling {
            name: "Willpower".into(),
            category: Category::Willpower,
            ceiling: 10
        })
    );
    assert_eq!(character.spent_freebies(), 3);
}

#[test]
fn test_unknown_clan_gets_no_disciplines() {
    let character = Character::new("Nobody", "Homebrew Bloodline", 100, 8, false);
    assert!(character.disciplines().is_empty());

    let character = Character::new("Lower Case", "  gangrel ", 100, 8, false);
    assert_eq!(character.disciplines().len(), 3);
}

#[test]
fn test_add_trait() {
    let mut character = marcus();
    character.add_trait(Category::Background, "Herd").expect("new background");
    assert_eq!(
        character.trait_data(Category::Background, "Herd"),
        TraitRecord::default()
    );

    character
        .improve_trait(Category::Discipline, "Protean", 2)
        .expect("14 points");
    assert_eq!(
        character.add_trait(Category::Discipline, "Protean"),
        Err(LedgerError::AlreadyPresent("Protean".into()))
    );
    assert_eq!(
        character.trait_data(Category::Discipline, "Protean"),
        TraitRecord { base: 0, current: 2 }
    );
    assert_eq!(
        character.add_trait(Category::Ability, "Crafts"),
        Err(LedgerError::NotExtensible(Category::Ability))
    );
}

#[test]
fn test_trait_data_does_not_insert() {
    let character = marcus();
    assert_eq!(
        character.trait_data(Category::Background, "Resources"),
        TraitRecord::default()
    );
    assert!(character.backgrounds().is_empty());
}

#[test]
fn test_raise_then_lower_restores_spend() {
    let mut character = marcus();
    character.set_initial_trait(Category::Ability, "Brawl", 1);
    character.improve_trait(Category::Ability, "Brawl", 4).expect("6 points");
    character.improve_trait(Category::Ability, "Brawl", 1).expect("refund");
    assert_eq!(character.spent_freebies(), 0);
    assert!(!character.trait_data(Category::Ability, "Brawl").is_modified());
}

#[test]
fn test_export_summary_format() {
    let mut character = marcus();
    character.set_initial_trait(Category::Attribute, "Strength", 2);
    character.set_initial_trait(Category::Attribute, "Dexterity", 3);
    character.set_initial_value(Category::Humanity, 6);
    character.set_initial_value(Category::Willpower, 5);
    character
        .improve_trait(Category::Attribute, "Strength", 3)
        .expect("5 points");

    let expected = "\
Marcus Vitel (Gangrel)
Age: 100 | Generation: 8th | Max Trait Rating: 5
Freebie Points: 5/90 spent (85 remaining)

=== ATTRIBUTES ===
Strength [2->3]
Dexterity [3]

=== DISCIPLINES ===
Animalism [0]
Fortitude [0]
Protean [0]

=== PATH/WILLPOWER ===
Humanity [6]
Willpower [5]
";
    assert_eq!(character.export_summary(), expected);
}

#[test]
fn test_export_character_writes_txt() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let character = marcus();

    let path = export_character(&character, dir.path(), "").expect("export");
    assert_eq!(path, dir.path().join("marcus_vitel.txt"));
    assert_eq!(
        fs::read_to_string(&path).expect("exported file"),
        character.export_summary()
    );

    let path = export_character(&character, &dir.path().join("sheets"), "coterie.md")
        .expect("export into a new directory");
    assert_eq!(path, dir.path().join("sheets").join("coterie.md.txt"));
    assert!(path.exists());
}

#[test]
fn test_export_keeps_dotted_names_whole() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let character = marcus();

    let path = export_character(&character, dir.path(), "Dr. Smith sheet").expect("export");
    assert_eq!(path, dir.path().join("Dr. Smith sheet.txt"));
    assert!(path.exists());
    assert!(!dir.path().join("Dr.txt").exists());
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("settings.json");

    let settings = Settings {
        export_dir: dir.path().join("exports"),
        free_mode_default: true,
        debug_mode: true,
        rules_path: Some(dir.path().join("rules.json")),
    };
    settings.save_to_file(&path).expect("save settings");
    let loaded = Settings::load_settings_from_file(&path).expect("load settings");
    assert_eq!(loaded, settings);

    // Missing fields fall back to their defaults.
    fs::write(&path, r#"{ "debug_mode": true }"#).expect("write partial settings");
    let partial = Settings::load_settings_from_file(&path).expect("load partial settings");
    assert!(partial.debug_mode);
    assert_eq!(partial.export_dir, Settings::default().export_dir);
    assert_eq!(partial.rules_path, None);
}

#[test]
fn test_first_run_creates_settings_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("settings.json");

    let settings = Settings::load_or_create(&path).expect("defaults on first run");
    assert_eq!(settings, Settings::default());
    assert_eq!(
        Settings::load_settings_from_file(&path).expect("file written"),
        Settings::default()
    );
}

#[test]
fn test_malformed_settings_are_left_untouched() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    let typo = r#"{"export_dir": "/home/me/sheets", "debug_mode": true, }"#;
    fs::write(&path, typo).expect("write settings");

    let result = Settings::load_or_create(&path);
    assert!(matches!(result, Err(AppError::Serialization(_))));
    assert_eq!(fs::read_to_string(&path).expect("settings file"), typo);
}

#[test]
fn test_custom_rule_tables() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("rules.json");

    let mut rules = RuleTables::default();
    rules.generation_ceilings.insert(8, 6);
    rules.costs.ability = 3;
    rules
        .clans
        .insert("Salubri".into(), vec!["Auspex".into(), "Fortitude".into(), "Obeah".into()]);
    rules.save_to_file(&path).expect("save rules");

    let loaded = RuleTables::load_from_file(&path).expect("load rules");
    assert_eq!(loaded, rules);

    let settings = Settings {
        rules_path: Some(path),
        ..Settings::default()
    };
    let rules = settings.rules();
    let mut character = Character::with_rules("Saulot's Get", "Salubri", 100, 8, false, &rules);
    assert_eq!(character.max_trait_rating(), 6);
    assert_eq!(character.disciplines().len(), 3);
    let change = character
        .improve_trait(Category::Ability, "Medicine", 2)
        .expect("6 points");
    assert_eq!(change.points, 6);
}

#[test]
fn test_oversized_rules_file_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("rules.json");

    let mut rules = RuleTables::default();
    rules.costs.discipline = i32::MAX;
    rules.save_to_file(&path).expect("save rules");
    assert!(matches!(
        RuleTables::load_from_file(&path),
        Err(AppError::InvalidRules(_))
    ));

    let settings = Settings {
        rules_path: Some(path),
        ..Settings::default()
    };
    assert_eq!(settings.rules(), *V20_RULES);
}

#[test]
fn test_huge_budget_does_not_wrap() {
    let mut rules = RuleTables::default();
    rules.age_brackets = vec![(u32::MAX, u32::MAX)];
    rules.costs.discipline = i32::MAX;
    let mut character = Character::with_rules("Antediluvian", "Gangrel", 10_000, 3, false, &rules);

    assert_eq!(character.remaining_freebies(), Some(i32::MAX));
    let err = character
        .improve_trait(Category::Discipline, "Protean", 10)
        .expect_err("ten dots cost more than the budget holds");
    assert!(matches!(err, LedgerError::InsufficientPoints { .. }));
    assert_eq!(character.spent_freebies(), 0);

    character
        .improve_trait(Category::Discipline, "Protean", 1)
        .expect("one dot fits");
    assert_eq!(character.remaining_freebies(), Some(0));
}

#[test]
fn test_unreadable_rules_fall_back_to_v20() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let settings = Settings {
        rules_path: Some(dir.path().join("missing.json")),
        ..Settings::default()
    };
    assert_eq!(settings.rules(), *V20_RULES);
}

#[test]
fn test_logger_installs_once() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let log_dir = dir.path().join("data");

    vtm_progression::logging::init(log_dir.clone(), true).expect("first init succeeds");
    log::info!("logger installed");
    let contents = fs::read_to_string(log_dir.join("log.txt")).expect("log file written");
    assert!(contents.contains("INFO - logger installed"));

    assert!(matches!(
        vtm_progression::logging::init(log_dir, true),
        Err(AppError::LoggerAlreadySet)
    ));
}

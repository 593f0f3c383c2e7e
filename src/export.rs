use std::fs;
use std::path::{Path, PathBuf};

use crate::character::Character;
use crate::error::Result;

/// `Marcus Vitel` -> `marcus_vitel.txt`
pub fn default_export_filename(character_name: &str) -> String {
    let stem = character_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    if stem.is_empty() {
        "character.txt".to_string()
    } else {
        format!("{stem}.txt")
    }
}

/// Exports are always plain text. Dots in the typed name are kept, `.txt` is appended unless present.
pub fn with_txt_extension(filename: &str) -> PathBuf {
    let name = filename.trim();
    if name.to_ascii_lowercase().ends_with(".txt") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.txt"))
    }
}

pub fn export_character(character: &Character, export_dir: &Path, filename: &str) -> Result<PathBuf> {
    let filename = if filename.trim().is_empty() {
        default_export_filename(character.name())
    } else {
        filename.to_string()
    };
    fs::create_dir_all(export_dir)?;
    let path = export_dir.join(with_txt_extension(&filename));
    fs::write(&path, character.export_summary())?;
    log::info!("Exported {} to {}", character.name(), path.display());
    Ok(path)
}

//! Character Export Unit Tests

use std::fs;

use tempfile::TempDir;

use crate::core::character_gen::{
    export, export_filename, read_json, render_markdown, render_sheet, ExportError, ExportFormat,
};
use crate::tests::common::{create_template_forge, create_test_character, fixed_timestamp, seeded_rng};

#[test]
fn test_filename_replaces_spaces() {
    let mut character = create_test_character();
    character.name = "Morgan of the Shadows".to_string();

    assert_eq!(
        export_filename(&character, ExportFormat::Text),
        "character_Morgan_of_the_Shadows.txt"
    );
    assert_eq!(
        export_filename(&character, ExportFormat::Json),
        "character_Morgan_of_the_Shadows.json"
    );
}

#[test]
fn test_markdown_sections() {
    let character = create_test_character();
    let text = render_markdown(&character);

    assert!(text.starts_with("# Character: Liria Swiftriver\n"));
    assert!(text.contains("**Race/Class:** Elf - Ranger (Level 3)"));
    assert!(text.contains("## Abilities\n- Strength: 15\n- Dexterity: 12\n"));
    assert!(text.contains("- Charisma: 8\n"));
    assert!(text.contains("## Biography\nYou grew up in a noisy harbor town."));
    assert!(text.contains("**Motivation:** Revenge"));
    assert!(text.contains("**Traits:** Brave, Curious, Weakness: Greedy"));
    assert!(text.contains("**Item:** A treasure map"));
}

#[test]
fn test_sheet_shows_modifiers_and_source() {
    let character = create_test_character();
    let sheet = render_sheet(&character);

    assert!(sheet.contains("Name: Liria Swiftriver"));
    assert!(sheet.contains("Race: Elf | Class: Ranger | Level 3"));
    assert!(sheet.contains("15 (+2)"));
    assert!(sheet.contains(" 8 (-1)"));
    assert!(sheet.contains("Created: 2024-03-15 18:30:05 | Source: template"));
}

#[test]
fn test_export_text_writes_one_file() {
    let dir = TempDir::new().unwrap();
    let character = create_test_character();

    let path = export(&character, ExportFormat::Text, dir.path()).unwrap();

    assert_eq!(path, dir.path().join("character_Liria_Swiftriver.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), render_markdown(&character));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_json_roundtrip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let character = create_template_forge().forge_at(&mut seeded_rng(77), fixed_timestamp());

    let path = export(&character, ExportFormat::Json, dir.path()).unwrap();
    let restored = read_json(&path).unwrap();

    assert_eq!(restored, character);
    let keys: Vec<_> = restored.stats.keys().collect();
    let original_keys: Vec<_> = character.stats.keys().collect();
    assert_eq!(keys, original_keys);
}

#[test]
fn test_json_is_field_for_field() {
    let dir = TempDir::new().unwrap();
    let character = create_test_character();

    let path = export(&character, ExportFormat::Json, dir.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(value["name"], "Liria Swiftriver");
    assert_eq!(value["class"], "Ranger");
    assert_eq!(value["level"], 3);
    assert_eq!(value["stats"]["Strength"], 15);
    assert_eq!(value["traits"][2], "Weakness: Greedy");
    assert_eq!(value["source"], "template");
    assert_eq!(value["created"], "2024-03-15 18:30:05");
}

#[test]
fn test_export_into_missing_directory_reports_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does").join("not").join("exist");

    let err = export(&create_test_character(), ExportFormat::Text, &missing).unwrap_err();

    assert!(matches!(err, ExportError::Io { .. }));
    assert!(err.path().starts_with(&missing));
}

#[test]
fn test_read_json_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("character_bad.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(read_json(&path), Err(ExportError::Json { .. })));
}

//! The character record schema and form-value coercion.
//!
//! A character record is the sole persisted entity. Its identity is an
//! opaque key assigned by the store on creation; every other attribute is
//! optional apart from the name. Coercion from raw form values happens here,
//! at the UI boundary, so the persisted record only ever contains numbers
//! where numbers are declared and never contains blank list entries.

use serde::{Deserialize, Serialize};

/// Placeholder shown wherever a value is absent or blank.
pub const VALUE_PLACEHOLDER: &str = "N/A";

/// A tabletop character record.
///
/// Numeric stats are `Option` so that a record written by an older client
/// with fewer fields reads back faithfully; absent values display as 0 or a
/// placeholder at the view boundary, they are not materialized on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub race: Option<String>,
    pub profession: Option<String>,
    pub battle_level: Option<i32>,
    pub movement: Option<i32>,
    pub weapon_skill: Option<i32>,
    pub ballistics_skill: Option<i32>,
    pub strength: Option<i32>,
    pub toughness: Option<i32>,
    pub initiative: Option<i32>,
    pub willpower: Option<i32>,
    pub attacks: Option<i32>,
    pub pinning: Option<i32>,
    pub luck: Option<i32>,
    pub starting_wounds: Option<i32>,
    pub current_wounds: Option<i32>,
    pub gold: Option<i32>,
    pub gold_to_next_level: Option<i32>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Raw values submitted by the character editor form.
///
/// Every field arrives as text; [`CharacterForm::into_character`] applies
/// the declared coercion rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterForm {
    pub name: Option<String>,
    pub race: Option<String>,
    pub profession: Option<String>,
    pub battle_level: Option<String>,
    pub movement: Option<String>,
    pub weapon_skill: Option<String>,
    pub ballistics_skill: Option<String>,
    pub strength: Option<String>,
    pub toughness: Option<String>,
    pub initiative: Option<String>,
    pub willpower: Option<String>,
    pub attacks: Option<String>,
    pub pinning: Option<String>,
    pub luck: Option<String>,
    pub starting_wounds: Option<String>,
    pub current_wounds: Option<String>,
    pub gold: Option<String>,
    pub gold_to_next_level: Option<String>,
    pub items: Option<String>,
    pub skills: Option<String>,
}

impl CharacterForm {
    /// Build a record from the submitted values.
    ///
    /// Declared numeric fields are parsed as numbers with invalid input
    /// coercing to 0; declared list fields are split on line breaks with
    /// blank entries discarded; everything else is taken as trimmed text.
    #[must_use]
    pub fn into_character(self) -> Character {
        Character {
            name: trimmed(self.name),
            race: self.race.map(|s| s.trim().to_owned()),
            profession: self.profession.map(|s| s.trim().to_owned()),
            battle_level: self.battle_level.as_deref().map(coerce_stat),
            movement: self.movement.as_deref().map(coerce_stat),
            weapon_skill: self.weapon_skill.as_deref().map(coerce_stat),
            ballistics_skill: self.ballistics_skill.as_deref().map(coerce_stat),
            strength: self.strength.as_deref().map(coerce_stat),
            toughness: self.toughness.as_deref().map(coerce_stat),
            initiative: self.initiative.as_deref().map(coerce_stat),
            willpower: self.willpower.as_deref().map(coerce_stat),
            attacks: self.attacks.as_deref().map(coerce_stat),
            pinning: self.pinning.as_deref().map(coerce_stat),
            luck: self.luck.as_deref().map(coerce_stat),
            starting_wounds: self.starting_wounds.as_deref().map(coerce_stat),
            current_wounds: self.current_wounds.as_deref().map(coerce_stat),
            gold: self.gold.as_deref().map(coerce_stat),
            gold_to_next_level: self.gold_to_next_level.as_deref().map(coerce_stat),
            items: self.items.as_deref().map(split_entries).unwrap_or_default(),
            skills: self.skills.as_deref().map(split_entries).unwrap_or_default(),
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|s| s.trim().to_owned()).unwrap_or_default()
}

/// Coerce a numeric form value.
///
/// Trims the input and parses it as an integer; anything unparsable,
/// including the empty string, coerces to exactly 0.
#[must_use]
pub fn coerce_stat(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

/// Split a newline-separated form value into list entries.
///
/// Entries are trimmed and blank lines are discarded, so the result never
/// contains an empty string. Order is preserved.
#[must_use]
pub fn split_entries(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Format the wounds ratio for display.
///
/// Shows `current/starting` when both are present, whichever one is present
/// otherwise, and the placeholder when both are absent - never an empty
/// string.
#[must_use]
pub fn wounds_display(current: Option<i32>, starting: Option<i32>) -> String {
    match (current, starting) {
        (Some(current), Some(starting)) => format!("{current}/{starting}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => VALUE_PLACEHOLDER.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_stat_parses_valid_numbers() {
        assert_eq!(coerce_stat("7"), 7);
        assert_eq!(coerce_stat("  42  "), 42);
        assert_eq!(coerce_stat("-3"), -3);
    }

    #[test]
    fn test_coerce_stat_invalid_input_is_exactly_zero() {
        assert_eq!(coerce_stat(""), 0);
        assert_eq!(coerce_stat("abc"), 0);
        assert_eq!(coerce_stat("3.5"), 0);
        assert_eq!(coerce_stat("1e3"), 0);
    }

    #[test]
    fn test_split_entries_trims_and_drops_blanks() {
        let entries = split_entries("  Sword  \n\n Shield\r\n   \nLantern");
        assert_eq!(entries, vec!["Sword", "Shield", "Lantern"]);
        assert!(entries.iter().all(|e| !e.is_empty()));
    }

    #[test]
    fn test_split_entries_empty_input() {
        assert!(split_entries("").is_empty());
        assert!(split_entries("\n\n  \n").is_empty());
    }

    #[test]
    fn test_wounds_display_both_present() {
        assert_eq!(wounds_display(Some(4), Some(9)), "4/9");
    }

    #[test]
    fn test_wounds_display_one_present() {
        assert_eq!(wounds_display(Some(4), None), "4");
        assert_eq!(wounds_display(None, Some(9)), "9");
    }

    #[test]
    fn test_wounds_display_both_absent_is_placeholder() {
        let display = wounds_display(None, None);
        assert_eq!(display, VALUE_PLACEHOLDER);
        assert!(!display.is_empty());
    }

    #[test]
    fn test_form_coerces_numeric_fields() {
        let form = CharacterForm {
            name: Some("  Grimnir  ".to_owned()),
            battle_level: Some("3".to_owned()),
            gold: Some("not a number".to_owned()),
            ..CharacterForm::default()
        };

        let character = form.into_character();
        assert_eq!(character.name, "Grimnir");
        assert_eq!(character.battle_level, Some(3));
        assert_eq!(character.gold, Some(0));
        assert_eq!(character.movement, None);
    }

    #[test]
    fn test_form_splits_list_fields() {
        let form = CharacterForm {
            name: Some("Elf Ranger".to_owned()),
            items: Some("Bow\n \nRope".to_owned()),
            skills: Some(String::new()),
            ..CharacterForm::default()
        };

        let character = form.into_character();
        assert_eq!(character.items, vec!["Bow", "Rope"]);
        assert!(character.skills.is_empty());
    }

    #[test]
    fn test_record_serde_defaults_lists_to_empty() {
        let character: Character = serde_json::from_str(r#"{"name":"Barbarian"}"#).unwrap();
        assert!(character.items.is_empty());
        assert!(character.skills.is_empty());
        assert_eq!(character.starting_wounds, None);
    }
}

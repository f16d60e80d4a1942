//! Character list view.
//!
//! Every display fallback is resolved here, so a card never renders an
//! empty slot: missing text shows a placeholder and missing gold shows 0.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use questvault_core::{VALUE_PLACEHOLDER, wounds_display};

use crate::db::CharacterRepository;
use crate::db::characters::StoredCharacter;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::HeaderView;
use crate::state::AppState;

/// One card on the character list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCard {
    /// Record ID, used to build edit/delete URLs.
    pub id: String,
    /// Character name, or a placeholder when blank.
    pub name: String,
    /// Profession, or a placeholder when blank.
    pub profession: String,
    /// Race, or a placeholder when blank.
    pub race: String,
    /// Battle level as display text.
    pub battle_level: String,
    /// Gold as display text; absent gold shows as 0.
    pub gold: String,
    /// Wounds ratio as display text.
    pub wounds: String,
}

impl From<&StoredCharacter> for CharacterCard {
    fn from(stored: &StoredCharacter) -> Self {
        let character = &stored.character;

        Self {
            id: stored.id.to_string(),
            name: text_or(&character.name, "Unnamed Character"),
            profession: character
                .profession
                .as_deref()
                .map_or_else(|| "Profession unknown".to_owned(), |p| {
                    text_or(p, "Profession unknown")
                }),
            race: character
                .race
                .as_deref()
                .map_or_else(|| "Unknown".to_owned(), |r| text_or(r, "Unknown")),
            battle_level: character
                .battle_level
                .map_or_else(|| VALUE_PLACEHOLDER.to_owned(), |level| level.to_string()),
            gold: character
                .gold
                .map_or_else(|| "0".to_owned(), |gold| gold.to_string()),
            wounds: wounds_display(character.current_wounds, character.starting_wounds),
        }
    }
}

/// Replace blank text with a fallback.
fn text_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        value.to_owned()
    }
}

/// Character list page template.
#[derive(Template, WebTemplate)]
#[template(path = "characters/index.html")]
pub struct IndexTemplate {
    pub header: HeaderView,
    pub cards: Vec<CharacterCard>,
    /// Store failure message, rendered as a full-width panel.
    pub error: Option<String>,
}

/// Display the character list.
///
/// A store failure renders the error panel in place of the cards; there
/// is no automatic retry.
///
/// # Route
///
/// `GET /`
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> IndexTemplate {
    let header = HeaderView::from_session(Some(&user));

    match CharacterRepository::new(state.pool()).list().await {
        Ok(stored) => IndexTemplate {
            header,
            cards: stored.iter().map(CharacterCard::from).collect(),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to load character list: {}", e);
            IndexTemplate {
                header,
                cards: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use questvault_core::{Character, CharacterId};

    fn stored(character: Character) -> StoredCharacter {
        StoredCharacter {
            id: CharacterId::new(uuid::Uuid::new_v4()),
            character,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_card_applies_fallbacks_to_empty_record() {
        let card = CharacterCard::from(&stored(Character::default()));

        assert_eq!(card.name, "Unnamed Character");
        assert_eq!(card.profession, "Profession unknown");
        assert_eq!(card.race, "Unknown");
        assert_eq!(card.battle_level, "N/A");
        assert_eq!(card.gold, "0");
        assert_eq!(card.wounds, "N/A");
    }

    #[test]
    fn test_card_treats_blank_text_as_missing() {
        let card = CharacterCard::from(&stored(Character {
            name: "   ".to_owned(),
            race: Some(String::new()),
            profession: Some("  ".to_owned()),
            ..Character::default()
        }));

        assert_eq!(card.name, "Unnamed Character");
        assert_eq!(card.race, "Unknown");
        assert_eq!(card.profession, "Profession unknown");
    }

    #[test]
    fn test_card_shows_present_values() {
        let card = CharacterCard::from(&stored(Character {
            name: "Grimnir".to_owned(),
            race: Some("Dwarf".to_owned()),
            profession: Some("Trollslayer".to_owned()),
            battle_level: Some(3),
            gold: Some(120),
            current_wounds: Some(4),
            starting_wounds: Some(9),
            ..Character::default()
        }));

        assert_eq!(card.name, "Grimnir");
        assert_eq!(card.race, "Dwarf");
        assert_eq!(card.profession, "Trollslayer");
        assert_eq!(card.battle_level, "3");
        assert_eq!(card.gold, "120");
        assert_eq!(card.wounds, "4/9");
    }

    #[test]
    fn test_index_template_renders_empty_state() {
        let template = IndexTemplate {
            header: HeaderView::from_session(None),
            cards: Vec::new(),
            error: None,
        };

        let html = template.render().unwrap();
        assert!(html.contains("No characters found yet. Start by creating a new hero!"));
    }

    #[test]
    fn test_index_template_error_panel_suppresses_empty_state() {
        let template = IndexTemplate {
            header: HeaderView::from_session(None),
            cards: Vec::new(),
            error: Some("connection refused".to_owned()),
        };

        let html = template.render().unwrap();
        assert!(html.contains("connection refused"));
        assert!(!html.contains("No characters found yet"));
    }

    #[test]
    fn test_index_template_cards_without_empty_state() {
        let template = IndexTemplate {
            header: HeaderView::from_session(None),
            cards: vec![CharacterCard::from(&stored(Character {
                name: "Grimnir".to_owned(),
                ..Character::default()
            }))],
            error: None,
        };

        let html = template.render().unwrap();
        assert!(html.contains("Grimnir"));
        assert!(!html.contains("No characters found yet"));
    }

    #[test]
    fn test_card_wounds_single_value() {
        let card = CharacterCard::from(&stored(Character {
            name: "Elf".to_owned(),
            starting_wounds: Some(7),
            ..Character::default()
        }));

        assert_eq!(card.wounds, "7");
    }
}

//! Character editor view and form handlers.
//!
//! One template serves both creation and editing. Form values are
//! prefilled as text: numeric stats print as-is or blank, list fields
//! join their entries with line breaks for the textarea.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use questvault_core::{CharacterForm, CharacterId};

use crate::db::CharacterRepository;
use crate::db::characters::StoredCharacter;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::HeaderView;
use crate::state::AppState;

use super::list::{CharacterCard, IndexTemplate};

/// Prefilled form values for the editor.
///
/// Everything is text because that's what the form submits back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub race: String,
    pub profession: String,
    pub battle_level: String,
    pub movement: String,
    pub weapon_skill: String,
    pub ballistics_skill: String,
    pub strength: String,
    pub toughness: String,
    pub initiative: String,
    pub willpower: String,
    pub attacks: String,
    pub pinning: String,
    pub luck: String,
    pub starting_wounds: String,
    pub current_wounds: String,
    pub gold: String,
    pub gold_to_next_level: String,
    pub items: String,
    pub skills: String,
}

impl From<&StoredCharacter> for FormValues {
    fn from(stored: &StoredCharacter) -> Self {
        let character = &stored.character;

        Self {
            name: character.name.clone(),
            race: character.race.clone().unwrap_or_default(),
            profession: character.profession.clone().unwrap_or_default(),
            battle_level: stat_text(character.battle_level),
            movement: stat_text(character.movement),
            weapon_skill: stat_text(character.weapon_skill),
            ballistics_skill: stat_text(character.ballistics_skill),
            strength: stat_text(character.strength),
            toughness: stat_text(character.toughness),
            initiative: stat_text(character.initiative),
            willpower: stat_text(character.willpower),
            attacks: stat_text(character.attacks),
            pinning: stat_text(character.pinning),
            luck: stat_text(character.luck),
            starting_wounds: stat_text(character.starting_wounds),
            current_wounds: stat_text(character.current_wounds),
            gold: stat_text(character.gold),
            gold_to_next_level: stat_text(character.gold_to_next_level),
            items: character.items.join("\n"),
            skills: character.skills.join("\n"),
        }
    }
}

impl From<&CharacterForm> for FormValues {
    fn from(form: &CharacterForm) -> Self {
        Self {
            name: form.name.clone().unwrap_or_default(),
            race: form.race.clone().unwrap_or_default(),
            profession: form.profession.clone().unwrap_or_default(),
            battle_level: form.battle_level.clone().unwrap_or_default(),
            movement: form.movement.clone().unwrap_or_default(),
            weapon_skill: form.weapon_skill.clone().unwrap_or_default(),
            ballistics_skill: form.ballistics_skill.clone().unwrap_or_default(),
            strength: form.strength.clone().unwrap_or_default(),
            toughness: form.toughness.clone().unwrap_or_default(),
            initiative: form.initiative.clone().unwrap_or_default(),
            willpower: form.willpower.clone().unwrap_or_default(),
            attacks: form.attacks.clone().unwrap_or_default(),
            pinning: form.pinning.clone().unwrap_or_default(),
            luck: form.luck.clone().unwrap_or_default(),
            starting_wounds: form.starting_wounds.clone().unwrap_or_default(),
            current_wounds: form.current_wounds.clone().unwrap_or_default(),
            gold: form.gold.clone().unwrap_or_default(),
            gold_to_next_level: form.gold_to_next_level.clone().unwrap_or_default(),
            items: form.items.clone().unwrap_or_default(),
            skills: form.skills.clone().unwrap_or_default(),
        }
    }
}

/// Print a stat for an input field: its value, or blank when absent.
fn stat_text(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Character editor page template.
#[derive(Template, WebTemplate)]
#[template(path = "characters/edit.html")]
pub struct EditTemplate {
    pub header: HeaderView,
    /// Page heading: "Create Character" or "Edit Character".
    pub title: &'static str,
    /// Where the form posts to.
    pub action: String,
    /// Delete endpoint, present only when editing an existing record.
    pub delete_action: Option<String>,
    pub values: FormValues,
    /// Store failure message, rendered as a banner above the form.
    pub error: Option<String>,
}

/// Display the editor for a new character.
///
/// # Route
///
/// `GET /characters/new`
pub async fn new_page(RequireUser(user): RequireUser) -> EditTemplate {
    EditTemplate {
        header: HeaderView::from_session(Some(&user)),
        title: "Create Character",
        action: "/characters".to_owned(),
        delete_action: None,
        values: FormValues::default(),
        error: None,
    }
}

/// Display the editor for an existing character.
///
/// A key that resolves to no record logs a warning and leaves the form
/// blank; a save then inserts a fresh record. A store failure renders
/// the blank form with an error banner.
///
/// # Route
///
/// `GET /characters/{id}/edit`
pub async fn edit_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CharacterId>,
) -> EditTemplate {
    let header = HeaderView::from_session(Some(&user));

    match CharacterRepository::new(state.pool()).get(id).await {
        Ok(Some(stored)) => EditTemplate {
            header,
            title: "Edit Character",
            action: format!("/characters/{id}"),
            delete_action: Some(format!("/characters/{id}/delete")),
            values: FormValues::from(&stored),
            error: None,
        },
        Ok(None) => {
            tracing::warn!(character_id = %id, "Character not found, editor left blank");
            EditTemplate {
                header,
                title: "Edit Character",
                action: "/characters".to_owned(),
                delete_action: None,
                values: FormValues::default(),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(character_id = %id, "Failed to load character: {}", e);
            EditTemplate {
                header,
                title: "Edit Character",
                action: "/characters".to_owned(),
                delete_action: None,
                values: FormValues::default(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Create a new character from submitted form values.
///
/// The store assigns the record ID. On failure the form re-renders with
/// every submitted value preserved so nothing is silently lost.
///
/// # Route
///
/// `POST /characters`
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<CharacterForm>,
) -> Response {
    let values = FormValues::from(&form);
    let character = form.into_character();

    match CharacterRepository::new(state.pool())
        .create(&character)
        .await
    {
        Ok(stored) => {
            tracing::info!(character_id = %stored.id, "Character created");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create character: {}", e);
            EditTemplate {
                header: HeaderView::from_session(Some(&user)),
                title: "Create Character",
                action: "/characters".to_owned(),
                delete_action: None,
                values,
                error: Some(e.to_string()),
            }
            .into_response()
        }
    }
}

/// Update an existing character from submitted form values.
///
/// On failure the form re-renders with every submitted value preserved.
///
/// # Route
///
/// `POST /characters/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CharacterId>,
    Form(form): Form<CharacterForm>,
) -> Response {
    let values = FormValues::from(&form);
    let character = form.into_character();

    match CharacterRepository::new(state.pool())
        .update(id, &character)
        .await
    {
        Ok(_) => {
            tracing::info!(character_id = %id, "Character updated");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!(character_id = %id, "Failed to update character: {}", e);
            EditTemplate {
                header: HeaderView::from_session(Some(&user)),
                title: "Edit Character",
                action: format!("/characters/{id}"),
                delete_action: Some(format!("/characters/{id}/delete")),
                values,
                error: Some(e.to_string()),
            }
            .into_response()
        }
    }
}

/// Delete a character.
///
/// Deleting a record that is already gone still redirects to the list;
/// the outcome the visitor asked for holds either way. A failed delete
/// re-renders the list with the failure message and the card still in
/// place.
///
/// # Route
///
/// `POST /characters/{id}/delete`
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CharacterId>,
) -> Response {
    let repo = CharacterRepository::new(state.pool());

    match repo.delete(id).await {
        Ok(deleted) => {
            if deleted {
                tracing::info!(character_id = %id, "Character deleted");
            } else {
                tracing::debug!(character_id = %id, "Delete of missing character ignored");
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!(character_id = %id, "Failed to delete character: {}", e);
            // Best-effort refetch; the failed delete means the card is still there
            let cards = match repo.list().await {
                Ok(stored) => stored.iter().map(CharacterCard::from).collect(),
                Err(refetch) => {
                    tracing::error!("Failed to reload list after delete failure: {}", refetch);
                    Vec::new()
                }
            };
            IndexTemplate {
                header: HeaderView::from_session(Some(&user)),
                cards,
                error: Some(e.to_string()),
            }
            .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use questvault_core::Character;

    #[test]
    fn test_form_values_prefill() {
        let stored = StoredCharacter {
            id: CharacterId::new(uuid::Uuid::new_v4()),
            character: Character {
                name: "Grimnir".to_owned(),
                race: Some("Dwarf".to_owned()),
                battle_level: Some(3),
                items: vec!["Axe".to_owned(), "Rope".to_owned()],
                ..Character::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let values = FormValues::from(&stored);
        assert_eq!(values.name, "Grimnir");
        assert_eq!(values.race, "Dwarf");
        assert_eq!(values.battle_level, "3");
        assert_eq!(values.movement, "");
        assert_eq!(values.items, "Axe\nRope");
        assert_eq!(values.skills, "");
    }

    #[test]
    fn test_edit_template_preserves_submitted_values_on_failure() {
        let form = CharacterForm {
            name: Some("Grimnir".to_owned()),
            gold: Some("not a number".to_owned()),
            items: Some("Axe\nRope".to_owned()),
            ..CharacterForm::default()
        };

        let template = EditTemplate {
            header: HeaderView::from_session(None),
            title: "Create Character",
            action: "/characters".to_owned(),
            delete_action: None,
            values: FormValues::from(&form),
            error: Some("write failed".to_owned()),
        };

        let html = template.render().unwrap();
        assert!(html.contains("write failed"));
        assert!(html.contains("Grimnir"));
        // The raw submitted text comes back, not the coerced value
        assert!(html.contains("not a number"));
    }

    #[test]
    fn test_stat_text_blank_when_absent() {
        assert_eq!(stat_text(None), "");
        assert_eq!(stat_text(Some(0)), "0");
        assert_eq!(stat_text(Some(-2)), "-2");
    }
}

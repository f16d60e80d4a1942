//! Character repository for database operations.
//!
//! Character records are shared among all signed-in users; there is no
//! per-user ownership column.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use questvault_core::{Character, CharacterId};

use super::RepositoryError;

/// Columns selected for every character read.
const CHARACTER_COLUMNS: &str = "id, name, race, profession, battle_level, movement, \
     weapon_skill, ballistics_skill, strength, toughness, initiative, willpower, \
     attacks, pinning, luck, starting_wounds, current_wounds, gold, gold_to_next_level, \
     items, skills, created_at, updated_at";

/// A character record as stored, with its store-assigned identity.
#[derive(Debug, Clone)]
pub struct StoredCharacter {
    /// Store-assigned record ID.
    pub id: CharacterId,
    /// The character sheet data.
    pub character: Character,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Raw character row as stored.
#[derive(sqlx::FromRow)]
struct CharacterRow {
    id: Uuid,
    name: String,
    race: Option<String>,
    profession: Option<String>,
    battle_level: Option<i32>,
    movement: Option<i32>,
    weapon_skill: Option<i32>,
    ballistics_skill: Option<i32>,
    strength: Option<i32>,
    toughness: Option<i32>,
    initiative: Option<i32>,
    willpower: Option<i32>,
    attacks: Option<i32>,
    pinning: Option<i32>,
    luck: Option<i32>,
    starting_wounds: Option<i32>,
    current_wounds: Option<i32>,
    gold: Option<i32>,
    gold_to_next_level: Option<i32>,
    items: Vec<String>,
    skills: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CharacterRow> for StoredCharacter {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: CharacterId::new(row.id),
            character: Character {
                name: row.name,
                race: row.race,
                profession: row.profession,
                battle_level: row.battle_level,
                movement: row.movement,
                weapon_skill: row.weapon_skill,
                ballistics_skill: row.ballistics_skill,
                strength: row.strength,
                toughness: row.toughness,
                initiative: row.initiative,
                willpower: row.willpower,
                attacks: row.attacks,
                pinning: row.pinning,
                luck: row.luck,
                starting_wounds: row.starting_wounds,
                current_wounds: row.current_wounds,
                gold: row.gold,
                gold_to_next_level: row.gold_to_next_level,
                items: row.items,
                skills: row.skills,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for character database operations.
pub struct CharacterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CharacterRepository<'a> {
    /// Create a new character repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all character records.
    ///
    /// Ordered by name (case-insensitive), then creation time for stable
    /// ordering of duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<StoredCharacter>, RepositoryError> {
        let rows: Vec<CharacterRow> = sqlx::query_as(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM character ORDER BY LOWER(name), created_at"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredCharacter::from).collect())
    }

    /// Get a character record by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CharacterId) -> Result<Option<StoredCharacter>, RepositoryError> {
        let row: Option<CharacterRow> = sqlx::query_as(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM character WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(StoredCharacter::from))
    }

    /// Create a new character record.
    ///
    /// The store assigns the identity; callers never pick IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, character: &Character) -> Result<StoredCharacter, RepositoryError> {
        let row: CharacterRow = sqlx::query_as(&format!(
            "INSERT INTO character (name, race, profession, battle_level, movement, \
             weapon_skill, ballistics_skill, strength, toughness, initiative, willpower, \
             attacks, pinning, luck, starting_wounds, current_wounds, gold, \
             gold_to_next_level, items, skills)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
             $16, $17, $18, $19, $20)
             RETURNING {CHARACTER_COLUMNS}"
        ))
        .bind(&character.name)
        .bind(&character.race)
        .bind(&character.profession)
        .bind(character.battle_level)
        .bind(character.movement)
        .bind(character.weapon_skill)
        .bind(character.ballistics_skill)
        .bind(character.strength)
        .bind(character.toughness)
        .bind(character.initiative)
        .bind(character.willpower)
        .bind(character.attacks)
        .bind(character.pinning)
        .bind(character.luck)
        .bind(character.starting_wounds)
        .bind(character.current_wounds)
        .bind(character.gold)
        .bind(character.gold_to_next_level)
        .bind(&character.items)
        .bind(&character.skills)
        .fetch_one(self.pool)
        .await?;

        Ok(StoredCharacter::from(row))
    }

    /// Replace a character record's data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CharacterId,
        character: &Character,
    ) -> Result<StoredCharacter, RepositoryError> {
        let row: Option<CharacterRow> = sqlx::query_as(&format!(
            "UPDATE character
             SET name = $2, race = $3, profession = $4, battle_level = $5, movement = $6, \
                 weapon_skill = $7, ballistics_skill = $8, strength = $9, toughness = $10, \
                 initiative = $11, willpower = $12, attacks = $13, pinning = $14, luck = $15, \
                 starting_wounds = $16, current_wounds = $17, gold = $18, \
                 gold_to_next_level = $19, items = $20, skills = $21, updated_at = NOW()
             WHERE id = $1
             RETURNING {CHARACTER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&character.name)
        .bind(&character.race)
        .bind(&character.profession)
        .bind(character.battle_level)
        .bind(character.movement)
        .bind(character.weapon_skill)
        .bind(character.ballistics_skill)
        .bind(character.strength)
        .bind(character.toughness)
        .bind(character.initiative)
        .bind(character.willpower)
        .bind(character.attacks)
        .bind(character.pinning)
        .bind(character.luck)
        .bind(character.starting_wounds)
        .bind(character.current_wounds)
        .bind(character.gold)
        .bind(character.gold_to_next_level)
        .bind(&character.items)
        .bind(&character.skills)
        .fetch_optional(self.pool)
        .await?;

        row.map(StoredCharacter::from)
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a character record.
    ///
    /// Deleting an already-deleted record is not an error.
    ///
    /// # Returns
    ///
    /// Returns `true` if the record was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CharacterId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM character WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Puzzle models and backend payload normalisation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::normalize::{first, first_string, scalar_to_string};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Lenient parse used for backend data: unknown values fall back to `Easy`.
    pub fn from_backend(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// Normalised puzzle as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleItem {
    pub id: String,
    pub name: String,
    /// Image as a data URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub solution: String,
    pub difficulty_level: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
}

impl PuzzleItem {
    const ID: &'static [&'static str] = &["id", "Id"];
    const NAME: &'static [&'static str] = &["name", "Name"];
    const SOLUTION: &'static [&'static str] = &["solution", "Solution"];
    const DIFFICULTY: &'static [&'static str] = &["difficultyLevel", "DifficultyLevel"];
    const CREATOR_ID: &'static [&'static str] = &["creatorId", "CreatorId"];
    const CREATOR_NAME: &'static [&'static str] =
        &["creatorName", "CreatorName", "userName", "UserName"];
    const IMAGE: &'static [&'static str] = &["image", "Image"];

    /// Normalise one backend record, accepting every alias listed above.
    pub fn from_backend(raw: &Value) -> Self {
        let difficulty = first(raw, Self::DIFFICULTY).map(Difficulty::from).unwrap_or_default();

        Self {
            id: first_string(raw, Self::ID).unwrap_or_default(),
            name: first_string(raw, Self::NAME).unwrap_or_default(),
            image: first_string(raw, Self::IMAGE).as_deref().and_then(to_image_data_url),
            solution: first_string(raw, Self::SOLUTION).unwrap_or_default(),
            difficulty_level: difficulty,
            created_by: first_string(raw, Self::CREATOR_ID),
            creator_name: first_string(raw, Self::CREATOR_NAME),
        }
    }

    /// Normalise a list body. Strings, null and other non-arrays are an empty list.
    pub fn list_from_backend(raw: &Value) -> Vec<Self> {
        match raw {
            Value::Array(items) => items.iter().map(Self::from_backend).collect(),
            _ => Vec::new(),
        }
    }
}

/// Backend images arrive as bare base64 (PNG) or as a full data URL.
pub fn to_image_data_url(image: &str) -> Option<String> {
    if image.is_empty() {
        return None;
    }
    if image.starts_with("data:") {
        return Some(image.to_string());
    }
    Some(format!("data:image/png;base64,{image}"))
}

/// Image attached to a puzzle upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Fields of the multipart `CreatePuzzle` call.
#[derive(Debug, Clone, Validate)]
pub struct NewPuzzle {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub solution: String,
    pub difficulty: Difficulty,
    pub creator_id: String,
    pub image: Option<PuzzleImage>,
}

impl NewPuzzle {
    /// Trimmed copy, as the backend stores it.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            solution: self.solution.trim().to_string(),
            ..self.clone()
        }
    }
}

impl From<&Value> for Difficulty {
    fn from(raw: &Value) -> Self {
        scalar_to_string(raw).map(|s| Self::from_backend(&s)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalise_camel_case() {
        let item = PuzzleItem::from_backend(&json!({
            "id": 5,
            "name": "Maze",
            "solution": "left",
            "difficultyLevel": "HARD",
            "creatorId": "u-1",
            "creatorName": "alice",
            "image": "iVBORw0"
        }));
        assert_eq!(item.id, "5");
        assert_eq!(item.name, "Maze");
        assert_eq!(item.difficulty_level, Difficulty::Hard);
        assert_eq!(item.created_by.as_deref(), Some("u-1"));
        assert_eq!(item.creator_name.as_deref(), Some("alice"));
        assert_eq!(item.image.as_deref(), Some("data:image/png;base64,iVBORw0"));
    }

    #[test]
    fn test_normalise_pascal_case_and_fallbacks() {
        let item = PuzzleItem::from_backend(&json!({
            "Id": "p-9",
            "Name": "Riddle",
            "Solution": "echo",
            "DifficultyLevel": "impossible",
            "UserName": "bob",
            "Image": "data:image/jpeg;base64,AAAA"
        }));
        assert_eq!(item.id, "p-9");
        assert_eq!(item.solution, "echo");
        assert_eq!(item.difficulty_level, Difficulty::Easy);
        assert_eq!(item.creator_name.as_deref(), Some("bob"));
        assert!(item.created_by.is_none());
        assert_eq!(item.image.as_deref(), Some("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn test_missing_fields_default() {
        let item = PuzzleItem::from_backend(&json!({}));
        assert_eq!(item.id, "");
        assert_eq!(item.difficulty_level, Difficulty::Easy);
        assert!(item.image.is_none());
    }

    #[test]
    fn test_list_from_string_body_is_empty() {
        assert!(PuzzleItem::list_from_backend(&json!("No puzzles found")).is_empty());
        assert!(PuzzleItem::list_from_backend(&Value::Null).is_empty());
        assert_eq!(PuzzleItem::list_from_backend(&json!([{}, {}])).len(), 2);
    }

    #[test]
    fn test_difficulty_from_numeric_value() {
        assert_eq!(Difficulty::from(&json!("Medium")), Difficulty::Medium);
        assert_eq!(Difficulty::from(&json!(2)), Difficulty::Easy);
    }

    #[test]
    fn test_new_puzzle_validation() {
        let puzzle = NewPuzzle {
            name: "  ".to_string(),
            solution: "x".to_string(),
            difficulty: Difficulty::Easy,
            creator_id: "1".to_string(),
            image: None,
        };
        assert!(puzzle.validate().is_err());

        let puzzle = NewPuzzle { name: " Maze ".to_string(), ..puzzle };
        assert!(puzzle.validate().is_ok());
        assert_eq!(puzzle.trimmed().name, "Maze");
    }
}

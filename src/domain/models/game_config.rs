#[cfg(test)]
#[path = "game_config_test.rs"]
mod tests;

use std::str::FromStr;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    English,
    Hebrew,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Chance that an automated guesser passes instead of guessing.
    pub fn pass_probability(&self) -> f64 {
        match self {
            Difficulty::Easy => return 0.4,
            Difficulty::Medium => return 0.2,
            Difficulty::Hard => return 0.0,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Solver {
    Naive,
    Olympic,
    Sna,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelIdentifier {
    pub language: Language,
    pub model_name: String,
    #[serde(default)]
    pub is_stemmed: bool,
}

/// Answer to the model question that leaves the choice to the solver service.
pub const DEFAULT_MODEL_ANSWER: &str = "default";

impl ModelIdentifier {
    fn new(language: Language, model_name: &str, is_stemmed: bool) -> ModelIdentifier {
        return ModelIdentifier {
            language,
            model_name: model_name.to_string(),
            is_stemmed,
        };
    }

    /// Models the solver service ships for a language, default first.
    pub fn known(language: Language) -> Vec<ModelIdentifier> {
        match language {
            Language::English => {
                return vec![
                    ModelIdentifier::new(language, "wiki-50", false),
                    ModelIdentifier::new(language, "google-300", false),
                ];
            }
            Language::Hebrew => {
                return vec![
                    ModelIdentifier::new(language, "skv-ft-150", true),
                    ModelIdentifier::new(language, "skv-cbow-150", true),
                ];
            }
        }
    }

    pub fn default_for(language: Language) -> ModelIdentifier {
        return ModelIdentifier::known(language).remove(0);
    }

    /// Resolves a wizard answer. `Ok(None)` means "let the service decide".
    pub fn parse(language: Language, text: &str) -> Result<Option<ModelIdentifier>, String> {
        let needle = text.trim().to_lowercase();
        if needle == DEFAULT_MODEL_ANSWER {
            return Ok(None);
        }

        return ModelIdentifier::known(language)
            .into_iter()
            .find(|model| return model.model_name == needle)
            .map(Some)
            .ok_or(needle);
    }
}

/// Settings of a game. Filled in step by step by the `/custom` wizard and
/// frozen once the game starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub language: Language,
    pub difficulty: Difficulty,
    pub solver: Solver,
    pub model_identifier: Option<ModelIdentifier>,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        return GameConfig {
            language: Language::English,
            difficulty: Difficulty::Easy,
            solver: Solver::Naive,
            model_identifier: None,
        };
    }
}

impl GameConfig {
    /// Builds the defaults used by `/start`, falling back to the built-in
    /// values for anything that doesn't parse.
    pub fn from_names(language: &str, difficulty: &str, solver: &str) -> GameConfig {
        let fallback = GameConfig::default();
        return GameConfig {
            language: Language::from_str(language).unwrap_or(fallback.language),
            difficulty: Difficulty::from_str(difficulty).unwrap_or(fallback.difficulty),
            solver: Solver::from_str(solver).unwrap_or(fallback.solver),
            model_identifier: None,
        };
    }
}

pub fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => return first.to_uppercase().collect::<String>() + chars.as_str(),
        None => return "".to_string(),
    }
}

pub fn language_options() -> Vec<String> {
    return Language::iter()
        .map(|language| return title_case(&language.to_string()))
        .collect();
}

pub fn difficulty_options() -> Vec<String> {
    return Difficulty::iter()
        .map(|difficulty| return title_case(&difficulty.to_string()))
        .collect();
}

pub fn solver_options() -> Vec<String> {
    return Solver::iter()
        .map(|solver| return title_case(&solver.to_string()))
        .collect();
}

pub fn model_options(language: Language) -> Vec<String> {
    let mut options = ModelIdentifier::known(language)
        .into_iter()
        .map(|model| return model.model_name)
        .collect::<Vec<String>>();
    options.push(title_case(DEFAULT_MODEL_ANSWER));

    return options;
}

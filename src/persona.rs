use anyhow::{anyhow, Error};
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// The philosophers a session can converse with.
/// Serialized under the Korean names, matching the corpus table's
/// `philosopher` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Philosopher {
    #[serde(rename = "니체")]
    Nietzsche,
    #[serde(rename = "칸트")]
    Kant,
    #[serde(rename = "맹자")]
    Mencius,
    #[serde(rename = "노자")]
    LaoTzu,
}

pub const ALL_PHILOSOPHERS: [Philosopher; 4] = [
    Philosopher::Nietzsche,
    Philosopher::Kant,
    Philosopher::Mencius,
    Philosopher::LaoTzu,
];

impl Philosopher {
    /// Korean display name, used in the UI and in prompt text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Philosopher::Nietzsche => "니체",
            Philosopher::Kant => "칸트",
            Philosopher::Mencius => "맹자",
            Philosopher::LaoTzu => "노자",
        }
    }

    /// The persona instruction that pins the model's voice to this
    /// philosopher. Translated to the model language before it becomes the
    /// session's system message.
    pub fn system_message(&self) -> String {
        let name = self.display_name();
        format!("너는 {name}야. AI챗봇처럼 대답하지말고, {name}가 말하는 것처럼 대답해줘")
    }
}

impl fmt::Display for Philosopher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Philosopher {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ASCII-lowercasing leaves the Korean names untouched.
        match s.trim().to_ascii_lowercase().as_str() {
            "니체" | "nietzsche" => Ok(Philosopher::Nietzsche),
            "칸트" | "kant" => Ok(Philosopher::Kant),
            "맹자" | "mencius" => Ok(Philosopher::Mencius),
            "노자" | "laotzu" | "lao-tzu" => Ok(Philosopher::LaoTzu),
            other => Err(anyhow!(
                "불가능한 철학자입니다: '{}'. '니체', '칸트', '맹자', '노자' 중 선택하세요.",
                other
            )),
        }
    }
}

/// Response length presets, each mapping a labeled choice to a character
/// budget for the generated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseLength {
    Short,
    Long,
}

impl ResponseLength {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseLength::Short => "짧은 답변 📑",
            ResponseLength::Long => "긴 답변 📜",
        }
    }

    /// Character budget handed to the prompt builder.
    pub fn budget(&self) -> u32 {
        match self {
            ResponseLength::Short => 100,
            ResponseLength::Long => 300,
        }
    }
}

impl FromStr for ResponseLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "짧은" | "short" => Ok(ResponseLength::Short),
            "긴" | "long" => Ok(ResponseLength::Long),
            other => Err(anyhow!(
                "알 수 없는 답변 길이입니다: '{}'. 'short' 또는 'long' 중 선택하세요.",
                other
            )),
        }
    }
}

/// Label of the model a fresh session starts with. Must stay within
/// `AVAILABLE_MODELS`.
pub const DEFAULT_MODEL_LABEL: &str = "GPT-3.5-Turbo";

lazy_static! {
    /// Display label -> model identifier, as offered in the UI.
    pub static ref AVAILABLE_MODELS: FxHashMap<&'static str, &'static str> = {
        let mut m = FxHashMap::default();
        m.insert("GPT-3.5-Turbo", "gpt-3.5-turbo");
        m.insert("GPT-4", "gpt-4");
        m
    };
}

/// Resolves a user-entered model choice (label or raw identifier) to a model
/// identifier, failing with the list of valid choices otherwise.
pub fn resolve_model(choice: &str) -> Result<&'static str, Error> {
    let choice = choice.trim();
    if let Some(id) = AVAILABLE_MODELS.get(choice) {
        return Ok(id);
    }
    if let Some(id) = AVAILABLE_MODELS.values().copied().find(|id| *id == choice) {
        return Ok(id);
    }
    let mut labels: Vec<&str> = AVAILABLE_MODELS.keys().copied().collect();
    labels.sort_unstable();
    Err(anyhow!(
        "알 수 없는 모델입니다: '{}'. 사용 가능한 모델: {}",
        choice,
        labels.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_supported_philosophers() {
        for p in ALL_PHILOSOPHERS {
            assert_eq!(p.display_name().parse::<Philosopher>().unwrap(), p);
        }
        assert_eq!("kant".parse::<Philosopher>().unwrap(), Philosopher::Kant);
    }

    #[test]
    fn unsupported_philosopher_enumerates_valid_choices() {
        let err = "소크라테스".parse::<Philosopher>().unwrap_err().to_string();
        for p in ALL_PHILOSOPHERS {
            assert!(err.contains(p.display_name()), "missing {} in: {}", p, err);
        }
    }

    #[test]
    fn length_presets_map_to_budgets() {
        assert_eq!(ResponseLength::Short.budget(), 100);
        assert_eq!(ResponseLength::Long.budget(), 300);
        assert_eq!("short".parse::<ResponseLength>().unwrap(), ResponseLength::Short);
        assert_eq!("긴".parse::<ResponseLength>().unwrap(), ResponseLength::Long);
    }

    #[test]
    fn resolves_model_by_label_or_id() {
        assert_eq!(resolve_model("GPT-4").unwrap(), "gpt-4");
        assert_eq!(resolve_model("gpt-3.5-turbo").unwrap(), "gpt-3.5-turbo");
        assert!(resolve_model("claude").is_err());
    }

    #[test]
    fn default_model_is_an_offered_choice() {
        assert_eq!(resolve_model(DEFAULT_MODEL_LABEL).unwrap(), "gpt-3.5-turbo");
    }

    #[test]
    fn system_message_names_the_philosopher() {
        let msg = Philosopher::Nietzsche.system_message();
        assert!(msg.contains("니체"));
    }
}

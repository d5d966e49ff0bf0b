//! Winner captions
//!
//! A short congratulatory phrase for the winner popup. The AI request is strictly
//! optional: the deterministic fallback is set the moment the spin resolves, and
//! the generated text replaces it only if the call succeeds and passes the
//! forbidden-word filter. Failures are logged and never shown to the user.

use serde::{Deserialize, Serialize};

/// Honorific category used to address the winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Honorific {
    #[default]
    Anh,
    Chi,
    Em,
    Ban,
}

impl Honorific {
    pub fn as_str(&self) -> &'static str {
        match self {
            Honorific::Anh => "anh",
            Honorific::Chi => "chị",
            Honorific::Em => "em",
            Honorific::Ban => "bạn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "anh" => Some(Honorific::Anh),
            "chị" | "chi" => Some(Honorific::Chi),
            "em" => Some(Honorific::Em),
            "bạn" | "ban" => Some(Honorific::Ban),
            _ => None,
        }
    }
}

/// Words the caption must never contain. A generated phrase containing any of
/// these is discarded in favor of the fallback.
pub const FORBIDDEN_WORDS: [&str; 6] = [
    "cờ bạc",
    "cá cược",
    "đánh bạc",
    "đỏ đen",
    "lừa đảo",
    "thua",
];

/// The deterministic caption used when the AI call is unavailable or fails
pub fn fallback_caption(honorific: Honorific, name: &str, prize: &str) -> String {
    format!(
        "Chúc mừng {} {} đã trúng {}! Quá đỉnh luôn!",
        honorific.as_str(),
        name,
        prize
    )
}

/// True if `text` contains a forbidden word (case-insensitive)
pub fn contains_forbidden(text: &str) -> bool {
    let lower = text.to_lowercase();
    FORBIDDEN_WORDS.iter().any(|w| lower.contains(w))
}

/// Prompt for the Gemini call
fn build_prompt(honorific: Honorific, name: &str, prize: &str) -> String {
    format!(
        "Bạn là một bình luận viên vui tính. Người trúng giải là {h} \"{name}\", \
         vừa nhận được giải \"{prize}\". Hãy viết một lời chúc mừng ngắn gọn, hài hước \
         và tràn đầy năng lượng (khoảng 1-2 câu), gọi người trúng giải là {h} {name}. \
         Tuyệt đối không dùng các từ: {forbidden}.",
        h = honorific.as_str(),
        forbidden = FORBIDDEN_WORDS.join(", "),
    )
}

const GEMINI_MODEL: &str = "gemini-3-flash-preview";

// --- Gemini generateContent wire types (only the fields we use) ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Pull the caption text out of a response, rejecting empty or forbidden output
fn extract_caption(response: GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .next()?
        .text;
    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }
    if contains_forbidden(&text) {
        log::warn!("Generated caption contained a forbidden word, using fallback");
        return None;
    }
    Some(text)
}

/// Client for the optional caption request
#[derive(Debug, Clone)]
pub struct CaptionClient {
    api_key: Option<String>,
    http: reqwest::Client,
}

impl CaptionClient {
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            log::info!("No Gemini API key configured, captions use the fallback template");
        }
        Self {
            api_key,
            http: reqwest::Client::new(),
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Request a generated caption. Returns None on any failure; the caller keeps
    /// the fallback in that case.
    pub async fn fetch_caption(
        &self,
        honorific: Honorific,
        name: &str,
        prize: &str,
    ) -> Option<String> {
        let key = self.api_key.as_ref()?;
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent?key={key}"
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(honorific, name, prize),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.9,
                max_output_tokens: 200,
            },
        };

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Caption request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!("Caption request returned {}", response.status());
            return None;
        }
        match response.json::<GenerateResponse>().await {
            Ok(parsed) => extract_caption(parsed),
            Err(e) => {
                log::warn!("Caption response did not parse: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_caption_template() {
        assert_eq!(
            fallback_caption(Honorific::Anh, "X", "Y"),
            "Chúc mừng anh X đã trúng Y! Quá đỉnh luôn!"
        );
    }

    #[test]
    fn test_honorific_round_trip() {
        for h in [Honorific::Anh, Honorific::Chi, Honorific::Em, Honorific::Ban] {
            assert_eq!(Honorific::from_str(h.as_str()), Some(h));
        }
        // ASCII fallbacks for keyboard input without diacritics
        assert_eq!(Honorific::from_str("chi"), Some(Honorific::Chi));
        assert_eq!(Honorific::from_str("ban"), Some(Honorific::Ban));
        assert_eq!(Honorific::from_str("ông"), None);
    }

    #[test]
    fn test_forbidden_filter() {
        assert!(contains_forbidden("Đừng sa vào CỜ BẠC nhé"));
        assert!(!contains_forbidden("Chúc mừng chị Lan trúng thùng bia!"));
    }

    #[test]
    fn test_prompt_names_winner_and_forbidden_words() {
        let prompt = build_prompt(Honorific::Chi, "LAN", "1 Thùng bia");
        assert!(prompt.contains("chị \"LAN\""));
        assert!(prompt.contains("1 Thùng bia"));
        assert!(prompt.contains("cờ bạc"));
    }

    #[test]
    fn test_extract_caption_rejects_empty_and_forbidden() {
        let make = |text: &str| GenerateResponse {
            candidates: vec![Candidate {
                content: Content {
                    parts: vec![Part {
                        text: text.to_string(),
                    }],
                },
            }],
        };

        assert_eq!(extract_caption(make("  Tuyệt vời!  ")), Some("Tuyệt vời!".to_string()));
        assert_eq!(extract_caption(make("   ")), None);
        assert_eq!(extract_caption(make("như trúng cá cược")), None);
        assert_eq!(extract_caption(GenerateResponse { candidates: vec![] }), None);
    }

    #[test]
    fn test_client_without_key_has_no_key() {
        assert!(!CaptionClient::new(None).has_key());
        assert!(!CaptionClient::new(Some("  ".to_string())).has_key());
        assert!(CaptionClient::new(Some("abc".to_string())).has_key());
    }
}

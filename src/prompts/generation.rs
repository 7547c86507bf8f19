//! Generation prompt builder for the first model request.
//!
//! The system prompt establishes the limerick persona, the architectural
//! vocabulary and the output format; when a five-letter key is present it
//! embeds per-line end-word directives plus the rhyme-group rule.

/// Prompt for the first generation request.
///
/// Contains both the system prompt (persona, constraints, format) and
/// the user prompt (the literal generation trigger).
#[derive(Debug, Clone)]
pub struct GenerationPrompt {
    /// System prompt establishing persona, constraints and format.
    pub system: String,
    /// User prompt triggering the generation.
    pub user: String,
}

/// Literal user message that triggers generation.
pub const GENERATION_TRIGGER: &str = "Generate now.";

/// Thematic vocabulary the model is steered toward.
const ARCHITECTURAL_VOCABULARY: &str = "Use architectural nouns like lintel, gable, pier, vault, \
     mullion, oculus, truss, soffit, plinth, clerestory, spandrel, balustrade, wythe, quoins, \
     corbel, voussoir, etc.";

/// Tone guidance for the persona.
const TONE_RULE: &str = "Keep deadpan tone; vivid, short scenes; no moralizing.";

/// Builds the generation prompt for the first model request.
///
/// # Arguments
///
/// * `key` - Normalized letter key; the end-word directives are emitted
///   only when it has exactly 5 letters
/// * `count` - Number of poems to request (already clamped to [1, 10])
/// * `translate` - Whether to append the Japanese translation directive
pub fn build_generation_prompt(key: &str, count: u32, translate: bool) -> GenerationPrompt {
    let alpha_rule = if key.chars().count() == 5 {
        end_word_rule(key)
    } else {
        "If no five-letter key is given, just write normal AABBA limericks.".to_string()
    };

    let translation_rule = if translate {
        "After each English line, write its Japanese translation on the next line (no extra commentary)."
    } else {
        "Write English lines only (no translation)."
    };

    let system = [
        format!(
            "You are \"Lear-GPT (Architecture)\". Generate {count} five-line AABBA architectural limericks in the style of Edward Lear."
        ),
        ARCHITECTURAL_VOCABULARY.to_string(),
        TONE_RULE.to_string(),
        alpha_rule,
        translation_rule.to_string(),
        "Format:".to_string(),
        "  • Number each poem like \"1)\", \"2)\" etc.".to_string(),
        "  • Exactly 5 lines per poem.".to_string(),
        "  • Separate poems with a single blank line.".to_string(),
    ]
    .join("\n");

    GenerationPrompt {
        system,
        user: GENERATION_TRIGGER.to_string(),
    }
}

/// Formats the strict per-line end-word directives for a 5-letter key.
fn end_word_rule(key: &str) -> String {
    let letters: Vec<char> = key.chars().collect();
    let mut lines = vec!["END-WORD INITIALS (strict):".to_string()];
    lines.extend(
        letters
            .iter()
            .enumerate()
            .map(|(i, letter)| format!("  • Line{} end-word must start with \"{}\".", i + 1, letter)),
    );
    lines.push("A-lines (1,2,5) must rhyme together; B-lines (3,4) must rhyme together.".to_string());
    lines.push("Use rare/compound words or archaic spellings if needed,".to_string());
    lines.push("but the initial letters of the final words must match strictly.".to_string());
    lines.join("\n")
}

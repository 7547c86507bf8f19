//! Repair prompt builder for the single constraint-repair round.
//!
//! Issued only when the first generation violates the end-word rule and
//! a five-letter key is present. The failing text is embedded verbatim
//! so the model can make minimal edits instead of regenerating.

/// Prompt for the repair request.
#[derive(Debug, Clone)]
pub struct RepairPrompt {
    /// System prompt: strict-editor persona.
    pub system: String,
    /// User prompt: the repair instruction with the failing text appended.
    pub user: String,
}

/// Strict-editor persona used as the system message of the repair call.
pub const REPAIR_EDITOR_SYSTEM: &str =
    "You are a strict editor that repairs constraint violations.";

/// Builds the repair prompt for a failing generation.
///
/// # Arguments
///
/// * `failing_text` - The raw first-generation output that violated the rule
/// * `key` - The normalized five-letter key the end-words must honor
pub fn build_repair_prompt(failing_text: &str, key: &str) -> RepairPrompt {
    let letters: Vec<char> = key.chars().collect();

    let mut lines = vec![
        "REPAIR TASK: The following limericks did NOT satisfy the end-word initial rule."
            .to_string(),
        "Rewrite them so that:".to_string(),
    ];
    lines.extend(letters.iter().enumerate().map(|(i, letter)| {
        format!("  Line{} ends with a word starting with \"{}\".", i + 1, letter)
    }));
    lines.push("Also keep AABBA rhymes (A=1,2,5; B=3,4).".to_string());
    lines.push("Keep the same format (numbered, 5 lines per poem, blank line between poems).".to_string());
    lines.push("Keep the same meaning; adjust minimal wording.".to_string());
    lines.push("------".to_string());
    lines.push(failing_text.to_string());

    RepairPrompt {
        system: REPAIR_EDITOR_SYSTEM.to_string(),
        user: lines.join("\n"),
    }
}

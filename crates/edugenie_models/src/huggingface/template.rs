//! Instruction templating for hosted instruct models.

const INST_OPEN: &str = "<s>[INST]";
const INST_CLOSE: &str = "[/INST]";

/// Wraps a prompt and optional system instruction in instruct delimiters.
///
/// ```
/// use edugenie_models::wrap_instruction;
///
/// assert_eq!(wrap_instruction(None, "Hi"), "<s>[INST] Hi [/INST]");
/// assert_eq!(
///     wrap_instruction(Some("Be brief."), "Hi"),
///     "<s>[INST] Be brief.\n\nHi [/INST]"
/// );
/// ```
pub fn wrap_instruction(system: Option<&str>, prompt: &str) -> String {
    match system.filter(|s| !s.is_empty()) {
        Some(system) => format!("{INST_OPEN} {system}\n\n{prompt} {INST_CLOSE}"),
        None => format!("{INST_OPEN} {prompt} {INST_CLOSE}"),
    }
}

/// Drops everything up to the last closing delimiter and trims the rest.
///
/// Instruct models echo the prompt ahead of their answer.
///
/// ```
/// use edugenie_models::strip_instruction;
///
/// assert_eq!(strip_instruction("<s>[INST] Hi [/INST] Hello! "), "Hello!");
/// assert_eq!(strip_instruction("  plain  "), "plain");
/// ```
pub fn strip_instruction(text: &str) -> &str {
    text.rsplit(INST_CLOSE).next().unwrap_or(text).trim()
}

/// Expands a subject into an illustration prompt.
pub fn image_prompt(subject: &str) -> String {
    format!("educational illustration of {subject}, high quality, clean background, 4k resolution")
}

use regex::Regex;
use tracing::debug;

/// Decides whether the edit point sits immediately after a `this.` or
/// `<alias>.` member access, optionally followed by a partially typed member
/// name. Matches the text window from document start through the cursor
/// against a pattern anchored at the cursor; any failure to build or match
/// the pattern fails safe by not triggering.
pub fn should_trigger(text_to_cursor: &str, alias_names: &[String]) -> bool {
    let mut names = String::from("this");
    for alias in alias_names {
        if alias.is_empty() {
            continue;
        }
        names.push('|');
        names.push_str(&regex::escape(alias));
    }
    // Non-word boundary, then the reference name, a literal dot, optional
    // whitespace, then any partial identifier (JS identifiers include `$`).
    let pattern = format!(r"(?:^|[^\w$])(?:{names})\.\s*[\w$]*\z");
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text_to_cursor),
        Err(err) => {
            debug!("Failed to build trigger pattern: {}", err);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// State-name canonicalisation
// ---------------------------------------------------------------------------

/// Known alternative spellings, keyed by their [`normalize`]d form.
///
/// Spellings that only differ by `&` / `and` or whitespace already fold
/// together in [`normalize`] and need no entry here. No value in this table
/// may itself appear as a key, otherwise [`canonical_state`] would stop being
/// idempotent.
pub const STATE_ALIASES: &[(&str, &str)] = &[
    ("tamilnadu", "tamil nadu"),
    ("telengana", "telangana"),
    ("chhattishgarh", "chhattisgarh"),
    ("andaman and nicobar", "andaman and nicobar islands"),
    ("nct of delhi", "delhi"),
    ("odisha", "orissa"),
    ("puducherry", "pondicherry"),
];

/// Lowercase, spell out `&`, collapse whitespace runs and trim.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical form used for every state comparison and lookup.
///
/// Unknown names pass through in their normalized form.
pub fn canonical_state(name: &str) -> String {
    let normalized = normalize(name);
    STATE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(normalized)
}

/// Whether two spellings denote the same state.
pub fn same_state(a: &str, b: &str) -> bool {
    canonical_state(a) == canonical_state(b)
}

use std::collections::HashMap;

/// Literal substitutions applied to a title, in order. `": "` must run before
/// `" "` since it contains a space.
const TITLE_SUBSTITUTIONS: [(&str, &str); 4] = [("'", ""), (".", ""), (": ", "-"), (" ", "_")];

/// Leading articles stripped from sort keys. Only English articles; titles such
/// as "Le Cercle Rouge" keep theirs.
const SORT_ARTICLES: [&str; 2] = ["the_", "a_"];

/// Identifier for a title, e.g. `"Tetsuo: The Iron Man"` -> `"tetsuo-the_iron_man"`.
pub fn canonicalize(title: &str) -> String {
    TITLE_SUBSTITUTIONS
        .iter()
        .fold(title.to_string(), |acc, (from, to)| acc.replace(from, to))
        .to_lowercase()
}

/// Sort key for a title: its identifier minus one leading article.
pub fn sort_key(title: &str) -> String {
    let key = canonicalize(title);
    for article in SORT_ARTICLES {
        if let Some(rest) = key.strip_prefix(article) {
            return rest.to_string();
        }
    }
    key
}

/// Swap a computed sort key for its operator override, if one exists.
pub fn apply_override(key: String, overrides: &HashMap<String, String>) -> String {
    match overrides.get(&key) {
        Some(replacement) => replacement.clone(),
        None => key,
    }
}

/// Case-insensitive substring match against any of `fields`.
/// A missing or blank term matches everything.
pub(crate) fn matches_term(term: Option<&str>, fields: &[&str]) -> bool {
    let term = match term.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return true,
    };
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

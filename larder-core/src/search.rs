/// Keep the items whose name contains `query` (case-insensitive) and move
/// the ones starting with it to the front.
///
/// Both tiers keep the order the items came in, so callers that load rows
/// sorted by name get name order inside each tier. A blank query returns
/// every item unchanged.
pub fn rank_by_name<T, F>(items: Vec<T>, query: &str, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }

    let mut prefixed = Vec::new();
    let mut containing = Vec::new();
    for item in items {
        let haystack = name(&item).to_lowercase();
        if haystack.starts_with(&needle) {
            prefixed.push(item);
        } else if haystack.contains(&needle) {
            containing.push(item);
        }
    }

    prefixed.extend(containing);
    prefixed
}

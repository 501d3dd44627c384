/// Replace each legacy repository URL with the canonical one.
///
/// Returns the rewritten text and how many occurrences were replaced.
pub fn rewrite_repository_links(text: &str, legacy_urls: &[String], canonical: &str) -> (String, usize) {
    let mut out = text.to_string();
    let mut replaced = 0;

    for legacy in legacy_urls {
        if legacy.is_empty() || legacy == canonical {
            continue;
        }
        let count = out.matches(legacy.as_str()).count();
        if count > 0 {
            out = out.replace(legacy.as_str(), canonical);
            replaced += count;
        }
    }

    (out, replaced)
}

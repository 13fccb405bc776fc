//! Shared slug post-processing: length enforcement and git-ref sanitization

/// Maximum total length of a generated branch name.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Enforce the 50-character budget while keeping the ticket id intact.
///
/// A slug has the shape `[prefix/]ticketId-generativePart`. When the total
/// exceeds the budget, only the generative part is truncated; the ticket id
/// is never shortened, even if the generative part drops to zero characters.
/// Ticket ids usually contain a hyphen themselves (`EH-1234`), so the
/// caller-supplied id is matched against the slug (case-insensitively, as
/// the model tier may lower-case it) rather than split off at a hyphen;
/// the first-hyphen split is only a last resort for slugs that do not
/// carry the id.
pub fn enforce_length(slug: &str, ticket_id: &str) -> String {
    if slug.len() <= MAX_SLUG_LENGTH {
        return slug.to_string();
    }

    let (prefix, rest) = match slug.find('/') {
        Some(idx) => slug.split_at(idx + 1),
        None => ("", slug),
    };

    let id_len = if starts_with_ticket_id(rest, ticket_id) {
        ticket_id.len()
    } else {
        rest.find('-').unwrap_or(rest.len())
    };
    let (id_segment, generative) = rest.split_at(id_len);
    let generative = generative.strip_prefix('-').unwrap_or(generative);

    let budget = MAX_SLUG_LENGTH
        .saturating_sub(prefix.len())
        .saturating_sub(id_segment.len())
        .saturating_sub(1);
    let truncated: String = generative.chars().take(budget).collect();

    format!("{}{}-{}", prefix, id_segment, truncated)
}

fn starts_with_ticket_id(rest: &str, ticket_id: &str) -> bool {
    !ticket_id.is_empty()
        && rest.len() >= ticket_id.len()
        && rest.is_char_boundary(ticket_id.len())
        && rest.as_bytes()[..ticket_id.len()].eq_ignore_ascii_case(ticket_id.as_bytes())
}

/// Rewrite a slug so it is a valid git ref name.
///
/// Allowed characters are `[A-Za-z0-9\-_/]`; everything else becomes a
/// hyphen. Backticks are dropped outright rather than replaced. Leading
/// dots and a trailing `.lock` suffix are stripped per git's ref rules.
pub fn sanitize(slug: &str) -> String {
    let mut cleaned = slug.replace('`', "");
    while let Some(stripped) = cleaned.strip_prefix('.') {
        cleaned = stripped.to_string();
    }
    if let Some(stripped) = cleaned.strip_suffix(".lock") {
        cleaned = stripped.to_string();
    }

    let replaced: String = cleaned
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    let mut last_hyphen = false;
    for c in replaced.chars() {
        if c == '-' {
            if !last_hyphen {
                collapsed.push(c);
            }
            last_hyphen = true;
        } else {
            collapsed.push(c);
            last_hyphen = false;
        }
    }

    collapsed.trim_matches(|c| c == '-' || c == '/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforce_length_short_slug_unchanged() {
        let slug = "feature/EH-1234-fix-login";
        assert_eq!(enforce_length(slug, "EH-1234"), slug);
    }

    #[test]
    fn test_enforce_length_preserves_ticket_id() {
        let slug = "feature/eh-1234-implement-very-long-detailed-payment-gateway-integration";
        let result = enforce_length(slug, "EH-1234");

        assert!(result.len() <= MAX_SLUG_LENGTH);
        assert!(result.starts_with("feature/eh-1234-"));
    }

    #[test]
    fn test_enforce_length_without_prefix() {
        let slug = format!("EH-1234-{}", "x".repeat(80));
        let result = enforce_length(&slug, "EH-1234");

        assert!(result.len() <= MAX_SLUG_LENGTH);
        assert!(result.starts_with("EH-1234-"));
    }

    #[test]
    fn test_enforce_length_protects_hyphenated_id_past_first_hyphen() {
        // The id's own hyphen must not become the split point: everything
        // up to the end of the supplied id survives truncation
        let ticket = "PROJ-20241234";
        let slug = format!("{}-{}", ticket, "w".repeat(60));
        let result = enforce_length(&slug, ticket);

        assert!(result.len() <= MAX_SLUG_LENGTH);
        assert!(result.starts_with("PROJ-20241234-"));
    }

    #[test]
    fn test_enforce_length_long_ticket_id_never_shortened() {
        // Ticket id alone exceeds the budget; the generative part drops to
        // zero but the id stays whole
        let ticket = "VERYLONGPROJECTKEY-9999999999999999999999999999999999999999";
        let slug = format!("{}-{}", ticket, "payment-gateway");
        let result = enforce_length(&slug, ticket);

        assert!(result.starts_with(ticket));
    }

    #[test]
    fn test_enforce_length_falls_back_to_first_hyphen_split() {
        // Slug does not begin with the supplied id, so the generic split
        // protects the leading segment only
        let slug = format!("unrelated-{}", "y".repeat(60));
        let result = enforce_length(&slug, "EH-1234");

        assert!(result.len() <= MAX_SLUG_LENGTH);
        assert!(result.starts_with("unrelated-"));
    }

    #[test]
    fn test_sanitize_removes_backticks() {
        let result = sanitize("EH-1234-`drop table`");
        assert!(!result.contains('`'));
        assert!(!result.contains("--"));
        assert_eq!(result, "EH-1234-drop-table");
    }

    #[test]
    fn test_sanitize_replaces_disallowed_characters() {
        let result = sanitize("EH-1234-fix login (again)!");
        assert!(result
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/'));
        assert_eq!(result, "EH-1234-fix-login-again");
    }

    #[test]
    fn test_sanitize_strips_leading_dot_and_lock_suffix() {
        assert!(!sanitize(".EH-1234-config").starts_with('.'));
        assert!(!sanitize("EH-1234-index.lock").ends_with(".lock"));
    }

    #[test]
    fn test_sanitize_trims_edges() {
        assert_eq!(sanitize("-EH-1234-fix-"), "EH-1234-fix");
        assert_eq!(sanitize("/feature/EH-1234-fix/"), "feature/EH-1234-fix");
    }
}

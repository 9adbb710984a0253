// inspector_core/src/editor/field_name.rs
use std::borrow::Cow;

/// Turns a member identifier into a label: `move_speed` and `moveSpeed`
/// both become `Move Speed`. A leading `m_` or `_` is dropped.
pub fn parse_field_name(name: &str) -> Cow<'_, str> {
    let trimmed = name
        .strip_prefix("m_")
        .unwrap_or(name)
        .trim_start_matches('_');

    // Fast path for names that are already labels
    if !trimmed.contains('_')
        && trimmed.len() == name.len()
        && trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && !trimmed.chars().skip(1).any(|c| c.is_ascii_uppercase())
    {
        return Cow::Borrowed(name);
    }
    if trimmed.is_empty() {
        return Cow::Borrowed(name);
    }

    let mut label = String::with_capacity(trimmed.len() + 4);
    let mut previous: Option<char> = None;
    for c in trimmed.chars() {
        if c == '_' {
            previous = Some(c);
            continue;
        }

        let word_start = match previous {
            None => true,
            Some('_') => true,
            // camelCase and digit boundaries
            Some(p) => (p.is_ascii_lowercase() && c.is_ascii_uppercase())
                || (p.is_ascii_alphabetic() && c.is_ascii_digit()),
        };

        if word_start && !label.is_empty() {
            label.push(' ');
        }
        if word_start {
            label.push(c.to_ascii_uppercase());
        } else {
            label.push(c);
        }
        previous = Some(c);
    }
    Cow::Owned(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_from_identifiers() {
        assert_eq!(parse_field_name("move_speed"), "Move Speed");
        assert_eq!(parse_field_name("moveSpeed"), "Move Speed");
        assert_eq!(parse_field_name("m_health"), "Health");
        assert_eq!(parse_field_name("_hidden__value"), "Hidden Value");
        assert_eq!(parse_field_name("slot2"), "Slot 2");
        assert_eq!(parse_field_name("x"), "X");
    }

    #[test]
    fn labels_are_borrowed_when_already_formatted() {
        assert!(matches!(parse_field_name("Health"), Cow::Borrowed("Health")));
        assert!(matches!(parse_field_name(""), Cow::Borrowed("")));
    }
}

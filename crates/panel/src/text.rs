//! English word helpers for labels and slugs.
//!
//! Pluralization covers the regular suffix rules plus the irregular and
//! uncountable nouns that commonly name admin resources.

/// Nouns whose plural is the singular.
const UNCOUNTABLE: &[&str] = &[
    "audio",
    "cattle",
    "data",
    "deer",
    "equipment",
    "evidence",
    "feedback",
    "fish",
    "furniture",
    "hardware",
    "information",
    "knowledge",
    "metadata",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "traffic",
];

/// (singular, plural) pairs that don't follow the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("quiz", "quizzes"),
    ("tooth", "teeth"),
    ("wife", "wives"),
    ("woman", "women"),
];

/// Pluralize the last word of `value`, keeping its casing style.
///
/// `"post"` → `"posts"`, `"blog category"` → `"blog categories"`,
/// `"Person"` → `"People"`.
pub fn plural(value: &str) -> String {
    let split = value
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let (head, word) = value.split_at(split);
    if word.is_empty() {
        return value.to_string();
    }

    let lower = word.to_lowercase();
    let plural_lower = plural_word(&lower);

    format!("{head}{}", match_case(&plural_lower, word))
}

fn plural_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULAR {
        // Compounds such as "salesperson" pluralize their irregular tail;
        // short stems ("man", "ox") only match whole words.
        if let Some(prefix) = word.strip_suffix(singular)
            && (prefix.is_empty() || singular.len() > 3)
        {
            return format!("{prefix}{plural}");
        }
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y')
        && stem
            .chars()
            .last()
            .is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
    {
        return format!("{stem}ies");
    }

    format!("{word}s")
}

/// Apply the casing style of `original` to `value`.
fn match_case(value: &str, original: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return value.to_uppercase();
    }

    if original.chars().next().is_some_and(char::is_uppercase) {
        return capitalize(value);
    }

    value.to_string()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case a string: every word starts uppercase, the rest is lowercase.
///
/// Word boundaries are any non-alphanumeric character except an apostrophe.
pub fn title(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;

    for c in value.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = c != '\'';
        }
    }

    out
}

/// Split an identifier (`BlogPost`, `blog_post`, `blog-post`) into lowercase words.
pub fn words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in value.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }

        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Kebab-case an identifier: `BlogPost` → `blog-post`.
pub fn kebab(value: &str) -> String {
    words(value).join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_regular_suffixes() {
        assert_eq!(plural("post"), "posts");
        assert_eq!(plural("category"), "categories");
        assert_eq!(plural("day"), "days");
        assert_eq!(plural("box"), "boxes");
        assert_eq!(plural("church"), "churches");
        assert_eq!(plural("status"), "statuses");
    }

    #[test]
    fn plural_irregular_and_uncountable() {
        assert_eq!(plural("person"), "people");
        assert_eq!(plural("salesperson"), "salespeople");
        assert_eq!(plural("child"), "children");
        assert_eq!(plural("woman"), "women");
        assert_eq!(plural("human"), "humans");
        assert_eq!(plural("news"), "news");
        assert_eq!(plural("equipment"), "equipment");
    }

    #[test]
    fn plural_only_touches_last_word() {
        assert_eq!(plural("blog post"), "blog posts");
        assert_eq!(plural("product category"), "product categories");
    }

    #[test]
    fn plural_keeps_case_style() {
        assert_eq!(plural("Person"), "People");
        assert_eq!(plural("FAQ"), "FAQS");
        assert_eq!(plural("Post"), "Posts");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title("blog posts"), "Blog Posts");
        assert_eq!(title("FAQS"), "Faqs");
        assert_eq!(title("user-roles"), "User-Roles");
        assert_eq!(title("o'neil's posts"), "O'neil's Posts");
    }

    #[test]
    fn words_split_identifiers() {
        assert_eq!(words("BlogPost"), vec!["blog", "post"]);
        assert_eq!(words("blog_post"), vec!["blog", "post"]);
        assert_eq!(words("Page2Section"), vec!["page2", "section"]);
        assert_eq!(kebab("ProductCategory"), "product-category");
    }
}

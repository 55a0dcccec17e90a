const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];
const SPAM_WORDS: [&str; 6] = ["viagra", "cialis", "casino", "lottery", "winner", "prize"];
const STACKED_SCHEMES: usize = 3;
const MAX_REPEATED_CHARS: usize = 10;

/// Removes every HTML tag from the input and trims it. Script and style elements are dropped with their contents.
pub fn sanitize_input(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        output.push_str(&rest[..start]);
        let tag = &rest[start + 1..];

        if !tag.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!') {
            output.push('<');
            rest = tag;
            continue;
        }

        // An unterminated tag swallows the remainder
        let Some(end) = tag.find('>') else {
            rest = "";
            break;
        };

        let name = tag_name(&tag[..end]);
        rest = &tag[end + 1..];
        if let Some(raw) = RAW_TEXT_TAGS.iter().find(|raw| name.eq_ignore_ascii_case(raw)) {
            rest = skip_element_body(rest, raw);
        }
    }

    output.push_str(rest);
    output.trim().to_string()
}

fn tag_name(tag: &str) -> &str {
    tag.split(|c: char| c.is_whitespace() || c == '/').next().unwrap_or_default()
}

fn skip_element_body<'a>(rest: &'a str, name: &str) -> &'a str {
    // ASCII lowercasing keeps byte offsets intact
    let lowercase = rest.to_ascii_lowercase();
    let Some(closing) = lowercase.find(&format!("</{name}")) else {
        return "";
    };

    match rest[closing..].find('>') {
        Some(end) => &rest[closing + end + 1..],
        None => "",
    }
}

/// Accepts plain `local@domain.tld` addresses: no display name, an ASCII local part and a top-level domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    const SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

    !local.is_empty()
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || SPECIALS.contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let valid_labels = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    let valid_tld = tld.starts_with("xn--") || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic));

    valid_labels && valid_tld
}

/// Flags known spam words, stacked URL schemes and long runs of a single character.
pub fn is_spam(text: &str) -> bool {
    contains_spam_word(text) || has_stacked_schemes(text) || has_long_run(text)
}

fn contains_spam_word(text: &str) -> bool {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| SPAM_WORDS.iter().any(|spam| word.eq_ignore_ascii_case(spam)))
}

fn has_stacked_schemes(text: &str) -> bool {
    let lowercase = text.to_ascii_lowercase();

    lowercase.match_indices("http").any(|(start, _)| {
        let mut rest = &lowercase[start..];
        let mut count = 0;
        while let Some(next) = rest.strip_prefix("http://").or_else(|| rest.strip_prefix("https://")) {
            count += 1;
            rest = next;
        }
        count >= STACKED_SCHEMES
    })
}

fn has_long_run(text: &str) -> bool {
    let mut previous = None;
    let mut run = 0;

    for c in text.chars().map(|c| c.to_ascii_lowercase()) {
        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            previous = None;
            run = 0;
            continue;
        }

        if previous == Some(c) {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }

        if run > MAX_REPEATED_CHARS {
            return true;
        }
    }

    false
}

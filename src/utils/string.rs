/// Last segment of `path` after `separator`, or the whole string.
pub fn last_segment(path: &str, separator: char) -> &str {
    path.rsplit(separator).next().unwrap_or(path)
}

/// Converts an output key such as `ServiceEndpoint` or `user-pool.id` to an
/// environment variable name (`SERVICE_ENDPOINT`, `USER_POOL_ID`).
pub fn to_env_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 && !out.is_empty() && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        } else if c.is_ascii_digit()
            && i > 0
            && chars[i - 1].is_ascii_alphabetic()
            && !out.ends_with('_')
        {
            out.push('_');
        }

        out.push(c.to_ascii_uppercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Splits a comma separated list, trimming entries and dropping empty ones.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

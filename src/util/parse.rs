/// Parses a role, user or channel mention (`<@&1>`, `<@!1>`, `<#1>`) or a bare id.
pub fn parse_snowflake(value: &str) -> Option<u64> {
    let trimmed = value
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_start_matches(['@', '#', '&', '!']);

    trimmed.parse().ok().filter(|id| *id > 0)
}

/// Splits a comma or whitespace separated list of mentions/ids, skipping invalid entries.
pub fn parse_snowflake_list(value: &str) -> Vec<u64> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(parse_snowflake)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mentions_and_ids() {
        assert_eq!(parse_snowflake("<@&42>"), Some(42));
        assert_eq!(parse_snowflake("<@!42>"), Some(42));
        assert_eq!(parse_snowflake("<#42>"), Some(42));
        assert_eq!(parse_snowflake(" 42 "), Some(42));
        assert_eq!(parse_snowflake("0"), None);
        assert_eq!(parse_snowflake("role"), None);
    }

    #[test]
    fn parses_mixed_list() {
        assert_eq!(parse_snowflake_list("<@&1>, 2 nope <@&3>"), vec![1, 2, 3]);
        assert!(parse_snowflake_list("").is_empty());
    }
}

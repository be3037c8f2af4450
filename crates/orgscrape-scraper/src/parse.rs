//! Token heuristics for the combined top-card lines.
//!
//! Both helpers split on single spaces and pick tokens by position. They are
//! deliberately naive: a location containing a number, or an employee line
//! without the trailing "employees" word, is split wrongly, and that output
//! is kept as is so exports stay comparable across runs.

/// Splits `"<location> <count> followers"` into `(location, followers)`.
///
/// The last two space-delimited tokens are the followers; everything before
/// them, rejoined with single spaces, is the location. Empty input gives two
/// empty strings.
#[must_use]
pub fn split_location_followers(line: &str) -> (String, String) {
    if line.is_empty() {
        return (String::new(), String::new());
    }
    let tokens: Vec<&str> = line.split(' ').collect();
    let cut = tokens.len().saturating_sub(2);
    (tokens[..cut].join(" "), tokens[cut..].join(" "))
}

/// Pulls the employee count out of `"View all 1,234 employees"`.
///
/// Takes the second-to-last space-delimited token and strips `,` thousands
/// separators. Input with fewer than two tokens (including the empty string)
/// gives an empty string.
#[must_use]
pub fn employee_count(line: &str) -> String {
    if line.is_empty() {
        return String::new();
    }
    let tokens: Vec<&str> = line.split(' ').collect();
    match tokens.len().checked_sub(2) {
        Some(index) => tokens[index].replace(',', ""),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_last_two_tokens_as_followers() {
        let (location, followers) = split_location_followers("Bengaluru, India 50,000 followers");
        assert_eq!(location, "Bengaluru, India");
        assert_eq!(followers, "50,000 followers");
    }

    #[test]
    fn empty_line_gives_empty_location_and_followers() {
        assert_eq!(
            split_location_followers(""),
            (String::new(), String::new())
        );
    }

    #[test]
    fn two_tokens_are_all_followers() {
        let (location, followers) = split_location_followers("12 followers");
        assert_eq!(location, "");
        assert_eq!(followers, "12 followers");
    }

    #[test]
    fn single_token_is_followers() {
        let (location, followers) = split_location_followers("Remote");
        assert_eq!(location, "");
        assert_eq!(followers, "Remote");
    }

    #[test]
    fn location_without_followers_is_misread() {
        // Known limitation: the rule is positional, not semantic.
        let (location, followers) = split_location_followers("San Francisco, California");
        assert_eq!(location, "San");
        assert_eq!(followers, "Francisco, California");
    }

    #[test]
    fn repeated_spaces_are_kept_as_empty_tokens() {
        let (location, followers) = split_location_followers("Pune,  India 9 followers");
        assert_eq!(location, "Pune,  India");
        assert_eq!(followers, "9 followers");
    }

    #[test]
    fn employee_count_strips_separators() {
        assert_eq!(employee_count("View all 1,234 employees"), "1234");
    }

    #[test]
    fn employee_count_large_number() {
        assert_eq!(employee_count("View all 317,240 employees"), "317240");
    }

    #[test]
    fn employee_count_empty_line() {
        assert_eq!(employee_count(""), "");
    }

    #[test]
    fn employee_count_single_token() {
        assert_eq!(employee_count("employees"), "");
    }

    #[test]
    fn employee_count_without_suffix_takes_wrong_token() {
        // Known limitation: without the trailing word the label is picked up.
        assert_eq!(employee_count("View all 1,234"), "all");
    }
}

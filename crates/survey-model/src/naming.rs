//! Type-name helpers for generated schema identifiers

/// Turn an identifier into a type-name-safe PascalCase name
///
/// `state_of_js` → `StateOfJs`, `js2022` → `Js2022`, `front-end` → `FrontEnd`.
/// Characters that are neither alphanumeric nor separators are dropped.
#[must_use]
pub fn graphqlize(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for part in id.split(['_', '-', ' ']) {
        let mut chars = part.chars().filter(char::is_ascii_alphanumeric);
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_to_pascal() {
        assert_eq!(graphqlize("state_of_js"), "StateOfJs");
        assert_eq!(graphqlize("disability_status"), "DisabilityStatus");
    }

    #[test]
    fn keeps_digits_and_inner_casing() {
        assert_eq!(graphqlize("js2022"), "Js2022");
        assert_eq!(graphqlize("stateOfCss"), "StateOfCss");
    }

    #[test]
    fn dashes_and_noise() {
        assert_eq!(graphqlize("front-end"), "FrontEnd");
        assert_eq!(graphqlize("a__b"), "AB");
        assert_eq!(graphqlize("what?!"), "What");
        assert_eq!(graphqlize(""), "");
    }
}

//! Free-text ingredient splitting.
//!
//! Splits lines like "1 1/2 cups flour" into (quantity, unit, name). This
//! is a best-effort whitespace heuristic, not a grammar: a line with no
//! parsable leading quantity becomes a bare name with quantity 1.0.

/// An ingredient line split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
}

/// Split an ingredient line into quantity, unit, and name.
///
/// The leading quantity may be an integer, a decimal, a simple fraction
/// ("1/2"), or a mixed number ("1 1/2", consuming two tokens). The next
/// token is the unit and the remainder is the name. Fewer tokens degrade:
/// quantity plus a single token means no unit; no parsable quantity means
/// the whole line is the name.
pub fn split_ingredient(raw: &str) -> ParsedIngredient {
    let raw = raw.trim();
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let (quantity, consumed) = take_quantity(&tokens);

    let Some(quantity) = quantity else {
        return ParsedIngredient {
            quantity: 1.0,
            unit: String::new(),
            name: raw.to_string(),
        };
    };

    let rest = &tokens[consumed..];
    let (unit, name) = match rest {
        [] => (String::new(), String::new()),
        [name] => (String::new(), (*name).to_string()),
        [unit, name @ ..] => ((*unit).to_string(), name.join(" ")),
    };

    ParsedIngredient {
        quantity,
        unit,
        name,
    }
}

/// Parse a leading quantity from the token list.
/// Returns the quantity and how many tokens it consumed.
fn take_quantity(tokens: &[&str]) -> (Option<f64>, usize) {
    match tokens {
        [first, second, ..] if is_integer(first) && is_fraction(second) => {
            match (parse_quantity(first), parse_quantity(second)) {
                (Some(whole), Some(frac)) => (Some(whole + frac), 2),
                _ => (None, 0),
            }
        }
        [first, ..] => match parse_quantity(first) {
            Some(q) => (Some(q), 1),
            None => (None, 0),
        },
        [] => (None, 0),
    }
}

/// Parse a single quantity token: integer, decimal, or simple fraction.
/// Negative values and division by zero parse to nothing.
pub fn parse_quantity(token: &str) -> Option<f64> {
    if let Some((numerator, denominator)) = token.split_once('/') {
        let numerator: f64 = numerator.parse().ok()?;
        let denominator: f64 = denominator.parse().ok()?;
        if denominator == 0.0 || numerator < 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    token.parse::<f64>().ok().filter(|q| *q >= 0.0)
}

fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn is_fraction(token: &str) -> bool {
    match token.split_once('/') {
        Some((numerator, denominator)) => is_integer(numerator) && is_integer(denominator),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_quantity_unit_name() {
        let result = split_ingredient("2 cups flour");
        assert_eq!(result.quantity, 2.0);
        assert_eq!(result.unit, "cups");
        assert_eq!(result.name, "flour");
    }

    #[test]
    fn test_mixed_number() {
        let result = split_ingredient("1 1/2 cups flour");
        assert_eq!(result.quantity, 1.5);
        assert_eq!(result.unit, "cups");
        assert_eq!(result.name, "flour");
    }

    #[test]
    fn test_simple_fraction() {
        let result = split_ingredient("1/2 cup sugar");
        assert_eq!(result.quantity, 0.5);
        assert_eq!(result.unit, "cup");
        assert_eq!(result.name, "sugar");
    }

    #[test]
    fn test_decimal_quantity() {
        let result = split_ingredient("2.5 oz cream cheese");
        assert_eq!(result.quantity, 2.5);
        assert_eq!(result.unit, "oz");
        assert_eq!(result.name, "cream cheese");
    }

    #[test]
    fn test_single_token_is_name() {
        let result = split_ingredient("flour");
        assert_eq!(result.quantity, 1.0);
        assert_eq!(result.unit, "");
        assert_eq!(result.name, "flour");
    }

    #[test]
    fn test_quantity_and_name_without_unit() {
        let result = split_ingredient("3 eggs");
        assert_eq!(result.quantity, 3.0);
        assert_eq!(result.unit, "");
        assert_eq!(result.name, "eggs");
    }

    #[test]
    fn test_no_leading_quantity_keeps_whole_line() {
        let result = split_ingredient("Salt to taste");
        assert_eq!(result.quantity, 1.0);
        assert_eq!(result.unit, "");
        assert_eq!(result.name, "Salt to taste");
    }

    #[test]
    fn test_multi_word_name() {
        let result = split_ingredient("2 cups all purpose flour");
        assert_eq!(result.quantity, 2.0);
        assert_eq!(result.unit, "cups");
        assert_eq!(result.name, "all purpose flour");
    }

    #[test]
    fn test_zero_denominator_defaults() {
        let result = split_ingredient("1/0 cup sugar");
        assert_eq!(result.quantity, 1.0);
        assert_eq!(result.name, "1/0 cup sugar");
    }

    #[test]
    fn test_parse_quantity_rejects_negative() {
        assert_eq!(parse_quantity("-2"), None);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let result = split_ingredient("  1 cup   butter  ");
        assert_eq!(result.quantity, 1.0);
        assert_eq!(result.unit, "cup");
        assert_eq!(result.name, "butter");
    }
}

use pest::Parser;

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct ForParser;

/// A parsed `s-for` value. `item` and `index` keep their `$` sigil; `items`
/// is the raw source expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub item: Option<String>,
    pub index: Option<String>,
    pub items: String,
}

impl ForLoop {
    /// A numeric-literal source compiles to a counted loop rather than an
    /// iteration.
    pub fn is_counted(&self) -> bool {
        !self.items.is_empty() && self.items.bytes().all(|b| b.is_ascii_digit())
    }
}

pub fn parse_for_value(value: &str) -> Result<ForLoop, String> {
    let mut pairs = ForParser::parse(Rule::for_value, value).map_err(|e| e.to_string())?;
    let root = pairs.next().ok_or_else(|| "empty s-for value".to_string())?;

    let mut item = None;
    let mut index = None;
    let mut items = String::new();

    for p in root.into_inner() {
        match p.as_rule() {
            Rule::binding => {
                for b in p.into_inner() {
                    match b.as_rule() {
                        Rule::item => item = Some(b.as_str().to_string()),
                        Rule::index => index = Some(normalize_index(b.as_str())),
                        _ => {}
                    }
                }
            }
            Rule::items => items = p.as_str().trim().to_string(),
            _ => {}
        }
    }
    Ok(ForLoop { item, index, items })
}

/// The index may be written with any number of `$` sigils (or none);
/// normalize to exactly one.
fn normalize_index(raw: &str) -> String {
    format!("${}", raw.trim_start_matches('$'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesized_binding() {
        let f = parse_for_value("($item, $index) in $items").unwrap();
        assert_eq!(f.item.as_deref(), Some("$item"));
        assert_eq!(f.index.as_deref(), Some("$index"));
        assert_eq!(f.items, "$items");
        assert!(!f.is_counted());
    }

    #[test]
    fn bare_binding() {
        let f = parse_for_value("$row in $rows").unwrap();
        assert_eq!(f.item.as_deref(), Some("$row"));
        assert_eq!(f.index, None);
        assert_eq!(f.items, "$rows");
    }

    #[test]
    fn numeric_source_is_counted() {
        let f = parse_for_value("$i in 10").unwrap();
        assert!(f.is_counted());
        assert_eq!(f.items, "10");
    }

    #[test]
    fn index_sigils_normalized() {
        let f = parse_for_value("($v, idx) in $xs").unwrap();
        assert_eq!(f.index.as_deref(), Some("$idx"));
        let g = parse_for_value("($v, $$idx) in $xs").unwrap();
        assert_eq!(g.index.as_deref(), Some("$idx"));
    }

    #[test]
    fn missing_in_is_an_error() {
        assert!(parse_for_value("$items").is_err());
    }
}

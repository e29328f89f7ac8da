//! Every PHP fragment the compiler produces, in one place.

/// Textual receiver for names resolved against the registered-functions
/// table at render time.
pub const DISPATCH_PREFIX: &str = "$this->";

pub fn php_if(expr: &str) -> String {
    format!("<?php if({}): ?>", expr)
}

pub fn php_elseif(expr: &str) -> String {
    format!("<?php elseif({}): ?>", expr)
}

pub fn php_else() -> &'static str {
    "<?php else: ?>"
}

pub fn php_endif() -> &'static str {
    "<?php endif; ?>"
}

pub fn php_foreach(items: &str, item: &str) -> String {
    format!("<?php foreach({} as {}): ?>", items, item)
}

pub fn php_foreach_keyed(items: &str, index: &str, item: &str) -> String {
    format!("<?php foreach({} as {} => {}): ?>", items, index, item)
}

pub fn php_endforeach() -> &'static str {
    "<?php endforeach; ?>"
}

/// Counted loop for a numeric-literal source: `0 <= counter < bound`.
pub fn php_for_counted(counter: &str, bound: &str) -> String {
    format!(
        "<?php for({c} = 0; {c} < {b}; {c}++): ?>",
        c = counter,
        b = bound
    )
}

pub fn php_endfor() -> &'static str {
    "<?php endfor; ?>"
}

pub fn php_echo_escaped(expr: &str) -> String {
    format!("<?php echo htmlentities((string) ({}), ENT_QUOTES); ?>", expr)
}

pub fn php_echo_raw(expr: &str) -> String {
    format!("<?php echo {}; ?>", expr)
}

/// Render-time translation call. The blueprint arrives pre-escaped against
/// single quotes; `params` is the raw parameters expression (`[]` when the
/// template gave none); `key` is the explicit lookup key of a typed
/// `s-translate:<key>`.
pub fn php_translate(blueprint: &str, params: &str, key: Option<&str>) -> String {
    let params = if params.trim().is_empty() { "[]" } else { params };
    match key {
        Some(k) => format!(
            "<?php echo $this->translate('{}', {}, '{}'); ?>",
            blueprint,
            params,
            escape_quotes(k, '\'')
        ),
        None => format!("<?php echo $this->translate('{}', {}); ?>", blueprint, params),
    }
}

/// Dynamic partial include; the `true` flag asks the host for the rendered
/// result rather than the compiled source.
pub fn php_partial(expr: &str) -> String {
    format!("<?php echo $this->partial({}, true); ?>", expr)
}

/// Single-form boolean attribute: present when the expression is truthy.
pub fn php_bool_attr(attr: &str, expr: &str) -> String {
    format!("<?php if({}) echo ' {}'; ?>", expr, attr)
}

/// Two-form boolean attribute: always present, value picked by truthiness.
pub fn php_two_form_attr(attr: &str, expr: &str, on: &str, off: &str) -> String {
    format!(
        "<?php echo ({e}) ? ' {a}=\"{on}\"' : ' {a}=\"{off}\"'; ?>",
        e = expr,
        a = attr,
        on = on,
        off = off
    )
}

/// Escape `quote` in `s` by backslash-counting: a quote preceded by an even
/// number of backslashes (including zero) gains one, an already-escaped
/// quote is left alone.
pub fn escape_quotes(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut backslashes = 0usize;
    for c in s.chars() {
        if c == quote && backslashes % 2 == 0 {
            out.push('\\');
        }
        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escaping_counts_backslashes() {
        assert_eq!(escape_quotes("it's", '\''), "it\\'s");
        assert_eq!(escape_quotes("it\\'s", '\''), "it\\'s");
        assert_eq!(escape_quotes("it\\\\'s", '\''), "it\\\\\\'s");
        assert_eq!(escape_quotes("plain", '\''), "plain");
    }

    #[test]
    fn translate_defaults_empty_params() {
        assert_eq!(
            php_translate("Hi", "", None),
            "<?php echo $this->translate('Hi', []); ?>"
        );
        assert_eq!(
            php_translate("Hi", "['n' => 1]", Some("home.greet")),
            "<?php echo $this->translate('Hi', ['n' => 1], 'home.greet'); ?>"
        );
    }
}

/// A `{{ … }}` or `{!! … !!}` occurrence in a text fragment. `begin` and
/// `end` are byte positions of the first and last delimiter bytes, `length`
/// spans the whole delimiter pair, and `escape` is true for `{{ … }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpSpan {
    pub begin: usize,
    pub end: usize,
    pub length: usize,
    pub content: String,
    pub escape: bool,
}

/// Single forward pass with one open span at a time. The close style is not
/// required to match the open style: whichever of `}}` / `!!}` appears first
/// closes the span, and the escape flag comes from the opener. Quote state is
/// deliberately not tracked — delimiters count even inside quoted regions.
/// An open without a close produces no span.
pub fn scan_interpolations(text: &str) -> Vec<InterpSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut open: Option<(usize, usize, bool)> = None; // (begin, content_start, escape)
    let mut i = 0usize;

    while i < bytes.len() {
        match open {
            None => {
                if text[i..].starts_with("{!!") {
                    open = Some((i, i + 3, false));
                    i += 3;
                } else if text[i..].starts_with("{{") {
                    open = Some((i, i + 2, true));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            Some((begin, content_start, escape)) => {
                if text[i..].starts_with("!!}") {
                    spans.push(InterpSpan {
                        begin,
                        end: i + 2,
                        length: i + 3 - begin,
                        content: text[content_start..i].to_string(),
                        escape,
                    });
                    open = None;
                    i += 3;
                } else if text[i..].starts_with("}}") {
                    spans.push(InterpSpan {
                        begin,
                        end: i + 1,
                        length: i + 2 - begin,
                        content: text[content_start..i].to_string(),
                        escape,
                    });
                    open = None;
                    i += 2;
                } else {
                    i += 1;
                }
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_and_raw_spans() {
        let spans = scan_interpolations("a {{ $x }} b {!! $y !!} c");
        assert_eq!(spans.len(), 2);
        assert!(spans[0].escape);
        assert_eq!(spans[0].content, " $x ");
        assert!(!spans[1].escape);
        assert_eq!(spans[1].content, " $y ");
        assert_eq!(&"a {{ $x }} b {!! $y !!} c"[spans[0].begin..=spans[0].end], "{{ $x }}");
    }

    #[test]
    fn spans_are_ordered_and_disjoint() {
        let spans = scan_interpolations("{{ a }}{{ b }}{{ c }}");
        assert_eq!(spans.len(), 3);
        for pair in spans.windows(2) {
            assert!(pair[0].end < pair[1].begin);
        }
    }

    #[test]
    fn unbalanced_open_produces_no_span() {
        assert!(scan_interpolations("x {{ $a").is_empty());
        assert!(scan_interpolations("x {!! $a").is_empty());
    }

    #[test]
    fn mismatched_close_style_still_closes() {
        let spans = scan_interpolations("{{ $a !!} rest");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].escape);
        assert_eq!(spans[0].content, " $a ");
    }

    #[test]
    fn length_covers_delimiters() {
        let spans = scan_interpolations("{!! $a !!}");
        assert_eq!(spans[0].length, 10);
        assert_eq!(spans[0].begin, 0);
        assert_eq!(spans[0].end, 9);
    }
}

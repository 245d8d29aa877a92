//! Property tests for the scanner and renderer.

use java_syntax::{parse, preprocess, RenderOptions};
use proptest::prelude::*;

/// Snippets drawn from the characters the scanner cares about. Backslashes
/// are left out since escape decoding is not idempotent.
fn lexical_soup() -> impl Strategy<Value = String> {
    "[ab ;{}()\\[\\]/*'\"\n\t]{0,48}"
}

/// Correctly nested brackets around plain code.
fn balanced() -> impl Strategy<Value = String> {
    let leaf = "[a-z ;=\n]{0,4}";
    leaf.prop_recursive(6, 64, 4, |inner| {
        (
            prop::sample::select(vec![('{', '}'), ('(', ')'), ('[', ']')]),
            prop::collection::vec(inner, 0..4),
            "[a-z ;\n]{0,3}",
        )
            .prop_map(|((open, close), parts, tail)| {
                format!("{open}{}{close}{tail}", parts.concat())
            })
    })
}

proptest! {
    #[test]
    fn identity_rendering_reproduces_preprocessed_text(raw in any::<String>()) {
        let result = parse(&raw);
        prop_assert_eq!(result.render(&RenderOptions::default()), preprocess(&raw));
    }

    #[test]
    fn stripping_is_idempotent(text in lexical_soup()) {
        let once = parse(&text).stripped();
        let twice = parse(&once).stripped();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn balanced_nesting_is_valid(text in balanced()) {
        let result = parse(&text);
        prop_assert!(result.is_valid(), "{}", result.error_message());
        prop_assert_eq!(result.error_message(), "");
    }

    #[test]
    fn stripped_tabified_output_has_no_blank_lines(text in lexical_soup(), width in 1usize..8) {
        let options = RenderOptions::stripped_tabified().tab_width(width);
        let rendered = parse(&text).render(&options);
        for line in rendered.lines() {
            prop_assert!(!line.trim().is_empty(), "blank line in {:?}", rendered);
        }
    }

    #[test]
    fn indentation_is_a_multiple_of_tab_width(text in balanced(), width in 1usize..8) {
        let options = RenderOptions::stripped_tabified().tab_width(width);
        let rendered = parse(&text).render(&options);
        for line in rendered.lines() {
            let indent = line.len() - line.trim_start().len();
            prop_assert_eq!(indent % width, 0, "{:?}", line);
        }
    }
}

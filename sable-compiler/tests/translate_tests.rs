use sable_compiler::{Compiler, CompilerOptions};

fn compile(src: &str) -> String {
    Compiler::new(CompilerOptions::default())
        .compile_str(src, "test")
        .unwrap()
}

#[test]
fn subtree_becomes_a_blueprint_argument() {
    let out = compile(r#"<p s-translate:foo.bar="['name' => $n]">Hi <b>{{ $n }}</b></p>"#);
    assert_eq!(
        out,
        "<p><?php echo $this->translate('Hi <b><?php echo htmlentities((string) ($n), \
         ENT_QUOTES); ?></b>', ['name' => $n], 'foo.bar'); ?></p>"
    );
}

#[test]
fn untyped_translate_omits_the_key() {
    let out = compile("<p s-translate>Welcome back</p>");
    assert_eq!(
        out,
        "<p><?php echo $this->translate('Welcome back', []); ?></p>"
    );
}

#[test]
fn buffered_text_is_single_quote_escaped() {
    let out = compile("<p s-translate>It's here</p>");
    assert!(out.contains(r#"$this->translate('It\'s here', [])"#));
}

#[test]
fn wrapper_element_is_preserved_outside_the_call() {
    let out = compile(r#"<span class="greet" s-translate>Hello</span>"#);
    assert!(out.starts_with(r#"<span class="greet">"#));
    assert!(out.ends_with("</span>"));
    assert!(out.contains("$this->translate('Hello', [])"));
}

#[test]
fn nested_translation_is_fatal_and_names_both_tags() {
    let err = Compiler::new(CompilerOptions::default())
        .compile_str(
            r#"<div s-translate="['a' => 1]"><span s-translate="['b' => 2]">x</span></div>"#,
            "test",
        )
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("translations may not be nested"));
    assert!(msg.contains("div"));
    assert!(msg.contains("span"));
}

#[test]
fn sibling_translations_are_allowed() {
    let out = compile("<p s-translate>one</p><p s-translate>two</p>");
    assert!(out.contains("$this->translate('one', [])"));
    assert!(out.contains("$this->translate('two', [])"));
}

#[test]
fn control_flow_inside_a_blueprint_is_buffered() {
    let out = compile(r#"<p s-translate><b s-if="$x">maybe</b></p>"#);
    assert!(out.contains(r#"$this->translate('<?php if($x): ?><b>maybe</b><?php endif; ?>', [])"#));
}

#[test]
fn transparent_container_as_translation_root() {
    let out = compile("<s-tag s-translate>Hi <b>there</b></s-tag>");
    assert_eq!(
        out,
        "<?php echo $this->translate('Hi <b>there</b>', []); ?>"
    );
}

#[test]
fn params_expression_calls_are_rewritten() {
    let out = compile(r#"<p s-translate="['n' => count($xs)]">x</p>"#);
    assert!(out.contains("['n' => $this->count($xs)]"));
}

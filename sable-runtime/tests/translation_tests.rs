use sable_runtime::{RuntimeError, TranslationTable};

#[test]
fn missing_entries_return_the_blueprint() {
    let table = TranslationTable::new();
    assert_eq!(
        table.translate("Hello <b>you</b>", None, None).unwrap(),
        "Hello <b>you</b>"
    );
}

#[test]
fn keyed_lookup_merges_against_the_blueprint() {
    let mut table = TranslationTable::new();
    table.add("home.greet", "Salut <b></b>!");
    let blueprint = "Hi <b><?php echo htmlentities((string) ($n), ENT_QUOTES); ?></b>";
    let out = table
        .translate(blueprint, Some("home.greet"), None)
        .unwrap();
    assert_eq!(
        out,
        "Salut <b><?php echo htmlentities((string) ($n), ENT_QUOTES); ?></b>!"
    );
}

#[test]
fn blueprint_itself_is_the_fallback_key() {
    let mut table = TranslationTable::new();
    table.add("Good morning", "Bonjour");
    assert_eq!(
        table.translate("Good morning", None, None).unwrap(),
        "Bonjour"
    );
}

#[test]
fn blueprint_tag_attributes_survive_the_merge() {
    let mut table = TranslationTable::new();
    table.add("k", "Voir <a></a>");
    let out = table
        .translate(r#"See <a href="/docs" class="link">docs</a>"#, Some("k"), None)
        .unwrap();
    assert_eq!(out, r#"Voir <a href="/docs" class="link">docs</a>"#);
}

#[test]
fn translated_inner_text_replaces_blueprint_content() {
    let mut table = TranslationTable::new();
    table.add("k", "Avant <b>apres</b>");
    let out = table.translate("Before <b>after</b>", Some("k"), None).unwrap();
    assert_eq!(out, "Avant <b>apres</b>");
}

#[test]
fn unknown_tags_in_the_translation_are_a_mismatch() {
    let mut table = TranslationTable::new();
    table.add("k", "Salut <i>la</i>");
    let err = table
        .translate("Hi <b>there</b>", Some("k"), None)
        .unwrap_err();
    assert_eq!(err, RuntimeError::BlueprintMismatch { tag: "i".into() });
}

#[test]
fn plural_variants_select_by_count() {
    let mut table = TranslationTable::new();
    table.add(
        "apples",
        "{0} keine Apfel|{1} ein Apfel|{2,4} ein paar Apfel|{5,} viele Apfel",
    );
    let t = |n| table.translate("apples", Some("apples"), Some(n)).unwrap();
    assert_eq!(t(0), "keine Apfel");
    assert_eq!(t(1), "ein Apfel");
    assert_eq!(t(3), "ein paar Apfel");
    assert_eq!(t(50), "viele Apfel");
}

#[test]
fn open_ended_lower_bound_matches_upward() {
    let mut table = TranslationTable::new();
    table.add("msgs", "{,0} nothing|{1,} some");
    assert_eq!(
        table.translate("msgs", Some("msgs"), Some(-3)).unwrap(),
        "nothing"
    );
    assert_eq!(
        table.translate("msgs", Some("msgs"), Some(12)).unwrap(),
        "some"
    );
}

#[test]
fn counts_ignore_non_matching_selectors() {
    let mut table = TranslationTable::new();
    table.add("x", "{1} one|fallback");
    assert_eq!(table.translate("x", Some("x"), Some(7)).unwrap(), "fallback");
}

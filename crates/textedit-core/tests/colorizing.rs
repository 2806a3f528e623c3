use textedit_core::TextEditor;
use textedit_lang::{LanguageDefinition, PaletteIndex};

#[test]
fn test_effective_class_prefers_comment_regions() {
    let mut editor = TextEditor::new();
    editor.set_language_definition(LanguageDefinition::c());
    editor.set_text("// note");
    editor.colorize_now();

    let glyph = editor.buffer().line(0)[3];
    assert_eq!(glyph.effective_class(true), PaletteIndex::Comment);
    assert_eq!(glyph.effective_class(false), PaletteIndex::Default);
}

#[test]
fn test_switching_language_recolors_the_document() {
    let mut editor = TextEditor::new();
    editor.set_language_definition(LanguageDefinition::c());
    editor.set_text("SELECT x;");
    editor.colorize_now();
    assert_eq!(editor.buffer().line(0)[0].color, PaletteIndex::Identifier);

    editor.set_language_definition(LanguageDefinition::sql());
    editor.colorize_now();
    assert_eq!(editor.buffer().line(0)[0].color, PaletteIndex::Keyword);
}

#[test]
fn test_sql_keywords_match_case_insensitively() {
    let mut editor = TextEditor::new();
    editor.set_language_definition(LanguageDefinition::sql());
    editor.set_text("select 1");
    editor.colorize_now();
    assert_eq!(editor.buffer().line(0)[0].color, PaletteIndex::Keyword);
}

#[test]
fn test_invalid_patterns_are_skipped_not_fatal() {
    let mut language = LanguageDefinition::new("broken");
    language.token_patterns = vec![
        ("(".to_string(), PaletteIndex::String),
        (r"[0-9]+".to_string(), PaletteIndex::Number),
    ];

    let mut editor = TextEditor::new();
    editor.set_language_definition(language);
    editor.set_text("12 (");
    editor.colorize_now();

    let line = editor.buffer().line(0);
    assert_eq!(line[0].color, PaletteIndex::Number);
    assert_eq!(line[1].color, PaletteIndex::Number);
    assert_eq!(line[3].color, PaletteIndex::Default);
}

#[test]
fn test_language_from_extension() {
    let mut editor = TextEditor::new();
    editor.set_language_from_extension(".lua");
    assert_eq!(editor.language_definition().name, "Lua");

    editor.set_language_from_extension("unknown");
    assert_eq!(editor.language_definition().name, "C");
}

#[test]
fn test_lua_line_comments_use_double_dash() {
    let mut editor = TextEditor::new();
    editor.set_language_definition(LanguageDefinition::lua());
    editor.set_text("x = 1 -- note\ny = 2");
    editor.colorize_now();

    let first = editor.buffer().line(0);
    assert!(first[6].in_line_comment);
    assert!(!first[0].in_line_comment);
    assert!(editor.buffer().line(1).iter().all(|g| !g.in_line_comment));
}

#[test]
fn test_lua_block_opener_reads_as_a_line_comment() {
    // "--[[" starts with the "--" token, and the line-comment token takes
    // precedence, so the comment ends with the line.
    let mut editor = TextEditor::new();
    editor.set_language_definition(LanguageDefinition::lua());
    editor.set_text("--[[ hidden\nx = 1");
    editor.colorize_now();

    let first = editor.buffer().line(0);
    assert!(first.iter().all(|g| g.in_line_comment));
    assert!(first.iter().all(|g| !g.in_block_comment));
    let second = editor.buffer().line(1);
    assert!(second.iter().all(|g| !g.in_line_comment && !g.in_block_comment));
}

#[test]
fn test_known_identifiers_get_their_own_class() {
    let mut editor = TextEditor::new();
    editor.set_language_definition(LanguageDefinition::c());
    editor.set_text("floor(x)");
    editor.colorize_now();

    assert_eq!(editor.buffer().line(0)[0].color, PaletteIndex::KnownIdentifier);
    assert_eq!(editor.buffer().line(0)[6].color, PaletteIndex::Identifier);
}

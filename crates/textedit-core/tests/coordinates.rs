use textedit_core::{Coordinates, TextEditor, is_utf8_continuation, utf8_char_length};

#[test]
fn test_tab_insert_expands_columns() {
    let mut editor = TextEditor::new();
    editor.set_text("abc");
    editor.set_cursor_position(Coordinates::new(0, 1));
    editor.insert_text("\tX");

    assert_eq!(editor.current_line_text(), "a\tXbc");
    // a -> 1, tab jumps to the next multiple of 4, then X, b, c.
    assert_eq!(editor.buffer().line_max_column(0), 4 + 1 + 2);
}

#[test]
fn test_character_index_and_column_are_inverse() {
    let mut editor = TextEditor::new();
    editor.set_text("a\tb\twide\n\théllo wörld\nplain");

    for line in 0..editor.line_count() {
        let glyphs = editor.buffer().line(line);
        let mut index = 0;
        while index <= glyphs.len() {
            let column = editor.buffer().character_column(line, index);
            assert_eq!(
                editor.buffer().character_index(Coordinates::new(line, column)),
                index
            );
            if index == glyphs.len() {
                break;
            }
            index += utf8_char_length(glyphs[index].byte);
        }
    }
}

#[test]
fn test_indices_never_point_into_multibyte_interiors() {
    let mut editor = TextEditor::new();
    editor.set_text("héllo wörld");

    let glyphs = editor.buffer().line(0);
    for column in 0..=editor.buffer().line_max_column(0) {
        let index = editor.buffer().character_index(Coordinates::new(0, column));
        if index < glyphs.len() {
            assert!(!is_utf8_continuation(glyphs[index].byte));
        }
    }
}

#[test]
fn test_sanitize_clamps_out_of_range_coordinates() {
    let mut editor = TextEditor::new();
    editor.set_text("short\nlonger line");

    let clamped = editor.buffer().sanitize(Coordinates::new(0, 99));
    assert_eq!(clamped, Coordinates::new(0, 5));

    let clamped = editor.buffer().sanitize(Coordinates::new(42, 3));
    assert_eq!(clamped.line, 1);
    assert_eq!(clamped.column, editor.buffer().line_max_column(1));
}

#[test]
fn test_cursor_position_is_sanitized_on_read() {
    let mut editor = TextEditor::new();
    editor.set_text("ab");
    editor.set_cursor_position(Coordinates::new(7, 7));
    assert_eq!(editor.cursor_position(), Coordinates::new(0, 2));
}

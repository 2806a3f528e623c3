use textedit_core::{Coordinates, SelectionMode, TextEditor};

#[test]
fn test_duplicate_line_inserts_a_copy_below() {
    let mut editor = TextEditor::new();
    editor.set_text("one\ntwo");
    editor.set_cursor_position(Coordinates::new(0, 2));
    editor.duplicate_line();

    assert_eq!(editor.text(), "one\none\ntwo");
    assert_eq!(editor.cursor_position().line, 1);
    editor.undo(1);
    assert_eq!(editor.text(), "one\ntwo");
}

#[test]
fn test_duplicate_multi_line_selection() {
    let mut editor = TextEditor::new();
    editor.set_text("a\nb\nc");
    editor.set_selection(Coordinates::new(0, 0), Coordinates::new(1, 1), SelectionMode::Normal);
    editor.set_cursor_position(Coordinates::new(0, 0));
    editor.duplicate_line();

    assert_eq!(editor.text(), "a\nb\na\nb\nc");
    assert_eq!(
        editor.selection(),
        (Coordinates::new(2, 0), Coordinates::new(4, 0))
    );
    editor.undo(1);
    assert_eq!(editor.text(), "a\nb\nc");
}

#[test]
fn test_shift_line_up_swaps_and_undoes() {
    let mut editor = TextEditor::new();
    editor.set_text("one\ntwo\nthree");
    editor.set_cursor_position(Coordinates::new(1, 0));
    editor.shift_line_up();

    assert_eq!(editor.text(), "two\none\nthree");
    assert_eq!(editor.cursor_position(), Coordinates::new(0, 0));

    editor.undo(1);
    assert_eq!(editor.text(), "one\ntwo\nthree");
    editor.redo(1);
    assert_eq!(editor.text(), "two\none\nthree");
}

#[test]
fn test_shift_line_down_swaps_and_undoes() {
    let mut editor = TextEditor::new();
    editor.set_text("one\ntwo\nthree");
    editor.set_cursor_position(Coordinates::new(0, 1));
    editor.shift_line_down();

    assert_eq!(editor.text(), "two\none\nthree");
    assert_eq!(editor.cursor_position().line, 1);

    editor.undo(1);
    assert_eq!(editor.text(), "one\ntwo\nthree");
}

#[test]
fn test_shift_at_document_edges_is_a_noop() {
    let mut editor = TextEditor::new();
    editor.set_text("one\ntwo");

    editor.set_cursor_position(Coordinates::new(0, 0));
    editor.shift_line_up();
    assert_eq!(editor.text(), "one\ntwo");
    assert!(!editor.can_undo());

    editor.set_cursor_position(Coordinates::new(1, 0));
    editor.shift_line_down();
    assert_eq!(editor.text(), "one\ntwo");
    assert!(!editor.can_undo());
}

#[test]
fn test_duplicate_line_shifts_breakpoints_below() {
    let mut editor = TextEditor::new();
    editor.set_text("one\ntwo");
    editor.toggle_breakpoint(1);
    editor.set_cursor_position(Coordinates::new(0, 0));
    editor.duplicate_line();

    assert!(editor.breakpoints().contains(&2));
    assert!(!editor.breakpoints().contains(&1));
}

use textedit_core::{Coordinates, SelectionMode, TextEditor};

#[test]
fn test_typing_then_undo_then_redo_round_trips() {
    let mut editor = TextEditor::new();
    for ch in "fn main() {}".chars() {
        editor.enter_char(ch, false);
    }
    let text_after = editor.text();
    let cursor_after = editor.cursor_position();
    let steps = editor.undo_buffer().len();

    editor.undo(steps);
    assert_eq!(editor.text(), "");
    assert_eq!(editor.cursor_position(), Coordinates::new(0, 0));

    editor.redo(steps);
    assert_eq!(editor.text(), text_after);
    assert_eq!(editor.cursor_position(), cursor_after);
}

#[test]
fn test_mixed_edits_round_trip_content_and_state() {
    let mut editor = TextEditor::new();
    editor.set_text("alpha\nbeta");

    editor.set_cursor_position(Coordinates::new(0, 5));
    editor.enter_char('\n', false);
    editor.enter_char('x', false);
    editor.backspace();
    editor.set_cursor_position(Coordinates::new(1, 0));
    editor.delete_char();
    editor.paste("-, ");

    let text_after = editor.text();
    let state_after = editor.cursor_position();
    let steps = editor.undo_buffer().len();

    editor.undo(steps);
    assert_eq!(editor.text(), "alpha\nbeta");

    editor.redo(steps);
    assert_eq!(editor.text(), text_after);
    assert_eq!(editor.cursor_position(), state_after);
}

#[test]
fn test_redo_restores_the_auto_indented_newline() {
    let mut editor = TextEditor::new();
    editor.set_text("  foo");
    editor.set_cursor_position(Coordinates::new(0, 5));
    editor.enter_char('\n', false);
    assert_eq!(editor.text(), "  foo\n  ");
    assert_eq!(editor.cursor_position(), Coordinates::new(1, 2));

    editor.undo(1);
    assert_eq!(editor.text(), "  foo");
    editor.redo(1);
    assert_eq!(editor.text(), "  foo\n  ");
    assert_eq!(editor.cursor_position(), Coordinates::new(1, 2));
}

#[test]
fn test_new_edit_truncates_the_redo_branch() {
    let mut editor = TextEditor::new();
    editor.enter_char('a', false);
    editor.enter_char('b', false);
    editor.undo(1);
    assert!(editor.can_redo());

    editor.enter_char('c', false);
    assert!(!editor.can_redo());
    assert_eq!(editor.text(), "ac");
    assert_eq!(editor.undo_buffer().len(), 2);
}

#[test]
fn test_undo_stops_at_the_beginning_of_history() {
    let mut editor = TextEditor::new();
    editor.enter_char('a', false);
    editor.undo(100);
    assert_eq!(editor.text(), "");
    assert!(!editor.can_undo());
    assert!(editor.can_redo());
}

#[test]
fn test_selection_deletion_is_one_undo_step() {
    let mut editor = TextEditor::new();
    editor.set_text("hello world");
    editor.set_selection(Coordinates::new(0, 0), Coordinates::new(0, 6), SelectionMode::Normal);
    editor.enter_char('H', false);

    assert_eq!(editor.text(), "Hworld");
    assert_eq!(editor.undo_buffer().len(), 1);
    editor.undo(1);
    assert_eq!(editor.text(), "hello world");
}

#[test]
fn test_undo_buffer_can_be_saved_and_restored() {
    let mut editor = TextEditor::new();
    editor.enter_char('a', false);
    editor.enter_char('b', false);

    let saved = editor.undo_buffer().clone();
    let saved_index = editor.undo_index();

    editor.clear_undo_buffer();
    assert!(!editor.can_undo());

    editor.set_undo_buffer(saved, saved_index);
    assert!(editor.can_undo());
    editor.undo(2);
    assert_eq!(editor.text(), "");
}

#[test]
fn test_set_undo_buffer_clamps_the_index() {
    let mut editor = TextEditor::new();
    editor.enter_char('a', false);
    let saved = editor.undo_buffer().clone();
    editor.set_undo_buffer(saved, 99);
    assert_eq!(editor.undo_index(), 1);
}

#[test]
fn test_read_only_disables_undo_and_redo() {
    let mut editor = TextEditor::new();
    editor.enter_char('a', false);
    editor.set_read_only(true);
    assert!(!editor.can_undo());
    editor.undo(1);
    assert_eq!(editor.text(), "a");
}

#[test]
fn test_save_callback_fires_on_save() {
    use std::cell::Cell;
    use std::rc::Rc;

    let mut editor = TextEditor::new();
    let saves = Rc::new(Cell::new(0));
    let counter = Rc::clone(&saves);
    editor.set_save_callback(move || counter.set(counter.get() + 1));

    editor.save();
    editor.save();
    assert_eq!(saves.get(), 2);
}

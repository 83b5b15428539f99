//! Multi-line message collection.
//!
//! One logical message can span several lines; entry ends when a line is a
//! sentinel. What the collected input *means* (message, clear, exit,
//! nothing) is decided here, so the loop and the tests share one
//! classifier.

/// Lines whose trimmed form ends multi-line entry, matched
/// case-insensitively. The sentinel line itself is never part of the
/// message.
pub const SENTINELS: [&str; 4] = ["done", "end", "eof", "exit"];

const CLEAR_COMMAND: &str = "clear";
const EXIT_SENTINEL: &str = "exit";

/// What one round of input collection produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A complete user message: sentinel line excluded, lines joined with
    /// newlines.
    Message(String),
    /// The whole input was the clear command: wipe the screen, keep
    /// reading.
    Clear,
    /// The whole input was the exit sentinel, or the prompt was
    /// interrupted: end the session.
    Exit,
    /// Nothing usable was entered; prompt again.
    Nothing,
}

fn is_sentinel(line: &str) -> bool {
    let trimmed = line.trim();
    SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Collect one logical message from `read_line`. The source yields `None`
/// when the prompt is interrupted, which ends the session immediately.
pub fn collect_message(mut read_line: impl FnMut() -> Option<String>) -> InputEvent {
    let mut lines: Vec<String> = Vec::new();
    let terminator = loop {
        match read_line() {
            None => return InputEvent::Exit,
            Some(line) if is_sentinel(&line) => break line.trim().to_ascii_lowercase(),
            Some(line) => lines.push(line),
        }
    };

    let content = lines.join("\n");
    let trimmed = content.trim();

    if trimmed.eq_ignore_ascii_case(CLEAR_COMMAND) {
        return InputEvent::Clear;
    }
    if trimmed.is_empty() {
        if terminator == EXIT_SENTINEL {
            return InputEvent::Exit;
        }
        return InputEvent::Nothing;
    }
    InputEvent::Message(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lines: &[&str]) -> InputEvent {
        let mut iter = lines.iter().map(|line| line.to_string());
        collect_message(move || iter.next())
    }

    #[test]
    fn lines_accumulate_until_a_sentinel() {
        assert_eq!(
            feed(&["hello", "world", "done"]),
            InputEvent::Message("hello\nworld".to_string())
        );
    }

    #[test]
    fn sentinels_match_case_insensitively_and_trimmed() {
        assert_eq!(
            feed(&["hello", "  DONE  "]),
            InputEvent::Message("hello".to_string())
        );
        assert_eq!(feed(&["hi", "End"]), InputEvent::Message("hi".to_string()));
        assert_eq!(feed(&["hi", "eof"]), InputEvent::Message("hi".to_string()));
    }

    #[test]
    fn blank_lines_are_preserved_inside_a_message() {
        assert_eq!(
            feed(&["first paragraph", "", "second paragraph", "done"]),
            InputEvent::Message("first paragraph\n\nsecond paragraph".to_string())
        );
    }

    #[test]
    fn clear_alone_never_produces_a_message() {
        assert_eq!(feed(&["clear", "done"]), InputEvent::Clear);
        assert_eq!(feed(&["", "clear", "done"]), InputEvent::Clear);
        assert_eq!(feed(&["CLEAR", "done"]), InputEvent::Clear);
    }

    #[test]
    fn clear_inside_a_longer_message_is_ordinary_text() {
        assert_eq!(
            feed(&["clear", "the table", "done"]),
            InputEvent::Message("clear\nthe table".to_string())
        );
    }

    #[test]
    fn exit_as_the_entire_input_ends_the_session() {
        assert_eq!(feed(&["exit"]), InputEvent::Exit);
        assert_eq!(feed(&["EXIT"]), InputEvent::Exit);
    }

    #[test]
    fn exit_after_content_merely_terminates_entry() {
        assert_eq!(
            feed(&["wrap it up", "exit"]),
            InputEvent::Message("wrap it up".to_string())
        );
    }

    #[test]
    fn empty_entry_is_a_no_op() {
        assert_eq!(feed(&["done"]), InputEvent::Nothing);
        assert_eq!(feed(&["", "   ", "end"]), InputEvent::Nothing);
    }

    #[test]
    fn interrupted_prompt_ends_the_session() {
        assert_eq!(feed(&[]), InputEvent::Exit);

        let mut lines = vec![Some("partial message".to_string()), None].into_iter();
        assert_eq!(collect_message(move || lines.next().flatten()), InputEvent::Exit);
    }
}

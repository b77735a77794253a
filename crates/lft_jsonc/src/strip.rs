//! Comment and trailing-comma stripping
//!
//! The scanner keeps exactly one [`State`] at a time and emits every
//! character that is not part of a comment into an output buffer. Comment
//! openers are emitted tentatively (`/`) and retracted once the second
//! character confirms them.

// ============================================================================
// SCANNER STATE
// ----------------------------------------------------------------------------
// State diagram (simplified):
//
//   [Normal] --"--> [InString] --"--> [Normal]
//      |  \            |
//      |   \--\\--> [Escape] <--\\--/   (returns where it came from)
//      |
//      +--/--> [SlashSeen] --/--> [LineComment] --\n--> [Normal]
//                  |   \
//                  |    \--*--> [BlockComment] --*--> [BlockCommentStar] --/--> [Normal]
//                  |
//                  +--other--> [Normal] (character re-scanned)
// ============================================================================

/// Scanner state for the relaxed JSON decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Outside strings and comments.
    Normal,
    /// Inside a double-quoted string literal.
    InString,
    /// The previous character was an unescaped `\`; the next one is literal.
    Escape { in_string: bool },
    /// The previous character was a `/` that may open a comment.
    SlashSeen,
    /// Inside `// ...` up to the next newline.
    LineComment,
    /// Inside `/* ... */`.
    BlockComment,
    /// Inside a block comment, right after a `*`.
    BlockCommentStar,
}

impl State {
    /// Whether the scanner is currently discarding comment text.
    pub fn in_comment(self) -> bool {
        matches!(self, State::LineComment | State::BlockComment | State::BlockCommentStar)
    }
}

/// Single-pass comment stripper.
///
/// Converts relaxed JSON into strict JSON text, handling:
/// - `//` line comments (erased through the terminating newline)
/// - `/* */` block comments (not nested; the first `*/` closes)
/// - trailing commas before `]` and `}`, across whitespace and comments
/// - escapes, so `\"` never ends a string and `\/` never opens a comment
pub struct CommentStripper<'a> {
    chars: std::str::Chars<'a>,
    state: State,
    out: String,
}

impl<'a> CommentStripper<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
            state: State::Normal,
            out: String::with_capacity(source.len()),
        }
    }

    /// Current scanner state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Run the scan to completion and return the stripped text.
    pub fn strip(mut self) -> String {
        while let Some(c) = self.chars.next() {
            self.step(c);
        }
        // An unterminated comment has already been withheld from the output,
        // which amounts to erasing it through end of input. A pending slash
        // stays as it was emitted.
        self.out
    }

    fn step(&mut self, c: char) {
        match self.state {
            State::Escape { in_string } => {
                self.out.push(c);
                self.state = if in_string { State::InString } else { State::Normal };
            }
            State::InString => {
                self.out.push(c);
                match c {
                    '"' => self.state = State::Normal,
                    '\\' => self.state = State::Escape { in_string: true },
                    _ => {}
                }
            }
            State::SlashSeen => match c {
                '/' => self.open_comment(State::LineComment),
                '*' => self.open_comment(State::BlockComment),
                _ => {
                    self.state = State::Normal;
                    self.scan_normal(c);
                }
            },
            State::LineComment => {
                if c == '\n' {
                    self.state = State::Normal;
                }
            }
            State::BlockComment => {
                if c == '*' {
                    self.state = State::BlockCommentStar;
                }
            }
            State::BlockCommentStar => match c {
                '/' => self.state = State::Normal,
                '*' => {}
                _ => self.state = State::BlockComment,
            },
            State::Normal => self.scan_normal(c),
        }
    }

    fn scan_normal(&mut self, c: char) {
        match c {
            '"' => self.state = State::InString,
            '\\' => self.state = State::Escape { in_string: false },
            '/' => self.state = State::SlashSeen,
            ']' | '}' => self.erase_trailing_commas(),
            _ => {}
        }
        self.out.push(c);
    }

    /// Retract the tentative `/` and start discarding comment text.
    fn open_comment(&mut self, state: State) {
        let opener = self.out.pop();
        debug_assert_eq!(opener, Some('/'));
        self.state = state;
    }

    /// Erase commas that precede a closing bracket, skipping whitespace.
    ///
    /// Comments are never in the buffer, so a comment between the comma and
    /// the bracket does not hide the comma.
    fn erase_trailing_commas(&mut self) {
        loop {
            let end = self.out.trim_end().len();
            if !self.out[..end].ends_with(',') {
                break;
            }
            self.out.remove(end - 1);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

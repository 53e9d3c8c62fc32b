//! Character-level lexer for c4c source text.
//!
//! The lexer is a state machine over Unicode scalar values. Each state
//! consumes characters and emits zero or more [`Token`]s before handing
//! over to the next state. Lexing never stops at the first malformed
//! token: an [`TokenKind::Error`] token is emitted in its place and the
//! lexer resynchronizes at the next whitespace boundary, so the result is
//! always a complete token sequence ending in [`TokenKind::Eof`].
//!
//! A line break after an identifier, keyword or string ends the statement.
//! The lexer makes that explicit by emitting a [`TokenKind::Terminator`]
//! covering the line break, the same token an explicit `;` produces.

use std::sync::Arc;

use c4c_core::position::{Position, PositionRange};
use log::{debug, trace};

use crate::{
    error::{LexError, LexErrorKind, ProviderError},
    keyword::Keyword,
    provider::Provider,
    token::{Token, TokenKind},
    token_stream::LexedSource,
};

/// Lexes the source `name` fetched from `provider`.
///
/// # Errors
///
/// Returns the provider's error if the source cannot be loaded. Lex errors
/// are not failures here; they are recorded as Error tokens in the result.
pub fn run(name: &str, provider: &mut dyn Provider) -> Result<LexedSource, ProviderError> {
    let source = provider.source_for(name)?;
    Ok(Lexer::new(name, &source).lex())
}

/// A read position. `last` is the character most recently consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    line: usize,
    column: usize,
    byte: usize,
    last: Option<char>,
}

impl Cursor {
    const START: Cursor = Cursor {
        line: 1,
        column: 0,
        byte: 0,
        last: None,
    };

    /// Moves past `c`. The line only changes once the character after a
    /// line break is read, so a `\n` belongs to the line it ends.
    fn advance(&mut self, c: char) {
        if self.last == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.byte += c.len_utf8();
        self.last = Some(c);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    Space,
    /// Whitespace after an identifier, keyword or string, where a line
    /// break ends the statement.
    SpaceTerminating,
    Identifier,
    String(char),
    Pragma,
    LineComment,
    BlockComment,
    Error,
    Done,
}

/// Lexer over one source file.
///
/// # Examples
///
/// ```
/// use c4c_parser::{Lexer, TokenKind};
///
/// let lexed = Lexer::new("main.c4", "person user\n").run().unwrap();
/// let kinds: Vec<TokenKind> = lexed.tokens().iter().map(|t| t.kind()).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Keyword, TokenKind::Identifier, TokenKind::Terminator, TokenKind::Eof]
/// );
/// ```
pub struct Lexer<'a> {
    name: Arc<str>,
    source: &'a str,

    start: Cursor,
    end: Cursor,
    /// Position before the last read, for a single step of backup.
    saved: Option<Cursor>,
    at_eof: bool,

    tokens: Vec<Token>,
    previous_kind: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(name: impl Into<Arc<str>>, source: &'a str) -> Self {
        Self {
            name: name.into(),
            source,
            start: Cursor::START,
            end: Cursor::START,
            saved: None,
            at_eof: false,
            tokens: Vec::new(),
            previous_kind: None,
        }
    }

    /// Lexes the whole source, keeping Error tokens in place.
    pub fn lex(mut self) -> LexedSource {
        let mut state = State::Root;
        while state != State::Done {
            state = match state {
                State::Root => self.lex_root(),
                State::Space => self.lex_space(),
                State::SpaceTerminating => self.lex_space_terminating(),
                State::Identifier => self.lex_identifier(),
                State::String(quote) => self.lex_string(quote),
                State::Pragma => self.lex_pragma(),
                State::LineComment => self.lex_line_comment(),
                State::BlockComment => self.lex_block_comment(),
                State::Error => self.lex_error(),
                State::Done => State::Done,
            };
        }

        debug!(file = &*self.name, tokens = self.tokens.len(); "Lexed source");
        LexedSource::new(self.name, self.tokens)
    }

    /// Lexes the whole source.
    ///
    /// # Errors
    ///
    /// Returns the first lex error in the source.
    pub fn run(self) -> Result<LexedSource, LexError> {
        let lexed = self.lex();
        match lexed.first_error() {
            Some(err) => Err(err),
            None => Ok(lexed),
        }
    }

    fn lex_root(&mut self) -> State {
        loop {
            let Some(c) = self.next() else {
                if matches!(
                    self.previous_kind,
                    Some(TokenKind::Identifier | TokenKind::String)
                ) {
                    self.emit(TokenKind::Terminator);
                }
                self.emit(TokenKind::Eof);
                return State::Done;
            };

            match c {
                '\'' | '"' | '`' => return State::String(c),
                '=' => self.emit(TokenKind::Assignment),
                '{' => self.emit(TokenKind::StartBlock),
                '}' => self.emit(TokenKind::EndBlock),
                '!' => self.emit(TokenKind::Directive),
                ';' => self.emit(TokenKind::Terminator),
                '#' => return State::Pragma,
                '/' if self.accept('/') => return State::LineComment,
                '/' if self.accept('*') => return State::BlockComment,
                '-' if self.accept('>') => self.emit(TokenKind::Relationship),
                'a'..='z' => return State::Identifier,
                c if c.is_whitespace() => {
                    self.backup();
                    return State::Space;
                }
                c => {
                    self.emit_error(LexErrorKind::UnexpectedCharacter(c));
                    return State::Error;
                }
            }
        }
    }

    fn lex_space(&mut self) -> State {
        if matches!(
            self.previous_kind,
            Some(TokenKind::Identifier | TokenKind::String)
        ) {
            return State::SpaceTerminating;
        }
        self.accept_while(char::is_whitespace);
        self.discard();
        State::Root
    }

    fn lex_space_terminating(&mut self) -> State {
        loop {
            match self.next() {
                Some('\n') => {
                    self.backup();
                    self.discard();
                    self.next();
                    self.emit(TokenKind::Terminator);
                    return State::Root;
                }
                Some(c) if c.is_whitespace() => {}
                None => {
                    self.discard();
                    self.emit(TokenKind::Terminator);
                    self.emit(TokenKind::Eof);
                    return State::Done;
                }
                Some(_) => {
                    self.backup();
                    self.discard();
                    return State::Root;
                }
            }
        }
    }

    fn lex_identifier(&mut self) -> State {
        self.accept_while(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '-'));

        let source = self.source;
        let text = &source[self.start.byte..self.end.byte];
        if let Some(suffix) = text.chars().last().filter(|c| matches!(c, '.' | '-' | '_')) {
            self.emit_error(LexErrorKind::IllegalIdentifierSuffix(suffix));
            return State::Error;
        }

        match Keyword::lookup(text) {
            Some(_) => self.emit(TokenKind::Keyword),
            None => self.emit(TokenKind::Identifier),
        }
        State::SpaceTerminating
    }

    /// Runs after the opening `quote` was consumed. Backtick strings may
    /// span lines and take no escapes.
    fn lex_string(&mut self, quote: char) -> State {
        let multiline = quote == '`';
        let mut escaped = false;
        loop {
            match self.next() {
                None => {
                    self.emit_error(LexErrorKind::UnterminatedString);
                    self.emit(TokenKind::Eof);
                    return State::Done;
                }
                Some('\n') if !multiline => {
                    self.emit_error(LexErrorKind::NewlineInString);
                    return State::Error;
                }
                Some(_) if escaped => escaped = false,
                Some('\\') if !multiline => escaped = true,
                Some(c) if c == quote => {
                    self.emit(TokenKind::String);
                    return State::SpaceTerminating;
                }
                Some(_) => {}
            }
        }
    }

    fn lex_pragma(&mut self) -> State {
        self.accept_while(|c| c.is_ascii_lowercase() || c == '_');
        self.emit(TokenKind::Pragma);
        State::Space
    }

    fn lex_line_comment(&mut self) -> State {
        self.accept_while(|c| c != '\n');
        self.discard();
        State::Space
    }

    fn lex_block_comment(&mut self) -> State {
        loop {
            match self.next() {
                None => {
                    self.emit_error(LexErrorKind::UnterminatedBlockComment);
                    self.emit(TokenKind::Eof);
                    return State::Done;
                }
                Some('*') if self.accept('/') => {
                    self.discard();
                    return State::Root;
                }
                Some(_) => {}
            }
        }
    }

    /// Skips the rest of a malformed token.
    fn lex_error(&mut self) -> State {
        if self.at_eof {
            self.emit(TokenKind::Eof);
            return State::Done;
        }
        match self.end.last {
            Some(c) if !c.is_whitespace() => {
                self.accept_while(|c| !c.is_whitespace());
                self.discard();
                State::Root
            }
            _ => State::Space,
        }
    }

    /// Reads one character. `None` at the end of input, which does not move
    /// the cursor.
    fn next(&mut self) -> Option<char> {
        self.saved = Some(self.end);
        let c = self.source[self.end.byte..].chars().next();
        match c {
            Some(c) => self.end.advance(c),
            None => self.at_eof = true,
        }
        c
    }

    /// Undoes the last [`Lexer::next`], including across a line break.
    fn backup(&mut self) {
        let Some(saved) = self.saved.take() else {
            panic!("lexer backed up twice without reading");
        };
        self.end = saved;
        self.at_eof = false;
    }

    fn accept(&mut self, expected: char) -> bool {
        if self.next() == Some(expected) {
            return true;
        }
        self.backup();
        false
    }

    fn accept_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.next() {
            if !predicate(c) {
                break;
            }
        }
        self.backup();
    }

    /// Drops everything read since the last token.
    ///
    /// A token ending in a line break leaves the start on the next line.
    fn discard(&mut self) {
        self.start = self.end;
        if self.end.last == Some('\n') {
            self.start.line += 1;
            self.start.column = 0;
        }
    }

    fn current_range(&self) -> PositionRange {
        let position =
            |c: &Cursor| Position::new(Arc::clone(&self.name), c.line, c.column, c.byte);
        PositionRange::new(position(&self.start), position(&self.end))
    }

    fn emit(&mut self, kind: TokenKind) {
        let range = self.current_range();
        trace!(kind:% = kind, range:% = range; "Emitting token");
        self.tokens.push(Token::new(kind, range));
        self.previous_kind = Some(kind);
        self.discard();
    }

    fn emit_error(&mut self, kind: LexErrorKind) {
        let range = self.current_range();
        trace!(error:% = kind, range:% = range; "Emitting error token");
        self.tokens.push(Token::error(range, kind));
        self.previous_kind = Some(TokenKind::Error);
        self.discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new("main.c4", source)
            .lex()
            .tokens()
            .iter()
            .map(Token::kind)
            .collect()
    }

    fn span(token: &Token) -> ((usize, usize, usize), (usize, usize, usize)) {
        let start = token.range().start();
        let end = token.range().end();
        (
            (start.line(), start.column(), start.byte_offset()),
            (end.line(), end.column(), end.byte_offset()),
        )
    }

    use TokenKind::{
        Assignment, Directive, EndBlock, Eof, Error, Identifier, Keyword, Pragma, Relationship,
        StartBlock, String, Terminator,
    };

    #[test]
    fn test_strings() {
        assert_eq!(kinds(r#""this is a string""#), [String, Terminator, Eof]);
        assert_eq!(
            kinds(r#""this is a string"  "this is another""#),
            [String, String, Terminator, Eof]
        );
        assert_eq!(kinds(r#"'yay for "me"'"#), [String, Terminator, Eof]);
        assert_eq!(kinds(r#""still one \"string\"""#), [String, Terminator, Eof]);
        assert_eq!(kinds(r#""\\""#), [String, Terminator, Eof]);
    }

    #[test]
    fn test_identifiers_and_comments() {
        assert_eq!(
            kinds(r#""this is a string"  thisIsAnIdentifier "and another string""#),
            [String, Identifier, String, Terminator, Eof]
        );
        assert_eq!(
            kinds(r#""this is a string"  thisIsAnIdentifier // this all gets ignored"#),
            [String, Identifier, Terminator, Eof]
        );
        assert_eq!(
            kinds(r#""string val" id = { } //comment"#),
            [String, Identifier, Assignment, StartBlock, EndBlock, Eof]
        );
    }

    #[test]
    fn test_block_comments() {
        let source = "
            {
                /* this is a
                block comment */
            }
        ";
        assert_eq!(kinds(source), [StartBlock, EndBlock, Eof]);

        let source = r#"
            {
                "foo" /* this is a block comment */"bar"
            }
        "#;
        assert_eq!(kinds(source), [StartBlock, String, String, Terminator, EndBlock, Eof]);
    }

    #[test]
    fn test_statement_termination() {
        let newline = kinds("baz foo bar\n\t\t\tfoo \"yay for me\"");
        let explicit = kinds(r#"baz foo bar; foo "yay for me";"#);
        let expected = [
            Identifier, Identifier, Identifier, Terminator, Identifier, String, Terminator, Eof,
        ];
        assert_eq!(newline, expected);
        assert_eq!(explicit, expected);
    }

    #[test]
    fn test_newline_after_comment_terminates() {
        assert_eq!(
            kinds("\"foo\" /* note */\n}"),
            [String, Terminator, EndBlock, Eof]
        );
        assert_eq!(
            kinds("user // the user\n}"),
            [Identifier, Terminator, EndBlock, Eof]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds(r#"workspace "workspace" model foobar"#),
            [Keyword, String, Keyword, Identifier, Terminator, Eof]
        );
        assert_eq!(kinds("softwareSystem"), [Keyword, Terminator, Eof]);
    }

    #[test]
    fn test_real_workspace() {
        let source = r#"
            workspace foo {
                description "I'm a real boy now"
                model {}
                views {}
            }
        "#;
        assert_eq!(
            kinds(source),
            [
                Keyword, Identifier, StartBlock, Keyword, String, Terminator, Keyword, StartBlock,
                EndBlock, Keyword, StartBlock, EndBlock, EndBlock, Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_before_line_break_terminates() {
        assert_eq!(kinds("model\n{"), [Keyword, Terminator, StartBlock, Eof]);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("a -> b ! #include"),
            [Identifier, Relationship, Identifier, Directive, Pragma, Eof]
        );
        assert_eq!(kinds(r#""foo" #include_file"#), [String, Pragma, Eof]);
    }

    #[test]
    fn test_unicode_positions() {
        let lexed = Lexer::new("main.c4", "\"👍\"").run().unwrap();
        let token = &lexed.tokens()[0];
        assert!(token.is(String));
        assert_eq!(span(token), ((1, 0, 0), (1, 3, 6)));
        assert_eq!(token.bytes_at("\"👍\""), "\"👍\"");
    }

    #[test]
    fn test_positions_across_lines() {
        let source = "'string'\n'string'";
        let lexed = Lexer::new("main.c4", source).run().unwrap();
        let tokens = lexed.tokens();

        assert_eq!(span(&tokens[0]), ((1, 0, 0), (1, 8, 8)));
        assert!(tokens[1].is(Terminator));
        assert_eq!(span(&tokens[1]), ((1, 8, 8), (1, 9, 9)));
        assert_eq!(tokens[1].bytes_at(source), "\n");
        assert_eq!(span(&tokens[2]), ((2, 0, 9), (2, 8, 17)));
        assert_eq!(tokens[2].bytes_at(source), "'string'");
    }

    #[test]
    fn test_indented_positions() {
        let source = "{\n\n  user\n}";
        let lexed = Lexer::new("main.c4", source).run().unwrap();
        let user = &lexed.tokens()[1];
        assert_eq!(user.bytes_at(source), "user");
        assert_eq!(span(user), ((3, 2, 5), (3, 6, 9)));
    }

    #[test]
    fn test_eof_terminator_is_empty() {
        let lexed = Lexer::new("main.c4", "user").run().unwrap();
        let tokens = lexed.tokens();
        assert!(tokens[1].is(Terminator));
        assert!(tokens[1].range().is_empty());
        assert!(tokens[2].is(Eof));
        assert_eq!(tokens[2].range().start().byte_offset(), 4);
    }

    #[test]
    fn test_multiline_backtick_string() {
        let source = "`first\n  second` x";
        let lexed = Lexer::new("main.c4", source).run().unwrap();
        let token = &lexed.tokens()[0];
        assert!(token.is(String));
        assert_eq!(token.bytes_at(source), "`first\n  second`");
        assert_eq!(token.range().end().line(), 2);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("main.c4", "person 'oops").run().unwrap_err();
        assert_eq!(err.kind(), &LexErrorKind::UnterminatedString);
        assert_eq!(err.token().bytes_at("person 'oops"), "'oops");

        assert_eq!(kinds("person 'oops"), [Keyword, Error, Eof]);
    }

    #[test]
    fn test_newline_in_string_recovers() {
        let source = "'broken\nuser";
        assert_eq!(kinds(source), [Error, Identifier, Terminator, Eof]);
        let err = Lexer::new("main.c4", source).run().unwrap_err();
        assert_eq!(err.kind(), &LexErrorKind::NewlineInString);
    }

    #[test]
    fn test_unexpected_character_recovers() {
        let source = "user %%bad others";
        assert_eq!(kinds(source), [Identifier, Error, Identifier, Terminator, Eof]);
        let err = Lexer::new("main.c4", source).run().unwrap_err();
        assert_eq!(err.kind(), &LexErrorKind::UnexpectedCharacter('%'));
        assert_eq!(span(err.token()), ((1, 5, 5), (1, 6, 6)));
    }

    #[test]
    fn test_illegal_identifier_suffix() {
        let err = Lexer::new("main.c4", "user- other").run().unwrap_err();
        assert_eq!(err.kind(), &LexErrorKind::IllegalIdentifierSuffix('-'));
        assert_eq!(kinds("user- other"), [Error, Identifier, Terminator, Eof]);
        assert_eq!(kinds("user_"), [Error, Eof]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = Lexer::new("main.c4", "{ /* never closed").run().unwrap_err();
        assert_eq!(err.kind(), &LexErrorKind::UnterminatedBlockComment);
        assert_eq!(kinds("{ /* never closed"), [StartBlock, Error, Eof]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), [Eof]);
        assert_eq!(kinds("  \n\t"), [Eof]);
    }
}

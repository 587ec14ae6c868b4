//! This module turns scanned tokens into validated automata.
//!
//! Every program consists of the same section sequence:
//!
//! ```text
//! <states>;<initial-state>;<accepting-states>;<symbols>;<transitions>;<initial-config>;<EOF>
//! ```
//!
//! The [`Parser`] cursor implements the sections shared by all variants. The variant compilers
//! in [`dfa`], [`pda`] and [`tm`] add their own transition and initial configuration sections.
//! Compilation stops at the first error; every error raised inside a section is prefixed with
//! the line of the token consumed just before it.

pub mod dfa;
pub mod pda;
pub mod tm;

use crate::automaton::Automaton;
use crate::lexer::{scan, Token, TokenKind};
use crate::types::{AutomatonError, AutomatonKind, State, StateTable, SymbolTable};
use std::collections::HashMap;
use std::hash::Hash;

/// Message reported when the tokens run out in the middle of a transition.
pub(crate) const UNFINISHED_TRANSITION: &str = "unfinished transition";

/// Scans and compiles `source` into an automaton of the requested kind.
///
/// # Errors
///
/// * `AutomatonError::Lex` if the source contains an unscannable character.
/// * `AutomatonError::Syntax`, `Semantic` or `Structural` if the program is invalid.
pub fn compile(kind: AutomatonKind, source: &str) -> Result<Automaton, AutomatonError> {
    let tokens = scan(source)?;
    compile_tokens(kind, &tokens)
}

/// Compiles an already scanned token sequence.
pub fn compile_tokens(kind: AutomatonKind, tokens: &[Token]) -> Result<Automaton, AutomatonError> {
    log::debug!("compiling {kind} from {} tokens", tokens.len());

    let automaton = match kind {
        AutomatonKind::Dfa => Automaton::Dfa(dfa::compile(tokens)?),
        AutomatonKind::Pda => Automaton::Pda(pda::compile(tokens)?),
        AutomatonKind::Tm => Automaton::Tm(tm::compile(tokens)?),
    };

    Ok(automaton)
}

/// An undecorated error raised inside a section.
///
/// The compiler adds the line prefix once the section returns, see [`Parser::decorate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GrammarError {
    Syntax(String),
    Semantic(String),
}

pub(crate) type GrammarResult<T> = Result<T, GrammarError>;

/// The sections every variant starts with.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Header {
    pub states: StateTable,
    pub initial_state: String,
    pub symbols: SymbolTable,
}

/// Cursor over a borrowed token sequence.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Consumes the next token. Callers check [`Parser::is_at_end`] first.
    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Consumes the next token and checks that it has one of the `expected` kinds.
    ///
    /// `at_end` is the message reported when no tokens remain.
    pub fn consume(&mut self, at_end: &str, expected: &[TokenKind]) -> GrammarResult<&'t Token> {
        let token = self
            .advance()
            .ok_or_else(|| GrammarError::Syntax(at_end.to_string()))?;

        if expected.contains(&token.kind) {
            Ok(token)
        } else {
            Err(GrammarError::Syntax(unexpected(expected, token.kind)))
        }
    }

    /// Line of the most recently consumed token, or 0 before the first one.
    pub fn previous_line(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.line)
    }

    /// Prefixes a section error with the line of the most recently consumed token.
    pub fn decorate(&self, error: GrammarError) -> AutomatonError {
        let line = self.previous_line();
        match error {
            GrammarError::Syntax(message) => AutomatonError::Syntax { line, message },
            GrammarError::Semantic(message) => AutomatonError::Semantic { line, message },
        }
    }

    /// Parses the states, initial state, accepting states and symbols sections.
    ///
    /// `reserved` seeds the symbol table so the variant's sentinels can be used in transitions
    /// but never redeclared.
    pub fn header(&mut self, reserved: &[&str]) -> GrammarResult<Header> {
        let mut states = self.states()?;
        let initial_state = self.initial_state(&states)?;
        self.accepting_states(&mut states)?;
        let symbols = self.symbols(reserved.iter().map(|s| s.to_string()).collect())?;

        Ok(Header {
            states,
            initial_state,
            symbols,
        })
    }

    pub fn states(&mut self) -> GrammarResult<StateTable> {
        let mut states = StateTable::new();

        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::Semicolon => {
                    if states.is_empty() {
                        return Err(GrammarError::Semantic(
                            "there must be at least one state defined".to_string(),
                        ));
                    }
                    return Ok(states);
                }
                TokenKind::State => {
                    if states.contains_key(&token.literal) {
                        return Err(GrammarError::Semantic(format!(
                            "state {} already declared, each state must have unique name",
                            token.literal
                        )));
                    }
                    states.insert(token.literal.clone(), State::new(&token.literal));
                }
                kind => {
                    return Err(GrammarError::Syntax(unexpected(
                        &[TokenKind::State, TokenKind::Semicolon],
                        kind,
                    )))
                }
            }
        }

        Err(missing_terminator("states section"))
    }

    pub fn initial_state(&mut self, states: &StateTable) -> GrammarResult<String> {
        let token = self.consume("missing initial state section", &[TokenKind::State])?;

        if !states.contains_key(&token.literal) {
            return Err(GrammarError::Semantic(format!(
                "invalid initial state, state {} was not declared in states list",
                token.literal
            )));
        }

        match self.advance() {
            Some(t) if t.kind == TokenKind::Semicolon => Ok(token.literal.clone()),
            _ => Err(GrammarError::Syntax(
                "missing ';' after initial state".to_string(),
            )),
        }
    }

    pub fn accepting_states(&mut self, states: &mut StateTable) -> GrammarResult<()> {
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::Semicolon => return Ok(()),
                TokenKind::State => match states.get_mut(&token.literal) {
                    Some(state) => state.accepting = true,
                    None => {
                        return Err(GrammarError::Semantic(format!(
                            "state {} not found, any accepting state must be defined in state list",
                            token.literal
                        )))
                    }
                },
                kind => {
                    return Err(GrammarError::Syntax(unexpected(
                        &[TokenKind::State, TokenKind::Semicolon],
                        kind,
                    )))
                }
            }
        }

        Err(missing_terminator("accepting states section"))
    }

    pub fn symbols(&mut self, mut symbols: SymbolTable) -> GrammarResult<SymbolTable> {
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::Semicolon => return Ok(symbols),
                TokenKind::Symbol => {
                    if !symbols.insert(token.literal.clone()) {
                        return Err(GrammarError::Semantic(format!(
                            "symbol {} already declared, each symbol must have unique name",
                            token.literal
                        )));
                    }
                }
                kind => {
                    return Err(GrammarError::Syntax(unexpected(
                        &[TokenKind::Symbol, TokenKind::Semicolon],
                        kind,
                    )))
                }
            }
        }

        Err(missing_terminator("symbols section"))
    }

    /// Parses the transition section, delegating each `( ... ) > ( ... )` to `transition`.
    ///
    /// `transition` is called right after the opening parenthesis has been consumed. A later
    /// transition with the same left-hand side replaces the earlier one.
    pub fn transitions<K, V, F>(&mut self, mut transition: F) -> GrammarResult<HashMap<K, V>>
    where
        K: Eq + Hash,
        F: FnMut(&mut Self) -> GrammarResult<(K, V)>,
    {
        let mut table = HashMap::new();

        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::Semicolon => return Ok(table),
                TokenKind::LeftParen => {
                    let (key, value) = transition(self)?;
                    if table.insert(key, value).is_some() {
                        log::warn!(
                            "[Line {}] transition redefined, the later declaration wins",
                            self.previous_line()
                        );
                    }
                }
                kind => {
                    return Err(GrammarError::Syntax(unexpected(
                        &[TokenKind::LeftParen, TokenKind::Semicolon],
                        kind,
                    )))
                }
            }
        }

        Err(missing_terminator("transitions section"))
    }

    /// Consumes a state token and checks it was declared.
    ///
    /// `side` names the transition side for the diagnostic.
    pub fn declared_state(&mut self, states: &StateTable, side: &str) -> GrammarResult<String> {
        let token = self.consume(UNFINISHED_TRANSITION, &[TokenKind::State])?;

        if !states.contains_key(&token.literal) {
            return Err(GrammarError::Semantic(format!(
                "undefined state {} used in transition function {side} side",
                token.literal
            )));
        }

        Ok(token.literal.clone())
    }

    /// Consumes a symbol-like token of one of `kinds` and checks it was declared.
    ///
    /// `role` (e.g. "input symbol") and `side` name the position for the diagnostic.
    pub fn declared_symbol(
        &mut self,
        symbols: &SymbolTable,
        kinds: &[TokenKind],
        role: &str,
        side: &str,
    ) -> GrammarResult<String> {
        let token = self.consume(UNFINISHED_TRANSITION, kinds)?;

        if !symbols.contains(&token.literal) {
            return Err(GrammarError::Semantic(format!(
                "undefined {role} {} used in transition function {side} side",
                token.literal
            )));
        }

        Ok(token.literal.clone())
    }

    /// Consumes a punctuation token inside a transition.
    pub fn punctuation(&mut self, expected: &[TokenKind]) -> GrammarResult<()> {
        self.consume(UNFINISHED_TRANSITION, expected).map(|_| ())
    }

    /// Checks that the end-of-source token comes next and is the last token.
    ///
    /// Errors here describe the shape of the token stream rather than a source line, so they
    /// are not line-decorated.
    pub fn expect_end(&mut self) -> Result<(), AutomatonError> {
        self.consume(
            "missing EOF token at the end of source",
            &[TokenKind::EndOfSource],
        )
        .map_err(|e| match e {
            GrammarError::Syntax(message) | GrammarError::Semantic(message) => {
                AutomatonError::Structural(message)
            }
        })?;

        if !self.is_at_end() {
            return Err(AutomatonError::Structural(
                "unexpected token after EOF token".to_string(),
            ));
        }

        Ok(())
    }
}

/// Formats the "expected X or Y, got Z" message.
pub(crate) fn unexpected(expected: &[TokenKind], got: TokenKind) -> String {
    let expected = expected.iter().map(ToString::to_string).collect::<Vec<_>>();

    let expected = match expected.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    };

    format!("invalid token type, expected: {expected}, got: {got}")
}

pub(crate) fn missing_terminator(section: &str) -> GrammarError {
    GrammarError::Syntax(format!("missing ';' at the end of {section}"))
}

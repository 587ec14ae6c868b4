//! Compiler for Turing Machines.
//!
//! Transitions read `(state, symbol) > (state, written, L|R)`. The blank symbol `B` is always
//! available and an empty tape section yields a single blank cell.

use super::{
    missing_terminator, unexpected, GrammarError, GrammarResult, Header, Parser,
    UNFINISHED_TRANSITION,
};
use crate::automaton::tm::{TmKey, TmMove, TmTransitions, TuringMachine};
use crate::lexer::{Token, TokenKind};
use crate::types::{AutomatonError, Direction, StateTable, SymbolTable, BLANK_SYMBOL};

const TAPE_SYMBOL: &[TokenKind] = &[TokenKind::Symbol, TokenKind::Blank];

pub fn compile(tokens: &[Token]) -> Result<TuringMachine, AutomatonError> {
    let mut parser = Parser::new(tokens);
    let machine = sections(&mut parser).map_err(|e| parser.decorate(e))?;
    parser.expect_end()?;

    Ok(machine)
}

fn sections(parser: &mut Parser) -> GrammarResult<TuringMachine> {
    let Header {
        states,
        initial_state,
        symbols,
    } = parser.header(&[BLANK_SYMBOL])?;

    let transitions: TmTransitions = parser.transitions(|p| transition(p, &states, &symbols))?;
    let tape = tape(parser, &symbols)?;

    Ok(TuringMachine::new(
        states,
        symbols,
        transitions,
        initial_state,
        tape,
    ))
}

fn transition(
    parser: &mut Parser,
    states: &StateTable,
    symbols: &SymbolTable,
) -> GrammarResult<(TmKey, TmMove)> {
    let state = parser.declared_state(states, "left")?;
    parser.punctuation(&[TokenKind::Comma])?;
    let read = parser.declared_symbol(symbols, TAPE_SYMBOL, "symbol", "left")?;
    parser.punctuation(&[TokenKind::RightParen])?;

    parser.punctuation(&[TokenKind::Arrow])?;

    parser.punctuation(&[TokenKind::LeftParen])?;
    let next = parser.declared_state(states, "right")?;
    parser.punctuation(&[TokenKind::Comma])?;
    let write = parser.declared_symbol(symbols, TAPE_SYMBOL, "symbol", "right")?;
    parser.punctuation(&[TokenKind::Comma])?;
    let direction = match parser
        .consume(UNFINISHED_TRANSITION, &[TokenKind::MoveLeft, TokenKind::MoveRight])?
        .kind
    {
        TokenKind::MoveLeft => Direction::Left,
        _ => Direction::Right,
    };
    parser.punctuation(&[TokenKind::RightParen])?;

    Ok((
        TmKey::new(state, read),
        TmMove {
            state: next,
            write,
            direction,
        },
    ))
}

fn tape(parser: &mut Parser, symbols: &SymbolTable) -> GrammarResult<Vec<String>> {
    let mut tape = Vec::new();

    while let Some(token) = parser.advance() {
        match token.kind {
            TokenKind::Semicolon => {
                if tape.is_empty() {
                    tape.push(BLANK_SYMBOL.to_string());
                }
                return Ok(tape);
            }
            TokenKind::Symbol if !symbols.contains(&token.literal) => {
                return Err(GrammarError::Semantic(format!(
                    "invalid symbol {} in initial tape, each symbol must be defined in symbols section",
                    token.literal
                )));
            }
            TokenKind::Symbol | TokenKind::Blank => tape.push(token.literal.clone()),
            kind => {
                return Err(GrammarError::Syntax(unexpected(
                    &[TokenKind::Semicolon, TokenKind::Symbol, TokenKind::Blank],
                    kind,
                )))
            }
        }
    }

    Err(missing_terminator("tape section"))
}

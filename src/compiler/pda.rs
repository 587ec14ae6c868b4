//! Compiler for pushdown automata.
//!
//! Transitions read `(state, input, popped) > (state, pushed...)`. The input-end marker `{` may
//! appear as the input symbol and the stack-start marker `}` as a stack symbol; the compiler
//! appends `{` to the input and starts the stack with `}`.

use super::{
    missing_terminator, unexpected, GrammarError, GrammarResult, Header, Parser,
    UNFINISHED_TRANSITION,
};
use crate::automaton::pda::{Pda, PdaKey, PdaMove, PdaTransitions};
use crate::lexer::{Token, TokenKind};
use crate::types::{
    AutomatonError, StateTable, SymbolTable, INPUT_END_SYMBOL, STACK_START_SYMBOL,
};

const STACK_SYMBOL: &[TokenKind] = &[TokenKind::Symbol, TokenKind::StackStart];

pub fn compile(tokens: &[Token]) -> Result<Pda, AutomatonError> {
    let mut parser = Parser::new(tokens);
    let pda = sections(&mut parser).map_err(|e| parser.decorate(e))?;
    parser.expect_end()?;

    Ok(pda)
}

fn sections(parser: &mut Parser) -> GrammarResult<Pda> {
    let Header {
        states,
        initial_state,
        symbols,
    } = parser.header(&[INPUT_END_SYMBOL, STACK_START_SYMBOL])?;

    let transitions: PdaTransitions =
        parser.transitions(|p| transition(p, &states, &symbols))?;
    let input = input(parser, &symbols)?;

    Ok(Pda::new(
        states,
        symbols,
        transitions,
        initial_state,
        input,
        vec![STACK_START_SYMBOL.to_string()],
    ))
}

fn transition(
    parser: &mut Parser,
    states: &StateTable,
    symbols: &SymbolTable,
) -> GrammarResult<(PdaKey, PdaMove)> {
    let state = parser.declared_state(states, "left")?;
    parser.punctuation(&[TokenKind::Comma])?;
    let input = parser.declared_symbol(
        symbols,
        &[TokenKind::Symbol, TokenKind::InputEnd],
        "input symbol",
        "left",
    )?;
    parser.punctuation(&[TokenKind::Comma])?;
    let popped = parser.declared_symbol(symbols, STACK_SYMBOL, "stack symbol", "left")?;
    parser.punctuation(&[TokenKind::RightParen])?;

    parser.punctuation(&[TokenKind::Arrow])?;

    parser.punctuation(&[TokenKind::LeftParen])?;
    let next = parser.declared_state(states, "right")?;
    let mut push = Vec::new();
    while parser.peek_kind() == Some(TokenKind::Comma) {
        parser.advance();
        push.push(parser.declared_symbol(symbols, STACK_SYMBOL, "stack symbol", "right")?);
    }
    // Only ')' can follow here; ',' is listed to make the message more helpful.
    parser
        .consume(
            UNFINISHED_TRANSITION,
            &[TokenKind::RightParen, TokenKind::Comma],
        )
        .map(|_| ())?;

    Ok((
        PdaKey::new(state, input, popped),
        PdaMove { state: next, push },
    ))
}

fn input(parser: &mut Parser, symbols: &SymbolTable) -> GrammarResult<Vec<String>> {
    let mut input = Vec::new();

    while let Some(token) = parser.advance() {
        match token.kind {
            TokenKind::Semicolon => {
                input.push(INPUT_END_SYMBOL.to_string());
                return Ok(input);
            }
            TokenKind::Symbol => {
                if !symbols.contains(&token.literal) {
                    return Err(GrammarError::Semantic(format!(
                        "invalid symbol {} in input, each symbol must be defined in symbols section",
                        token.literal
                    )));
                }
                input.push(token.literal.clone());
            }
            kind => {
                return Err(GrammarError::Syntax(unexpected(
                    &[TokenKind::Semicolon, TokenKind::Symbol],
                    kind,
                )))
            }
        }
    }

    Err(missing_terminator("input section"))
}

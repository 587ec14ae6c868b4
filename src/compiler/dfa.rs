//! Compiler for deterministic finite automata.
//!
//! ```text
//! qA qB qAcc; qA; qAcc; a b;
//! (qA,a)>(qB); (qB,b)>(qAcc);
//! a b;
//! ```

use super::{missing_terminator, unexpected, GrammarError, GrammarResult, Header, Parser};
use crate::automaton::dfa::{Dfa, DfaKey, DfaTransitions};
use crate::lexer::{Token, TokenKind};
use crate::types::{AutomatonError, StateTable, SymbolTable, BLANK_SYMBOL};

/// Compiles a DFA program.
///
/// An empty input section yields a single blank. The blank is not a DFA symbol, so running
/// such a program fails on its first move.
pub fn compile(tokens: &[Token]) -> Result<Dfa, AutomatonError> {
    let mut parser = Parser::new(tokens);
    let dfa = sections(&mut parser).map_err(|e| parser.decorate(e))?;
    parser.expect_end()?;

    Ok(dfa)
}

fn sections(parser: &mut Parser) -> GrammarResult<Dfa> {
    let Header {
        states,
        initial_state,
        symbols,
    } = parser.header(&[])?;

    let transitions: DfaTransitions =
        parser.transitions(|p| transition(p, &states, &symbols))?;
    let input = input(parser, &symbols)?;

    Ok(Dfa::new(states, symbols, transitions, initial_state, input))
}

// (state, symbol) > (state)
fn transition(
    parser: &mut Parser,
    states: &StateTable,
    symbols: &SymbolTable,
) -> GrammarResult<(DfaKey, String)> {
    let state = parser.declared_state(states, "left")?;
    parser.punctuation(&[TokenKind::Comma])?;
    let symbol = parser.declared_symbol(
        symbols,
        &[TokenKind::Symbol, TokenKind::Blank],
        "symbol",
        "left",
    )?;
    parser.punctuation(&[TokenKind::RightParen])?;

    parser.punctuation(&[TokenKind::Arrow])?;

    parser.punctuation(&[TokenKind::LeftParen])?;
    let next = parser.declared_state(states, "right")?;
    parser.punctuation(&[TokenKind::RightParen])?;

    Ok((DfaKey::new(state, symbol), next))
}

fn input(parser: &mut Parser, symbols: &SymbolTable) -> GrammarResult<Vec<String>> {
    let mut input = Vec::new();

    while let Some(token) = parser.advance() {
        match token.kind {
            TokenKind::Semicolon => {
                if input.is_empty() {
                    input.push(BLANK_SYMBOL.to_string());
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use crate::types::State;

    fn compile_source(source: &str) -> Result<Dfa, AutomatonError> {
        compile(&scan(source).unwrap())
    }

    #[test]
    fn test_compile_scenario() {
        let source = r#"
# states
qA qB qC qAcc;
qA;
qAcc;
A C D;
(qA,A)>(qB)
(qB,D)>(qC)
(qC,C)>(qAcc);
A D C;
"#;
        let dfa = compile_source(source).unwrap();

        assert_eq!(dfa.state(), "qA");
        assert_eq!(dfa.states().len(), 4);
        assert_eq!(dfa.states()["qAcc"], State::accepting("qAcc"));
        assert_eq!(dfa.transitions().len(), 3);
        assert_eq!(dfa.transitions()[&DfaKey::new("qB", "D")], "qC");
        assert_eq!(dfa.input(), ["A", "D", "C"].map(String::from).as_slice());
        assert_eq!(dfa.position(), 0);
    }

    #[test]
    fn test_empty_input_defaults_to_blank() {
        let dfa = compile_source("qA; qA; qA; ; ; ;").unwrap();

        assert_eq!(dfa.input(), [BLANK_SYMBOL.to_string()].as_slice());
        assert!(dfa.transitions().is_empty());
    }

    #[test]
    fn test_semicolon_closes_transition_section() {
        let source = "qA qB;\nqA;\nqB;\na;\n(qA,a)>(qB);\n(qB,a)>(qA);\na;";

        assert_eq!(
            compile_source(source).unwrap_err(),
            AutomatonError::Syntax {
                line: 6,
                message: "invalid token type, expected: ';' or symbol, got: '('".to_string()
            }
        );
    }

    #[test]
    fn test_blank_is_not_a_dfa_symbol() {
        assert_eq!(
            compile_source("qA qB; qA; qB; ; (qA,B)>(qB); ;").unwrap_err(),
            AutomatonError::Semantic {
                line: 1,
                message: "undefined symbol B used in transition function left side".to_string()
            }
        );
    }

    #[test]
    fn test_later_transition_overwrites_earlier() {
        let dfa = compile_source("qA qB; qA; ; a; (qA,a)>(qA) (qA,a)>(qB); a;").unwrap();

        assert_eq!(dfa.transitions().len(), 1);
        assert_eq!(dfa.transitions()[&DfaKey::new("qA", "a")], "qB");
    }

    #[test]
    fn test_undeclared_identifiers() {
        let cases = [
            (
                "qA; qA; ; a; (qX,a)>(qA); ;",
                "undefined state qX used in transition function left side",
            ),
            (
                "qA; qA; ; a; (qA,b)>(qA); ;",
                "undefined symbol b used in transition function left side",
            ),
            (
                "qA; qA; ; a; (qA,a)>(qY); ;",
                "undefined state qY used in transition function right side",
            ),
            (
                "qA; qA; ; a; ; c;",
                "invalid symbol c in input, each symbol must be defined in symbols section",
            ),
        ];

        for (source, message) in cases {
            assert_eq!(
                compile_source(source).unwrap_err(),
                AutomatonError::Semantic {
                    line: 1,
                    message: message.to_string()
                },
                "source: {source}"
            );
        }
    }

    #[test]
    fn test_errors_carry_line_of_previous_token() {
        let source = "qA;\nqA;\n;\na;\n(qA,a)\n>\n(qZ);\n;";

        assert_eq!(
            compile_source(source).unwrap_err(),
            AutomatonError::Semantic {
                line: 7,
                message: "undefined state qZ used in transition function right side".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_transition() {
        assert_eq!(
            compile_source("qA; qA; ; a; (qA a)>(qA); ;").unwrap_err(),
            AutomatonError::Syntax {
                line: 1,
                message: "invalid token type, expected: ',', got: symbol".to_string()
            }
        );

        assert_eq!(
            compile_source("qA; qA; ; a; (qA,a)(qA); ;").unwrap_err(),
            AutomatonError::Syntax {
                line: 1,
                message: "invalid token type, expected: '>', got: '('".to_string()
            }
        );
    }

    #[test]
    fn test_unfinished_transition() {
        let mut tokens = scan("qA; qA; ; a; (qA,a)>").unwrap();
        tokens.pop();

        assert_eq!(
            compile(&tokens).unwrap_err(),
            AutomatonError::Syntax {
                line: 1,
                message: "unfinished transition".to_string()
            }
        );
    }

    #[test]
    fn test_missing_input_terminator() {
        assert_eq!(
            compile_source("qA; qA; ; a; ; a").unwrap_err(),
            AutomatonError::Syntax {
                line: 1,
                message: "invalid token type, expected: ';' or symbol, got: end of source"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_trailing_tokens_are_structural_errors() {
        assert_eq!(
            compile_source("qA; qA; ; a; ; a; a").unwrap_err(),
            AutomatonError::Structural(
                "invalid token type, expected: end of source, got: symbol".to_string()
            )
        );
    }

    #[test]
    fn test_reserved_blank_cannot_be_redeclared() {
        // `B` scans as a blank token, so it cannot appear in the symbols section at all.
        assert_eq!(
            compile_source("qA; qA; ; a B; ; ;").unwrap_err(),
            AutomatonError::Syntax {
                line: 1,
                message: "invalid token type, expected: symbol or ';', got: blank symbol"
                    .to_string()
            }
        );
    }
}

//! Thompson's construction driven by a postfix expression.
//!
//! `|` is union, `&` is concatenation and `*` is the Kleene star. Every
//! combinator consumes its operands and returns a single-start,
//! single-accept automaton whose state collection is assembled from the
//! operands' collections in a fixed order.

use crate::nfa::{Arena, Label, Nfa, Render};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Union,
    Concat,
    Star,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Operator::Union => '|',
            Operator::Concat => '&',
            Operator::Star => '*',
        };
        write!(f, "{}", c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Symbol(Label),
    Op(Operator),
}

impl Token {
    pub fn from_char(c: char) -> Option<Token> {
        match c {
            '|' => Some(Token::Op(Operator::Union)),
            '&' => Some(Token::Op(Operator::Concat)),
            '*' => Some(Token::Op(Operator::Star)),
            _ => Label::from_char(c).map(Token::Symbol),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("The character {symbol} is not part of the alphabet for this language")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("The RegEx is improperly formed for the use of the {operator} operator")]
    InsufficientOperands { operator: Operator, position: usize },
    #[error("The RegEx was in an improper format, or it was lacking an operator")]
    MalformedResult { remaining: usize },
}

/// `n1` followed by `n2`, bridged by an epsilon edge from `n1`'s accept.
pub fn concatenate(arena: &mut Arena, n1: Nfa, n2: Nfa) -> Nfa {
    arena.add_transition(n1.accept, Label::Epsilon, n2.start);
    let mut states = n1.states;
    states.extend(n2.states);
    Nfa {
        states,
        start: n1.start,
        accept: n2.accept,
    }
}

pub fn union(arena: &mut Arena, n1: Nfa, n2: Nfa) -> Nfa {
    let start = arena.add_state();
    let accept = arena.add_state();
    arena.add_transition(start, Label::Epsilon, n1.start);
    arena.add_transition(start, Label::Epsilon, n2.start);
    arena.add_transition(n1.accept, Label::Epsilon, accept);
    arena.add_transition(n2.accept, Label::Epsilon, accept);

    let mut states = n1.states;
    states.extend(n2.states);
    states.push(start);
    states.push(accept);
    Nfa {
        states,
        start,
        accept,
    }
}

/// The new state is both start and accept, so the empty word is accepted
/// without entering `n1`.
pub fn kleene_star(arena: &mut Arena, n1: Nfa) -> Nfa {
    let mut star = Nfa::symbol(arena, Label::Epsilon);
    arena.add_transition(star.start, Label::Epsilon, n1.start);
    arena.add_transition(n1.accept, Label::Epsilon, star.start);
    star.states.extend(n1.states);
    star
}

/// The automaton built for one expression together with the arena that
/// holds its states.
#[derive(Debug)]
pub struct Compiled {
    arena: Arena,
    nfa: Nfa,
}

impl Compiled {
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn render(&self) -> Render<'_> {
        self.nfa.render(&self.arena)
    }
}

impl fmt::Display for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Pops the operands of a binary operator. The right operand is on top of
/// the stack, so it comes off first.
fn pop_pair(
    stack: &mut Vec<Nfa>,
    operator: Operator,
    position: usize,
) -> Result<(Nfa, Nfa), ConstructError> {
    let insufficient = || ConstructError::InsufficientOperands { operator, position };
    let right = stack.pop().ok_or_else(insufficient)?;
    let left = stack.pop().ok_or_else(insufficient)?;
    Ok((left, right))
}

/// Builds the NFA for a postfix expression over `a,b,c,d,e,E`.
///
/// The first bad character aborts the expression; the partial automata on
/// the stack are dropped along with the arena.
pub fn evaluate_postfix(expression: &str) -> Result<Compiled, ConstructError> {
    let mut arena = Arena::new();
    let mut stack: Vec<Nfa> = Vec::new();

    for (position, c) in expression.chars().enumerate() {
        let token = Token::from_char(c).ok_or(ConstructError::InvalidSymbol {
            symbol: c,
            position,
        })?;
        trace!(position, symbol = %c, depth = stack.len(), "consume");

        let nfa = match token {
            Token::Symbol(label) => Nfa::symbol(&mut arena, label),
            Token::Op(operator @ Operator::Union) => {
                let (left, right) = pop_pair(&mut stack, operator, position)?;
                union(&mut arena, left, right)
            }
            Token::Op(operator @ Operator::Concat) => {
                let (left, right) = pop_pair(&mut stack, operator, position)?;
                concatenate(&mut arena, left, right)
            }
            Token::Op(operator @ Operator::Star) => {
                let operand = stack
                    .pop()
                    .ok_or(ConstructError::InsufficientOperands { operator, position })?;
                kleene_star(&mut arena, operand)
            }
        };
        if let Token::Op(operator) = token {
            debug!(
                %operator,
                states = nfa.num_states(),
                start = nfa.start(),
                accept = nfa.accept(),
                "composed"
            );
        }
        stack.push(nfa);
    }

    match (stack.pop(), stack.len()) {
        (Some(nfa), 0) => Ok(Compiled { arena, nfa }),
        (last, rest) => Err(ConstructError::MalformedResult {
            remaining: rest + usize::from(last.is_some()),
        }),
    }
}

use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt;

pub type StateId = usize;

/// Transition labels. `Epsilon` is written as `E` in expressions and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    A,
    B,
    C,
    D,
    E,
    Epsilon,
}

impl Label {
    /// Fixed render order.
    pub const ALL: [Label; 6] = [
        Label::A,
        Label::B,
        Label::C,
        Label::D,
        Label::E,
        Label::Epsilon,
    ];

    pub fn from_char(c: char) -> Option<Label> {
        match c {
            'a' => Some(Label::A),
            'b' => Some(Label::B),
            'c' => Some(Label::C),
            'd' => Some(Label::D),
            'e' => Some(Label::E),
            'E' => Some(Label::Epsilon),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Label::A => 'a',
            Label::B => 'b',
            Label::C => 'c',
            Label::D => 'd',
            Label::E => 'e',
            Label::Epsilon => 'E',
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Destinations for one label, kept in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Transition {
    pub states: SmallVec<[StateId; 2]>,
}

impl Transition {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct State {
    transitions: [Transition; 6],
}

impl State {
    #[inline]
    pub fn targets(&self, label: Label) -> &[StateId] {
        &self.transitions[label.index()].states
    }

    /// True when the state has no outgoing transitions at all.
    pub fn is_terminal(&self) -> bool {
        self.transitions.iter().all(Transition::is_empty)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.iter().map(|t| t.states.len()).sum()
    }
}

/// Storage for every state created while building one expression.
///
/// Automata refer to states by index, so composing two automata only moves
/// their index lists around; the states themselves never move or get copied.
#[derive(Debug, Default)]
pub struct Arena {
    states: Vec<State>,
}

impl Arena {
    pub fn new() -> Self {
        Arena { states: Vec::new() }
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    pub fn add_transition(&mut self, source: StateId, label: Label, destination: StateId) {
        self.states[source].transitions[label.index()]
            .states
            .push(destination);
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}

/// A single-start, single-accept automaton living in an [`Arena`].
///
/// `states` is the state collection in assembly order; render numbering
/// follows it. Not `Clone`: composition consumes its operands.
#[derive(Debug)]
pub struct Nfa {
    pub(crate) states: Vec<StateId>,
    pub(crate) start: StateId,
    pub(crate) accept: StateId,
}

impl Nfa {
    /// Base case of the construction: `start --label--> accept`, or a lone
    /// state that is both start and accept for epsilon.
    pub fn symbol(arena: &mut Arena, label: Label) -> Nfa {
        let start = arena.add_state();
        if label == Label::Epsilon {
            return Nfa {
                states: vec![start],
                start,
                accept: start,
            };
        }
        let accept = arena.add_state();
        arena.add_transition(start, label, accept);
        Nfa {
            states: vec![start, accept],
            start,
            accept,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self, arena: &Arena) -> usize {
        self.states
            .iter()
            .map(|&id| arena.state(id).transition_count())
            .sum()
    }

    /// Lines of the transition table. States are numbered from 1 in the
    /// order of `states` each time this is called.
    pub fn render<'a>(&'a self, arena: &'a Arena) -> Render<'a> {
        let mut names = vec![0; arena.len()];
        for (n, &id) in self.states.iter().enumerate() {
            names[id] = n + 1;
        }
        Render {
            nfa: self,
            arena,
            names,
            stage: Stage::States {
                position: 0,
                label: 0,
            },
        }
    }
}

enum Stage {
    States { position: usize, label: usize },
    Start,
    Accept,
    Done,
}

pub struct Render<'a> {
    nfa: &'a Nfa,
    arena: &'a Arena,
    names: Vec<usize>,
    stage: Stage,
}

impl<'a> Render<'a> {
    fn name(&self, id: StateId) -> usize {
        self.names[id]
    }
}

impl<'a> Iterator for Render<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            match self.stage {
                Stage::States { position, label } => {
                    let Some(&id) = self.nfa.states().get(position) else {
                        self.stage = Stage::Start;
                        continue;
                    };
                    let state = self.arena.state(id);
                    if label == 0 && state.is_terminal() {
                        self.stage = Stage::States {
                            position: position + 1,
                            label: 0,
                        };
                        return Some(format!("(q{})", self.name(id)));
                    }
                    if label >= Label::ALL.len() {
                        self.stage = Stage::States {
                            position: position + 1,
                            label: 0,
                        };
                        continue;
                    }
                    self.stage = Stage::States {
                        position,
                        label: label + 1,
                    };
                    let symbol = Label::ALL[label];
                    let targets = state.targets(symbol);
                    if targets.is_empty() {
                        continue;
                    }
                    let targets = targets
                        .iter()
                        .map(|&t| format!("q{}", self.name(t)))
                        .join(" ");
                    return Some(format!("(q{},{}) --> {}", self.name(id), symbol, targets));
                }
                Stage::Start => {
                    self.stage = Stage::Accept;
                    return Some(format!("S q{}", self.name(self.nfa.start())));
                }
                Stage::Accept => {
                    self.stage = Stage::Done;
                    return Some(format!("F q{}", self.name(self.nfa.accept())));
                }
                Stage::Done => return None,
            }
        }
    }
}

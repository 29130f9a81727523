use crate::thompson::evaluate_postfix;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

const RULE: &str = "---------------------------------------";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Reads one postfix expression per line and writes either its transition
/// table or the reason it was rejected. A rejected line never stops the run;
/// only I/O errors do.
pub fn process<R: BufRead, W: Write>(input: R, mut out: W) -> io::Result<Summary> {
    let mut summary = Summary::default();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let expression = line.trim_end_matches('\r');
        writeln!(out, "The NFA for {} is below!", expression)?;
        writeln!(out, "{}", RULE)?;

        match evaluate_postfix(expression) {
            Ok(compiled) => {
                let nfa = compiled.nfa();
                debug!(
                    line = line_no + 1,
                    expression,
                    states = nfa.num_states(),
                    transitions = nfa.num_transitions(compiled.arena()),
                    "built"
                );
                for row in compiled.render() {
                    writeln!(out, "{}", row)?;
                }
                summary.accepted += 1;
            }
            Err(err) => {
                warn!(line = line_no + 1, expression, error = ?err, "rejected");
                writeln!(out, "{}", err)?;
                summary.rejected += 1;
            }
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_test_writer()
                .try_init();
        });
    }

    fn run(input: &str) -> (Summary, String) {
        init_tracing();
        let mut out = Vec::new();
        let summary = process(input.as_bytes(), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_expression() {
        let (summary, out) = run("ab&\n");
        assert_eq!(
            summary,
            Summary {
                accepted: 1,
                rejected: 0
            }
        );
        assert_eq!(
            out,
            "The NFA for ab& is below!\n\
             ---------------------------------------\n\
             (q1,a) --> q2\n\
             (q2,E) --> q3\n\
             (q3,b) --> q4\n\
             (q4)\n\
             S q1\n\
             F q4\n\
             \n"
        );
    }

    #[test]
    fn test_error_does_not_stop_run() {
        let (summary, out) = run("a|\nf\nab\na*\n");
        assert_eq!(
            summary,
            Summary {
                accepted: 1,
                rejected: 3
            }
        );
        let sections: Vec<&str> = out.split("\n\n").filter(|s| !s.is_empty()).collect();
        assert_eq!(sections.len(), 4);
        assert!(sections[0]
            .ends_with("The RegEx is improperly formed for the use of the | operator"));
        assert!(sections[1]
            .ends_with("The character f is not part of the alphabet for this language"));
        assert!(sections[2]
            .ends_with("The RegEx was in an improper format, or it was lacking an operator"));
        assert!(sections[3].starts_with("The NFA for a* is below!"));
        assert!(sections[3].ends_with("S q1\nF q1"));
    }

    #[test]
    fn test_crlf_and_missing_trailing_newline() {
        let (summary, out) = run("ab|\r\nE");
        assert_eq!(summary.accepted, 2);
        assert!(out.contains("The NFA for ab| is below!\n"));
        assert!(out.ends_with(
            "The NFA for E is below!\n\
             ---------------------------------------\n\
             (q1)\n\
             S q1\n\
             F q1\n\
             \n"
        ));
    }

    #[test]
    fn test_empty_line_is_rejected() {
        let (summary, out) = run("\n");
        assert_eq!(summary.rejected, 1);
        assert!(out.starts_with("The NFA for  is below!\n"));
    }

    #[test]
    fn test_built_counts() {
        let compiled = evaluate_postfix("a*b&").unwrap();
        let nfa = compiled.nfa();
        assert_eq!(nfa.num_states(), 5);
        assert_eq!(nfa.num_transitions(compiled.arena()), 5);
        assert_eq!(nfa.states().first(), Some(&nfa.start()));
        assert_eq!(nfa.states().last(), Some(&nfa.accept()));
    }

    #[test]
    fn test_empty_input() {
        let (summary, out) = run("");
        assert_eq!(summary, Summary::default());
        assert!(out.is_empty());
    }
}

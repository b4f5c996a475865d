//! Rule text parser.
//!
//! The rule language is line oriented and indentation scoped:
//!
//! ```text
//! # comment
//! Right:                 # header: condition only, opens a scope
//!   -Half: 1.Right       # effective condition (Right -Half)
//!   Half: 1.Wall         # effective condition (Right Half)
//!     2/-1.Back          # outputs only, continues (Right Half)
//! ```
//!
//! Condition items are `[time/][position.][sign]name`, grouped with `( )`
//! (conjunction) or `[ ]` (disjunction). A sign, attached or standalone, may
//! also precede a group. Output items are `[step/][offset.]name`, with the
//! step defaulting to 1 and the offset to 0.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::clause::Clause;
use crate::error::{AutomatonError, AutomatonResult};
use crate::rule::{Rule, RuleOutput};
use crate::signal::SignalTable;

static CONDITION_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([+-]?\d+)/)?(?:([+-]?\d+)\.)?([+-])?([A-Za-z_]\w*)$")
        .expect("condition item pattern is valid")
});

static OUTPUT_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)/)?(?:([+-]?\d+)\.)?([A-Za-z_]\w*)$")
        .expect("output item pattern is valid")
});

/// Deepest nesting of groups and signs accepted in one condition.
pub const MAX_CONDITION_DEPTH: usize = 256;

/// Rules produced by one parse, plus the largest future step observed.
#[derive(Debug, Clone, Default)]
pub struct ParsedRules {
    pub rules: Vec<Rule>,
    pub max_future_depth: u32,
}

/// Parse rule text, interning every signal name into `signals`.
pub fn parse_rules(text: &str, signals: &mut SignalTable) -> AutomatonResult<ParsedRules> {
    let mut parsed = ParsedRules::default();
    let mut scopes: Vec<(Clause, usize)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        if line.trim().is_empty() {
            continue;
        }

        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        while scopes.last().is_some_and(|(_, level)| *level >= indent) {
            scopes.pop();
        }

        let (condition_text, outputs_text) = match line.split_once(':') {
            Some((condition, outputs)) => (Some(condition), outputs),
            None => (None, line),
        };

        let condition = match condition_text {
            Some(text) => {
                let own = parse_condition(text, line_no, signals)?;
                let effective = match scopes.last() {
                    Some((parent, _)) => Clause::all([parent.clone(), own]),
                    None => own,
                };
                scopes.push((effective.clone(), indent));
                effective
            }
            None => match scopes.last() {
                Some((parent, _)) => parent.clone(),
                None => {
                    return Err(AutomatonError::syntax(
                        line_no,
                        line.trim(),
                        "outputs without an enclosing condition",
                    ))
                }
            },
        };

        if outputs_text.trim().is_empty() {
            continue;
        }
        let outputs = parse_outputs(outputs_text, line_no, signals, &mut parsed.max_future_depth)?;
        trace!(line = line_no, outputs = outputs.len(), "rule_parsed");
        parsed.rules.push(Rule::new(condition, outputs));
    }

    Ok(parsed)
}

/// A lexical unit of condition text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open(char),
    Close(char),
    Word(&'a str),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let delimiter = c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']');
        if !delimiter {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take() {
            tokens.push(Token::Word(&text[s..i]));
        }
        match c {
            '(' | '[' => tokens.push(Token::Open(c)),
            ')' | ']' => tokens.push(Token::Close(c)),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(Token::Word(&text[s..]));
    }

    tokens
}

/// Recursive-descent parser over the tokens of one condition.
struct ConditionParser<'t, 's> {
    tokens: Vec<Token<'t>>,
    pos: usize,
    depth: usize,
    line: usize,
    signals: &'s mut SignalTable,
}

fn parse_condition(text: &str, line: usize, signals: &mut SignalTable) -> AutomatonResult<Clause> {
    let mut parser = ConditionParser {
        tokens: tokenize(text),
        pos: 0,
        depth: 0,
        line,
        signals,
    };

    let mut items = Vec::new();
    while parser.pos < parser.tokens.len() {
        items.push(parser.item()?);
    }
    Ok(Clause::all(items))
}

impl ConditionParser<'_, '_> {
    fn error(&self, token: impl Into<String>, message: &str) -> AutomatonError {
        AutomatonError::syntax(self.line, token, message)
    }

    fn item(&mut self) -> AutomatonResult<Clause> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| self.error("", "unexpected end of condition"))?;
        self.pos += 1;

        match token {
            Token::Open(open) => {
                self.descend(open.to_string())?;
                let group = self.group(open);
                self.depth -= 1;
                group
            }
            Token::Close(close) => Err(self.error(close.to_string(), "unbalanced closing bracket")),
            Token::Word(word @ ("-" | "+")) => {
                if self.pos >= self.tokens.len() {
                    return Err(self.error(word, "sign without operand"));
                }
                self.descend(word)?;
                let operand = self.item();
                self.depth -= 1;
                let operand = operand?;
                Ok(if word == "-" {
                    Clause::negate(operand)
                } else {
                    operand
                })
            }
            Token::Word(word) => self.literal(word),
        }
    }

    fn descend(&mut self, token: impl Into<String>) -> AutomatonResult<()> {
        if self.depth >= MAX_CONDITION_DEPTH {
            return Err(self.error(token, "groups nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn group(&mut self, open: char) -> AutomatonResult<Clause> {
        let close = if open == '(' { ')' } else { ']' };
        let mut subs = Vec::new();

        loop {
            match self.tokens.get(self.pos) {
                None => return Err(self.error(open.to_string(), "unclosed group")),
                Some(Token::Close(c)) if *c == close => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Close(c)) => {
                    let c = *c;
                    return Err(self.error(c.to_string(), "mismatched closing bracket"));
                }
                Some(_) => subs.push(self.item()?),
            }
        }

        if open == '(' {
            if subs.is_empty() {
                return Err(self.error("()", "empty conjunction group"));
            }
            Ok(Clause::all(subs))
        } else {
            Ok(Clause::any(subs))
        }
    }

    fn literal(&mut self, word: &str) -> AutomatonResult<Clause> {
        let caps = CONDITION_ITEM
            .captures(word)
            .ok_or_else(|| self.error(word, "malformed condition item"))?;

        let time = parse_offset(caps.get(1).map(|m| m.as_str()), word, self.line)?;
        let position = parse_offset(caps.get(2).map(|m| m.as_str()), word, self.line)?;
        let negated = caps.get(3).is_some_and(|m| m.as_str() == "-");
        let signal = self.signals.intern(&caps[4]);

        let literal = Clause::literal(signal, position, time);
        Ok(if negated {
            Clause::negate(literal)
        } else {
            literal
        })
    }
}

fn parse_offset(text: Option<&str>, token: &str, line: usize) -> AutomatonResult<i32> {
    match text {
        None => Ok(0),
        Some(t) => t
            .parse()
            .map_err(|_| AutomatonError::syntax(line, token, "offset out of range")),
    }
}

fn parse_outputs(
    text: &str,
    line: usize,
    signals: &mut SignalTable,
    max_future_depth: &mut u32,
) -> AutomatonResult<Vec<RuleOutput>> {
    text.split_whitespace()
        .map(|word| {
            let caps = OUTPUT_ITEM
                .captures(word)
                .ok_or_else(|| AutomatonError::syntax(line, word, "malformed output item"))?;

            let future_step: u32 = match caps.get(1) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| AutomatonError::syntax(line, word, "step out of range"))?,
                None => 1,
            };
            let neighbor_offset = parse_offset(caps.get(2).map(|m| m.as_str()), word, line)?;
            if future_step == 0 && neighbor_offset != 0 {
                return Err(AutomatonError::syntax(
                    line,
                    word,
                    "same-step outputs may only target their own cell",
                ));
            }

            *max_future_depth = (*max_future_depth).max(future_step);
            let signal = signals.intern(&caps[3]);
            Ok(RuleOutput::new(neighbor_offset, signal, future_step))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (ParsedRules, SignalTable) {
        let mut table = SignalTable::new();
        let parsed = parse_rules(text, &mut table).unwrap();
        (parsed, table)
    }

    fn parse_err(text: &str) -> AutomatonError {
        let mut table = SignalTable::new();
        parse_rules(text, &mut table).unwrap_err()
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("(A -1.B)[ C ]");
        assert_eq!(
            tokens,
            vec![
                Token::Open('('),
                Token::Word("A"),
                Token::Word("-1.B"),
                Token::Close(')'),
                Token::Open('['),
                Token::Word("C"),
                Token::Close(']'),
            ]
        );
    }

    #[test]
    fn test_simple_rule() {
        let (parsed, table) = parse("A: 0/0.B");
        assert_eq!(parsed.rules.len(), 1);
        let a = table.lookup("A").unwrap();
        let b = table.lookup("B").unwrap();
        assert_eq!(parsed.rules[0].condition, Clause::signal(a));
        assert_eq!(parsed.rules[0].outputs, vec![RuleOutput::new(0, b, 0)]);
        assert_eq!(parsed.max_future_depth, 0);
    }

    #[test]
    fn test_output_defaults() {
        let (parsed, table) = parse("A: B 2.C 3/-1.D");
        let b = table.lookup("B").unwrap();
        let c = table.lookup("C").unwrap();
        let d = table.lookup("D").unwrap();
        assert_eq!(
            parsed.rules[0].outputs,
            vec![
                RuleOutput::new(0, b, 1),
                RuleOutput::new(2, c, 1),
                RuleOutput::new(-1, d, 3),
            ]
        );
        assert_eq!(parsed.max_future_depth, 3);
    }

    #[test]
    fn test_full_literal_prefix() {
        let (parsed, table) = parse("2/-1.-A: B");
        let a = table.lookup("A").unwrap();
        assert_eq!(
            parsed.rules[0].condition,
            Clause::negate(Clause::literal(a, -1, 2))
        );
    }

    #[test]
    fn test_standalone_and_group_signs() {
        let (parsed, table) = parse("- A -(B C) +D: E");
        let a = table.lookup("A").unwrap();
        let b = table.lookup("B").unwrap();
        let c = table.lookup("C").unwrap();
        let d = table.lookup("D").unwrap();
        assert_eq!(
            parsed.rules[0].condition,
            Clause::Conjunction(vec![
                Clause::negate(Clause::signal(a)),
                Clause::negate(Clause::all([Clause::signal(b), Clause::signal(c)])),
                Clause::signal(d),
            ])
        );
    }

    #[test]
    fn test_double_negation_in_text() {
        let (parsed, table) = parse("- -A: B");
        let a = table.lookup("A").unwrap();
        assert_eq!(parsed.rules[0].condition, Clause::signal(a));
    }

    #[test]
    fn test_groups() {
        let (parsed, table) = parse("[A (B C)]: D\n(A): E\n[]: F");
        let a = table.lookup("A").unwrap();
        let b = table.lookup("B").unwrap();
        let c = table.lookup("C").unwrap();
        assert_eq!(
            parsed.rules[0].condition,
            Clause::Disjunction(vec![
                Clause::signal(a),
                Clause::Conjunction(vec![Clause::signal(b), Clause::signal(c)]),
            ])
        );
        assert_eq!(parsed.rules[1].condition, Clause::signal(a));
        assert_eq!(parsed.rules[2].condition, Clause::never());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let (parsed, _) = parse("# header\n\n   # indented comment\nA: B # trailing\n\n");
        assert_eq!(parsed.rules.len(), 1);
        assert_eq!(parsed.rules[0].outputs.len(), 1);
    }

    #[test]
    fn test_indentation_nesting() {
        let text = "Right:\n  -Half: 1.Right\n  Half: 1.Wall\n";
        let (parsed, table) = parse(text);
        let right = table.lookup("Right").unwrap();
        let half = table.lookup("Half").unwrap();
        assert_eq!(parsed.rules.len(), 2);
        assert_eq!(
            parsed.rules[0].condition,
            Clause::Conjunction(vec![Clause::signal(right), Clause::negate(Clause::signal(half))])
        );
        assert_eq!(
            parsed.rules[1].condition,
            Clause::Conjunction(vec![Clause::signal(right), Clause::signal(half)])
        );
        assert_eq!(parsed.rules[1].render(&table), "(Right Half): 1/1.Wall");
    }

    #[test]
    fn test_outputs_only_line_continues_scope() {
        let text = "A:\n  B:\n    C\n  D\nE: F";
        let (parsed, table) = parse(text);
        let a = table.lookup("A").unwrap();
        let b = table.lookup("B").unwrap();
        let e = table.lookup("E").unwrap();
        assert_eq!(parsed.rules.len(), 3);
        assert_eq!(
            parsed.rules[0].condition,
            Clause::Conjunction(vec![Clause::signal(a), Clause::signal(b)])
        );
        assert_eq!(parsed.rules[1].condition, Clause::signal(a));
        assert_eq!(parsed.rules[2].condition, Clause::signal(e));
    }

    #[test]
    fn test_dedent_closes_scopes() {
        let text = "A:\n  B: X\nC: Y";
        let (parsed, table) = parse(text);
        let c = table.lookup("C").unwrap();
        assert_eq!(parsed.rules[1].condition, Clause::signal(c));
    }

    #[test]
    fn test_empty_condition_is_true() {
        let (parsed, _) = parse(": A");
        assert_eq!(parsed.rules[0].condition, Clause::True);
    }

    #[test]
    fn test_interning_across_lines() {
        let (parsed, table) = parse("A: B\nB: A");
        assert_eq!(table.len(), 2);
        assert_eq!(parsed.rules[0].outputs[0].signal, table.lookup("B").unwrap());
        assert_eq!(parsed.rules[1].condition, Clause::signal(table.lookup("B").unwrap()));
    }

    #[test]
    fn test_outputs_without_condition_fails() {
        let err = parse_err("A B");
        assert!(matches!(err, AutomatonError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_unbalanced_groups_fail() {
        assert!(parse_err("(A B: C").is_syntax());
        assert!(parse_err("A B): C").is_syntax());
        assert!(parse_err("(A B]: C").is_syntax());
    }

    #[test]
    fn test_empty_conjunction_fails() {
        assert!(parse_err("(): C").is_syntax());
    }

    #[test]
    fn test_malformed_tokens_fail() {
        let err = parse_err("A: B\n1.2.A: C");
        match err {
            AutomatonError::Syntax { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "1.2.A");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_err("A: -1/B").is_syntax());
        assert!(parse_err("A: B!").is_syntax());
        assert!(parse_err("--(A): B").is_syntax());
        assert!(parse_err("A -: B").is_syntax());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let deep = format!("{}A{}: B", "(".repeat(2000), ")".repeat(2000));
        match parse_err(&deep) {
            AutomatonError::Syntax { line, token, .. } => {
                assert_eq!(line, 1);
                assert_eq!(token, "(");
            }
            other => panic!("unexpected error: {other}"),
        }

        let signs = format!("{}A: B", "- ".repeat(2000));
        assert!(parse_err(&signs).is_syntax());

        let limit = MAX_CONDITION_DEPTH;
        let (parsed, table) = parse(&format!("{}A{}: B", "[".repeat(limit), "]".repeat(limit)));
        let a = table.lookup("A").unwrap();
        assert_eq!(parsed.rules[0].condition, Clause::signal(a));
    }

    #[test]
    fn test_same_step_neighbor_write_rejected() {
        let err = parse_err("A: 0/1.B");
        assert!(err.is_syntax());
    }
}

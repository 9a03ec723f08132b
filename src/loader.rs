//! 自动机定义的文本格式.
//!
//! ```text
//! # 注释
//! states 6
//! start 0
//! accept 5
//! terminals a b $
//! variables A B
//! rule S -> E $
//! trans 0 ε : -> 1 : $
//! trans 5 ε : #5 $ #* E #1 -> 5 : S / 0
//! ```
//!
//! 栈符号: `#n` 状态, `#*` 通配状态, `?x` 终结符 `x` 的前瞻标记, 已声明的变量名为变量, 其余为终结符.
//! `rule` 按出现顺序从 0 编号, 转移中 `/` 之后是归约产生式的编号.

use std::collections::HashSet;

use bumpalo::Bump;
use tracing::debug;

use crate::{
    Automaton, Grammar, GrammarToken, StackToken, Terminal, Variable,
    error::{Error, ParseAutomatonError},
    token::{EPSILON, WILDCARD},
};

/// 从文本中解析出的自动机和它引用的产生式表.
#[derive(Debug, Clone)]
pub struct Definition<'a> {
    pub automaton: Automaton<'a>,
    pub grammar: Grammar<'a>,
}

#[derive(Default)]
struct Header<'a> {
    states: Option<usize>,
    start: Option<usize>,
    accept: Vec<usize>,
    terminals: Vec<&'a str>,
    variables: HashSet<&'a str>,
}

fn parse_number(line: usize, s: &str) -> Result<usize, Error> {
    s.parse().map_err(|_| {
        Error::parse_automaton_error(line, ParseAutomatonError::InvalidNumber(s.to_string()))
    })
}

/// 去掉注释行和空行, 保留原始行号. 只有以 `#` 开头的整行是注释, 行内的 `#n` 是状态符号.
fn meaningful_lines(s: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    s.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with('#'))
        .filter_map(|(line_num, line)| {
            let words: Vec<_> = line.split_whitespace().collect();
            (!words.is_empty()).then_some((line_num, words))
        })
}

impl<'a> Definition<'a> {
    /// 解析自动机定义.
    ///
    /// 头部指令可以以任意顺序出现, 但是 `states` 和 `start` 必须存在.
    /// # Errors
    /// - [`Error::ParseAutomatonError`] 格式错误, 或者某一条转移被自动机拒绝.
    /// - 其他见: [`Automaton::new`].
    pub fn parse(s: &'a str, bump: &'a Bump) -> Result<Self, Error> {
        let mut header = Header::default();
        let mut rule_lines = Vec::new();
        let mut trans_lines = Vec::new();
        for (line_num, words) in meaningful_lines(s) {
            let (directive, args) = (words[0], &words[1..]);
            match directive {
                "states" => header.states = Some(parse_number(line_num, args.join(" ").as_str())?),
                "start" => header.start = Some(parse_number(line_num, args.join(" ").as_str())?),
                "accept" => {
                    for arg in args {
                        header.accept.push(parse_number(line_num, arg)?);
                    }
                }
                "terminals" => header.terminals.extend(args),
                "variables" => header.variables.extend(args),
                "rule" => rule_lines.push((line_num, args.to_vec())),
                "trans" => trans_lines.push((line_num, args.to_vec())),
                other => Err(Error::parse_automaton_error(
                    line_num,
                    ParseAutomatonError::UnknownDirective(other.to_string()),
                ))?,
            }
        }
        let missing = |name| Error::parse_automaton_error(0, ParseAutomatonError::MissingHeader(name));
        let states = header.states.ok_or_else(|| missing("states"))?;
        let start = header.start.ok_or_else(|| missing("start"))?;

        let mut grammar = Grammar::new(bump);
        for (line_num, words) in rule_lines {
            let (lhs, rhs) = match words.as_slice() {
                [lhs, "->", rhs @ ..] => (*lhs, rhs),
                _ => Err(Error::parse_automaton_error(
                    line_num,
                    ParseAutomatonError::NoArrow,
                ))?,
            };
            let rhs = rhs
                .iter()
                .map(|&s| {
                    if header.variables.contains(s) {
                        GrammarToken::from(Variable::from(s))
                    } else {
                        GrammarToken::from(Terminal::from(s))
                    }
                })
                .collect();
            grammar.add_rule(Variable::from(lhs), rhs);
        }

        let mut automaton = Automaton::new(
            states,
            start,
            header.terminals.iter().copied(),
            header.variables.iter().copied(),
            header.accept.iter().copied(),
        )?;
        for (line_num, words) in trans_lines {
            Self::parse_transition(line_num, &words, &header, &grammar, &mut automaton)?;
        }
        debug!("loaded automaton with {} transitions", automaton.table().len());
        Ok(Self { automaton, grammar })
    }

    fn stack_token(line: usize, word: &'a str, header: &Header<'a>) -> Result<StackToken<'a>, Error> {
        if let Some(state) = word.strip_prefix('#') {
            if state == "*" {
                return Ok(WILDCARD);
            }
            return Ok(StackToken::state(parse_number(line, state)?));
        }
        if let Some(term) = word.strip_prefix('?')
            && !term.is_empty()
        {
            return Ok(StackToken::lookahead(Terminal::from(term)));
        }
        if header.variables.contains(word) {
            Ok(Variable::from(word).into())
        } else {
            Ok(Terminal::from(word).into())
        }
    }

    /// `<from> <input> : <pattern...> -> <to> : <replacement...> [/ <rule...>]`
    fn parse_transition(
        line: usize,
        words: &[&'a str],
        header: &Header<'a>,
        grammar: &Grammar<'a>,
        automaton: &mut Automaton<'a>,
    ) -> Result<(), Error> {
        let missing = |sep| Error::parse_automaton_error(line, ParseAutomatonError::MissingSeparator(sep));
        let (from, input, rest) = match words {
            [from, input, ":", rest @ ..] => (*from, *input, rest),
            _ => Err(missing(":"))?,
        };
        let arrow = rest
            .iter()
            .position(|w| *w == "->")
            .ok_or_else(|| missing("->"))?;
        let (pattern, rest) = (&rest[..arrow], &rest[arrow + 1..]);
        let (to, rest) = match rest {
            [to, ":", rest @ ..] => (*to, rest),
            _ => Err(missing(":"))?,
        };
        let (replacement, rules) = match rest.iter().position(|w| *w == "/") {
            Some(slash) => (&rest[..slash], &rest[slash + 1..]),
            None => (rest, &[][..]),
        };

        let input = if matches!(input, "ε" | "eps") {
            EPSILON
        } else {
            Terminal::from(input)
        };
        let pattern = pattern
            .iter()
            .map(|&w| Self::stack_token(line, w, header))
            .collect::<Result<Vec<_>, _>>()?;
        let replacement = replacement
            .iter()
            .map(|&w| Self::stack_token(line, w, header))
            .collect::<Result<Vec<_>, _>>()?;
        let rules = rules
            .iter()
            .map(|w| {
                let idx = parse_number(line, w)?;
                grammar.rule(idx).ok_or_else(|| {
                    Error::parse_automaton_error(line, ParseAutomatonError::UnknownRule(idx))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        automaton
            .add_transition(
                parse_number(line, from)?,
                input,
                pattern,
                parse_number(line, to)?,
                replacement,
                rules,
            )
            .map_err(|e| {
                Error::parse_automaton_error(line, ParseAutomatonError::Rejected(Box::new(e)))
            })
    }
}

#[cfg(test)]
mod test {
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    use crate::{
        StackToken, Terminal, Variable,
        derivation::Derivation,
        error::{Ambiguity, Error, ParseAutomatonError},
        fixtures,
        loader::Definition,
        token::{EPSILON, WILDCARD},
    };

    const BALANCED: &str = include_str!("../demos/balanced.dpda");
    const ARITHMETIC: &str = include_str!("../demos/arithmetic.dpda");

    fn word(s: &str) -> Vec<Terminal<'_>> {
        s.split_whitespace().map(Terminal::from).collect()
    }

    #[test]
    fn balanced_file_matches_fixture() {
        let bump = Bump::new();
        let def = Definition::parse(BALANCED, &bump).unwrap();
        assert_eq!(def.automaton, fixtures::balanced());
        assert!(def.grammar.rules().is_empty());
        let trace = def.automaton.run(&word("a a b b b a a b $")).unwrap();
        assert!(trace.is_accepted());
    }

    #[test]
    fn arithmetic_file_matches_fixture() {
        let bump = Bump::new();
        let def = Definition::parse(ARITHMETIC, &bump).unwrap();
        let (pda, grammar) = fixtures::arithmetic(&bump);
        assert_eq!(def.grammar, grammar);
        assert_eq!(def.automaton, pda);
        let trace = def.automaton.run(&word("n * n + ( n * n ) $")).unwrap();
        let derivation = Derivation::from_trace(&trace).unwrap();
        assert_eq!(derivation.len(), 15);
    }

    #[test]
    fn stack_tokens_and_rules() {
        let input = "
            states 6
            start 0
            accept 5
            terminals n $
            variables S E
            rule S -> E $
            trans 0 ε : -> 1 : #1
            trans 5 eps : #5 $ #* E #1 -> 5 : S / 0
            trans 4 ε : ?$ -> 5 : #5 $
        ";
        let bump = Bump::new();
        let def = Definition::parse(input, &bump).unwrap();
        let t = def.automaton.transitions(5);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].input(), EPSILON);
        assert_eq!(
            t[0].pattern(),
            [
                StackToken::state(5),
                Terminal::from("$").into(),
                WILDCARD,
                Variable::from("E").into(),
                StackToken::state(1),
            ]
        );
        assert_eq!(t[0].replacement(), [StackToken::from(Variable::from("S"))]);
        assert_eq!(t[0].rules()[0].to_string(), "S -> E $");
        assert_eq!(
            def.automaton.transitions(4)[0].pattern(),
            [StackToken::lookahead(Terminal::from("$"))]
        );
        assert!(def.automaton.transitions(0)[0].pattern().is_empty());
    }

    #[test]
    fn errors_carry_line() {
        let bump = Bump::new();
        assert_eq!(
            Definition::parse("start 0\nfoo 1", &bump).unwrap_err(),
            Error::ParseAutomatonError {
                line: 1,
                cause: ParseAutomatonError::UnknownDirective("foo".to_string())
            }
        );
        assert_eq!(
            Definition::parse("start 0", &bump).unwrap_err(),
            Error::ParseAutomatonError {
                line: 0,
                cause: ParseAutomatonError::MissingHeader("states")
            }
        );
        assert_eq!(
            Definition::parse("states x", &bump).unwrap_err(),
            Error::ParseAutomatonError {
                line: 0,
                cause: ParseAutomatonError::InvalidNumber("x".to_string())
            }
        );
        assert_eq!(
            Definition::parse("states 2\nstart 0\ntrans 0 ε : -> 1 : / 3", &bump).unwrap_err(),
            Error::ParseAutomatonError {
                line: 2,
                cause: ParseAutomatonError::UnknownRule(3)
            }
        );
        assert_eq!(
            Definition::parse("states 2\nstart 0\ntrans 0 ε : 1 : ", &bump).unwrap_err(),
            Error::ParseAutomatonError {
                line: 2,
                cause: ParseAutomatonError::MissingSeparator("->")
            }
        );
        let ambiguous = "
states 2
start 0
terminals a
trans 0 a : a -> 1 : a
trans 0 ε : a -> 1 :
";
        assert!(matches!(
            Definition::parse(ambiguous, &bump).unwrap_err(),
            Error::ParseAutomatonError {
                line: 5,
                cause: ParseAutomatonError::Rejected(e),
            } if matches!(*e, Error::DeterminismViolation { cause: Ambiguity::ShadowsInput, .. })
        ));
    }
}

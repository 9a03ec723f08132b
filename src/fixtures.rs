//! 测试用的自动机.

use bumpalo::Bump;

use crate::{
    Automaton, Grammar, StackToken, Terminal, Variable,
    token::{EPSILON, WILDCARD},
};

/// 识别 a 和 b 交替出现且数量平衡的串, 以 `$` 结尾.
pub(crate) fn balanced() -> Automaton<'static> {
    let mut pda = Automaton::new(6, 0, ["a", "b", "$"], ["A", "B"], [5]).unwrap();
    let a = Terminal::from("a");
    let b = Terminal::from("b");
    let end = Terminal::from("$");
    let (sa, sb, send) = (StackToken::from(a), StackToken::from(b), StackToken::from(end));
    let transitions = [
        (0, EPSILON, vec![], 1, vec![send]),
        (1, a, vec![send], 2, vec![send]),
        (1, b, vec![send], 3, vec![send]),
        (2, EPSILON, vec![], 4, vec![sa]),
        (3, EPSILON, vec![], 4, vec![sb]),
        (4, a, vec![send], 2, vec![send]),
        (4, a, vec![sa], 2, vec![sa]),
        (4, b, vec![send], 3, vec![send]),
        (4, b, vec![sb], 3, vec![sb]),
        (4, b, vec![sa], 4, vec![]),
        (4, a, vec![sb], 4, vec![]),
        (4, end, vec![send], 5, vec![]),
    ];
    for (from, input, pattern, to, replacement) in transitions {
        pda.add_transition(from, input, pattern, to, replacement, vec![])
            .unwrap();
    }
    pda
}

pub(crate) const ARITHMETIC_CFG: &str = "
S -> E $
E -> T + E | T
T -> F * T | F
F -> ( E ) | n
";

/// 算术表达式文法的 LR 风格编码, 使用状态符号和前瞻标记.
///
/// 产生式编号: 0 `S -> E $`, 1 `E -> T + E`, 2 `E -> T`, 3 `T -> F * T`, 4 `T -> F`,
/// 5 `F -> ( E )`, 6 `F -> n`.
pub(crate) fn arithmetic(bump: &Bump) -> (Automaton<'_>, Grammar<'_>) {
    let grammar = Grammar::from_cfg(ARITHMETIC_CFG, bump).unwrap();
    let rule = |idx: usize| grammar.rule(idx).unwrap();
    let mut pda = Automaton::new(
        14,
        0,
        ["n", "+", "*", "(", ")", "$"],
        ["S", "E", "T", "F"],
        [5],
    )
    .unwrap();
    let st = StackToken::state;
    let t = |s: &'static str| StackToken::from(Terminal::from(s));
    let v = |s: &'static str| StackToken::from(Variable::from(s));
    let la = |s: &'static str| StackToken::lookahead(Terminal::from(s));
    let n = Terminal::from("n");
    let plus = Terminal::from("+");
    let mult = Terminal::from("*");
    let open = Terminal::from("(");
    let close = Terminal::from(")");
    let end = Terminal::from("$");

    let mut add = |from: usize,
                   input: Terminal<'static>,
                   pattern: Vec<StackToken<'static>>,
                   to: usize,
                   replacement: Vec<StackToken<'static>>,
                   rules: &[usize]| {
        pda.add_transition(
            from,
            input,
            pattern,
            to,
            replacement,
            rules.iter().map(|&i| rule(i)).collect(),
        )
        .unwrap();
    };

    add(0, EPSILON, vec![], 1, vec![st(1)], &[]);
    add(1, n, vec![], 2, vec![st(2), t("n")], &[]);
    add(1, open, vec![], 3, vec![st(3), t("(")], &[]);
    for prev in [1, 3, 10, 11] {
        add(
            2,
            EPSILON,
            vec![st(2), t("n"), st(prev)],
            8,
            vec![st(8), v("F"), st(prev)],
            &[6],
        );
    }
    add(3, n, vec![], 2, vec![st(2), t("n")], &[]);
    add(3, open, vec![], 3, vec![st(3), t("(")], &[]);
    add(4, end, vec![st(4)], 5, vec![st(5), t("$")], &[]);
    add(4, EPSILON, vec![la("$")], 5, vec![st(5), t("$")], &[]);
    add(
        5,
        EPSILON,
        vec![st(5), t("$"), WILDCARD, v("E"), st(1)],
        5,
        vec![v("S")],
        &[0],
    );
    for (prev, next) in [(1, 4), (3, 7), (10, 13)] {
        add(
            6,
            close,
            vec![st(6), v("T"), st(prev)],
            next,
            vec![la(")"), st(next), v("E"), st(prev)],
            &[2],
        );
        add(
            6,
            EPSILON,
            vec![la(")"), st(6), v("T"), st(prev)],
            next,
            vec![la(")"), st(next), v("E"), st(prev)],
            &[2],
        );
        add(
            6,
            end,
            vec![st(6), v("T"), st(prev)],
            next,
            vec![la("$"), st(next), v("E"), st(prev)],
            &[2],
        );
        add(
            6,
            EPSILON,
            vec![la("$"), st(6), v("T"), st(prev)],
            next,
            vec![la("$"), st(next), v("E"), st(prev)],
            &[2],
        );
    }
    add(6, plus, vec![], 10, vec![st(10), t("+")], &[]);
    add(6, EPSILON, vec![la("+")], 10, vec![st(10), t("+")], &[]);
    add(7, close, vec![st(7)], 9, vec![st(9), t(")")], &[]);
    add(7, EPSILON, vec![la(")")], 9, vec![st(9), t(")")], &[]);
    add(8, mult, vec![], 11, vec![st(11), t("*")], &[]);
    for (prev, next) in [(1, 6), (3, 6), (10, 6), (11, 12)] {
        for (input, ahead) in [(plus, "+"), (close, ")"), (end, "$")] {
            add(
                8,
                input,
                vec![st(8), v("F"), st(prev)],
                next,
                vec![la(ahead), st(next), v("T"), st(prev)],
                &[4],
            );
        }
        for ahead in ["+", ")", "$"] {
            add(
                8,
                EPSILON,
                vec![la(ahead), st(8), v("F"), st(prev)],
                next,
                vec![la(ahead), st(next), v("T"), st(prev)],
                &[4],
            );
        }
    }
    for prev in [1, 3, 10, 11] {
        let reduced = vec![
            st(9),
            t(")"),
            WILDCARD,
            v("E"),
            WILDCARD,
            t("("),
            st(prev),
        ];
        add(
            9,
            EPSILON,
            reduced.clone(),
            8,
            vec![st(8), v("F"), st(prev)],
            &[5],
        );
        add(
            9,
            EPSILON,
            [vec![la(")")], reduced].concat(),
            8,
            vec![la(")"), st(8), v("F"), st(prev)],
            &[5],
        );
    }
    for from in [10, 11] {
        add(from, n, vec![], 2, vec![st(2), t("n")], &[]);
        add(from, open, vec![], 3, vec![st(3), t("(")], &[]);
    }
    for (prev, next) in [(1, 6), (3, 6), (10, 6), (11, 12)] {
        let reduced = vec![
            st(12),
            v("T"),
            WILDCARD,
            t("*"),
            WILDCARD,
            v("F"),
            st(prev),
        ];
        add(
            12,
            EPSILON,
            reduced.clone(),
            next,
            vec![st(next), v("T"), st(prev)],
            &[3],
        );
        for ahead in [")", "$", "+"] {
            add(
                12,
                EPSILON,
                [vec![la(ahead)], reduced.clone()].concat(),
                next,
                vec![la(ahead), st(next), v("T"), st(prev)],
                &[3],
            );
        }
    }
    for (prev, next) in [(1, 4), (3, 7), (10, 13)] {
        let reduced = vec![
            st(13),
            v("E"),
            WILDCARD,
            t("+"),
            WILDCARD,
            v("T"),
            st(prev),
        ];
        add(
            13,
            EPSILON,
            reduced.clone(),
            next,
            vec![st(next), v("E"), st(prev)],
            &[1],
        );
        for ahead in [")", "$"] {
            add(
                13,
                EPSILON,
                [vec![la(ahead)], reduced.clone()].concat(),
                next,
                vec![la(ahead), st(next), v("E"), st(prev)],
                &[1],
            );
        }
    }
    (pda, grammar)
}

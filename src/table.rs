use std::fmt::Display;

use tracing::debug;

use crate::{
    Rule, StackToken, Terminal,
    error::{Ambiguity, Error},
    stack::Stack,
};

/// 一条转移: `(from, input, pattern) -> (to, replacement)`, 并附带归约产生式.
///
/// `pattern` 和 `replacement` 的第一个元素都对应栈顶.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<'a> {
    from: usize,
    input: Terminal<'a>,
    pattern: Vec<StackToken<'a>>,
    to: usize,
    replacement: Vec<StackToken<'a>>,
    rules: Vec<&'a Rule<'a>>,
}

fn tokens_to_string(tokens: &[StackToken<'_>]) -> String {
    if tokens.is_empty() {
        "ε".to_string()
    } else {
        tokens
            .iter()
            .map(|t| format!("{t} "))
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

impl Display for Transition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(
            "({}, {}, {}) -> ({}, {})",
            self.from,
            self.input,
            tokens_to_string(&self.pattern),
            self.to,
            tokens_to_string(&self.replacement),
        ))
    }
}

impl<'a> Transition<'a> {
    #[must_use]
    pub fn new(
        from: usize,
        input: Terminal<'a>,
        pattern: Vec<StackToken<'a>>,
        to: usize,
        replacement: Vec<StackToken<'a>>,
        rules: Vec<&'a Rule<'a>>,
    ) -> Self {
        Self {
            from,
            input,
            pattern,
            to,
            replacement,
            rules,
        }
    }

    #[must_use]
    pub fn from(&self) -> usize {
        self.from
    }

    #[must_use]
    pub fn input(&self) -> Terminal<'a> {
        self.input
    }

    #[must_use]
    pub fn pattern(&self) -> &[StackToken<'a>] {
        &self.pattern
    }

    #[must_use]
    pub fn to(&self) -> usize {
        self.to
    }

    #[must_use]
    pub fn replacement(&self) -> &[StackToken<'a>] {
        &self.replacement
    }

    #[must_use]
    pub fn rules(&self) -> &[&'a Rule<'a>] {
        &self.rules
    }

    /// 检查新转移 `other` 是否和自身在同一状态下产生歧义.
    fn ambiguity_with(&self, other: &Transition<'_>) -> Option<Ambiguity> {
        match (self.pattern.is_empty(), other.pattern.is_empty()) {
            // 输入不同时由优先级区分, epsilon 在前.
            (true, true) => (self.input == other.input).then_some(Ambiguity::EmptyStackTop),
            (false, false) if prefix_compatible(&self.pattern, &other.pattern) => {
                if self.input.is_epsilon() {
                    Some(Ambiguity::EpsilonExists)
                } else if other.input.is_epsilon() {
                    Some(Ambiguity::ShadowsInput)
                } else if self.input == other.input {
                    Some(Ambiguity::SameInput)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// 两个栈顶模式中较短的一个是否 (带通配地) 是另一个的前缀.
fn prefix_compatible(a: &[StackToken<'_>], b: &[StackToken<'_>]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.matches(y))
}

/// 查询转移时对栈顶模式的要求.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// 栈顶模式必须为空.
    Empty,
    /// 栈顶模式必须是实际栈 (自顶向下) 的结构前缀.
    Prefix,
}

/// 按状态分组的转移表, 同一状态下的插入顺序就是匹配顺序.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable<'a> {
    rows: Vec<Vec<Transition<'a>>>,
}

impl<'a> TransitionTable<'a> {
    #[must_use]
    pub fn new(state_count: usize) -> Self {
        Self {
            rows: vec![Vec::new(); state_count],
        }
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    /// 某个状态的所有转移, 状态不存在时为空.
    #[must_use]
    pub fn transitions(&self, state: usize) -> &[Transition<'a>] {
        self.rows.get(state).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition<'a>> {
        self.rows.iter().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 插入一条转移, 不做符号检查, 只检查确定性.
    /// # Errors
    /// - [`Error::InvalidState`] 起始状态不在表中.
    /// - [`Error::DeterminismViolation`] 和已有转移产生歧义, 此时表保持不变.
    pub(crate) fn insert(&mut self, transition: Transition<'a>) -> Result<(), Error> {
        let from = transition.from;
        let row = self
            .rows
            .get_mut(from)
            .ok_or(Error::InvalidState(from))?;
        for existing in row.iter() {
            if let Some(cause) = existing.ambiguity_with(&transition) {
                Err(Error::DeterminismViolation {
                    state: from,
                    cause,
                    existing: existing.to_string(),
                })?
            }
        }
        debug!("add transition {transition}");
        row.push(transition);
        Ok(())
    }

    /// 按插入顺序遍历满足条件的转移.
    pub fn candidates<'s>(
        &'s self,
        state: usize,
        input: Terminal<'_>,
        stack: &Stack<'_>,
        mode: PatternMode,
    ) -> impl Iterator<Item = &'s Transition<'a>> {
        self.transitions(state).iter().filter(move |t| {
            t.input.as_str() == input.as_str()
                && match mode {
                    PatternMode::Empty => t.pattern.is_empty(),
                    PatternMode::Prefix => stack.starts_with(&t.pattern),
                }
        })
    }

    /// 查询第一条满足条件的转移, 确定性保证它也是唯一的一条.
    #[must_use]
    pub fn lookup(
        &self,
        state: usize,
        input: Terminal<'_>,
        stack: &Stack<'_>,
        mode: PatternMode,
    ) -> Option<&Transition<'a>> {
        self.candidates(state, input, stack, mode).next()
    }

    /// 使用 markdown 形式输出转移表.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let header_line = "| from | input | stack top | to | replacement | rules |";
        let sep_line = "| - | - | - | - | - | - |";
        let mut data_lines = String::new();
        for t in self.iter() {
            let rules = t
                .rules
                .iter()
                .map(|r| format!("`{r}`, "))
                .collect::<String>();
            data_lines += &format!(
                "| {} | `{}` | `{}` | {} | `{}` | {} |\n",
                t.from,
                t.input,
                tokens_to_string(&t.pattern),
                t.to,
                tokens_to_string(&t.replacement),
                rules.trim_end_matches([',', ' '])
            );
        }
        format!("{header_line}\n{sep_line}\n{}", data_lines.trim_end())
    }
}

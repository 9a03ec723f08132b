use bumpalo::Bump;
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt::{Debug, Display},
};

use crate::{
    GrammarToken, Terminal, Variable,
    error::{Error, ParseProductionError},
};

/// 产生式, 只作为转移上的归约标签使用, 创建之后不可变.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rule<'a> {
    // 产生式 `->` 左侧内容.
    lhs: Variable<'a>,
    // 产生式 `->` 右侧内容, 可以为空.
    rhs: Vec<GrammarToken<'a>>,
}

impl Debug for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule")
            .field(&format_args!(
                "{:?} -> {}",
                self.lhs,
                self.rhs
                    .iter()
                    .map(|t| format!("{:?} ", t))
                    .collect::<String>()
                    .trim_end()
            ))
            .finish()
    }
}

impl Display for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(
            "{} -> {}",
            self.lhs,
            self.rhs
                .iter()
                .map(|t| format!("{} ", t))
                .collect::<String>()
                .trim_end()
        ))
    }
}

impl<'a> Rule<'a> {
    #[must_use]
    pub fn new(lhs: Variable<'a>, rhs: Vec<GrammarToken<'a>>) -> Self {
        Self { lhs, rhs }
    }

    #[must_use]
    pub fn lhs(&self) -> Variable<'a> {
        self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> &[GrammarToken<'a>] {
        &self.rhs
    }
}

/// 产生式表.
///
/// 产生式分配在 [`Bump`] 中, 转移直接持有 `&'a Rule<'a>`.
/// 产生式之间只做结构比较, 不依赖地址.
#[derive(Debug, Clone)]
pub struct Grammar<'a> {
    bump: &'a Bump,
    rules: Vec<&'a Rule<'a>>,
    rule_indexes: HashMap<&'a Rule<'a>, usize>,
}

impl PartialEq for Grammar<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules
    }
}

impl Eq for Grammar<'_> {}

impl<'a> Grammar<'a> {
    #[must_use]
    pub fn new(bump: &'a Bump) -> Self {
        Self {
            bump,
            rules: Vec::new(),
            rule_indexes: HashMap::new(),
        }
    }

    /// 添加一条产生式, 如果已经存在结构相同的产生式, 那么返回已有的那一条.
    pub fn add_rule(&mut self, lhs: Variable<'a>, rhs: Vec<GrammarToken<'a>>) -> &'a Rule<'a> {
        let rule = Rule::new(lhs, rhs);
        if let Some(&idx) = self.rule_indexes.get(&rule) {
            return self.rules[idx];
        }
        let rule = &*self.bump.alloc(rule);
        self.rule_indexes.insert(rule, self.rules.len());
        self.rules.push(rule);
        rule
    }

    /// 按产生式编号遍历产生式.
    pub fn rules(&self) -> &[&'a Rule<'a>] {
        &self.rules
    }

    #[must_use]
    pub fn rule(&self, idx: usize) -> Option<&'a Rule<'a>> {
        self.rules.get(idx).copied()
    }

    /// 获取产生式的编号, 如果产生式在表中不存在, 那么返回 [`None`].
    #[must_use]
    pub fn index_of_rule(&self, rule: &Rule<'a>) -> Option<usize> {
        self.rule_indexes.get(rule).copied()
    }

    /// 第一条产生式的左部.
    #[must_use]
    pub fn start(&self) -> Option<Variable<'a>> {
        self.rules.first().map(|r| r.lhs())
    }

    #[must_use]
    pub fn variables(&self) -> BTreeSet<Variable<'a>> {
        self.rules.iter().map(|r| r.lhs()).collect()
    }

    #[must_use]
    pub fn terminals(&self) -> BTreeSet<Terminal<'a>> {
        self.rules
            .iter()
            .flat_map(|r| r.rhs().iter())
            .filter_map(|t| t.as_terminal().copied())
            .collect()
    }

    /// 解析形如 `A -> x y | z` 的产生式文本.
    ///
    /// 出现在 `->` 左侧的符号都是变量, 其他符号都是终结符, 空的候选式表示空产生式.
    /// 产生式按出现顺序编号, 第一条产生式的左部为开始符号.
    pub fn from_cfg(s: &'a str, bump: &'a Bump) -> Result<Self, Error> {
        let mut variables = HashSet::new();
        let mut splitted: Vec<(&str, &str)> = Vec::new();
        // 找出所有的变量.
        for (line_num, line) in s
            .lines()
            .enumerate()
            .filter(|(_, s)| s.chars().any(|c| !c.is_whitespace()))
        {
            let parts = line.split_once("->").ok_or(Error::parse_production_error(
                line_num,
                ParseProductionError::NoArrow,
            ))?;
            let lhs = parts.0.trim();
            if lhs.is_empty() {
                Err(Error::parse_production_error(
                    line_num,
                    ParseProductionError::EmptyHead,
                ))?
            }
            splitted.push((lhs, parts.1));
            variables.insert(lhs);
        }
        let mut grammar = Self::new(bump);
        for (lhs, alternatives) in splitted {
            for alternative in alternatives.split('|') {
                let rhs = alternative
                    .split_ascii_whitespace()
                    .map(|s| {
                        if variables.contains(&s) {
                            GrammarToken::from(Variable::from(s))
                        } else {
                            GrammarToken::from(Terminal::from(s))
                        }
                    })
                    .collect();
                grammar.add_rule(Variable::from(lhs), rhs);
            }
        }
        Ok(grammar)
    }
}

use std::fmt::{Debug, Display};

#[derive(PartialEq, Eq, Clone, Hash, Copy, PartialOrd, Ord)]
pub struct Terminal<'a> {
    ident: &'a str,
}

impl Debug for Terminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(r#"t{:?}"#, self.ident))
    }
}

impl Display for Terminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.ident)
    }
}

impl<'a> From<&'a str> for Terminal<'a> {
    fn from(ident: &'a str) -> Self {
        Terminal { ident }
    }
}

impl<'a> Terminal<'a> {
    pub fn as_str(&self) -> &'a str {
        self.ident
    }

    #[must_use]
    pub fn is_epsilon(&self) -> bool {
        *self == EPSILON
    }
}

/// 空输入符号, 不能作为自定义的终结符名称.
pub const EPSILON: Terminal<'static> = Terminal { ident: "ε" };

#[derive(PartialEq, Eq, Clone, Hash, Copy, PartialOrd, Ord)]
pub struct Variable<'a> {
    ident: &'a str,
}

impl Debug for Variable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(r#"v{:?}"#, self.ident))
    }
}

impl Display for Variable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.ident)
    }
}

impl<'a> From<&'a str> for Variable<'a> {
    fn from(ident: &'a str) -> Self {
        Self { ident }
    }
}

impl<'a> Variable<'a> {
    pub fn as_str(&self) -> &'a str {
        self.ident
    }
}

/// 文法符号: 出现在产生式与句型中.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrammarToken<'a> {
    Terminal(Terminal<'a>),
    Variable(Variable<'a>),
}

impl Debug for GrammarToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(arg0) => f.pad(&format!("{:?}", arg0)),
            Self::Variable(arg0) => f.pad(&format!("{:?}", arg0)),
        }
    }
}

impl Display for GrammarToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(arg0) => f.pad(&format!("{}", arg0)),
            Self::Variable(arg0) => f.pad(&format!("{}", arg0)),
        }
    }
}

impl<'a> GrammarToken<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Terminal(t) => t.as_str(),
            Self::Variable(v) => v.as_str(),
        }
    }

    #[must_use]
    pub fn as_terminal(&self) -> Option<&Terminal<'a>> {
        match self {
            Self::Terminal(t) => Some(t),
            Self::Variable(_) => None,
        }
    }

    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
}

impl<'a> From<Terminal<'a>> for GrammarToken<'a> {
    fn from(value: Terminal<'a>) -> Self {
        Self::Terminal(value)
    }
}

impl<'a> From<Variable<'a>> for GrammarToken<'a> {
    fn from(value: Variable<'a>) -> Self {
        Self::Variable(value)
    }
}

/// 编码在栈中的状态编号.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum EncodedState {
    Id(usize),
    /// 只在栈顶模式中使用, 匹配任意状态.
    Wildcard,
}

impl Display for EncodedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => f.pad(&format!("#{id}")),
            Self::Wildcard => f.pad("#*"),
        }
    }
}

/// 栈符号.
///
/// 相等性是纯结构的, [`WILDCARD`] 只和自身相等;
/// 带通配语义的比较见 [`StackToken::matches`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum StackToken<'a> {
    Terminal(Terminal<'a>),
    Variable(Variable<'a>),
    State(EncodedState),
    /// 前瞻标记: 下一个未读取的输入符号.
    Lookahead(Terminal<'a>),
}

pub const WILDCARD: StackToken<'static> = StackToken::State(EncodedState::Wildcard);

impl Debug for StackToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(t) => f.pad(&format!("{:?}", t)),
            Self::Variable(v) => f.pad(&format!("{:?}", v)),
            Self::State(s) => f.pad(&format!("{}", s)),
            Self::Lookahead(t) => f.pad(&format!("?{:?}", t)),
        }
    }
}

impl Display for StackToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(t) => f.pad(&format!("{}", t)),
            Self::Variable(v) => f.pad(&format!("{}", v)),
            Self::State(s) => f.pad(&format!("{}", s)),
            Self::Lookahead(t) => f.pad(&format!("?{}", t)),
        }
    }
}

impl<'a> StackToken<'a> {
    #[must_use]
    pub fn state(id: usize) -> Self {
        Self::State(EncodedState::Id(id))
    }

    #[must_use]
    pub fn lookahead(term: Terminal<'a>) -> Self {
        Self::Lookahead(term)
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::State(EncodedState::Wildcard))
    }

    /// 带通配的匹配: 任意一侧为 [`WILDCARD`] 时和任何状态符号匹配, 其余情况退化为结构相等.
    #[must_use]
    pub fn matches(&self, other: &StackToken<'_>) -> bool {
        match (self, other) {
            (StackToken::State(EncodedState::Wildcard), StackToken::State(_))
            | (StackToken::State(_), StackToken::State(EncodedState::Wildcard)) => true,
            (StackToken::State(a), StackToken::State(b)) => a == b,
            (StackToken::Terminal(a), StackToken::Terminal(b))
            | (StackToken::Lookahead(a), StackToken::Lookahead(b)) => a.as_str() == b.as_str(),
            (StackToken::Variable(a), StackToken::Variable(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl<'a> From<Terminal<'a>> for StackToken<'a> {
    fn from(value: Terminal<'a>) -> Self {
        Self::Terminal(value)
    }
}

impl<'a> From<Variable<'a>> for StackToken<'a> {
    fn from(value: Variable<'a>) -> Self {
        Self::Variable(value)
    }
}

impl<'a> From<GrammarToken<'a>> for StackToken<'a> {
    fn from(value: GrammarToken<'a>) -> Self {
        match value {
            GrammarToken::Terminal(t) => Self::Terminal(t),
            GrammarToken::Variable(v) => Self::Variable(v),
        }
    }
}

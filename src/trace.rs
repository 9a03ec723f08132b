use std::fmt::Display;

use crate::{StackToken, Terminal, table::Transition};

/// 运行轨迹中的一步.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration<'t, 'a> {
    /// 执行转移之前的状态.
    state: usize,
    /// 本步消耗的输入, epsilon 转移为 [`crate::EPSILON`].
    consumed: Terminal<'a>,
    /// 执行转移之前的栈内容, 自顶向下.
    stack: Vec<StackToken<'a>>,
    transition: &'t Transition<'a>,
    accepting: bool,
}

impl Display for Configuration<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stack = if self.stack.is_empty() {
            "ε".to_string()
        } else {
            self.stack
                .iter()
                .map(|t| format!("{t} "))
                .collect::<String>()
                .trim_end()
                .to_string()
        };
        f.pad(&format!("({}, {}, {})", self.state, self.consumed, stack))
    }
}

impl<'t, 'a> Configuration<'t, 'a> {
    pub(crate) fn new(
        state: usize,
        consumed: Terminal<'a>,
        stack: Vec<StackToken<'a>>,
        transition: &'t Transition<'a>,
        accepting: bool,
    ) -> Self {
        Self {
            state,
            consumed,
            stack,
            transition,
            accepting,
        }
    }

    #[must_use]
    pub fn state(&self) -> usize {
        self.state
    }

    #[must_use]
    pub fn consumed(&self) -> Terminal<'a> {
        self.consumed
    }

    #[must_use]
    pub fn stack(&self) -> &[StackToken<'a>] {
        &self.stack
    }

    #[must_use]
    pub fn transition(&self) -> &'t Transition<'a> {
        self.transition
    }

    /// 转移的目标状态是否是接受状态.
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

/// 一次运行的完整轨迹.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace<'t, 'a> {
    configurations: Vec<Configuration<'t, 'a>>,
    /// 是否因为没有可用的转移而中途停止.
    rejected: bool,
}

impl Display for Trace<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self
            .configurations
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        f.pad(&line)
    }
}

impl<'t, 'a> Trace<'t, 'a> {
    pub(crate) fn new(configurations: Vec<Configuration<'t, 'a>>, rejected: bool) -> Self {
        Self {
            configurations,
            rejected,
        }
    }

    #[must_use]
    pub fn configurations(&self) -> &[Configuration<'t, 'a>] {
        &self.configurations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Configuration<'t, 'a>> {
        self.configurations.last()
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// 没有中途停止, 并且最后一步是接受的.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !self.rejected && self.last().is_some_and(Configuration::is_accepting)
    }
}

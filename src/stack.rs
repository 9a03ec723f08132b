use crate::{StackToken, error::Error, table::Transition};

/// 一次运行独占的工作栈, 内部 `tokens` 的末尾为栈顶.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack<'a> {
    tokens: Vec<StackToken<'a>>,
}

impl<'a> Stack<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<&StackToken<'a>> {
        self.tokens.last()
    }

    pub fn push(&mut self, token: StackToken<'a>) {
        self.tokens.push(token);
    }

    /// 自顶向下遍历.
    pub fn iter(&self) -> impl Iterator<Item = &StackToken<'a>> {
        self.tokens.iter().rev()
    }

    /// 自顶向下的栈内容快照.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StackToken<'a>> {
        self.iter().copied().collect()
    }

    /// 栈顶模式是否是栈 (自顶向下) 的结构前缀, 模式比栈更长时不匹配.
    #[must_use]
    pub fn starts_with(&self, pattern: &[StackToken<'_>]) -> bool {
        pattern.len() <= self.depth() && pattern.iter().zip(self.iter()).all(|(p, t)| p.matches(t))
    }

    /// 弹出 `pattern` 对应的栈顶, 再压入 `replacement`, 使其第一个元素成为新的栈顶.
    /// # Errors
    /// - [`Error::StackMismatch`] 栈顶和转移的模式不匹配, 此时栈保持不变.
    pub fn apply(&mut self, transition: &Transition<'a>) -> Result<(), Error> {
        let pattern = transition.pattern();
        if !self.starts_with(pattern) {
            Err(Error::StackMismatch(transition.to_string()))?
        }
        self.tokens.truncate(self.depth() - pattern.len());
        self.tokens.extend(transition.replacement().iter().rev().copied());
        Ok(())
    }
}

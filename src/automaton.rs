use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::{
    EncodedState, GrammarToken, Rule, StackToken, Terminal, Variable,
    error::Error,
    stack::Stack,
    table::{PatternMode, Transition, TransitionTable},
    token::EPSILON,
    trace::{Configuration, Trace},
};

/// 扩展栈字母表的确定下推自动机.
///
/// 通过一系列 [`Automaton::add_transition`] 构建, 之后只读;
/// 每次 [`Automaton::run`] 使用自己独占的工作栈, 因此同一个自动机可以被多次 (并发) 运行.
///
/// # Note
/// 运行循环本身没有迭代上限, 如果转移表中存在既不消耗输入, 又让栈深度始终大于 1 的环,
/// 那么运行不会终止, 可以用 [`Automaton::with_step_limit`] 设置上限.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<'a> {
    start: usize,
    terminals: BTreeSet<Terminal<'a>>,
    variables: BTreeSet<Variable<'a>>,
    accept_states: BTreeSet<usize>,
    table: TransitionTable<'a>,
    step_limit: Option<usize>,
}

impl<'a> Automaton<'a> {
    /// # Errors
    /// - [`Error::InvalidState`] 开始状态或者接受状态不在 `0..state_count` 中.
    /// - [`Error::InvalidSymbol`] 声明了和 [`EPSILON`] 同名的终结符.
    pub fn new<T, V>(
        state_count: usize,
        start: usize,
        terminals: impl IntoIterator<Item = T>,
        variables: impl IntoIterator<Item = V>,
        accept_states: impl IntoIterator<Item = usize>,
    ) -> Result<Self, Error>
    where
        T: Into<Terminal<'a>>,
        V: Into<Variable<'a>>,
    {
        if start >= state_count {
            Err(Error::InvalidState(start))?
        }
        let accept_states: BTreeSet<usize> = accept_states.into_iter().collect();
        if let Some(&invalid) = accept_states.iter().find(|&&s| s >= state_count) {
            Err(Error::InvalidState(invalid))?
        }
        let terminals: BTreeSet<Terminal<'a>> = terminals.into_iter().map(Into::into).collect();
        if terminals.contains(&EPSILON) {
            Err(Error::invalid_symbol(EPSILON))?
        }
        Ok(Self {
            start,
            terminals,
            variables: variables.into_iter().map(Into::into).collect(),
            accept_states,
            table: TransitionTable::new(state_count),
            step_limit: None,
        })
    }

    /// 每次运行最多记录 `limit` 个格局, 超过之后运行以 [`Error::StepLimitExceeded`] 失败.
    #[must_use]
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.table.state_count()
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn terminals(&self) -> &BTreeSet<Terminal<'a>> {
        &self.terminals
    }

    #[must_use]
    pub fn variables(&self) -> &BTreeSet<Variable<'a>> {
        &self.variables
    }

    #[must_use]
    pub fn accept_states(&self) -> &BTreeSet<usize> {
        &self.accept_states
    }

    #[must_use]
    pub fn is_accept_state(&self, state: usize) -> bool {
        self.accept_states.contains(&state)
    }

    #[must_use]
    pub fn table(&self) -> &TransitionTable<'a> {
        &self.table
    }

    /// 某个状态的所有转移, 按插入顺序.
    #[must_use]
    pub fn transitions(&self, state: usize) -> &[Transition<'a>] {
        self.table.transitions(state)
    }

    fn check_state(&self, state: usize) -> Result<(), Error> {
        if state < self.state_count() {
            Ok(())
        } else {
            Err(Error::InvalidState(state))
        }
    }

    fn check_terminal(&self, term: Terminal<'a>) -> Result<(), Error> {
        if self.terminals.contains(&term) {
            Ok(())
        } else {
            Err(Error::invalid_symbol(term))
        }
    }

    fn check_variable(&self, var: Variable<'a>) -> Result<(), Error> {
        if self.variables.contains(&var) {
            Ok(())
        } else {
            Err(Error::invalid_symbol(var))
        }
    }

    fn check_stack_token(&self, token: &StackToken<'a>) -> Result<(), Error> {
        match token {
            StackToken::Terminal(t) | StackToken::Lookahead(t) => self.check_terminal(*t),
            StackToken::Variable(v) => self.check_variable(*v),
            StackToken::State(EncodedState::Id(id)) if *id >= self.state_count() => {
                Err(Error::invalid_symbol(token))
            }
            StackToken::State(_) => Ok(()),
        }
    }

    fn check_rule(&self, rule: &Rule<'a>) -> Result<(), Error> {
        self.check_variable(rule.lhs())?;
        for token in rule.rhs() {
            match token {
                GrammarToken::Terminal(t) => self.check_terminal(*t)?,
                GrammarToken::Variable(v) => self.check_variable(*v)?,
            }
        }
        Ok(())
    }

    /// 添加一条转移 `(from, input, pattern) -> (to, replacement)`.
    ///
    /// `pattern` 和 `replacement` 的第一个元素对应栈顶, `rules` 是这一步归约所用的产生式 (按归约顺序).
    /// 同一状态下转移的插入顺序决定匹配时的顺序.
    /// # Errors
    /// - [`Error::InvalidState`] 状态不在 `0..state_count` 中.
    /// - [`Error::InvalidSymbol`] 引用了未声明的终结符或变量, 状态符号越界, 或者替换内容中含有通配符.
    /// - [`Error::DeterminismViolation`] 和同一状态下已有的转移产生歧义.
    ///
    /// 出错时转移表保持不变.
    pub fn add_transition(
        &mut self,
        from: usize,
        input: Terminal<'a>,
        pattern: Vec<StackToken<'a>>,
        to: usize,
        replacement: Vec<StackToken<'a>>,
        rules: Vec<&'a Rule<'a>>,
    ) -> Result<(), Error> {
        self.check_state(from)?;
        self.check_state(to)?;
        if !input.is_epsilon() {
            self.check_terminal(input)?;
        }
        for token in pattern.iter().chain(&replacement) {
            self.check_stack_token(token)?;
        }
        // 通配符只能出现在栈顶模式中.
        if let Some(wildcard) = replacement.iter().find(|t| t.is_wildcard()) {
            Err(Error::invalid_symbol(wildcard))?
        }
        for rule in &rules {
            self.check_rule(rule)?;
        }
        self.table.insert(Transition::new(
            from,
            input,
            pattern,
            to,
            replacement,
            rules,
        ))
    }

    /// 按优先级选择当前可用的转移:
    /// 1. epsilon 输入, 空栈顶;
    /// 2. 下一个输入, 空栈顶;
    /// 3. epsilon 输入, 栈顶匹配;
    /// 4. 下一个输入, 栈顶匹配.
    ///
    /// 返回实际消耗的输入 (或者 [`EPSILON`]) 和转移.
    fn select(
        &self,
        state: usize,
        next: Option<Terminal<'a>>,
        stack: &Stack<'a>,
    ) -> Option<(Terminal<'a>, &Transition<'a>)> {
        [PatternMode::Empty, PatternMode::Prefix]
            .into_iter()
            .flat_map(|mode| [(EPSILON, mode)].into_iter().chain(next.map(|t| (t, mode))))
            .find_map(|(input, mode)| {
                self.table
                    .lookup(state, input, stack, mode)
                    .map(|t| (input, t))
            })
    }

    /// 运行自动机.
    ///
    /// 当输入读取完毕, 并且栈中最多只剩下一个符号时停止; 如果中途没有可用的转移,
    /// 那么返回到此为止的轨迹, 并标记为拒绝. 接受时会在末尾追加一个表示接受的格局.
    /// # Errors
    /// - [`Error::StepLimitExceeded`] 超过了 [`Automaton::with_step_limit`] 设置的上限.
    /// - [`Error::StackMismatch`] 转移和栈顶不一致, 正常情况下不会出现.
    pub fn run(&self, input: &[Terminal<'a>]) -> Result<Trace<'_, 'a>, Error> {
        let mut stack = Stack::new();
        let mut state = self.start;
        let mut cursor = 0;
        let mut configurations: Vec<Configuration<'_, 'a>> = Vec::new();
        let mut last = None;
        while cursor < input.len() || stack.depth() > 1 {
            if let Some(limit) = self.step_limit
                && configurations.len() >= limit
            {
                warn!("step limit {limit} reached at state {state}");
                Err(Error::StepLimitExceeded(limit))?
            }
            let next = input.get(cursor).copied();
            let Some((consumed, transition)) = self.select(state, next, &stack) else {
                info!(
                    "rejected at state {state}, cursor: {cursor}, stack: {:?}",
                    stack.snapshot()
                );
                return Ok(Trace::new(configurations, true));
            };
            debug!("state: {state}, consumed: {consumed}, transition: {transition}");
            configurations.push(Configuration::new(
                state,
                consumed,
                stack.snapshot(),
                transition,
                self.is_accept_state(transition.to()),
            ));
            if !consumed.is_epsilon() {
                cursor += 1;
            }
            stack.apply(transition)?;
            state = transition.to();
            last = Some(transition);
        }
        if let Some(transition) = last
            && configurations.last().is_some_and(Configuration::is_accepting)
        {
            info!("accepted at state {state}");
            configurations.push(Configuration::new(
                state,
                EPSILON,
                stack.snapshot(),
                transition,
                true,
            ));
        }
        Ok(Trace::new(configurations, false))
    }
}

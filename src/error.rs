use std::fmt::Display;

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("State {0} is not valid.")]
    InvalidState(usize),
    #[error("Symbol {0} is not valid.")]
    InvalidSymbol(String),
    #[error("Ambiguous transition for state {state}: {cause}, existing: {existing}.")]
    DeterminismViolation {
        state: usize,
        cause: Ambiguity,
        existing: String,
    },
    #[error("Stack top does not match the pattern of {0}.")]
    StackMismatch(String),
    #[error("Run exceeded the step limit of {0} configurations.")]
    StepLimitExceeded(usize),
    #[error("Trace is not accepting, no derivation available.")]
    NotAccepted,
    #[error("Variable {lhs} not found in sentential form while applying {rule}.")]
    DerivationMismatch { lhs: String, rule: String },
    #[error("Error parsing productions, line: {line}, cause: {cause:?}.")]
    ParseProductionError {
        line: usize,
        cause: ParseProductionError,
    },
    #[error("Error parsing automaton, line: {line}, cause: {cause:?}.")]
    ParseAutomatonError {
        line: usize,
        cause: ParseAutomatonError,
    },
}

/// 新增转移与已有转移产生歧义的原因.
#[derive(thiserror::Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Ambiguity {
    /// 相同栈顶上已经存在 epsilon 输入的转移.
    #[error("epsilon input transition already exists for this stack top")]
    EpsilonExists,
    /// 新转移是 epsilon 输入, 但相同栈顶上已经有消耗输入的转移.
    #[error("epsilon input transition would shadow an input transition")]
    ShadowsInput,
    /// 两个转移在重叠的栈顶上读取同一个输入符号.
    #[error("same input symbol for overlapping stack tops")]
    SameInput,
    /// 两个空栈顶转移读取同一个输入 (或者都是 epsilon).
    #[error("empty stack top transitions read the same input")]
    EmptyStackTop,
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ParseProductionError {
    #[error("No arrow in production line")]
    NoArrow,
    #[error("Production head is empty")]
    EmptyHead,
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ParseAutomatonError {
    #[error("Unknown directive: {0}")]
    UnknownDirective(String),
    #[error("Missing header directive: {0}")]
    MissingHeader(&'static str),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Missing `{0}` in transition line")]
    MissingSeparator(&'static str),
    #[error("Rule {0} is not declared")]
    UnknownRule(usize),
    #[error("No arrow in rule line")]
    NoArrow,
    #[error("Transition rejected: {0}")]
    Rejected(Box<Error>),
}

impl Error {
    pub(crate) fn parse_production_error(line: usize, cause: ParseProductionError) -> Self {
        Self::ParseProductionError { line, cause }
    }

    pub(crate) fn parse_automaton_error(line: usize, cause: ParseAutomatonError) -> Self {
        Self::ParseAutomatonError { line, cause }
    }

    pub(crate) fn invalid_symbol(symbol: impl Display) -> Self {
        Self::InvalidSymbol(symbol.to_string())
    }
}

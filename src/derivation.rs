//! 从接受的运行轨迹中重建最右推导.
//!
//! 运行时每一步归约都以产生式的形式记录在转移上, 把这些产生式倒序取出,
//! 从开始符号出发依次替换最右侧的对应变量, 就得到最右推导的各个句型.

use std::fmt::Display;

use tracing::debug;

use crate::{GrammarToken, Rule, error::Error, trace::Trace};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Derivation<'a> {
    forms: Vec<Vec<GrammarToken<'a>>>,
}

impl Display for Derivation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self
            .forms
            .iter()
            .map(|form| {
                form.iter()
                    .map(|t| format!("{t} "))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join(" => ");
        f.pad(&line)
    }
}

/// 把句型中最右侧的 `rule.lhs` 替换为 `rule.rhs`, 找不到时返回 [`None`].
fn rightmost_replace<'a>(
    form: &[GrammarToken<'a>],
    rule: &Rule<'a>,
) -> Option<Vec<GrammarToken<'a>>> {
    let lhs = GrammarToken::Variable(rule.lhs());
    let pos = form.iter().rposition(|t| *t == lhs)?;
    let mut replaced = Vec::with_capacity(form.len() + rule.rhs().len());
    replaced.extend_from_slice(&form[..pos]);
    replaced.extend_from_slice(rule.rhs());
    replaced.extend_from_slice(&form[pos + 1..]);
    Some(replaced)
}

impl<'a> Derivation<'a> {
    /// 从轨迹重建最右推导.
    ///
    /// 倒序遍历除最后一个 (表示接受的) 格局以外的格局, 每个格局中的产生式同样倒序处理.
    /// 第一个产生式给出 `[lhs]` 和 `rhs` 两个句型, 之后的每个产生式替换上一个句型中最右侧的左部变量.
    /// 没有任何归约标签时结果为空.
    /// # Errors
    /// - [`Error::NotAccepted`] 轨迹不是接受的.
    /// - [`Error::DerivationMismatch`] 上一个句型中没有产生式的左部, 说明转移上的归约标签不一致.
    pub fn from_trace(trace: &Trace<'_, 'a>) -> Result<Self, Error> {
        if !trace.is_accepted() {
            Err(Error::NotAccepted)?
        }
        let configurations = trace.configurations();
        let rules = configurations[..configurations.len() - 1]
            .iter()
            .rev()
            .flat_map(|c| c.transition().rules().iter().rev());
        let mut forms: Vec<Vec<GrammarToken<'a>>> = Vec::new();
        for rule in rules {
            let next = match forms.last() {
                None => {
                    forms.push(vec![rule.lhs().into()]);
                    rule.rhs().to_vec()
                }
                Some(last) => {
                    rightmost_replace(last, rule).ok_or_else(|| Error::DerivationMismatch {
                        lhs: rule.lhs().to_string(),
                        rule: rule.to_string(),
                    })?
                }
            };
            debug!("apply {rule}");
            forms.push(next);
        }
        Ok(Self { forms })
    }

    /// 依次排列的句型, 第一个为开始符号.
    #[must_use]
    pub fn forms(&self) -> &[Vec<GrammarToken<'a>>] {
        &self.forms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&[GrammarToken<'a>]> {
        self.forms.first().map(Vec::as_slice)
    }

    #[must_use]
    pub fn last(&self) -> Option<&[GrammarToken<'a>]> {
        self.forms.last().map(Vec::as_slice)
    }
}

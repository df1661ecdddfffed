//! Regexp syntax tree.
//!
//! The tree is the common output of the parser. It lowers two ways: to an
//! automaton through [`Ast::to_fa`], or to bytecode through the program
//! compiler. Only the bytecode path understands lazy repetition.

use crate::automaton::{
    make_concat_fa, make_literal_fa, make_or_fa, make_repeat_fa, make_set_fa, Fa,
};
use crate::error::BuildError;
use crate::range::{self, CodepointRange, MAX_CODEPOINT};
use crate::unicode_categories::UnicodeCategory;

/// Code points matched by `.` when lowered to an automaton: everything but
/// the surrogate block.
pub const DOT_RANGES: [CodepointRange; 2] = [
    CodepointRange::new(0, 0xD7FF),
    CodepointRange::new(0xE000, MAX_CODEPOINT),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Literal(u32),
    /// `.`
    Dot,
    /// Bracket class or class shorthand. `ranges` is normalized.
    Set {
        ranges: Vec<CodepointRange>,
        negated: bool,
    },
    /// `\p{..}` / `\P{..}`
    Category {
        category: UnicodeCategory,
        negated: bool,
    },
    /// Sequence. An empty sequence matches the empty string.
    Concat(Vec<Ast>),
    /// Alternatives in priority order; any may be empty.
    Alt(Vec<Ast>),
    /// `max == None` is unbounded.
    Repeat {
        expr: Box<Ast>,
        min: usize,
        max: Option<usize>,
        lazy: bool,
    },
}

impl Ast {
    /// The pattern that matches only the empty string.
    pub fn empty() -> Self {
        Ast::Concat(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Ast::Concat(items) if items.is_empty())
    }

    /// A set node, normalizing `ranges`.
    pub fn set(ranges: Vec<CodepointRange>, negated: bool) -> Self {
        Ast::Set {
            ranges: range::normalized(ranges),
            negated,
        }
    }

    /// Literal sequence for `text`.
    pub fn literal(text: &str) -> Self {
        let mut items: Vec<Ast> = text.chars().map(|c| Ast::Literal(c as u32)).collect();
        if items.len() == 1 {
            items.remove(0)
        } else {
            Ast::Concat(items)
        }
    }

    /// True if any repetition in the tree is lazy.
    pub fn has_lazy(&self) -> bool {
        match self {
            Ast::Repeat { lazy: true, .. } => true,
            Ast::Repeat { expr, .. } => expr.has_lazy(),
            Ast::Concat(items) | Ast::Alt(items) => items.iter().any(Ast::has_lazy),
            _ => false,
        }
    }

    /// Ranges consumed by a single-code-point node, with negation applied.
    pub fn effective_ranges(&self) -> Option<Vec<CodepointRange>> {
        match self {
            Ast::Literal(cp) => Some(vec![CodepointRange::single(*cp)]),
            Ast::Dot => Some(DOT_RANGES.to_vec()),
            Ast::Set { ranges, negated } => Some(negate_if(ranges, *negated)),
            Ast::Category { category, negated } => Some(negate_if(category.ranges(), *negated)),
            _ => None,
        }
    }

    /// Lower to an automaton whose accepting states carry `accept`.
    pub fn to_fa(&self, accept: Option<i32>) -> Result<Fa, BuildError> {
        match self {
            Ast::Literal(cp) => Ok(make_literal_fa([*cp], accept)),
            Ast::Dot => Ok(make_set_fa(&DOT_RANGES, accept)),
            Ast::Set { ranges, negated } => {
                Ok(make_set_fa(&negate_if(ranges, *negated), accept))
            }
            Ast::Category { category, negated } => {
                Ok(make_set_fa(&negate_if(category.ranges(), *negated), accept))
            }
            Ast::Concat(items) => {
                if items.iter().all(|i| matches!(i, Ast::Literal(_))) {
                    let cps = items.iter().filter_map(|i| match i {
                        Ast::Literal(cp) => Some(*cp),
                        _ => None,
                    });
                    return Ok(make_literal_fa(cps, accept));
                }
                let parts = items
                    .iter()
                    .map(|i| i.to_fa(None))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(make_concat_fa(parts.iter(), accept))
            }
            Ast::Alt(branches) => {
                let parts = branches
                    .iter()
                    .map(|b| b.to_fa(None))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(make_or_fa(parts.iter(), accept))
            }
            Ast::Repeat { lazy: true, .. } => Err(BuildError::LazyNotSupported),
            Ast::Repeat { expr, min, max, .. } => {
                let inner = expr.to_fa(None)?;
                make_repeat_fa(&inner, *min, *max, accept)
            }
        }
    }
}

fn negate_if(ranges: &[CodepointRange], negated: bool) -> Vec<CodepointRange> {
    if negated {
        range::complement(ranges)
    } else {
        ranges.to_vec()
    }
}

use std::fmt;

use lasso::Key;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::symbol::{EffVar, SymbolStore};

/// A caller-side effect type.
///
/// `Pure` is the top of the effect lattice (no effect) and `Univ` the
/// bottom (all effects). The algebra is free: no simplification is
/// performed on construction; canonical form only exists on the
/// interned terms inside a solve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    Pure,
    Univ,
    Var(EffVar),
    Complement(Box<Effect>),
    Union(Box<Effect>, Box<Effect>),
    Intersection(Box<Effect>, Box<Effect>),
}

impl Effect {
    /// Complement of an effect.
    pub fn complement(effect: Effect) -> Effect {
        Effect::Complement(Box::new(effect))
    }

    /// Union of two effects.
    pub fn union(lhs: Effect, rhs: Effect) -> Effect {
        Effect::Union(Box::new(lhs), Box::new(rhs))
    }

    /// Intersection of two effects.
    pub fn intersection(lhs: Effect, rhs: Effect) -> Effect {
        Effect::Intersection(Box::new(lhs), Box::new(rhs))
    }

    /// Variables occurring in this effect, in order of first
    /// appearance, without duplicates.
    pub fn vars(&self) -> Vec<EffVar> {
        let mut out = Vec::new();
        let mut seen: FxHashSet<EffVar> = FxHashSet::default();
        self.collect_vars(&mut out, &mut seen);
        out
    }

    fn collect_vars(&self, out: &mut Vec<EffVar>, seen: &mut FxHashSet<EffVar>) {
        match self {
            Effect::Pure | Effect::Univ => {}
            Effect::Var(var) => {
                if seen.insert(*var) {
                    out.push(*var);
                }
            }
            Effect::Complement(inner) => inner.collect_vars(out, seen),
            Effect::Union(lhs, rhs) | Effect::Intersection(lhs, rhs) => {
                lhs.collect_vars(out, seen);
                rhs.collect_vars(out, seen);
            }
        }
    }

    /// Render with variable names resolved through a symbol store.
    /// Unresolvable variables fall back to the positional form used by
    /// `Display`.
    pub fn display_with(&self, symbols: &SymbolStore) -> String {
        match self {
            Effect::Pure => "Pure".to_string(),
            Effect::Univ => "Univ".to_string(),
            Effect::Var(var) => match symbols.name(*var) {
                Some(name) => name.to_string(),
                None => format!("e{}", var.into_usize()),
            },
            Effect::Complement(inner) => format!("!{}", inner.display_with(symbols)),
            Effect::Union(lhs, rhs) => format!(
                "({} + {})",
                lhs.display_with(symbols),
                rhs.display_with(symbols)
            ),
            Effect::Intersection(lhs, rhs) => format!(
                "({} & {})",
                lhs.display_with(symbols),
                rhs.display_with(symbols)
            ),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Pure => write!(f, "Pure"),
            Effect::Univ => write!(f, "Univ"),
            Effect::Var(var) => write!(f, "e{}", var.into_usize()),
            Effect::Complement(inner) => write!(f, "!{inner}"),
            Effect::Union(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            Effect::Intersection(lhs, rhs) => write!(f, "({lhs} & {rhs})"),
        }
    }
}

/// Whether the unifier may bind a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rigidity {
    Flexible,
    Rigid,
}

/// Caller-supplied rigidity assignment.
/// Variables not present default to Flexible.
#[derive(Debug, Clone, Default)]
pub struct RigidityEnv {
    rigid: FxHashSet<EffVar>,
}

impl RigidityEnv {
    /// Create an environment with every variable flexible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a variable as rigid.
    pub fn mark_rigid(&mut self, var: EffVar) {
        self.rigid.insert(var);
    }

    /// Look up a variable's rigidity.
    pub fn get(&self, var: EffVar) -> Rigidity {
        if self.rigid.contains(&var) {
            Rigidity::Rigid
        } else {
            Rigidity::Flexible
        }
    }
}

/// A substitution over caller-side effect variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSubst {
    map: FxHashMap<EffVar, Effect>,
}

impl EffectSubst {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Look up a variable's binding.
    pub fn get(&self, var: EffVar) -> Option<&Effect> {
        self.map.get(&var)
    }

    /// Check whether a variable is bound.
    pub fn contains(&self, var: EffVar) -> bool {
        self.map.contains_key(&var)
    }

    /// Bind a variable. Rebinding overwrites.
    pub fn bind(&mut self, var: EffVar, effect: Effect) {
        self.map.insert(var, effect);
    }

    /// Iterator over the bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&EffVar, &Effect)> {
        self.map.iter()
    }

    /// Apply the substitution to an effect, replacing each bound
    /// variable by its value in one step.
    pub fn apply(&self, effect: &Effect) -> Effect {
        match effect {
            Effect::Pure | Effect::Univ => effect.clone(),
            Effect::Var(var) => match self.map.get(var) {
                Some(bound) => bound.clone(),
                None => effect.clone(),
            },
            Effect::Complement(inner) => Effect::complement(self.apply(inner)),
            Effect::Union(lhs, rhs) => Effect::union(self.apply(lhs), self.apply(rhs)),
            Effect::Intersection(lhs, rhs) => {
                Effect::intersection(self.apply(lhs), self.apply(rhs))
            }
        }
    }

    /// Left-biased composition: `self @@ other` applies `other` first.
    pub fn compose(&self, other: &EffectSubst) -> EffectSubst {
        let mut out = EffectSubst::new();
        for (var, effect) in other.iter() {
            out.bind(*var, self.apply(effect));
        }
        for (var, effect) in self.iter() {
            if !out.contains(*var) {
                out.bind(*var, effect.clone());
            }
        }
        out
    }
}

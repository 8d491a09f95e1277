use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use tracing::{debug, trace};

use crate::{Grammar, Nonterminal, Symbol, Terminal};

pub type TerminalSet = BTreeSet<Terminal>;
pub type SetMap = BTreeMap<Nonterminal, TerminalSet>;

/// Fixed-point phase reported to observers of `FirstFollow::compute_observed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    First,
    Follow,
}

/// Number of full passes each phase needed to converge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Passes {
    pub first: usize,
    pub follow: usize,
}

/// Solved FIRST and FOLLOW sets of a grammar
///
/// Both maps are computed once in `compute` and never change afterwards. The internal FIRST
/// sets contain `Terminal::Epsilon` for nullable nonterminals; `first` and `first_sets` return
/// the display form without it. FOLLOW sets never contain epsilon, but may contain
/// `Terminal::Eof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstFollow {
    order: Vec<Nonterminal>,
    first_sets: SetMap,
    follow_sets: SetMap,
    passes: Passes,
}

impl FirstFollow {
    pub fn compute(grammar: &Grammar) -> Self {
        Self::compute_observed(grammar, |_, _| {})
    }

    /// Like `compute`, but hands a snapshot of the phase's sets to `observer` after every pass
    pub fn compute_observed<F>(grammar: &Grammar, observer: F) -> Self
    where
        F: FnMut(Phase, &SetMap),
    {
        Solver::new(grammar).solve(observer)
    }

    /// Display form of FIRST(`nonterminal`), without epsilon
    pub fn first(&self, nonterminal: &Nonterminal) -> Option<TerminalSet> {
        self.first_sets.get(nonterminal).map(without_epsilon)
    }

    pub fn follow(&self, nonterminal: &Nonterminal) -> Option<&TerminalSet> {
        self.follow_sets.get(nonterminal)
    }

    /// Display form of all FIRST sets, without epsilon
    pub fn first_sets(&self) -> SetMap {
        self.first_sets
            .iter()
            .map(|(n, set)| (n.clone(), without_epsilon(set)))
            .collect()
    }

    pub fn internal_first_sets(&self) -> &SetMap {
        &self.first_sets
    }

    pub fn follow_sets(&self) -> &SetMap {
        &self.follow_sets
    }

    pub fn is_nullable(&self, nonterminal: &Nonterminal) -> bool {
        self.first_sets
            .get(nonterminal)
            .map_or(false, |set| set.contains(&Terminal::Epsilon))
    }

    /// FIRST of an arbitrary symbol sequence, including epsilon if the whole sequence is
    /// nullable
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> TerminalSet {
        sequence_first(&self.first_sets, symbols)
    }

    pub fn passes(&self) -> Passes {
        self.passes
    }

    /// Nonterminals in grammar declaration order
    pub fn nonterminals(&self) -> &[Nonterminal] {
        &self.order
    }
}

impl fmt::Display for FirstFollow {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "FIRST Sets:")?;
        for nonterminal in self.order.iter() {
            if let Some(set) = self.first(nonterminal) {
                writeln!(f, "FIRST({}) = {}", nonterminal, DisplaySet(&set))?;
            }
        }
        writeln!(f, "FOLLOW Sets:")?;
        for nonterminal in self.order.iter() {
            if let Some(set) = self.follow(nonterminal) {
                writeln!(f, "FOLLOW({}) = {}", nonterminal, DisplaySet(set))?;
            }
        }
        Ok(())
    }
}

/// Renders a terminal set as `{ a, b }`, members sorted by name, or `{ }` when empty
pub struct DisplaySet<'s>(pub &'s TerminalSet);

impl<'s> fmt::Display for DisplaySet<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if self.0.is_empty() {
            return write!(f, "{{ }}");
        }
        let mut names: Vec<&str> = self.0.iter().map(Terminal::name).collect();
        names.sort_unstable();
        write!(f, "{{ {} }}", names.join(", "))
    }
}

fn without_epsilon(set: &TerminalSet) -> TerminalSet {
    set.iter()
        .filter(|t| **t != Terminal::Epsilon)
        .cloned()
        .collect()
}

/// FIRST of `symbols` against the given (possibly partial) FIRST sets
fn sequence_first(first_sets: &SetMap, symbols: &[Symbol]) -> TerminalSet {
    let mut result = TerminalSet::new();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(t) => {
                result.insert(t.clone());
                return result;
            }
            Symbol::Nonterminal(n) => {
                let mut nullable = false;
                if let Some(first) = first_sets.get(n) {
                    for t in first.iter() {
                        if *t == Terminal::Epsilon {
                            nullable = true;
                        } else {
                            result.insert(t.clone());
                        }
                    }
                }
                if !nullable {
                    return result;
                }
            }
        }
    }
    result.insert(Terminal::Epsilon);
    result
}

/// Memoized sequence FIRST sets
///
/// Entries are only valid for the FIRST snapshot they were computed from, so the solver
/// invalidates the whole cache whenever any FIRST set grows.
#[derive(Default)]
struct SequenceCache {
    entries: HashMap<Vec<Symbol>, TerminalSet>,
    generation: usize,
}

impl SequenceCache {
    fn get(&self, symbols: &[Symbol]) -> Option<&TerminalSet> {
        self.entries.get(symbols)
    }

    fn insert(&mut self, symbols: &[Symbol], set: TerminalSet) {
        self.entries.insert(symbols.to_vec(), set);
    }

    fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
        }
        self.generation += 1;
    }
}

struct Solver<'g> {
    grammar: &'g Grammar,
    first_sets: SetMap,
    follow_sets: SetMap,
    cache: SequenceCache,
    passes: Passes,
}

impl<'g> Solver<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let empty: SetMap = grammar
            .nonterminals()
            .iter()
            .map(|n| (n.clone(), TerminalSet::new()))
            .collect();
        Self {
            grammar,
            first_sets: empty.clone(),
            follow_sets: empty,
            cache: SequenceCache::default(),
            passes: Passes::default(),
        }
    }

    fn solve<F>(mut self, mut observer: F) -> FirstFollow
    where
        F: FnMut(Phase, &SetMap),
    {
        self.compute_first_sets(&mut observer);
        self.compute_follow_sets(&mut observer);

        debug!(
            first_passes = self.passes.first,
            follow_passes = self.passes.follow,
            cache_generations = self.cache.generation,
            "FIRST/FOLLOW sets converged"
        );

        FirstFollow {
            order: self.grammar.nonterminals().iter().cloned().collect(),
            first_sets: self.first_sets,
            follow_sets: self.follow_sets,
            passes: self.passes,
        }
    }

    fn first_of_sequence(&mut self, symbols: &[Symbol]) -> TerminalSet {
        if let Some(cached) = self.cache.get(symbols) {
            return cached.clone();
        }
        let set = sequence_first(&self.first_sets, symbols);
        self.cache.insert(symbols, set.clone());
        set
    }

    /// Repeats full passes over all productions until no FIRST set grows
    fn compute_first_sets<F>(&mut self, observer: &mut F)
    where
        F: FnMut(Phase, &SetMap),
    {
        let grammar = self.grammar;
        loop {
            self.passes.first += 1;
            let mut changed = false;
            for production in grammar.productions() {
                let rhs_first = self.first_of_sequence(production.rhs());
                let first = self
                    .first_sets
                    .entry(production.lhs().clone())
                    .or_default();
                let before = first.len();
                first.extend(rhs_first);
                if first.len() > before {
                    trace!(production = %production, size = first.len(), "FIRST set grew");
                    changed = true;
                    self.cache.invalidate();
                }
            }
            observer(Phase::First, &self.first_sets);
            if !changed {
                break;
            }
        }
    }

    /// Seeds FOLLOW(start) with `$` and propagates until no FOLLOW set grows
    ///
    /// FIRST sets are stable at this point, so cached sequence FIRST sets stay valid for the
    /// whole phase.
    fn compute_follow_sets<F>(&mut self, observer: &mut F)
    where
        F: FnMut(Phase, &SetMap),
    {
        let grammar = self.grammar;
        self.follow_sets
            .entry(grammar.start().clone())
            .or_default()
            .insert(Terminal::Eof);

        loop {
            self.passes.follow += 1;
            let mut changed = false;
            for production in grammar.productions() {
                let rhs = production.rhs();
                for (pos, symbol) in rhs.iter().enumerate() {
                    let target = match symbol {
                        Symbol::Nonterminal(n) => n,
                        Symbol::Terminal(_) => continue,
                    };
                    let beta = &rhs[pos + 1..];
                    let beta_first = self.first_of_sequence(beta);

                    let mut additions: TerminalSet = without_epsilon(&beta_first);
                    if beta_first.contains(&Terminal::Epsilon) {
                        if let Some(lhs_follow) = self.follow_sets.get(production.lhs()) {
                            additions.extend(lhs_follow.iter().cloned());
                        }
                    }

                    let follow = self.follow_sets.entry(target.clone()).or_default();
                    let before = follow.len();
                    follow.extend(additions);
                    if follow.len() > before {
                        trace!(nonterminal = %target, size = follow.len(), "FOLLOW set grew");
                        changed = true;
                    }
                }
            }
            observer(Phase::Follow, &self.follow_sets);
            if !changed {
                break;
            }
        }
    }
}

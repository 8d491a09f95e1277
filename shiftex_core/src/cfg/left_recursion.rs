use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::{Grammar, GrammarError, Nonterminal, Production, Symbol};

/// Computes which nonterminals derive the empty string
pub(crate) fn gen_nullable(grammar: &Grammar) -> HashSet<Nonterminal> {
    let mut nullable = HashSet::new();

    loop {
        let mut changed = false;
        for production in grammar.productions() {
            if nullable.contains(production.lhs()) {
                continue;
            }
            if production
                .rhs()
                .iter()
                .all(|symbol| is_nullable(&nullable, symbol))
            {
                nullable.insert(production.lhs().clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    nullable
}

fn is_nullable(nullable: &HashSet<Nonterminal>, symbol: &Symbol) -> bool {
    match symbol {
        Symbol::Terminal(_) => false,
        Symbol::Nonterminal(n) => nullable.contains(n),
    }
}

/// Left corners of every nonterminal
///
/// `B` is a left corner of `A` if some production `A → α B β` has a nullable `α`.
fn left_corners(grammar: &Grammar) -> HashMap<&Nonterminal, HashSet<&Nonterminal>> {
    let nullable = gen_nullable(grammar);
    let mut corners: HashMap<&Nonterminal, HashSet<&Nonterminal>> = HashMap::new();
    for production in grammar.productions() {
        let entry = corners.entry(production.lhs()).or_default();
        for symbol in production.rhs() {
            match symbol {
                Symbol::Nonterminal(n) => {
                    entry.insert(n);
                    if !nullable.contains(n) {
                        break;
                    }
                }
                Symbol::Terminal(_) => break,
            }
        }
    }
    corners
}

/// Nonterminals `A` with a derivation `A ⇒+ A γ`, in declaration order
pub fn left_recursive_nonterminals(grammar: &Grammar) -> impl Iterator<Item = &Nonterminal> {
    let corners = left_corners(grammar);
    grammar
        .nonterminals()
        .iter()
        .filter(move |nonterminal| reaches(&corners, nonterminal, nonterminal))
}

fn reaches(
    corners: &HashMap<&Nonterminal, HashSet<&Nonterminal>>,
    from: &Nonterminal,
    target: &Nonterminal,
) -> bool {
    let mut visited: HashSet<&Nonterminal> = HashSet::new();
    let mut pending: Vec<&Nonterminal> = match corners.get(from) {
        Some(next) => next.iter().cloned().collect(),
        None => return false,
    };
    while let Some(current) = pending.pop() {
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(next) = corners.get(current) {
            pending.extend(next.iter().cloned());
        }
    }
    false
}

/// Rewrites a grammar so that no nonterminal is left recursive
///
/// Nonterminals are processed in declaration order. Productions of a left-recursive
/// nonterminal `Ai` that start with an earlier `Aj` get `Aj`'s alternatives substituted in,
/// then immediate left recursion is split off:
///
/// ```text
/// A → A α | β      becomes      A  → β A'
///                               A' → α A' | ε
/// ```
///
/// The primed nonterminal is declared right after the one it was split from. Cycles `A → A`
/// are dropped. Grammars with epsilon productions on the recursive path are not guaranteed to
/// come out free of hidden left recursion.
pub fn eliminate_left_recursion(grammar: &Grammar) -> Result<Grammar, GrammarError> {
    let order: Vec<Nonterminal> = grammar.nonterminals().iter().cloned().collect();
    let recursive: HashSet<Nonterminal> =
        left_recursive_nonterminals(grammar).cloned().collect();

    let mut taken: HashSet<String> = grammar
        .nonterminals()
        .iter()
        .map(|n| n.name().to_owned())
        .chain(grammar.terminals().iter().map(|t| t.name().to_owned()))
        .collect();

    let mut alternatives: IndexMap<Nonterminal, Vec<Vec<Symbol>>> = order
        .iter()
        .map(|n| {
            let rhs = grammar.productions_for(n).map(|p| p.rhs().to_vec()).collect();
            (n.clone(), rhs)
        })
        .collect();
    let mut primed: HashMap<Nonterminal, (Nonterminal, Vec<Vec<Symbol>>)> = HashMap::new();

    for (i, a_i) in order.iter().enumerate() {
        if !recursive.contains(a_i) {
            continue;
        }

        for a_j in order[..i].iter() {
            let current = alternatives.get(a_i).cloned().unwrap_or_default();
            let expansions = alternatives.get(a_j).cloned().unwrap_or_default();
            let mut replaced = Vec::with_capacity(current.len());
            for rhs in current {
                match rhs.first() {
                    Some(Symbol::Nonterminal(n)) if n == a_j => {
                        for delta in expansions.iter() {
                            let mut expanded = delta.clone();
                            expanded.extend_from_slice(&rhs[1..]);
                            replaced.push(expanded);
                        }
                    }
                    _ => replaced.push(rhs),
                }
            }
            alternatives.insert(a_i.clone(), replaced);
        }

        let current = alternatives.get(a_i).cloned().unwrap_or_default();
        if let Some((rewritten, prime, prime_alternatives)) =
            split_immediate(a_i, current, &mut taken)
        {
            debug!(nonterminal = %a_i, prime = %prime, "eliminated immediate left recursion");
            alternatives.insert(a_i.clone(), rewritten);
            primed.insert(a_i.clone(), (prime, prime_alternatives));
        }
    }

    let mut nonterminals = Vec::new();
    let mut productions = Vec::new();
    for (nonterminal, rhs_list) in alternatives {
        nonterminals.push(nonterminal.clone());
        for rhs in rhs_list {
            productions.push(Production::new(nonterminal.clone(), rhs));
        }
        if let Some((prime, prime_alternatives)) = primed.remove(&nonterminal) {
            nonterminals.push(prime.clone());
            for rhs in prime_alternatives {
                productions.push(Production::new(prime.clone(), rhs));
            }
        }
    }

    Grammar::new(
        nonterminals,
        grammar.terminals().iter().cloned(),
        productions,
        grammar.start().clone(),
    )
}

/// Splits `A → A α | β` into `A → β A'` and `A' → α A' | ε`
fn split_immediate(
    nonterminal: &Nonterminal,
    alternatives: Vec<Vec<Symbol>>,
    taken: &mut HashSet<String>,
) -> Option<(Vec<Vec<Symbol>>, Nonterminal, Vec<Vec<Symbol>>)> {
    let (recursive, others): (Vec<_>, Vec<_>) = alternatives.into_iter().partition(|rhs| {
        match rhs.first() {
            Some(Symbol::Nonterminal(n)) => n == nonterminal,
            _ => false,
        }
    });
    if recursive.is_empty() {
        return None;
    }

    let prime = fresh_prime(nonterminal, taken);
    let prime_symbol = Symbol::Nonterminal(prime.clone());

    let rewritten = others
        .into_iter()
        .map(|mut beta| {
            beta.push(prime_symbol.clone());
            beta
        })
        .collect();

    let mut prime_alternatives: Vec<Vec<Symbol>> = recursive
        .into_iter()
        .filter(|rhs| rhs.len() > 1)
        .map(|rhs| {
            let mut alpha = rhs[1..].to_vec();
            alpha.push(prime_symbol.clone());
            alpha
        })
        .collect();
    prime_alternatives.push(Vec::new());

    Some((rewritten, prime, prime_alternatives))
}

fn fresh_prime(nonterminal: &Nonterminal, taken: &mut HashSet<String>) -> Nonterminal {
    let mut name = format!("{}'", nonterminal.name());
    while taken.contains(&name) {
        name.push('\'');
    }
    taken.insert(name.clone());
    Nonterminal::new(name)
}

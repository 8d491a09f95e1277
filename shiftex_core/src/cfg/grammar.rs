use std::fmt;

use indexmap::IndexSet;

use crate::{GrammarError, Nonterminal, Production, Symbol, Terminal};

/// A validated context-free grammar
///
/// Nonterminals and terminals keep their declaration order, which is also the order used
/// when rendering the grammar or its FIRST/FOLLOW sets. The end-of-input terminal is always
/// part of the terminal set, whether or not it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    start: Nonterminal,
    nonterminals: IndexSet<Nonterminal>,
    terminals: IndexSet<Terminal>,
    productions: Vec<Production>,
}

impl Grammar {
    pub fn new<N, T>(
        nonterminals: N,
        terminals: T,
        productions: Vec<Production>,
        start: Nonterminal,
    ) -> Result<Self, GrammarError>
    where
        N: IntoIterator<Item = Nonterminal>,
        T: IntoIterator<Item = Terminal>,
    {
        let nonterminals: IndexSet<Nonterminal> = nonterminals.into_iter().collect();
        let declared_terminals = terminals;
        let mut terminals: IndexSet<Terminal> = IndexSet::new();
        for terminal in declared_terminals {
            if terminal == Terminal::Epsilon {
                return Err(GrammarError::ReservedTerminal(terminal));
            }
            terminals.insert(terminal);
        }
        terminals.insert(Terminal::Eof);

        for nonterminal in nonterminals.iter() {
            if terminals.contains(&Terminal::new(nonterminal.name())) {
                return Err(GrammarError::AmbiguousName(nonterminal.name().to_owned()));
            }
        }

        if !nonterminals.contains(&start) {
            return Err(GrammarError::UnknownStartSymbol(start));
        }

        for production in productions.iter() {
            if !nonterminals.contains(production.lhs()) {
                return Err(GrammarError::UndeclaredLhs {
                    production: production.clone(),
                });
            }
            for symbol in production.rhs() {
                let declared = match symbol {
                    Symbol::Terminal(t) if t.is_sentinel() => {
                        return Err(GrammarError::ReservedInProduction {
                            production: production.clone(),
                            terminal: t.clone(),
                        });
                    }
                    Symbol::Terminal(t) => terminals.contains(t),
                    Symbol::Nonterminal(n) => nonterminals.contains(n),
                };
                if !declared {
                    return Err(GrammarError::UndeclaredSymbol {
                        production: production.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }

        Ok(Self {
            start,
            nonterminals,
            terminals,
            productions,
        })
    }

    pub fn start(&self) -> &Nonterminal {
        &self.start
    }

    pub fn nonterminals(&self) -> &IndexSet<Nonterminal> {
        &self.nonterminals
    }

    /// All terminals including the end-of-input marker
    pub fn terminals(&self) -> &IndexSet<Terminal> {
        &self.terminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn productions_for<'g>(
        &'g self,
        nonterminal: &'g Nonterminal,
    ) -> impl Iterator<Item = &'g Production> + 'g {
        self.productions
            .iter()
            .filter(move |production| production.lhs() == nonterminal)
    }

    pub fn is_left_recursive(&self) -> bool {
        crate::cfg::left_recursion::left_recursive_nonterminals(self)
            .next()
            .is_some()
    }
}

impl fmt::Display for Grammar {
    /// Renders one line per nonterminal with its alternatives, `E → E << T | T`
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for nonterminal in self.nonterminals.iter() {
            let alternatives: Vec<String> = self
                .productions_for(nonterminal)
                .map(|production| {
                    if production.is_epsilon() {
                        crate::EPSILON.to_owned()
                    } else {
                        production
                            .rhs()
                            .iter()
                            .map(|symbol| symbol.to_string())
                            .collect::<Vec<_>>()
                            .join(" ")
                    }
                })
                .collect();
            if alternatives.is_empty() {
                continue;
            }
            writeln!(f, "{} → {}", nonterminal, alternatives.join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::production;
    use matches::assert_matches;

    fn names() -> (Nonterminal, Nonterminal, Terminal, Terminal) {
        (
            Nonterminal::new("S"),
            Nonterminal::new("A"),
            Terminal::new("a"),
            Terminal::new("b"),
        )
    }

    #[test]
    fn test_eof_implicitly_included() {
        let (s, _, a, _) = names();
        let grammar = Grammar::new(vec![s.clone()], vec![a.clone()], vec![production![s => a]], s)
            .unwrap();
        assert!(grammar.terminals().contains(&Terminal::Eof));
        assert_eq!(grammar.terminals().len(), 2);
    }

    #[test]
    fn test_start_must_be_declared() {
        let (s, a_nt, a, _) = names();
        let result = Grammar::new(vec![s.clone()], vec![a.clone()], vec![production![s => a]], a_nt);
        assert_matches!(result, Err(GrammarError::UnknownStartSymbol(_)));
    }

    #[test]
    fn test_undeclared_rhs_symbol() {
        let (s, a_nt, a, _) = names();
        let result = Grammar::new(
            vec![s.clone()],
            vec![a.clone()],
            vec![production![s => a, a_nt]],
            s,
        );
        assert_matches!(result, Err(GrammarError::UndeclaredSymbol { .. }));
    }

    #[test]
    fn test_undeclared_lhs() {
        let (s, a_nt, a, _) = names();
        let result = Grammar::new(vec![s.clone()], vec![a.clone()], vec![production![a_nt => a]], s);
        assert_matches!(result, Err(GrammarError::UndeclaredLhs { .. }));
    }

    #[test]
    fn test_epsilon_is_reserved() {
        let (s, _, a, _) = names();
        let result = Grammar::new(
            vec![s.clone()],
            vec![a.clone(), Terminal::Epsilon],
            vec![production![s => a]],
            s.clone(),
        );
        assert_matches!(result, Err(GrammarError::ReservedTerminal(Terminal::Epsilon)));

        let result = Grammar::new(
            vec![s.clone()],
            vec![a],
            vec![production![s => Terminal::Eof]],
            s,
        );
        assert_matches!(result, Err(GrammarError::ReservedInProduction { .. }));
    }

    #[test]
    fn test_name_clash() {
        let (s, _, _, _) = names();
        let result = Grammar::new(
            vec![s.clone()],
            vec![Terminal::new("S")],
            vec![production![s => ]],
            s,
        );
        assert_matches!(result, Err(GrammarError::AmbiguousName(_)));
    }

    #[test]
    fn test_display_groups_alternatives() {
        let (s, a_nt, a, b) = names();
        let grammar = Grammar::new(
            vec![s.clone(), a_nt.clone()],
            vec![a.clone(), b.clone()],
            vec![
                production![s => a_nt, b],
                production![a_nt => a, a_nt],
                production![a_nt => ],
            ],
            s,
        )
        .unwrap();
        assert_eq!(grammar.to_string(), "S → A b\nA → a A | ε\n");
    }
}

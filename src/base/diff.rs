//! Reaction list diffing.

use std::collections::HashMap;

use super::types::Reaction;

/// Returns the reactions in `current` that are not accounted for by `previous`.
///
/// This is a multiset difference: every occurrence in `previous` cancels out at most one
/// matching occurrence in `current`, so a surplus duplicate is reported once per extra copy.
/// Removed reactions are never reported. The result keeps the order of `current`.
pub fn added_reactions(previous: &[Reaction], current: &[Reaction]) -> Vec<Reaction> {
    // Most edits don't touch reactions at all.
    if previous == current {
        return Vec::new();
    }

    let mut unconsumed: HashMap<&Reaction, usize> = HashMap::new();
    for reaction in previous {
        *unconsumed.entry(reaction).or_default() += 1;
    }

    current
        .iter()
        .filter(|reaction| match unconsumed.get_mut(reaction) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

// Tests.

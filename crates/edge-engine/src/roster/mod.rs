// Roster slot classification and lineup assignment.

pub mod position;

use crate::snapshot::Player;
use position::{Position, Slot};

/// Whether a slot label is a starting slot.
///
/// Only BN, IR and TAXI are reserved; every other label, including labels
/// this crate has never seen, counts as a starter.
pub fn is_starter_slot(label: &str) -> bool {
    !Slot::from_label(label).is_reserved()
}

/// Number of starting slots in a slot schema.
pub fn starter_slot_count(labels: &[String]) -> usize {
    labels.iter().filter(|l| is_starter_slot(l)).count()
}

/// Whether a league's slot schema is superflex.
///
/// Either a literal SUPER_FLEX slot or two or more QB slots is sufficient.
pub fn is_superflex_from_positions<S: AsRef<str>>(labels: &[S]) -> bool {
    let mut qb_slots = 0;
    for label in labels {
        match Slot::from_label(label.as_ref()) {
            Slot::SuperFlex => return true,
            Slot::Dedicated(Position::Quarterback) => qb_slots += 1,
            _ => {}
        }
    }
    qb_slots >= 2
}

// ---------------------------------------------------------------------------
// Lineup assignment
// ---------------------------------------------------------------------------

/// A starting slot and the player (index into the roster's player list) filling it.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotFill {
    pub label: String,
    pub player: Option<usize>,
}

/// The best available starting lineup for one roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineup {
    /// Starting slots in schema order.
    pub slots: Vec<SlotFill>,
}

impl Lineup {
    /// Assign the highest-valued eligible players to starting slots.
    ///
    /// Players are taken in value order and each one is kept if some
    /// rearrangement of the players already placed makes room for them. That
    /// maximizes lineup value even when flex slots overlap partially
    /// (WRRB_FLEX and REC_FLEX both take WR).
    ///
    /// A new player goes to a free slot when one fits, trying slots in this
    /// order:
    /// 1. Dedicated position slots (QB, RB, ...)
    /// 2. Restricted flex (WRRB_FLEX, REC_FLEX)
    /// 3. FLEX / IDP_FLEX
    /// 4. SUPER_FLEX
    /// 5. Unrecognized labels (accept anyone)
    ///
    /// Only players with a market value are placed; a slot nobody valued can
    /// fill stays empty and lowers coverage.
    pub fn assign(players: &[Player], labels: &[String]) -> Self {
        let mut slots: Vec<SlotFill> = labels
            .iter()
            .filter(|l| is_starter_slot(l))
            .map(|l| SlotFill {
                label: l.clone(),
                player: None,
            })
            .collect();

        // Candidates sorted by value descending; stable so equal values keep roster order.
        let mut candidates: Vec<usize> = (0..players.len())
            .filter(|&i| players[i].has_value())
            .collect();
        candidates.sort_by(|&a, &b| {
            players[b]
                .value
                .partial_cmp(&players[a].value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let parsed: Vec<Slot> = slots.iter().map(|s| Slot::from_label(&s.label)).collect();
        let mut order: Vec<usize> = (0..slots.len()).collect();
        order.sort_by_key(|&i| parsed[i].fill_order());

        let mut fitter = SlotFitter {
            players,
            parsed: &parsed,
            order: &order,
            owner: vec![None; slots.len()],
        };
        for p in candidates {
            let mut visited = vec![false; slots.len()];
            fitter.place(p, &mut visited);
        }

        for (slot, owner) in slots.iter_mut().zip(fitter.owner) {
            slot.player = owner;
        }
        Lineup { slots }
    }

    /// Number of starting slots.
    pub fn starter_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of starting slots that got a player.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    /// Whether the player at `index` is in the lineup.
    pub fn is_starter(&self, index: usize) -> bool {
        self.slots.iter().any(|s| s.player == Some(index))
    }

    /// Total value of the starting lineup.
    pub fn value(&self, players: &[Player]) -> f64 {
        self.slots
            .iter()
            .filter_map(|s| s.player)
            .map(|i| players[i].value)
            .sum()
    }
}

/// Augmenting-path search over starting slots.
struct SlotFitter<'a> {
    players: &'a [Player],
    parsed: &'a [Slot],
    /// Slot indices in fill order.
    order: &'a [usize],
    /// Player index occupying each slot.
    owner: Vec<Option<usize>>,
}

impl SlotFitter<'_> {
    fn fits(&self, slot: usize, player: usize) -> bool {
        self.parsed[slot].accepts(self.players[player].parsed_position())
    }

    /// Place `player`, moving already placed players between slots if that
    /// frees one up. Returns false (and changes nothing) if no room exists.
    fn place(&mut self, player: usize, visited: &mut [bool]) -> bool {
        let order = self.order;
        if let Some(&free) = order
            .iter()
            .find(|&&s| !visited[s] && self.owner[s].is_none() && self.fits(s, player))
        {
            self.owner[free] = Some(player);
            return true;
        }
        for &slot in order {
            if visited[slot] || !self.fits(slot, player) {
                continue;
            }
            visited[slot] = true;
            if let Some(current) = self.owner[slot] {
                if self.place(current, visited) {
                    self.owner[slot] = Some(player);
                    return true;
                }
            }
        }
        false
    }
}

//! Weighted candidate selection for one role in one slot.
//!
//! Every eligible person gets a weight from the fairness state: people who
//! were assigned less often and longer ago rank higher, and people already
//! used this month are pushed down (never excluded). Candidates whose weights
//! sit close together are shuffled so successive runs do not produce the same
//! roster.
//!
//! Picks escalate through three tiers until the role's requirement is met:
//!
//! 1. ranked candidates not yet used this month;
//! 2. candidates already used this month, longest idle first;
//! 3. anyone in the pool, uniformly at random.
//!
//! An empty pool yields [`Cell::Unassigned`] for every required entry.

use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use crate::{
  fairness::{FairnessTracker, Position},
  field::Cell,
  person::Person,
  role::Role,
};

pub const BASE_WEIGHT: i64 = 100;
pub const USED_THIS_MONTH_PENALTY: i64 = 60;
/// Counts at or above this earn no scarcity bonus.
pub const COUNT_SATURATION: i64 = 10;
pub const COUNT_BONUS_STEP: i64 = 10;
pub const IDLE_BONUS_STEP: i64 = 5;
pub const IDLE_BONUS_CAP: i64 = 50;
pub const NEVER_ASSIGNED_BONUS: i64 = 20;
pub const MIN_WEIGHT: i64 = 5;
/// Candidates within this many weight units of a band's leader are shuffled.
pub const TIE_BAND: i64 = 10;

// ─── Weights ─────────────────────────────────────────────────────────────────

/// The selection weight of `key` for a slot at `position`.
pub fn weight(tracker: &FairnessTracker, key: &str, position: Position) -> i64 {
  let count = i64::from(tracker.role_count(key));
  let idle = position - tracker.last_position(key);

  let mut weight = BASE_WEIGHT;
  if tracker.is_used_this_month(key) {
    weight -= USED_THIS_MONTH_PENALTY;
  }
  weight += COUNT_BONUS_STEP * (COUNT_SATURATION - count).max(0);
  weight += (IDLE_BONUS_STEP * idle).min(IDLE_BONUS_CAP);
  if count == 0 {
    weight += NEVER_ASSIGNED_BONUS;
  }
  weight.max(MIN_WEIGHT)
}

/// A candidate with its computed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<'a> {
  pub person: &'a Person,
  pub weight: i64,
}

/// Order `candidates` by descending weight, shuffling within tie bands.
///
/// A band starts at the highest remaining weight and takes every following
/// candidate less than [`TIE_BAND`] below it.
pub fn rank<'a, R>(
  candidates: &'a [Person],
  position: Position,
  tracker: &FairnessTracker,
  rng: &mut R,
) -> Vec<Ranked<'a>>
where
  R: Rng + ?Sized,
{
  let mut ranked: Vec<Ranked<'a>> = candidates
    .iter()
    .map(|person| Ranked {
      person,
      weight: weight(tracker, &person.key(), position),
    })
    .collect();
  ranked.sort_by(|a, b| b.weight.cmp(&a.weight));
  shuffle_bands(&mut ranked, rng);
  ranked
}

/// Shuffle each tie band of a list already sorted by descending weight.
fn shuffle_bands<R>(ranked: &mut [Ranked<'_>], rng: &mut R)
where
  R: Rng + ?Sized,
{
  let mut start = 0;
  while start < ranked.len() {
    let leader = ranked[start].weight;
    let end = ranked[start..]
      .iter()
      .position(|r| leader - r.weight >= TIE_BAND)
      .map_or(ranked.len(), |offset| start + offset);
    ranked[start..end].shuffle(rng);
    start = end;
  }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// How a pick was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
  /// Not yet used this month.
  Fresh,
  /// Already used this month; longest idle.
  Repeat,
  /// Uniform draw from the whole pool.
  Random,
  /// Nobody eligible.
  Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
  pub cell: Cell,
  pub tier: Tier,
}

/// The slot being filled.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest<'a> {
  pub role:     Role,
  pub position: Position,
  /// `M<m>S<s>`, used in assignment history.
  pub label:    &'a str,
  pub required: usize,
}

/// Choose `request.required` entries from `candidates`, committing every real
/// pick to `tracker` as it is made.
pub fn select<R>(
  candidates: &[Person],
  request: SlotRequest<'_>,
  tracker: &mut FairnessTracker,
  rng: &mut R,
) -> Vec<Pick>
where
  R: Rng + ?Sized,
{
  let mut picks = Vec::with_capacity(request.required);
  if candidates.is_empty() {
    debug!(role = %request.role, slot = request.label, "no eligible candidates");
    picks.resize(request.required, Pick {
      cell: Cell::Unassigned,
      tier: Tier::Placeholder,
    });
    return picks;
  }

  let fresh: Vec<&Person> = rank(candidates, request.position, tracker, rng)
    .into_iter()
    .filter(|r| !tracker.is_used_this_month(&r.person.key()))
    .map(|r| r.person)
    .collect();
  let mut fresh = fresh.into_iter();

  while picks.len() < request.required {
    let next = match fresh.next() {
      Some(person) => Some((person, Tier::Fresh)),
      None => fallback(candidates, tracker, rng),
    };
    let Some((person, tier)) = next else {
      break;
    };
    tracker.record_assignment(&person.key(), request.position, request.role, request.label);
    debug!(
      role = %request.role,
      slot = request.label,
      person = %person.display_name(),
      ?tier,
      "assigned"
    );
    picks.push(Pick {
      cell: Cell::text(person.display_name()),
      tier,
    });
  }
  picks
}

/// Tiers 2 and 3, once no fresh candidate is left.
///
/// Inside [`select`] every candidate outside the fresh list was used this
/// month, so [`Tier::Repeat`] always answers there. [`Tier::Random`] covers a
/// caller whose fresh list was exhausted without recording its picks.
fn fallback<'a, R>(
  candidates: &'a [Person],
  tracker: &FairnessTracker,
  rng: &mut R,
) -> Option<(&'a Person, Tier)>
where
  R: Rng + ?Sized,
{
  longest_idle_used(candidates, tracker)
    .map(|person| (person, Tier::Repeat))
    .or_else(|| candidates.choose(rng).map(|person| (person, Tier::Random)))
}

/// Among candidates already used this month, the one assigned longest ago.
/// Ties go to the earlier pool entry.
fn longest_idle_used<'a>(
  candidates: &'a [Person],
  tracker: &FairnessTracker,
) -> Option<&'a Person> {
  candidates
    .iter()
    .filter(|p| tracker.is_used_this_month(&p.key()))
    .min_by_key(|p| tracker.last_position(&p.key()))
}

//! The roster assignment engine.
//!
//! [`Engine::generate`] fills every row of a window of month blocks: curated
//! scripture content comes from the lookup, every assignable duty is chosen by
//! the [`selector`](crate::selector) against fairness state that spans the
//! whole window, and the free-text message column is cleared. The input
//! blocks are never modified; the caller decides whether to keep the result.
//!
//! Generation cannot fail. Missing lookup data leaves content columns blank,
//! and a duty nobody is eligible for is left [`Cell::Unassigned`] and counted
//! in the [`GenerationSummary`].

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
  fairness::{FairnessTracker, Position, SLOT_STRIDE, position},
  field::{Cell, FieldValue, blank_fields},
  lookup::{LookupContent, ScriptureLookup},
  month::MonthBlock,
  pool::EligibilityPools,
  role::Role,
  row::{RosterRow, RowBody},
  selector::{Pick, SlotRequest, Tier, select},
  summary::GenerationSummary,
};

/// The output of one run.
#[derive(Debug, Clone)]
pub struct Generated {
  pub months:  Vec<MonthBlock>,
  pub summary: GenerationSummary,
}

pub struct Engine<'a, L: ?Sized> {
  pools:  &'a EligibilityPools,
  lookup: &'a L,
}

/// State owned by a single run and dropped when it ends.
struct RunContext<'r, R: ?Sized> {
  tracker:      FairnessTracker,
  stride:       Position,
  placeholders: usize,
  rng:          &'r mut R,
}

impl<'a, L> Engine<'a, L>
where
  L: ScriptureLookup + ?Sized,
{
  /// An engine that fills every assignable duty in column order.
  pub fn new(pools: &'a EligibilityPools, lookup: &'a L) -> Self {
    Self { pools, lookup }
  }

  /// Fill `months` for `year`, drawing tie-breaks from `rng`.
  pub fn generate<R>(&self, year: i32, months: &[MonthBlock], rng: &mut R) -> Generated
  where
    R: Rng + ?Sized,
  {
    let mut ctx = RunContext {
      tracker: FairnessTracker::new(self.pools.all_keys()),
      stride: stride_for(months),
      placeholders: 0,
      rng,
    };
    info!(
      year,
      months = months.len(),
      people = ctx.tracker.records().count(),
      "generating roster"
    );

    let months = months
      .iter()
      .enumerate()
      .map(|(month_idx, block)| self.fill_month(year, month_idx, block, &mut ctx))
      .collect();

    let summary = GenerationSummary::from_tracker(&ctx.tracker, ctx.placeholders);
    if !summary.is_complete() {
      warn!(
        placeholders = summary.placeholders,
        unassigned = summary.unassigned_people.len(),
        "roster is incomplete"
      );
    }
    info!(
      covered = summary.people_covered,
      total = summary.people_total,
      assignments = summary.total_assignments,
      "roster generated"
    );
    Generated { months, summary }
  }

  fn fill_month<R>(
    &self,
    year: i32,
    month_idx: usize,
    block: &MonthBlock,
    ctx: &mut RunContext<'_, R>,
  ) -> MonthBlock
  where
    R: Rng + ?Sized,
  {
    ctx.tracker.reset_month();
    debug!(month = %block.month.name(), window_index = month_idx, "filling month");

    let rows = block
      .rows
      .iter()
      .enumerate()
      .map(|(slot_idx, row)| self.fill_row(year, month_idx, slot_idx, row, ctx))
      .collect();
    MonthBlock {
      month: block.month,
      rows,
    }
  }

  fn fill_row<R>(
    &self,
    year: i32,
    month_idx: usize,
    slot_idx: usize,
    row: &RosterRow,
    ctx: &mut RunContext<'_, R>,
  ) -> RosterRow
  where
    R: Rng + ?Sized,
  {
    let mut out = RosterRow {
      id:   row.id,
      date: row.date,
      body: RowBody::Fields {
        fields: blank_fields(),
      },
    };
    if let Some(date) = row.date
      && let Some(entry) = self.lookup.lookup(year, date)
    {
      out.apply_lookup(&LookupContent::from_entry(entry));
    }

    let label = format!("M{}S{}", month_idx + 1, slot_idx + 1);
    let request_at = position(month_idx, slot_idx, ctx.stride);
    let first_slot = slot_idx == 0;

    for role in Role::ASSIGNABLE {
      let candidates = self.pools.candidates(role, first_slot);
      if candidates.is_empty() {
        warn!(%role, slot = %label, "no eligible candidates");
      }
      let picks = select(
        candidates,
        SlotRequest {
          role,
          position: request_at,
          label: &label,
          required: role.required_slots(),
        },
        &mut ctx.tracker,
        &mut *ctx.rng,
      );
      ctx.placeholders += picks.iter().filter(|p| p.tier == Tier::Placeholder).count();

      if let Some(fields) = out.fields_mut() {
        fields.insert(role, field_value(role, picks));
      }
    }
    out
  }
}

/// The stride that keeps positions of different months apart: the default,
/// widened when a block holds more rows than that.
fn stride_for(months: &[MonthBlock]) -> Position {
  let longest = months.iter().map(|m| m.rows.len()).max().unwrap_or(0) as Position;
  SLOT_STRIDE.max(longest)
}

fn field_value(role: Role, picks: Vec<Pick>) -> FieldValue {
  let mut cells = picks.into_iter().map(|p| p.cell);
  let first = cells.next().unwrap_or(Cell::Unassigned);
  if role.is_pair() {
    FieldValue::Pair(first, cells.next().unwrap_or(Cell::Unassigned))
  } else {
    FieldValue::Scalar(first)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use chrono::Month;
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;
  use crate::{
    calendar::parse_lookup_key,
    lookup::{LookupEntry, NoLookup, Scripture, ScripturePortions},
    person::normalize_name,
    pool::RolePool,
  };

  const KIDS: [&str; 3] = ["kid one", "kid two", "kid three"];
  const ADULTS: [&str; 4] = ["adam", "beth", "carl", "dina"];

  fn pools() -> EligibilityPools {
    EligibilityPools::new()
      .with_pool(Role::OpeningPrayer, RolePool::single(["ann", "ben", "cara", "dan", "eve"]))
      .with_pool(Role::PraiseWorship, RolePool::single(["choir", "youth band"]))
      .with_pool(Role::ScriptureReading, RolePool::split(KIDS, ADULTS))
      .with_pool(Role::IntercessoryPrayer, RolePool::single(["fay"]))
  }

  fn window() -> Vec<MonthBlock> {
    [Month::July, Month::August, Month::September]
      .into_iter()
      .map(|m| MonthBlock::generate(m, 2025, &NoLookup))
      .collect()
  }

  fn names(cells: &[&Cell]) -> Vec<String> {
    cells.iter().filter_map(|c| c.as_text()).map(normalize_name).collect()
  }

  fn run(pools: &EligibilityPools, seed: u64) -> Generated {
    let mut rng = StdRng::seed_from_u64(seed);
    Engine::new(pools, &NoLookup).generate(2025, &window(), &mut rng)
  }

  #[test]
  fn every_duty_gets_its_required_entries() {
    let pools = pools();
    let out = run(&pools, 1);
    let known = pools.all_keys();
    for row in out.months.iter().flat_map(|m| &m.rows) {
      let fields = row.fields().unwrap();
      for role in Role::ASSIGNABLE {
        let cells = fields[&role].cells();
        assert_eq!(cells.len(), role.required_slots());
        for cell in cells {
          match cell.as_text() {
            Some(name) => assert!(known.contains(&normalize_name(name)), "{name}"),
            None => assert!(cell.is_unassigned()),
          }
        }
      }
    }
  }

  #[test]
  fn readers_follow_the_kids_and_adults_split() {
    let out = run(&pools(), 2);
    for block in &out.months {
      for (slot, row) in block.rows.iter().enumerate() {
        let readers = names(&row.fields().unwrap()[&Role::ScriptureReading].cells());
        let pool: &[&str] = if slot == 0 { &KIDS } else { &ADULTS };
        assert_eq!(readers.len(), 2);
        assert!(readers.iter().all(|r| pool.contains(&r.as_str())), "{readers:?}");
      }
    }
  }

  #[test]
  fn large_pools_avoid_repeats_within_a_month() {
    // Five Sundays at most, so six people always suffice.
    let pools = EligibilityPools::new().with_pool(
      Role::OpeningPrayer,
      RolePool::single(["a", "b", "c", "d", "e", "f"]),
    );
    for seed in 0..5 {
      let out = run(&pools, seed);
      for block in &out.months {
        let picked: Vec<String> = block
          .rows
          .iter()
          .flat_map(|r| names(&r.fields().unwrap()[&Role::OpeningPrayer].cells()))
          .collect();
        let distinct: BTreeSet<_> = picked.iter().collect();
        assert_eq!(distinct.len(), picked.len(), "{picked:?}");
      }
    }
  }

  #[test]
  fn empty_pool_is_all_placeholders() {
    let pools = pools();
    let out = run(&pools, 3);
    let slots: usize = out.months.iter().map(|m| m.rows.len()).sum();
    // Offertory has no pool at all.
    for row in out.months.iter().flat_map(|m| &m.rows) {
      let value = &row.fields().unwrap()[&Role::OffertoryPrayer];
      assert_eq!(value, &FieldValue::Scalar(Cell::Unassigned));
    }
    assert_eq!(out.summary.placeholders, slots);
  }

  #[test]
  fn empty_pools_count_two_per_reading_slot() {
    let pools = EligibilityPools::new();
    let mut rng = StdRng::seed_from_u64(0);
    let out = Engine::new(&pools, &NoLookup).generate(2025, &window(), &mut rng);
    let slots: usize = out.months.iter().map(|m| m.rows.len()).sum();
    // Four single duties plus two readers.
    assert_eq!(out.summary.placeholders, 6 * slots);
    assert_eq!(out.summary.people_total, 0);
    assert!(!out.summary.is_complete());
  }

  #[test]
  fn summary_matches_the_roster() {
    let pools = pools();
    let out = run(&pools, 4);
    let assigned = out
      .months
      .iter()
      .flat_map(|m| &m.rows)
      .flat_map(|r| {
        Role::ASSIGNABLE
          .iter()
          .flat_map(|role| names(&r.fields().unwrap()[role].cells()))
          .collect::<Vec<_>>()
      })
      .count();
    assert_eq!(out.summary.total_assignments, assigned);
    let loads: u32 = out.summary.loads.iter().map(|l| l.count).sum();
    assert_eq!(loads as usize, assigned);
    for load in &out.summary.loads {
      assert_eq!(load.assignments.len(), load.count as usize);
    }
  }

  #[test]
  fn lookup_fills_content_and_message_is_cleared() {
    let date = parse_lookup_key("06-07-2025").unwrap();
    let mut lookup = ScripturePortions::new();
    lookup.insert(2025, LookupEntry {
      date,
      scriptures: vec![
        Scripture {
          passage:       "Psalm 23".into(),
          mv:            "Psalm 23:1".into(),
          message_theme: None,
        },
        Scripture {
          passage:       "John 10".into(),
          mv:            "John 10:11".into(),
          message_theme: Some("The Good Shepherd".into()),
        },
      ],
    });

    let mut months = window();
    months[0].rows[0].set_text(Role::Message, 0, "left over");
    months[0].rows[1].merge();

    let pools = pools();
    let mut rng = StdRng::seed_from_u64(5);
    let out = Engine::new(&pools, &lookup).generate(2025, &months, &mut rng);

    let first = out.months[0].rows[0].fields().unwrap();
    assert_eq!(
      first[&Role::ScripturePassage],
      FieldValue::Pair(Cell::text("Psalm 23"), Cell::text("John 10"))
    );
    assert_eq!(first[&Role::MessageTheme], FieldValue::Scalar(Cell::text("The Good Shepherd")));
    assert!(first[&Role::Message].cell(0).unwrap().is_blank());
    assert!(!out.months[0].rows[1].is_merged());
    assert_eq!(out.months[0].rows[1].id, months[0].rows[1].id);

    // Input untouched.
    assert!(months[0].rows[1].is_merged());
  }

  #[test]
  fn long_months_widen_the_stride() {
    let mut months = window();
    for _ in 0..8 {
      months[0].add_row();
    }
    assert_eq!(stride_for(&months), 12);
    assert_eq!(stride_for(&window()), SLOT_STRIDE);

    let pools = pools();
    let mut rng = StdRng::seed_from_u64(6);
    let out = Engine::new(&pools, &NoLookup).generate(2025, &months, &mut rng);
    assert_eq!(out.months[0].rows.len(), 12);
  }
}

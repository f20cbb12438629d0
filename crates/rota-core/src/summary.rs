//! What a generation run did, for the caller to show to a person.

use std::fmt;

use serde::Serialize;

use crate::{fairness::FairnessTracker, person::title_case};

/// Names listed in the message before the rest are elided.
const LISTED_NAMES: usize = 5;

/// One person's share of the generated roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonLoad {
  pub name:        String,
  pub count:       u32,
  /// `"<Role> (M<m>S<s>)"` labels in assignment order.
  pub assignments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
  /// Everyone eligible for at least one duty.
  pub people_total:      usize,
  /// People given at least one duty.
  pub people_covered:    usize,
  pub total_assignments: usize,
  /// Entries left unassigned because nobody was eligible.
  pub placeholders:      usize,
  /// Title-cased names of eligible people given nothing.
  pub unassigned_people: Vec<String>,
  /// Everyone with at least one duty, busiest first.
  pub loads:             Vec<PersonLoad>,
}

impl GenerationSummary {
  pub fn from_tracker(tracker: &FairnessTracker, placeholders: usize) -> Self {
    let mut summary = Self {
      placeholders,
      ..Self::default()
    };
    for (key, record) in tracker.records() {
      summary.people_total += 1;
      summary.total_assignments += record.role_count as usize;
      if record.role_count == 0 {
        summary.unassigned_people.push(title_case(key));
        continue;
      }
      summary.people_covered += 1;
      summary.loads.push(PersonLoad {
        name:        title_case(key),
        count:       record.role_count,
        assignments: record.history.clone(),
      });
    }
    summary.loads.sort_by(|a, b| b.count.cmp(&a.count));
    summary
  }

  /// People with more than one duty in the window.
  pub fn repeated(&self) -> impl Iterator<Item = &PersonLoad> {
    self.loads.iter().filter(|l| l.count > 1)
  }

  /// No placeholders and nobody left out.
  pub fn is_complete(&self) -> bool {
    self.placeholders == 0 && self.unassigned_people.is_empty()
  }
}

impl fmt::Display for GenerationSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Auto-generation completed!")?;
    writeln!(
      f,
      "{} out of {} people assigned roles",
      self.people_covered, self.people_total
    )?;
    write!(f, "Total assignments: {}", self.total_assignments)?;

    if self.placeholders > 0 {
      write!(
        f,
        "\n{} positions marked as \"TBD\" - please assign manually",
        self.placeholders
      )?;
    } else {
      write!(f, "\nAll positions filled with real names!")?;
    }

    if self.unassigned_people.is_empty() {
      write!(f, "\nAll available people got at least one role!")?;
    } else {
      let shown = self
        .unassigned_people
        .iter()
        .take(LISTED_NAMES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
      let more = if self.unassigned_people.len() > LISTED_NAMES { "..." } else { "" };
      write!(
        f,
        "\n{} people didn't get roles: {shown}{more}",
        self.unassigned_people.len()
      )?;
    }

    let repeated = self.repeated().count();
    if repeated > 0 {
      write!(f, "\n{repeated} people have multiple assignments")?;
    }
    Ok(())
  }
}

//! Eligibility pools: who may be placed in which duty.
//!
//! Pools are supplied from outside (a role-list JSON file) and are read-only
//! to the engine. Scripture reading is split: the first Sunday of each month
//! is read by children, every other Sunday by adults.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::{
  Result,
  person::{Person, normalize_name, title_case},
  role::Role,
};

// ─── Pools ───────────────────────────────────────────────────────────────────

/// The people eligible for one duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePool {
  Single(Vec<Person>),
  /// `kids` serve the first slot of each month, `adults` the rest.
  Split {
    kids:   Vec<Person>,
    adults: Vec<Person>,
  },
}

impl RolePool {
  pub fn single<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::Single(people(names))
  }

  pub fn split<I, J, S, T>(kids: I, adults: J) -> Self
  where
    I: IntoIterator<Item = S>,
    J: IntoIterator<Item = T>,
    S: Into<String>,
    T: Into<String>,
  {
    Self::Split {
      kids:   people(kids),
      adults: people(adults),
    }
  }

  /// Candidates for a slot; `first_slot` selects the kids list of a split
  /// pool and is ignored otherwise.
  pub fn candidates(&self, first_slot: bool) -> &[Person] {
    match self {
      Self::Single(list) => list,
      Self::Split { kids, .. } if first_slot => kids,
      Self::Split { adults, .. } => adults,
    }
  }

  fn members(&self) -> impl Iterator<Item = &Person> {
    let (a, b): (&[Person], &[Person]) = match self {
      Self::Single(list) => (list, &[]),
      Self::Split { kids, adults } => (kids, adults),
    };
    a.iter().chain(b)
  }
}

/// Build a pool list: blank names are dropped and repeated normalised names
/// keep only their first spelling.
fn people<I, S>(names: I) -> Vec<Person>
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  let mut seen = BTreeSet::new();
  names
    .into_iter()
    .map(Person::new)
    .filter(|p| !p.key().is_empty() && seen.insert(p.key()))
    .collect()
}

/// Every duty's pool, plus people who are only known for name suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityPools {
  pools:     BTreeMap<Role, RolePool>,
  directory: Vec<Person>,
}

impl EligibilityPools {
  pub fn new() -> Self { Self::default() }

  /// Set the pool for `role`. Content fields are not assignable and are
  /// ignored.
  pub fn with_pool(mut self, role: Role, pool: RolePool) -> Self {
    if role.is_assignable() {
      self.pools.insert(role, pool);
    }
    self
  }

  /// Candidates for `role` in a slot. Roles without a pool yield an empty
  /// slice.
  pub fn candidates(&self, role: Role, first_slot: bool) -> &[Person] {
    self
      .pools
      .get(&role)
      .map(|p| p.candidates(first_slot))
      .unwrap_or_default()
  }

  /// Normalised names of everyone who can be assigned to any duty.
  pub fn all_keys(&self) -> BTreeSet<String> {
    self
      .pools
      .values()
      .flat_map(RolePool::members)
      .map(Person::key)
      .collect()
  }

  /// Up to `limit` title-cased names containing `query`, case-insensitively,
  /// drawn from every pool and the suggestion directory.
  pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
    let everyone = self.pools.values().flat_map(RolePool::members).chain(&self.directory);
    matching(everyone, query, limit)
  }

  /// Like [`suggest`](Self::suggest), limited to the pool of `role`.
  pub fn suggest_for(&self, role: Role, query: &str, limit: usize) -> Vec<String> {
    match self.pools.get(&role) {
      Some(pool) => matching(pool.members(), query, limit),
      None => Vec::new(),
    }
  }

  /// Parse the role-list JSON file.
  ///
  /// ```json
  /// {
  ///   "openingprayer":    [{ "name": "..." }],
  ///   "praiseandworship": [...],
  ///   "reading":          [...],
  ///   "intercessory":     [...],
  ///   "offertoryprayer":  [...],
  ///   "sevinisunday":     { "kids": [...], "adults": [...] }
  /// }
  /// ```
  ///
  /// Adult readers come from `reading`; `sevinisunday.adults` only feeds name
  /// suggestions.
  pub fn from_json(input: &str) -> Result<Self> {
    let raw: RawRoleList = serde_json::from_str(input)?;
    let mut pools = Self::new()
      .with_pool(Role::OpeningPrayer, RolePool::single(raw.openingprayer.names()))
      .with_pool(Role::PraiseWorship, RolePool::single(raw.praiseandworship.names()))
      .with_pool(
        Role::ScriptureReading,
        RolePool::split(raw.sevinisunday.kids.names(), raw.reading.names()),
      )
      .with_pool(Role::IntercessoryPrayer, RolePool::single(raw.intercessory.names()))
      .with_pool(Role::OffertoryPrayer, RolePool::single(raw.offertoryprayer.names()));
    pools.directory = people(raw.sevinisunday.adults.names());
    Ok(pools)
  }
}

fn matching<'a, I>(people: I, query: &str, limit: usize) -> Vec<String>
where
  I: Iterator<Item = &'a Person>,
{
  let needle = normalize_name(query);
  let known: BTreeSet<String> = people.map(Person::key).collect();
  known
    .into_iter()
    .filter(|key| key.contains(&needle))
    .take(limit)
    .map(|key| title_case(&key))
    .collect()
}

// ─── Role-list file shape ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawRoleList {
  #[serde(default)]
  openingprayer:    RawPeople,
  #[serde(default)]
  praiseandworship: RawPeople,
  #[serde(default)]
  reading:          RawPeople,
  #[serde(default)]
  intercessory:     RawPeople,
  #[serde(default)]
  offertoryprayer:  RawPeople,
  #[serde(default)]
  sevinisunday:     RawSplit,
}

#[derive(Debug, Default, Deserialize)]
struct RawSplit {
  #[serde(default)]
  kids:   RawPeople,
  #[serde(default)]
  adults: RawPeople,
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct RawPeople(Vec<RawPerson>);

#[derive(Debug, Deserialize)]
struct RawPerson {
  #[serde(default)]
  name: Option<String>,
}

impl RawPeople {
  fn names(self) -> impl Iterator<Item = String> {
    self.0.into_iter().filter_map(|p| p.name)
  }
}

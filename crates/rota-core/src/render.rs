//! Printable output.
//!
//! Renderers read a snapshot and never change it. This is the only place an
//! unassigned cell becomes the `TBD` placeholder text.

use std::fmt::Write as _;

use strum::IntoEnumIterator as _;

use crate::{
  calendar::lookup_key,
  month::MonthBlock,
  role::Role,
  row::{RosterRow, RowBody},
  snapshot::RosterSnapshot,
};

/// Turns a finished roster into a document.
pub trait RosterRenderer {
  fn render(&self, snapshot: &RosterSnapshot) -> String;
}

/// Plain text: the window title, then one pipe table per month.
///
/// ```text
/// Order of Sunday : July - September
///
/// ## Order of Sunday - July
///
/// | Date | Opening Prayer | ... | Offertory Prayer |
/// | --- | --- | ... | --- |
/// | 06-07-2025 | Anna | ... | TBD |
/// | 13-07-2025 | Combined service |
/// ```
///
/// Merged rows print the date and the merged text only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl RosterRenderer for TextRenderer {
  fn render(&self, snapshot: &RosterSnapshot) -> String {
    let mut out = snapshot.title();
    out.push('\n');
    for block in snapshot.months.iter().filter(|b| !b.rows.is_empty()) {
      out.push('\n');
      render_month(&mut out, block);
    }
    out
  }
}

fn render_month(out: &mut String, block: &MonthBlock) {
  let headings: Vec<&str> = std::iter::once("Date")
    .chain(Role::iter().map(Role::heading))
    .collect();

  let _ = writeln!(out, "## Order of Sunday - {}", block.month.name());
  out.push('\n');
  table_line(out, headings.iter().copied());
  table_line(out, headings.iter().map(|_| "---"));
  for row in &block.rows {
    let cells = row_cells(row);
    table_line(out, cells.iter().map(String::as_str));
  }
}

fn row_cells(row: &RosterRow) -> Vec<String> {
  let date = row.date.map(lookup_key).unwrap_or_default();
  match &row.body {
    RowBody::Merged { content, .. } => vec![date, content.clone()],
    RowBody::Fields { fields } => std::iter::once(date)
      .chain(
        Role::iter().map(|role| fields.get(&role).map(|v| v.joined()).unwrap_or_default()),
      )
      .collect(),
  }
}

fn table_line<'a, I>(out: &mut String, cells: I)
where
  I: Iterator<Item = &'a str>,
{
  out.push('|');
  for cell in cells {
    let _ = write!(out, " {} |", cell.replace('|', "\\|"));
  }
  out.push('\n');
}

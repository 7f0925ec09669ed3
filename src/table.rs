//! `prettytable` renderings of memory, assembler logs and reports.

use std::fmt::Display;

use prettytable::{format as TableFormat, Table};

use crate::bytecode::TraceRecord;
use crate::report::MemoryCell;

lazy_static! {
  pub static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/**
  Lists `(address, value)` pairs, marking the row whose address equals `highlight`. Only the
  cells passed in are shown, so callers decide whether zero cells are worth printing.
*/
pub fn make_memory_table<T, I>(name: char, cells: I, highlight: Option<usize>) -> Table
  where T: Display,
        I: IntoIterator<Item = (usize, T)>
{
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Address", ubl->"Contents"]);

  for (address, value) in cells {
    match Some(address) == highlight {

      true  => {
        table.add_row(
          row![r->format!("* --> {}[{}] =", name, address), format!("{}", value)]
        );
      }

      false => {
        table.add_row(
          row![r->format!("{}[{}] =", name, address), format!("{}", value)]
        );
      }

    } // end match on highlight
  } // end for
  table
}

/// One row per assembled line: the fields and the encoded record in hex.
pub fn make_trace_table(trace: &[TraceRecord]) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"#", ubr->"A", ubr->"B", ubr->"C", ubr->"D", ubl->"Record"]);

  for (i, record) in trace.iter().enumerate() {
    let bytes =
      record.result
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect::<Vec<String>>()
            .join(" ");
    table.add_row(row![r->i, r->record.a, r->record.b, r->record.c, r->record.d, bytes]);
  }
  table
}

pub fn make_report_table(report: &[MemoryCell]) -> Table {
  make_memory_table('M', report.iter().map(|cell| (cell.index, cell.value)), None)
}

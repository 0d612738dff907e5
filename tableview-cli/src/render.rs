//! Plain-text table rendering.

use std::fmt::Write;

use tableview_lib::filter::Segment;
use tableview_lib::model::CellValue;
use tableview_lib::paging::PageLink;
use tableview_lib::sort::SortDirection;
use tableview_lib::view::{ViewAdapter, ViewSnapshot};
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

/// Draws snapshots as aligned text, with matches wrapped in `[` `]`.
#[derive(Debug, Default)]
pub struct TextRenderer {
    columns: Vec<String>,
    output: String,
}

impl TextRenderer {
    /// Create a renderer for the given columns, in display order.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            output: String::new(),
        }
    }

    /// Everything rendered so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    fn header(&self, snapshot: &ViewSnapshot) -> Vec<String> {
        let multi_key = snapshot.sort_keys.len() > 1;
        self.columns
            .iter()
            .map(|column| match snapshot.sort_indicator(column) {
                Some((direction, priority)) => {
                    let arrow = match direction {
                        SortDirection::Ascending => "▲",
                        SortDirection::Descending => "▼",
                    };
                    if multi_key {
                        format!("{column} {arrow}{}", priority + 1)
                    } else {
                        format!("{column} {arrow}")
                    }
                }
                None => column.clone(),
            })
            .collect()
    }

    fn cells(&self, snapshot: &ViewSnapshot) -> Vec<Vec<String>> {
        snapshot
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| {
                        let text = row.get(column).map(CellValue::display_text).unwrap_or_default();
                        snapshot
                            .segments(row.id(), column, &text)
                            .into_iter()
                            .map(|segment| match segment {
                                Segment::Plain(s) => s.to_string(),
                                Segment::Match(s) => format!("[{s}]"),
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    fn footer(snapshot: &ViewSnapshot) -> String {
        let mut footer = match snapshot.item_range {
            Some((first, last)) => format!(
                "Showing {first}-{last} of {} (page {}/{})",
                snapshot.page.total_items,
                snapshot.page.current_page,
                snapshot.page.total_pages()
            ),
            None => "No matching rows".to_string(),
        };
        if snapshot.is_filtered() {
            let _ = write!(footer, ", filtered from {}", snapshot.total_unfiltered);
        }
        footer
    }

    fn page_strip(snapshot: &ViewSnapshot) -> String {
        snapshot
            .page_links
            .iter()
            .map(|link| match link {
                PageLink::Page(page) if *page == snapshot.page.current_page => format!("({page})"),
                PageLink::Page(page) => page.to_string(),
                PageLink::Gap => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ViewAdapter for TextRenderer {
    fn render(&mut self, snapshot: &ViewSnapshot) {
        let header = self.header(snapshot);
        let cells = self.cells(snapshot);

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                cells
                    .iter()
                    .map(|row| row[i].width())
                    .chain(std::iter::once(header[i].width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in std::iter::once(&header).chain(cells.iter()) {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(text, &width)| {
                    let fill = width.saturating_sub(text.width());
                    format!("{text}{}", " ".repeat(fill))
                })
                .collect();
            let _ = writeln!(self.output, "{}", padded.join(COLUMN_GAP).trim_end());
        }

        let _ = writeln!(self.output);
        let _ = writeln!(self.output, "{}", Self::footer(snapshot));
        if snapshot.controls_needed {
            let _ = writeln!(self.output, "Pages: {}", Self::page_strip(snapshot));
        }
    }
}

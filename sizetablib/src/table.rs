//! Bordered table rendering of label hierarchies.
//!
//! The renderer makes one pass over the leaf sequence. Each leaf expands
//! into its full per-depth hierarchy (ancestors resolved to their own
//! aggregated sizes), which is reconciled against the previous row so a
//! repeated parent path prints only once. Every surviving slot becomes a
//! bordered physical row; oversized names wrap across continuation rows.
//! In diff mode a leading status column carries `++`/`--` markers and
//! wholly-unchanged top-level groups collapse to a single `(SAME)` row.

use crate::charset::Charset;
use crate::label::Label;
use crate::map::SourceMap;
use crate::options::RenderOptions;

/// Fixed width added to every column in rst mode, accounting for the
/// inline-literal markup wrapped around cell content.
const RST_PADDING_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Center,
    Left,
    Right,
}

/// One hierarchy-depth slot while a row is being laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LabelContent {
    name: String,
    size: i64,
    marker: &'static str,
}

/// Renders one hierarchy as a bordered text table.
///
/// Column names, widths, and the grand total are computed up front;
/// `build` consumes the builder and returns the finished table. A builder
/// is single-use: render a second table from a fresh instance.
pub struct TableBuilder<'a> {
    source: &'a SourceMap,
    cs: Charset,
    rst_output: bool,
    diff_mode: bool,
    col_names: Vec<String>,
    col_widths: Vec<usize>,
    additional_padding: usize,
    total_divider: char,
    total_size: i64,
    rows: Vec<String>,
}

impl<'a> TableBuilder<'a> {
    /// Plan columns for the given hierarchy and options.
    pub fn new(source: &'a SourceMap, options: RenderOptions) -> Self {
        let diff_mode = source.is_diff();
        let mut col_names: Vec<String> = source.ds_names().to_vec();
        col_names.push("sizes".to_string());
        if diff_mode {
            col_names.insert(0, "diff".to_string());
        }
        let (additional_padding, total_divider) = if options.rst_output {
            (RST_PADDING_WIDTH, options.charset.h)
        } else {
            (0, options.charset.hh)
        };

        let mut builder = Self {
            source,
            cs: options.charset,
            rst_output: options.rst_output,
            diff_mode,
            col_names,
            col_widths: Vec::new(),
            additional_padding,
            total_divider,
            total_size: 0,
            rows: Vec::new(),
        };
        builder.col_widths = builder.generate_col_widths(options.col_max_width);
        builder
    }

    /// One width per rendered column: each depth column fits its widest
    /// name (clipped at the cap), the trailing size column fits the
    /// formatted total. The grand total accumulates during the same pass.
    fn generate_col_widths(&mut self, col_max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .source
            .ds_names()
            .iter()
            .map(|name| name.chars().count())
            .collect();

        for label in self.source.labels() {
            self.total_size += label.size;
            for (index, name) in label
                .parents
                .iter()
                .chain(std::iter::once(&label.name))
                .enumerate()
            {
                let len = name.chars().count();
                if len > col_max_width {
                    widths[index] = col_max_width;
                } else if len > widths[index] {
                    widths[index] = len;
                }
            }
        }

        let mut diff_same = 0;
        if self.diff_mode {
            widths.insert(0, "Total".len());
            diff_same = "(SAME)".len();
        }
        widths.push(
            self.signed_size(self.total_size)
                .chars()
                .count()
                .max("sizes".len())
                .max(diff_same),
        );

        widths
            .into_iter()
            .map(|width| width + self.additional_padding)
            .collect()
    }

    /// Format a size with thousands separators; in diff mode positive
    /// values carry an explicit sign.
    fn signed_size(&self, size: i64) -> String {
        let formatted = format_commas(size);
        if self.diff_mode && size > 0 {
            format!("+{formatted}")
        } else {
            formatted
        }
    }

    /// Parse the hierarchy into the finished table.
    pub fn build(mut self) -> String {
        let source = self.source;
        let mut prev_hierarchy: Option<Vec<LabelContent>> = None;
        let mut last_diff_name = String::new();

        let title = self.create_title_row();
        self.rows.extend(title);

        for label in source.labels() {
            let new_hierarchy = self.hierarchy_for(label);
            let diff_list = diff_label_names(prev_hierarchy.as_deref(), &new_hierarchy);
            prev_hierarchy = Some(new_hierarchy);

            // leaves under an already-collapsed group emit nothing
            if !last_diff_name.is_empty() && label.parents.first() == Some(&last_diff_name) {
                continue;
            }

            let collapsible = self.diff_mode
                && diff_list
                    .first()
                    .and_then(|slot| slot.as_ref())
                    .is_some_and(|top| !source.has_diff_sublabels(&top.name));
            if collapsible {
                if self.rows.len() > 3 && !self.rst_output {
                    let divider = self.row_divider(self.cs.h);
                    self.rows.push(divider);
                }
                if let Some(Some(top)) = diff_list.first() {
                    let row = self.create_same_label_row(1, &top.name);
                    self.rows.push(row);
                }
                if let Some(parent) = label.parents.first() {
                    last_diff_name = parent.clone();
                }
            } else {
                let new_rows = self.create_rows_diffs(&diff_list, self.rows.len());
                self.rows.extend(new_rows);
            }
        }

        // rst mode leaves a stray divider after the final body row
        if self.rst_output {
            if let Some(last) = self.rows.last() {
                if last.starts_with(self.cs.ml) {
                    self.rows.pop();
                }
            }
        }

        let total = self.create_total_row();
        self.rows.extend(total);

        let mut table = self.rows.join("\n");
        if self.rst_output {
            table.push('\n');
        }
        table
    }

    /// Resolve a leaf into one `LabelContent` per hierarchy depth, the
    /// leaf itself occupying the final slot.
    fn hierarchy_for(&self, label: &Label) -> Vec<LabelContent> {
        let mut contents = Vec::with_capacity(label.parents.len() + 1);
        for (depth, parent) in label.parents.iter().enumerate() {
            if let Some(node) = self.source.node_at(depth, parent) {
                contents.push(LabelContent {
                    name: node.name.clone(),
                    size: node.size,
                    marker: node.status.marker(),
                });
            }
        }
        contents.push(LabelContent {
            name: label.name.clone(),
            size: label.size,
            marker: label.status.marker(),
        });
        contents
    }

    /// Emit one bordered physical row per surviving slot, wrapping
    /// oversized names across continuation rows.
    fn create_rows_diffs(
        &self,
        diff_list: &[Option<LabelContent>],
        rows_so_far: usize,
    ) -> Vec<String> {
        let diff_index = usize::from(self.diff_mode);
        let mut diff_rows: Vec<String> = Vec::new();

        for (index, slot) in diff_list.iter().enumerate() {
            let Some(content) = slot else { continue };
            let mut curr_row = String::new();
            if self.diff_mode {
                curr_row.push_str(&self.create_cell(content.marker, false, 0, Align::Right));
            }
            for cell_index in diff_index..diff_list.len() + diff_index {
                if cell_index == index + diff_index {
                    // a row starting a new top-level group gets a divider
                    if cell_index == diff_index && rows_so_far > 3 && !self.rst_output {
                        diff_rows.push(self.row_divider(self.cs.h));
                    }
                    if content.name.chars().count() + self.additional_padding
                        > self.col_widths[cell_index]
                    {
                        let mut wrapped = self.multi_row_label(&content.name, cell_index);
                        curr_row = wrapped.pop().unwrap_or_default();
                        diff_rows.append(&mut wrapped);
                        break;
                    }
                    curr_row.push_str(&self.create_cell(
                        &content.name,
                        false,
                        cell_index,
                        Align::Left,
                    ));
                } else {
                    curr_row.push_str(&self.create_cell("", false, cell_index, Align::Right));
                }
            }

            let curr_size = self.signed_size(content.size);
            curr_row.push_str(&self.create_cell(
                &curr_size,
                true,
                self.col_names.len() - 1,
                Align::Right,
            ));
            diff_rows.push(curr_row);
            if self.rst_output {
                diff_rows.push(self.row_divider(self.cs.h));
            }
        }

        diff_rows
    }

    /// Split an oversized name into `...`-joined chunks and emit one row
    /// per chunk; the final row is returned incomplete, awaiting its size
    /// cell.
    fn multi_row_label(&self, content: &str, target_col_index: usize) -> Vec<String> {
        let max_len = self.col_widths[target_col_index] - self.additional_padding;
        let piece_len = max_len.saturating_sub(3).max(1);

        let chars: Vec<char> = content.chars().collect();
        let head: String = chars[..max_len].iter().collect();
        let mut joined = String::new();
        for (i, piece) in chars[max_len..].chunks(piece_len).enumerate() {
            if i > 0 {
                joined.push_str("...");
            }
            joined.extend(piece);
        }
        let split_content: Vec<char> = format!("{head}...{joined}").chars().collect();
        let chunks: Vec<&[char]> = split_content.chunks(max_len).collect();

        let mut rows = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let cut_content: String = chunk.iter().collect();
            let mut curr_row = String::new();
            for cell_index in 0..self.col_names.len() {
                if cell_index == target_col_index {
                    curr_row.push_str(&self.create_cell(
                        &cut_content,
                        false,
                        target_col_index,
                        Align::Left,
                    ));
                } else if cell_index == self.col_names.len() - 1 {
                    // the final chunk's size cell is appended by the caller
                    if index == chunks.len() - 1 {
                        break;
                    }
                    curr_row.push_str(&self.create_cell("", true, cell_index, Align::Right));
                } else {
                    curr_row.push_str(&self.create_cell("", false, cell_index, Align::Right));
                }
            }
            rows.push(curr_row);
        }
        rows
    }

    /// Collapse row for an unchanged top-level group: the group name in
    /// its column, `(SAME)` in the size column.
    fn create_same_label_row(&self, col_index: usize, label: &str) -> String {
        let mut label_row = String::new();
        for col in 0..self.col_names.len() - 1 {
            if col == col_index {
                label_row.push_str(&self.create_cell(label, false, col, Align::Left));
            } else {
                label_row.push_str(&self.create_cell("", false, col, Align::Right));
            }
        }
        label_row.push_str(&self.create_cell(
            "(SAME)",
            true,
            self.col_widths.len() - 1,
            Align::Right,
        ));
        label_row
    }

    fn create_title_row(&self) -> Vec<String> {
        let mut title_cells = String::new();
        for (index, name) in self.col_names.iter().enumerate() {
            let last_cell = index == self.col_names.len() - 1;
            title_cells.push_str(&self.create_cell(name, last_cell, index, Align::Center));
        }
        vec![
            self.create_border(true, self.cs.h),
            title_cells,
            self.row_divider(self.cs.hh),
        ]
    }

    fn create_total_row(&self) -> Vec<String> {
        let mut total_row = String::new();
        for i in 0..self.col_names.len() {
            if i == 0 {
                total_row.push_str(&self.create_cell("Total", false, i, Align::Left));
            } else if i == self.col_names.len() - 1 {
                let total_size = self.signed_size(self.total_size);
                total_row.push_str(&self.create_cell(&total_size, true, i, Align::Right));
            } else {
                total_row.push_str(&self.create_cell("", false, i, Align::Center));
            }
        }
        vec![
            self.row_divider(self.total_divider),
            total_row,
            self.create_border(false, self.cs.h),
        ]
    }

    /// One cell: leading vertical border, content padded to the column
    /// width, and a closing border on the row's final cell.
    fn create_cell(&self, content: &str, last_cell: bool, col_index: usize, align: Align) -> String {
        let content = if self.rst_output && !content.is_empty() {
            format!(" ``{content}`` ")
        } else {
            content.to_string()
        };
        let pad_diff = self.col_widths[col_index].saturating_sub(content.chars().count());
        let padding = " ".repeat(pad_diff / 2);
        let odd_pad = if pad_diff % 2 == 1 { " " } else { "" };

        let mut cell = String::new();
        cell.push(self.cs.v);
        match align {
            Align::Center => {
                cell.push_str(odd_pad);
                cell.push_str(&padding);
                cell.push_str(&content);
                cell.push_str(&padding);
            }
            Align::Left => {
                cell.push_str(&content);
                cell.push_str(&padding);
                cell.push_str(&padding);
                cell.push_str(odd_pad);
            }
            Align::Right => {
                cell.push_str(&padding);
                cell.push_str(&padding);
                cell.push_str(odd_pad);
                cell.push_str(&content);
            }
        }
        if last_cell {
            cell.push(self.cs.v);
        }
        cell
    }

    fn row_divider(&self, h_div: char) -> String {
        let col_num = self.col_names.len();
        let mut row_div = String::new();
        for col in 0..col_num {
            row_div.push(if col == 0 { self.cs.ml } else { self.cs.mm });
            row_div.extend(std::iter::repeat(h_div).take(self.col_widths[col]));
            if col == col_num - 1 {
                row_div.push(self.cs.mr);
            }
        }
        row_div
    }

    /// Top or bottom border of the table.
    fn create_border(&self, top: bool, h_div: char) -> String {
        let col_num = self.col_names.len();
        let (left, mid, right) = if top {
            (self.cs.tl, self.cs.tm, self.cs.tr)
        } else {
            (self.cs.bl, self.cs.bm, self.cs.br)
        };
        let mut row_div = String::new();
        for col in 0..col_num {
            row_div.push(if col == 0 { left } else { mid });
            row_div.extend(std::iter::repeat(h_div).take(self.col_widths[col]));
            if col == col_num - 1 {
                row_div.push(right);
            }
        }
        row_div
    }
}

/// Suppress slots whose name and size both match the previous row; the
/// first row passes through untouched.
fn diff_label_names(
    prev: Option<&[LabelContent]>,
    curr: &[LabelContent],
) -> Vec<Option<LabelContent>> {
    match prev {
        None => curr.iter().cloned().map(Some).collect(),
        Some(prev) => curr
            .iter()
            .zip(prev)
            .map(|(new_lb, old_lb)| {
                if new_lb.name == old_lb.name && new_lb.size == old_lb.size {
                    None
                } else {
                    Some(new_lb.clone())
                }
            })
            .collect(),
    }
}

/// Thousands-comma grouping, e.g. `-1234567` becomes `-1,234,567`.
fn format_commas(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

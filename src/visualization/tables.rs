use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement,
    Table,
};

use crate::analysis::{ColumnInfo, DescribeTable, MissingStat, UniqueCount};
use crate::models::{DType, Dataset};

/// Section banner as printed before every console report.
pub fn section_header(title: &str) -> String {
    format!("\n{}\n", format!("===== {title} =====").bold().green())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Format the first `n` rows with a leading row index.
pub fn format_head(dataset: &Dataset, n: usize) -> String {
    let mut output = section_header(&format!("FIRST {n} ROWS"));

    let mut table = new_table();
    let mut header = vec![String::new()];
    header.extend(dataset.column_names());
    table.set_header(header);

    for (i, row) in dataset.head(n).into_iter().enumerate() {
        let mut cells = vec![Cell::new(i)];
        cells.extend(row.into_iter().map(right));
        table.add_row(cells);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_head(dataset: &Dataset, n: usize) {
    print!("{}", format_head(dataset, n));
}

/// Format the `(rows, columns)` tuple.
pub fn format_shape(shape: (usize, usize)) -> String {
    let mut output = section_header("SHAPE");
    output.push_str(&format!("({}, {})\n", shape.0, shape.1));
    output
}

pub fn print_shape(shape: (usize, usize)) {
    print!("{}", format_shape(shape));
}

/// `float64(11), int64(1)` style tally, alphabetical by dtype name.
pub fn format_dtype_tally(counts: &[(DType, usize)]) -> String {
    let mut sorted: Vec<&(DType, usize)> = counts.iter().collect();
    sorted.sort_by_key(|(dtype, _)| dtype.as_str());
    sorted
        .iter()
        .map(|(dtype, n)| format!("{dtype}({n})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format per-column non-null counts and dtypes.
pub fn format_info(
    name: &str,
    num_rows: usize,
    info: &[ColumnInfo],
    dtype_counts: &[(DType, usize)],
) -> String {
    let mut output = section_header("INFO");
    output.push_str(&format!("{}\n", format!("Dataset: {name}").dimmed()));
    if num_rows == 0 {
        output.push_str("RangeIndex: 0 entries\n");
    } else {
        output.push_str(&format!(
            "RangeIndex: {num_rows} entries, 0 to {}\n",
            num_rows - 1
        ));
    }
    output.push_str(&format!("Data columns (total {} columns):\n", info.len()));

    let mut table = new_table();
    table.set_header(vec!["#", "Column", "Non-Null Count", "Dtype"]);
    for (i, col) in info.iter().enumerate() {
        table.add_row(vec![
            right(i),
            Cell::new(&col.column),
            right(format!("{} non-null", col.non_null)),
            Cell::new(col.dtype),
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output.push_str(&format!("dtypes: {}\n", format_dtype_tally(dtype_counts)));
    output
}

pub fn print_info(
    name: &str,
    num_rows: usize,
    info: &[ColumnInfo],
    dtype_counts: &[(DType, usize)],
) {
    print!("{}", format_info(name, num_rows, info, dtype_counts));
}

/// Format the transposed describe table. Inapplicable statistics show `NaN`.
pub fn format_describe(describe: &DescribeTable) -> String {
    let mut output = section_header("DESCRIBE (all dtypes)");

    let mut table = new_table();
    let mut header = vec![String::new()];
    header.extend(describe.statistics.iter().map(|s| s.label().to_string()));
    table.set_header(header);

    for row in &describe.rows {
        let mut cells = vec![Cell::new(&row.column)];
        cells.extend(describe.statistics.iter().map(|stat| match row.values.get(stat) {
            Some(value) => right(value),
            None => right("NaN").fg(comfy_table::Color::DarkGrey),
        }));
        table.add_row(cells);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_describe(describe: &DescribeTable) {
    print!("{}", format_describe(describe));
}

/// Format the column names as a quoted list.
pub fn format_columns(columns: &[String]) -> String {
    let mut output = section_header("COLUMNS");
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
    output.push_str(&format!("[{}]\n", quoted.join(", ")));
    output
}

pub fn print_columns(columns: &[String]) {
    print!("{}", format_columns(columns));
}

/// Format per-column null counts.
pub fn format_missing_counts(missing: &[MissingStat]) -> String {
    let mut output = section_header("MISSING VALUES (count)");

    let mut table = new_table();
    table.set_header(vec!["Column", "Missing"]);
    for stat in missing {
        let count = if stat.missing_count > 0 {
            right(stat.missing_count).fg(comfy_table::Color::Yellow)
        } else {
            right(stat.missing_count)
        };
        table.add_row(vec![Cell::new(&stat.column), count]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_missing_counts(missing: &[MissingStat]) {
    print!("{}", format_missing_counts(missing));
}

/// Format per-column distinct-value counts.
pub fn format_unique_counts(unique: &[UniqueCount]) -> String {
    let mut output = section_header("UNIQUE VALUES PER COLUMN");

    let mut table = new_table();
    table.set_header(vec!["Column", "Unique"]);
    for u in unique {
        table.add_row(vec![Cell::new(&u.column), right(u.unique_count)]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_unique_counts(unique: &[UniqueCount]) {
    print!("{}", format_unique_counts(unique));
}

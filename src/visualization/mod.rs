mod charts;
mod fonts;
mod tables;

pub use charts::{
    correlation_color, draw_boxplot, render_boxplot, render_boxplot_with,
    render_correlation_heatmap, render_histograms, BoxGeometry, BoxplotRenderer, BOXPLOT_FILE, HEATMAP_FILE, HISTOGRAM_FILE,
};
pub use fonts::{text_available, FONT_FAMILY};
pub use tables::{
    format_columns, format_describe, format_dtype_tally, format_head, format_info,
    format_missing_counts, format_shape, format_unique_counts, print_columns, print_describe,
    print_head, print_info, print_missing_counts, print_shape, print_unique_counts,
    section_header,
};

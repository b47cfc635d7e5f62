//! Markdown to ratatui conversion for the latest-report pane.
//!
//! Parsing is done by termimad's minimad; this module only maps its line
//! kinds and compound flags onto theme styles.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use termimad::minimad::{self, Composite, CompositeStyle, Compound, Options, TableRow};

use crate::themes::Theme;

/// Width of a rendered horizontal rule.
const RULE_WIDTH: usize = 40;

pub fn markdown_to_lines(markdown: &str, theme: &Theme) -> Vec<Line<'static>> {
    let source = normalize_bullets(markdown);
    let text = minimad::parse_text(&source, Options::default());

    text.lines
        .iter()
        .filter_map(|line| match line {
            minimad::Line::Normal(composite) => Some(composite_line(composite, theme)),
            minimad::Line::TableRow(row) => Some(table_row(row, theme)),
            minimad::Line::TableRule(_) | minimad::Line::HorizontalRule => Some(Line::from(
                Span::styled("─".repeat(RULE_WIDTH), theme.md_rule),
            )),
            minimad::Line::CodeFence(_) => None,
        })
        .collect()
}

/// minimad only knows `*` list markers; reports also use `-` and `+`.
fn normalize_bullets(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut in_fence = false;
    for line in markdown.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
        }
        match trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("+ ")) {
            Some(item) if !in_fence && indent < 4 => {
                out.push_str(&line[..indent]);
                out.push_str("* ");
                out.push_str(item);
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

fn composite_line(composite: &Composite<'_>, theme: &Theme) -> Line<'static> {
    let (prefix, base) = match composite.style {
        CompositeStyle::Header(1) => (None, theme.md_heading),
        CompositeStyle::Header(_) => (None, theme.md_subheading),
        CompositeStyle::ListItem(depth) => {
            let indent = " ".repeat(usize::from(depth));
            (
                Some(Span::styled(format!("{indent}  • "), theme.md_bullet)),
                theme.text,
            )
        }
        CompositeStyle::Quote => (Some(Span::styled("│ ", theme.dim)), theme.text),
        CompositeStyle::Code => (Some(Span::styled("  ", theme.md_code)), theme.md_code),
        CompositeStyle::Paragraph => (None, theme.text),
    };

    let mut spans: Vec<Span<'static>> = prefix.into_iter().collect();
    spans.extend(
        composite
            .compounds
            .iter()
            .map(|compound| compound_span(compound, base, theme)),
    );
    Line::from(spans)
}

fn table_row(row: &TableRow<'_>, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, cell) in row.cells.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", theme.separator));
        }
        spans.extend(
            cell.compounds
                .iter()
                .map(|compound| compound_span(compound, theme.text, theme)),
        );
    }
    Line::from(spans)
}

fn compound_span(compound: &Compound<'_>, base: Style, theme: &Theme) -> Span<'static> {
    let mut style = if compound.code { theme.md_code } else { base };
    if compound.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if compound.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if compound.strikeout {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    Span::styled(compound.src.to_string(), style)
}

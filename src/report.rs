//! PDF report assembly.
//!
//! Lays out the per-client document: a title, a summary block, the two chart
//! images, and a framed per-region table.  The layout is fixed; only the
//! client name and the computed values vary between runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use genpdf::elements::{Break, FrameCellDecorator, Image, Paragraph, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Scale, SimplePageDecorator};
use image::GenericImageView;

use crate::charts::{AGE_CHART_FILE, REGION_CHART_FILE};
use crate::dataset::Table;
use crate::fonts;
use crate::stats::{self, RegionAggregate};

const MM_PER_INCH: f64 = 25.4;
// genpdf sizes raster images at this resolution when no scale is applied.
const IMAGE_DPI: f64 = 300.0;

// Display size of each embedded chart, in points.
const CHART_DISPLAY_WIDTH_PT: f64 = 400.0;
const CHART_DISPLAY_HEIGHT_PT: f64 = 300.0;

const PAGE_MARGIN_MM: i32 = 15;

const TITLE_FONT_SIZE: u8 = 20;
const HEADING_FONT_SIZE: u8 = 14;

const HEADER_TEXT_COLOR: Color = Color::Rgb(36, 92, 160);

/// Path of the report written for `client` inside `output_dir`.
pub fn report_path(client: &str, output_dir: impl AsRef<Path>) -> PathBuf {
    output_dir.as_ref().join(format!("{}_Report.pdf", client))
}

/// Assembles and writes the PDF report, returning its path.
///
/// The chart images are read back from `output_dir`; if a prior chart failure
/// left them missing, this fails and the orchestrator logs it.  An existing
/// report for the same client is overwritten.
pub fn render_report(client: &str, table: &Table, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let font_family = fonts::default_font_family()?;
    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Medical Insurance Report for {}", client));
    doc.set_paper_size(genpdf::PaperSize::Letter);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(PAGE_MARGIN_MM);
    doc.set_page_decorator(decorator);

    doc.push(
        Paragraph::new(format!("Medical Insurance Report for {}", client))
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(TITLE_FONT_SIZE)),
    );
    doc.push(Break::new(1));

    push_summary(&mut doc, table);
    doc.push(Break::new(1));

    doc.push(heading("Age Distribution of Patients"));
    doc.push(chart_image(&output_dir.join(AGE_CHART_FILE))?);
    doc.push(Break::new(1));

    doc.push(heading("Average Charges by Region"));
    doc.push(chart_image(&output_dir.join(REGION_CHART_FILE))?);
    doc.push(Break::new(1));

    doc.push(heading("Average Charges by Region (Table)"));
    doc.push(region_table(table)?);

    let path = report_path(client, output_dir);
    doc.render_to_file(&path)
        .map_err(|err| anyhow!("failed to write report to {}: {}", path.display(), err))?;
    Ok(path)
}

fn heading(text: &str) -> impl Element {
    Paragraph::new(text).styled(Style::new().bold().with_font_size(HEADING_FONT_SIZE))
}

fn push_summary(doc: &mut genpdf::Document, table: &Table) {
    let aggregate = RegionAggregate::from_table(table);
    let bold = Style::new().bold();

    let mut lines = Vec::new();

    let mut records = Paragraph::default();
    records.push_styled("Total Records: ", bold);
    records.push(table.len().to_string());
    lines.push(records);

    let mut age = Paragraph::default();
    age.push_styled("Average Age: ", bold);
    age.push(format!("{:.2}", stats::mean_age(table)));
    lines.push(age);

    let mut charges = Paragraph::default();
    charges.push_styled("Average Charges: ", bold);
    charges.push(stats::format_currency(stats::mean_charges(table)));
    lines.push(charges);

    let mut top = Paragraph::default();
    top.push_styled("Top Region (Highest Charges Avg.): ", bold);
    top.push(aggregate.top_region().unwrap_or("n/a").to_owned());
    lines.push(top);

    for line in lines {
        doc.push(line);
    }
}

/// Loads a chart PNG and scales it to the fixed display size.
///
/// The scale is computed against the natural print size genpdf assigns at
/// [`IMAGE_DPI`]; width and height scale independently so the rendered box is
/// exactly 400x300 pt regardless of the source aspect ratio.
fn chart_image(path: &Path) -> Result<impl Element> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to open chart image {}", path.display()))?;
    let (px_width, px_height) = decoded.dimensions();

    let natural_width_mm = MM_PER_INCH * px_width as f64 / IMAGE_DPI;
    let natural_height_mm = MM_PER_INCH * px_height as f64 / IMAGE_DPI;
    let display_width_mm = printpdf::Mm::from(printpdf::Pt(CHART_DISPLAY_WIDTH_PT)).0;
    let display_height_mm = printpdf::Mm::from(printpdf::Pt(CHART_DISPLAY_HEIGHT_PT)).0;
    let scale_x = display_width_mm / natural_width_mm;
    let scale_y = display_height_mm / natural_height_mm;

    let image = Image::from_dynamic_image(decoded)
        .map_err(|err| anyhow!("failed to embed chart image {}: {}", path.display(), err))?
        .with_alignment(Alignment::Center)
        .with_scale(Scale::new(scale_x, scale_y));
    Ok(image)
}

fn cell(text: impl Into<String>, style: Style) -> impl Element {
    Paragraph::new(text.into())
        .aligned(Alignment::Center)
        .styled(style)
        .padded(1)
}

fn region_table(table: &Table) -> Result<TableLayout> {
    let aggregate = RegionAggregate::from_table(table);

    let mut layout = TableLayout::new(vec![1, 1]);
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, true));

    let header = Style::new().bold().with_color(HEADER_TEXT_COLOR);
    layout
        .row()
        .element(cell("Region", header))
        .element(cell("Average Charges ($)", header))
        .push()
        .map_err(|err| anyhow!("failed to lay out table header: {}", err))?;

    for (region, mean) in aggregate.entries() {
        layout
            .row()
            .element(cell(region.clone(), Style::new()))
            .element(cell(stats::format_currency(*mean), Style::new()))
            .push()
            .map_err(|err| anyhow!("failed to lay out table row for {}: {}", region, err))?;
    }

    Ok(layout)
}

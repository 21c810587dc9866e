//! PDF rendering for the project progress report. Fixed section layout:
//! title block, overview table, executive summary with a progress bar and
//! task statistics, timeline analysis with a completion projection, insight
//! bullets, and a footer carrying the generation timestamp and report id.

use chrono::{DateTime, Utc};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::models::project::ProjectDetail;
use crate::report::analytics::{ReportMetrics, ScheduleStatus};

const PAGE_WIDTH: f64 = 215.9; // US letter
const PAGE_HEIGHT: f64 = 279.4;
const MARGIN: f64 = 18.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const BLACK: (f64, f64, f64) = (0.0, 0.0, 0.0);
const DARK_BLUE: (f64, f64, f64) = (0.1, 0.15, 0.45);
const GREY: (f64, f64, f64) = (0.5, 0.5, 0.5);
const GREEN: (f64, f64, f64) = (0.0, 0.55, 0.1);
const RED: (f64, f64, f64) = (0.8, 0.1, 0.1);
const BLUE: (f64, f64, f64) = (0.1, 0.3, 0.8);

/// Attachment filename for the generated report.
pub fn report_filename(title: &str, now: DateTime<Utc>) -> String {
    format!("Project_Report_{}_{}.pdf", title, now.format("%Y%m%d"))
}

/// Render the full report and return the finished document bytes.
pub fn render_report(
    project: &ProjectDetail,
    metrics: &ReportMetrics,
    now: DateTime<Utc>,
) -> Result<Vec<u8>, String> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Project Report - {}", project.project.title),
        Mm(PAGE_WIDTH as _),
        Mm(PAGE_HEIGHT as _),
        "Layer 1",
    );
    let font = |f: BuiltinFont| {
        doc.add_builtin_font(f)
            .map_err(|e| format!("Font load failed: {e}"))
    };
    let regular = font(BuiltinFont::Helvetica)?;
    let bold = font(BuiltinFont::HelveticaBold)?;
    let oblique = font(BuiltinFont::HelveticaOblique)?;

    let mut w = Writer {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        regular,
        bold,
        oblique,
        y: PAGE_HEIGHT - MARGIN,
    };

    render_title_block(&mut w, project, now);
    w.hline();
    render_overview(&mut w, project);
    render_executive_summary(&mut w, metrics);
    w.hline();
    render_timeline(&mut w, metrics);
    w.hline();
    render_insights(&mut w, metrics);
    render_footer(&mut w, project, now);

    doc.save_to_bytes()
        .map_err(|e| format!("PDF serialization failed: {e}"))
}

fn render_title_block(w: &mut Writer, project: &ProjectDetail, now: DateTime<Utc>) {
    w.set_color(BLACK);
    w.text_bold("Project Report", 22.0);
    w.advance(10.0);
    w.set_color(DARK_BLUE);
    w.text_bold(&project.project.title, 16.0);
    w.advance(7.5);
    w.set_color(GREY);
    w.text_oblique(&format!("Generated on {}", now.format("%B %d, %Y")), 11.0);
    w.advance(8.0);
    w.set_color(BLACK);
}

fn render_overview(w: &mut Writer, project: &ProjectDetail) {
    w.heading("Project Overview");

    let description = if project.project.description.is_empty() {
        "No description provided".to_string()
    } else {
        project.project.description.clone()
    };
    let created = project.project.created_at.format("%B %d, %Y").to_string();
    let deadline = project
        .project
        .deadline
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    w.label_row("Organization:", &project.organization_name);
    for (i, line) in wrap(&description, 78).into_iter().enumerate() {
        w.label_row(if i == 0 { "Description:" } else { "" }, &line);
    }
    w.label_row("Created On:", &created);
    w.label_row("Deadline:", &deadline);
    w.advance(8.0);
}

fn render_executive_summary(w: &mut Writer, metrics: &ReportMetrics) {
    w.heading("Executive Summary");

    let counts = &metrics.counts;
    let mut summary = format!(
        "This project has {} defined tasks, of which {} are completed ({:.1}% completion rate). \
         The project is currently {}.",
        counts.total,
        counts.completed,
        metrics.progress,
        metrics.status.label()
    );
    if let Some(t) = &metrics.timeline {
        if t.days_remaining > 0 {
            summary.push_str(&format!(
                " There are {} days remaining until the deadline.",
                t.days_remaining
            ));
        } else {
            summary.push_str(&format!(
                " The project deadline has passed by {} days.",
                t.overdue_days
            ));
        }
    }
    w.paragraph(&summary);
    w.advance(4.0);

    w.set_color(status_color(metrics.status));
    w.text_bold(&format!("Project Status: {}", metrics.status.label()), 13.0);
    w.advance(9.0);
    w.set_color(BLACK);

    w.progress_bar(metrics.progress);
    w.advance(6.0);

    let stats = [
        ("Completed Tasks:", counts.completed, counts.share(counts.completed)),
        ("In Progress Tasks:", counts.in_progress, counts.share(counts.in_progress)),
        ("Todo Tasks:", counts.todo, counts.share(counts.todo)),
    ];
    for (label, n, pct) in stats {
        w.stat_row(label, &n.to_string(), &format!("{pct:.1}%"));
    }
    w.stat_row("Total Tasks:", &counts.total.to_string(), "100%");
    w.advance(8.0);
}

fn render_timeline(w: &mut Writer, metrics: &ReportMetrics) {
    w.heading("Timeline Analysis");

    let Some(t) = &metrics.timeline else {
        w.paragraph("Timeline information is not available. Please set a project deadline.");
        w.advance(8.0);
        return;
    };

    // Table shares are computed over elapsed + remaining, which differs from
    // the planned duration once the deadline has passed.
    let span = t.days_elapsed + t.days_remaining;
    let share = |days: i64| {
        if span > 0 {
            format!("{:.1}%", days as f64 / span as f64 * 100.0)
        } else {
            "0%".to_string()
        }
    };
    w.stat_row(
        "Days Elapsed:",
        &format!("{} days", t.days_elapsed),
        &share(t.days_elapsed),
    );
    w.stat_row(
        "Days Remaining:",
        &format!("{} days", t.days_remaining),
        &share(t.days_remaining),
    );
    w.stat_row("Total Duration:", &format!("{span} days"), "100%");
    w.advance(5.0);

    if t.expected_progress > 0.0 && metrics.progress > 0.0 {
        w.paragraph(&format!(
            "Expected Progress (Time-Based): {:.1}%",
            t.expected_progress
        ));
        w.paragraph(&format!("Actual Progress: {:.1}%", metrics.progress));
        w.advance(3.0);

        if let Some(projection) = &metrics.projection {
            if projection.additional_days > 0 {
                w.paragraph(&format!(
                    "Estimated Completion: Project may require approximately {} additional days \
                     beyond the deadline.",
                    projection.additional_days
                ));
            } else {
                w.paragraph(&format!(
                    "Estimated Completion: Project is on track to complete {} days before the \
                     deadline.",
                    projection.additional_days.abs()
                ));
            }
        }
    }
    w.advance(8.0);
}

fn render_insights(w: &mut Writer, metrics: &ReportMetrics) {
    w.heading("Insights & Recommendations");

    if metrics.insights.is_empty() {
        w.paragraph("No specific insights available for this project.");
    } else {
        for insight in &metrics.insights {
            for (i, line) in wrap(insight, 92).into_iter().enumerate() {
                let text = if i == 0 {
                    format!("\u{2022} {line}")
                } else {
                    format!("   {line}")
                };
                w.ensure_space(5.0);
                w.text(&text, 10.0, MARGIN + 4.0);
                w.advance(5.0);
            }
            w.advance(2.0);
        }
    }
    w.advance(10.0);
}

fn render_footer(w: &mut Writer, project: &ProjectDetail, now: DateTime<Utc>) {
    w.ensure_space(12.0);
    w.set_color(GREY);
    w.text(
        &format!("Report generated on: {}", now.format("%Y-%m-%d %H:%M:%S")),
        8.0,
        MARGIN,
    );
    w.advance(4.0);
    w.text(
        &format!("Report ID: PRJ-{}-{}", project.project.id, now.timestamp()),
        8.0,
        MARGIN,
    );
    w.set_color(BLACK);
}

fn status_color(status: ScheduleStatus) -> (f64, f64, f64) {
    match status {
        ScheduleStatus::OnTrack | ScheduleStatus::Completed => GREEN,
        ScheduleStatus::BehindSchedule | ScheduleStatus::Overdue => RED,
        ScheduleStatus::AheadOfSchedule => BLUE,
    }
}

/// Cursor-based page writer. `y` tracks the baseline in mm from the page
/// bottom; running out of room starts a fresh page.
struct Writer<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    y: f64,
}

impl Writer<'_> {
    fn ensure_space(&mut self, needed: f64) {
        if self.y - needed < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH as _), Mm(PAGE_HEIGHT as _), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn advance(&mut self, dy: f64) {
        self.y -= dy;
    }

    fn set_color(&self, (r, g, b): (f64, f64, f64)) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r as _, g as _, b as _, None)));
    }

    fn text(&self, text: &str, size: f64, x: f64) {
        self.layer
            .use_text(text, size as _, Mm(x as _), Mm(self.y as _), &self.regular);
    }

    fn text_bold(&mut self, text: &str, size: f64) {
        self.ensure_space(size * 0.5);
        self.layer
            .use_text(text, size as _, Mm(MARGIN as _), Mm(self.y as _), &self.bold);
    }

    fn text_oblique(&self, text: &str, size: f64) {
        self.layer.use_text(
            text,
            size as _,
            Mm(MARGIN as _),
            Mm(self.y as _),
            &self.oblique,
        );
    }

    fn heading(&mut self, title: &str) {
        self.ensure_space(14.0);
        self.set_color(DARK_BLUE);
        self.text_bold(title, 14.0);
        self.set_color(BLACK);
        self.advance(8.0);
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, 95) {
            self.ensure_space(5.0);
            self.text(&line, 10.0, MARGIN);
            self.advance(5.0);
        }
    }

    /// Bold label in a fixed left column, value to the right.
    fn label_row(&mut self, label: &str, value: &str) {
        self.ensure_space(6.0);
        if !label.is_empty() {
            self.layer.use_text(
                label,
                10.0,
                Mm(MARGIN as _),
                Mm(self.y as _),
                &self.bold,
            );
        }
        self.text(value, 10.0, MARGIN + 35.0);
        self.advance(6.0);
    }

    /// Three-column statistic row: label, value, percentage.
    fn stat_row(&mut self, label: &str, value: &str, pct: &str) {
        self.ensure_space(6.0);
        self.layer
            .use_text(label, 10.0, Mm(MARGIN as _), Mm(self.y as _), &self.bold);
        self.text(value, 10.0, MARGIN + 50.0);
        self.text(pct, 10.0, MARGIN + 85.0);
        self.advance(6.0);
    }

    /// Horizontal rule across the content width.
    fn hline(&mut self) {
        self.ensure_space(6.0);
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN as _), Mm(self.y as _)), false),
                (
                    Point::new(Mm((MARGIN + CONTENT_WIDTH) as _), Mm(self.y as _)),
                    false,
                ),
            ],
            is_closed: false,
        });
        self.advance(8.0);
    }

    /// Outlined bar with a green fill proportional to `progress`, clamped to
    /// the bar width, with the percentage printed inside.
    fn progress_bar(&mut self, progress: f64) {
        const BAR_HEIGHT: f64 = 8.0;
        self.ensure_space(BAR_HEIGHT + 4.0);

        let top = self.y;
        let bottom = self.y - BAR_HEIGHT;
        let fill_width = (progress / 100.0 * CONTENT_WIDTH).clamp(0.0, CONTENT_WIDTH);

        if fill_width > 0.0 {
            self.set_color(GREEN);
            self.layer.add_polygon(Polygon {
                rings: vec![vec![
                    (Point::new(Mm(MARGIN as _), Mm(bottom as _)), false),
                    (Point::new(Mm((MARGIN + fill_width) as _), Mm(bottom as _)), false),
                    (Point::new(Mm((MARGIN + fill_width) as _), Mm(top as _)), false),
                    (Point::new(Mm(MARGIN as _), Mm(top as _)), false),
                ]],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }

        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(1.0);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN as _), Mm(bottom as _)), false),
                (
                    Point::new(Mm((MARGIN + CONTENT_WIDTH) as _), Mm(bottom as _)),
                    false,
                ),
                (
                    Point::new(Mm((MARGIN + CONTENT_WIDTH) as _), Mm(top as _)),
                    false,
                ),
                (Point::new(Mm(MARGIN as _), Mm(top as _)), false),
            ],
            is_closed: true,
        });

        self.set_color(if progress > 50.0 { (1.0, 1.0, 1.0) } else { BLACK });
        self.layer.use_text(
            format!("{progress:.1}% Complete"),
            9.0,
            Mm((MARGIN + CONTENT_WIDTH / 2.0 - 14.0) as _),
            Mm((bottom + 2.5) as _),
            &self.bold,
        );
        self.set_color(BLACK);
        self.y = bottom;
    }
}

/// Greedy word wrap by character count. Builtin fonts carry no metrics, so a
/// character budget sized for 10pt Helvetica stands in for real measurement.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

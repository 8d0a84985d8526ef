// Inspector panel
//
// Shows where the playback is (step, date), how magnitudes are being
// encoded (scaling method, threshold boundaries) and the popup text of the
// selected location.

use crate::app::{AppState, Session};
use crate::render::ThresholdSet;
use crate::scaling::{MagnitudeKind, ScalingTool};
use crate::theme::{ACCENT_BLUE, ACTIVE_GREEN, TEXT_GREY};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

// ============================================================================
// Inspector View Model
// ============================================================================

/// Everything the inspector shows, extracted from AppState
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorView {
    pub simulation: String,
    pub description: Option<String>,
    /// "step / last step"
    pub step_text: String,
    pub date_text: Option<String>,
    pub scaling_text: String,
    /// Fitted logistic curves, empty for the other methods
    pub curves: Vec<String>,
    pub radius_text: String,
    /// Active heatmap view with its raw bounds
    pub heatmap_text: Option<String>,
    pub threshold_mode: String,
    /// Bucket legend rows for locations and links
    pub location_legend: Vec<(String, Color)>,
    pub link_legend: Vec<(String, Color)>,
    /// Popup text lines of the selected location
    pub selection: Vec<String>,
}

impl Default for InspectorView {
    fn default() -> Self {
        Self {
            simulation: "No simulation".to_string(),
            description: None,
            step_text: "-".to_string(),
            date_text: None,
            scaling_text: "-".to_string(),
            curves: Vec::new(),
            radius_text: "-".to_string(),
            heatmap_text: None,
            threshold_mode: "-".to_string(),
            location_legend: Vec::new(),
            link_legend: Vec::new(),
            selection: Vec::new(),
        }
    }
}

/// Legend rows for one threshold set, highest bucket first
fn legend(set: &ThresholdSet, colors: [Color; 3]) -> Vec<(String, Color)> {
    if set.is_degenerate() {
        return vec![("no data, all low".to_string(), colors[0])];
    }
    let [low, mid, high] = colors;
    vec![
        (format!("high  > {:.2} (max {:.2})", set.final_threshold, set.max), high),
        (format!("mid   > {:.2}", set.middle_threshold), mid),
        (format!("low  <= {:.2}", set.middle_threshold), low),
    ]
}

fn kind_label(kind: MagnitudeKind) -> &'static str {
    match kind {
        MagnitudeKind::Location => "location",
        MagnitudeKind::Link => "link",
        MagnitudeKind::Difference => "change",
    }
}

fn curve_rows(scaling: &ScalingTool) -> Vec<String> {
    let ScalingTool::LogisticGrowth(growth) = scaling else {
        return Vec::new();
    };
    let mut rows: Vec<String> = MagnitudeKind::ALL
        .iter()
        .map(|&kind| {
            let p = growth.params(kind);
            format!(
                "{:<8} K {:.1}  r {:.4}  x0 {:.1}",
                kind_label(kind),
                p.ceiling,
                p.growth_rate,
                p.mid_point
            )
        })
        .collect();
    rows.push(format!("midpoint deviation {:.1}", growth.mid_point_deviation()));
    rows
}

/// Popup text of the selected location plus its change since the last step
fn selection_rows(app: &AppState, session: &Session) -> Vec<String> {
    let (Some(index), Some(location)) = (app.selected_location, app.selected()) else {
        return Vec::new();
    };
    let mut rows: Vec<String> = location.popup_text().lines().map(str::to_string).collect();

    let previous = session
        .dataset()
        .timeline
        .previous_snapshot()
        .locations
        .get(index)
        .map_or(0, |l| l.refugees);
    rows.push(format!("Previous: {}", previous));
    rows.push(format!(
        "Change: {:+} ({:.2} scaled)",
        location.difference,
        session
            .scaling()
            .scale_difference(location.difference.unsigned_abs())
    ));
    rows
}

pub fn build_inspector_view(app: &AppState) -> InspectorView {
    let Some(session) = &app.session else {
        return InspectorView::default();
    };
    let dataset = session.dataset();
    let thresholds = session.thresholds();
    let palette = &app.palette;

    InspectorView {
        simulation: dataset.meta.name.clone().unwrap_or_else(|| dataset.name.clone()),
        description: dataset.meta.description.clone(),
        step_text: format!("{} / {}", session.current_step(), session.end_step()),
        date_text: app.current_date().map(|d| d.format("%Y-%m-%d").to_string()),
        scaling_text: format!(
            "{} ({})",
            session.scaling().describe(),
            session.scaling().kind().name()
        ),
        curves: curve_rows(session.scaling()),
        radius_text: format!("{:.3} px per unit", session.radius_multiplier()),
        heatmap_text: app.layers.heatmap.map(|view| {
            let (max, min) = session.heatmap(view).bounds();
            format!("{} ({} - {})", view.label(), min, max)
        }),
        threshold_mode: session.threshold_mode().label().to_string(),
        location_legend: legend(
            &thresholds.locations,
            [
                palette.circle_low.color,
                palette.circle_mid.color,
                palette.circle_high.color,
            ],
        ),
        link_legend: legend(
            &thresholds.links,
            [
                palette.link_low.color,
                palette.link_mid.color,
                palette.link_high.color,
            ],
        ),
        selection: selection_rows(app, session),
    }
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(TEXT_GREY))
}

fn legend_lines(title: &'static str, rows: &[(String, Color)]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
    ))];
    for (text, color) in rows {
        lines.push(Line::from(vec![
            Span::styled(" ● ", Style::default().fg(*color)),
            Span::styled(text.clone(), Style::default().fg(TEXT_GREY)),
        ]));
    }
    lines
}

pub fn render_inspector(f: &mut Frame, area: Rect, app: &AppState) {
    let view = build_inspector_view(app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            view.simulation.clone(),
            Style::default().fg(ACTIVE_GREEN).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(description) = &view.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(TEXT_GREY).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(vec![label("Step: "), Span::raw(view.step_text.clone())]));
    if let Some(date) = &view.date_text {
        lines.push(Line::from(vec![label("Date: "), Span::raw(date.clone())]));
    }
    lines.push(Line::from(vec![
        label("Scaling: "),
        Span::raw(view.scaling_text.clone()),
    ]));
    for curve in &view.curves {
        lines.push(Line::from(Span::styled(
            format!("  {}", curve),
            Style::default().fg(TEXT_GREY),
        )));
    }
    lines.push(Line::from(vec![
        label("Radius: "),
        Span::raw(view.radius_text.clone()),
    ]));
    if let Some(heatmap) = &view.heatmap_text {
        lines.push(Line::from(vec![label("Heatmap: "), Span::raw(heatmap.clone())]));
    }
    lines.push(Line::from(vec![
        label("Thresholds: "),
        Span::raw(view.threshold_mode.clone()),
    ]));
    lines.push(Line::default());
    lines.extend(legend_lines("Locations", &view.location_legend));
    lines.extend(legend_lines("Routes", &view.link_legend));

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Simulation ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        );
    f.render_widget(summary, chunks[0]);

    let selection: Vec<Line> = if view.selection.is_empty() {
        vec![Line::from(Span::styled(
            "↑↓ to select a location",
            Style::default().fg(TEXT_GREY).add_modifier(Modifier::ITALIC),
        ))]
    } else {
        view.selection.iter().map(|l| Line::from(l.clone())).collect()
    };
    let selection = Paragraph::new(selection).block(
        Block::default()
            .title(" Location ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT_BLUE)),
    );
    f.render_widget(selection, chunks[1]);
}

//! Ratatui-based terminal UI.
//!
//! The TUI is the loan application form: eleven fields on the left, the
//! verdict and income/loan overview on the right. Prediction and exports run
//! through the same pipeline as `loan predict`.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::Outcome;
use crate::config::AppConfig;
use crate::domain::{ApplicantRecord, FeatureColumn, format_number};
use crate::encode::{Categorical, display_fields};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::io::Artifacts;

mod plotters_chart;

use plotters_chart::OverviewBarChart;

/// Start the TUI.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let artifacts = Artifacts::load(&config.artifacts);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, artifacts);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: AppConfig,
    artifacts: Artifacts,
    record: ApplicantRecord,
    selected_field: usize,
    editing: bool,
    input: String,
    show_chart: bool,
    status: String,
    outcome: Option<Outcome>,
}

impl App {
    fn new(config: AppConfig, artifacts: Artifacts) -> Self {
        let status = if artifacts.model_ready() {
            "Fill in the form and press p to predict.".to_string()
        } else {
            "Model not loaded: prediction is disabled.".to_string()
        };
        // The form default is in months; start from a term the loaded model accepts.
        let mut record = ApplicantRecord::default();
        let policy = artifacts.encoder.loan_term();
        if let Some(&first) = policy.choices().first() {
            if !policy.accepts(record.loan_term) {
                record.loan_term = first;
            }
        }
        Self {
            config,
            artifacts,
            record,
            selected_field: 0,
            editing: false,
            input: String::new(),
            show_chart: true,
            status,
            outcome: None,
        }
    }

    fn selected_column(&self) -> FeatureColumn {
        FeatureColumn::ALL[self.selected_field]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FeatureColumn::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => self.begin_edit(),
            KeyCode::Char('p') => self.predict(),
            KeyCode::Char('c') => self.export_csv(),
            KeyCode::Char('e') => self.export_pdf(),
            KeyCode::Char('v') => {
                self.show_chart = !self.show_chart;
                self.status = if self.show_chart {
                    "Visualization on.".to_string()
                } else {
                    "Visualization off.".to_string()
                };
            }
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.apply_input();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || (c == '.' && !self.input.contains('.')) {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        let column = self.selected_column();
        let free_term = column == FeatureColumn::LoanAmountTerm && self.artifacts.encoder.loan_term().choices().is_empty();
        if !column.is_numeric() || (column == FeatureColumn::LoanAmountTerm && !free_term) {
            self.status = format!("{}: use Left/Right to choose.", column.display_name());
            return;
        }

        self.input = format_number(self.numeric_value(column));
        self.editing = true;
        self.status = format!("Editing {}. Enter to apply, Esc to cancel.", column.display_name());
    }

    fn apply_input(&mut self) {
        let column = self.selected_column();
        let trimmed = self.input.trim();
        let value = match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                self.status = format!("Invalid number '{trimmed}' for {}.", column.display_name());
                return;
            }
        };
        self.set_numeric(column, value);
        self.status = format!("{}: {}", column.display_name(), format_number(value));
    }

    fn numeric_value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::ApplicantIncome => self.record.applicant_income,
            FeatureColumn::CoapplicantIncome => self.record.coapplicant_income,
            FeatureColumn::LoanAmount => self.record.loan_amount,
            FeatureColumn::LoanAmountTerm => self.record.loan_term,
            _ => 0.0,
        }
    }

    fn set_numeric(&mut self, column: FeatureColumn, value: f64) {
        match column {
            FeatureColumn::ApplicantIncome => self.record.applicant_income = value,
            FeatureColumn::CoapplicantIncome => self.record.coapplicant_income = value,
            FeatureColumn::LoanAmount => self.record.loan_amount = value,
            FeatureColumn::LoanAmountTerm => self.record.loan_term = value,
            _ => return,
        }
        self.record_changed();
    }

    fn adjust_field(&mut self, delta: i32) {
        let column = self.selected_column();
        let r = &mut self.record;
        match column {
            FeatureColumn::Gender => r.gender = step(r.gender, delta),
            FeatureColumn::Married => r.married = step(r.married, delta),
            FeatureColumn::Dependents => r.dependents = step(r.dependents, delta),
            FeatureColumn::Education => r.education = step(r.education, delta),
            FeatureColumn::SelfEmployed => r.self_employed = step(r.self_employed, delta),
            FeatureColumn::CreditHistory => r.credit_history = step(r.credit_history, delta),
            FeatureColumn::PropertyArea => r.property_area = step(r.property_area, delta),
            FeatureColumn::ApplicantIncome | FeatureColumn::CoapplicantIncome => {
                let v = self.numeric_value(column) + 100.0 * delta as f64;
                self.set_numeric(column, v.max(0.0));
            }
            FeatureColumn::LoanAmount => {
                let v = self.numeric_value(column) + 10.0 * delta as f64;
                self.set_numeric(column, v.max(0.0));
            }
            FeatureColumn::LoanAmountTerm => {
                let choices = self.artifacts.encoder.loan_term().choices();
                if choices.is_empty() {
                    self.status = "Loan term: press Enter to type a value.".to_string();
                    return;
                }
                let len = choices.len() as i32;
                let next = match choices.iter().position(|&t| t == self.record.loan_term) {
                    Some(idx) => (idx as i32 + delta).rem_euclid(len),
                    None if delta >= 0 => 0,
                    None => len - 1,
                };
                let term = choices[next as usize];
                self.set_numeric(column, term);
            }
        }
        self.record_changed();
        if let Some((_, value)) = display_fields(&self.record).into_iter().find(|(c, _)| *c == column) {
            self.status = format!("{}: {value}", column.display_name());
        }
    }

    /// A changed form invalidates the last verdict.
    fn record_changed(&mut self) {
        self.outcome = None;
    }

    fn predict(&mut self) {
        if !self.artifacts.model_ready() {
            self.status = "Model is not loaded. Add the model artifact and restart.".to_string();
            return;
        }
        match self.artifacts.pipeline().run(&self.record) {
            Ok(outcome) => {
                info!(decision = ?outcome.decision, "prediction");
                self.status = outcome.decision.headline().to_string();
                self.outcome = Some(outcome);
            }
            Err(err) => {
                warn!(error = %err, "prediction failed");
                self.status = format!("Error during prediction: {err}");
                self.outcome = None;
            }
        }
    }

    fn export_csv(&mut self) {
        let at = chrono::Local::now().naive_local();
        self.status = match crate::io::write_record_csv(&self.config.export_dir, &self.record, at) {
            Ok(path) => format!("Wrote {}", path.display()),
            Err(err) => format!("CSV export failed: {err}"),
        };
    }

    fn export_pdf(&mut self) {
        let Some(outcome) = &self.outcome else {
            self.status = "Run a prediction (p) before exporting the PDF report.".to_string();
            return;
        };
        self.status = match crate::io::write_report_pdf(&self.config.export_dir, outcome) {
            Ok(path) => format!("Wrote {}", path.display()),
            Err(err) => format!("PDF export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("loan", Style::default().fg(Color::Cyan)),
            Span::raw(" | Loan approval screen"),
        ]));

        let model = if self.artifacts.model_ready() {
            self.config.artifacts.model.display().to_string()
        } else {
            "not loaded".to_string()
        };
        let scaler = self
            .artifacts
            .scaler
            .as_ref()
            .map(|s| format!("{} columns", s.columns().len()))
            .unwrap_or_else(|| "none".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "model: {model} | scaler: {scaler} | loan term: {} ({})",
                self.artifacts.encoder.loan_term().describe_allowed(),
                self.artifacts.encoder.loan_term().unit,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(first) = self.artifacts.warnings.first() {
            let more = self.artifacts.warnings.len() - 1;
            let text = if more > 0 {
                format!("Warning: {first} (+{more} more in the log)")
            } else {
                format!("Warning: {first}")
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(Color::Yellow))));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, chunks[0]);

        let right = if self.show_chart {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(8), Constraint::Min(0)])
                .split(chunks[1])
        } else {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0)])
                .split(chunks[1])
        };

        self.draw_outcome(frame, right[0]);
        if self.show_chart {
            self.draw_chart(frame, right[1]);
        }
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let selected = self.selected_column();
        let items: Vec<ListItem> = display_fields(&self.record)
            .into_iter()
            .map(|(column, value)| {
                let value = if self.editing && column == selected {
                    format!("{}_", self.input)
                } else {
                    value
                };
                ListItem::new(format!("{:<20} {value}", column.display_name()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Applicant").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new("Editing...")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_outcome(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction").borders(Borders::ALL);

        let mut lines: Vec<Line> = Vec::new();
        match &self.outcome {
            Some(outcome) => {
                let color = if outcome.decision.is_approved() {
                    Color::Green
                } else {
                    Color::Red
                };
                lines.push(Line::from(Span::styled(
                    outcome.decision.headline(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
                let mut detail = format!("Model output: {}", outcome.verdict);
                if let Some(p) = outcome.approval_probability {
                    detail.push_str(&format!(" | Approval probability: {:.1}%", p * 100.0));
                }
                lines.push(Line::from(detail));
            }
            None if !self.artifacts.model_ready() => {
                lines.push(Line::from(Span::styled(
                    "Prediction disabled (model not loaded).",
                    Style::default().fg(Color::Yellow),
                )));
            }
            None => lines.push(Line::from("Press p to predict.")),
        }

        lines.push(Line::from(Span::styled(
            crate::report::format_kpis(&self.record).trim_end().to_string(),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(crate::plot::OVERVIEW_TITLE)
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let bars = self.record.financial_figures();
        let widget = OverviewBarChart {
            bars: &bars,
            y_label: "amount",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.artifacts.model_ready() {
            "↑/↓ select  ←/→ change  Enter edit  p predict  c csv  e pdf  v chart  q quit"
        } else {
            "↑/↓ select  ←/→ change  Enter edit  c csv  v chart  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn step<T: Categorical>(value: T, delta: i32) -> T {
    if delta >= 0 { value.next() } else { value.prev() }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{Gender, PropertyArea};
    use crate::io::ArtifactPaths;
    use crate::models::{LogisticArtifact, LogisticModel};

    fn config() -> AppConfig {
        AppConfig {
            artifacts: ArtifactPaths {
                model: PathBuf::from("model.json"),
                scaler: None,
            },
            export_dir: std::env::temp_dir(),
            log_level: None,
            log_file: PathBuf::from("loan.log"),
        }
    }

    fn app() -> App {
        App::new(config(), Artifacts::default())
    }

    /// A model trained with the term in days.
    fn days_model_app() -> App {
        let names: Vec<&str> = FeatureColumn::ALL.iter().map(|c| c.name()).collect();
        let artifact: LogisticArtifact = serde_json::from_value(serde_json::json!({
            "feature_names": names,
            "coefficients": vec![0.1; 11],
            "intercept": -1.0,
            "loan_term": { "unit": "days", "allowed": [10950.0, 5475.0, 3650.0] },
        }))
        .unwrap();
        let (model, encoder) = LogisticModel::from_artifact(artifact).unwrap();
        let artifacts = Artifacts {
            model: Some(model),
            encoder,
            ..Artifacts::default()
        };
        App::new(config(), artifacts)
    }

    #[test]
    fn arrows_cycle_categories() {
        let mut app = app();
        app.handle_key(KeyCode::Right);
        assert_eq!(app.record.gender, Gender::Female);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.record.gender, Gender::Male);

        app.selected_field = FeatureColumn::ALL.len() - 1;
        app.handle_key(KeyCode::Left);
        assert_eq!(app.record.property_area, PropertyArea::Semiurban);
    }

    #[test]
    fn loan_term_cycles_through_allowed_values() {
        let mut app = app();
        app.selected_field = 8;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.record.loan_term, 180.0);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.record.loan_term, 60.0);
    }

    #[test]
    fn days_model_starts_on_an_accepted_term() {
        let mut app = days_model_app();
        assert_eq!(app.record.loan_term, 10950.0);

        assert!(!app.handle_key(KeyCode::Char('p')));
        assert!(app.outcome.is_some(), "{}", app.status);

        app.selected_field = 8;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.record.loan_term, 5475.0);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.record.loan_term, 3650.0);
    }

    #[test]
    fn unlisted_term_steps_to_the_ends_of_the_list() {
        let mut app = days_model_app();
        app.selected_field = 8;

        app.record.loan_term = 360.0;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.record.loan_term, 10950.0);

        app.record.loan_term = 360.0;
        app.handle_key(KeyCode::Left);
        assert_eq!(app.record.loan_term, 3650.0);
    }

    #[test]
    fn enter_edits_numeric_fields() {
        let mut app = app();
        app.selected_field = 5;
        app.handle_key(KeyCode::Enter);
        assert!(app.editing);
        app.handle_key(KeyCode::Backspace);
        for c in "4500.5".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing);
        assert_eq!(app.record.applicant_income, 4500.5);
    }

    #[test]
    fn prediction_disabled_without_model() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('p')));
        assert!(app.outcome.is_none());
        assert!(app.status.contains("Model is not loaded"));
    }

    #[test]
    fn pdf_requires_prediction() {
        let mut app = app();
        app.handle_key(KeyCode::Char('e'));
        assert!(app.status.contains("Run a prediction"));
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}

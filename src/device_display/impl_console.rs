use crate::device_display::interface::DeviceDisplay;
use crate::prediction::rows::DisplayRow;
use crate::session::view::{ImagePanel, View};
use std::error::Error;
use std::io::Write;

const BAR_WIDTH: usize = 20;

/// Prints the view to stdout, skipping renders that change nothing visible.
pub struct DeviceDisplayConsole {
    last: Option<View>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_bar(row: &DisplayRow) -> String {
    let filled = ((row.fill * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    let marker = if row.emphasized { '*' } else { ' ' };
    format!(
        "{}{:<12} [{}{}] {:>6}",
        marker,
        row.label,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        row.percent_text
    )
}

pub fn format_view(view: &View) -> Vec<String> {
    let mut lines = vec![format!(
        "== {} | theme: {} ({}) ==",
        view.model_status,
        view.theme.as_str(),
        view.theme_button
    )];

    if let Some(notice) = &view.notice {
        lines.push(format!("! {}", notice));
    }

    match &view.still.image {
        ImagePanel::Placeholder => lines.push("image: drop an image with `open <path>`".to_string()),
        ImagePanel::Loading { name } => lines.push(format!("image: loading {}...", name)),
        ImagePanel::Preview {
            name,
            width,
            height,
            ..
        } => lines.push(format!("image: {} ({}x{})", name, width, height)),
    }
    if let Some((button, _)) = &view.still.button {
        let state = if button.enabled { "" } else { " (disabled)" };
        lines.push(format!("  [{}]{}", button.text, state));
    }
    if let Some(summary) = &view.still.summary {
        lines.push(format!("  {}", summary.headline));
    }
    lines.extend(view.still.rows.iter().map(|row| format!("  {}", format_bar(row))));

    lines.push(format!(
        "camera: {} ({} frames) [{}]",
        view.stream.status, view.stream.frames_rendered, view.stream.button.text
    ));
    if view.stream.capturing {
        if let Some(summary) = &view.stream.summary {
            lines.push(format!("  {}", summary.headline));
        }
        lines.extend(view.stream.rows.iter().map(|row| format!("  {}", format_bar(row))));
    }

    if !view.sample.numbers.is_empty() || view.sample.hidden > 0 {
        let numbers: Vec<String> = view.sample.numbers.iter().map(|n| format!("{:>2}", n)).collect();
        let hidden = vec![" ?".to_string(); view.sample.hidden];
        lines.push(format!("numbers: {}", [numbers, hidden].concat().join(" ")));
    }

    lines
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last.as_ref() == Some(view) {
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        for line in format_view(view) {
            writeln!(stdout, "{}", line)?;
        }
        writeln!(stdout)?;
        stdout.flush()?;

        self.last = Some(view.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::label_metadata::Accent;

    fn row(label: &str, fill: f32, emphasized: bool) -> DisplayRow {
        DisplayRow {
            label: label.to_string(),
            raw_label: label.to_string(),
            fill,
            percent_text: format!("{:.1}%", fill * 100.0),
            emphasized,
            accent: Accent::Muted,
        }
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(
            format_bar(&row("Dog", 0.5, true)),
            "*Dog          [##########..........]  50.0%"
        );
        assert_eq!(
            format_bar(&row("Cat", 0.0, false)),
            " Cat          [....................]   0.0%"
        );
    }
}

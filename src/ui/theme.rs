use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub nominal: Color,
    pub warning: Color,
    pub severe: Color,
    pub chrome: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            nominal: Color::Green,
            warning: Color::Yellow,
            severe: Color::Red,
            chrome: Color::Cyan,
        }
    }
}

impl Theme {
    /// Severity style for bar fills: >80 severe, >50 warning, else nominal.
    pub fn bar_style(&self, percent: f64) -> Style {
        let color = if percent > 80.0 {
            self.severe
        } else if percent > 50.0 {
            self.warning
        } else {
            self.nominal
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Process rows run hotter thresholds than bars: >50 severe, >10 warning.
    pub fn row_style(&self, cpu_percent: f64) -> Style {
        if cpu_percent > 50.0 {
            Style::default()
                .fg(self.severe)
                .add_modifier(Modifier::BOLD)
        } else if cpu_percent > 10.0 {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.nominal)
        }
    }

    pub fn chrome(&self) -> Style {
        Style::default().fg(self.chrome)
    }

    pub fn chrome_bold(&self) -> Style {
        self.chrome().add_modifier(Modifier::BOLD)
    }

    pub fn advisory(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

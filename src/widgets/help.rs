use ratatui::{
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

const HELP_TEXT: &str = r#"livewatch - live monitoring dashboard

Global:
    q, Q          Quit
    ?             Toggle this help
    n             Open notifications (or click the bell)
    c             Toggle the feed flag (manual mode only)

The header badge reads LIVE FEED while the feed is reachable and
DISCONNECTED otherwise, including before the first probe answers.

Press any key to close this help"#;

/// Help overlay. Clears whatever is underneath before drawing.
pub struct Help;

impl Help {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Help {
    fn render(self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(crate::palette::yellow()))
            .style(Style::default().bg(crate::palette::black()));

        let paragraph = Paragraph::new(HELP_TEXT)
            .block(block)
            .wrap(Wrap { trim: false });
        Clear.render(area, buf);
        paragraph.render(area, buf);
    }
}

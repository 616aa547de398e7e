use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::keyboard::KeyCap;
use crate::layout::{self, MIN_HEIGHT, MIN_WIDTH};
use crate::text_buffer::display_char;

pub const TITLE: &str = "YOUR VIRTUAL KEYBOARD";

const BG_COLOR: Color = Color::Rgb(20, 20, 20);
const KEY_COLOR: Color = Color::Rgb(40, 40, 40);
pub const KEY_PRESSED_COLOR: Color = Color::Rgb(80, 80, 80);
const GLOW_COLOR: Color = Color::Rgb(150, 150, 255);
const TEXT_COLOR: Color = Color::Rgb(220, 220, 220);
const KEY_TEXT_COLOR: Color = Color::Rgb(240, 240, 240);
const TEXT_AREA_COLOR: Color = Color::Rgb(30, 30, 30);
const WPM_BOX_COLOR: Color = Color::Rgb(50, 50, 70);
const WPM_COLOR: Color = Color::Rgb(180, 180, 255);
const CLOSE_COLOR: Color = Color::Rgb(200, 50, 50);

/// Draw order: background, title chrome, keys, WPM counter, text, cursor.
impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        Block::default()
            .style(Style::default().bg(BG_COLOR))
            .render(area, buf);

        if !layout::fits(area) {
            Paragraph::new(Span::styled(
                format!("terminal too small, need {MIN_WIDTH}x{MIN_HEIGHT}"),
                bold_style.fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
            return;
        }

        let layout = self.layout();
        // the layout may lag a resize by one frame
        let clip = |rect: Rect| rect.intersection(area);

        Paragraph::new(Span::styled(TITLE, bold_style.fg(Color::White)))
            .alignment(Alignment::Center)
            .render(clip(layout.title), buf);

        Paragraph::new(Span::styled(
            "X",
            bold_style.fg(Color::White).bg(CLOSE_COLOR),
        ))
        .alignment(Alignment::Center)
        .style(Style::default().bg(CLOSE_COLOR))
        .render(clip(layout.close_button), buf);

        for cap in self.keyboard.caps() {
            let rect = clip(cap.rect);
            if !rect.is_empty() {
                render_key(cap, rect, buf);
            }
        }

        let wpm_rect = clip(layout.wpm_counter);
        if !wpm_rect.is_empty() {
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(WPM_BOX_COLOR))
                .style(Style::default().bg(WPM_BOX_COLOR));
            let inner = block.inner(wpm_rect);
            block.render(wpm_rect, buf);
            Paragraph::new(Span::styled(
                format!("{} WPM", self.wpm.estimate()),
                bold_style.fg(WPM_COLOR),
            ))
            .alignment(Alignment::Center)
            .render(inner, buf);
        }

        let strip = clip(layout.text_strip);
        if !strip.is_empty() {
            let block = Block::bordered()
                .border_style(Style::default().fg(KEY_COLOR))
                .style(Style::default().bg(TEXT_AREA_COLOR));
            let inner = block.inner(strip);
            block.render(strip, buf);
            render_text(self, inner, buf);
        }
    }
}

fn render_key(cap: &KeyCap, rect: Rect, buf: &mut Buffer) {
    let fill = if cap.pressed {
        KEY_PRESSED_COLOR
    } else {
        KEY_COLOR
    };

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(GLOW_COLOR))
        .style(Style::default().bg(fill));
    let inner = block.inner(rect);
    block.render(rect, buf);

    Paragraph::new(Span::styled(
        cap.label.as_str(),
        Style::default()
            .fg(KEY_TEXT_COLOR)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(inner, buf);
}

/// One row of text shifted by the scroll offset, clipped to `viewport`.
fn render_text(app: &App, viewport: Rect, buf: &mut Buffer) {
    if viewport.is_empty() {
        return;
    }

    let left = i32::from(viewport.x);
    let right = i32::from(viewport.right());
    let y = viewport.y;
    let text_start = left + app.scroll.margin().round() as i32 + app.scroll.offset().round() as i32;

    let text_style = Style::default().fg(TEXT_COLOR).bg(TEXT_AREA_COLOR);
    let newline_style = text_style.add_modifier(Modifier::DIM);

    let mut x = text_start;
    for &c in app.buffer.chars() {
        let glyph = display_char(c);
        let width = glyph.width().unwrap_or(0) as i32;
        if x >= left && x + width <= right {
            if let Some(cell) = buf.cell_mut((x as u16, y)) {
                cell.set_char(glyph)
                    .set_style(if c == '\n' { newline_style } else { text_style });
            }
        }
        x += width;
    }

    if app.blink.is_visible() {
        let cursor = text_start + app.buffer.width_before_cursor() as i32;
        if cursor >= left && cursor < right {
            if let Some(cell) = buf.cell_mut((cursor as u16, y)) {
                cell.set_style(Style::default().fg(TEXT_AREA_COLOR).bg(TEXT_COLOR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::keymap::KeyToken;
    use crate::sound::Silent;

    fn rendered(app: &App, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    fn all_text(buf: &Buffer) -> String {
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    fn app_for(area: Rect) -> App {
        App::new(&Config::default(), Box::new(Silent), area, 0)
    }

    #[test]
    fn test_renders_chrome_keys_and_counter() {
        let area = Rect::new(0, 0, 80, 24);
        let app = app_for(area);
        let buf = rendered(&app, area);
        let content = all_text(&buf);

        assert!(row_text(&buf, 0).contains(TITLE));
        assert!(content.contains("0 WPM"));
        assert!(content.contains("Space"));
        assert!(content.contains("Back"));
        assert!(content.contains("Enter"));
        for c in 'A'..='Z' {
            assert!(content.contains(c), "missing key {c}");
        }
    }

    #[test]
    fn test_typed_text_appears_in_strip() {
        let area = Rect::new(0, 0, 80, 24);
        let mut app = app_for(area);
        for c in "hi there".chars() {
            let token = if c == ' ' {
                KeyToken::Space
            } else {
                KeyToken::Letter(c)
            };
            app.key_down(token, 0);
        }
        app.key_down(KeyToken::Enter, 0);
        app.on_frame(1);

        let buf = rendered(&app, area);
        let viewport = app.layout().text_viewport();
        let line = row_text(&buf, viewport.y);
        assert!(line.contains("hi there↵"), "text strip was {line:?}");
    }

    #[test]
    fn test_pressed_key_is_highlighted() {
        let area = Rect::new(0, 0, 80, 24);
        let mut app = app_for(area);
        app.key_down(KeyToken::Letter('g'), 0);

        let buf = rendered(&app, area);
        let g = app.keyboard.get(KeyToken::Letter('g')).unwrap().rect;
        let h = app.keyboard.get(KeyToken::Letter('h')).unwrap().rect;
        assert_eq!(buf.cell((g.x + 1, g.y + 1)).unwrap().bg, KEY_PRESSED_COLOR);
        assert_eq!(buf.cell((h.x + 1, h.y + 1)).unwrap().bg, KEY_COLOR);
    }

    #[test]
    fn test_cursor_cell_is_inverted() {
        let area = Rect::new(0, 0, 80, 24);
        let mut app = app_for(area);
        app.key_down(KeyToken::Letter('a'), 0);
        app.on_frame(1);

        let buf = rendered(&app, area);
        let viewport = app.layout().text_viewport();
        // margin of 2, then "a", then the cursor
        let cursor = buf.cell((viewport.x + 3, viewport.y)).unwrap();
        assert_eq!(cursor.bg, TEXT_COLOR);
    }

    #[test]
    fn test_hidden_cursor_is_not_drawn() {
        let area = Rect::new(0, 0, 80, 24);
        let config = Config {
            cursor_blink: true,
            blink_period_frames: 1,
            ..Config::default()
        };
        let mut app = App::new(&config, Box::new(Silent), area, 0);
        app.on_frame(1);
        assert!(!app.blink.is_visible());

        let buf = rendered(&app, area);
        let viewport = app.layout().text_viewport();
        let cell = buf.cell((viewport.x + 2, viewport.y)).unwrap();
        assert_eq!(cell.bg, TEXT_AREA_COLOR);
    }

    #[test]
    fn test_scrolled_text_is_clipped() {
        let area = Rect::new(0, 0, 80, 24);
        let mut app = app_for(area);
        for _ in 0..150 {
            app.key_down(KeyToken::Letter('x'), 0);
        }
        app.key_down(KeyToken::Letter('y'), 0);
        app.on_frame(1);

        let buf = rendered(&app, area);
        let viewport = app.layout().text_viewport();
        let line = row_text(&buf, viewport.y);
        // the end of the text is in view, the border is untouched
        assert!(line.contains("xy"));
        assert!(line.starts_with('│'));
        assert!(line.ends_with('│'));
    }

    #[test]
    fn test_small_terminal_shows_notice() {
        let area = Rect::new(0, 0, 30, 8);
        let app = app_for(area);
        let buf = rendered(&app, area);
        assert!(all_text(&buf).contains("too small"));
    }

    #[test]
    fn test_minimum_size_draws_keyboard() {
        let area = Rect::new(0, 0, MIN_WIDTH, MIN_HEIGHT);
        let app = app_for(area);
        let content = all_text(&rendered(&app, area));
        assert!(!content.contains("too small"));
        assert!(content.contains("Space"));
    }

    #[test]
    fn test_stale_layout_after_shrink_does_not_panic() {
        let app = app_for(Rect::new(0, 0, 120, 40));
        let area = Rect::new(0, 0, 70, 20);
        let buf = rendered(&app, area);
        assert!(row_text(&buf, 0).contains(TITLE));
    }
}

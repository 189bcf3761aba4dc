use std::io::Write;

use lectern_core::{
    render::{PortraitId, Presenter, Rgb},
    text_policy::{ParagraphText, SpeakerName},
};
use log::{debug, warn};

/// Terminal presenter: the body is appended in place while it grows, and a
/// new line starts whenever the window shows a different paragraph.
pub(super) struct ConsolePresenter<W: Write> {
    out: W,
    title: Option<(SpeakerName, Rgb)>,
    shown: ParagraphText,
    write_failed: bool,
}

impl<W: Write> ConsolePresenter<W> {
    pub(super) fn new(out: W) -> Self {
        Self {
            out,
            title: None,
            shown: ParagraphText::new(),
            write_failed: false,
        }
    }

    /// Terminates the current line, if any.
    pub(super) fn finish(&mut self) {
        if !self.shown.is_empty() {
            self.shown.clear();
            self.write_line_break();
        }
        self.flush();
    }

    fn write_line_break(&mut self) {
        let result = writeln!(self.out);
        self.note(result);
    }

    fn write_prefix(&mut self) {
        let result = match &self.title {
            Some((name, color)) => write!(
                self.out,
                "\x1b[38;2;{};{};{}m{}\x1b[0m: ",
                color.r, color.g, color.b, name
            ),
            None => Ok(()),
        };
        self.note(result);
    }

    fn write_text(&mut self, text: &str) {
        let result = self.out.write_all(text.as_bytes());
        self.note(result);
    }

    fn flush(&mut self) {
        let result = self.out.flush();
        self.note(result);
    }

    fn note(&mut self, result: std::io::Result<()>) {
        if let Err(err) = result
            && !self.write_failed
        {
            self.write_failed = true;
            warn!("console: write failed: {}", err);
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn set_title(&mut self, name: &str, color: Rgb) {
        let mut stored = SpeakerName::new();
        if stored.push_str(name).is_err() {
            warn!("console: speaker name too long to show");
        }
        self.title = Some((stored, color));
    }

    fn hide_title(&mut self) {
        self.title = None;
    }

    fn set_portrait(&mut self, portrait: PortraitId) {
        debug!("console: portrait {}", portrait.0);
    }

    fn hide_portrait(&mut self) {
        debug!("console: portrait hidden");
    }

    fn set_body(&mut self, text: &str) {
        if text == self.shown.as_str() {
            return;
        }

        match text.strip_prefix(self.shown.as_str()) {
            Some(suffix) if !self.shown.is_empty() => self.write_text(suffix),
            _ => {
                if !self.shown.is_empty() {
                    self.write_line_break();
                }
                if !text.is_empty() {
                    self.write_prefix();
                    self.write_text(text);
                }
            }
        }

        self.shown.clear();
        if self.shown.push_str(text).is_err() {
            warn!("console: body exceeds paragraph bound");
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_body_is_appended_in_place() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.set_body("H");
        presenter.set_body("Hi");
        presenter.set_body("Bye");
        presenter.finish();

        assert_eq!(presenter.out, b"Hi\nBye\n");
    }

    #[test]
    fn title_prefixes_a_new_paragraph() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.set_title("Sancho", Rgb::new(1, 2, 3));
        presenter.set_body("Si");
        presenter.hide_title();
        presenter.set_body("");

        assert_eq!(presenter.out, b"\x1b[38;2;1;2;3mSancho\x1b[0m: Si\n");
    }
}

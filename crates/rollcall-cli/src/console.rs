//! Terminal rendition of the character LCD.
//!
//! Wraps a [`VirtualDisplay`] and prints a framed copy of the two lines to
//! stdout whenever a complete screen update changes what is visible. Logs go
//! to stderr, so the frames stay readable.

use std::io::Write;

use rollcall_hardware::{DisplayDevice, Result};
use rollcall_panel::VirtualDisplay;

#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    inner: VirtualDisplay,
    last_frame: Option<String>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current screen as a boxed block of text.
    pub fn frame(&self) -> String {
        let (_, columns) = self.inner.geometry();
        let border = format!("+{}+", "-".repeat(columns));
        let mut frame = border.clone();
        for line in self.inner.get_all_lines() {
            frame.push_str(&format!("\n|{line}|"));
        }
        if !self.inner.backlight() {
            frame.push_str("  (backlight off)");
        }
        frame.push('\n');
        frame.push_str(&border);
        frame
    }

    /// Print the frame if it differs from the last one printed.
    fn refresh(&mut self) {
        let frame = self.frame();
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return;
        }

        let mut stdout = std::io::stdout().lock();
        // a closed stdout only loses the echo, never the panel
        let _ = writeln!(stdout, "{frame}").and_then(|()| stdout.flush());
        self.last_frame = Some(frame);
    }
}

impl DisplayDevice for ConsoleDisplay {
    fn geometry(&self) -> (usize, usize) {
        self.inner.geometry()
    }

    async fn clear(&mut self) -> Result<()> {
        DisplayDevice::clear(&mut self.inner).await?;
        self.refresh();
        Ok(())
    }

    async fn print_at(&mut self, line: usize, column: usize, text: &str) -> Result<()> {
        self.inner.print_at(line, column, text).await?;
        self.refresh();
        Ok(())
    }

    async fn print_line(&mut self, line: usize, text: &str) -> Result<()> {
        self.inner.print_line(line, text).await?;
        self.refresh();
        Ok(())
    }

    async fn show(&mut self, first: &str, second: &str) -> Result<()> {
        self.inner.show(first, second).await?;
        self.refresh();
        Ok(())
    }

    async fn set_backlight(&mut self, enabled: bool) -> Result<()> {
        self.inner.set_backlight(enabled).await?;
        self.refresh();
        Ok(())
    }
}

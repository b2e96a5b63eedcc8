//! Colored terminal output for packaging runs.
//!
//! One line per copied file, one line per generated artifact, and a summary.

use std::io::Write;
use std::path::Path;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    /// Write `marker` in `color`, then `message` (optionally in `color` too).
    fn marked(
        &self,
        marker: &str,
        color: Color,
        bold_marker: bool,
        tint_message: bool,
        message: &str,
    ) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold_marker))?;
        write!(&mut buffer, "{marker}")?;
        buffer.reset()?;
        if tint_message {
            buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        }
        writeln!(&mut buffer, " {message}")?;
        buffer.reset()?;
        self.bufwtr.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.marked("✓", Color::Green, true, false, message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.marked("⚠", Color::Yellow, true, true, message)
    }

    /// Print a verbose/debug message (only in verbose mode)
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.marked("→", Color::Blue, false, false, message)
    }

    /// Print an error message to stderr (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        let written = (|| -> std::io::Result<()> {
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(&mut buffer, "✗")?;
            buffer.reset()?;
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(&mut buffer, " {message}")?;
            buffer.reset()?;
            bufwtr.print(&buffer)
        })();

        if written.is_err() {
            // Stderr failed - fallback to stdout as last resort
            println!("[STDERR ERROR] ✗ {message}");
        }
    }

    /// One file copied into an archive.
    pub fn file_added(&self, source: &Path, destination: &str) -> std::io::Result<()> {
        self.indent(&format!("{} → {}", source.display(), destination))
    }

    /// One archive finalized.
    pub fn artifact_created(&self, id: &str, path: &Path, files: usize) -> std::io::Result<()> {
        self.marked(
            "📦",
            Color::Cyan,
            true,
            false,
            &format!(
                "{id}: {} ({files} file{})",
                path.display(),
                if files == 1 { "" } else { "s" }
            ),
        )
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.println(&format!("    {message}"))
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "{message}")?;
        self.bufwtr.print(&buffer)
    }
}

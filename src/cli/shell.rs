use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveBuilder, BuildOutcome};
use crate::common::format::{self, format_path, format_size};
use crate::staging::{RawFile, StagingList};

use super::output::staged_line;

const HELP: &str = "\
Commands:
  add <path>...           Stage files (quote paths with spaces)
  ls                      List staged files
  rm <id>                 Unstage a file
  clear                   Unstage everything
  total                   Show staged count and size
  preview <id> <out.png>  Write a thumbnail of a staged image
  build                   Build and save the archive
  help                    Show this help
  quit                    Leave the session";

/// What the session loop should do after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// An interactive staging session: one staging list, one builder
pub struct Shell {
    staging: StagingList,
    builder: ArchiveBuilder,
    thumbnail_size: u32,
}

impl Shell {
    pub fn new(staging: StagingList, builder: ArchiveBuilder, thumbnail_size: u32) -> Self {
        Self {
            staging,
            builder,
            thumbnail_size,
        }
    }

    pub fn staging(&self) -> &StagingList {
        &self.staging
    }

    /// Stage files from disk, reporting unreadable ones to `out`
    pub fn add_paths<W: Write>(&mut self, paths: &[PathBuf], out: &mut W) -> Result<usize> {
        let mut raw = Vec::with_capacity(paths.len());
        for path in paths {
            match RawFile::from_path(path) {
                Ok(file) => raw.push(file),
                Err(e) => writeln!(out, "  ✗ {}", e)?,
            }
        }
        Ok(self.staging.add(raw))
    }

    /// Read commands until EOF or `quit`
    ///
    /// Lines that are not valid UTF-8 are decoded lossily rather than ending
    /// the session.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W, prompt: bool) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            if prompt {
                write!(out, "fling> ")?;
                out.flush()?;
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if self.execute(line, out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let Some(words) = shlex::split(line) else {
            writeln!(out, "  ✗ Unbalanced quotes")?;
            return Ok(Flow::Continue);
        };
        let Some((command, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        match (command.as_str(), args) {
            ("add", []) => writeln!(out, "  Usage: add <path>...")?,
            ("add", paths) => {
                let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
                self.add_paths(&paths, out)?;
            }
            ("ls" | "list", []) => {
                for staged in self.staging.files() {
                    writeln!(out, "{}", staged_line(staged))?;
                }
                self.write_total(out)?;
            }
            ("rm" | "remove", [id]) => {
                if !self.staging.remove(id) {
                    writeln!(out, "  No staged file with id '{}'", id)?;
                }
            }
            ("clear", []) => self.staging.clear_all(),
            ("total", []) => self.write_total(out)?,
            ("preview", [id, dest]) => self.write_preview(id, Path::new(dest), out)?,
            ("build", []) => match self.builder.build(self.staging.files()) {
                BuildOutcome::Saved(saved) => {
                    writeln!(out, "  Saved to {}", format_path(&saved.location))?
                }
                BuildOutcome::Failed { reason } => writeln!(out, "  Reason: {}", reason)?,
                BuildOutcome::NoFiles => {}
            },
            ("help" | "?", _) => writeln!(out, "{}", HELP)?,
            ("quit" | "exit", _) => return Ok(Flow::Quit),
            (other, _) => writeln!(out, "  Unknown command or arguments: '{}' (try 'help')", other)?,
        }
        Ok(Flow::Continue)
    }

    fn write_total<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "  {} staged, {} total",
            format::format_count(self.staging.len()),
            format_size(self.staging.total_size())
        )?;
        Ok(())
    }

    fn write_preview<W: Write>(&self, id: &str, dest: &Path, out: &mut W) -> Result<()> {
        let Some(staged) = self.staging.get(id) else {
            writeln!(out, "  No staged file with id '{}'", id)?;
            return Ok(());
        };
        let Some(url) = staged.preview_url() else {
            writeln!(out, "  '{}' has no preview (not an image)", staged.name())?;
            return Ok(());
        };

        match self.staging.previews().thumbnail(url, self.thumbnail_size) {
            Ok(png) => match std::fs::write(dest, png) {
                Ok(()) => writeln!(out, "  Preview written to {}", format_path(dest))?,
                Err(e) => writeln!(out, "  ✗ Cannot write {}: {}", format_path(dest), e)?,
            },
            Err(e) => writeln!(out, "  ✗ {}", e)?,
        }
        Ok(())
    }
}

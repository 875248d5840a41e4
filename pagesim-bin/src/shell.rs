//! Line-oriented menu loop.
//!
//! Input is consumed as whitespace separated tokens, so a choice and its
//! arguments may be given on one line or on separate lines.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use serde::Serialize;

use pagesim_core::memory::MemorySnapshot;
use pagesim_core::translate::{AddressTranslator, Translation};
use pagesim_core::{Job, JobId, JobRegistry};

/// Splits a line-oriented reader into whitespace separated tokens.
pub struct TokenReader<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    /// Wraps `input`.
    pub fn new(input: R) -> Self {
        TokenReader {
            input,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token, `None` at end of input.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

/// Answer to a prompt for a value.
#[derive(Debug, PartialEq, Eq)]
pub enum Answer<T> {
    /// Parsed value
    Value(T),
    /// Token that did not parse
    Invalid(String),
    /// Input exhausted
    Eof,
}

/// Writes `prompt` and parses the next token as `T`.
pub fn ask<R: BufRead, W: Write, T: FromStr>(
    reader: &mut TokenReader<R>,
    output: &mut W,
    prompt: &str,
) -> io::Result<Answer<T>> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    Ok(match reader.next_token()? {
        None => Answer::Eof,
        Some(token) => match token.parse() {
            Ok(value) => Answer::Value(value),
            Err(_) => Answer::Invalid(token),
        },
    })
}

enum Flow {
    Continue,
    Exit,
    InputEnded,
}

#[derive(Serialize)]
struct SnapshotReport<'a> {
    date: String,
    snapshot: &'a MemorySnapshot,
}

/// Interactive menu over one [`JobRegistry`].
pub struct Shell<R, W> {
    reader: TokenReader<R>,
    output: W,
    registry: JobRegistry,
    json: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Creates a shell reading from `reader` and rendering to `output`.
    pub fn new(registry: JobRegistry, reader: TokenReader<R>, output: W) -> Self {
        Shell {
            reader,
            output,
            registry,
            json: false,
        }
    }

    /// Renders the memory state as JSON instead of tables.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// The registry driven by this shell.
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Runs the menu loop until the user exits or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_menu()?;
            let flow = match self.reader.next_token()? {
                Some(choice) => self.dispatch(&choice)?,
                None => Flow::InputEnded,
            };
            match flow {
                Flow::Continue => {}
                Flow::Exit => break,
                Flow::InputEnded => {
                    writeln!(self.output)?;
                    writeln!(self.output, "Exiting...")?;
                    break;
                }
            }
        }
        self.output.flush()
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        debug!("Menu choice {:?}", choice);
        Ok(match choice.parse::<i64>() {
            Ok(1) => self.accept_job()?,
            Ok(2) => self.resolve_address()?,
            Ok(3) => self.display()?,
            Ok(4) => self.remove_job()?,
            Ok(5) => {
                writeln!(self.output, "Exiting...")?;
                Flow::Exit
            }
            Ok(_) => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                Flow::Continue
            }
            Err(_) => {
                writeln!(self.output, "Invalid input. Please enter a number.")?;
                Flow::Continue
            }
        })
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Menu ===")?;
        writeln!(self.output, "1. Accept a job")?;
        writeln!(self.output, "2. Resolve address")?;
        writeln!(self.output, "3. Display memory state")?;
        writeln!(self.output, "4. Remove a job")?;
        writeln!(self.output, "5. Exit")?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()
    }

    fn ask<T: FromStr>(&mut self, prompt: &str) -> io::Result<Answer<T>> {
        ask(&mut self.reader, &mut self.output, prompt)
    }

    fn invalid(&mut self, token: &str) -> io::Result<Flow> {
        writeln!(self.output, "Error: Invalid input '{}'", token)?;
        Ok(Flow::Continue)
    }

    fn accept_job(&mut self) -> io::Result<Flow> {
        let name = match self.ask::<String>("Enter job name: ")? {
            Answer::Value(name) => name,
            Answer::Invalid(token) => return self.invalid(&token),
            Answer::Eof => return Ok(Flow::InputEnded),
        };
        let size = match self.ask::<i64>("Enter job size (bytes): ")? {
            Answer::Value(size) => size,
            Answer::Invalid(token) => return self.invalid(&token),
            Answer::Eof => return Ok(Flow::InputEnded),
        };
        match self
            .registry
            .create_job(name, size)
            .and_then(|id| self.registry.lookup(id))
        {
            Ok(job) => {
                let text = render_job(job);
                write!(self.output, "{}", text)?;
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn resolve_address(&mut self) -> io::Result<Flow> {
        let job = match self.ask::<u64>("Enter job ID: ")? {
            Answer::Value(job) => JobId::from(job),
            Answer::Invalid(token) => return self.invalid(&token),
            Answer::Eof => return Ok(Flow::InputEnded),
        };
        let address = match self.ask::<i64>("Enter logical address: ")? {
            Answer::Value(address) => address,
            Answer::Invalid(token) => return self.invalid(&token),
            Answer::Eof => return Ok(Flow::InputEnded),
        };
        match self.registry.translate(job, address) {
            Ok(translation) => write!(self.output, "{}", render_translation(&translation))?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn display(&mut self) -> io::Result<Flow> {
        let snapshot = MemorySnapshot::capture(&self.registry);
        writeln!(self.output)?;
        if self.json {
            let report = SnapshotReport {
                date: chrono::Local::now().to_rfc3339(),
                snapshot: &snapshot,
            };
            serde_json::to_writer_pretty(&mut self.output, &report)?;
            writeln!(self.output)?;
        } else {
            write!(self.output, "{}", snapshot)?;
        }
        Ok(Flow::Continue)
    }

    fn remove_job(&mut self) -> io::Result<Flow> {
        let job = match self.ask::<u64>("Enter job ID to remove: ")? {
            Answer::Value(job) => JobId::from(job),
            Answer::Invalid(token) => return self.invalid(&token),
            Answer::Eof => return Ok(Flow::InputEnded),
        };
        match self.registry.remove_job(job) {
            Ok(_) => writeln!(self.output, "Job {} removed successfully.", job)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Continue)
    }
}

/// Renders the allocation report of a freshly created job.
pub fn render_job(job: &Job) -> String {
    let mut out = String::new();
    out += "\n=== Job Allocated Successfully ===\n";
    out += &format!("Job ID: {}\n", job.id());
    out += &format!("Job Name: {}\n", job.name());
    out += &format!("Job Size: {} bytes\n", job.requested_size());
    out += &format!("Pages Allocated: {}\n", job.page_count());
    out += &format!(
        "Internal Fragmentation: {} bytes\n",
        job.internal_fragmentation()
    );
    out += &format!(
        "Page Table: {}\n",
        job.page_table()
            .iter()
            .map(|(page, frame)| format!("{}->{}", page, frame))
            .join(" ")
    );
    out
}

/// Renders a successful address translation.
pub fn render_translation(translation: &Translation) -> String {
    let mut out = String::new();
    out += "\n=== Address Resolution ===\n";
    out += &format!("Job ID: {}\n", translation.job);
    out += &format!("Logical Address: {}\n", translation.logical_address);
    out += &format!("Page Number: {}\n", translation.page);
    out += &format!("Page Offset: {}\n", translation.offset);
    out += &format!("Frame Number: {}\n", translation.frame);
    out += &format!("Physical Address: {}\n", translation.physical);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesim_core::PagerConfig;
    use pagesim_core::selector::LowestFirst;
    use std::io::Cursor;

    fn run(page_size: i64, frames: i64, input: &str) -> (String, JobRegistry) {
        let config = PagerConfig::new(page_size, frames).expect("valid config");
        let registry = JobRegistry::with_selector(config, Box::new(LowestFirst));
        let mut out = Vec::new();
        let mut shell = Shell::new(registry, TokenReader::new(Cursor::new(input)), &mut out);
        shell.run().expect("in-memory io");
        let Shell { registry, .. } = shell;
        (String::from_utf8(out).expect("utf8 output"), registry)
    }

    #[test]
    fn test_memory_exhaustion() {
        let (out, _) = run(100, 2, "1\nJob1\n200\n1\nJob2\n50\n5\n");
        assert!(out.contains("=== Job Allocated Successfully ==="));
        assert!(out.contains("Error: Not enough free frames. Need 1 frames, but only 0 are available."));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_input_ending_mid_command() {
        for input in ["1 Job", "1", "2 1", "4", ""] {
            let (out, registry) = run(100, 2, input);
            assert!(out.ends_with("\nExiting...\n"), "input {:?} gave {:?}", input, out);
            assert_eq!(registry.job_count(), 0);
        }
    }

    #[test]
    fn test_remove_then_reuse() {
        let (out, registry) = run(100, 2, "1 Job1 200\n4 1\n1 Job2 50\n4 1\n5\n");
        assert!(out.contains("Job 1 removed successfully."));
        assert!(out.contains("Job ID: 2"));
        assert!(out.contains("Error: Job ID 1 not found."));
        assert_eq!(registry.job_count(), 1);
    }

    #[test]
    fn test_fragmentation_lines() {
        let (out, _) = run(1024, 4, "1 FragJob 1500\n1 ExactJob 2048\n");
        assert!(out.contains("Internal Fragmentation: 548 bytes"));
        assert!(out.contains("Internal Fragmentation: 0 bytes"));
        assert!(out.contains("Page Table: 0->0 1->1\n"));
        assert!(out.contains("Page Table: 0->2 1->3\n"));
    }

    #[test]
    fn test_address_resolution() {
        let (out, _) = run(1024, 4, "1 TestJob 2500\n2 1 2499\n2 1 2500\n2 999 0\n5\n");
        assert!(out.contains("=== Address Resolution ==="));
        assert!(out.contains("Page Number: 2\nPage Offset: 451\nFrame Number: 2\nPhysical Address: 2499\n"));
        assert!(out.contains("Error: Logical address 2500 is out of bounds for job 1 (size: 2500)"));
        assert!(out.contains("Error: Job ID 999 not found."));
    }

    #[test]
    fn test_invalid_input() {
        let (out, registry) = run(1024, 4, "999\nabc\n1 NegJob -100\n1 Zero 0\n1 Bad x\n");
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("Invalid input. Please enter a number."));
        assert!(out.contains("Error: Invalid job size: -100"));
        assert!(out.contains("Error: Invalid job size: 0"));
        assert!(out.contains("Error: Invalid input 'x'"));
        assert_eq!(registry.job_count(), 0);
    }

    #[test]
    fn test_display() {
        let (out, _) = run(1024, 4, "1 Job1 1024\n1 Job2 2048\n3\n4 1\n3\n5\n");
        assert!(out.contains("Used Frames: 3 / 4"));
        assert!(out.contains("Used Frames: 2 / 4"));
    }

    #[test]
    fn test_display_json() -> anyhow::Result<()> {
        let config = PagerConfig::new(512, 2)?;
        let registry = JobRegistry::with_selector(config, Box::new(LowestFirst));
        let mut out = Vec::new();
        Shell::new(registry, TokenReader::new(Cursor::new("1 J 600\n3\n5\n")), &mut out)
            .with_json(true)
            .run()?;
        let out = String::from_utf8(out)?;
        let start = out.find("{\n").expect("json report");
        let end = out.rfind("}\n").expect("json report");
        let json: serde_json::Value = serde_json::from_str(&out[start..=end])?;
        assert_eq!(json["snapshot"]["used_frames"], 2);
        assert_eq!(json["snapshot"]["jobs"][0]["internal_fragmentation"], 424);
        assert!(json["date"].is_string());
        Ok(())
    }

    #[test]
    fn test_ask() {
        let mut reader = TokenReader::new(Cursor::new("12 x\n"));
        let mut out = Vec::new();
        assert_eq!(ask::<_, _, i64>(&mut reader, &mut out, "a: ").unwrap(), Answer::Value(12));
        assert_eq!(
            ask::<_, _, i64>(&mut reader, &mut out, "b: ").unwrap(),
            Answer::Invalid("x".to_string())
        );
        assert_eq!(ask::<_, _, i64>(&mut reader, &mut out, "c: ").unwrap(), Answer::Eof);
        assert_eq!(out, b"a: b: c: ");
    }
}

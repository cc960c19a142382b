//! Interactive page router over a patient registry.
//!
//! Four pages, with these transitions:
//!
//! ```text
//! Dashboard --view/open--> PatientChart --record--> AddRecord --ack--> PatientChart
//! PatientChart --back--> Dashboard
//! Dashboard --add--> AddPatient --submit--> Dashboard
//! ```
//!
//! Every page re-reads the registry before rendering. Validation and lookup errors are
//! printed and the user is prompted again; end of input ends the session.

use crate::render;
use chart_core::{record_observation, Age, Cd4Count, PatientId, PatientRegistry, ViralLoad};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    PatientChart(PatientId),
    AddPatient,
    AddRecord(PatientId),
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    registry: PatientRegistry,
    page: Page,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(registry: PatientRegistry, input: R, out: W) -> Self {
        Self {
            registry,
            page: Page::Dashboard,
            input,
            out,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn registry(&self) -> &PatientRegistry {
        &self.registry
    }

    /// Runs pages until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let flow = match self.page {
                Page::Dashboard => self.dashboard()?,
                Page::PatientChart(id) => self.patient_chart(id)?,
                Page::AddPatient => self.add_patient()?,
                Page::AddRecord(id) => self.add_record(id)?,
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn go(&mut self, page: Page) -> Flow {
        tracing::debug!(from = ?self.page, to = ?page, "navigate");
        self.page = page;
        Flow::Continue
    }

    /// Prompts and reads one trimmed line. `None` means input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts until `parse` accepts the answer.
    fn prompt_valid<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(msg) => writeln!(self.out, "Error: {msg}")?,
            }
        }
    }

    fn dashboard(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "\nDoctor's Dashboard\n")?;
        write!(self.out, "{}", render::patient_table(&self.registry.list_patients()))?;

        let Some(command) = self.prompt("\n[view <name>] [open <id>] [add] [quit]")? else {
            return Ok(Flow::Quit);
        };
        let (verb, arg) = match command.split_once(' ') {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (command.as_str(), ""),
        };

        match verb {
            "view" | "v" => match self.registry.find_by_name(arg) {
                Ok(patient) => {
                    let id = patient.id;
                    Ok(self.go(Page::PatientChart(id)))
                }
                Err(e) => {
                    writeln!(self.out, "Error: {e}")?;
                    Ok(Flow::Continue)
                }
            },
            "open" | "o" => {
                let found = arg
                    .parse::<PatientId>()
                    .map_err(|_| format!("patient id must be a whole number, got {arg:?}"))
                    .and_then(|id| {
                        self.registry
                            .patient(id)
                            .map(|p| p.id)
                            .map_err(|e| e.to_string())
                    });
                match found {
                    Ok(id) => Ok(self.go(Page::PatientChart(id))),
                    Err(msg) => {
                        writeln!(self.out, "Error: {msg}")?;
                        Ok(Flow::Continue)
                    }
                }
            }
            "add" | "a" => Ok(self.go(Page::AddPatient)),
            "quit" | "q" => Ok(Flow::Quit),
            other => {
                writeln!(self.out, "Unknown command: {other:?}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn patient_chart(&mut self, id: PatientId) -> io::Result<Flow> {
        let page = match self.registry.patient(id) {
            Ok(patient) => render::chart(patient),
            Err(e) => {
                writeln!(self.out, "Error: {e}")?;
                return Ok(self.go(Page::Dashboard));
            }
        };
        write!(self.out, "\n{page}")?;

        loop {
            let Some(command) = self.prompt("\n[record] [back] [quit]")? else {
                return Ok(Flow::Quit);
            };
            match command.as_str() {
                "record" | "r" => return Ok(self.go(Page::AddRecord(id))),
                "back" | "b" => return Ok(self.go(Page::Dashboard)),
                "quit" | "q" => return Ok(Flow::Quit),
                other => writeln!(self.out, "Unknown command: {other:?}")?,
            }
        }
    }

    fn add_patient(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "\nAdd New Patient\n")?;

        let Some(name) = self.prompt("Name")? else {
            return Ok(Flow::Quit);
        };
        let Some(age) = self.prompt_valid("Age", parse_age)? else {
            return Ok(Flow::Quit);
        };
        let Some(gender) = self.prompt("Gender")? else {
            return Ok(Flow::Quit);
        };
        let Some(ethnicity) = self.prompt("Ethnicity")? else {
            return Ok(Flow::Quit);
        };
        let Some(condition) = self.prompt("Condition")? else {
            return Ok(Flow::Quit);
        };

        match self.registry.add_patient(
            name.clone(),
            i64::from(age.years()),
            gender,
            ethnicity,
            condition,
        ) {
            Ok(_) => writeln!(self.out, "Patient {name} added successfully.")?,
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(self.go(Page::Dashboard))
    }

    fn add_record(&mut self, id: PatientId) -> io::Result<Flow> {
        writeln!(self.out, "\nAdd a New Patient Record\n")?;

        let Some(viral_load) = self.prompt_valid("Viral Load", |s| {
            parse_number(s).and_then(|v| ViralLoad::new(v).map_err(|e| e.to_string()))
        })?
        else {
            return Ok(Flow::Quit);
        };
        let Some(cd4_count) = self.prompt_valid("CD4 Count", |s| {
            parse_number(s).and_then(|v| Cd4Count::new(v).map_err(|e| e.to_string()))
        })?
        else {
            return Ok(Flow::Quit);
        };

        match record_observation(
            &mut self.registry,
            id,
            viral_load.value(),
            cd4_count.value(),
        ) {
            Ok(plan) => {
                write!(self.out, "\n{}", render::recommendation(&plan))?;
                if self.prompt("\nPress enter to acknowledge")?.is_none() {
                    return Ok(Flow::Quit);
                }
                Ok(self.go(Page::PatientChart(id)))
            }
            Err(e) => {
                writeln!(self.out, "Error: {e}")?;
                Ok(self.go(Page::Dashboard))
            }
        }
    }
}

fn parse_age(s: &str) -> Result<Age, String> {
    let years: i64 = s
        .parse()
        .map_err(|_| format!("age must be a whole number, got {s:?}"))?;
    Age::new(years).map_err(|e| e.to_string())
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse().map_err(|_| format!("expected a number, got {s:?}"))
}

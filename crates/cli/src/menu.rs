//! Interactive numbered menu
//!
//! Reads choices and field values line by line from any `BufRead` and
//! writes prompts and results to any `Write`. Only option 7 or end of
//! input ends the loop; rejected requests and failed saves are printed
//! and the menu is shown again.

use crate::commands::{checked_record, checked_user};
use shelfmark_library::{Catalog, Receipt};
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

pub const INVALID_CHOICE: &str = "Invalid choice. Please enter a number from 1 to 7.";

const OPTIONS: [&str; 7] = [
    "Add a book",
    "Remove a book",
    "List books",
    "Borrow a book",
    "Return a book",
    "Show statistics",
    "Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Add,
    Remove,
    List,
    Borrow,
    Return,
    Stats,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u8>().ok()? {
            1 => Some(Self::Add),
            2 => Some(Self::Remove),
            3 => Some(Self::List),
            4 => Some(Self::Borrow),
            5 => Some(Self::Return),
            6 => Some(Self::Stats),
            7 => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Shows the menu until the user exits or input runs out
    pub fn run(&mut self, catalog: &mut Catalog) -> io::Result<()> {
        loop {
            self.print_options()?;

            let Some(line) = self.prompt("Enter your choice: ")? else {
                writeln!(self.output)?;
                break;
            };

            let flow = match Choice::parse(&line) {
                Some(Choice::Exit) => ControlFlow::Break(()),
                Some(choice) => self.handle(choice, catalog)?,
                None => {
                    writeln!(self.output, "{}", INVALID_CHOICE)?;
                    ControlFlow::Continue(())
                }
            };

            if flow.is_break() {
                break;
            }
        }

        writeln!(self.output, "Exiting.")?;
        self.output.flush()
    }

    fn print_options(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nChoose an option:")?;
        for (number, label) in OPTIONS.iter().enumerate() {
            writeln!(self.output, "{}. {}", number + 1, label)?;
        }
        Ok(())
    }

    /// Returns the trimmed line, or `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts for each label in turn; `None` if input ends midway
    fn prompt_all<const N: usize>(&mut self, labels: [&str; N]) -> io::Result<Option<[String; N]>> {
        let mut values: [String; N] = std::array::from_fn(|_| String::new());
        for (value, label) in values.iter_mut().zip(labels) {
            match self.prompt(label)? {
                Some(line) => *value = line,
                None => return Ok(None),
            }
        }
        Ok(Some(values))
    }

    fn handle(&mut self, choice: Choice, catalog: &mut Catalog) -> io::Result<ControlFlow<()>> {
        match choice {
            Choice::Add => {
                let Some([title, author, category]) =
                    self.prompt_all(["Title: ", "Author: ", "Category: "])?
                else {
                    return Ok(ControlFlow::Break(()));
                };
                match checked_record(&title, &author, &category) {
                    Ok(record) => self.print_receipt(&catalog.add_record(record))?,
                    Err(e) => writeln!(self.output, "{}", e.user_message())?,
                }
            }
            Choice::Remove => {
                let Some([title]) = self.prompt_all(["Title to remove: "])? else {
                    return Ok(ControlFlow::Break(()));
                };
                self.print_receipt(&catalog.remove_book(&title))?;
            }
            Choice::List => {
                for line in catalog.list_books() {
                    writeln!(self.output, "{}", line)?;
                }
            }
            Choice::Borrow | Choice::Return => {
                let title_label = if choice == Choice::Borrow {
                    "Title to borrow: "
                } else {
                    "Title to return: "
                };
                let Some([title, user]) = self.prompt_all([title_label, "Your user ID: "])? else {
                    return Ok(ControlFlow::Break(()));
                };
                match checked_user(&user) {
                    Ok(user) if choice == Choice::Borrow => {
                        self.print_receipt(&catalog.borrow_book(&title, user))?
                    }
                    Ok(user) => self.print_receipt(&catalog.return_book(&title, user))?,
                    Err(e) => writeln!(self.output, "{}", e.user_message())?,
                }
            }
            Choice::Stats => writeln!(self.output, "{}", catalog.stats())?,
            Choice::Exit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn print_receipt(&mut self, receipt: &Receipt) -> io::Result<()> {
        for line in receipt.lines() {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }
}

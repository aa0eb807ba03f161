//! Terminal operator: questions on stdout, answers from stdin.

use std::io::{self, Write};

use async_trait::async_trait;
use colored::{ColoredString, Colorize};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::workflow::{Operator, Tone};

const BANNER: &str = r"
   ___   ____ ___    ____  _   _ __  __ ____    ____   ___ _____
  / _ \ / ___/ _ \  |  _ \| | | |  \/  |  _ \  | __ ) / _ \_   _|
 | | | | |  | | | | | |_) | | | | |\/| | |_) | |  _ \| | | || |
 | |_| | |__| |_| | |  __/| |_| | |  | |  __/  | |_) | |_| || |
  \___/ \____\___/  |_|    \___/|_|  |_|_|     |____/ \___/ |_|
";

pub fn print_banner() {
    println!("{}", BANNER.cyan().bold());
    println!();
    println!("{}", "#".repeat(68));
}

pub struct ConsoleOperator {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleOperator {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operator for ConsoleOperator {
    async fn ask(&mut self, question: &str) -> io::Result<String> {
        println!();
        print!("{question}");
        io::stdout().flush()?;
        match self.lines.next_line().await? {
            Some(answer) => Ok(answer),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "operator input closed",
            )),
        }
    }

    fn tell(&mut self, tone: Tone, line: &str) {
        println!("{}", paint(tone, line));
    }
}

fn paint(tone: Tone, line: &str) -> ColoredString {
    match tone {
        Tone::Info => line.normal(),
        Tone::Warning => line.yellow(),
        Tone::Error => format!("[ERROR]: {line}").white().on_red(),
        Tone::Success => line.green().bold(),
        Tone::Alert => line.white().on_red().bold(),
    }
}
